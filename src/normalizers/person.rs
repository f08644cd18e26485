use tracing::warn;

use super::{normalize_address, parse_amount, strip_whitespace};
use crate::models::{Capital, Person, PersonKind, RawFields, RawNode, Registration};

/// Normalize a raw person node
///
/// The node either wraps its payload in a `personneMorale` /
/// `personnePhysique` discriminant or is already the payload. Fields the
/// canonical person does not model are kept in `extra`.
pub fn normalize_person(mut raw: RawFields) -> Person {
    let kind = take_discriminant(&mut raw);

    raw.rename(&["nationnalite"], "nationalite");
    raw.rename(&["numeroImmatriculation"], "immatriculation");

    let immatriculation = raw.take_fields("immatriculation").map(normalize_registration);
    let siren = immatriculation
        .as_ref()
        .and_then(|registration| registration.numero_identification.as_deref())
        .map(strip_whitespace);

    Person {
        kind,
        denomination: raw.take_text("denomination"),
        forme_juridique: raw.take_text("formeJuridique"),
        sigle: raw.take_text("sigle"),
        capital: raw.take_fields("capital").map(normalize_capital),
        immatriculation,
        nom: raw.take_text("nom"),
        prenom: raw.take_text_list("prenom").unwrap_or_default(),
        nationalite: raw.take_text("nationalite"),
        activite: raw.take_text("activite"),
        administration: raw.take_text("administration"),
        non_inscrit: raw.take_text("nonInscrit"),
        adresse: raw.take_fields("adresse").and_then(normalize_address),
        etablissement_principal: raw
            .take_fields("etablissementPrincipal")
            .and_then(normalize_address),
        siege_social: raw.take_fields("siegeSocial").and_then(normalize_address),
        siren,
        extra: raw,
    }
}

/// Normalize a payload known to describe a legal person
///
/// Previous owners and operators, and the root-level entity of balance-sheet
/// and collective-proceeding notices, carry no discriminant of their own.
pub fn normalize_moral_person(payload: RawFields) -> Person {
    let mut wrapped = RawFields::new();
    wrapped.insert(PersonKind::Moral.as_str(), RawNode::Map(payload));
    normalize_person(wrapped)
}

/// Merge the discriminant's payload up one level; the payload wins on
/// conflicting keys
fn take_discriminant(raw: &mut RawFields) -> Option<PersonKind> {
    for kind in [PersonKind::Moral, PersonKind::Physical] {
        if !matches!(raw.get(kind.as_str()), Some(RawNode::Map(_))) {
            continue;
        }
        if let Some(payload) = raw.take_fields(kind.as_str()) {
            raw.merge(payload);
            return Some(kind);
        }
    }
    None
}

fn normalize_registration(mut raw: RawFields) -> Registration {
    raw.rename(&["numeroIdentificationRCS"], "numeroIdentification");
    Registration {
        numero_identification: raw.take_text("numeroIdentification"),
        code_rcs: raw.take_text("codeRCS"),
        nom_greffe_immat: raw.take_text("nomGreffeImmat"),
        extra: raw,
    }
}

/// `capitalVariable` is a presence flag: `<capitalVariable/>` means true
fn normalize_capital(mut raw: RawFields) -> Capital {
    let montant = raw.take_text("montantCapital").and_then(|text| {
        let amount = parse_amount(&text);
        if amount.is_none() && !text.is_empty() {
            warn!("Unparseable share capital {:?}", text);
        }
        amount
    });
    Capital {
        montant,
        devise: raw.take_text("devise"),
        capital_variable: raw.take("capitalVariable").is_some(),
        extra: raw,
    }
}
