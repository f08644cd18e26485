use tracing::{debug, error, warn};

use crate::error::StructuralError;
use crate::models::{
    composite_id, Announcement, Family, Judgment, Person, PriorPublication, RawFields, RawNode,
    TradeInscription,
};
use crate::normalizers::{
    extract_act, normalize_address, normalize_date, normalize_establishment,
    normalize_moral_person, normalize_person, parse_integer,
};

use super::SplitDocument;

/// Keys that describe a balance-sheet company at the announcement root
const ROOT_COMPANY_KEYS: [&str; 5] = [
    "adresse",
    "numeroImmatriculation",
    "denomination",
    "formeJuridique",
    "sigle",
];

/// Document-level fields every announcement inherits
#[derive(Debug, Clone)]
pub struct DocumentContext {
    pub family: Family,
    pub parution: String,
    pub date_parution: String,
}

impl DocumentContext {
    pub fn new(family: Family, parution: &str, date_parution: &str) -> Self {
        Self {
            family,
            parution: parution.to_string(),
            date_parution: date_parution.to_string(),
        }
    }
}

/// An announcement rejected because part of it was not understood
#[derive(Debug, Clone)]
pub struct RejectedAnnouncement {
    pub id: String,
    pub error: StructuralError,
}

/// Result of Stage 1 assembly
#[derive(Debug, Default)]
pub struct Stage1Result {
    /// Announcements that assembled cleanly, in document order
    pub announcements: Vec<Announcement>,
    /// Announcements excluded by a structural error
    pub rejected: Vec<RejectedAnnouncement>,
}

/// Execute Stage 1: assemble every raw announcement of a document
///
/// A structural error excludes that announcement only.
pub fn execute_stage1(document: SplitDocument) -> Stage1Result {
    let context = DocumentContext::new(document.family, &document.parution, &document.date_parution);
    let mut result = Stage1Result::default();

    for avis in document.announcements {
        let raw_json = tracing::enabled!(tracing::Level::DEBUG)
            .then(|| serde_json::to_string(&avis).unwrap_or_default());
        let id = announcement_id(&context, &avis);

        match assemble_announcement(avis, &context) {
            Ok(announcement) => result.announcements.push(announcement),
            Err(err) => {
                error!("Skipping announcement {}: {}", id, err);
                if let Some(raw) = raw_json {
                    debug!("Raw announcement {}: {}", id, raw);
                }
                result.rejected.push(RejectedAnnouncement { id, error: err });
            }
        }
    }

    result
}

/// Composite id of a raw announcement, from its announcement number as
/// written in the source
fn announcement_id(context: &DocumentContext, avis: &RawFields) -> String {
    let numero = avis
        .get("numeroAnnonce")
        .and_then(RawNode::as_text)
        .unwrap_or_default();
    composite_id(context.family.tag(), &context.parution, numero)
}

/// Turn one raw announcement into its canonical form
///
/// The steps run in a fixed order, each taking the fields it understands.
/// Whatever is left at the end is a structural error.
pub fn assemble_announcement(
    mut avis: RawFields,
    context: &DocumentContext,
) -> Result<Announcement, StructuralError> {
    let mut announcement =
        Announcement::new(context.family, &context.parution, &context.date_parution);
    announcement.id = announcement_id(context, &avis);

    if let Some(numero) = avis.take_text("numeroAnnonce") {
        announcement.numero_annonce = parse_integer(&numero);
        if announcement.numero_annonce.is_none() {
            warn!("Non-numeric announcement number {:?} in {}", numero, announcement.id);
        }
    }
    announcement.nojo = avis.take_text("nojo");
    announcement.numero_departement = avis.take_text("numeroDepartement");
    announcement.tribunal = avis.take_text("tribunal");

    if let Some(etablissements) = avis.take_fields_list("etablissement") {
        announcement.etablissements = etablissements
            .into_iter()
            .map(normalize_establishment)
            .collect();
    }

    if let Some(mut personnes) = avis.take_fields("personnes") {
        if let Some(list) = personnes.take_fields_list("personne") {
            announcement.personnes = list.into_iter().map(normalize_person).collect();
        }
        personnes.ensure_exhausted("personnes")?;
    }

    if let Some(person) = take_root_person(&mut avis) {
        announcement.personnes.push(person);
    }

    announcement.acte = extract_act(&mut avis)?;

    if let Some(prior) = avis.take_fields("parutionAvisPrecedent") {
        announcement.parution_avis_precedent = Some(normalize_prior_publication(prior));
    }

    announcement.precedent_proprietaires =
        take_previous_holders(&mut avis, &["precedentProprietairePM", "precedentProprietairePP"]);
    announcement.precedent_exploitants =
        take_previous_holders(&mut avis, &["precedentExploitantPM", "precedentExploitantPP"]);

    announcement.identifiant_client = avis.take_text_list("identifiantClient").unwrap_or_default();
    announcement.activite = avis.take_text_list("activite").unwrap_or_default();
    if let Some(jugements) = avis.take_fields_list("jugement") {
        announcement.jugement = jugements.into_iter().map(normalize_judgment).collect();
    }
    announcement.jugement_annule = avis.take_fields("jugementAnnule").map(normalize_judgment);
    announcement.enseigne = avis.take_text("enseigne");
    announcement.inscription_rm = avis.take_fields("inscriptionRM").map(normalize_trade_inscription);
    announcement.non_inscrit = avis.take_text("nonInscrit");
    announcement.adresse = avis.take_fields("adresse").and_then(normalize_address);

    avis.ensure_exhausted(context.family.list_item())?;
    Ok(announcement)
}

/// The single person some families carry at the announcement root
///
/// Checked in order: a `personneMorale` element, a `personnePhysique`
/// element, then loose company fields around a `numeroImmatriculation`.
/// A root registration number belongs to whichever shape matched.
fn take_root_person(avis: &mut RawFields) -> Option<Person> {
    for discriminant in ["personneMorale", "personnePhysique"] {
        if let Some(payload) = avis.take_fields(discriminant) {
            let mut raw = RawFields::new();
            raw.insert(discriminant, RawNode::Map(payload));
            avis.relocate(&mut raw, &["numeroImmatriculation"]);
            return Some(normalize_person(raw));
        }
    }

    if avis.contains("numeroImmatriculation") {
        let mut payload = RawFields::new();
        avis.relocate(&mut payload, &ROOT_COMPANY_KEYS);
        return Some(normalize_moral_person(payload));
    }

    None
}

/// Previous owners or operators, physical or moral, normalized as moral
/// persons and concatenated in key order
fn take_previous_holders(avis: &mut RawFields, keys: &[&str]) -> Vec<Person> {
    keys.iter()
        .filter_map(|key| avis.take_fields_list(key))
        .flatten()
        .map(normalize_moral_person)
        .collect()
}

fn normalize_prior_publication(mut raw: RawFields) -> PriorPublication {
    raw.rename(&["numeroParution"], "parution");
    let parution = raw.take_text("parution");
    let date_parution = raw.take_text("dateParution").map(|date| normalize_date(&date));
    let numero_text = raw.take_text("numeroAnnonce");
    let numero_annonce = numero_text.as_deref().and_then(parse_integer);

    let nom_publication = raw.take_text("nomPublication").unwrap_or_default();
    let family_tag = match Family::from_publication_name(&nom_publication) {
        Some(family) => family.tag().to_string(),
        None => {
            warn!("Unknown publication name {:?}", nom_publication);
            nom_publication
        }
    };

    let numero = numero_annonce
        .map(|numero| numero.to_string())
        .or(numero_text)
        .unwrap_or_default();
    let id = composite_id(&family_tag, parution.as_deref().unwrap_or_default(), &numero);

    PriorPublication {
        id,
        family_tag,
        parution,
        numero_annonce,
        date_parution,
        extra: raw,
    }
}

fn normalize_judgment(mut raw: RawFields) -> Judgment {
    Judgment {
        famille: raw.take_text("famille"),
        nature: raw.take_text("nature"),
        date: raw.take_text("date"),
        complement_jugement: raw.take_text("complementJugement"),
        extra: raw,
    }
}

fn normalize_trade_inscription(mut raw: RawFields) -> TradeInscription {
    TradeInscription {
        numero_identification: raw.take_text("numeroIdentificationRM"),
        code: raw.take_text("codeRM"),
        numero_departement: raw.take_text("numeroDepartement"),
        extra: raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::raw_fields;
    use crate::models::{ActKind, PersonKind};

    fn context(family: Family) -> DocumentContext {
        DocumentContext::new(family, "20210042", "2021-03-01")
    }

    #[test]
    fn test_company_filing_announcement() {
        let avis = raw_fields(
            "<avis>
                <nojo>BXA20210420004512</nojo>
                <numeroAnnonce>17</numeroAnnonce>
                <numeroDepartement>75</numeroDepartement>
                <tribunal>GREFFE DU TRIBUNAL DE COMMERCE DE PARIS</tribunal>
                <typeAnnonce><creation/></typeAnnonce>
                <personnes><personne><personneMorale>
                    <denomination>ATELIER NORD</denomination>
                    <numeroImmatriculation>
                        <numeroIdentificationRCS>899 123 456</numeroIdentificationRCS>
                    </numeroImmatriculation>
                </personneMorale></personne></personnes>
                <etablissement>
                    <qualiteEtablissement>Siège et établissement principal</qualiteEtablissement>
                    <activite>Menuiserie</activite>
                </etablissement>
                <acte><immatriculation>
                    <categorieImmatriculation>Immatriculation</categorieImmatriculation>
                </immatriculation></acte>
            </avis>",
        );

        let announcement = assemble_announcement(avis, &context(Family::CompanyFiling)).unwrap();

        assert_eq!(announcement.id, "RCS-A_20210042_17");
        assert_eq!(announcement.numero_annonce, Some(17));
        assert_eq!(announcement.nojo.as_deref(), Some("BXA20210420004512"));
        assert_eq!(announcement.personnes.len(), 1);
        assert_eq!(announcement.personnes[0].siren.as_deref(), Some("899123456"));
        assert_eq!(announcement.etablissements[0].siege, Some(true));
        assert_eq!(announcement.acte.unwrap().kind, ActKind::Immatriculation);
    }

    #[test]
    fn test_unknown_field_is_a_structural_error() {
        let avis = raw_fields("<avis><numeroAnnonce>3</numeroAnnonce><champNouveau>x</champNouveau></avis>");

        let err = assemble_announcement(avis, &context(Family::CompanyFiling)).unwrap_err();

        assert_eq!(err.context, "avis");
        assert_eq!(err.keys, vec!["champNouveau"]);
    }

    #[test]
    fn test_balance_sheet_root_company() {
        let avis = raw_fields(
            "<avis>
                <numeroAnnonce>501</numeroAnnonce>
                <numeroImmatriculation>
                    <numeroIdentificationRCS>552 100 554</numeroIdentificationRCS>
                    <codeRCS>RCS</codeRCS>
                    <nomGreffeImmat>Marseille</nomGreffeImmat>
                </numeroImmatriculation>
                <denomination>SOCIETE DES EAUX</denomination>
                <formeJuridique>Société anonyme</formeJuridique>
                <adresse><france><ville>Marseille</ville></france></adresse>
                <depot><dateCloture>2020-12-31</dateCloture><typeDepot>Comptes annuels</typeDepot></depot>
            </avis>",
        );

        let announcement = assemble_announcement(avis, &context(Family::BalanceSheet)).unwrap();

        let person = &announcement.personnes[0];
        assert_eq!(person.kind, Some(PersonKind::Moral));
        assert_eq!(person.denomination.as_deref(), Some("SOCIETE DES EAUX"));
        assert_eq!(person.siren.as_deref(), Some("552100554"));
        assert_eq!(person.adresse.as_ref().unwrap().ville.as_deref(), Some("Marseille"));
        assert!(announcement.adresse.is_none());
        let act = announcement.acte.unwrap();
        assert_eq!(act.kind, ActKind::Depot);
        assert_eq!(act.categorie.as_deref(), Some("Comptes annuels"));
    }

    #[test]
    fn test_collective_proceeding_announcement() {
        let avis = raw_fields(
            "<annonce>
                <numeroAnnonce>88</numeroAnnonce>
                <personneMorale>
                    <denomination>BTP CONSTRUCTIONS</denomination>
                    <formeJuridique>SAS</formeJuridique>
                </personneMorale>
                <numeroImmatriculation>
                    <numeroIdentificationRCS>451 234 567</numeroIdentificationRCS>
                </numeroImmatriculation>
                <adresse><france><nomVoie>de la Gare</nomVoie><ville>Dijon</ville></france></adresse>
                <identifiantClient>C-1</identifiantClient>
                <jugement>
                    <famille>Jugement d'ouverture</famille>
                    <nature>Redressement judiciaire</nature>
                    <date>28 septembre 2021</date>
                </jugement>
                <parutionAvisPrecedent>
                    <nomPublication>BODACC A</nomPublication>
                    <numeroParution>20200150</numeroParution>
                    <dateParution>3 août 2020</dateParution>
                    <numeroAnnonce>0012</numeroAnnonce>
                </parutionAvisPrecedent>
            </annonce>",
        );

        let announcement =
            assemble_announcement(avis, &context(Family::CollectiveProceeding)).unwrap();

        let person = &announcement.personnes[0];
        assert_eq!(person.kind, Some(PersonKind::Moral));
        assert_eq!(person.siren.as_deref(), Some("451234567"));
        assert_eq!(announcement.adresse.as_ref().unwrap().ville.as_deref(), Some("Dijon"));
        assert_eq!(announcement.identifiant_client, vec!["C-1"]);
        assert_eq!(announcement.jugement[0].nature.as_deref(), Some("Redressement judiciaire"));
        assert!(announcement.acte.is_none());

        let prior = announcement.parution_avis_precedent.unwrap();
        assert_eq!(prior.family_tag, "RCS-A");
        assert_eq!(prior.parution.as_deref(), Some("20200150"));
        assert_eq!(prior.date_parution.as_deref(), Some("2020-08-03"));
        assert_eq!(prior.numero_annonce, Some(12));
        assert_eq!(prior.id, "RCS-A_20200150_12");
    }

    #[test]
    fn test_unknown_publication_name_is_kept() {
        let prior = normalize_prior_publication(raw_fields(
            "<parutionAvisPrecedent>
                <nomPublication>Journal d'annonces</nomPublication>
                <numeroParution>7</numeroParution>
                <numeroAnnonce>3</numeroAnnonce>
            </parutionAvisPrecedent>",
        ));

        assert_eq!(prior.family_tag, "Journal d'annonces");
        assert_eq!(prior.id, "Journal d'annonces_7_3");
    }

    #[test]
    fn test_previous_holders_from_general_modification() {
        let avis = raw_fields(
            "<avis>
                <numeroAnnonce>9</numeroAnnonce>
                <modificationsGenerales>
                    <descriptif>Reprise du fonds</descriptif>
                    <precedentExploitantPM><denomination>ANCIEN A</denomination></precedentExploitantPM>
                    <precedentExploitantPP><nom>Petit</nom></precedentExploitantPP>
                </modificationsGenerales>
            </avis>",
        );

        let announcement = assemble_announcement(avis, &context(Family::Modification)).unwrap();

        assert_eq!(announcement.precedent_exploitants.len(), 2);
        assert_eq!(announcement.precedent_exploitants[0].denomination.as_deref(), Some("ANCIEN A"));
        assert_eq!(announcement.precedent_exploitants[1].nom.as_deref(), Some("Petit"));
        assert!(announcement
            .precedent_exploitants
            .iter()
            .all(|person| person.kind == Some(PersonKind::Moral)));
    }

    #[test]
    fn test_stage1_skips_only_the_broken_announcement() {
        let document = SplitDocument {
            family: Family::Modification,
            parution: "20210050".into(),
            date_parution: "2021-03-12".into(),
            announcements: vec![
                raw_fields("<avis><numeroAnnonce>1</numeroAnnonce><radiationAuRCS/></avis>"),
                raw_fields("<avis><numeroAnnonce>2</numeroAnnonce><inconnu>?</inconnu></avis>"),
                raw_fields("<avis><numeroAnnonce>3</numeroAnnonce></avis>"),
            ],
        };

        let result = execute_stage1(document);

        assert_eq!(result.announcements.len(), 2);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].id, "RCS-B_20210050_2");
        assert_eq!(result.rejected[0].error.keys, vec!["inconnu"]);
    }

    mod exhaustion {
        use super::*;
        use proptest::prelude::*;

        /// Optional fields that can appear together, each fully understood
        const OPTIONAL_FIELDS: [&str; 18] = [
            "<nojo>BXB2021</nojo>",
            "<numeroDepartement>69</numeroDepartement>",
            "<tribunal>GREFFE DE LYON</tribunal>",
            "<personnes><personne><personnePhysique><nom>Roux</nom><prenom>Léa</prenom></personnePhysique></personne></personnes>",
            "<etablissement><qualiteEtablissement>Siège</qualiteEtablissement><adresse><ville>Lyon</ville></adresse></etablissement>",
            "<parutionAvisPrecedent><nomPublication>BODACC B</nomPublication><numeroParution>1</numeroParution><numeroAnnonce>2</numeroAnnonce></parutionAvisPrecedent>",
            "<precedentProprietairePM><denomination>ANCIENNE SARL</denomination></precedentProprietairePM>",
            "<precedentProprietairePP><nom>Blanc</nom></precedentProprietairePP>",
            "<precedentExploitantPM><denomination>GERANCE SAS</denomination></precedentExploitantPM>",
            "<precedentExploitantPP><nom>Noir</nom></precedentExploitantPP>",
            "<identifiantClient>0001</identifiantClient>",
            "<activite>Boulangerie</activite>",
            "<jugement><famille>Jugement d'ouverture</famille><nature>Redressement judiciaire</nature></jugement>",
            "<jugementAnnule><famille>Jugement</famille></jugementAnnule>",
            "<inscriptionRM><numeroIdentificationRM>123</numeroIdentificationRM><codeRM>RM</codeRM></inscriptionRM>",
            "<nonInscrit>oui</nonInscrit>",
            "<adresse><france><ville>Dijon</ville></france></adresse>",
            "<enseigne>Chez Léa</enseigne>",
        ];

        /// Act shapes exclude one another: at most one per announcement
        fn act_shape() -> impl Strategy<Value = &'static str> {
            prop_oneof![
                Just(""),
                Just("<typeAnnonce><avis/></typeAnnonce>"),
                Just("<acte><vente><categorieVente>Vente</categorieVente></vente></acte>"),
                Just("<radiationAuRCS><radiationPM>O</radiationPM><commentaire>x</commentaire></radiationAuRCS>"),
                Just("<modificationGenerale><descriptif>Transfert</descriptif><precedentExploitantPP><nom>Roux</nom></precedentExploitantPP></modificationGenerale>"),
                Just("<depot><typeDepot>Comptes annuels</typeDepot><dateCloture>2020-12-31</dateCloture></depot>"),
                Just("<typeAnnonce><annulation/></typeAnnonce>"),
            ]
        }

        /// Root-level single-person shapes, also mutually exclusive
        fn root_person() -> impl Strategy<Value = &'static str> {
            prop_oneof![
                Just(""),
                Just("<personneMorale><denomination>DEBITRICE SARL</denomination></personneMorale>"),
                Just("<personnePhysique><nom>Petit</nom></personnePhysique>"),
                Just("<numeroImmatriculation><numeroIdentificationRCS>111 222 333</numeroIdentificationRCS></numeroImmatriculation><denomination>BILAN SA</denomination><formeJuridique>SA</formeJuridique>"),
            ]
        }

        fn family() -> impl Strategy<Value = Family> {
            prop_oneof![
                Just(Family::CompanyFiling),
                Just(Family::Modification),
                Just(Family::BalanceSheet),
                Just(Family::CollectiveProceeding),
            ]
        }

        /// Entries whose shape does not fit their field, with the key the
        /// exhaustion check must report
        const WRONG_SHAPES: [(&str, &str); 6] = [
            ("<activite><libelle>Boulangerie</libelle></activite>", "activite"),
            ("<identifiantClient><code>1</code></identifiantClient>", "identifiantClient"),
            ("<jugement>texte libre</jugement>", "jugement"),
            ("<etablissement>texte libre</etablissement>", "etablissement"),
            ("<precedentExploitantPM>texte libre</precedentExploitantPM>", "precedentExploitantPM"),
            ("<radiationAuRCS/><radiationAuRCS/>", "radiationAuRCS"),
        ];

        fn build(present: &[bool], shapes: &[&str], tail: &str) -> RawFields {
            let mut xml = String::from("<avis><numeroAnnonce>5</numeroAnnonce>");
            for (field, keep) in OPTIONAL_FIELDS.iter().zip(present) {
                if *keep {
                    xml.push_str(field);
                }
            }
            for shape in shapes {
                xml.push_str(shape);
            }
            xml.push_str(tail);
            xml.push_str("</avis>");
            raw_fields(&xml)
        }

        proptest! {
            #[test]
            fn test_known_fields_always_assemble(
                present in proptest::collection::vec(any::<bool>(), OPTIONAL_FIELDS.len()),
                act in act_shape(),
                person in root_person(),
                family in family(),
            ) {
                let avis = build(&present, &[act, person], "");
                let result = assemble_announcement(avis, &context(family));
                prop_assert!(result.is_ok(), "{:?}", result.err());
            }

            #[test]
            fn test_unknown_field_is_always_named(
                present in proptest::collection::vec(any::<bool>(), OPTIONAL_FIELDS.len()),
                act in act_shape(),
                person in root_person(),
                family in family(),
                key in "zz[a-z]{1,10}",
            ) {
                let avis = build(&present, &[act, person], &format!("<{key}>valeur</{key}>"));
                let err = assemble_announcement(avis, &context(family)).unwrap_err();
                prop_assert_eq!(err.keys, vec![key]);
            }

            #[test]
            fn test_wrongly_shaped_field_is_always_named(
                present in proptest::collection::vec(any::<bool>(), OPTIONAL_FIELDS.len()),
                person in root_person(),
                family in family(),
                wrong in proptest::sample::select(&WRONG_SHAPES[..]),
            ) {
                let (xml, key) = wrong;
                let avis = build(&present, &[person], xml);
                let err = assemble_announcement(avis, &context(family)).unwrap_err();
                prop_assert!(err.keys.iter().any(|k| k == key), "{} not in {:?}", key, err.keys);
            }
        }
    }

    #[test]
    fn test_structured_list_entries_are_not_dropped() {
        let avis = raw_fields(
            "<annonce>
                <numeroAnnonce>3</numeroAnnonce>
                <activite><libelle>Boulangerie</libelle></activite>
            </annonce>",
        );
        let err = assemble_announcement(avis, &context(Family::CollectiveProceeding)).unwrap_err();
        assert_eq!(err.keys, vec!["activite"]);

        let avis = raw_fields(
            "<avis>
                <numeroAnnonce>4</numeroAnnonce>
                <personnes><personne>texte libre</personne></personnes>
            </avis>",
        );
        let err = assemble_announcement(avis, &context(Family::CompanyFiling)).unwrap_err();
        assert_eq!(err.context, "personnes");
        assert_eq!(err.keys, vec!["personne"]);
    }

    #[test]
    fn test_repeated_radiation_is_rejected() {
        let avis = raw_fields(
            "<avis>
                <numeroAnnonce>6</numeroAnnonce>
                <radiationAuRCS><commentaire>premier</commentaire></radiationAuRCS>
                <radiationAuRCS><commentaire>second</commentaire></radiationAuRCS>
            </avis>",
        );

        let err = assemble_announcement(avis, &context(Family::Modification)).unwrap_err();

        assert_eq!(err.keys, vec!["radiationAuRCS"]);
    }
}
