use tracing::warn;

use super::normalize_date;
use crate::error::StructuralError;
use crate::models::{Act, ActKind, RawFields, RawNode};

const CATEGORY_KEYS: [&str; 3] = [
    "categorieVente",
    "categorieImmatriculation",
    "categorieCreation",
];

/// Keys of a general modification that belong to the announcement itself
pub const PREVIOUS_HOLDER_KEYS: [&str; 4] = [
    "precedentProprietairePM",
    "precedentProprietairePP",
    "precedentExploitantPM",
    "precedentExploitantPP",
];

/// Raw shapes an act can take, in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActShape {
    /// `acte` container keyed by the act type
    Container,
    /// `radiationAuRCS`
    Radiation,
    /// `modificationGenerale` (or its plural spelling)
    GeneralModification,
    /// `depot`
    Deposit,
    /// `typeAnnonce` holding an `annulation` marker
    Cancellation,
}

impl ActShape {
    const PRIORITY: [ActShape; 5] = [
        ActShape::Container,
        ActShape::Radiation,
        ActShape::GeneralModification,
        ActShape::Deposit,
        ActShape::Cancellation,
    ];

    fn is_present(&self, avis: &RawFields) -> bool {
        match self {
            ActShape::Container => avis.contains("acte"),
            ActShape::Radiation => avis.contains("radiationAuRCS"),
            ActShape::GeneralModification => avis.contains("modificationGenerale"),
            ActShape::Deposit => avis.contains("depot"),
            ActShape::Cancellation => matches!(
                avis.get("typeAnnonce"),
                Some(RawNode::Map(marker)) if marker.contains("annulation")
            ),
        }
    }
}

/// Take the act out of a raw announcement
///
/// Only the first shape found is consumed. Any lower-priority shape stays
/// in the announcement and fails its exhaustion check; `typeAnnonce` is
/// always consumed. Previous owners and operators found in a general
/// modification are moved back onto the announcement.
pub fn extract_act(avis: &mut RawFields) -> Result<Option<Act>, StructuralError> {
    avis.rename(&["modificationGenerale", "modificationsGenerales"], "modificationGenerale");

    let act = match detect_shape(avis) {
        Some(ActShape::Container) => extract_container(avis)?,
        Some(ActShape::Radiation) => extract_radiation(avis)?,
        Some(ActShape::GeneralModification) => extract_general_modification(avis)?,
        Some(ActShape::Deposit) => {
            let mut payload = take_payload(avis, "depot")?;
            payload.rename(&["typeDepot"], "categorie");
            Some(act_from_payload(ActKind::Depot, payload))
        }
        Some(ActShape::Cancellation) => Some(Act::new(ActKind::Annulation)),
        None => None,
    };
    avis.take("typeAnnonce");

    Ok(act.map(normalize_act_dates))
}

fn detect_shape(avis: &RawFields) -> Option<ActShape> {
    ActShape::PRIORITY
        .into_iter()
        .find(|shape| shape.is_present(avis))
}

fn extract_container(avis: &mut RawFields) -> Result<Option<Act>, StructuralError> {
    let mut container = take_payload(avis, "acte")?;
    let Some((tag, payload)) = container.take_first() else {
        warn!("Empty act container");
        return Ok(None);
    };
    container.ensure_exhausted("acte")?;

    let mut payload = payload_fields(payload, &format!("acte.{tag}"))?;
    payload.rename(&CATEGORY_KEYS, "categorie");
    if !payload.contains("categorie") {
        warn!("Act {} without category, defaulting to empty", tag);
        payload.insert("categorie", RawNode::Text(String::new()));
    }
    Ok(Some(act_from_payload(ActKind::from_tag(&tag), payload)))
}

fn extract_radiation(avis: &mut RawFields) -> Result<Option<Act>, StructuralError> {
    // a bare `<radiationAuRCS/>` or a text marker carries no detail
    let mut container = match avis.take("radiationAuRCS") {
        Some(RawNode::Map(fields)) => fields,
        Some(RawNode::List(_)) => {
            return Err(StructuralError {
                context: "radiationAuRCS".to_string(),
                keys: vec!["radiationAuRCS".to_string()],
            });
        }
        Some(RawNode::Text(_)) | None => RawFields::new(),
    };
    let mut act = Act::new(ActKind::Radiation);

    if let Some(mut pp) = container.take_fields("radiationPP") {
        act.date_cessation_activite = pp.take_text("dateCessationActivitePP");
        pp.ensure_exhausted("radiationAuRCS.radiationPP")?;
    }

    match container.take("radiationPM") {
        Some(RawNode::Map(mut pm)) => {
            if act.date_cessation_activite.is_none() {
                act.date_cessation_activite = pm.take_text("dateCessationActivitePM");
            }
            pm.ensure_exhausted("radiationAuRCS.radiationPM")?;
        }
        Some(RawNode::Text(flag)) => {
            if flag != "O" {
                warn!("Unexpected radiationPM flag {:?}", flag);
            }
        }
        Some(other) => container.insert("radiationPM", other),
        None => {}
    }

    act.commentaire = container.take_text("commentaire");
    container.ensure_exhausted("radiationAuRCS")?;
    Ok(Some(act))
}

fn extract_general_modification(avis: &mut RawFields) -> Result<Option<Act>, StructuralError> {
    let mut payload = take_payload(avis, "modificationGenerale")?;
    payload.relocate(avis, &PREVIOUS_HOLDER_KEYS);
    Ok(Some(act_from_payload(ActKind::ModificationGenerale, payload)))
}

/// Take an act shape's payload; blank elements have none
fn take_payload(avis: &mut RawFields, key: &str) -> Result<RawFields, StructuralError> {
    match avis.take(key) {
        Some(node) => payload_fields(node, key),
        None => Ok(RawFields::new()),
    }
}

fn payload_fields(node: RawNode, context: &str) -> Result<RawFields, StructuralError> {
    match node {
        RawNode::Map(fields) => Ok(fields),
        RawNode::Text(text) if text.is_empty() => Ok(RawFields::new()),
        RawNode::Text(text) => {
            // free text where a payload was expected
            let mut fields = RawFields::new();
            fields.insert("descriptif", RawNode::Text(text));
            Ok(fields)
        }
        RawNode::List(_) => Err(StructuralError {
            context: context.to_string(),
            keys: vec![context.rsplit('.').next().unwrap_or(context).to_string()],
        }),
    }
}

/// Move the modelled fields of a payload onto an act, the rest into `extra`
fn act_from_payload(kind: ActKind, mut payload: RawFields) -> Act {
    Act {
        kind,
        categorie: payload.take_text("categorie"),
        date_effet: payload.take_text("dateEffet"),
        date_commencement_activite: payload.take_text("dateCommencementActivite"),
        date_cessation_activite: payload.take_text("dateCessationActivite"),
        date_immatriculation: payload.take_text("dateImmatriculation"),
        date_cloture: payload.take_text("dateCloture"),
        descriptif: payload.take_text("descriptif"),
        commentaire: payload.take_text("commentaire"),
        opposition: payload.take_list("opposition").unwrap_or_default(),
        extra: payload,
    }
}

fn normalize_act_dates(mut act: Act) -> Act {
    for date in [
        &mut act.date_effet,
        &mut act.date_commencement_activite,
        &mut act.date_cessation_activite,
    ] {
        if let Some(text) = date.as_mut() {
            *text = normalize_date(text);
        }
    }
    act
}
