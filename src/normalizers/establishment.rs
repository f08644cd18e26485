use super::{extract_price, normalize_address};
use crate::models::{Establishment, RawFields};

/// Country given to an establishment address that names none
pub const DEFAULT_COUNTRY: &str = "france";

const HEAD_OFFICE_MARKERS: [&str; 3] = ["principal", "siege", "siège"];

pub fn normalize_establishment(mut raw: RawFields) -> Establishment {
    raw.rename(&["qualiteEtablissement"], "qualite");
    let qualite = raw.take_text("qualite");
    let siege = qualite.as_deref().map(is_head_office);

    let adresse = raw.take_fields("adresse").and_then(normalize_address).map(|mut address| {
        address.pays.get_or_insert_with(|| DEFAULT_COUNTRY.to_string());
        address
    });

    let origine_fonds = raw.take_text("origineFonds");
    let prix_fonds = origine_fonds.as_deref().and_then(extract_price);

    Establishment {
        qualite,
        siege,
        adresse,
        activite: raw.take_text("activite"),
        enseigne: raw.take_text("enseigne"),
        origine_fonds,
        prix_fonds,
        extra: raw,
    }
}

fn is_head_office(qualite: &str) -> bool {
    let qualite = qualite.to_lowercase();
    HEAD_OFFICE_MARKERS.iter().any(|marker| qualite.contains(marker))
}
