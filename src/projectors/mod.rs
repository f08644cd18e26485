//! Flattening of canonical announcements into each family's output columns
//!
//! Every projector reads only the first establishment and the first person
//! of an announcement; later subjects are not projected.

pub mod balance_sheet;
pub mod collective_proceeding;
pub mod company_filing;
pub mod modification;

use crate::models::{Act, Address, Announcement, Capital, Family, FlatRecord, Registration};

/// Project an announcement onto its family's columns
///
/// `category` filters company filings on their act type; the other
/// families always produce a record.
pub fn project_family(announcement: &Announcement, category: &str) -> Option<FlatRecord> {
    match announcement.family {
        Family::CompanyFiling => company_filing::project(announcement, category),
        Family::Modification => Some(modification::project(announcement)),
        Family::BalanceSheet => Some(balance_sheet::project(announcement)),
        Family::CollectiveProceeding => Some(collective_proceeding::project(announcement)),
    }
}

/// Write `<prefix>_pays` .. `<prefix>_ville`
///
/// The geographic complement falls back to the locality, then to the free
/// text of a foreign address.
pub(crate) fn set_address(record: &mut FlatRecord, prefix: &str, address: Option<&Address>) {
    let Some(address) = address else {
        return;
    };
    record.set(&format!("{prefix}_pays"), &address.pays);
    record.set(&format!("{prefix}_numeroVoie"), &address.numero_voie);
    record.set(&format!("{prefix}_typeVoie"), &address.type_voie);
    record.set(&format!("{prefix}_nomVoie"), &address.nom_voie);
    record.set(&format!("{prefix}_complGeographique"), &address.complement());
    record.set(&format!("{prefix}_codePostal"), &address.code_postal);
    record.set(&format!("{prefix}_ville"), &address.ville);
}

pub(crate) fn set_registration(record: &mut FlatRecord, registration: Option<&Registration>) {
    let Some(registration) = registration else {
        return;
    };
    record.set(
        "immatriculation_numeroIdentification",
        &registration.numero_identification,
    );
    record.set("immatriculation_codeRCS", &registration.code_rcs);
    record.set("immatriculation_nomGreffeImmat", &registration.nom_greffe_immat);
}

pub(crate) fn set_capital(record: &mut FlatRecord, capital: Option<&Capital>) {
    let Some(capital) = capital else {
        return;
    };
    record.set("capital_devise", &capital.devise);
    record.set("capital_montant", &capital.montant);
    record.set("capital_capitalVariable", &capital.capital_variable);
}

/// Act type column; an announcement without act projects an empty type
pub(crate) fn act_type(act: Option<&Act>) -> &str {
    act.map(|act| act.kind.as_str()).unwrap_or_default()
}
