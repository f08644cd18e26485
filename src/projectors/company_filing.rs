use super::{act_type, set_address, set_capital, set_registration};
use crate::models::{Announcement, FlatRecord, COMPANY_FILING_COLUMNS};

/// Project a company filing, keeping it only when its act type contains
/// `category` (case-insensitive)
pub fn project(announcement: &Announcement, category: &str) -> Option<FlatRecord> {
    let act = announcement.acte.as_ref();
    let type_acte = act_type(act);
    if !type_acte.to_uppercase().contains(&category.to_uppercase()) {
        return None;
    }

    let mut record = FlatRecord::with_columns(COMPANY_FILING_COLUMNS);

    if let Some(etab) = announcement.first_establishment() {
        record.set("origineFonds", &etab.origine_fonds);
        record.set("activite", &etab.activite);
        set_address(&mut record, "adresseEtab", etab.adresse.as_ref());
        record.set("qualite", &etab.qualite);
        record.set("siege", &etab.siege);
        record.set("prixFonds", &etab.prix_fonds);
    }

    if let Some(person) = announcement.first_person() {
        set_capital(&mut record, person.capital.as_ref());
        set_address(&mut record, "adressePers", person.adresse.as_ref());
        record.set("typePers", &person.kind.map(|kind| kind.as_str()));
        set_registration(&mut record, person.immatriculation.as_ref());
        record.set("nonInscrit", &person.non_inscrit);
        record.set("denomination", &person.denomination);
        record.set("formeJuridique", &person.forme_juridique);
        record.set("administration", &person.administration);
    }

    record.set("typeActe", type_acte);
    if let Some(act) = act {
        record.set("dateImmatriculation", &act.date_immatriculation);
        record.set("dateCommencementActivite", &act.date_commencement_activite);
        record.set("categorie", &act.categorie);
        record.set("dateEffet", &act.date_effet);
        record.set("dateCessationActivite", &act.date_cessation_activite);
    }

    Some(record)
}
