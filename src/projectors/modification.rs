use super::{act_type, set_address, set_capital, set_registration};
use crate::models::{Announcement, FlatRecord, MODIFICATION_COLUMNS};

pub fn project(announcement: &Announcement) -> FlatRecord {
    let mut record = FlatRecord::with_columns(MODIFICATION_COLUMNS);

    if let Some(person) = announcement.first_person() {
        record.set("activite", &person.activite);
        set_address(&mut record, "adresseSiegeSocial", person.siege_social.as_ref());
        set_address(&mut record, "adresseEtab", person.etablissement_principal.as_ref());
        record.set("typePers", &person.kind.map(|kind| kind.as_str()));
        record.set("nomPers", &person.nom);
        record.set("prenomPers", &person.prenom.first());
        set_address(&mut record, "adressePers", person.adresse.as_ref());
        record.set("denomination", &person.denomination);
        record.set("formeJuridique", &person.forme_juridique);
        record.set("administration", &person.administration);
        set_capital(&mut record, person.capital.as_ref());
        record.set("sigle", &person.sigle);
        set_registration(&mut record, person.immatriculation.as_ref());
        record.set("siren", &person.siren);
    }

    let act = announcement.acte.as_ref();
    record.set("typeActe", act_type(act));
    if let Some(act) = act {
        record.set("descriptif", &act.descriptif);
        record.set("dateEffet", &act.date_effet);
        record.set("dateCommencementActivite", &act.date_commencement_activite);
        record.set("dateCessationActivite", &act.date_cessation_activite);
    }

    record
}
