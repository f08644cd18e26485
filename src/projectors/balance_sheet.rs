use super::{act_type, set_address, set_registration};
use crate::models::{Announcement, FlatRecord, BALANCE_SHEET_COLUMNS};

pub fn project(announcement: &Announcement) -> FlatRecord {
    let mut record = FlatRecord::with_columns(BALANCE_SHEET_COLUMNS);

    if let Some(person) = announcement.first_person() {
        record.set("typePers", &person.kind.map(|kind| kind.as_str()));
        set_address(&mut record, "adressePers", person.adresse.as_ref());
        record.set("denomination", &person.denomination);
        record.set("formeJuridique", &person.forme_juridique);
        record.set("sigle", &person.sigle);
        set_registration(&mut record, person.immatriculation.as_ref());
        record.set("siren", &person.siren);
    }

    let act = announcement.acte.as_ref();
    record.set("typeActe", act_type(act));
    if let Some(act) = act {
        record.set("dateCloture", &act.date_cloture);
        record.set("descriptif", &act.descriptif);
        record.set("categorie", &act.categorie);
        record.set("dateEffet", &act.date_effet);
        record.set("dateCommencementActivite", &act.date_commencement_activite);
        record.set("dateCessationActivite", &act.date_cessation_activite);
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Act, ActKind, Address, Family, Person, PersonKind};

    #[test]
    fn test_deposit_notice() {
        let mut announcement = Announcement::new(Family::BalanceSheet, "20210100", "2021-05-20");
        let mut act = Act::new(ActKind::Depot);
        act.date_cloture = Some("2020-12-31".into());
        act.categorie = Some("Comptes annuels et rapports".into());
        announcement.acte = Some(act);
        announcement.personnes.push(Person {
            kind: Some(PersonKind::Moral),
            denomination: Some("SOCIETE DES EAUX".into()),
            sigle: Some("SDE".into()),
            siren: Some("552100554".into()),
            adresse: Some(Address {
                pays: Some("FRANCE".into()),
                localite: Some("Zone artisanale".into()),
                code_postal: Some("13100".into()),
                ..Default::default()
            }),
            ..Default::default()
        });

        let record = project(&announcement);

        assert_eq!(record.get("typeActe"), Some("depot"));
        assert_eq!(record.get("dateCloture"), Some("2020-12-31"));
        assert_eq!(record.get("categorie"), Some("Comptes annuels et rapports"));
        assert_eq!(record.get("sigle"), Some("SDE"));
        assert_eq!(record.get("siren"), Some("552100554"));
        assert_eq!(record.get("adressePers_complGeographique"), Some("Zone artisanale"));
        assert_eq!(record.get("immatriculation_codeRCS"), Some(""));
    }
}
