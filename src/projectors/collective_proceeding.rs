use super::{set_address, set_registration};
use crate::models::{Announcement, FlatRecord, Judgment, PersonKind, COLLECTIVE_PROCEEDING_COLUMNS};

/// Separator for list-valued fields flattened into one cell
const LIST_SEPARATOR: &str = "; ";

pub fn project(announcement: &Announcement) -> FlatRecord {
    let mut record = FlatRecord::with_columns(COLLECTIVE_PROCEEDING_COLUMNS);
    let person = announcement.first_person();

    // the debtor's address sits at the announcement root
    let adresse = announcement
        .adresse
        .as_ref()
        .or_else(|| person.and_then(|person| person.adresse.as_ref()));
    set_address(&mut record, "adressePers", adresse);

    if let Some(person) = person {
        record.set("typePers", &person.kind.map(|kind| kind.as_str()));
        match person.kind {
            Some(PersonKind::Physical) => {
                record.set("nomPers", &person.nom);
                record.set("prenomPers", &person.prenom.first());
            }
            _ => {
                record.set("denomination", &person.denomination);
                record.set("formeJuridique", &person.forme_juridique);
            }
        }
        set_registration(&mut record, person.immatriculation.as_ref());
        record.set("siren", &person.siren);
    }

    record.set("nonInscrit", &announcement.non_inscrit);
    record.set("identifiantClient", &announcement.identifiant_client.join(LIST_SEPARATOR));
    record.set("activite", &announcement.activite.join(LIST_SEPARATOR));
    record.set("enseigne", &announcement.enseigne);

    if let Some(jugement) = announcement.jugement.first() {
        set_judgment(&mut record, "jugement", jugement);
        record.set("jugement_date", &jugement.date);
        record.set("jugement_complementJugement", &jugement.complement_jugement);
    }

    if let Some(inscription) = &announcement.inscription_rm {
        record.set("inscription_numeroIdentification", &inscription.numero_identification);
        record.set("inscription_code", &inscription.code);
        record.set("inscription_numeroDepartement", &inscription.numero_departement);
    }

    if let Some(prior) = &announcement.parution_avis_precedent {
        record.set("parutionAvisPrecedent_dateParution", &prior.date_parution);
        record.set("parutionAvisPrecedent_numeroAnnonce", &prior.numero_annonce);
        record.set("parutionAvisPrecedent_parution", &prior.parution);
        record.set("parutionAvisPrecedent_type", &prior.family_tag);
        record.set("parutionAvisPrecedent__id", &prior.id);
    }

    if let Some(annule) = &announcement.jugement_annule {
        set_judgment(&mut record, "jugementAnnule", annule);
    }

    record
}

fn set_judgment(record: &mut FlatRecord, prefix: &str, jugement: &Judgment) {
    record.set(&format!("{prefix}_famille"), &jugement.famille);
    record.set(&format!("{prefix}_nature"), &jugement.nature);
}
