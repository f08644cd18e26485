use tracing::warn;

use crate::models::{Address, RawFields, RawNode};

/// Normalize a raw address
///
/// Two source shapes exist. The country-keyed one nests the fields under a
/// single `france` / `etranger` key: the key is promoted, upper-cased, to
/// `pays` and the nested fields are merged up (a nested `pays`, such as the
/// name of a foreign country, wins). The flat one already carries the fields
/// and maps across unchanged, so normalizing twice is a no-op.
pub fn normalize_address(mut raw: RawFields) -> Option<Address> {
    if raw.is_empty() {
        return None;
    }

    if is_country_keyed(&raw) {
        if raw.len() > 1 {
            warn!("Multiple addresses, keeping the first: {:?}", raw.keys().collect::<Vec<_>>());
        }
        if let Some((country, nested)) = raw.take_first() {
            let mut flat = RawFields::new();
            flat.insert("pays", RawNode::Text(country.to_uppercase()));
            if let Some(nested) = nested.into_fields() {
                flat.merge(nested);
            }
            flat.merge(raw);
            raw = flat;
        }
    }

    let address = Address {
        pays: raw.take_text("pays"),
        numero_voie: raw.take_text("numeroVoie"),
        type_voie: raw.take_text("typeVoie"),
        nom_voie: raw.take_text("nomVoie"),
        compl_geographique: raw.take_text("complGeographique"),
        localite: raw.take_text("localite"),
        code_postal: raw.take_text("codePostal"),
        ville: raw.take_text("ville"),
        adresse: raw.take_text("adresse"),
        extra: raw,
    };
    Some(address)
}

fn is_country_keyed(raw: &RawFields) -> bool {
    match raw.iter().next() {
        Some((_, RawNode::Map(_))) => true,
        Some((key, node)) => node.is_blank() && matches!(key, "france" | "etranger"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::raw_fields;

    #[test]
    fn test_empty_address_is_absent() {
        assert_eq!(normalize_address(RawFields::new()), None);
    }

    #[test]
    fn test_french_address_is_promoted() {
        let raw = raw_fields(
            "<adresse><france>
                <numeroVoie>12</numeroVoie>
                <typeVoie>rue</typeVoie>
                <nomVoie>de la Paix</nomVoie>
                <codePostal>75002</codePostal>
                <ville>Paris</ville>
            </france></adresse>",
        );

        let address = normalize_address(raw).unwrap();

        assert_eq!(address.pays.as_deref(), Some("FRANCE"));
        assert_eq!(address.numero_voie.as_deref(), Some("12"));
        assert_eq!(address.type_voie.as_deref(), Some("rue"));
        assert_eq!(address.nom_voie.as_deref(), Some("de la Paix"));
        assert_eq!(address.code_postal.as_deref(), Some("75002"));
        assert_eq!(address.ville.as_deref(), Some("Paris"));
        assert!(address.extra.is_empty());
    }

    #[test]
    fn test_foreign_address_keeps_country_name() {
        let raw = raw_fields(
            "<adresse><etranger>
                <adresse>Avenue Louise 54, 1050 Bruxelles</adresse>
                <pays>Belgique</pays>
            </etranger></adresse>",
        );

        let address = normalize_address(raw).unwrap();

        assert_eq!(address.pays.as_deref(), Some("Belgique"));
        assert_eq!(address.adresse.as_deref(), Some("Avenue Louise 54, 1050 Bruxelles"));
    }

    #[test]
    fn test_multiple_country_keys_first_wins() {
        let raw = raw_fields(
            "<adresse>
                <france><ville>Lyon</ville></france>
                <etranger><pays>Suisse</pays></etranger>
            </adresse>",
        );

        let address = normalize_address(raw).unwrap();

        assert_eq!(address.pays.as_deref(), Some("FRANCE"));
        assert_eq!(address.ville.as_deref(), Some("Lyon"));
        assert_eq!(address.extra.keys().collect::<Vec<_>>(), vec!["etranger"]);
    }

    #[test]
    fn test_flat_address_is_idempotent() {
        let raw = raw_fields(
            "<adresse>
                <pays>FRANCE</pays>
                <numeroVoie>3</numeroVoie>
                <nomVoie>Grande Rue</nomVoie>
                <localite>Le Bourg</localite>
                <codePostal>35000</codePostal>
                <ville>Rennes</ville>
            </adresse>",
        );

        let once = normalize_address(raw.clone()).unwrap();
        assert_eq!(once.pays.as_deref(), Some("FRANCE"));
        assert_eq!(once.localite.as_deref(), Some("Le Bourg"));

        let promoted = raw_fields(
            "<adresse><france>
                <numeroVoie>3</numeroVoie>
                <nomVoie>Grande Rue</nomVoie>
                <localite>Le Bourg</localite>
                <codePostal>35000</codePostal>
                <ville>Rennes</ville>
            </france></adresse>",
        );
        assert_eq!(normalize_address(promoted).unwrap(), once);
    }
}
