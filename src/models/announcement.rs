use serde::Serialize;

use super::{Family, RawFields};

/// Join family tag, publication number and announcement number into an id
pub fn composite_id(family_tag: &str, parution: &str, numero_annonce: &str) -> String {
    [family_tag, parution, numero_annonce].join("_")
}

/// Canonical form of one announcement, whatever family it came from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub family: Family,
    pub parution: String,
    pub date_parution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_annonce: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nojo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_departement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tribunal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acte: Option<Act>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub etablissements: Vec<Establishment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub personnes: Vec<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parution_avis_precedent: Option<PriorPublication>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub precedent_proprietaires: Vec<Person>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub precedent_exploitants: Vec<Person>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub identifiant_client: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activite: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jugement: Vec<Judgment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jugement_annule: Option<Judgment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enseigne: Option<String>,
    #[serde(rename = "inscriptionRM", skip_serializing_if = "Option::is_none")]
    pub inscription_rm: Option<TradeInscription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_inscrit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<Address>,
}

impl Announcement {
    /// Empty announcement carrying only the document-level metadata
    pub fn new(family: Family, parution: &str, date_parution: &str) -> Self {
        Self {
            id: String::new(),
            family,
            parution: parution.to_string(),
            date_parution: date_parution.to_string(),
            numero_annonce: None,
            nojo: None,
            numero_departement: None,
            tribunal: None,
            acte: None,
            etablissements: Vec::new(),
            personnes: Vec::new(),
            parution_avis_precedent: None,
            precedent_proprietaires: Vec::new(),
            precedent_exploitants: Vec::new(),
            identifiant_client: Vec::new(),
            activite: Vec::new(),
            jugement: Vec::new(),
            jugement_annule: None,
            enseigne: None,
            inscription_rm: None,
            non_inscrit: None,
            adresse: None,
        }
    }

    /// First establishment; multi-subject announcements are flattened to it
    pub fn first_establishment(&self) -> Option<&Establishment> {
        self.etablissements.first()
    }

    /// First person; multi-subject announcements are flattened to it
    pub fn first_person(&self) -> Option<&Person> {
        self.personnes.first()
    }
}

/// Legal event reported by an announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ActKind {
    Immatriculation,
    Creation,
    Vente,
    Radiation,
    ModificationGenerale,
    Depot,
    Annulation,
    /// Any other tag found in an explicit act container
    Other(String),
}

impl ActKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "immatriculation" => ActKind::Immatriculation,
            "creation" => ActKind::Creation,
            "vente" => ActKind::Vente,
            "radiation" => ActKind::Radiation,
            "modificationGenerale" => ActKind::ModificationGenerale,
            "depot" => ActKind::Depot,
            "annulation" => ActKind::Annulation,
            other => ActKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActKind::Immatriculation => "immatriculation",
            ActKind::Creation => "creation",
            ActKind::Vente => "vente",
            ActKind::Radiation => "radiation",
            ActKind::ModificationGenerale => "modificationGenerale",
            ActKind::Depot => "depot",
            ActKind::Annulation => "annulation",
            ActKind::Other(tag) => tag,
        }
    }
}

impl From<ActKind> for String {
    fn from(kind: ActKind) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Act {
    #[serde(rename = "type")]
    pub kind: ActKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_effet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_commencement_activite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_cessation_activite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_immatriculation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_cloture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptif: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentaire: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub opposition: Vec<super::RawNode>,
    /// Payload fields with no dedicated slot
    #[serde(flatten)]
    pub extra: RawFields,
}

impl Act {
    pub fn new(kind: ActKind) -> Self {
        Self {
            kind,
            categorie: None,
            date_effet: None,
            date_commencement_activite: None,
            date_cessation_activite: None,
            date_immatriculation: None,
            date_cloture: None,
            descriptif: None,
            commentaire: None,
            opposition: Vec::new(),
            extra: RawFields::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PersonKind {
    #[serde(rename = "personneMorale")]
    Moral,
    #[serde(rename = "personnePhysique")]
    Physical,
}

impl PersonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonKind::Moral => "personneMorale",
            PersonKind::Physical => "personnePhysique",
        }
    }
}

/// A legal (moral) or natural (physical) person named by an announcement
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PersonKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denomination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forme_juridique: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital: Option<Capital>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immatriculation: Option<Registration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prenom: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationalite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_inscrit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etablissement_principal: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub siege_social: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub siren: Option<String>,
    #[serde(flatten)]
    pub extra: RawFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capital {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub montant: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devise: Option<String>,
    pub capital_variable: bool,
    #[serde(flatten)]
    pub extra: RawFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_identification: Option<String>,
    #[serde(rename = "codeRCS", skip_serializing_if = "Option::is_none")]
    pub code_rcs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom_greffe_immat: Option<String>,
    #[serde(flatten)]
    pub extra: RawFields,
}

/// Postal address after country-key promotion
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pays: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_voie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_voie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom_voie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compl_geographique: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_postal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    /// Free-text address of a foreign location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
    #[serde(flatten)]
    pub extra: RawFields,
}

impl Address {
    /// Geographic complement, falling back to locality then foreign text
    pub fn complement(&self) -> Option<&str> {
        self.compl_geographique
            .as_deref()
            .or(self.localite.as_deref())
            .or(self.adresse.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Establishment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualite: Option<String>,
    /// Head office flag, only known when a qualifier was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub siege: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enseigne: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origine_fonds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix_fonds: Option<f64>,
    #[serde(flatten)]
    pub extra: RawFields,
}

/// Reference to the earlier notice an announcement amends or cancels
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorPublication {
    #[serde(rename = "_id")]
    pub id: String,
    /// Family tag, or the raw publication name when it is not a known family
    #[serde(rename = "type")]
    pub family_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_annonce: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_parution: Option<String>,
    #[serde(flatten)]
    pub extra: RawFields,
}

/// Court judgment of a collective proceeding
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Judgment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub famille: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement_jugement: Option<String>,
    #[serde(flatten)]
    pub extra: RawFields,
}

/// Inscription in the trade register (répertoire des métiers)
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInscription {
    #[serde(rename = "numeroIdentificationRM", skip_serializing_if = "Option::is_none")]
    pub numero_identification: Option<String>,
    #[serde(rename = "codeRM", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_departement: Option<String>,
    #[serde(flatten)]
    pub extra: RawFields,
}
