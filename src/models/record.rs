use super::{Announcement, Family};

/// Columns shared by every family, ahead of the family's own columns
pub const GLOBAL_COLUMNS: [&str; 8] = [
    "_id",
    "type",
    "parution",
    "dateParution",
    "numeroDepartement",
    "tribunal",
    "numeroAnnonce",
    "nojo",
];

pub const COMPANY_FILING_COLUMNS: &[&str] = &[
    // establishment
    "origineFonds",
    "activite",
    "adresseEtab_pays",
    "adresseEtab_numeroVoie",
    "adresseEtab_typeVoie",
    "adresseEtab_nomVoie",
    "adresseEtab_complGeographique",
    "adresseEtab_codePostal",
    "adresseEtab_ville",
    "qualite",
    "siege",
    "prixFonds",
    // person
    "capital_devise",
    "capital_montant",
    "capital_capitalVariable",
    "adressePers_pays",
    "adressePers_numeroVoie",
    "adressePers_typeVoie",
    "adressePers_nomVoie",
    "adressePers_complGeographique",
    "adressePers_codePostal",
    "adressePers_ville",
    "typePers",
    "immatriculation_numeroIdentification",
    "immatriculation_codeRCS",
    "immatriculation_nomGreffeImmat",
    "nonInscrit",
    "denomination",
    "formeJuridique",
    "administration",
    // act
    "typeActe",
    "dateImmatriculation",
    "dateCommencementActivite",
    "categorie",
    "dateEffet",
    "dateCessationActivite",
];

pub const MODIFICATION_COLUMNS: &[&str] = &[
    "activite",
    "adresseSiegeSocial_pays",
    "adresseSiegeSocial_numeroVoie",
    "adresseSiegeSocial_typeVoie",
    "adresseSiegeSocial_nomVoie",
    "adresseSiegeSocial_complGeographique",
    "adresseSiegeSocial_codePostal",
    "adresseSiegeSocial_ville",
    "adresseEtab_pays",
    "adresseEtab_numeroVoie",
    "adresseEtab_typeVoie",
    "adresseEtab_nomVoie",
    "adresseEtab_complGeographique",
    "adresseEtab_codePostal",
    "adresseEtab_ville",
    "typePers",
    "nomPers",
    "prenomPers",
    "adressePers_pays",
    "adressePers_numeroVoie",
    "adressePers_typeVoie",
    "adressePers_nomVoie",
    "adressePers_complGeographique",
    "adressePers_codePostal",
    "adressePers_ville",
    "denomination",
    "formeJuridique",
    "administration",
    "capital_devise",
    "capital_montant",
    "capital_capitalVariable",
    "sigle",
    "immatriculation_numeroIdentification",
    "immatriculation_codeRCS",
    "immatriculation_nomGreffeImmat",
    "siren",
    "typeActe",
    "descriptif",
    "dateEffet",
    "dateCommencementActivite",
    "dateCessationActivite",
];

pub const BALANCE_SHEET_COLUMNS: &[&str] = &[
    "typePers",
    "adressePers_pays",
    "adressePers_numeroVoie",
    "adressePers_typeVoie",
    "adressePers_nomVoie",
    "adressePers_complGeographique",
    "adressePers_codePostal",
    "adressePers_ville",
    "denomination",
    "formeJuridique",
    "sigle",
    "immatriculation_numeroIdentification",
    "immatriculation_codeRCS",
    "immatriculation_nomGreffeImmat",
    "siren",
    "typeActe",
    "dateCloture",
    "descriptif",
    "categorie",
    "dateEffet",
    "dateCommencementActivite",
    "dateCessationActivite",
];

pub const COLLECTIVE_PROCEEDING_COLUMNS: &[&str] = &[
    "typePers",
    "nomPers",
    "prenomPers",
    "adressePers_pays",
    "adressePers_numeroVoie",
    "adressePers_typeVoie",
    "adressePers_nomVoie",
    "adressePers_complGeographique",
    "adressePers_codePostal",
    "adressePers_ville",
    "immatriculation_numeroIdentification",
    "immatriculation_codeRCS",
    "immatriculation_nomGreffeImmat",
    "formeJuridique",
    "denomination",
    "nonInscrit",
    "identifiantClient",
    "siren",
    "activite",
    "jugement_famille",
    "jugement_nature",
    "jugement_date",
    "jugement_complementJugement",
    "enseigne",
    "inscription_numeroIdentification",
    "inscription_code",
    "inscription_numeroDepartement",
    "parutionAvisPrecedent_dateParution",
    "parutionAvisPrecedent_numeroAnnonce",
    "parutionAvisPrecedent_parution",
    "parutionAvisPrecedent_type",
    "parutionAvisPrecedent__id",
    "jugementAnnule_famille",
    "jugementAnnule_nature",
];

pub fn family_columns(family: Family) -> &'static [&'static str] {
    match family {
        Family::CompanyFiling => COMPANY_FILING_COLUMNS,
        Family::Modification => MODIFICATION_COLUMNS,
        Family::BalanceSheet => BALANCE_SHEET_COLUMNS,
        Family::CollectiveProceeding => COLLECTIVE_PROCEEDING_COLUMNS,
    }
}

/// Full output header: global columns then the family's columns
pub fn header(family: Family) -> Vec<&'static str> {
    GLOBAL_COLUMNS
        .iter()
        .chain(family_columns(family))
        .copied()
        .collect()
}

/// Rendering of a canonical value into a CSV cell
pub trait ToCell {
    fn to_cell(&self) -> String;
}

impl ToCell for str {
    fn to_cell(&self) -> String {
        self.to_string()
    }
}

impl ToCell for String {
    fn to_cell(&self) -> String {
        self.clone()
    }
}

impl ToCell for u64 {
    fn to_cell(&self) -> String {
        self.to_string()
    }
}

/// Whole amounts render without a decimal part (`30000`, `1250.5`)
impl ToCell for f64 {
    fn to_cell(&self) -> String {
        self.to_string()
    }
}

impl ToCell for bool {
    fn to_cell(&self) -> String {
        self.to_string()
    }
}

impl<T: ToCell> ToCell for Option<T> {
    fn to_cell(&self) -> String {
        self.as_ref().map(ToCell::to_cell).unwrap_or_default()
    }
}

impl<T: ToCell + ?Sized> ToCell for &T {
    fn to_cell(&self) -> String {
        (**self).to_cell()
    }
}

/// One output row: a fixed, ordered set of columns, every one populated
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    fields: Vec<(&'static str, String)>,
}

impl FlatRecord {
    /// Record with every column set to the empty string
    pub fn with_columns(columns: &[&'static str]) -> Self {
        Self {
            fields: columns.iter().map(|column| (*column, String::new())).collect(),
        }
    }

    /// Global columns of an announcement
    pub fn global(announcement: &Announcement) -> Self {
        let mut record = Self::with_columns(&GLOBAL_COLUMNS);
        record.set("_id", &announcement.id);
        record.set("type", announcement.family.tag());
        record.set("parution", &announcement.parution);
        record.set("dateParution", &announcement.date_parution);
        record.set("numeroDepartement", &announcement.numero_departement);
        record.set("tribunal", &announcement.tribunal);
        record.set("numeroAnnonce", &announcement.numero_annonce);
        record.set("nojo", &announcement.nojo);
        record
    }

    /// Set a declared column; absent values leave it empty
    pub fn set<V: ToCell + ?Sized>(&mut self, column: &str, value: &V) {
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, cell)) => *cell = value.to_cell(),
            None => debug_assert!(false, "undeclared column {column}"),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, cell)| cell.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, cell)| cell.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Append another record's columns after this one's
    pub fn extend(&mut self, other: FlatRecord) {
        self.fields.extend(other.fields);
    }
}
