use std::path::PathBuf;

use crate::models::Family;

/// Settings of a processing run
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingConfig {
    /// `modification`, `compte`, `prevention`, or a company-filing act
    /// category such as `immatriculation` or `vente`
    pub type_file: String,
    /// Directory holding the extracted XML documents
    pub input_dir: PathBuf,
    /// Directory receiving `<TYPEFILE>.csv`
    pub output_dir: PathBuf,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            type_file: "immatriculation".to_string(),
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ProcessingConfig {
    /// Load from `BODACC_TYPE_FILE`, `BODACC_INPUT_DIR` and
    /// `BODACC_OUTPUT_DIR`, defaulting whatever is unset
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            type_file: lookup("BODACC_TYPE_FILE").unwrap_or(defaults.type_file),
            input_dir: lookup("BODACC_INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_dir),
            output_dir: lookup("BODACC_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }

    /// Family selected by the type-file setting
    pub fn family(&self) -> Family {
        Family::from_type_file(&self.type_file)
    }

    /// Act-type filter: the type file itself for company filings, none for
    /// the other families
    pub fn category(&self) -> &str {
        match self.family() {
            Family::CompanyFiling => &self.type_file,
            _ => "",
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(crate::io::output_file_name(&self.type_file))
    }
}
