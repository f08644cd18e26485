use thiserror::Error;

/// A raw object still held fields after every known field was taken from it.
///
/// This is how schema drift shows up: the source format grew a field the
/// normalizers do not model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{context} should be empty after being fully used. Remaining keys: {keys:?}")]
pub struct StructuralError {
    /// Path of the raw object that was not exhausted (e.g. `avis`)
    pub context: String,
    /// Leftover key names, in source order
    pub keys: Vec<String>,
}

/// Reasons a whole document yields no announcements
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is empty")]
    Empty,

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unbalanced XML: unexpected closing tag </{0}>")]
    Unbalanced(String),

    #[error("root element <{0}> not found")]
    MissingRoot(&'static str),

    #[error("announcement list <{0}> is missing or not list-shaped")]
    NotAList(&'static str),
}
