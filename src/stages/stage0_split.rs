use tracing::{debug, warn};

use crate::error::DocumentError;
use crate::models::{Family, RawFields, RawNode};

/// A document broken into its shared metadata and its raw announcements
#[derive(Debug)]
pub struct SplitDocument {
    pub family: Family,
    /// Publication number shared by every announcement
    pub parution: String,
    /// Publication date shared by every announcement
    pub date_parution: String,
    /// Raw announcements, in document order
    pub announcements: Vec<RawFields>,
}

/// Stage 0: locate the root element and split out the announcement list
///
/// A document holding a single announcement yields a one-element list.
/// List entries that are not elements are skipped.
pub fn split_document(
    mut document: RawFields,
    family: Family,
) -> Result<SplitDocument, DocumentError> {
    let root_name = family.root_element();
    let mut root = document
        .take_fields(root_name)
        .ok_or(DocumentError::MissingRoot(root_name))?;

    let wrapper = family.list_wrapper();
    let mut list = root
        .take_fields(wrapper)
        .ok_or(DocumentError::NotAList(wrapper))?;
    // a blank wrapper is a publication without announcements
    let items = match list.take_list(family.list_item()) {
        Some(items) => items,
        None if list.is_empty() => Vec::new(),
        None => return Err(DocumentError::NotAList(wrapper)),
    };
    if !list.is_empty() {
        warn!("Ignoring unexpected elements in <{}>: {:?}", wrapper, list.keys().collect::<Vec<_>>());
    }

    let parution = root.take_text("parution").unwrap_or_default();
    let date_parution = root.take_text("dateParution").unwrap_or_default();
    if !root.is_empty() {
        debug!("Document-level fields not carried: {:?}", root.keys().collect::<Vec<_>>());
    }

    let total = items.len();
    let announcements: Vec<RawFields> = items
        .into_iter()
        .filter_map(|item| match item {
            RawNode::Map(fields) => Some(fields),
            _ => None,
        })
        .collect();
    if announcements.len() < total {
        warn!(
            "Skipped {} announcement entries without content",
            total - announcements.len()
        );
    }

    Ok(SplitDocument {
        family,
        parution,
        date_parution,
        announcements,
    })
}
