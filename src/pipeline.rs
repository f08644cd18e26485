use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::ProcessingConfig;
use crate::error::DocumentError;
use crate::io::{parse_xml_str, CsvSink, RecordSink};
use crate::models::{header, Announcement, Family};
use crate::stages::{
    execute_stage1, execute_stage2, execute_stage3, split_document, Stage1Result, Stage2Config,
};

/// Top-level keys seen on assembled announcements, for schema diagnostics
#[derive(Debug, Clone, Default)]
pub struct SchemaKeys {
    keys: BTreeSet<String>,
}

impl SchemaKeys {
    pub fn observe(&mut self, announcement: &Announcement) {
        if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(announcement) {
            self.keys.extend(map.into_iter().map(|(key, _)| key));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Outcome of one document
#[derive(Debug, Clone, Default)]
pub struct DocumentReport {
    /// Announcements assembled
    pub announcements: usize,
    /// Announcements excluded by a structural error
    pub rejected: usize,
    /// Records handed to the sink
    pub records: usize,
    /// Company filings outside the requested category
    pub filtered: usize,
    /// Set when the document yielded nothing because it could not be read
    pub parse_error: Option<String>,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub files: usize,
    pub failed_documents: usize,
    pub announcements: usize,
    pub rejected: usize,
    pub records: usize,
    pub filtered: usize,
    pub schema_keys: SchemaKeys,
}

impl RunReport {
    fn add(&mut self, document: &DocumentReport) {
        self.files += 1;
        if document.parse_error.is_some() {
            self.failed_documents += 1;
        }
        self.announcements += document.announcements;
        self.rejected += document.rejected;
        self.records += document.records;
        self.filtered += document.filtered;
    }
}

/// Parse, split and assemble one document
pub fn assemble_document(xml: &str, family: Family) -> Result<Stage1Result, DocumentError> {
    let document = parse_xml_str(xml)?;
    let split = split_document(document, family)?;
    Ok(execute_stage1(split))
}

/// Run one document through every stage into `sink`
///
/// A document that cannot be read produces no records and is reported, not
/// returned as an error; only sink failures are.
pub fn process_document(
    xml: &str,
    family: Family,
    category: &str,
    sink: &mut dyn RecordSink,
    schema_keys: &mut SchemaKeys,
) -> Result<DocumentReport> {
    let stage1 = match assemble_document(xml, family) {
        Ok(stage1) => stage1,
        Err(err) => {
            error!("Document yields no announcements: {}", err);
            return Ok(DocumentReport {
                parse_error: Some(err.to_string()),
                ..Default::default()
            });
        }
    };

    for announcement in &stage1.announcements {
        schema_keys.observe(announcement);
    }

    let stage2_config = Stage2Config {
        category: category.to_string(),
    };
    let stage2 = execute_stage2(&stage1.announcements, &stage2_config);
    let stage3 = execute_stage3(&stage2.records, sink)?;

    Ok(DocumentReport {
        announcements: stage1.announcements.len(),
        rejected: stage1.rejected.len(),
        records: stage3.rows_written,
        filtered: stage2.filtered,
        parse_error: None,
    })
}

/// Input documents of a family: names starting with the family tag and
/// containing `.xml`
pub fn is_input_file(name: &str, family: Family) -> bool {
    name.starts_with(family.tag()) && name.contains(".xml")
}

/// Input documents of a family in `dir`, in lexical order
pub async fn select_input_files(dir: &Path, family: Family) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read directory: {:?}", dir))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to read directory: {:?}", dir))?
    {
        if is_input_file(&entry.file_name().to_string_lossy(), family) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Process `files` one at a time into `sink`, after writing the header
pub async fn process_files_into(
    files: &[PathBuf],
    family: Family,
    category: &str,
    sink: &mut dyn RecordSink,
) -> Result<RunReport> {
    let mut report = RunReport::default();
    sink.write_header(&header(family))?;

    for path in files {
        info!("Processing {:?}", path);
        let document = match tokio::fs::read(path).await {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                if matches!(content, std::borrow::Cow::Owned(_)) {
                    warn!("File {:?} is not valid UTF-8, invalid bytes replaced", path);
                }
                if content.trim().is_empty() {
                    warn!("File {:?} is empty", path);
                }
                process_document(&content, family, category, sink, &mut report.schema_keys)?
            }
            Err(err) => {
                error!("Failed to read {:?}: {}", path, err);
                DocumentReport {
                    parse_error: Some(err.to_string()),
                    ..Default::default()
                }
            }
        };
        info!(
            "{:?}: {} announcements, {} rejected, {} records",
            path, document.announcements, document.rejected, document.records
        );
        report.add(&document);
    }

    sink.flush()?;
    Ok(report)
}

/// Batch driver: every document of the configured family into
/// `<TYPEFILE>.csv`
pub async fn process_files(config: &ProcessingConfig) -> Result<RunReport> {
    let family = config.family();
    info!(
        "Processing BODACC {} files (type file: {})",
        family, config.type_file
    );

    let files = select_input_files(&config.input_dir, family).await?;
    info!("Found {} {} files", files.len(), family);

    let output_path = config.output_path();
    let mut sink = CsvSink::create(&output_path)?;
    let report = process_files_into(&files, family, config.category(), &mut sink).await?;

    info!(
        "Complete: {} records written to {:?} ({} announcements, {} rejected, {} filtered, {} failed documents)",
        report.records,
        output_path,
        report.announcements,
        report.rejected,
        report.filtered,
        report.failed_documents
    );
    Ok(report)
}
