use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::models::FlatRecord;

/// Append-only destination for flat records
pub trait RecordSink {
    /// Write the column names, once, before any record
    fn write_header(&mut self, header: &[&str]) -> Result<()>;

    fn write_record(&mut self, record: &FlatRecord) -> Result<()>;

    /// Push everything written so far to the destination
    fn flush(&mut self) -> Result<()>;
}

/// CSV output with every field quoted
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Create (or truncate) a CSV file
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(writer: W) -> Self {
        let writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);
        Self { writer }
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("Failed to flush CSV output: {}", err.error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_header(&mut self, header: &[&str]) -> Result<()> {
        self.writer
            .write_record(header)
            .context("Failed to write CSV header")
    }

    fn write_record(&mut self, record: &FlatRecord) -> Result<()> {
        self.writer
            .write_record(record.values())
            .context("Failed to write CSV record")
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV output")
    }
}

/// Output file name for a type-file setting (`vente` -> `VENTE.csv`)
pub fn output_file_name(type_file: &str) -> String {
    format!("{}.csv", type_file.to_uppercase())
}
