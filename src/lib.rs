pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod normalizers;
pub mod pipeline;
pub mod projectors;
pub mod stages;

pub use config::ProcessingConfig;
pub use error::{DocumentError, StructuralError};
pub use io::{parse_xml_file, parse_xml_str, CsvSink, RecordSink};
pub use models::{Announcement, Family, FlatRecord, RawFields, RawNode};
pub use pipeline::{
    assemble_document, process_document, process_files, process_files_into, RunReport, SchemaKeys,
};
pub use stages::{
    assemble_announcement, execute_stage1, execute_stage2, execute_stage3, split_document,
    DocumentContext, Stage1Result, Stage2Config,
};
