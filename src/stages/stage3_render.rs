use anyhow::Result;
use tracing::debug;

use crate::io::RecordSink;
use crate::models::FlatRecord;

/// Result of Stage 3 rendering
#[derive(Debug, Default)]
pub struct Stage3Result {
    /// Records handed to the sink
    pub rows_written: usize,
}

/// Execute Stage 3: hand a document's records to the sink, in order
///
/// Sink failures are returned; they end the run.
pub fn execute_stage3(records: &[FlatRecord], sink: &mut dyn RecordSink) -> Result<Stage3Result> {
    for record in records {
        sink.write_record(record)?;
    }
    debug!("Wrote {} records", records.len());

    Ok(Stage3Result {
        rows_written: records.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects rows in memory
    #[derive(Default)]
    struct VecSink {
        rows: Vec<Vec<String>>,
    }

    impl RecordSink for VecSink {
        fn write_header(&mut self, _header: &[&str]) -> Result<()> {
            Ok(())
        }

        fn write_record(&mut self, record: &FlatRecord) -> Result<()> {
            self.rows.push(record.values().map(str::to_string).collect());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }

    struct FailingSink;

    impl RecordSink for FailingSink {
        fn write_header(&mut self, _header: &[&str]) -> Result<()> {
            Ok(())
        }

        fn write_record(&mut self, _record: &FlatRecord) -> Result<()> {
            anyhow::bail!("disk full")
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn record(id: &str) -> FlatRecord {
        let mut record = FlatRecord::with_columns(&["_id"]);
        record.set("_id", id);
        record
    }

    #[test]
    fn test_records_are_written_in_order() {
        let mut sink = VecSink::default();

        let result = execute_stage3(&[record("a"), record("b")], &mut sink).unwrap();

        assert_eq!(result.rows_written, 2);
        assert_eq!(sink.rows, vec![vec!["a".to_string()], vec!["b".to_string()]]);
    }

    #[test]
    fn test_sink_failure_is_returned() {
        assert!(execute_stage3(&[record("a")], &mut FailingSink).is_err());
    }
}
