//! CSV record sink
//!
//! Streams records to a CSV file as they arrive, one row per visited
//! page, with a fixed header. The csv crate handles quoting, so titles
//! with commas and the `" | "` separator inside the H2 column survive as
//! literal cell content.

use crate::record::{PageRecord, CSV_HEADERS};
use crate::Result;
use std::io::Write;
use std::path::Path;

/// Streaming CSV writer over the record stream
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<std::fs::File> {
    /// Creates a sink writing to a file, truncating any existing content
    pub fn create(path: &Path) -> Result<Self> {
        let file = std::fs::File::create(path)?;
        Self::from_writer(file)
    }
}

impl<W: Write> CsvSink<W> {
    /// Creates a sink over any writer and emits the header row
    pub fn from_writer(writer: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(CSV_HEADERS)?;
        Ok(Self { writer })
    }

    /// Appends one record as a row
    pub fn write(&mut self, record: &PageRecord) -> Result<()> {
        self.writer.write_record(record.csv_row())?;
        Ok(())
    }

    /// Flushes buffered rows to the underlying writer
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
