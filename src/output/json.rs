//! JSON record sink
//!
//! Collects records and writes them as one pretty-printed JSON array on
//! finish. Unlike the CSV sink this serializes the full record,
//! including final_url, depth, fetched_at, and the error marker.

use crate::record::PageRecord;
use crate::Result;
use std::io::Write;
use std::path::Path;

pub struct JsonSink<W: Write> {
    writer: W,
    records: Vec<PageRecord>,
}

impl JsonSink<std::fs::File> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> JsonSink<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer,
            records: Vec::new(),
        }
    }

    pub fn write(&mut self, record: &PageRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    /// Serializes the collected records and flushes the writer
    pub fn finish(mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.records)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
