//! Destinations for decoded records.

use std::io::Write;

use crate::decoder::DecodedRecord;
use crate::error::ListerResult;

/// Receives decoded records as the scanner produces them.
pub trait RecordSink {
    fn emit(&mut self, record: &DecodedRecord) -> ListerResult<()>;
}

/// Collects records in memory.
impl RecordSink for Vec<DecodedRecord> {
    fn emit(&mut self, record: &DecodedRecord) -> ListerResult<()> {
        self.push(record.clone());
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn emit(&mut self, record: &DecodedRecord) -> ListerResult<()> {
        (**self).emit(record)
    }
}

/// Writes one `<GrainType> <grainId>` line per record.
///
/// Every line is flushed so output appears while the listing is still
/// running.
pub struct WriterSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> RecordSink for WriterSink<W> {
    fn emit(&mut self, record: &DecodedRecord) -> ListerResult<()> {
        writeln!(self.writer, "{}", record)?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }
}
