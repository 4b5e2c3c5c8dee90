//! JSON output formats
//!
//! - [`JsonOutput`]: one aggregated `{"successful": [...], "failed": [...]}`
//!   document, written when the run is finalized
//! - [`NdjsonOutput`]: one object per line, written and flushed as each
//!   outcome is recorded

use super::traits::{OutputHandler, OutputResult};
use crate::crawler::{CrawlResult, PageOutcome};
use std::io::Write;

/// Aggregated JSON document writer
#[derive(Debug)]
pub struct JsonOutput<W: Write> {
    writer: W,
    result: CrawlResult,
    pretty: bool,
}

impl<W: Write> JsonOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            result: CrawlResult::new(),
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Writes a complete result directly
    pub fn write_result(&mut self, result: &CrawlResult) -> OutputResult<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, result)?;
        } else {
            serde_json::to_writer(&mut self.writer, result)?;
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputHandler for JsonOutput<W> {
    fn record_outcome(&mut self, outcome: &PageOutcome) -> OutputResult<()> {
        self.result.push(outcome.clone());
        Ok(())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        let result = std::mem::take(&mut self.result);
        self.write_result(&result)?;
        self.result = result;
        Ok(())
    }

    fn recorded(&self) -> usize {
        self.result.len()
    }
}

/// Newline-delimited JSON writer
#[derive(Debug)]
pub struct NdjsonOutput<W: Write> {
    writer: W,
    recorded: usize,
}

impl<W: Write> NdjsonOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            recorded: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputHandler for NdjsonOutput<W> {
    fn record_outcome(&mut self, outcome: &PageOutcome) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, outcome)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.recorded += 1;
        Ok(())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn recorded(&self) -> usize {
        self.recorded
    }
}
