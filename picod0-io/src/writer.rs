//! D0 record writer.

use crate::{Error, Result};
use picod0_core::{D0Event, EventSummary, KaonPion, RecordSink};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output file names derived from a common base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Per-event D0 records, `<base>.picoD0.jsonl`.
    pub records: PathBuf,
    /// QA histograms, `<base>.hists.json`.
    pub hists: PathBuf,
}

impl OutputPaths {
    /// Builds both output paths from `base`.
    pub fn from_base<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref().as_os_str();
        let with_suffix = |suffix: &str| {
            let mut name = base.to_owned();
            name.push(suffix);
            PathBuf::from(name)
        };
        Self {
            records: with_suffix(".picoD0.jsonl"),
            hists: with_suffix(".hists.json"),
        }
    }
}

/// Writes one JSON object per input event.
///
/// Rows for events rejected by the event cuts still carry their header,
/// so the row count always equals the input event count.
pub struct D0EventWriter<W: Write> {
    writer: W,
    current: Option<D0Event>,
    rows: usize,
}

impl D0EventWriter<BufWriter<File>> {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> D0EventWriter<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            current: None,
            rows: 0,
        }
    }

    /// Number of rows written.
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Consumes the writer, returning the inner sink.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_row(&mut self, row: &D0Event) -> Result<()> {
        serde_json::to_writer(&mut self.writer, row)?;
        self.writer.write_all(b"\n")?;
        self.rows += 1;
        Ok(())
    }

    /// Flushes buffered rows.
    ///
    /// # Errors
    /// Returns an error if the underlying writer fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(Error::from)
    }
}

impl<W: Write> RecordSink for D0EventWriter<W> {
    fn begin_event(&mut self, event: &EventSummary) {
        let mut row = D0Event::new();
        row.add_pico_event(event);
        self.current = Some(row);
    }

    fn set_counts(&mut self, n_kaons: usize, n_pions: usize) {
        if let Some(row) = self.current.as_mut() {
            row.set_n_kaons(n_kaons);
            row.set_n_pions(n_pions);
        }
    }

    fn add_candidate(&mut self, kp: &KaonPion) {
        if let Some(row) = self.current.as_mut() {
            row.add_kaon_pion(*kp);
        }
    }

    fn end_event(&mut self) -> picod0_core::Result<()> {
        match self.current.take() {
            Some(row) => self.write_row(&row).map_err(Into::into),
            None => Ok(()),
        }
    }

    fn close(&mut self) -> picod0_core::Result<()> {
        self.flush().map_err(Into::into)
    }
}
