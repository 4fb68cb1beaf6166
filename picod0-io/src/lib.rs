//! picod0-io: file formats for picod0.
//!
//! Reads reconstructed events from JSON-lines files, writes one D0 record
//! per input event, and fills the QA histograms written next to them.
//!

mod cuts;
mod error;
mod hists;
mod reader;
mod writer;

pub use cuts::{cuts_from_json, load_cuts};
pub use error::{Error, Result};
pub use hists::{D0Hists, Histogram1D};
pub use reader::JsonLinesEventReader;
pub use writer::{D0EventWriter, OutputPaths};
