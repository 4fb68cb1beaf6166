//! Loading cut tables from JSON.
//!
//! Keys missing from the file keep their default values, so a file only
//! needs to name the cuts it changes.

use crate::Result;
use picod0_core::D0Cuts;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Loads and validates a cut table from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read, is not valid JSON, or
/// describes an inconsistent cut table.
pub fn load_cuts<P: AsRef<Path>>(path: P) -> Result<D0Cuts> {
    let file = File::open(path)?;
    let cuts: D0Cuts = serde_json::from_reader(BufReader::new(file))?;
    cuts.validate()?;
    Ok(cuts)
}

/// Parses and validates a cut table from a JSON string.
///
/// # Errors
/// Returns an error if the string is not valid JSON or describes an
/// inconsistent cut table.
pub fn cuts_from_json(json: &str) -> Result<D0Cuts> {
    let cuts: D0Cuts = serde_json::from_str(json)?;
    cuts.validate()?;
    Ok(cuts)
}
