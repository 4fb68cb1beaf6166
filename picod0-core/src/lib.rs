//! picod0-core: Core types and traits for D0 -> K pi reconstruction.
//!
//! This crate provides the event and track records, the cut tables, the
//! K pi candidate types, and the interfaces to the external collaborators
//! (event source, kinematic fit, record and diagnostics sinks).
//!

pub mod cuts;
pub mod d0_event;
pub mod error;
pub mod event;
pub mod kaon_pion;
pub mod sink;
pub mod track;
pub mod vector;

pub use cuts::{D0Cuts, QaCuts};
pub use d0_event::D0Event;
pub use error::{Error, Result, SkipReason};
pub use event::{EventSource, EventSummary, PicoEvent};
pub use kaon_pion::{CandidateDerived, KaonPion, KinematicFit};
pub use sink::{DiagnosticsSink, RecordSink, VecRecordSink};
pub use track::TrackRecord;
pub use vector::ThreeVector;
