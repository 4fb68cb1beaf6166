//! picod0-reco: D0 -> K pi candidate reconstruction.
//!
//! This crate provides the selection stages and the pairing maker:
//! - **Event gate** - trigger and vertex cuts
//! - **Track classifier** - quality gate plus pion/kaon PID bands
//! - **Pair builder** - all kaon x pion combinations, self-pairs excluded
//! - **Pair classifier** - analysis cuts and the stricter QA cuts
//! - **Maker** - per-event orchestration and sink routing
//!
#![warn(missing_docs)]

mod fit;
mod maker;
pub mod pairing;
mod processor;
pub mod selection;

pub use fit::{StraightLineFit, KAON_MASS, PION_MASS};
pub use maker::{D0EventMaker, MakeStatus, Maker, MakerStats};
pub use pairing::{build_pairs, kaon_pion_pairs, BuiltPair};
pub use processor::{D0Reconstruction, D0State, DiagnosticsScope, EventStage, QaPair};
pub use selection::{
    is_good_event, is_good_pair, is_good_qa_pair, is_good_track, is_kaon, is_pion, is_unlike_sign,
};

// Re-export core types used in every signature
pub use picod0_core::{D0Cuts, D0Event, KaonPion, SkipReason};
