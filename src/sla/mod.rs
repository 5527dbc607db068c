pub mod batch;
pub mod engine;
pub mod error;
pub mod labels;
pub mod ledger;
pub mod models;
pub mod policy;
pub mod release;
pub mod sync;
pub mod timeline;

pub use engine::{SlaEngine, SweepReport, TriggerOutcome};
