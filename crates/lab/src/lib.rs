// Library crate: scene store, identity tracker and the headless renderer, plus
// the harness/command layer used by the binary and the integration tests.

pub mod bench;
pub mod command;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod metrics;
pub mod render;
pub mod report;
pub mod state;
pub mod tracking;
