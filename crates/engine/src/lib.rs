//! `decant-engine` — Blog archive reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded export and authority text,
//! returns planned output documents plus a run report. No CLI or IO
//! dependencies.

pub mod authority;
pub mod canonical;
pub mod engine;
pub mod error;
pub mod export;
pub mod links;
pub mod model;
pub mod output;
pub mod project;

pub use engine::run;
pub use error::EngineError;
pub use model::{LinkPolicy, MigrateConfig, MigrateInput, MigrateResult, Warning};
