//! Petworld Hub - Lifecycle service over a shared pet store
//!
//! This crate runs lifecycle transitions against persisted pets. Any number of
//! threads can drive one [`Hub`]; the store's record versions decide which of
//! two racing writes wins.
//!
//! ## Architecture
//!
//! ```text
//! Hub
//!  │
//!  ├── PetStore (trait) ← memory or native_db
//!  │    └── Versioned<Pet>
//!  │
//!  ├── SequenceSource (trait) ← ledger clock
//!  │
//!  ├── Lifecycle rules + achievement catalog
//!  │
//!  └── Journal (optional) + sweep state
//! ```
//!
//! ## Key Components
//!
//! - [`Hub`]: mint, act on and inspect pets; run sweeps
//! - [`HubConfig`]: worker count, sweep interval, conflict retries
//! - [`SweepOutcome`] / [`SweepReport`]: what a sweep did, or why it did not run

mod config;
mod error;
mod hub;
mod sweep;

pub use config::{max_workers, HubConfig, DEFAULT_SWEEP_INTERVAL};
pub use error::{Error, Result};
pub use hub::Hub;
pub use sweep::{SweepOutcome, SweepReport};
