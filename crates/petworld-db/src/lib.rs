//! Petworld DB - Database layer using native_db
//!
//! Provides persistent storage for pet records behind the
//! `petworld_core::PetStore` trait:
//! - Versioned pet rows with compare-and-set writes
//! - Per-owner achievement records, written atomically with the pet
//! - A monotonic id counter
//! - Owner, stage and liveness queries

mod error;
mod models;
mod queries;
mod store;

pub use error::{Error, Result};
pub use store::DbStore;
