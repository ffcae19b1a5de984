//! Petworld Journal - Recording, auditing and export of lifecycle events
//!
//! This crate provides:
//!
//! - **Journal**: Append-only record of committed events
//! - **Auditor**: Query and analyze recorded events (per kind, per pet, unlock totals)
//! - **Exporter**: Export journal data to various formats
//!
//! # Example
//!
//! ```rust
//! use petworld_core::{Achievement, Event, PetId};
//! use petworld_journal::{Auditor, ExportFormat, Exporter, Journal};
//!
//! let mut journal = Journal::new();
//! journal.record(Event::minted(PetId::new(1), 0));
//! journal.record(Event::achievement(PetId::new(1), Achievement::FirstPet, 0));
//!
//! let auditor = Auditor::new(&journal);
//! assert_eq!(auditor.achievement_totals()[&Achievement::FirstPet], 1);
//!
//! let csv = Exporter::new(&journal).export(ExportFormat::Csv).unwrap();
//! assert_eq!(csv.lines().count(), 3);
//! ```

mod auditor;
mod error;
mod exporter;
mod journal;

pub use auditor::{AuditQuery, AuditReport, Auditor, PetSummary};
pub use error::{Error, Result};
pub use exporter::{ExportFormat, Exporter};
pub use journal::{Journal, JournalConfig, JournalEntry, JournalStats};
