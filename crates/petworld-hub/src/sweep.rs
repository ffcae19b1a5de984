//! Periodic sweep driver
//!
//! A sweep applies `ForceUpdate` to every pet so decay, evolution and death
//! are resolved even for pets nobody interacts with. Sweeps are skipped while
//! the surface is hidden, never overlap, and run at most once per interval
//! when driven by [`Hub::sweep_if_due`](crate::Hub::sweep_if_due).

use petworld_core::{EventKind, PetId, Sequence, Transition};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Why a sweep did or did not run
#[derive(Debug)]
pub enum SweepOutcome {
    /// The surface is hidden
    Hidden,
    /// Another sweep is still running
    InFlight,
    /// The interval has not elapsed since the last sweep
    NotDue,
    Completed(SweepReport),
}

impl SweepOutcome {
    /// The report, if the sweep ran
    pub fn report(&self) -> Option<&SweepReport> {
        match self {
            SweepOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SweepOutcome::Completed(_))
    }
}

/// What one sweep did
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Sequence every pet was updated to
    pub sequence: Sequence,
    /// Pets updated successfully
    pub updated: usize,
    pub evolved: Vec<PetId>,
    pub died: Vec<PetId>,
    /// Total events committed
    pub events: usize,
    /// Per-pet failures, not propagated
    pub failures: Vec<(PetId, petworld_core::Error)>,
}

impl SweepReport {
    pub(crate) fn new(sequence: Sequence) -> Self {
        Self {
            sequence,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, pet: PetId, result: crate::Result<Transition>) {
        match result {
            Ok(transition) => {
                self.updated += 1;
                self.events += transition.events.len();
                for event in &transition.events {
                    match event.kind {
                        EventKind::Evolved { .. } => self.evolved.push(pet),
                        EventKind::Died => self.died.push(pet),
                        _ => {}
                    }
                }
            }
            Err(crate::Error::Core(err)) => self.failures.push((pet, err)),
            Err(err) => self
                .failures
                .push((pet, petworld_core::Error::Storage(err.to_string()))),
        }
    }

    /// One-line description, as recorded in the journal
    pub fn summary(&self) -> String {
        format!(
            "updated={} evolved={} died={} failures={}",
            self.updated,
            self.evolved.len(),
            self.died.len(),
            self.failures.len()
        )
    }

    pub(crate) fn merge(&mut self, other: SweepReport) {
        self.updated += other.updated;
        self.events += other.events;
        self.evolved.extend(other.evolved);
        self.died.extend(other.died);
        self.failures.extend(other.failures);
    }
}

/// Sweep scheduling state shared by all callers of one hub
#[derive(Debug)]
pub(crate) struct SweepState {
    visible: AtomicBool,
    in_flight: AtomicBool,
    last_completed: Mutex<Option<Instant>>,
}

/// Marks a sweep as running until dropped
pub(crate) struct SweepGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl SweepState {
    pub(crate) fn new() -> Self {
        Self {
            visible: AtomicBool::new(true),
            in_flight: AtomicBool::new(false),
            last_completed: Mutex::new(None),
        }
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Release);
    }

    /// Claim the in-flight slot, or `None` if a sweep is already running
    pub(crate) fn try_begin(&self) -> Option<SweepGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SweepGuard {
                flag: &self.in_flight,
            })
    }

    pub(crate) fn is_due(&self, now: Instant, interval: Duration) -> bool {
        let last = self
            .last_completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match *last {
            Some(at) => now.saturating_duration_since(at) >= interval,
            None => true,
        }
    }

    pub(crate) fn complete(&self, at: Instant) {
        let mut last = self
            .last_completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *last = Some(at);
    }

    pub(crate) fn last_completed(&self) -> Option<Instant> {
        *self
            .last_completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
