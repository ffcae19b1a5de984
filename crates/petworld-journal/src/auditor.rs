//! Auditing and analytics for journal data

use crate::{Journal, JournalEntry};
use indexmap::IndexMap;
use petworld_core::{Achievement, EventKind, OwnerId, PetId, Sequence, Stage};
use std::collections::HashMap;

/// Auditor for querying and analyzing journal data
pub struct Auditor<'a> {
    journal: &'a Journal,
}

impl<'a> Auditor<'a> {
    /// Create a new auditor for a journal
    pub fn new(journal: &'a Journal) -> Self {
        Self { journal }
    }

    /// Generate a comprehensive audit report
    pub fn generate_report(&self) -> AuditReport {
        let stats = self.journal.stats();
        let mut event_counts: HashMap<String, u64> = HashMap::new();
        let mut pet_events: HashMap<u64, u64> = HashMap::new();

        for event in self.journal.events() {
            *event_counts.entry(event.kind.name().to_string()).or_insert(0) += 1;
            *pet_events.entry(event.pet.raw()).or_insert(0) += 1;
        }

        AuditReport {
            total_entries: stats.total_entries,
            total_events: stats.event_count,
            pet_count: stats.pet_count,
            first_sequence: stats.first_sequence,
            last_sequence: stats.last_sequence,
            event_counts,
            pet_events,
            achievement_unlocks: self.achievement_totals(),
        }
    }

    /// Query entries matching specific criteria
    pub fn query(&self, query: &AuditQuery) -> Vec<&JournalEntry> {
        self.journal
            .entries()
            .iter()
            .filter(|entry| query.matches(entry))
            .collect()
    }

    /// Get a summary of one pet's recorded history
    pub fn pet_summary(&self, pet: PetId) -> PetSummary {
        let mut summary = PetSummary::default();

        for event in self.journal.events_for(pet) {
            summary.total += 1;
            *summary.by_type.entry(event.kind.name().to_string()).or_insert(0) += 1;
            match &event.kind {
                EventKind::Evolved { to, .. } => summary.stage = Some(*to),
                EventKind::Died => summary.deaths += 1,
                EventKind::Revived => summary.revivals += 1,
                EventKind::AchievementUnlocked(achievement) => {
                    summary.achievements.push(*achievement)
                }
                EventKind::Minted => summary.minted_at = Some(event.sequence),
                EventKind::Transferred { to, .. } => {
                    summary.transfers += 1;
                    summary.owner = Some(to.clone());
                }
                EventKind::StatsChanged { .. } => {}
            }
        }

        summary
    }

    /// Unlock counts computed from the retained entries
    ///
    /// Ordered by achievement id; achievements never unlocked are omitted.
    pub fn achievement_totals(&self) -> IndexMap<Achievement, u64> {
        let mut totals: IndexMap<Achievement, u64> = IndexMap::new();
        for achievement in self.journal.events().filter_map(|e| e.unlocked()) {
            *totals.entry(achievement).or_insert(0) += 1;
        }
        totals.sort_keys();
        totals
    }

    /// Count events of a kind, by [`EventKind::name`]
    pub fn count_kind(&self, name: &str) -> u64 {
        self.journal
            .events()
            .filter(|e| e.kind.name() == name)
            .count() as u64
    }

    /// Get all pets that appear in the journal
    pub fn unique_pets(&self) -> Vec<PetId> {
        let mut pets: Vec<PetId> = self.journal.events().map(|e| e.pet).collect();
        pets.sort();
        pets.dedup();
        pets
    }

    /// Get metadata entries
    pub fn metadata(&self) -> Vec<(&str, &str, Sequence)> {
        self.journal
            .entries()
            .iter()
            .filter_map(|entry| {
                if let JournalEntry::Metadata {
                    sequence,
                    key,
                    value,
                } = entry
                {
                    Some((key.as_str(), value.as_str(), *sequence))
                } else {
                    None
                }
            })
            .collect()
    }
}

/// A comprehensive audit report
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// Total number of journal entries
    pub total_entries: usize,
    /// Total number of events
    pub total_events: usize,
    /// Number of distinct pets
    pub pet_count: usize,
    /// First sequence in journal
    pub first_sequence: Option<Sequence>,
    /// Last sequence in journal
    pub last_sequence: Option<Sequence>,
    /// Count of each event type
    pub event_counts: HashMap<String, u64>,
    /// Events by pet
    pub pet_events: HashMap<u64, u64>,
    /// Unlocks by achievement
    pub achievement_unlocks: IndexMap<Achievement, u64>,
}

impl std::fmt::Display for AuditReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Audit Report ===")?;
        writeln!(f, "Total entries: {}", self.total_entries)?;
        writeln!(f, "Total events: {}", self.total_events)?;
        writeln!(f, "Pets: {}", self.pet_count)?;

        if let (Some(first), Some(last)) = (self.first_sequence, self.last_sequence) {
            writeln!(f, "Sequence range: {} - {}", first, last)?;
        }

        if !self.event_counts.is_empty() {
            writeln!(f, "\nEvents by type:")?;
            let mut sorted: Vec<_> = self.event_counts.iter().collect();
            sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (event, count) in sorted {
                writeln!(f, "  {}: {}", event, count)?;
            }
        }

        if !self.achievement_unlocks.is_empty() {
            writeln!(f, "\nAchievements unlocked:")?;
            for (achievement, count) in &self.achievement_unlocks {
                writeln!(f, "  {}: {}", achievement, count)?;
            }
        }

        Ok(())
    }
}

/// Query criteria for filtering journal entries
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    /// Start sequence (inclusive)
    pub start_sequence: Option<Sequence>,
    /// End sequence (inclusive)
    pub end_sequence: Option<Sequence>,
    /// Filter by pet
    pub pet: Option<PetId>,
    /// Filter by event kind name
    pub kind: Option<String>,
    /// Include metadata in results
    pub include_metadata: bool,
    /// Filter metadata by key
    pub metadata_key: Option<String>,
}

impl AuditQuery {
    /// Create a new empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by sequence range
    pub fn in_range(mut self, start: Sequence, end: Sequence) -> Self {
        self.start_sequence = Some(start);
        self.end_sequence = Some(end);
        self
    }

    /// Filter by pet
    pub fn by_pet(mut self, pet: PetId) -> Self {
        self.pet = Some(pet);
        self
    }

    /// Filter by event kind name
    pub fn by_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Include metadata
    pub fn with_metadata(mut self) -> Self {
        self.include_metadata = true;
        self
    }

    /// Filter metadata by key
    pub fn metadata_with_key(mut self, key: impl Into<String>) -> Self {
        self.include_metadata = true;
        self.metadata_key = Some(key.into());
        self
    }

    fn in_window(&self, sequence: Sequence) -> bool {
        self.start_sequence.map_or(true, |start| sequence >= start)
            && self.end_sequence.map_or(true, |end| sequence <= end)
    }

    fn matches(&self, entry: &JournalEntry) -> bool {
        if !self.in_window(entry.sequence()) {
            return false;
        }

        match entry {
            JournalEntry::Event { event, .. } => {
                if let Some(pet) = self.pet {
                    if event.pet != pet {
                        return false;
                    }
                }
                if let Some(ref kind) = self.kind {
                    if event.kind.name() != kind {
                        return false;
                    }
                }
                true
            }
            JournalEntry::Metadata { key, .. } => {
                if !self.include_metadata {
                    return false;
                }
                if let Some(ref filter_key) = self.metadata_key {
                    if key != filter_key {
                        return false;
                    }
                }
                true
            }
        }
    }
}

/// Recorded history of one pet
#[derive(Debug, Clone, Default)]
pub struct PetSummary {
    /// Total number of events
    pub total: u64,
    /// Events grouped by type
    pub by_type: HashMap<String, u64>,
    pub minted_at: Option<Sequence>,
    /// Stage reached by the latest recorded evolution
    pub stage: Option<Stage>,
    pub deaths: u64,
    pub revivals: u64,
    /// Unlocked achievements, in unlock order
    pub achievements: Vec<Achievement>,
    pub transfers: u64,
    /// Recipient of the latest recorded transfer
    pub owner: Option<OwnerId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use petworld_core::{Event, Stats};

    fn create_test_journal() -> Journal {
        let mut journal = Journal::new();
        let mochi = PetId::new(1);
        let tofu = PetId::new(2);

        journal.record(Event::minted(mochi, 0));
        journal.record(Event::achievement(mochi, Achievement::FirstPet, 0));
        journal.record(Event::minted(tofu, 5));
        journal.record(Event::achievement(tofu, Achievement::FirstPet, 5));
        journal.record(Event::stats_changed(
            mochi,
            Stats::NEWBORN,
            Stats::new(100, 1, 100),
            36,
        ));
        journal.record(Event::evolved(mochi, Stage::Egg, Stage::Baby, 36));
        journal.record(Event::achievement(mochi, Achievement::FirstEvolution, 36));
        journal.record(Event::died(tofu, 6000));
        journal.record(Event::revived(tofu, 6100));
        journal.record(Event::achievement(tofu, Achievement::SurvivedDeath, 6100));
        journal.record_metadata(6100, "source", "sweep");
        journal
    }

    #[test]
    fn test_generate_report() {
        let journal = create_test_journal();
        let auditor = Auditor::new(&journal);
        let report = auditor.generate_report();

        assert_eq!(report.total_events, 10);
        assert_eq!(report.pet_count, 2);
        assert_eq!(report.event_counts.get("achievementUnlocked"), Some(&4));
        assert_eq!(report.pet_events.get(&1), Some(&5));
        assert!(report.to_string().contains("Audit Report"));
    }

    #[test]
    fn test_achievement_totals() {
        let journal = create_test_journal();
        let totals = Auditor::new(&journal).achievement_totals();

        assert_eq!(totals.get(&Achievement::FirstPet), Some(&2));
        assert_eq!(totals.get(&Achievement::SurvivedDeath), Some(&1));
        assert_eq!(totals.get(&Achievement::PerfectStats), None);
        let order: Vec<_> = totals.keys().copied().collect();
        assert_eq!(
            order,
            vec![
                Achievement::FirstPet,
                Achievement::FirstEvolution,
                Achievement::SurvivedDeath
            ]
        );
    }

    #[test]
    fn test_pet_summary() {
        let journal = create_test_journal();
        let auditor = Auditor::new(&journal);

        let mochi = auditor.pet_summary(PetId::new(1));
        assert_eq!(mochi.total, 5);
        assert_eq!(mochi.stage, Some(Stage::Baby));
        assert_eq!(mochi.minted_at, Some(0));
        assert_eq!(
            mochi.achievements,
            vec![Achievement::FirstPet, Achievement::FirstEvolution]
        );

        let tofu = auditor.pet_summary(PetId::new(2));
        assert_eq!(tofu.deaths, 1);
        assert_eq!(tofu.revivals, 1);
        assert_eq!(tofu.transfers, 0);
        assert_eq!(tofu.owner, None);
    }

    #[test]
    fn test_pet_summary_follows_transfers() {
        let mut journal = create_test_journal();
        journal.record(Event::transferred(
            PetId::new(1),
            OwnerId::new("alice"),
            OwnerId::new("bob"),
            7000,
        ));
        journal.record(Event::transferred(
            PetId::new(1),
            OwnerId::new("bob"),
            OwnerId::new("carol"),
            7100,
        ));

        let auditor = Auditor::new(&journal);
        let mochi = auditor.pet_summary(PetId::new(1));
        assert_eq!(mochi.transfers, 2);
        assert_eq!(mochi.owner, Some(OwnerId::new("carol")));
        assert_eq!(auditor.count_kind("transferred"), 2);
    }

    #[test]
    fn test_query() {
        let journal = create_test_journal();
        let auditor = Auditor::new(&journal);

        let results = auditor.query(&AuditQuery::new().by_pet(PetId::new(2)).in_range(1, 6000));
        assert_eq!(results.len(), 3);

        let results = auditor.query(&AuditQuery::new().by_kind("died"));
        assert_eq!(results.len(), 1);

        let results = auditor.query(&AuditQuery::new().metadata_with_key("source"));
        assert!(results
            .iter()
            .any(|e| matches!(e, JournalEntry::Metadata { .. })));
    }

    #[test]
    fn test_metadata_and_counts() {
        let journal = create_test_journal();
        let auditor = Auditor::new(&journal);

        assert_eq!(auditor.count_kind("minted"), 2);
        assert_eq!(auditor.unique_pets(), vec![PetId::new(1), PetId::new(2)]);
        assert!(auditor
            .metadata()
            .iter()
            .any(|(k, v, _)| *k == "source" && *v == "sweep"));
    }
}
