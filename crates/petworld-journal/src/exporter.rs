//! Export journal data to various formats

use crate::{Error, Journal, JournalEntry, JournalStats, Result};
use chrono::{DateTime, Utc};
use petworld_core::{EventKind, Sequence};
use serde::Serialize;
use std::io::Write;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// RON format (Rust Object Notation)
    Ron,
    /// JSON format (requires serde_json feature)
    Json,
    /// CSV format (events only)
    Csv,
    /// Human-readable text format
    Text,
}

/// Exporter for journal data
pub struct Exporter<'a> {
    journal: &'a Journal,
}

impl<'a> Exporter<'a> {
    /// Create a new exporter
    pub fn new(journal: &'a Journal) -> Self {
        Self { journal }
    }

    /// Export to a string in the specified format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Ron => self.to_ron(),
            ExportFormat::Json => self.to_json(),
            ExportFormat::Csv => self.to_csv(),
            ExportFormat::Text => Ok(self.to_text()),
        }
    }

    /// Export to a writer
    pub fn export_to<W: Write>(&self, writer: &mut W, format: ExportFormat) -> Result<()> {
        let content = self.export(format)?;
        writer
            .write_all(content.as_bytes())
            .map_err(|e| Error::ExportError(e.to_string()))?;
        Ok(())
    }

    /// Export to RON format
    pub fn to_ron(&self) -> Result<String> {
        let export = ExportData::from_journal(self.journal, Utc::now());
        ron::ser::to_string_pretty(&export, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Export to JSON format
    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> Result<String> {
        let export = ExportData::from_journal(self.journal, Utc::now());
        serde_json::to_string_pretty(&export).map_err(|e| Error::Serialization(e.to_string()))
    }

    #[cfg(not(feature = "serde_json"))]
    pub fn to_json(&self) -> Result<String> {
        Err(Error::ExportError(
            "JSON export requires the 'serde_json' feature".to_string(),
        ))
    }

    /// Export to CSV format (events only)
    pub fn to_csv(&self) -> Result<String> {
        let mut output = String::new();
        output.push_str("index,sequence,pet,kind,detail\n");

        for entry in self.journal.entries() {
            if let JournalEntry::Event { index, event } = entry {
                let detail = detail(&event.kind).replace('"', "\"\"");
                output.push_str(&format!(
                    "{},{},{},{},\"{}\"\n",
                    index,
                    event.sequence,
                    event.pet.raw(),
                    event.kind.name(),
                    detail
                ));
            }
        }

        Ok(output)
    }

    /// Export to human-readable text format
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        let stats = self.journal.stats();

        output.push_str("=== Journal Export ===\n\n");
        output.push_str(&format!("Total entries: {}\n", stats.total_entries));
        output.push_str(&format!("Events: {}\n", stats.event_count));
        output.push_str(&format!("Pets: {}\n", stats.pet_count));

        if let (Some(first), Some(last)) = (stats.first_sequence, stats.last_sequence) {
            output.push_str(&format!("Sequence range: {} - {}\n", first, last));
        }

        output.push_str("\n=== Entries ===\n");

        let mut current: Option<Sequence> = None;

        for entry in self.journal.entries() {
            let sequence = entry.sequence();
            if current != Some(sequence) {
                output.push_str(&format!("\n--- Sequence {} ---\n", sequence));
                current = Some(sequence);
            }
            match entry {
                JournalEntry::Event { index, event } => {
                    let detail = detail(&event.kind);
                    let detail = if detail.is_empty() {
                        String::new()
                    } else {
                        format!(" {}", detail)
                    };
                    output.push_str(&format!(
                        "  #{} {} {}{}\n",
                        index,
                        event.pet,
                        event.kind.name(),
                        detail
                    ));
                }
                JournalEntry::Metadata { key, value, .. } => {
                    output.push_str(&format!("  [META] {}={}\n", key, value));
                }
            }
        }

        output
    }

    /// Export only entries in a sequence range
    pub fn export_range(&self, start: Sequence, end: Sequence, format: ExportFormat) -> Result<String> {
        if start > end {
            return Err(Error::InvalidRange(start, end));
        }

        let entries: Vec<_> = self
            .journal
            .entries_in_range(start, end)
            .into_iter()
            .cloned()
            .collect();
        let filtered = FilteredExport { entries };

        match format {
            ExportFormat::Ron => {
                ron::ser::to_string_pretty(&filtered, ron::ser::PrettyConfig::default())
                    .map_err(|e| Error::Serialization(e.to_string()))
            }
            #[cfg(feature = "serde_json")]
            ExportFormat::Json => serde_json::to_string_pretty(&filtered)
                .map_err(|e| Error::Serialization(e.to_string())),
            #[cfg(not(feature = "serde_json"))]
            ExportFormat::Json => Err(Error::ExportError(
                "JSON export requires the 'serde_json' feature".to_string(),
            )),
            _ => Err(Error::ExportError(
                "Range export only supports RON and JSON".to_string(),
            )),
        }
    }
}

/// Compact payload description
fn detail(kind: &EventKind) -> String {
    match kind {
        EventKind::StatsChanged { before, after } => format!(
            "happiness {}->{} hunger {}->{} health {}->{}",
            before.happiness,
            after.happiness,
            before.hunger,
            after.hunger,
            before.health,
            after.health
        ),
        EventKind::Evolved { from, to } => format!("{}->{}", from, to),
        EventKind::AchievementUnlocked(achievement) => achievement.to_string(),
        EventKind::Transferred { from, to } => format!("{}->{}", from, to),
        EventKind::Minted | EventKind::Died | EventKind::Revived => String::new(),
    }
}

/// Data structure for full journal export
#[derive(Debug, Clone, Serialize)]
struct ExportData {
    version: u32,
    /// Wall-clock time of the export, RFC 3339
    exported_at: String,
    stats: JournalStats,
    entries: Vec<JournalEntry>,
}

impl ExportData {
    fn from_journal(journal: &Journal, now: DateTime<Utc>) -> Self {
        Self {
            version: 1,
            exported_at: now.to_rfc3339(),
            stats: journal.stats(),
            entries: journal.entries().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct FilteredExport {
    entries: Vec<JournalEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use petworld_core::{Achievement, Event, PetId, Stage, Stats};

    fn create_test_journal() -> Journal {
        let mut journal = Journal::new();
        let pet = PetId::new(1);
        journal.record(Event::minted(pet, 0));
        journal.record(Event::stats_changed(
            pet,
            Stats::NEWBORN,
            Stats::new(99, 2, 100),
            60,
        ));
        journal.record(Event::evolved(pet, Stage::Egg, Stage::Baby, 60));
        journal.record(Event::achievement(pet, Achievement::FirstEvolution, 60));
        journal.record_metadata(60, "test_key", "test_value");
        journal
    }

    #[test]
    fn test_export_ron() {
        let journal = create_test_journal();
        let exporter = Exporter::new(&journal);
        let ron = exporter.to_ron().unwrap();

        assert!(ron.contains("version"));
        assert!(ron.contains("exported_at"));
        assert!(ron.contains("entries"));
    }

    #[test]
    fn test_export_timestamp() {
        let journal = create_test_journal();
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let data = ExportData::from_journal(&journal, at);
        assert_eq!(data.exported_at, "2024-05-01T12:00:00+00:00");
        assert_eq!(data.entries.len(), 5);
    }

    #[test]
    fn test_export_csv() {
        let journal = create_test_journal();
        let exporter = Exporter::new(&journal);
        let csv = exporter.to_csv().unwrap();

        assert!(csv.starts_with("index,sequence,pet,kind,detail\n"));
        assert_eq!(csv.lines().count(), 5);
        assert!(csv.contains("2,60,1,evolved,\"Egg->Baby\""));
    }

    #[test]
    fn test_export_text() {
        let journal = create_test_journal();
        let exporter = Exporter::new(&journal);
        let text = exporter.to_text();

        assert!(text.contains("Journal Export"));
        assert!(text.contains("--- Sequence 60 ---"));
        assert!(text.contains("[META] test_key=test_value"));
    }

    #[test]
    fn test_export_range() {
        let journal = create_test_journal();
        let exporter = Exporter::new(&journal);
        let ron = exporter.export_range(1, 100, ExportFormat::Ron).unwrap();
        assert!(ron.contains("entries"));

        assert!(matches!(
            exporter.export_range(10, 1, ExportFormat::Ron),
            Err(Error::InvalidRange(10, 1))
        ));
        assert!(exporter.export_range(0, 1, ExportFormat::Csv).is_err());
    }

    #[cfg(not(feature = "serde_json"))]
    #[test]
    fn test_json_requires_feature() {
        let journal = create_test_journal();
        assert!(matches!(
            Exporter::new(&journal).to_json(),
            Err(Error::ExportError(_))
        ));
    }
}
