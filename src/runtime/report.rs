use crate::relocate::{Outcome, RenameRecord};

/// Two-line report for one file:
///
/// ```text
/// [Dry run:    ] /music/in/a.mp3
///             -> /music/t/the artist/the album_2001/01_one.mp3
/// ```
///
/// Skips and failures append their reason to the first line.
pub fn format_record(record: &RenameRecord) -> String {
    let label = format!("{}:", record.outcome.action());
    let mut out = format!("[{label:<12}] {}", record.source.display());
    if let Some(reason) = record.reason() {
        out.push_str(&format!(" ({reason})"));
    }
    if let Some(destination) = &record.destination {
        out.push_str(&format!("\n{:>14} {}", "->", destination.display()));
    }
    out
}

/// Counts per outcome for the end-of-run log line and the exit status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub relocated: usize,
    pub previewed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Files planned but not processed because the run was interrupted.
    pub untouched: usize,
}

impl Summary {
    pub fn from_records(records: &[RenameRecord], planned: usize) -> Self {
        let mut summary = Summary {
            untouched: planned.saturating_sub(records.len()),
            ..Summary::default()
        };
        for record in records {
            match record.outcome {
                Outcome::Moved | Outcome::MovedAcrossDevices | Outcome::Copied => {
                    summary.relocated += 1
                }
                Outcome::Previewed(_) => summary.previewed += 1,
                Outcome::Skipped(_) => summary.skipped += 1,
                Outcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.untouched == 0
    }
}
