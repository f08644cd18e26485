use tracing::debug;

use crate::models::{Announcement, FlatRecord};
use crate::projectors::project_family;

/// Configuration for Stage 2 projection
#[derive(Debug, Clone, Default)]
pub struct Stage2Config {
    /// Act-type filter applied to company filings (empty keeps every act)
    pub category: String,
}

/// Result of Stage 2 projection
#[derive(Debug, Default)]
pub struct Stage2Result {
    /// Global columns followed by the family's columns, in announcement order
    pub records: Vec<FlatRecord>,
    /// Announcements dropped by the category filter
    pub filtered: usize,
}

/// Project one announcement into a full output row
pub fn project_announcement(announcement: &Announcement, category: &str) -> Option<FlatRecord> {
    let family_record = project_family(announcement, category)?;
    let mut record = FlatRecord::global(announcement);
    record.extend(family_record);
    Some(record)
}

/// Execute Stage 2: project assembled announcements into flat records
pub fn execute_stage2(announcements: &[Announcement], config: &Stage2Config) -> Stage2Result {
    let mut result = Stage2Result::default();

    for announcement in announcements {
        match project_announcement(announcement, &config.category) {
            Some(record) => result.records.push(record),
            None => {
                debug!(
                    "Announcement {} filtered out (category {:?})",
                    announcement.id, config.category
                );
                result.filtered += 1;
            }
        }
    }

    result
}
