use serde::{Deserialize, Serialize};

/// Number of sheet columns an event occupies
pub const COLUMN_COUNT: usize = 7;

/// One Apollo event post, normalized for a sheet row.
///
/// Every field is always present; an empty string stands in for "absent" so
/// the column order never shifts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub start_time: String,
    pub end_time: String,
    pub recurrence: String,
    pub creator: String,
    pub posted_at: String,
    pub title: String,
    pub description: String,
}

impl EventRecord {
    /// Blank row used to clear stale sheet rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Columns in sheet order
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.start_time.clone(),
            self.end_time.clone(),
            self.recurrence.clone(),
            self.creator.clone(),
            self.posted_at.clone(),
            self.title.clone(),
            self.description.clone(),
        ]
    }
}
