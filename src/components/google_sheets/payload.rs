use crate::components::event_extractor::models::{EventRecord, COLUMN_COUNT};
use crate::config::Config;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The block of worksheet rows owned by the sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub worksheet: String,
    /// 1-based
    pub start_row: u32,
    pub max_rows: u32,
}

impl SheetLayout {
    pub fn from_config(config: &Config) -> Self {
        Self {
            worksheet: config.worksheet_name.clone(),
            start_row: config.worksheet_start_row,
            max_rows: config.worksheet_max_rows,
        }
    }

    /// A1 range covering exactly `max_rows` rows
    pub fn range(&self) -> String {
        let last_row = self.start_row + self.max_rows.saturating_sub(1);
        format!("{}!{}:{}", self.worksheet, self.start_row, last_row)
    }
}

/// Body of a `spreadsheets.values.update` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub range: String,
    pub major_dimension: String,
    pub values: Vec<Vec<String>>,
}

/// Update built for one cycle, with how it was shaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetUpdate {
    pub value_range: ValueRange,
    pub event_rows: usize,
    pub empty_rows: usize,
    /// Records dropped because they did not fit
    pub truncated: usize,
}

/// Shape extracted records into a full-range overwrite.
///
/// Short lists are padded with empty rows so stale rows are blanked; long
/// lists keep the oldest `max_rows` records.
pub fn build_update(records: &[EventRecord], layout: &SheetLayout) -> SheetUpdate {
    let max_rows = layout.max_rows as usize;
    let truncated = records.len().saturating_sub(max_rows);
    if truncated > 0 {
        warn!(
            "{} events do not fit in {} rows, dropping the newest {}",
            records.len(),
            max_rows,
            truncated
        );
    }

    let mut values: Vec<Vec<String>> = records
        .iter()
        .take(max_rows)
        .map(EventRecord::to_row)
        .collect();
    let event_rows = values.len();
    values.resize_with(max_rows, || EventRecord::empty().to_row());

    debug_assert!(values.iter().all(|row| row.len() == COLUMN_COUNT));

    SheetUpdate {
        value_range: ValueRange {
            range: layout.range(),
            major_dimension: "ROWS".to_string(),
            values,
        },
        event_rows,
        empty_rows: max_rows - event_rows,
        truncated,
    }
}
