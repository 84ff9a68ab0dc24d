use crate::components::chat_history::HistorySource;
use crate::components::event_extractor::EventExtractor;
use crate::components::google_sheets::{build_update, AccessTokenSource, SheetLayout, SheetsApi};
use crate::error::BotResult;
use chrono::{DateTime, Utc};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Outcome of one successful cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub event_rows: usize,
    pub empty_rows: usize,
    pub truncated: usize,
}

/// State that lives for exactly one cycle
#[derive(Debug, Clone)]
pub struct CycleContext {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl CycleContext {
    fn open() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    fn close(self) {
        let elapsed = Utc::now() - self.started_at;
        info!("Cycle finished in {} ms", elapsed.num_milliseconds());
    }
}

/// Everything one cycle needs, wired once at startup
pub struct SyncPipeline {
    history: Box<dyn HistorySource>,
    tokens: Box<dyn AccessTokenSource>,
    sheets: Box<dyn SheetsApi>,
    extractor: EventExtractor,
    layout: SheetLayout,
}

impl SyncPipeline {
    pub fn new(
        history: Box<dyn HistorySource>,
        tokens: Box<dyn AccessTokenSource>,
        sheets: Box<dyn SheetsApi>,
        extractor: EventExtractor,
        layout: SheetLayout,
    ) -> Self {
        Self {
            history,
            tokens,
            sheets,
            extractor,
            layout,
        }
    }

    /// Fetch, extract and overwrite the sheet range.
    ///
    /// Any failure before the update returns early, so the sheet is either
    /// fully rewritten or untouched.
    pub async fn run_cycle(&self) -> BotResult<CycleReport> {
        let context = CycleContext::open();
        let span = info_span!("sync_cycle", cycle = %context.id);

        let result = self.run_steps().instrument(span.clone()).await;

        let _entered = span.enter();
        if let Err(e) = &result {
            error!("Cycle aborted: {}", e);
        }
        context.close();
        result
    }

    async fn run_steps(&self) -> BotResult<CycleReport> {
        let markup = self.history.fetch_markup().await?;

        let extraction = self.extractor.extract(&markup);
        info!(
            "Extracted {} events, skipped {} message blocks",
            extraction.count(),
            extraction.skipped
        );

        let access_token = self.tokens.access_token().await?;

        let update = build_update(&extraction.records, &self.layout);
        self.sheets
            .update_values(&update.value_range, &access_token)
            .await?;

        info!("Finished updating worksheet");
        info!("Number of rows with event data: {}", update.event_rows);
        info!("Number of rows with empty data: {}", update.empty_rows);

        Ok(CycleReport {
            event_rows: update.event_rows,
            empty_rows: update.empty_rows,
            truncated: update.truncated,
        })
    }
}
