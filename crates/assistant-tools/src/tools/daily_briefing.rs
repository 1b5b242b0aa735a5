//! Daily briefing tool.

use std::sync::Arc;

use async_trait::async_trait;
use briefing::{BriefingAggregator, BriefingChannel};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Delivers the daily briefing by delegating to the aggregator.
///
/// Takes no parameters; the aggregator handles per-user preferences and
/// the once-per-day idempotency check itself.
pub struct GetDailyBriefing {
    aggregator: Arc<BriefingAggregator>,
}

impl GetDailyBriefing {
    pub fn new(aggregator: Arc<BriefingAggregator>) -> Self {
        Self { aggregator }
    }
}

#[async_trait]
impl Tool for GetDailyBriefing {
    fn name(&self) -> &str {
        "get_daily_briefing"
    }

    fn description(&self) -> &str {
        "Delivers the user's daily briefing: today's calendar, important \
         emails, and bills due soon. Use when the user asks for their \
         briefing or a summary of their day."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        debug!("Generating briefing for {}", args.user_id);

        let outcome = self
            .aggregator
            .generate(&args.user_id, BriefingChannel::Voice)
            .await;

        Ok(ToolOutput::success(outcome.text))
    }
}
