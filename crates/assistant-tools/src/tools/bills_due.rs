//! Upcoming bills tool.

use std::sync::Arc;

use assistant_core::BillLedger;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

const DEFAULT_WITHIN_DAYS: i64 = 7;

/// Lists bills due within a lookahead window.
///
/// Unlike the briefing's per-bill reminder windows, the window here is
/// explicit: the user asked "what's due in the next N days".
///
/// # Parameters
///
/// - `within_days` (optional): Lookahead in days. Defaults to 7.
pub struct GetBillsDue {
    bills: Arc<dyn BillLedger>,
}

impl GetBillsDue {
    pub fn new(bills: Arc<dyn BillLedger>) -> Self {
        Self { bills }
    }
}

#[async_trait]
impl Tool for GetBillsDue {
    fn name(&self) -> &str {
        "get_bills_due"
    }

    fn description(&self) -> &str {
        "Lists the user's bills due within the next N days, soonest first."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "within_days": {
                    "type": "integer",
                    "description": "Lookahead window in days. Defaults to 7."
                }
            },
            "required": []
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let within_days = args.get_i64_opt("within_days")?.unwrap_or(DEFAULT_WITHIN_DAYS);
        if within_days < 0 {
            return Err(ToolError::InvalidParameter {
                name: "within_days".to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        debug!("Listing bills due within {} days for {}", within_days, args.user_id);

        let today = Utc::now().date_naive();
        let mut due: Vec<_> = self
            .bills
            .list_bills(&args.user_id)
            .await?
            .into_iter()
            .filter(|bill| {
                let days_until_due = (bill.due_date - today).num_days();
                (0..=within_days).contains(&days_until_due)
            })
            .collect();
        due.sort_by_key(|bill| bill.due_date);

        if due.is_empty() {
            return Ok(ToolOutput::success(format!(
                "No bills due in the next {} days.",
                within_days
            )));
        }

        let mut out = format!("{} bill(s) due in the next {} days:\n", due.len(), within_days);
        for bill in &due {
            out.push_str(&format!(
                "- {} (${:.2}) due {}\n",
                bill.name, bill.amount, bill.due_date
            ));
        }
        Ok(ToolOutput::success(out))
    }
}
