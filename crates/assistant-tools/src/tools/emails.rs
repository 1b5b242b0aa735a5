//! Email listing tool.

use std::sync::Arc;

use assistant_core::{EmailProvider, EmailQuery};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

const DEFAULT_MAX_RESULTS: i64 = 5;
const MAX_RESULTS_CAP: i64 = 20;

/// Lists the user's recent emails.
///
/// # Parameters
///
/// - `max_results` (optional): How many to return, 1 to 20. Defaults to 5.
/// - `unread_only` (optional): Only unread messages. Defaults to false.
pub struct GetEmails {
    email: Arc<dyn EmailProvider>,
}

impl GetEmails {
    pub fn new(email: Arc<dyn EmailProvider>) -> Self {
        Self { email }
    }
}

#[async_trait]
impl Tool for GetEmails {
    fn name(&self) -> &str {
        "get_emails"
    }

    fn description(&self) -> &str {
        "Lists the user's recent emails, newest first. Can be limited to \
         unread messages."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "max_results": {
                    "type": "integer",
                    "description": "How many emails to return, 1 to 20. Defaults to 5."
                },
                "unread_only": {
                    "type": "boolean",
                    "description": "Only return unread messages. Defaults to false."
                }
            },
            "required": []
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let max_results = args
            .get_i64_opt("max_results")?
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .clamp(1, MAX_RESULTS_CAP) as usize;
        let unread_only = args.get_bool_or("unread_only", false);

        debug!(
            "Listing up to {} emails for {} (unread_only={})",
            max_results, args.user_id, unread_only
        );

        let query = EmailQuery {
            max_results,
            unread_only,
        };
        let mut messages = self.email.list_messages(&args.user_id, &query).await?;
        messages.truncate(max_results);

        if messages.is_empty() {
            let what = if unread_only { "unread emails" } else { "emails" };
            return Ok(ToolOutput::success(format!("No {} found.", what)));
        }

        let mut out = format!("{} email(s):\n", messages.len());
        for message in &messages {
            out.push_str(&format!(
                "- {}from {}: {} ({})\n",
                if message.unread { "[unread] " } else { "" },
                message.sender,
                message.subject,
                message.received_at.format("%Y-%m-%d %H:%M")
            ));
        }
        Ok(ToolOutput::success(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::{EmailFlag, EmailMessage, ProviderError};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    struct FakeEmail {
        messages: Vec<EmailMessage>,
    }

    #[async_trait]
    impl EmailProvider for FakeEmail {
        async fn list_messages(
            &self,
            _user_id: &str,
            query: &EmailQuery,
        ) -> Result<Vec<EmailMessage>, ProviderError> {
            Ok(self
                .messages
                .iter()
                .filter(|m| !query.unread_only || m.unread)
                .take(query.max_results)
                .cloned()
                .collect())
        }

        async fn get_message(
            &self,
            _user_id: &str,
            _message_id: &str,
        ) -> Result<String, ProviderError> {
            unimplemented!()
        }

        async fn send_reply(
            &self,
            _user_id: &str,
            _message_id: &str,
            _body: &str,
        ) -> Result<(), ProviderError> {
            unimplemented!()
        }

        async fn modify_flags(
            &self,
            _user_id: &str,
            _message_id: &str,
            _flag: EmailFlag,
        ) -> Result<(), ProviderError> {
            unimplemented!()
        }
    }

    fn email(sender: &str, subject: &str, unread: bool) -> EmailMessage {
        EmailMessage {
            id: format!("msg-{}", subject),
            sender: sender.to_string(),
            subject: subject.to_string(),
            snippet: String::new(),
            received_at: Utc.with_ymd_and_hms(2026, 8, 29, 8, 0, 0).unwrap(),
            unread,
            starred: false,
            important: false,
        }
    }

    fn args(params: Value) -> ToolArgs {
        let map: HashMap<String, Value> = params
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        ToolArgs::new(map, "user-1")
    }

    #[tokio::test]
    async fn test_list_emails() {
        let tool = GetEmails::new(Arc::new(FakeEmail {
            messages: vec![
                email("alice@example.com", "Invoice", true),
                email("bob@example.com", "Lunch", false),
            ],
        }));

        let result = tool.execute(args(json!({}))).await.unwrap();
        assert!(result.content.contains("Invoice"));
        assert!(result.content.contains("Lunch"));
        assert!(result.content.contains("[unread]"));
    }

    #[tokio::test]
    async fn test_unread_only() {
        let tool = GetEmails::new(Arc::new(FakeEmail {
            messages: vec![
                email("alice@example.com", "Invoice", true),
                email("bob@example.com", "Lunch", false),
            ],
        }));

        let result = tool.execute(args(json!({"unread_only": true}))).await.unwrap();
        assert!(result.content.contains("Invoice"));
        assert!(!result.content.contains("Lunch"));
    }

    #[tokio::test]
    async fn test_max_results_clamped() {
        let tool = GetEmails::new(Arc::new(FakeEmail {
            messages: (0..30)
                .map(|i| email("a@example.com", &format!("Message {}", i), false))
                .collect(),
        }));

        let result = tool.execute(args(json!({"max_results": 100}))).await.unwrap();
        assert!(result.content.starts_with("20 email(s)"));
    }

    #[tokio::test]
    async fn test_empty_inbox() {
        let tool = GetEmails::new(Arc::new(FakeEmail { messages: vec![] }));

        let result = tool.execute(args(json!({}))).await.unwrap();
        assert!(result.content.contains("No emails"));
    }
}
