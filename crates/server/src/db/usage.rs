//! Daily usage counters and chat history persistence.

use lezzet_core::types::{DayKey, UserId};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::firestore::{FieldTransform, FirestoreClient};
use crate::services::CounterStore;

use super::RepositoryError;

const DAILY_USAGE: &str = "user_daily_usage";
const CHAT_HISTORY: &str = "chat_history";

/// Messages kept per user; older ones are pruned on each save.
const HISTORY_KEEP: usize = 5;

fn usage_doc_id(user: &UserId, day: &DayKey) -> String {
    format!("{}_{}", user.as_str(), day.as_str())
}

impl CounterStore for FirestoreClient {
    async fn daily_count(&self, user: &UserId, day: &DayKey) -> Result<u64, RepositoryError> {
        let doc = self.get_document(DAILY_USAGE, &usage_doc_id(user, day)).await?;
        Ok(doc
            .and_then(|d| d.fields.get("total_messages").and_then(Value::as_u64))
            .unwrap_or(0))
    }

    async fn increment_daily(&self, user: &UserId, day: &DayKey) -> Result<(), RepositoryError> {
        let base = json!({
            "user_id": user.as_str(),
            "date": day.as_str(),
        });
        self.commit_transforms(
            DAILY_USAGE,
            &usage_doc_id(user, day),
            &base,
            &[
                FieldTransform::Increment {
                    field: "total_messages".to_string(),
                    by: 1,
                },
                FieldTransform::ServerTimestamp {
                    field: "last_updated".to_string(),
                },
            ],
        )
        .await?;
        Ok(())
    }
}

/// One saved chat exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ChatEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub date: String,
    /// Server-assigned creation time (RFC 3339).
    pub timestamp: Option<String>,
}

/// Repository for chat transcripts.
pub struct ChatRepository<'a> {
    store: &'a FirestoreClient,
}

impl<'a> ChatRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a FirestoreClient) -> Self {
        Self { store }
    }

    /// Save one chat exchange and prune the user's history to the most
    /// recent entries. A failed prune is logged but does not fail the save.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the exchange cannot be written.
    pub async fn save_message(
        &self,
        user: &UserId,
        question: &str,
        answer: &str,
        restaurant_id: &str,
        day: &DayKey,
    ) -> Result<(), RepositoryError> {
        let fields = json!({
            "user_id": user.as_str(),
            "question": question,
            "answer": answer,
            "restaurant_id": restaurant_id,
            "date": day.as_str(),
        });
        self.store.create_document(CHAT_HISTORY, &fields).await?;

        if let Err(err) = self.prune(user).await {
            warn!(user = %user, error = %err, "chat history prune failed");
        }
        Ok(())
    }

    /// The user's most recent chat exchanges, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn history(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<ChatEntry>, RepositoryError> {
        let mut docs = self
            .store
            .query_eq(CHAT_HISTORY, "user_id", &Value::from(user.as_str()))
            .await?;
        docs.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        docs.truncate(limit);

        Ok(docs
            .into_iter()
            .map(|doc| ChatEntry {
                question: field_str(&doc.fields, "question"),
                answer: field_str(&doc.fields, "answer"),
                date: field_str(&doc.fields, "date"),
                timestamp: doc.create_time,
                id: doc.id,
            })
            .collect())
    }

    async fn prune(&self, user: &UserId) -> Result<(), RepositoryError> {
        let mut docs = self
            .store
            .query_eq(CHAT_HISTORY, "user_id", &Value::from(user.as_str()))
            .await?;
        docs.sort_by(|a, b| b.create_time.cmp(&a.create_time));

        for doc in docs.into_iter().skip(HISTORY_KEEP) {
            self.store.delete_document(CHAT_HISTORY, &doc.id).await?;
        }
        Ok(())
    }
}

fn field_str(fields: &Value, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_doc_id_joins_uid_and_day() {
        let day: DayKey = "2026-08-30".parse().expect("valid day");
        assert_eq!(
            usage_doc_id(&UserId::from("abc123"), &day),
            "abc123_2026-08-30"
        );
    }
}
