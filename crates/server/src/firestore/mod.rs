//! Firestore REST client - the record store gateway.
//!
//! All persistent records (restaurants, menus, cuisines, users, usage
//! counters, chat history) live in Firestore. This module provides a typed
//! client over the REST v1 surface: document CRUD, field-equality and
//! array-contains queries, and atomic `commit` writes (counter increment,
//! array union) that the store's own concurrency control makes safe.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::config::FirebaseConfig;

mod error;
pub mod value;

pub use error::{ApiError, ApiErrorResponse, FirestoreError};
pub use value::{from_firestore_fields, to_firestore_fields, to_firestore_value};

const FIRESTORE_API_URL: &str = "https://firestore.googleapis.com/v1";

/// A document read from the store, with plain-JSON fields and the
/// server-assigned timestamps.
#[derive(Debug, Clone)]
pub struct Document {
    /// Document ID (last path segment of the resource name).
    pub id: String,
    /// Plain JSON object of the document's fields.
    pub fields: Value,
    /// Server-assigned creation time (RFC 3339).
    pub create_time: Option<String>,
    /// Server-assigned last update time (RFC 3339).
    pub update_time: Option<String>,
}

/// A single atomic field transform applied in a `commit` write.
#[derive(Debug, Clone)]
pub enum FieldTransform {
    /// Atomically add to an integer field (creating it at the delta if absent).
    Increment {
        /// Dotted field path.
        field: String,
        /// Signed delta.
        by: i64,
    },
    /// Append values to an array field, skipping ones already present.
    ArrayUnion {
        /// Dotted field path.
        field: String,
        /// Plain JSON values to append.
        values: Vec<Value>,
    },
    /// Set a field to the server's request time.
    ServerTimestamp {
        /// Dotted field path.
        field: String,
    },
}

impl FieldTransform {
    fn to_wire(&self) -> Value {
        match self {
            Self::Increment { field, by } => json!({
                "fieldPath": field,
                "increment": { "integerValue": by.to_string() }
            }),
            Self::ArrayUnion { field, values } => json!({
                "fieldPath": field,
                "appendMissingElements": {
                    "values": values.iter().map(to_firestore_value).collect::<Vec<_>>()
                }
            }),
            Self::ServerTimestamp { field } => json!({
                "fieldPath": field,
                "setToServerValue": "REQUEST_TIME"
            }),
        }
    }
}

/// Firestore REST client.
///
/// Cheaply cloneable; holds a shared `reqwest::Client` and project
/// coordinates behind an `Arc`.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    client: reqwest::Client,
    project_id: String,
    database_id: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Value,
    #[serde(rename = "createTime")]
    create_time: Option<String>,
    #[serde(rename = "updateTime")]
    update_time: Option<String>,
}

impl From<WireDocument> for Document {
    fn from(wire: WireDocument) -> Self {
        let id = wire
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        Self {
            id,
            fields: from_firestore_fields(&wire.fields),
            create_time: wire.create_time,
            update_time: wire.update_time,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<WireDocument>,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            inner: Arc::new(FirestoreClientInner {
                client: reqwest::Client::new(),
                project_id: config.project_id.clone(),
                database_id: config.database_id.clone(),
                api_key: config.api_key.expose_secret().to_owned(),
            }),
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{FIRESTORE_API_URL}/projects/{}/databases/{}/documents",
            self.inner.project_id, self.inner.database_id
        )
    }

    fn document_name(&self, collection: &str, id: &str) -> String {
        format!(
            "projects/{}/databases/{}/documents/{collection}/{id}",
            self.inner.project_id, self.inner.database_id
        )
    }

    /// Fetch a single document.
    ///
    /// Returns `Ok(None)` if the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError` on transport failure or an API error other
    /// than 404.
    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, FirestoreError> {
        let url = format!("{}/{collection}/{id}", self.documents_url());
        let response = self
            .inner
            .client
            .get(url)
            .query(&[("key", &self.inner.api_key)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let wire: WireDocument = self.handle_response(response).await?;
        Ok(Some(wire.into()))
    }

    /// Create or replace a document at a caller-chosen ID.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError` on transport or API failure.
    #[instrument(skip(self, fields), fields(collection = %collection, id = %id))]
    pub async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: &Value,
    ) -> Result<Document, FirestoreError> {
        let url = format!("{}/{collection}/{id}", self.documents_url());
        let body = json!({ "fields": to_firestore_fields(fields) });
        let response = self
            .inner
            .client
            .patch(url)
            .query(&[("key", &self.inner.api_key)])
            .json(&body)
            .send()
            .await?;

        let wire: WireDocument = self.handle_response(response).await?;
        Ok(wire.into())
    }

    /// Update only the given top-level fields of a document, creating it if
    /// absent (merge semantics).
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError` on transport or API failure.
    #[instrument(skip(self, fields), fields(collection = %collection, id = %id))]
    pub async fn merge_document(
        &self,
        collection: &str,
        id: &str,
        fields: &Value,
    ) -> Result<Document, FirestoreError> {
        let url = format!("{}/{collection}/{id}", self.documents_url());
        let mut query: Vec<(String, String)> = vec![("key".to_owned(), self.inner.api_key.clone())];
        if let Some(map) = fields.as_object() {
            for key in map.keys() {
                query.push(("updateMask.fieldPaths".to_owned(), key.clone()));
            }
        }

        let body = json!({ "fields": to_firestore_fields(fields) });
        let response = self
            .inner
            .client
            .patch(url)
            .query(&query)
            .json(&body)
            .send()
            .await?;

        let wire: WireDocument = self.handle_response(response).await?;
        Ok(wire.into())
    }

    /// Create a document with a store-generated ID.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError` on transport or API failure.
    #[instrument(skip(self, fields), fields(collection = %collection))]
    pub async fn create_document(
        &self,
        collection: &str,
        fields: &Value,
    ) -> Result<Document, FirestoreError> {
        let url = format!("{}/{collection}", self.documents_url());
        let body = json!({ "fields": to_firestore_fields(fields) });
        let response = self
            .inner
            .client
            .post(url)
            .query(&[("key", &self.inner.api_key)])
            .json(&body)
            .send()
            .await?;

        let wire: WireDocument = self.handle_response(response).await?;
        Ok(wire.into())
    }

    /// Delete a document. Deleting a missing document is not an error.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError` on transport or API failure.
    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    pub async fn delete_document(&self, collection: &str, id: &str) -> Result<(), FirestoreError> {
        let url = format!("{}/{collection}/{id}", self.documents_url());
        let response = self
            .inner
            .client
            .delete(url)
            .query(&[("key", &self.inner.api_key)])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// List all documents in a collection, following pagination.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError` on transport or API failure.
    #[instrument(skip(self), fields(collection = %collection))]
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, FirestoreError> {
        let url = format!("{}/{collection}", self.documents_url());
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(String, String)> =
                vec![("key".to_owned(), self.inner.api_key.clone())];
            if let Some(token) = &page_token {
                query.push(("pageToken".to_owned(), token.clone()));
            }

            let response = self
                .inner
                .client
                .get(&url)
                .query(&query)
                .send()
                .await?;

            let page: ListDocumentsResponse = self.handle_response(response).await?;
            documents.extend(page.documents.into_iter().map(Document::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    /// Query a collection for documents whose field equals the given value.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError` on transport or API failure.
    #[instrument(skip(self, value), fields(collection = %collection, field = %field_path))]
    pub async fn query_eq(
        &self,
        collection: &str,
        field_path: &str,
        value: &Value,
    ) -> Result<Vec<Document>, FirestoreError> {
        self.run_query(collection, field_path, "EQUAL", value).await
    }

    /// Query a collection for documents whose array field contains the value.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError` on transport or API failure.
    #[instrument(skip(self, value), fields(collection = %collection, field = %field_path))]
    pub async fn query_array_contains(
        &self,
        collection: &str,
        field_path: &str,
        value: &Value,
    ) -> Result<Vec<Document>, FirestoreError> {
        self.run_query(collection, field_path, "ARRAY_CONTAINS", value)
            .await
    }

    async fn run_query(
        &self,
        collection: &str,
        field_path: &str,
        op: &str,
        value: &Value,
    ) -> Result<Vec<Document>, FirestoreError> {
        let url = format!("{}:runQuery", self.documents_url());
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field_path },
                        "op": op,
                        "value": to_firestore_value(value)
                    }
                }
            }
        });

        let response = self
            .inner
            .client
            .post(url)
            .query(&[("key", &self.inner.api_key)])
            .json(&body)
            .send()
            .await?;

        let items: Vec<RunQueryItem> = self.handle_response(response).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.document.map(Document::from))
            .collect())
    }

    /// Apply atomic transforms to a document, merging the given base fields
    /// in the same write (upsert semantics).
    ///
    /// This is how daily counters increment and editor lists union without a
    /// read-modify-write cycle.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError` on transport or API failure.
    #[instrument(skip(self, base_fields, transforms), fields(collection = %collection, id = %id))]
    pub async fn commit_transforms(
        &self,
        collection: &str,
        id: &str,
        base_fields: &Value,
        transforms: &[FieldTransform],
    ) -> Result<(), FirestoreError> {
        let url = format!("{}:commit", self.documents_url());

        let field_paths: Vec<Value> = base_fields
            .as_object()
            .map(|map| map.keys().map(|k| Value::String(k.clone())).collect())
            .unwrap_or_default();

        let body = json!({
            "writes": [{
                "update": {
                    "name": self.document_name(collection, id),
                    "fields": to_firestore_fields(base_fields)
                },
                "updateMask": { "fieldPaths": field_paths },
                "updateTransforms": transforms.iter().map(FieldTransform::to_wire).collect::<Vec<_>>()
            }]
        });

        let response = self
            .inner
            .client
            .post(url)
            .query(&[("key", &self.inner.api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle a successful response body.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FirestoreError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| FirestoreError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> FirestoreError {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return FirestoreError::Unauthorized(format!("status {status}"));
        }

        match response.text().await {
            Ok(body) => {
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    FirestoreError::Api {
                        status: api_error.error.status,
                        message: api_error.error.message,
                    }
                } else {
                    FirestoreError::Api {
                        status: status.to_string(),
                        message: body,
                    }
                }
            }
            Err(e) => FirestoreError::Http(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_client() -> FirestoreClient {
        FirestoreClient::new(&FirebaseConfig {
            project_id: "lezzet-test".to_string(),
            database_id: "(default)".to_string(),
            api_key: SecretString::from("test-key"),
        })
    }

    #[test]
    fn test_document_name() {
        let client = test_client();
        assert_eq!(
            client.document_name("restaurants", "lezzet-duragi"),
            "projects/lezzet-test/databases/(default)/documents/restaurants/lezzet-duragi"
        );
    }

    #[test]
    fn test_wire_document_id_extraction() {
        let wire = WireDocument {
            name: "projects/p/databases/(default)/documents/menus/abc123".to_string(),
            fields: serde_json::json!({ "name": { "stringValue": "Ana Menü" } }),
            create_time: Some("2024-03-07T12:00:00Z".to_string()),
            update_time: None,
        };

        let doc: Document = wire.into();
        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.fields, serde_json::json!({ "name": "Ana Menü" }));
    }

    #[test]
    fn test_increment_transform_wire_format() {
        let transform = FieldTransform::Increment {
            field: "total_messages".to_string(),
            by: 1,
        };
        assert_eq!(
            transform.to_wire(),
            serde_json::json!({
                "fieldPath": "total_messages",
                "increment": { "integerValue": "1" }
            })
        );
    }

    #[test]
    fn test_array_union_transform_wire_format() {
        let transform = FieldTransform::ArrayUnion {
            field: "editors".to_string(),
            values: vec![serde_json::json!("uid-1")],
        };
        assert_eq!(
            transform.to_wire(),
            serde_json::json!({
                "fieldPath": "editors",
                "appendMissingElements": { "values": [{ "stringValue": "uid-1" }] }
            })
        );
    }

    #[test]
    fn test_firestore_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<FirestoreClient>();
        assert_send_sync::<FirestoreClient>();
    }
}
