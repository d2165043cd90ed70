pub mod dto;
pub mod memory;

use std::env;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;

use crate::error::AppError;

pub use memory::MemoryStore;

/// Records of one collection, keyed by the store-generated key.
pub type Records = serde_json::Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Tasks,
    Contacts,
    Users,
}

impl Collection {
    pub fn path(&self) -> &'static str {
        match self {
            Collection::Tasks => "tasks",
            Collection::Contacts => "contacts",
            Collection::Users => "users",
        }
    }
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub base_url: String,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var("JOIN_BASE_URL")
            .map_err(|_| AppError::Config("JOIN_BASE_URL is not set".to_string()))?;

        Ok(Self::new(base_url))
    }
}

/// REST JSON document store with server-generated child keys.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn fetch_all(&self, collection: Collection) -> Result<Records, AppError>;
    /// Creates a record and returns the key the store assigned to it.
    async fn create(&self, collection: Collection, data: &Value) -> Result<String, AppError>;
    async fn put(&self, collection: Collection, key: &str, data: &Value) -> Result<(), AppError>;
    async fn patch(&self, collection: Collection, key: &str, data: &Value) -> Result<(), AppError>;
    async fn delete(&self, collection: Collection, key: &str) -> Result<(), AppError>;
}

pub struct FirebaseHttpClient {
    client: Client,
    config: StoreConfig,
}

impl FirebaseHttpClient {
    pub fn new(config: StoreConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!(
            "{}/{}.json",
            self.config.base_url.trim_end_matches('/'),
            collection.path()
        )
    }

    fn record_url(&self, collection: Collection, key: &str) -> String {
        format!(
            "{}/{}/{}.json",
            self.config.base_url.trim_end_matches('/'),
            collection.path(),
            key
        )
    }

    async fn check_status(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Store {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl DocumentStore for FirebaseHttpClient {
    async fn fetch_all(&self, collection: Collection) -> Result<Records, AppError> {
        let url = self.collection_url(collection);
        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response).await?;

        let body_text = response.text().await?;
        // An empty collection comes back as `null`.
        let records: Option<Records> = serde_json::from_str(&body_text).map_err(|e| {
            tracing::error!("Failed to parse {} collection: {}", collection.path(), e);
            AppError::Json(e)
        })?;

        let records = records.unwrap_or_default();
        tracing::debug!("Fetched {} {} records", records.len(), collection.path());
        Ok(records)
    }

    async fn create(&self, collection: Collection, data: &Value) -> Result<String, AppError> {
        let url = self.collection_url(collection);
        let response = self.client.post(&url).json(data).send().await?;
        let response = Self::check_status(response).await?;

        let created: dto::PostResponse = response.json().await?;
        tracing::info!("Created {} record {}", collection.path(), created.name);
        Ok(created.name)
    }

    async fn put(&self, collection: Collection, key: &str, data: &Value) -> Result<(), AppError> {
        let url = self.record_url(collection, key);
        let response = self.client.put(&url).json(data).send().await?;
        Self::check_status(response).await?;

        tracing::info!("Overwrote {} record {}", collection.path(), key);
        Ok(())
    }

    async fn patch(&self, collection: Collection, key: &str, data: &Value) -> Result<(), AppError> {
        let url = self.record_url(collection, key);
        let response = self.client.patch(&url).json(data).send().await?;
        Self::check_status(response).await?;

        tracing::info!("Patched {} record {}", collection.path(), key);
        Ok(())
    }

    async fn delete(&self, collection: Collection, key: &str) -> Result<(), AppError> {
        let url = self.record_url(collection, key);
        let response = self.client.delete(&url).send().await?;
        Self::check_status(response).await?;

        tracing::info!("Deleted {} record {}", collection.path(), key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> FirebaseHttpClient {
        FirebaseHttpClient::new(StoreConfig::new(format!("{}/", server.url())))
            .expect("client should build")
    }

    #[tokio::test]
    async fn test_fetch_all_reads_keyed_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tasks.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"-Nabc":{"id":1,"title":"Plan"},"-Nabd":{"id":2,"title":"Build"}}"#)
            .create_async()
            .await;

        let records = client_for(&server)
            .fetch_all(Collection::Tasks)
            .await
            .expect("fetch should succeed");

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records["-Nabd"]["title"], "Build");
    }

    #[tokio::test]
    async fn test_fetch_all_treats_null_as_empty_collection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/contacts.json")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let records = client_for(&server)
            .fetch_all(Collection::Contacts)
            .await
            .expect("fetch should succeed");

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_create_returns_generated_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/users.json")
            .match_body(Matcher::Json(json!({"name": "Anna Berg"})))
            .with_status(200)
            .with_body(r#"{"name":"-Nuser1"}"#)
            .create_async()
            .await;

        let key = client_for(&server)
            .create(Collection::Users, &json!({"name": "Anna Berg"}))
            .await
            .expect("create should succeed");

        mock.assert_async().await;
        assert_eq!(key, "-Nuser1");
    }

    #[tokio::test]
    async fn test_patch_targets_record_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/tasks/-Nabc.json")
            .match_body(Matcher::Json(json!({"subTasksOpen": [], "subTasksClosed": ["a"]})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        client_for(&server)
            .patch(
                Collection::Tasks,
                "-Nabc",
                &json!({"subTasksOpen": [], "subTasksClosed": ["a"]}),
            )
            .await
            .expect("patch should succeed");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_surfaces_as_store_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/tasks/-Nabc.json")
            .with_status(401)
            .with_body(r#"{"error":"Permission denied"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .delete(Collection::Tasks, "-Nabc")
            .await
            .expect_err("delete should fail");

        match err {
            AppError::Store { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Permission denied"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
