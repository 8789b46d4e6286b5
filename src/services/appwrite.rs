use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use crate::models::{DonationRecord, NgoProfile};
use super::store::{RecordFilter, RecordStore, StoreError};

/// Default number of documents requested per page
const DEFAULT_PAGE_SIZE: usize = 100;

/// Appwrite-backed record store
///
/// Reads organization profiles and donation records from the hosted
/// document database. All access is read-only.
pub struct AppwriteStore {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
    page_size: usize,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub organizations: String,
    pub donations: String,
}

impl AppwriteStore {
    /// Create a new Appwrite store
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Override how many documents are fetched per request
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, StoreError> {
        let response = self
            .client
            .get(url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        Ok(response)
    }
}

/// Build Appwrite queries for a record filter and one page
fn build_queries(filter: &RecordFilter, limit: usize, offset: usize) -> Vec<String> {
    let mut queries = Vec::new();

    if let Some(organization_id) = &filter.organization_id {
        queries.push(equal_query("ngoId", organization_id));
    }
    if let Some(status) = filter.status {
        queries.push(equal_query("status", status.as_str()));
    }
    if let Some(city) = &filter.city {
        queries.push(equal_query("city", city));
    }
    if filter.newest_first {
        queries.push("orderDesc(\"createdAt\")".to_string());
    }

    queries.push(format!("limit({})", limit));
    queries.push(format!("offset({})", offset));

    queries
}

fn equal_query(attribute: &str, value: &str) -> String {
    // Value's Display renders a quoted, escaped JSON string
    format!("equal(\"{}\", [{}])", attribute, Value::String(value.to_string()))
}

fn encode_queries(queries: &[String]) -> String {
    queries
        .iter()
        .map(|q| format!("queries%5B%5D={}", urlencoding::encode(q)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Extract a document's body, carrying Appwrite's `$id` over as `id`
fn document_body(doc: &Value) -> Value {
    let mut body = doc.get("data").unwrap_or(doc).clone();

    if let (Some(obj), Some(id)) = (body.as_object_mut(), doc.get("$id")) {
        obj.entry("id").or_insert_with(|| id.clone());
    }

    body
}

fn check_status(status: StatusCode, context: &str) -> Result<(), StoreError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StoreError::Unauthorized);
    }

    if !status.is_success() {
        return Err(StoreError::Api(format!("{}: {}", context, status)));
    }

    Ok(())
}

#[async_trait]
impl RecordStore for AppwriteStore {
    async fn get_organization_profile(&self, id: &str) -> Result<Option<NgoProfile>, StoreError> {
        let url = format!(
            "{}/{}",
            self.collection_url(&self.collections.organizations),
            urlencoding::encode(id)
        );

        tracing::debug!("Fetching organization profile: {}", id);

        let response = self.get(&url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(response.status(), "Failed to fetch organization profile")?;

        let json: Value = response.json().await?;

        serde_json::from_value(document_body(&json))
            .map(Some)
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }

    async fn query_records(&self, filter: &RecordFilter) -> Result<Vec<DonationRecord>, StoreError> {
        let base = self.collection_url(&self.collections.donations);
        let mut records = Vec::new();
        let mut offset = 0;

        loop {
            let queries = build_queries(filter, self.page_size, offset);
            let url = format!("{}?{}", base, encode_queries(&queries));

            let response = self.get(&url).await?;
            check_status(response.status(), "Failed to query donations")?;

            let json: Value = response.json().await?;

            let documents = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))?;

            for doc in documents {
                match serde_json::from_value::<DonationRecord>(document_body(doc)) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!(
                            "Skipping malformed donation {}: {}",
                            doc.get("$id").and_then(|v| v.as_str()).unwrap_or("<unknown>"),
                            e
                        );
                    }
                }
            }

            let page_len = documents.len();
            offset += page_len;

            let total = json.get("total").and_then(|t| t.as_u64());
            let exhausted = total.map_or(false, |t| offset as u64 >= t);

            if page_len < self.page_size || exhausted {
                break;
            }
        }

        tracing::debug!("Queried {} donations with {:?}", records.len(), filter);

        Ok(records)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let url = format!(
            "{}/databases/{}",
            self.base_url.trim_end_matches('/'),
            self.database_id
        );

        let response = self.get(&url).await?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DonationStatus;
    use mockito::Matcher;

    fn create_store(base_url: String) -> AppwriteStore {
        let collections = AppwriteCollections {
            organizations: "organizations".to_string(),
            donations: "donations".to_string(),
        };

        AppwriteStore::new(
            base_url,
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            collections,
        )
        .unwrap()
    }

    #[test]
    fn test_appwrite_store_creation() {
        let store = create_store("https://appwrite.test/v1/".to_string());

        assert_eq!(
            store.collection_url("donations"),
            "https://appwrite.test/v1/databases/test_db/collections/donations/documents"
        );
        assert_eq!(store.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_build_queries() {
        let queries = build_queries(&RecordFilter::delivered_to("ngo-1"), 50, 100);

        assert_eq!(
            queries,
            vec![
                "equal(\"ngoId\", [\"ngo-1\"])".to_string(),
                "equal(\"status\", [\"delivered\"])".to_string(),
                "orderDesc(\"createdAt\")".to_string(),
                "limit(50)".to_string(),
                "offset(100)".to_string(),
            ]
        );
    }

    #[test]
    fn test_document_body_keeps_explicit_id() {
        let doc = serde_json::json!({"$id": "abc", "id": "own"});
        assert_eq!(document_body(&doc)["id"], "own");

        let doc = serde_json::json!({"$id": "abc", "city": "Pune"});
        assert_eq!(document_body(&doc)["id"], "abc");
    }

    #[tokio::test]
    async fn test_get_profile() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex("^/databases/test_db/collections/organizations/documents/ngo-1".to_string()))
            .match_header("X-Appwrite-Key", "test_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"$id": "ngo-1", "city": "Pune", "location": {"latitude": 18.52, "longitude": 73.85}}"#)
            .create_async()
            .await;

        let store = create_store(server.url());
        let profile = store.get_organization_profile("ngo-1").await.unwrap().unwrap();

        mock.assert_async().await;
        assert_eq!(profile.id, "ngo-1");
        assert_eq!(profile.city.as_deref(), Some("Pune"));
    }

    #[tokio::test]
    async fn test_missing_profile_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex("^/databases/test_db/collections/organizations/documents/".to_string()))
            .with_status(404)
            .with_body(r#"{"message": "Document not found"}"#)
            .create_async()
            .await;

        let store = create_store(server.url());
        let profile = store.get_organization_profile("ghost").await.unwrap();

        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let store = create_store(server.url());
        let err = store.query_records(&RecordFilter::default()).await.unwrap_err();

        assert!(matches!(err, StoreError::Unauthorized));
    }

    #[tokio::test]
    async fn test_query_skips_malformed_documents() {
        let body = serde_json::json!({
            "total": 2,
            "documents": [
                {
                    "$id": "d1",
                    "foodType": "Rice",
                    "quantity": 20,
                    "location": {"latitude": 18.52, "longitude": 73.85},
                    "createdAt": "2024-06-10T08:00:00Z",
                    "status": "available",
                    "city": "Pune"
                },
                {"$id": "d2", "foodType": "Veg"}
            ]
        });

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex("^/databases/test_db/collections/donations/documents".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create_async()
            .await;

        let store = create_store(server.url());
        let records = store
            .query_records(&RecordFilter::available_in("Pune"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "d1");
        assert_eq!(records[0].status, DonationStatus::Available);
    }
}
