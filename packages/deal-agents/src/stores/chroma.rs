//! Chroma vector store client.
//!
//! Talks to a Chroma server's v2 REST API and queries one collection by
//! embedding. Collection creation and indexing happen elsewhere.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{DealError, Result};
use crate::traits::store::{StoreMatch, VectorStore};

const DEFAULT_TENANT: &str = "default_tenant";
const DEFAULT_DATABASE: &str = "default_database";

/// Query-only client for a single Chroma collection.
#[derive(Clone)]
pub struct ChromaStore {
    client: Client,
    base_url: String,
    tenant: String,
    database: String,
    collection_id: String,
    token: Option<String>,
}

impl ChromaStore {
    /// Create a client for `collection_id` on the server at `base_url`.
    pub fn new(base_url: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tenant: DEFAULT_TENANT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection_id: collection_id.into(),
            token: None,
        }
    }

    /// Defaults to `default_tenant`.
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    /// Defaults to `default_database`.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Send `x-chroma-token` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn query_url(&self) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections/{}/query",
            self.base_url, self.tenant, self.database, self.collection_id
        )
    }
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query_embeddings: [&'a [f32]; 1],
    n_results: usize,
    include: [&'static str; 3],
}

/// Chroma returns one inner list per query embedding.
#[derive(Debug, Default, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<Map<String, Value>>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f32>>>>,
}

impl QueryResponse {
    fn into_matches(self) -> Vec<StoreMatch> {
        let ids = self.ids.into_iter().next().unwrap_or_default();
        let mut documents = first_row(self.documents).into_iter();
        let mut metadatas = first_row(self.metadatas).into_iter();
        let mut distances = first_row(self.distances).into_iter();

        ids.iter()
            .map(|id| {
                let document = documents.next().flatten().unwrap_or_else(|| {
                    warn!(id = %id, "Chroma match has no document");
                    String::new()
                });
                StoreMatch {
                    document,
                    metadata: metadatas.next().flatten().unwrap_or_default(),
                    distance: distances.next().flatten(),
                }
            })
            .collect()
    }
}

fn first_row<T>(rows: Option<Vec<Vec<T>>>) -> Vec<T> {
    rows.and_then(|r| r.into_iter().next()).unwrap_or_default()
}

#[async_trait]
impl VectorStore for ChromaStore {
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<StoreMatch>> {
        let request = QueryRequest {
            query_embeddings: [embedding],
            n_results: top_k,
            include: ["documents", "metadatas", "distances"],
        };

        let mut builder = self.client.post(self.query_url()).json(&request);
        if let Some(token) = &self.token {
            builder = builder.header("x-chroma-token", token);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Chroma query failed");
            DealError::retrieval(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DealError::retrieval(format!(
                "Chroma query error ({}): {}",
                status, error_text
            )));
        }

        let payload: QueryResponse = response.json().await.map_err(DealError::retrieval)?;
        let matches = payload.into_matches();

        debug!(
            collection = %self.collection_id,
            requested = top_k,
            returned = matches.len(),
            "Chroma query"
        );
        Ok(matches)
    }
}
