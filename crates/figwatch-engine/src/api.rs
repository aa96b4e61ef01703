//! Revision API seam and its HTTP implementation.

use async_trait::async_trait;
use figwatch_core::errors::{ExError, ExErrorKind, Result};
use figwatch_core::model::{ComponentInfo, SnapshotTree};
use figwatch_core_types::Sensitive;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.figma.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const TOKEN_HEADER: &str = "X-FIGMA-TOKEN";

/// How many labelled versions a history diff compares.
pub const NAMED_VERSIONS_USED: usize = 2;

/// Read access to component metadata and document history.
#[async_trait]
pub trait RevisionApi: Send + Sync {
    /// Metadata of a published component, by component key.
    async fn component_info(&self, key: &str) -> Result<ComponentInfo>;

    /// Ids of labelled versions, newest first, at most [`NAMED_VERSIONS_USED`].
    async fn named_versions(&self, file_key: &str) -> Result<Vec<String>>;

    /// Document tree at `version_id`, restricted to `node_ids` (colon form).
    async fn snapshot(
        &self,
        file_key: &str,
        node_ids: &[String],
        version_id: &str,
    ) -> Result<SnapshotTree>;
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Sensitive<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            token: Sensitive::new(token.into()),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComponentResponse {
    meta: ComponentMeta,
}

#[derive(Debug, Deserialize)]
struct ComponentMeta {
    node_id: String,
    name: String,
    #[serde(default)]
    containing_frame: Option<ContainingFrame>,
}

#[derive(Debug, Deserialize)]
struct ContainingFrame {
    #[serde(default)]
    name: Option<String>,
}

impl From<ComponentMeta> for ComponentInfo {
    fn from(meta: ComponentMeta) -> Self {
        ComponentInfo {
            node_id: meta.node_id,
            name: meta.name,
            containing_frame_name: meta.containing_frame.and_then(|f| f.name),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VersionsResponse {
    #[serde(default)]
    versions: Vec<VersionEntry>,
}

/// Ids of the newest labelled versions; autosaves carry no label.
pub fn labeled_versions(entries: Vec<VersionEntry>) -> Vec<String> {
    entries
        .into_iter()
        .filter(|v| v.label.is_some())
        .map(|v| v.id)
        .take(NAMED_VERSIONS_USED)
        .collect()
}

/// Design-tool REST client.
#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: reqwest::Client,
    base_url: String,
    token: Sensitive<String>,
}

impl FigmaClient {
    /// # Errors
    ///
    /// `Config` when the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::Config)
                    .with_op("build_api_client")
                    .with_message(e.to_string())
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    async fn get_json<T>(&self, op: &str, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, self.token.expose().as_str())
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(op, path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExError::new(ExErrorKind::UpstreamStatus)
                .with_op(op)
                .with_entity_id(path)
                .with_message(format!("status {}: {}", status.as_u16(), body.trim())));
        }

        response.json::<T>().await.map_err(|e| {
            ExError::new(ExErrorKind::UpstreamUnavailable)
                .with_op(op)
                .with_entity_id(path)
                .with_message(format!("unreadable body: {}", e))
        })
    }
}

fn transport_error(op: &str, path: &str, err: reqwest::Error) -> ExError {
    let kind = if err.is_timeout() {
        ExErrorKind::Timeout
    } else {
        ExErrorKind::UpstreamUnavailable
    };
    ExError::new(kind)
        .with_op(op)
        .with_entity_id(path)
        .with_message(err.to_string())
}

#[async_trait]
impl RevisionApi for FigmaClient {
    async fn component_info(&self, key: &str) -> Result<ComponentInfo> {
        let response: ComponentResponse = self
            .get_json("component_info", &format!("components/{}", key), &[])
            .await?;
        Ok(response.meta.into())
    }

    async fn named_versions(&self, file_key: &str) -> Result<Vec<String>> {
        let response: VersionsResponse = self
            .get_json("named_versions", &format!("files/{}/versions", file_key), &[])
            .await?;
        Ok(labeled_versions(response.versions))
    }

    async fn snapshot(
        &self,
        file_key: &str,
        node_ids: &[String],
        version_id: &str,
    ) -> Result<SnapshotTree> {
        let query = [
            ("ids", node_ids.join(",")),
            ("version", version_id.to_string()),
        ];
        let body: Value = self
            .get_json("snapshot", &format!("files/{}", file_key), &query)
            .await?;
        Ok(SnapshotTree::from(body))
    }
}
