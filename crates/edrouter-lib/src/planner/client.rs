use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Public planner API used when no override is configured.
pub const DEFAULT_API_BASE: &str = "https://spansh.co.uk/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A single request/response exchange with the route planner.
///
/// Jobs only ever issue GETs with query parameters and read back a JSON body,
/// which keeps fakes trivial to script in tests.
pub trait PlannerTransport: Send + Sync {
    fn fetch(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Value>> + Send;
}

impl<T: PlannerTransport> PlannerTransport for std::sync::Arc<T> {
    fn fetch(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Value>> + Send {
        (**self).fetch(path, query)
    }
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpPlanner {
    client: Client,
    base_url: String,
}

impl HttpPlanner {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent())
            .build()
            .map_err(Error::Http)?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PlannerTransport for HttpPlanner {
    async fn fetch(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!(url = %url, params = query.len(), "planner request");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let parsed = serde_json::from_slice::<Value>(&body);

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("planner returned HTTP {status} for {path}"));
            return Err(Error::Planner { message });
        }

        parsed.map_err(|err| Error::MalformedResult {
            message: format!("{path} response is not JSON: {err}"),
        })
    }
}

fn user_agent() -> String {
    format!("edrouter-lib/{}", env!("CARGO_PKG_VERSION"))
}

/// Closest catalogued system to a point in galactic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestSystem {
    pub name: String,
    pub distance: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Deserialize)]
struct NearestResponse {
    system: NearestSystem,
}

/// Look up the catalogued system nearest to `(x, y, z)`.
pub async fn nearest<T: PlannerTransport>(
    transport: &T,
    x: f64,
    y: f64,
    z: f64,
) -> Result<NearestSystem> {
    let query = vec![
        ("x".to_string(), x.to_string()),
        ("y".to_string(), y.to_string()),
        ("z".to_string(), z.to_string()),
    ];
    let value = transport.fetch("nearest", &query).await?;
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(Error::Planner {
            message: message.to_string(),
        });
    }
    let response = NearestResponse::deserialize(&value).map_err(|err| Error::MalformedResult {
        message: format!("nearest response: {err}"),
    })?;
    Ok(response.system)
}
