// API client module: the `CatalogApi` seam the controller talks through,
// and `HttpCatalog`, its implementation against the cupcake server's JSON
// endpoints. Responses are unwrapped from their `{cupcake}` / `{cupcakes}`
// envelopes here so callers only ever see records or an `ApiError`.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::model::{Cupcake, CupcakeId, CupcakePayload};
use regex::Regex;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// The remote catalog. Every method settles exactly once with either the
/// decoded result or the reason there is none.
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    async fn fetch_all(&self) -> Result<Vec<Cupcake>, ApiError>;
    async fn get(&self, id: CupcakeId) -> Result<Cupcake, ApiError>;
    async fn create(&self, data: &CupcakePayload) -> Result<Cupcake, ApiError>;
    async fn search(&self, term: &str) -> Result<Vec<Cupcake>, ApiError>;
    async fn update(&self, id: CupcakeId, data: &CupcakePayload) -> Result<Cupcake, ApiError>;
    async fn delete(&self, id: CupcakeId) -> Result<Confirmation, ApiError>;
}

/// Whatever the server sent back for a delete. Only a truthy confirmation
/// allows the entry to be removed from the view.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation(pub serde_json::Value);

impl Confirmation {
    /// JavaScript truthiness: null, false, 0 and "" are falsy, everything
    /// else (including empty objects and arrays) is truthy.
    pub fn is_truthy(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => false,
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            serde_json::Value::String(s) => !s.is_empty(),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
        }
    }
}

#[derive(Deserialize, Debug)]
struct CupcakeList {
    cupcakes: Vec<Cupcake>,
}

#[derive(Deserialize, Debug)]
struct SingleCupcake {
    cupcake: Cupcake,
}

/// Catalog client over HTTP. Holds a cookie store so the session cookie the
/// anti-forgery token is bound to travels with every request.
#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(HttpCatalog { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.api_url.clone(), config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Load the index page and pull the anti-forgery token out of its hidden
    /// `csrf_token` input. The session cookie set by that response is kept.
    pub async fn discover_csrf_token(&self) -> Result<String, ApiError> {
        debug!(event = "api.csrf.discover_started", url = %self.base_url);
        let res = self.client.get(self.url("/")).send().await?;
        let page = read_body(res).await?;
        let token = extract_csrf_token(&page).ok_or(ApiError::absent("csrf_token"))?;
        debug!(event = "api.csrf.discover_completed");
        Ok(token)
    }
}

impl CatalogApi for HttpCatalog {
    async fn fetch_all(&self) -> Result<Vec<Cupcake>, ApiError> {
        debug!(event = "api.fetch_all.started");
        let res = self.client.get(self.url("/api/cupcakes")).send().await?;
        let list: CupcakeList = parse_envelope(&read_body(res).await?, "cupcakes")?;
        Ok(list.cupcakes)
    }

    async fn get(&self, id: CupcakeId) -> Result<Cupcake, ApiError> {
        debug!(event = "api.get.started", id = %id);
        let res = self
            .client
            .get(self.url(&format!("/api/cupcakes/{}", id)))
            .send()
            .await?;
        let single: SingleCupcake = parse_envelope(&read_body(res).await?, "cupcake")?;
        Ok(single.cupcake)
    }

    async fn create(&self, data: &CupcakePayload) -> Result<Cupcake, ApiError> {
        debug!(event = "api.create.started", flavor = %data.flavor);
        let res = self
            .client
            .post(self.url("/api/cupcakes"))
            .json(data)
            .send()
            .await?;
        let single: SingleCupcake = parse_envelope(&read_body(res).await?, "cupcake")?;
        Ok(single.cupcake)
    }

    async fn search(&self, term: &str) -> Result<Vec<Cupcake>, ApiError> {
        debug!(event = "api.search.started", term = term);
        let res = self
            .client
            .get(self.url("/api/cupcakes/search"))
            .query(&[("term", term)])
            .send()
            .await?;
        let list: CupcakeList = parse_envelope(&read_body(res).await?, "cupcakes")?;
        Ok(list.cupcakes)
    }

    async fn update(&self, id: CupcakeId, data: &CupcakePayload) -> Result<Cupcake, ApiError> {
        debug!(event = "api.update.started", id = %id);
        let res = self
            .client
            .patch(self.url(&format!("/api/cupcakes/{}", id)))
            .json(data)
            .send()
            .await?;
        let single: SingleCupcake = parse_envelope(&read_body(res).await?, "cupcake")?;
        Ok(single.cupcake)
    }

    async fn delete(&self, id: CupcakeId) -> Result<Confirmation, ApiError> {
        debug!(event = "api.delete.started", id = %id);
        let res = self
            .client
            .delete(self.url(&format!("/api/cupcakes/{}", id)))
            .send()
            .await?;
        let value: serde_json::Value = parse_envelope(&read_body(res).await?, "confirmation")?;
        Ok(Confirmation(value))
    }
}

/// Read the body, turning a non-success status into `ApiError::Status`.
async fn read_body(res: Response) -> Result<String, ApiError> {
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

// The server answers failed form validation with a 200 and a plain-text
// body, so a body that does not decode is an absent result, not a transport error.
fn parse_envelope<T: DeserializeOwned>(body: &str, expected: &'static str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        debug!(event = "api.envelope_rejected", expected = expected, error = %e);
        ApiError::absent(expected)
    })
}

fn extract_csrf_token(page: &str) -> Option<String> {
    static INPUT: OnceLock<Regex> = OnceLock::new();
    static VALUE: OnceLock<Regex> = OnceLock::new();
    let input = INPUT.get_or_init(|| {
        Regex::new(r#"<input[^>]*\bid="csrf_token"[^>]*>"#).expect("valid csrf input pattern")
    });
    let value = VALUE
        .get_or_init(|| Regex::new(r#"\bvalue="([^"]*)""#).expect("valid csrf value pattern"));

    let tag = input.find(page)?;
    let token = value.captures(tag.as_str())?.get(1)?.as_str();
    (!token.is_empty()).then(|| token.to_string())
}
