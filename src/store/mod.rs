use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use tracing::{info, warn};

use crate::config::Config;
use crate::model::{NewBillInput, RawBill};
use crate::store::model::CreatedBill;

pub mod model;

const DEFAULT_API_BASE: &str = "http://localhost:5678/";

/// The remote store's list/create/update surface for bills. All three are
/// opaque remote calls that may reject.
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Fetch every bill visible to the current user, in store order.
    async fn list_bills(&self) -> Result<Vec<RawBill>>;

    /// Upload a receipt and open a bill shell for it. Returns the stored
    /// file URL and the key addressing the bill in later updates.
    async fn create_bill(&self, upload: NewUpload) -> Result<CreatedBill>;

    /// Commit the authoritative record for a previously created bill.
    /// The response payload is store-defined and passed through opaquely.
    async fn update_bill(&self, selector: &str, data: &NewBillInput) -> Result<Value>;
}

/// Payload for a receipt upload: the buffered file content plus the
/// submitting user's email, which attributes the bill server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUpload {
    pub email: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Clone)]
pub struct HttpBillStore {
    http: Client,
    base_url: Url,
    token: String,
}

impl fmt::Debug for HttpBillStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBillStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpBillStore {
    pub fn new(token: String) -> Self {
        let base_url = Url::parse(DEFAULT_API_BASE).expect("valid default API URL");
        Self::with_base_url(token, base_url)
    }

    pub fn with_base_url(token: String, base_url: Url) -> Self {
        let http = Client::builder()
            .user_agent("billclerk/0.1")
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url,
            token,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let base_url = Url::parse(&cfg.api.base_url)
            .with_context(|| format!("invalid api.base_url: {}", cfg.api.base_url))?;
        Ok(Self::with_base_url(cfg.api.token.clone(), base_url))
    }

    pub fn build_list_request(&self) -> Result<reqwest::Request> {
        let endpoint = self.base_url.join("bills").context("invalid API base URL")?;
        self.http
            .get(endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .build()
            .context("failed to build list request")
    }

    pub fn build_update_request(&self, selector: &str, body: &NewBillInput) -> Result<reqwest::Request> {
        let endpoint = self
            .base_url
            .join(&format!("bills/{}", selector))
            .context("invalid API base URL")?;
        self.http
            .patch(endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(body)
            .build()
            .context("failed to build update request")
    }

    async fn check_status(res: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        if res.status() == StatusCode::TOO_MANY_REQUESTS {
            let body = res.text().await.unwrap_or_default();
            warn!("rate limited by store: {}", body);
            return Err(anyhow!("received 429 from store: {}", body));
        }
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            warn!("store error on {} - status: {}, body: {}", what, status, body);
            return Err(anyhow!("store {} error {}: {}", what, status, body));
        }
        Ok(res)
    }

    fn content_type_for(file_name: &str) -> &'static str {
        match file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
            Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
            Some(ext) if ext == "png" => "image/png",
            _ => "application/octet-stream",
        }
    }
}

#[async_trait]
impl BillStore for HttpBillStore {
    async fn list_bills(&self) -> Result<Vec<RawBill>> {
        let request = self.build_list_request()?;
        let res = self
            .http
            .execute(request)
            .await
            .context("failed to reach store")?;
        let res = Self::check_status(res, "list").await?;
        let bills = res
            .json::<Vec<RawBill>>()
            .await
            .context("invalid store list response")?;
        Ok(bills)
    }

    async fn create_bill(&self, upload: NewUpload) -> Result<CreatedBill> {
        let endpoint = self.base_url.join("bills").context("invalid API base URL")?;
        let content_type = Self::content_type_for(&upload.file_name);
        let form = reqwest::multipart::Form::new()
            .text("email", upload.email)
            .part(
                "file",
                reqwest::multipart::Part::bytes(upload.content)
                    .file_name(upload.file_name.clone())
                    .mime_str(content_type)?,
            );

        let res = self
            .http
            .post(endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .multipart(form)
            .send()
            .await
            .context("failed to upload receipt")?;
        let res = Self::check_status(res, "create").await?;

        let created: CreatedBill = res
            .json()
            .await
            .context("invalid store create response")?;
        info!(file = %upload.file_name, key = %created.key, "uploaded receipt");
        Ok(created)
    }

    async fn update_bill(&self, selector: &str, data: &NewBillInput) -> Result<Value> {
        let request = self.build_update_request(selector, data)?;
        let res = self
            .http
            .execute(request)
            .await
            .context("failed to reach store")?;
        let res = Self::check_status(res, "update").await?;
        let payload = res
            .json::<Value>()
            .await
            .context("invalid store update response")?;
        Ok(payload)
    }
}
