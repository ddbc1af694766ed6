//! # CVM Registry Client
//!
//! HTTP implementation of [`FundRegistry`] against the public "fundosweb" API.
//!
//! Every call is bounded by the client timeout. Any failure to obtain a
//! decodable success response is reported as an [`UpstreamError`]; nothing is retried.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap, HeaderName};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use cvm_proxy_common::cnpj::Cnpj;
use cvm_proxy_common::error::UpstreamError;
use cvm_proxy_common::models::{
    DownloadedArtifact, RegistrationDetail, RegistrationSummary, RegulationDocument,
};
use cvm_proxy_common::registry::FundRegistry;

use crate::wire::{self, DocumentsRequest, DownloadRequest, SearchRequest};

const ACCEPT_JSON: &str = "application/json";
const ACCEPT_BINARY: &str = "application/octet-stream";

pub struct CvmClient {
    http: Client,
    base_url: String,
}

impl CvmClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http: Client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create CVM HTTP client")?;

        Ok(Self {
            http,
            base_url: as_directory(base_url),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    fn post_json<B: Serialize>(&self, url: &str, body: &B, accept: &str) -> RequestBuilder {
        self.http
            .post(url)
            .header(ACCEPT, accept)
            .header(CONTENT_TYPE, wire::JSON_CONTENT_TYPE)
            .json(body)
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, UpstreamError> {
        debug!(url, "calling CVM");
        let response: Response = request
            .send()
            .await
            .map_err(|e| UpstreamError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response.text().await.unwrap_or_default();
            return Err(UpstreamError::status(url, status.as_u16(), body));
        }
        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T, UpstreamError> {
        let response: Response = self.send(url, request).await?;
        let status: u16 = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::transport(url, e))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            UpstreamError::payload(url, status, String::from_utf8_lossy(&bytes).into_owned(), e)
        })
    }
}

#[async_trait]
impl FundRegistry for CvmClient {
    async fn search_by_cnpj(&self, cnpj: &Cnpj) -> Result<Vec<RegistrationSummary>, UpstreamError> {
        let url: String = self.url(wire::SEARCH_PATH);
        let request = self.post_json(&url, &SearchRequest::new(cnpj.as_str()), ACCEPT_JSON);
        self.fetch_json(&url, request).await
    }

    async fn fetch_registration(&self, summary_id: i64) -> Result<RegistrationDetail, UpstreamError> {
        let url: String = self.url(&format!("{}/{summary_id}", wire::REGISTRATION_PATH));
        let request = self.http.get(&url).header(ACCEPT, ACCEPT_JSON);
        self.fetch_json(&url, request).await
    }

    async fn list_documents(&self, registration_id: i64) -> Result<Vec<RegulationDocument>, UpstreamError> {
        let url: String = self.url(wire::DOCUMENTS_PATH);
        let request = self.post_json(&url, &DocumentsRequest::new(registration_id), ACCEPT_JSON);
        self.fetch_json(&url, request).await
    }

    async fn download_document(
        &self,
        registration_id: i64,
        file_name: &str,
    ) -> Result<DownloadedArtifact, UpstreamError> {
        let url: String = self.url(wire::DOWNLOAD_PATH);
        let body = DownloadRequest::new(registration_id, file_name);
        let response: Response = self
            .send(&url, self.post_json(&url, &body, ACCEPT_BINARY))
            .await?;

        let headers: &HeaderMap = response.headers();
        let content_disposition: Option<String> = header_string(headers, CONTENT_DISPOSITION);
        let content_type: Option<String> = header_string(headers, CONTENT_TYPE);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::transport(&url, e))?;

        Ok(DownloadedArtifact {
            bytes: bytes.to_vec(),
            content_disposition,
            content_type,
        })
    }
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Makes `base` usable as a prefix for relative endpoint paths.
fn as_directory(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
