//! Imagga API client implementation
//!
//! Talks to the Imagga v2 REST API with basic-auth credentials:
//! - `POST /uploads` registers image bytes (kept by Imagga for 24 hours)
//! - `GET /tags` labels an image by `image_url` or `image_upload_id`
//! - `GET /categories/{categorizer_id}` classifies an image, e.g. `nsfw_beta`

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use urlencoding::encode;

use crate::domain::entities::{ImageLocator, SafetyCategory, SafetyReport, UploadReference};
use crate::domain::ports::TaggingProvider;
use crate::error::ProviderError;

/// Language Imagga always provides for tag and category names
const FALLBACK_LANGUAGE: &str = "en";

/// Helper to deserialize null as default (empty vec, etc.)
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Implementation of the Imagga API client
pub struct ImaggaClient {
    http: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    language: String,
}

impl ImaggaClient {
    pub fn new(base_url: String, api_key: String, api_secret: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_secret,
            language: FALLBACK_LANGUAGE.to_string(),
        }
    }

    /// Preferred language for tag text
    pub fn with_language(mut self, language: String) -> Self {
        self.language = language;
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ProviderError::Protocol(e.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ProviderError::from_status(status.as_u16(), message))
        }
    }

    async fn fetch_tags(&self, query: &[(&str, &str)]) -> Result<Vec<String>, ProviderError> {
        let response = self
            .http
            .get(self.api_url("/tags"))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(query)
            .query(&[("language", self.language.as_str())])
            .send()
            .await?;

        let tags: TagsResponse = self.handle_response(response).await?;
        Ok(extract_labels(tags, &self.language))
    }
}

/// Response types from the Imagga API
#[derive(Deserialize)]
struct ImaggaStatus {
    #[serde(rename = "type")]
    status_type: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    result: UploadResult,
    status: ImaggaStatus,
}

#[derive(Deserialize)]
struct UploadResult {
    upload_id: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    result: TagsResult,
}

#[derive(Deserialize)]
struct TagsResult {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    tags: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    tag: HashMap<String, String>,
}

/// Pull the preferred-language text out of each tag, keeping provider order
fn extract_labels(response: TagsResponse, language: &str) -> Vec<String> {
    response
        .result
        .tags
        .into_iter()
        .filter_map(|mut entry| {
            let label = entry.tag.remove(language);
            if label.is_none() {
                tracing::debug!(language, "Skipping tag without preferred-language text");
            }
            label
        })
        .collect()
}

/// Read a category report leniently: anything short of a complete list of
/// named, scored categories is indeterminate.
fn parse_safety_report(body: &Value) -> SafetyReport {
    let Some(entries) = body
        .pointer("/result/categories")
        .and_then(|c| c.as_array())
    else {
        return SafetyReport::Indeterminate;
    };

    let mut categories = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = match entry.get("name") {
            Some(Value::String(name)) => Some(name.clone()),
            Some(Value::Object(names)) => names
                .get(FALLBACK_LANGUAGE)
                .and_then(|n| n.as_str())
                .map(str::to_string),
            _ => None,
        };
        let confidence = entry.get("confidence").and_then(|c| c.as_f64());

        match (name, confidence) {
            (Some(name), Some(confidence)) => categories.push(SafetyCategory { name, confidence }),
            _ => return SafetyReport::Indeterminate,
        }
    }

    SafetyReport::Categories(categories)
}

#[async_trait]
impl TaggingProvider for ImaggaClient {
    async fn register_upload(
        &self,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<UploadReference, ProviderError> {
        let part = Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
        let form = Form::new().part("image", part);

        let response = self
            .http
            .post(self.api_url("/uploads"))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .multipart(form)
            .send()
            .await?;

        let upload: UploadResponse = self.handle_response(response).await?;
        tracing::debug!(
            upload_id = %upload.result.upload_id,
            status = %upload.status.status_type,
            size = bytes.len(),
            "Registered image upload"
        );

        Ok(UploadReference {
            upload_id: upload.result.upload_id,
            status: upload.status.status_type,
        })
    }

    async fn fetch_labels_for_upload(&self, upload_id: &str) -> Result<Vec<String>, ProviderError> {
        self.fetch_tags(&[("image_upload_id", upload_id)]).await
    }

    async fn fetch_labels_for_url(&self, source_url: &str) -> Result<Vec<String>, ProviderError> {
        self.fetch_tags(&[("image_url", source_url)]).await
    }

    async fn fetch_safety_categories(
        &self,
        categorizer_id: &str,
        locator: ImageLocator<'_>,
    ) -> Result<SafetyReport, ProviderError> {
        let query = match locator {
            ImageLocator::UploadId(id) => ("image_upload_id", id),
            ImageLocator::Url(url) => ("image_url", url),
        };

        let response = self
            .http
            .get(self.api_url(&format!("/categories/{}", encode(categorizer_id))))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(&[query])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), message));
        }

        let body = response.text().await?;
        let report = match serde_json::from_str::<Value>(&body) {
            Ok(value) => parse_safety_report(&value),
            Err(_) => SafetyReport::Indeterminate,
        };

        if report == SafetyReport::Indeterminate {
            tracing::warn!(categorizer_id, "Imagga returned an incomplete safety report");
        }

        Ok(report)
    }
}
