use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::query::Query;

const REST_PREFIX: &str = "/rest/v1";

pub struct DocumentStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl DocumentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.database_url.trim_end_matches('/').to_string(),
            service_key: config.database_service_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.service_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_key))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Document store error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                409 => anyhow!("Conflict: {}", error_text),
                _ => anyhow!("Document store error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// All records of `collection` matching `query`.
    pub async fn find<T>(&self, collection: &str, query: &Query) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let path = format!("{}/{}{}", REST_PREFIX, collection, query.to_query_string());
        self.request(Method::GET, &path, None).await
    }

    pub async fn find_one<T>(&self, collection: &str, query: Query) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let mut records: Vec<T> = self.find(collection, &query.limit(1)).await?;
        Ok(if records.is_empty() { None } else { Some(records.remove(0)) })
    }

    pub async fn find_by_id<T>(&self, collection: &str, id: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.find_one(collection, Query::new().eq("id", id)).await
    }

    /// Inserts one record and returns the stored representation.
    pub async fn insert<T, R>(&self, collection: &str, record: &T) -> Result<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let path = format!("{}/{}", REST_PREFIX, collection);
        let body = serde_json::to_value(record)?;

        let mut result: Vec<R> = self
            .request_with_headers(Method::POST, &path, Some(body), Some(return_representation()))
            .await?;

        if result.is_empty() {
            return Err(anyhow!("Insert into {} returned no record", collection));
        }

        Ok(result.remove(0))
    }

    /// Applies `patch` to every record matching `query`, returning the updated records.
    pub async fn update<R>(&self, collection: &str, query: &Query, patch: Value) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
    {
        if query.is_unfiltered() {
            return Err(anyhow!("Refusing unfiltered update on {}", collection));
        }

        let path = format!("{}/{}{}", REST_PREFIX, collection, query.to_query_string());
        self.request_with_headers(Method::PATCH, &path, Some(patch), Some(return_representation()))
            .await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

fn return_representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}
