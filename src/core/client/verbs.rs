//! Typed verb helpers

use super::client::SecureApiClient;
use crate::core::types::{ApiError, ApiResult, ErrorCode, HttpMethod, RequestOptions};
use crate::utils::error::ClientError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| {
        ApiError::new(
            ErrorCode::BadRequest,
            ClientError::Serialization(e).to_string(),
        )
    })
}

impl SecureApiClient {
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.get_with(endpoint, RequestOptions::default()).await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.request(HttpMethod::Get, endpoint, None, options)
            .await?
            .into_typed()
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(HttpMethod::Post, endpoint, body, RequestOptions::default())
            .await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(HttpMethod::Put, endpoint, body, RequestOptions::default())
            .await
    }

    pub async fn patch<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(HttpMethod::Patch, endpoint, body, RequestOptions::default())
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request(HttpMethod::Delete, endpoint, None, RequestOptions::default())
            .await?
            .into_typed()
    }

    /// Send `body` as JSON with explicit options
    pub async fn send_json<B, T>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
        options: RequestOptions,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_body(body)?;
        self.request(method, endpoint, Some(body), options)
            .await?
            .into_typed()
    }
}
