//! Rent Tracker API Client
//!
//! reqwest implementation of [`RentApi`] against the JSON server.

use crate::api::error::ApiError;
use crate::api::RentApi;
use crate::models::{
    NewProperty, Property, PropertyId, PropertyUpdate, RentHistory, RentRecord, RentRecordUpsert,
};
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("rent-tracker/", env!("CARGO_PKG_VERSION"));

const PROPERTIES: &str = "/api/properties";
const RENT_RECORDS: &str = "/api/rent-records";
const EXCEL_EXPORT: &str = "/api/export/excel";

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        let response = Self::handle_response_status(response).await?;
        Self::decode(endpoint, response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        let response = Self::handle_response_status(response).await?;
        Self::decode(endpoint, response).await
    }

    async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        debug!(%url, "PUT");
        let response = self.client.put(&url).json(body).send().await?;
        let response = Self::handle_response_status(response).await?;
        Self::decode(endpoint, response).await
    }

    fn property_endpoint(id: &PropertyId) -> String {
        format!("{}/{}", PROPERTIES, id.as_str())
    }
}

#[async_trait::async_trait]
impl RentApi for ApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_properties(&self) -> Result<Vec<Property>, ApiError> {
        self.get_json(PROPERTIES).await
    }

    async fn create_property(&self, property: NewProperty) -> Result<Property, ApiError> {
        self.post_json(PROPERTIES, &property).await
    }

    async fn update_property(
        &self,
        id: PropertyId,
        update: PropertyUpdate,
    ) -> Result<Property, ApiError> {
        self.put_json(&Self::property_endpoint(&id), &update).await
    }

    async fn delete_property(&self, id: PropertyId) -> Result<(), ApiError> {
        let url = self.build_url(&Self::property_endpoint(&id));
        debug!(%url, "DELETE");
        let response = self.client.delete(&url).send().await?;
        Self::handle_response_status(response).await?;
        Ok(())
    }

    async fn rent_history(&self) -> Result<RentHistory, ApiError> {
        self.get_json(RENT_RECORDS).await
    }

    async fn upsert_rent_record(&self, record: RentRecordUpsert) -> Result<RentRecord, ApiError> {
        self.post_json(RENT_RECORDS, &record).await
    }

    async fn export_spreadsheet(&self) -> Result<Vec<u8>, ApiError> {
        let url = self.build_url(EXCEL_EXPORT);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        let response = Self::handle_response_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_build_url_joins_slashes() {
        assert_eq!(
            client("http://localhost:5000/").build_url("/api/properties"),
            "http://localhost:5000/api/properties"
        );
        assert_eq!(
            client("http://localhost:5000").build_url("api/rent-records"),
            "http://localhost:5000/api/rent-records"
        );
    }

    #[test]
    fn test_property_endpoint() {
        assert_eq!(
            ApiClient::property_endpoint(&PropertyId::new("12")),
            "/api/properties/12"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is closed on test machines.
        let api = client("http://127.0.0.1:9");
        let err = api.list_properties().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
