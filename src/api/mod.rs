use crate::api::error::ApiError;
use crate::models::{
    NewProperty, Property, PropertyId, PropertyUpdate, RentHistory, RentRecord, RentRecordUpsert,
};

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

/// The rent tracking server's JSON API.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RentApi: Send + Sync {
    /// Base URL requests are sent to.
    fn base_url(&self) -> &str;

    /// `GET /api/properties`
    async fn list_properties(&self) -> Result<Vec<Property>, ApiError>;

    /// `POST /api/properties`
    async fn create_property(&self, property: NewProperty) -> Result<Property, ApiError>;

    /// `PUT /api/properties/{id}`
    async fn update_property(
        &self,
        id: PropertyId,
        update: PropertyUpdate,
    ) -> Result<Property, ApiError>;

    /// `DELETE /api/properties/{id}`
    async fn delete_property(&self, id: PropertyId) -> Result<(), ApiError>;

    /// `GET /api/rent-records`
    async fn rent_history(&self) -> Result<RentHistory, ApiError>;

    /// `POST /api/rent-records`, creating or overwriting one month's record.
    async fn upsert_rent_record(&self, record: RentRecordUpsert) -> Result<RentRecord, ApiError>;

    /// `GET /api/export/excel`
    async fn export_spreadsheet(&self) -> Result<Vec<u8>, ApiError>;
}
