//! The dashboard controller.
//!
//! [`RentTracker`] owns the cached properties and rent history, applies
//! server responses to that cache and reports failures as transient
//! notifications. The cache only changes after the server confirms.

use crate::api::error::ApiError;
use crate::api::RentApi;
use crate::derive::{self, Activity, MonthSummary, RecordRow, RentStatus};
use crate::error::TrackerError;
use crate::export;
use crate::models::{MonthKey, Property, PropertyId, RentHistory, RentRecord, RentRecordUpsert};
use crate::notify::Notifications;
use crate::validation::{PropertyEdit, PropertyForm};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this property? \
This will also remove all rent tracking history for this property.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    pub properties: Vec<Property>,
    pub rent_history: RentHistory,
}

/// One property's record for one month, as shown in the details dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct RentDetails {
    pub property: Property,
    pub month: MonthKey,
    pub record: RentRecord,
}

impl RentDetails {
    pub fn amount(&self) -> f64 {
        self.record.rent_amount.unwrap_or(self.property.rent())
    }
}

/// Input of the payment capture dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct RentCollection {
    pub property_id: PropertyId,
    pub month: MonthKey,
    pub received_date: Option<NaiveDate>,
    pub payment_mode: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionPrompt {
    /// Rent for the month is already in; show the receipt instead.
    AlreadyReceived(RentDetails),
    Collect(RentCollection),
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

pub struct RentTracker<A: RentApi> {
    api: A,
    state: TrackerState,
    current: MonthKey,
    notifications: Notifications,
    today: fn() -> NaiveDate,
}

impl<A: RentApi> RentTracker<A> {
    pub fn new(api: A) -> Self {
        Self::with_clock(api, utc_today)
    }

    /// Uses `today` wherever the current date is needed.
    pub fn with_clock(api: A, today: fn() -> NaiveDate) -> Self {
        Self {
            api,
            state: TrackerState::default(),
            current: MonthKey::of(today()),
            notifications: Notifications::new(),
            today,
        }
    }

    pub fn with_state(mut self, state: TrackerState) -> Self {
        self.state = state;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn properties(&self) -> &[Property] {
        &self.state.properties
    }

    pub fn rent_history(&self) -> &RentHistory {
        &self.state.rent_history
    }

    pub fn property(&self, id: &PropertyId) -> Option<&Property> {
        self.state.properties.iter().find(|p| &p.id == id)
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    pub fn current_month(&self) -> MonthKey {
        self.current
    }

    /// Years offered by the month selector: two back, one ahead.
    pub fn selectable_years(&self) -> RangeInclusive<i32> {
        let year = self.today().year();
        (year - 2)..=(year + 1)
    }

    /// Returns false when `key` falls outside [`Self::selectable_years`].
    pub fn set_current_month(&mut self, key: MonthKey) -> bool {
        if !self.selectable_years().contains(&key.year) {
            return false;
        }
        self.current = key;
        true
    }

    pub fn next_month(&mut self) -> bool {
        self.set_current_month(self.current.next())
    }

    pub fn prev_month(&mut self) -> bool {
        self.set_current_month(self.current.prev())
    }

    /// Logs a failed request, raises the error banner and hands the error back.
    fn report(&mut self, action: &str, err: impl Into<TrackerError>) -> TrackerError {
        let err = err.into();
        error!("Failed to {}: {}", action, err);
        self.notifications.error(format!("Failed to {}", action));
        err
    }

    /// Fetches properties and rent history. Prior state is kept unless both
    /// requests succeed.
    pub async fn load(&mut self) -> Result<(), TrackerError> {
        match fetch_all(&self.api).await {
            Ok((properties, rent_history)) => {
                info!(
                    properties = properties.len(),
                    records = rent_history.record_count(),
                    "loaded data from server"
                );
                self.state = TrackerState {
                    properties,
                    rent_history,
                };
                Ok(())
            }
            Err(e) => Err(self.report("load data from server", e)),
        }
    }

    pub async fn create_property(&mut self, form: &PropertyForm) -> Result<Property, TrackerError> {
        let new_property = form.validate()?;
        match self.api.create_property(new_property).await {
            Ok(property) => {
                info!(id = %property.id, name = %property.name, "property created");
                self.state.properties.push(property.clone());
                self.notifications.success("Property added successfully!");
                Ok(property)
            }
            Err(e) => Err(self.report("save property", e)),
        }
    }

    pub async fn update_property(
        &mut self,
        id: &PropertyId,
        edit: &PropertyEdit,
    ) -> Result<Property, TrackerError> {
        let update = edit.validate()?;
        if self.property(id).is_none() {
            return Err(TrackerError::UnknownProperty(id.clone()));
        }

        match self.api.update_property(id.clone(), update).await {
            Ok(updated) => {
                info!(%id, "property updated");
                if let Some(slot) = self.state.properties.iter_mut().find(|p| &p.id == id) {
                    *slot = updated.clone();
                }
                self.notifications.success("Property updated successfully!");
                Ok(updated)
            }
            Err(e) => Err(self.report("update property", e)),
        }
    }

    /// Deletes a property once `confirm` agrees. Returns `Ok(false)` when the
    /// user declined, in which case nothing is sent.
    pub async fn delete_property<F>(&mut self, id: &PropertyId, confirm: F) -> Result<bool, TrackerError>
    where
        F: FnOnce(&Property) -> bool,
    {
        let property = self
            .property(id)
            .ok_or_else(|| TrackerError::UnknownProperty(id.clone()))?;
        if !confirm(property) {
            return Ok(false);
        }

        match self.api.delete_property(id.clone()).await {
            Ok(()) => {
                self.state.properties.retain(|p| &p.id != id);
                let purged = self.state.rent_history.purge_property(id);
                info!(%id, purged, "property deleted");
                self.notifications.success("Property deleted successfully!");
                Ok(true)
            }
            Err(e) => Err(self.report("delete property", e)),
        }
    }

    /// Flips the received flag for one property and month.
    pub async fn toggle_rent_status(
        &mut self,
        id: &PropertyId,
        key: MonthKey,
    ) -> Result<RentRecord, TrackerError> {
        let current = self
            .state
            .rent_history
            .get(key, id)
            .cloned()
            .unwrap_or_default();
        let received = !current.received;
        let received_date = if received {
            current.received_date.or_else(|| Some(self.today()))
        } else {
            None
        };

        let upsert = RentRecordUpsert {
            property_id: id.clone(),
            month: key.month,
            year: key.year,
            expected_date: current.expected_date,
            received_date,
            received,
            payment_mode: current.payment_mode.filter(|_| received),
            rent_amount: current.rent_amount.filter(|_| received),
        };
        self.save_record(upsert, "update rent status").await
    }

    /// Saves both dates; the record counts as received iff it has a received date.
    pub async fn update_rent_dates(
        &mut self,
        id: &PropertyId,
        key: MonthKey,
        expected_date: Option<NaiveDate>,
        received_date: Option<NaiveDate>,
    ) -> Result<RentRecord, TrackerError> {
        let current = self.state.rent_history.get(key, id).cloned().unwrap_or_default();
        let received = received_date.is_some();

        let upsert = RentRecordUpsert {
            property_id: id.clone(),
            month: key.month,
            year: key.year,
            expected_date,
            received_date,
            received,
            payment_mode: current.payment_mode.filter(|_| received),
            rent_amount: current.rent_amount.filter(|_| received),
        };
        let record = self.save_record(upsert, "update rent record").await?;
        self.notifications.success("Rent details updated successfully!");
        Ok(record)
    }

    /// Received date implied by the details dialog's checkbox: ticking it
    /// without a date means today, clearing it drops the date.
    pub fn details_received_date(&self, checked: bool, date: Option<NaiveDate>) -> Option<NaiveDate> {
        if checked {
            date.or_else(|| Some(self.today()))
        } else {
            None
        }
    }

    pub fn rent_details(&self, id: &PropertyId, key: MonthKey) -> Option<RentDetails> {
        let property = self.property(id)?.clone();
        let record = self.state.rent_history.get(key, id).cloned().unwrap_or_default();
        Some(RentDetails {
            property,
            month: key,
            record,
        })
    }

    /// Starts the payment capture flow for the viewed month.
    pub fn open_collection(&self, id: &PropertyId) -> Result<CollectionPrompt, TrackerError> {
        self.collection_for(id, self.current)
    }

    pub fn collection_for(&self, id: &PropertyId, key: MonthKey) -> Result<CollectionPrompt, TrackerError> {
        let details = self
            .rent_details(id, key)
            .ok_or_else(|| TrackerError::UnknownProperty(id.clone()))?;

        if details.record.received {
            return Ok(CollectionPrompt::AlreadyReceived(details));
        }

        Ok(CollectionPrompt::Collect(RentCollection {
            property_id: id.clone(),
            month: key,
            received_date: Some(self.today()),
            payment_mode: None,
            due_date: derive::due_date(&details.property, key),
            amount: details.property.rent(),
        }))
    }

    /// Records a payment with the property's current rent as the amount.
    pub async fn record_collection(
        &mut self,
        collection: &RentCollection,
    ) -> Result<RentRecord, TrackerError> {
        let received_date = collection
            .received_date
            .ok_or(TrackerError::MissingReceivedDate)?;
        let property = self
            .property(&collection.property_id)
            .ok_or_else(|| TrackerError::UnknownProperty(collection.property_id.clone()))?;
        let rent_amount = property.rent();
        let expected_date = self
            .state
            .rent_history
            .get(collection.month, &collection.property_id)
            .and_then(|r| r.expected_date)
            .or(collection.due_date);

        let upsert = RentRecordUpsert {
            property_id: collection.property_id.clone(),
            month: collection.month.month,
            year: collection.month.year,
            expected_date,
            received_date: Some(received_date),
            received: true,
            payment_mode: collection
                .payment_mode
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            rent_amount: Some(rent_amount),
        };
        let record = self.save_record(upsert, "record rent payment").await?;
        self.notifications.success("Rent payment recorded successfully!");
        Ok(record)
    }

    async fn save_record(
        &mut self,
        upsert: RentRecordUpsert,
        action: &str,
    ) -> Result<RentRecord, TrackerError> {
        let key = upsert.key();
        let id = upsert.property_id.clone();
        match self.api.upsert_rent_record(upsert).await {
            Ok(record) => {
                info!(%id, month = %key, received = record.received, "rent record saved");
                self.state.rent_history.upsert(key, id, record.clone());
                Ok(record)
            }
            Err(e) => Err(self.report(action, e)),
        }
    }

    pub fn status(&self, id: &PropertyId, key: MonthKey) -> RentStatus {
        derive::rent_status(&self.state.rent_history, key, id)
    }

    /// Dashboard metrics for the viewed month.
    pub fn summary(&self) -> MonthSummary {
        self.summary_for(self.current)
    }

    pub fn summary_for(&self, key: MonthKey) -> MonthSummary {
        derive::month_summary(&self.state.properties, &self.state.rent_history, key)
    }

    pub fn recent_activity(&self, now: DateTime<Utc>) -> Vec<Activity> {
        derive::recent_activity(&self.state.properties, &self.state.rent_history, self.current, now)
    }

    /// Re-reads the rent history for the records listing without touching
    /// the cache.
    pub async fn fetch_records(&mut self) -> Result<Vec<RecordRow>, TrackerError> {
        match self.api.rent_history().await {
            Ok(history) => Ok(derive::record_rows(&self.state.properties, &history)),
            Err(e) => Err(self.report("load records", e)),
        }
    }

    /// Writes the local JSON snapshot into `dir`.
    pub fn export_json(&mut self, dir: &Path) -> Result<PathBuf, TrackerError> {
        let backup = export::build_backup(&self.state.properties, &self.state.rent_history, Utc::now());
        match export::write_backup(dir, &backup) {
            Ok(path) => {
                info!(path = %path.display(), "exported JSON backup");
                self.notifications.success("Data exported successfully!");
                Ok(path)
            }
            Err(e) => Err(self.report("export data", e)),
        }
    }

    /// Downloads the server-generated spreadsheet into `dir`.
    pub async fn export_excel(&mut self, dir: &Path) -> Result<PathBuf, TrackerError> {
        let bytes = match self.api.export_spreadsheet().await {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.report("export data", e)),
        };
        match export::write_spreadsheet(dir, &bytes, self.today()) {
            Ok(path) => {
                info!(path = %path.display(), bytes = bytes.len(), "exported spreadsheet");
                self.notifications.success("Data exported successfully!");
                Ok(path)
            }
            Err(e) => Err(self.report("export data", e)),
        }
    }
}

async fn fetch_all<A: RentApi>(api: &A) -> Result<(Vec<Property>, RentHistory), ApiError> {
    let properties = api.list_properties().await?;
    let history = api.rent_history().await?;
    Ok((properties, history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockRentApi;
    use crate::derive::tests::property;
    use crate::notify::NoticeKind;
    use tempfile::tempdir;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn march() -> MonthKey {
        MonthKey::new(2024, 2).unwrap()
    }

    fn server_error() -> ApiError {
        ApiError::Http {
            status: 500,
            message: "boom".to_string(),
        }
    }

    fn tracker(api: MockRentApi, state: TrackerState) -> RentTracker<MockRentApi> {
        RentTracker::with_clock(api, fixed_today).with_state(state)
    }

    fn two_properties() -> TrackerState {
        let mut history = RentHistory::new();
        history.upsert(
            march(),
            PropertyId::new("1"),
            RentRecord {
                received: true,
                received_date: NaiveDate::from_ymd_opt(2024, 3, 2),
                ..Default::default()
            },
        );
        history.upsert(MonthKey::new(2024, 1).unwrap(), PropertyId::new("1"), RentRecord::default());
        history.upsert(MonthKey::new(2024, 1).unwrap(), PropertyId::new("2"), RentRecord::default());
        TrackerState {
            properties: vec![property("1", "Maple", 1000.0), property("2", "Oak", 500.0)],
            rent_history: history,
        }
    }

    fn last_notice(t: &RentTracker<MockRentApi>) -> (NoticeKind, String) {
        let n = t.notifications().latest().unwrap();
        (n.kind, n.message.clone())
    }

    #[tokio::test]
    async fn test_load_replaces_state() {
        let mut api = MockRentApi::new();
        api.expect_list_properties()
            .times(1)
            .returning(|| Ok(vec![property("9", "Cedar", 700.0)]));
        api.expect_rent_history()
            .times(1)
            .returning(|| Ok(RentHistory::new()));

        let mut t = tracker(api, two_properties());
        t.load().await.unwrap();
        assert_eq!(t.properties().len(), 1);
        assert_eq!(t.rent_history().record_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_prior_state() {
        let mut api = MockRentApi::new();
        api.expect_list_properties()
            .returning(|| Ok(vec![property("9", "Cedar", 700.0)]));
        api.expect_rent_history().returning(|| Err(server_error()));

        let before = two_properties();
        let mut t = tracker(api, before.clone());
        assert!(t.load().await.is_err());
        assert_eq!(t.state(), &before);
        assert_eq!(
            last_notice(&t),
            (NoticeKind::Error, "Failed to load data from server".to_string())
        );
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        // No expectations: any request would panic.
        let mut t = tracker(MockRentApi::new(), TrackerState::default());
        let err = t.create_property(&PropertyForm::default()).await.unwrap_err();
        assert!(err.is_validation());
        assert!(t.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_create_appends_server_property() {
        let mut api = MockRentApi::new();
        api.expect_create_property()
            .withf(|p| p.name == "Cedar" && p.initial_rent == 700.0)
            .times(1)
            .returning(|_| Ok(property("3", "Cedar", 700.0)));

        let mut t = tracker(api, two_properties());
        let form = PropertyForm {
            name: "Cedar".to_string(),
            renter_name: "Sam".to_string(),
            address: "3 Cedar Ln".to_string(),
            initial_rent: "700".to_string(),
            expected_rent_date: "1".to_string(),
            lease_start_date: "2024-01-01".to_string(),
            ..Default::default()
        };
        let created = t.create_property(&form).await.unwrap();
        assert_eq!(created.id, PropertyId::new("3"));
        assert_eq!(t.properties().len(), 3);
        assert_eq!(last_notice(&t).0, NoticeKind::Success);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_cache() {
        let mut api = MockRentApi::new();
        api.expect_update_property().returning(|_, _| Err(server_error()));

        let mut t = tracker(api, two_properties());
        let edit = PropertyEdit {
            name: "Renamed".to_string(),
            address: "1 Road".to_string(),
            monthly_rent: "900".to_string(),
        };
        assert!(t.update_property(&PropertyId::new("1"), &edit).await.is_err());
        assert_eq!(t.properties()[0].name, "Maple");
        assert_eq!(
            last_notice(&t),
            (NoticeKind::Error, "Failed to update property".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_replaces_by_id() {
        let mut api = MockRentApi::new();
        api.expect_update_property()
            .withf(|id, u| id.as_str() == "2" && u.monthly_rent == 550.0)
            .returning(|_, _| Ok(property("2", "Oak Renamed", 550.0)));

        let mut t = tracker(api, two_properties());
        let edit = PropertyEdit {
            name: "Oak Renamed".to_string(),
            address: "2 Main St".to_string(),
            monthly_rent: "550".to_string(),
        };
        t.update_property(&PropertyId::new("2"), &edit).await.unwrap();
        assert_eq!(t.properties()[1].name, "Oak Renamed");
        assert_eq!(t.properties()[1].rent(), 550.0);
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let mut t = tracker(MockRentApi::new(), two_properties());
        let deleted = t
            .delete_property(&PropertyId::new("1"), |_| false)
            .await
            .unwrap();
        assert!(!deleted);
        assert_eq!(t.properties().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_purges_every_month() {
        let mut api = MockRentApi::new();
        api.expect_delete_property()
            .withf(|id| id.as_str() == "1")
            .times(1)
            .returning(|_| Ok(()));

        let mut t = tracker(api, two_properties());
        let id = PropertyId::new("1");
        assert!(t.delete_property(&id, |p| p.name == "Maple").await.unwrap());
        assert!(t.property(&id).is_none());
        assert!(!t.rent_history().contains_property(&id));
        assert!(t.rent_history().contains_property(&PropertyId::new("2")));
    }

    #[tokio::test]
    async fn test_toggle_to_received_defaults_to_today() {
        let mut api = MockRentApi::new();
        api.expect_upsert_rent_record()
            .withf(|r| r.received && r.received_date == Some(fixed_today()) && r.month == 2)
            .times(1)
            .returning(|r| {
                Ok(RentRecord {
                    received: r.received,
                    received_date: r.received_date,
                    ..Default::default()
                })
            });

        let mut t = tracker(api, two_properties());
        let id = PropertyId::new("2");
        let record = t.toggle_rent_status(&id, march()).await.unwrap();
        assert!(record.received);
        assert_eq!(t.status(&id, march()), RentStatus::Received);
    }

    #[tokio::test]
    async fn test_toggle_to_pending_clears_received_date() {
        let mut api = MockRentApi::new();
        api.expect_upsert_rent_record()
            .withf(|r| !r.received && r.received_date.is_none())
            .times(1)
            .returning(|_| Ok(RentRecord::default()));

        let mut t = tracker(api, two_properties());
        let id = PropertyId::new("1");
        t.toggle_rent_status(&id, march()).await.unwrap();
        assert_eq!(t.status(&id, march()), RentStatus::Pending);
        assert_eq!(t.rent_history().get(march(), &id).unwrap().received_date, None);
    }

    #[tokio::test]
    async fn test_toggle_keeps_existing_received_date() {
        let earlier = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let mut state = two_properties();
        state.rent_history.upsert(
            march(),
            PropertyId::new("2"),
            RentRecord {
                received: false,
                received_date: Some(earlier),
                ..Default::default()
            },
        );

        let mut api = MockRentApi::new();
        api.expect_upsert_rent_record()
            .withf(move |r| r.received_date == Some(earlier))
            .returning(|_| Ok(RentRecord::default()));

        let mut t = tracker(api, state);
        t.toggle_rent_status(&PropertyId::new("2"), march()).await.unwrap();
    }

    #[tokio::test]
    async fn test_toggle_creates_missing_month_bucket() {
        let mut api = MockRentApi::new();
        api.expect_upsert_rent_record().returning(|r| {
            Ok(RentRecord {
                received: r.received,
                ..Default::default()
            })
        });

        let mut t = tracker(api, two_properties());
        let july = MonthKey::new(2024, 6).unwrap();
        t.toggle_rent_status(&PropertyId::new("1"), july).await.unwrap();
        assert!(t.rent_history().month(july).is_some());
    }

    #[tokio::test]
    async fn test_failed_toggle_leaves_cache() {
        let mut api = MockRentApi::new();
        api.expect_upsert_rent_record().returning(|_| Err(server_error()));

        let before = two_properties();
        let mut t = tracker(api, before.clone());
        assert!(t.toggle_rent_status(&PropertyId::new("1"), march()).await.is_err());
        assert_eq!(t.state(), &before);
        assert_eq!(last_notice(&t).1, "Failed to update rent status");
    }

    #[tokio::test]
    async fn test_update_dates_derives_received_flag() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        let mut api = MockRentApi::new();
        api.expect_upsert_rent_record()
            .withf(move |r| !r.received && r.expected_date == expected && r.received_date.is_none())
            .times(1)
            .returning(|r| {
                Ok(RentRecord {
                    expected_date: r.expected_date,
                    ..Default::default()
                })
            });

        let mut t = tracker(api, two_properties());
        let record = t
            .update_rent_dates(&PropertyId::new("2"), march(), expected, None)
            .await
            .unwrap();
        assert_eq!(record.expected_date, expected);
    }

    #[tokio::test]
    async fn test_update_dates_with_received_date_marks_received() {
        let received = NaiveDate::from_ymd_opt(2024, 3, 7);
        let mut api = MockRentApi::new();
        api.expect_upsert_rent_record()
            .withf(move |r| r.received && r.received_date == received)
            .times(1)
            .returning(|r| {
                Ok(RentRecord {
                    received: r.received,
                    received_date: r.received_date,
                    ..Default::default()
                })
            });

        let mut t = tracker(api, two_properties());
        let id = PropertyId::new("2");
        let record = t
            .update_rent_dates(&id, march(), None, received)
            .await
            .unwrap();
        assert!(record.received);
        assert_eq!(t.status(&id, march()), RentStatus::Received);
    }

    #[test]
    fn test_details_checkbox_date() {
        let t = tracker(MockRentApi::new(), TrackerState::default());
        let chosen = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(t.details_received_date(true, None), Some(fixed_today()));
        assert_eq!(t.details_received_date(true, chosen), chosen);
        assert_eq!(t.details_received_date(false, chosen), None);
    }

    #[tokio::test]
    async fn test_collection_requires_received_date() {
        let mut t = tracker(MockRentApi::new(), two_properties());
        let collection = RentCollection {
            property_id: PropertyId::new("2"),
            month: march(),
            received_date: None,
            payment_mode: Some("Cash".to_string()),
            due_date: None,
            amount: 500.0,
        };
        let err = t.record_collection(&collection).await.unwrap_err();
        assert!(matches!(err, TrackerError::MissingReceivedDate));
    }

    #[tokio::test]
    async fn test_collection_snapshots_current_rent() {
        let mut api = MockRentApi::new();
        api.expect_upsert_rent_record()
            .withf(|r| {
                r.received
                    && r.rent_amount == Some(500.0)
                    && r.payment_mode.as_deref() == Some("Bank Transfer")
                    && r.expected_date == NaiveDate::from_ymd_opt(2024, 3, 5)
            })
            .times(1)
            .returning(|r| {
                Ok(RentRecord {
                    received: true,
                    received_date: r.received_date,
                    payment_mode: r.payment_mode,
                    rent_amount: r.rent_amount,
                    ..Default::default()
                })
            });

        let mut t = tracker(api, two_properties());
        let id = PropertyId::new("2");
        let CollectionPrompt::Collect(mut collection) = t.open_collection(&id).unwrap() else {
            panic!("expected a collection prompt");
        };
        assert_eq!(collection.received_date, Some(fixed_today()));
        collection.payment_mode = Some(" Bank Transfer ".to_string());

        t.record_collection(&collection).await.unwrap();
        assert_eq!(t.status(&id, march()), RentStatus::Received);
        assert_eq!(
            last_notice(&t),
            (NoticeKind::Success, "Rent payment recorded successfully!".to_string())
        );
    }

    #[test]
    fn test_open_collection_on_received_month_shows_details() {
        let t = tracker(MockRentApi::new(), two_properties());
        match t.open_collection(&PropertyId::new("1")).unwrap() {
            CollectionPrompt::AlreadyReceived(details) => {
                assert_eq!(details.amount(), 1000.0);
                assert_eq!(details.month, march());
            }
            other => panic!("unexpected prompt: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_records_does_not_touch_cache() {
        let mut api = MockRentApi::new();
        api.expect_rent_history().returning(|| {
            let mut history = RentHistory::new();
            history.upsert(
                MonthKey::new(2023, 11).unwrap(),
                PropertyId::new("2"),
                RentRecord::default(),
            );
            Ok(history)
        });

        let before = two_properties();
        let mut t = tracker(api, before.clone());
        let rows = t.fetch_records().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].property_name, "Oak");
        assert_eq!(t.state(), &before);
    }

    #[test]
    fn test_summary_uses_viewed_month() {
        let t = tracker(MockRentApi::new(), two_properties());
        let summary = t.summary();
        assert_eq!(summary.month, march());
        assert_eq!(summary.collected, 1000.0);
        assert_eq!(summary.pending, 500.0);
    }

    #[test]
    fn test_month_navigation_is_bounded() {
        let mut t = tracker(MockRentApi::new(), TrackerState::default());
        assert_eq!(t.selectable_years(), 2022..=2025);
        assert!(t.set_current_month(MonthKey::new(2025, 11).unwrap()));
        assert!(!t.next_month());
        assert_eq!(t.current_month(), MonthKey::new(2025, 11).unwrap());
        assert!(t.prev_month());
    }

    #[tokio::test]
    async fn test_exports() {
        let dir = tempdir().unwrap();
        let mut api = MockRentApi::new();
        api.expect_export_spreadsheet()
            .times(1)
            .returning(|| Ok(b"xlsx".to_vec()));

        let mut t = tracker(api, two_properties());
        let json = t.export_json(dir.path()).unwrap();
        assert!(json.exists());

        let xlsx = t.export_excel(dir.path()).await.unwrap();
        assert!(xlsx.ends_with("property_rent_data_2024-03-15.xlsx"));
        assert_eq!(last_notice(&t).1, "Data exported successfully!");
    }

    #[tokio::test]
    async fn test_failed_spreadsheet_export_notifies() {
        let dir = tempdir().unwrap();
        let mut api = MockRentApi::new();
        api.expect_export_spreadsheet().returning(|| Err(server_error()));

        let mut t = tracker(api, two_properties());
        assert!(t.export_excel(dir.path()).await.is_err());
        assert_eq!(
            last_notice(&t),
            (NoticeKind::Error, "Failed to export data".to_string())
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
