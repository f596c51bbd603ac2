use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;
use std::time::Instant;

use super::forms::{self, FormState};
use crate::api::RentApi;
use crate::cli::ExportKind;
use crate::config::Config;
use crate::derive::RecordRow;
use crate::formatters::format_date;
use crate::models::{Property, PropertyId};
use crate::tracker::{CollectionPrompt, RentCollection, RentDetails, RentTracker};
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Properties,
    Monthly,
    Records,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Properties => View::Monthly,
            View::Monthly => View::Records,
            View::Records => View::Properties,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Properties => "Properties",
            View::Monthly => "Monthly Tracking",
            View::Records => "Rent Records",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    AddProperty(FormState),
    EditProperty {
        id: PropertyId,
        form: FormState,
    },
    ConfirmDelete {
        id: PropertyId,
        name: String,
    },
    RentDetails {
        details: RentDetails,
        form: FormState,
    },
    /// Read-only view of a month that is already paid.
    Receipt(RentDetails),
    Collect {
        collection: RentCollection,
        form: FormState,
    },
    Help,
}

/// Work that needs the server. The runner performs one action at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Reload,
    Toggle(PropertyId),
    Submit,
    Delete(PropertyId),
    LoadRecords,
    Export(ExportKind),
}

pub struct App<A: RentApi> {
    pub tracker: RentTracker<A>,
    pub view: View,
    pub selected: usize,
    pub records: Vec<RecordRow>,
    pub records_scroll: usize,
    pub modal: Option<Modal>,
    pub busy: bool,
    pub export_dir: PathBuf,
    pub server_url: String,
    pub last_update: Option<DateTime<Utc>>,
}

impl<A: RentApi> App<A> {
    pub fn new(tracker: RentTracker<A>, config: &Config) -> Self {
        Self {
            tracker,
            view: View::Properties,
            selected: 0,
            records: Vec::new(),
            records_scroll: 0,
            modal: None,
            busy: false,
            export_dir: config.export_path(),
            server_url: config.server_url.clone(),
            last_update: None,
        }
    }

    pub fn selected_property(&self) -> Option<&Property> {
        self.tracker.properties().get(self.selected)
    }

    fn selected_id(&self) -> Option<PropertyId> {
        self.selected_property().map(|p| p.id.clone())
    }

    pub fn select_next(&mut self) {
        match self.view {
            View::Records => {
                if self.records_scroll + 1 < self.records.len() {
                    self.records_scroll += 1;
                }
            }
            _ => {
                if self.selected + 1 < self.tracker.properties().len() {
                    self.selected += 1;
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.view {
            View::Records => self.records_scroll = self.records_scroll.saturating_sub(1),
            _ => self.selected = self.selected.saturating_sub(1),
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.tracker.properties().len().saturating_sub(1));
    }

    /// Switching to the records view re-reads the history.
    pub fn set_view(&mut self, view: View) -> Option<Action> {
        self.view = view;
        (view == View::Records).then_some(Action::LoadRecords)
    }

    pub fn next_month(&mut self) {
        self.tracker.next_month();
    }

    pub fn prev_month(&mut self) {
        self.tracker.prev_month();
    }

    pub fn open_add_form(&mut self) {
        self.modal = Some(Modal::AddProperty(FormState::add_property()));
    }

    pub fn open_edit_form(&mut self) {
        if let Some(property) = self.selected_property() {
            self.modal = Some(Modal::EditProperty {
                id: property.id.clone(),
                form: FormState::edit_property(property),
            });
        }
    }

    pub fn open_delete_confirm(&mut self) {
        if let Some(property) = self.selected_property() {
            self.modal = Some(Modal::ConfirmDelete {
                id: property.id.clone(),
                name: property.name.clone(),
            });
        }
    }

    pub fn open_rent_details(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if let Some(details) = self.tracker.rent_details(&id, self.tracker.current_month()) {
            self.modal = Some(Modal::RentDetails {
                form: FormState::rent_details(&details),
                details,
            });
        }
    }

    pub fn open_collection(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        self.modal = match self.tracker.open_collection(&id) {
            Ok(CollectionPrompt::AlreadyReceived(details)) => Some(Modal::Receipt(details)),
            Ok(CollectionPrompt::Collect(collection)) => {
                let name = self
                    .selected_property()
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                Some(Modal::Collect {
                    form: FormState::collection(&collection, &name),
                    collection,
                })
            }
            Err(_) => None,
        };
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Keeps the details dialog's received date in step with its checkbox.
    pub fn sync_received_date(&mut self) {
        let today = self.tracker.today();
        if let Some(Modal::RentDetails { form, .. }) = self.modal.as_mut() {
            if !form.checked(forms::RECEIVED) {
                form.set_value(forms::RECEIVED_DATE, "");
            } else if form.value(forms::RECEIVED_DATE).trim().is_empty() {
                form.set_value(forms::RECEIVED_DATE, format_date(today));
            }
        }
    }

    pub fn on_tick(&mut self) {
        self.tracker.notifications_mut().prune(Instant::now());
    }

    pub async fn perform(&mut self, action: Action) {
        // Failed requests are logged and bannered by the tracker.
        match action {
            Action::Reload => {
                if self.tracker.load().await.is_ok() {
                    self.last_update = Some(Utc::now());
                    self.clamp_selection();
                }
            }
            Action::Toggle(id) => {
                let key = self.tracker.current_month();
                let _ = self.tracker.toggle_rent_status(&id, key).await;
            }
            Action::Delete(id) => {
                if let Ok(true) = self.tracker.delete_property(&id, |_| true).await {
                    self.clamp_selection();
                }
            }
            Action::LoadRecords => {
                if let Ok(rows) = self.tracker.fetch_records().await {
                    self.records = rows;
                    self.records_scroll = 0;
                }
            }
            Action::Export(kind) => {
                let dir = self.export_dir.clone();
                let _ = match kind {
                    ExportKind::Json => self.tracker.export_json(&dir),
                    ExportKind::Excel => self.tracker.export_excel(&dir).await,
                };
            }
            Action::Submit => self.submit().await,
        }
    }

    /// Submits the open dialog. It closes on success and stays open with
    /// the input intact otherwise.
    async fn submit(&mut self) {
        let Some(modal) = self.modal.take() else {
            return;
        };

        self.modal = match modal {
            Modal::AddProperty(mut form) => {
                match self.tracker.create_property(&form.to_property_form()).await {
                    Ok(_) => {
                        self.selected = self.tracker.properties().len().saturating_sub(1);
                        None
                    }
                    Err(e) => {
                        form.error = e.is_validation().then(|| e.to_string());
                        Some(Modal::AddProperty(form))
                    }
                }
            }
            Modal::EditProperty { id, mut form } => {
                match self.tracker.update_property(&id, &form.to_property_edit()).await {
                    Ok(_) => None,
                    Err(e) => {
                        form.error = e.is_validation().then(|| e.to_string());
                        Some(Modal::EditProperty { id, form })
                    }
                }
            }
            Modal::RentDetails { details, mut form } => match self.details_dates(&form) {
                Err(e) => {
                    form.error = Some(e.to_string());
                    Some(Modal::RentDetails { details, form })
                }
                Ok((expected, received)) => {
                    let id = details.property.id.clone();
                    match self
                        .tracker
                        .update_rent_dates(&id, details.month, expected, received)
                        .await
                    {
                        Ok(_) => None,
                        Err(_) => Some(Modal::RentDetails { details, form }),
                    }
                }
            },
            Modal::Collect {
                mut collection,
                mut form,
            } => match validation::optional_date("Received date", form.value(forms::RECEIVED_DATE)) {
                Err(e) => {
                    form.error = Some(e.to_string());
                    Some(Modal::Collect { collection, form })
                }
                Ok(date) => {
                    collection.received_date = date;
                    collection.payment_mode = Some(form.value(forms::PAYMENT_MODE).to_string());
                    match self.tracker.record_collection(&collection).await {
                        Ok(_) => None,
                        Err(e) => {
                            form.error = e.is_validation().then(|| e.to_string());
                            Some(Modal::Collect { collection, form })
                        }
                    }
                }
            },
            other => Some(other),
        };
    }

    fn details_dates(
        &self,
        form: &FormState,
    ) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ValidationError> {
        let expected = validation::optional_date("Expected date", form.value(forms::EXPECTED_DATE))?;
        let date = validation::optional_date("Received date", form.value(forms::RECEIVED_DATE))?;
        let received = self
            .tracker
            .details_received_date(form.checked(forms::RECEIVED), date);
        Ok((expected, received))
    }
}
