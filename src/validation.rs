//! Client-side checks run before any request leaves the machine.

use crate::models::{NewProperty, PropertyUpdate, YearlyIncrease};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be a positive amount, got {value}")]
    NotPositive { field: &'static str, value: String },

    #[error("{field} is not a valid number: {value}")]
    NotANumber { field: &'static str, value: String },

    #[error("expected rent day must be between 1 and 31, got {0}")]
    InvalidRentDay(String),

    #[error("{field} must be a date in YYYY-MM-DD form, got {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("set either a yearly increase percent or a yearly increase amount, not both")]
    ConflictingIncrease,
}

/// Raw input of the add-property form. Every field is kept as typed so the
/// same form can back both the CLI flags and the dashboard dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyForm {
    pub name: String,
    pub renter_name: String,
    pub address: String,
    pub renter_contact: String,
    pub initial_rent: String,
    pub expected_rent_date: String,
    pub lease_start_date: String,
    pub yearly_increase_percent: String,
    pub yearly_increase_amount: String,
}

impl PropertyForm {
    pub fn validate(&self) -> Result<NewProperty, ValidationError> {
        let name = required("Property name", &self.name)?;
        let renter_name = required("Renter name", &self.renter_name)?;
        let address = required("Address", &self.address)?;
        let initial_rent = positive_amount("Initial rent", &self.initial_rent)?;
        let expected_rent_date = rent_day(&self.expected_rent_date)?;
        let lease_start_date = date("Lease start date", &self.lease_start_date)?;

        let increase = match (
            optional_amount("Yearly increase percent", &self.yearly_increase_percent)?,
            optional_amount("Yearly increase amount", &self.yearly_increase_amount)?,
        ) {
            (Some(_), Some(_)) => return Err(ValidationError::ConflictingIncrease),
            (Some(p), None) => Some(YearlyIncrease::Percent(p)),
            (None, Some(a)) => Some(YearlyIncrease::Amount(a)),
            (None, None) => None,
        };

        Ok(NewProperty {
            name,
            renter_name,
            address,
            renter_contact: self.renter_contact.trim().to_string(),
            initial_rent,
            expected_rent_date,
            lease_start_date,
            yearly_increase_percent: match increase {
                Some(YearlyIncrease::Percent(p)) => Some(p),
                _ => None,
            },
            yearly_increase_amount: match increase {
                Some(YearlyIncrease::Amount(a)) => Some(a),
                _ => None,
            },
        })
    }
}

/// Raw input of the edit-property form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyEdit {
    pub name: String,
    pub address: String,
    pub monthly_rent: String,
}

impl PropertyEdit {
    pub fn validate(&self) -> Result<PropertyUpdate, ValidationError> {
        Ok(PropertyUpdate {
            name: required("Property name", &self.name)?,
            address: required("Address", &self.address)?,
            monthly_rent: positive_amount("Monthly rent", &self.monthly_rent)?,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn positive_amount(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    let raw = required(field, value)?;
    let amount = raw.parse::<f64>().map_err(|_| ValidationError::NotANumber {
        field,
        value: raw.clone(),
    })?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::NotPositive { field, value: raw });
    }
    Ok(amount)
}

/// Blank or zero means "not set".
fn optional_amount(field: &'static str, value: &str) -> Result<Option<f64>, ValidationError> {
    let raw = value.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let amount = raw.parse::<f64>().map_err(|_| ValidationError::NotANumber {
        field,
        value: raw.to_string(),
    })?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::NotPositive {
            field,
            value: raw.to_string(),
        });
    }
    Ok((amount != 0.0).then_some(amount))
}

fn rent_day(value: &str) -> Result<u32, ValidationError> {
    let raw = required("Expected rent day", value)?;
    match raw.parse::<u32>() {
        Ok(day) if (1..=31).contains(&day) => Ok(day),
        _ => Err(ValidationError::InvalidRentDay(raw)),
    }
}

pub fn date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let raw = required(field, value)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate { field, value: raw })
}

/// Like [`date`], but blank input is `None`.
pub fn optional_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>, ValidationError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        date(field, value).map(Some)
    }
}
