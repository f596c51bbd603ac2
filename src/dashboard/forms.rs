//! Text-entry dialogs used by the dashboard modals.

use crate::formatters::format_date;
use crate::models::Property;
use crate::tracker::{RentCollection, RentDetails};
use crate::validation::{PropertyEdit, PropertyForm};

pub const NAME: &str = "Property Name";
pub const RENTER: &str = "Renter Name";
pub const ADDRESS: &str = "Address";
pub const CONTACT: &str = "Renter Contact";
pub const INITIAL_RENT: &str = "Initial Rent";
pub const MONTHLY_RENT: &str = "Monthly Rent";
pub const DUE_DAY: &str = "Rent Due Day";
pub const LEASE_START: &str = "Lease Start";
pub const INCREASE_PERCENT: &str = "Yearly Increase %";
pub const INCREASE_AMOUNT: &str = "Yearly Increase $";
pub const EXPECTED_DATE: &str = "Expected Date";
pub const RECEIVED: &str = "Rent Received";
pub const RECEIVED_DATE: &str = "Received Date";
pub const PAYMENT_MODE: &str = "Payment Mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub checked: bool,
}

impl Field {
    fn text(label: &'static str, hint: &'static str) -> Self {
        Self {
            label,
            hint,
            kind: FieldKind::Text,
            value: String::new(),
            checked: false,
        }
    }

    fn checkbox(label: &'static str, checked: bool) -> Self {
        Self {
            label,
            hint: "space to toggle",
            kind: FieldKind::Checkbox,
            value: String::new(),
            checked,
        }
    }

    fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub title: String,
    pub fields: Vec<Field>,
    pub focus: usize,
    /// Inline message for input the form rejected.
    pub error: Option<String>,
}

impl FormState {
    pub fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn add_property() -> Self {
        Self::new(
            "Add Property",
            vec![
                Field::text(NAME, "required"),
                Field::text(RENTER, "required"),
                Field::text(ADDRESS, "required"),
                Field::text(CONTACT, "phone or email"),
                Field::text(INITIAL_RENT, "e.g. 1200"),
                Field::text(DUE_DAY, "1-31"),
                Field::text(LEASE_START, "YYYY-MM-DD"),
                Field::text(INCREASE_PERCENT, "optional"),
                Field::text(INCREASE_AMOUNT, "optional, instead of %"),
            ],
        )
    }

    pub fn edit_property(property: &Property) -> Self {
        Self::new(
            format!("Edit {}", property.name),
            vec![
                Field::text(NAME, "required").with_value(&property.name),
                Field::text(ADDRESS, "required").with_value(&property.address),
                Field::text(MONTHLY_RENT, "e.g. 1200").with_value(format!("{}", property.rent())),
            ],
        )
    }

    pub fn rent_details(details: &RentDetails) -> Self {
        let record = &details.record;
        Self::new(
            format!("Rent Details - {}", details.property.name),
            vec![
                Field::text(EXPECTED_DATE, "YYYY-MM-DD")
                    .with_value(record.expected_date.map(format_date).unwrap_or_default()),
                Field::checkbox(RECEIVED, record.received),
                Field::text(RECEIVED_DATE, "YYYY-MM-DD")
                    .with_value(record.received_date.map(format_date).unwrap_or_default()),
            ],
        )
    }

    pub fn collection(collection: &RentCollection, property_name: &str) -> Self {
        Self::new(
            format!("Record Rent Payment - {}", property_name),
            vec![
                Field::text(RECEIVED_DATE, "YYYY-MM-DD")
                    .with_value(collection.received_date.map(format_date).unwrap_or_default()),
                Field::text(PAYMENT_MODE, "Cash, Bank Transfer, UPI, Cheque"),
            ],
        )
    }

    pub fn focused(&self) -> Option<&Field> {
        self.fields.get(self.focus)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn input(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            match field.kind {
                FieldKind::Text => field.value.push(c),
                FieldKind::Checkbox if c == ' ' => field.checked = !field.checked,
                FieldKind::Checkbox => {}
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn checked(&self, label: &str) -> bool {
        self.fields.iter().any(|f| f.label == label && f.checked)
    }

    pub fn set_value(&mut self, label: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.label == label) {
            field.value = value.into();
        }
    }

    pub fn to_property_form(&self) -> PropertyForm {
        PropertyForm {
            name: self.value(NAME).to_string(),
            renter_name: self.value(RENTER).to_string(),
            address: self.value(ADDRESS).to_string(),
            renter_contact: self.value(CONTACT).to_string(),
            initial_rent: self.value(INITIAL_RENT).to_string(),
            expected_rent_date: self.value(DUE_DAY).to_string(),
            lease_start_date: self.value(LEASE_START).to_string(),
            yearly_increase_percent: self.value(INCREASE_PERCENT).to_string(),
            yearly_increase_amount: self.value(INCREASE_AMOUNT).to_string(),
        }
    }

    pub fn to_property_edit(&self) -> PropertyEdit {
        PropertyEdit {
            name: self.value(NAME).to_string(),
            address: self.value(ADDRESS).to_string(),
            monthly_rent: self.value(MONTHLY_RENT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::tests::property;

    #[test]
    fn test_typing_fills_focused_field() {
        let mut form = FormState::add_property();
        for c in "Maple".chars() {
            form.input(c);
        }
        form.next_field();
        form.input('D');
        form.input('x');
        form.backspace();

        let values = form.to_property_form();
        assert_eq!(values.name, "Maple");
        assert_eq!(values.renter_name, "D");
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = FormState::add_property();
        form.prev_field();
        assert_eq!(form.focused().unwrap().label, INCREASE_AMOUNT);
        form.next_field();
        assert_eq!(form.focused().unwrap().label, NAME);
    }

    #[test]
    fn test_edit_form_is_prefilled() {
        let form = FormState::edit_property(&property("4", "Oak", 650.5));
        let edit = form.to_property_edit();
        assert_eq!(edit.name, "Oak");
        assert_eq!(edit.monthly_rent, "650.5");
    }

    #[test]
    fn test_checkbox_ignores_letters() {
        let mut form = FormState::new("t", vec![Field::checkbox(RECEIVED, false)]);
        form.input('x');
        assert!(!form.checked(RECEIVED));
        form.input(' ');
        assert!(form.checked(RECEIVED));
    }
}
