//! Advisory field checks run before a draft is submitted.
//!
//! The remote service validates authoritatively; these checks only let a form flag
//! obviously incomplete input without a round trip.

use std::collections::BTreeMap;

use shared::domain::{AddressDraft, CustomerDraft};

pub const PIN_CODE_LEN: usize = 6;

/// Field name (wire spelling) to message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.0.insert(field, message.to_string());
        }
    }
}

pub fn is_valid_pin_code(pin_code: &str) -> bool {
    pin_code.len() == PIN_CODE_LEN && pin_code.bytes().all(|b| b.is_ascii_digit())
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.chars().any(char::is_whitespace)
}

pub fn validate_customer(draft: &CustomerDraft) -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.require("firstName", &draft.first_name, "First name is required");
    errors.require("lastName", &draft.last_name, "Last name is required");
    errors.require("phone", &draft.phone, "Phone is required");

    if let Some(email) = draft.email.as_deref().map(str::trim) {
        if !email.is_empty() && !looks_like_email(email) {
            errors.0.insert("email", "Email is invalid".to_string());
        }
    }
    errors
}

pub fn validate_address(draft: &AddressDraft) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if draft.customer_id.is_none() {
        errors.0.insert("customerId", "Customer is required".to_string());
    }
    errors.require("addressLine1", &draft.address_line1, "Address line 1 is required");
    errors.require("city", &draft.city, "City is required");
    errors.require("state", &draft.state, "State is required");

    let pin_code = draft.pin_code.trim();
    if pin_code.is_empty() {
        errors.0.insert("pinCode", "Pin code is required".to_string());
    } else if !is_valid_pin_code(pin_code) {
        errors.0.insert("pinCode", "Pin code must be 6 digits".to_string());
    }
    errors
}
