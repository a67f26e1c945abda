//! Address filter state, partial filter patches and list request parameters.

use shared::{
    domain::{Customer, CustomerId},
    protocol::ListParams,
};

pub const CITY: &str = "city";
pub const STATE: &str = "state";
pub const PIN_CODE: &str = "pinCode";
pub const CUSTOMER_ID: &str = "customerId";
pub const PAGE: &str = "page";
pub const LIMIT: &str = "limit";

/// Recognized address filters. An empty string means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AddressFilters {
    pub city: String,
    pub state: String,
    pub pin_code: String,
    pub customer_id: String,
}

impl AddressFilters {
    /// Shallow merge: fields absent from the patch keep their value.
    pub fn merge(&mut self, patch: &AddressFilterPatch) {
        let fields = [
            (&mut self.city, &patch.city),
            (&mut self.state, &patch.state),
            (&mut self.pin_code, &patch.pin_code),
            (&mut self.customer_id, &patch.customer_id),
        ];
        for (current, update) in fields {
            if let Some(value) = update {
                current.clone_from(value);
            }
        }
    }

    /// Non-empty filters as wire key/value pairs, in a fixed order.
    pub fn active(&self) -> Vec<(&'static str, &str)> {
        [
            (CITY, self.city.as_str()),
            (STATE, self.state.as_str()),
            (PIN_CODE, self.pin_code.as_str()),
            (CUSTOMER_ID, self.customer_id.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }
}

/// Partial filter update. `None` leaves a filter untouched, `Some("")` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFilterPatch {
    pub city: Option<String>,
    pub state: Option<String>,
    pub pin_code: Option<String>,
    pub customer_id: Option<String>,
}

impl AddressFilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn pin_code(mut self, pin_code: impl Into<String>) -> Self {
        self.pin_code = Some(pin_code.into());
        self
    }

    pub fn customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id.to_string());
        self
    }

    /// A patch that sets every filter, as a filter form's "apply" does.
    pub fn replacing(filters: &AddressFilters) -> Self {
        Self {
            city: Some(filters.city.clone()),
            state: Some(filters.state.clone()),
            pin_code: Some(filters.pin_code.clone()),
            customer_id: Some(filters.customer_id.clone()),
        }
    }

    /// Trims surrounding whitespace from every provided value.
    pub fn normalized(self) -> Self {
        let trim = |value: Option<String>| value.map(|value| value.trim().to_string());
        Self {
            city: trim(self.city),
            state: trim(self.state),
            pin_code: trim(self.pin_code),
            customer_id: trim(self.customer_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.state.is_none()
            && self.pin_code.is_none()
            && self.customer_id.is_none()
    }
}

/// Address-field narrowing for the filtered customer listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    pub city: String,
    pub state: String,
    pub pin_code: String,
}

impl CustomerFilter {
    pub fn to_params(&self) -> ListParams {
        let mut params = ListParams::new();
        for (key, value) in [
            (CITY, &self.city),
            (STATE, &self.state),
            (PIN_CODE, &self.pin_code),
        ] {
            let value = value.trim();
            if !value.is_empty() {
                params.push(key, value);
            }
        }
        params
    }
}

/// Request parameters for one address list window: active filters, then `page`, `limit`.
pub fn build_list_params(filters: &AddressFilters, page: u32, limit: u32) -> ListParams {
    let mut params = ListParams::new();
    for (key, value) in filters.active() {
        params.push(key, value);
    }
    params.push(PAGE, page);
    params.push(LIMIT, limit);
    params
}

/// Client-side search over an already fetched customer list. A blank term matches
/// everyone; otherwise the term must appear in the first name, last name or email (ignoring
/// case), or in the phone number or id.
pub fn matches_search(customer: &Customer, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    let text_match = [
        Some(customer.first_name.as_str()),
        Some(customer.last_name.as_str()),
        customer.email.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle));

    text_match || customer.phone.contains(term) || customer.id.to_string().contains(term)
}

/// Inputs the address list depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDeps {
    pub filters: AddressFilters,
    pub page: u32,
    pub limit: u32,
}

/// Whether a change of list inputs calls for a new list fetch.
pub fn should_refetch(prev: &ListDeps, next: &ListDeps) -> bool {
    prev != next
}
