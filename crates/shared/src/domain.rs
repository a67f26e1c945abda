use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(CustomerId);
id_newtype!(AddressId);

/// A server-identified record held in a client-side collection.
pub trait Entity: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    type Id: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static;
    /// Create/update payload; carries no identifier.
    type Draft: Serialize + Clone + fmt::Debug + Send + Sync + 'static;

    /// Collection path segment, e.g. `customers`.
    const RESOURCE: &'static str;
    /// Key a create response may wrap the entity in, e.g. `{"customer": {...}}`.
    const SINGULAR: &'static str;

    fn id(&self) -> Self::Id;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(alias = "_id")]
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Only present on the detail fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for Customer {
    type Id = CustomerId;
    type Draft = CustomerDraft;

    const RESOURCE: &'static str = "customers";
    const SINGULAR: &'static str = "customer";

    fn id(&self) -> CustomerId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&Customer> for CustomerDraft {
    fn from(customer: &Customer) -> Self {
        Self {
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(alias = "_id")]
    pub id: AddressId,
    pub customer_id: CustomerId,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl Entity for Address {
    type Id = AddressId;
    type Draft = AddressDraft;

    const RESOURCE: &'static str = "addresses";
    const SINGULAR: &'static str = "address";

    fn id(&self) -> AddressId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    /// `None` only while a form is still unfilled; validation flags it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl From<&Address> for AddressDraft {
    fn from(address: &Address) -> Self {
        Self {
            customer_id: Some(address.customer_id),
            address_line1: address.address_line1.clone(),
            address_line2: address.address_line2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            pin_code: address.pin_code.clone(),
            is_primary: address.is_primary,
        }
    }
}
