//! Explicit wiring of the stores handed to the presentation layer.

use std::sync::Arc;

use crate::{
    controller::{AddressController, ControllerOptions, CustomerController},
    error::ClientError,
    http::HttpTransport,
    settings::ClientSettings,
    state::AddressState,
};

/// The set of controllers a presentation layer was given. Asking for one that was never
/// provided fails with [`ClientError::ContextUnavailable`].
#[derive(Clone, Default)]
pub struct AppContext {
    customers: Option<CustomerController>,
    addresses: Option<AddressController>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both controllers over one HTTP transport configured from `settings`.
    pub fn connect(settings: &ClientSettings) -> Result<Self, ClientError> {
        let transport = Arc::new(HttpTransport::new(settings)?);
        let options = ControllerOptions::from(settings);
        Ok(Self::new()
            .with_customers(CustomerController::with_options(
                transport.clone(),
                options,
            ))
            .with_addresses(AddressController::with_options(
                transport,
                options,
                AddressState::with_page_size(settings.page_size),
            )))
    }

    pub fn with_customers(mut self, customers: CustomerController) -> Self {
        self.customers = Some(customers);
        self
    }

    pub fn with_addresses(mut self, addresses: AddressController) -> Self {
        self.addresses = Some(addresses);
        self
    }

    pub fn customers(&self) -> Result<&CustomerController, ClientError> {
        self.customers
            .as_ref()
            .ok_or(ClientError::ContextUnavailable("customer store"))
    }

    pub fn addresses(&self) -> Result<&AddressController, ClientError> {
        self.addresses
            .as_ref()
            .ok_or(ClientError::ContextUnavailable("address store"))
    }
}
