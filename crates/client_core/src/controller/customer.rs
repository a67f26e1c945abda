use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Customer, CustomerDraft, CustomerId},
    protocol::ListParams,
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use super::{settle_list, ControllerOptions, SharedTokens};
use crate::{
    error::ClientError,
    filters::CustomerFilter,
    reducer::CustomerAction,
    state::CustomerState,
    store::Store,
    transport::CustomerTransport,
};

pub const CUSTOMER_CREATED: &str = "Customer created successfully!";
pub const CUSTOMER_UPDATED: &str = "Customer updated successfully!";
pub const CUSTOMER_DELETED: &str = "Customer deleted successfully!";

const RESOURCE: &str = "customers";

#[derive(Clone)]
pub struct CustomerController {
    store: Store<CustomerState>,
    transport: Arc<dyn CustomerTransport>,
    options: ControllerOptions,
    list_tokens: SharedTokens,
    focus_tokens: SharedTokens,
}

impl CustomerController {
    pub fn new(transport: Arc<dyn CustomerTransport>) -> Self {
        Self::with_options(transport, ControllerOptions::default())
    }

    pub fn with_options(transport: Arc<dyn CustomerTransport>, options: ControllerOptions) -> Self {
        Self {
            store: Store::default(),
            transport,
            options,
            list_tokens: SharedTokens::default(),
            focus_tokens: SharedTokens::default(),
        }
    }

    pub fn state(&self) -> CustomerState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<CustomerState> {
        self.store.subscribe()
    }

    pub async fn fetch_list(&self) {
        self.fetch_collection(ListParams::new(), false).await;
    }

    /// Customers having at least one address matching `filter`.
    pub async fn fetch_filtered(&self, filter: &CustomerFilter) {
        self.fetch_collection(filter.to_params(), true).await;
    }

    async fn fetch_collection(&self, params: ListParams, filtered: bool) {
        let token = self.list_tokens.issue();
        self.store.dispatch(CustomerAction::Loading(true));
        debug!(token, filtered, ?params, "fetching customers");

        let response = if filtered {
            self.transport.list_filtered(&params).await
        } else {
            self.transport.list(&params).await
        };
        if !self.list_tokens.is_current(token) {
            debug!(token, "discarding superseded customer list response");
            return;
        }

        match response.and_then(|response| {
            settle_list(RESOURCE, response, self.options.malformed_list_policy)
        }) {
            Ok(page) => self.store.dispatch(CustomerAction::SetCollection(page.items)),
            Err(err) => self.record_failure("fetch customers", &err),
        }
    }

    pub async fn fetch_one(&self, id: CustomerId) {
        let token = self.focus_tokens.issue();
        self.store.dispatch(CustomerAction::Loading(true));

        let response = self.transport.get(id).await;
        if !self.focus_tokens.is_current(token) {
            debug!(token, customer_id = %id, "discarding superseded customer response");
            return;
        }

        match response {
            Ok(customer) => self.store.dispatch(CustomerAction::SetFocus(customer)),
            Err(err) => self.record_failure("fetch customer", &err),
        }
    }

    pub async fn create(&self, draft: &CustomerDraft) -> Result<Customer, ClientError> {
        self.store.dispatch(CustomerAction::Loading(true));
        let customer = self
            .transport
            .create(draft)
            .await
            .map_err(|err| self.fail("create customer", err))?;

        info!(customer_id = %customer.id, "customer created");
        self.store.dispatch(CustomerAction::Insert(customer.clone()));
        self.store
            .dispatch(CustomerAction::Success(CUSTOMER_CREATED.to_string()));
        Ok(customer)
    }

    pub async fn update(
        &self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> Result<Customer, ClientError> {
        self.store.dispatch(CustomerAction::Loading(true));
        let customer = self
            .transport
            .update(id, draft)
            .await
            .map_err(|err| self.fail("update customer", err))?;

        info!(customer_id = %customer.id, "customer updated");
        self.store.dispatch(CustomerAction::Replace(customer.clone()));
        self.store
            .dispatch(CustomerAction::Success(CUSTOMER_UPDATED.to_string()));
        Ok(customer)
    }

    pub async fn delete(&self, id: CustomerId) -> Result<(), ClientError> {
        self.store.dispatch(CustomerAction::Loading(true));
        self.transport
            .delete(id)
            .await
            .map_err(|err| self.fail("delete customer", err))?;

        info!(customer_id = %id, "customer deleted");
        self.store.dispatch(CustomerAction::Remove(id));
        self.store
            .dispatch(CustomerAction::Success(CUSTOMER_DELETED.to_string()));
        Ok(())
    }

    /// Posts a success banner on behalf of the presentation layer.
    pub fn set_success(&self, message: impl Into<String>) {
        self.store.dispatch(CustomerAction::Success(message.into()));
    }

    pub fn clear_messages(&self) {
        self.store.dispatch(CustomerAction::ClearMessages);
    }

    /// Clears the banners after `delay`, unless they changed in the meantime.
    pub fn clear_messages_after(&self, delay: Duration) -> JoinHandle<()> {
        let store = self.store.clone();
        let showing = store.read(messages);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if store.read(messages) == showing {
                store.dispatch(CustomerAction::ClearMessages);
            }
        })
    }

    /// [`Self::clear_messages_after`] with the configured flash duration.
    pub fn flash_messages(&self) -> JoinHandle<()> {
        self.clear_messages_after(self.options.message_flash)
    }

    fn record_failure(&self, operation: &'static str, err: &ClientError) {
        warn!(operation, error = %err, "customer operation failed");
        self.store.dispatch(CustomerAction::Error(err.to_string()));
    }

    fn fail(&self, operation: &'static str, err: ClientError) -> ClientError {
        self.record_failure(operation, &err);
        err
    }
}

fn messages(state: &CustomerState) -> (Option<String>, Option<String>) {
    (
        state.entities.last_error.clone(),
        state.entities.last_success.clone(),
    )
}
