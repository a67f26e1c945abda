use std::{sync::Arc, time::Duration};

use shared::domain::{Address, AddressDraft, AddressId};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use super::{settle_list, ControllerOptions, SharedTokens};
use crate::{
    error::ClientError,
    filters::{build_list_params, AddressFilterPatch, ListDeps},
    reducer::AddressAction,
    state::AddressState,
    store::Store,
    transport::AddressTransport,
};

const RESOURCE: &str = "addresses";

#[derive(Clone)]
pub struct AddressController {
    store: Store<AddressState>,
    transport: Arc<dyn AddressTransport>,
    options: ControllerOptions,
    list_tokens: SharedTokens,
    focus_tokens: SharedTokens,
}

impl AddressController {
    pub fn new(transport: Arc<dyn AddressTransport>) -> Self {
        Self::with_options(transport, ControllerOptions::default(), AddressState::default())
    }

    pub fn with_options(
        transport: Arc<dyn AddressTransport>,
        options: ControllerOptions,
        initial: AddressState,
    ) -> Self {
        Self {
            store: Store::new(initial),
            transport,
            options,
            list_tokens: SharedTokens::default(),
            focus_tokens: SharedTokens::default(),
        }
    }

    pub fn state(&self) -> AddressState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AddressState> {
        self.store.subscribe()
    }

    /// Current list inputs, for comparing with [`crate::filters::should_refetch`].
    pub fn list_deps(&self) -> ListDeps {
        self.store.read(AddressState::list_deps)
    }

    /// Fetches the current page under the current filters.
    pub async fn fetch_list(&self) {
        let (page, limit) = self
            .store
            .read(|state| (state.pagination.page, state.pagination.limit));
        self.fetch_list_page(page, limit).await;
    }

    /// Fetches an explicit window under the current filters; the store's page follows on
    /// success, in the same transition as the window.
    pub async fn fetch_list_page(&self, page: u32, limit: u32) {
        let page = page.max(1);
        let limit = limit.max(1);
        let token = self.list_tokens.issue();
        self.store.dispatch(AddressAction::Loading(true));

        let params = self
            .store
            .read(|state| build_list_params(&state.filters, page, limit));
        debug!(token, ?params, "fetching addresses");

        let response = self.transport.list(&params).await;
        if !self.list_tokens.is_current(token) {
            debug!(token, "discarding superseded address list response");
            if !self.list_tokens.request_pending() {
                self.store.dispatch(AddressAction::Loading(false));
            }
            return;
        }

        match response.and_then(|response| {
            settle_list(RESOURCE, response, self.options.malformed_list_policy)
        }) {
            Ok(window) => self
                .store
                .dispatch(AddressAction::SetCollection { window, page }),
            Err(err) => self.record_failure("fetch addresses", &err),
        }
    }

    pub async fn fetch_one(&self, id: AddressId) {
        let token = self.focus_tokens.issue();
        self.store.dispatch(AddressAction::Loading(true));

        let response = self.transport.get(id).await;
        if !self.focus_tokens.is_current(token) {
            debug!(token, address_id = %id, "discarding superseded address response");
            return;
        }

        match response {
            Ok(address) => self.store.dispatch(AddressAction::SetFocus(address)),
            Err(err) => self.record_failure("fetch address", &err),
        }
    }

    pub async fn create(&self, draft: &AddressDraft) -> Result<Address, ClientError> {
        self.store.dispatch(AddressAction::Loading(true));
        let address = self
            .transport
            .create(draft)
            .await
            .map_err(|err| self.fail("create address", err))?;

        info!(address_id = %address.id, customer_id = %address.customer_id, "address created");
        self.store.dispatch(AddressAction::Insert(address.clone()));
        Ok(address)
    }

    pub async fn update(&self, id: AddressId, draft: &AddressDraft) -> Result<Address, ClientError> {
        self.store.dispatch(AddressAction::Loading(true));
        let address = self
            .transport
            .update(id, draft)
            .await
            .map_err(|err| self.fail("update address", err))?;

        info!(address_id = %address.id, "address updated");
        self.store.dispatch(AddressAction::Replace(address.clone()));
        Ok(address)
    }

    pub async fn delete(&self, id: AddressId) -> Result<(), ClientError> {
        self.store.dispatch(AddressAction::Loading(true));
        self.transport
            .delete(id)
            .await
            .map_err(|err| self.fail("delete address", err))?;

        info!(address_id = %id, "address deleted");
        self.store.dispatch(AddressAction::Remove(id));
        Ok(())
    }

    /// Merges `patch` into the filters and returns to page 1. Does not fetch; a list
    /// response still in flight no longer applies.
    pub fn set_filters(&self, patch: AddressFilterPatch) {
        self.list_tokens.invalidate();
        self.store
            .dispatch(AddressAction::SetFilters(patch.normalized()));
    }

    pub fn clear_filters(&self) {
        self.list_tokens.invalidate();
        self.store.dispatch(AddressAction::ClearFilters);
    }

    /// Moves to `page` (1-based; 0 is treated as 1). Does not fetch.
    pub fn set_page(&self, page: u32) {
        self.list_tokens.invalidate();
        self.store.dispatch(AddressAction::SetPage(page.max(1)));
    }

    pub fn clear_messages(&self) {
        self.store.dispatch(AddressAction::ClearMessages);
    }

    /// Clears the error banner after `delay`, unless it changed in the meantime.
    pub fn clear_messages_after(&self, delay: Duration) -> JoinHandle<()> {
        let store = self.store.clone();
        let showing = store.read(|state| state.entities.last_error.clone());
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if store.read(|state| state.entities.last_error.clone()) == showing {
                store.dispatch(AddressAction::ClearMessages);
            }
        })
    }

    pub fn flash_messages(&self) -> JoinHandle<()> {
        self.clear_messages_after(self.options.message_flash)
    }

    fn record_failure(&self, operation: &'static str, err: &ClientError) {
        warn!(operation, error = %err, "address operation failed");
        self.store.dispatch(AddressAction::Error(err.to_string()));
    }

    fn fail(&self, operation: &'static str, err: ClientError) -> ClientError {
        self.record_failure(operation, &err);
        err
    }
}
