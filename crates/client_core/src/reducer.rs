//! Action vocabularies and the transition functions of both stores.

use shared::{
    domain::{Address, AddressId, Customer, CustomerId},
    protocol::ListPage,
};

use crate::{
    filters::{AddressFilterPatch, AddressFilters},
    state::{AddressState, CustomerState},
    store::{Action, Reduce},
};

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerAction {
    Loading(bool),
    Error(String),
    Success(String),
    ClearMessages,
    SetCollection(Vec<Customer>),
    SetFocus(Customer),
    Insert(Customer),
    Replace(Customer),
    Remove(CustomerId),
}

impl Action for CustomerAction {
    fn kind(&self) -> &'static str {
        match self {
            Self::Loading(_) => "customer/loading",
            Self::Error(_) => "customer/error",
            Self::Success(_) => "customer/success",
            Self::ClearMessages => "customer/clear_messages",
            Self::SetCollection(_) => "customer/set_collection",
            Self::SetFocus(_) => "customer/set_focus",
            Self::Insert(_) => "customer/insert",
            Self::Replace(_) => "customer/replace",
            Self::Remove(_) => "customer/remove",
        }
    }
}

impl Reduce for CustomerState {
    type Action = CustomerAction;

    fn reduce(mut self, action: CustomerAction) -> Self {
        let entities = &mut self.entities;
        match action {
            CustomerAction::Loading(loading) => entities.set_loading(loading),
            CustomerAction::Error(message) => entities.fail(message),
            CustomerAction::Success(message) => entities.succeed(message),
            CustomerAction::ClearMessages => entities.clear_messages(),
            CustomerAction::SetCollection(items) => entities.set_collection(items),
            CustomerAction::SetFocus(customer) => entities.set_focus(customer),
            CustomerAction::Insert(customer) => entities.insert(customer),
            CustomerAction::Replace(customer) => entities.replace(customer),
            CustomerAction::Remove(id) => entities.remove(id),
        }
        self
    }
}

/// Address store actions. There is no success banner on this store.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressAction {
    Loading(bool),
    Error(String),
    ClearMessages,
    /// A fetched window together with the page it was fetched for.
    SetCollection { window: ListPage<Address>, page: u32 },
    SetFocus(Address),
    Insert(Address),
    Replace(Address),
    Remove(AddressId),
    SetFilters(AddressFilterPatch),
    ClearFilters,
    SetPage(u32),
}

impl Action for AddressAction {
    fn kind(&self) -> &'static str {
        match self {
            Self::Loading(_) => "address/loading",
            Self::Error(_) => "address/error",
            Self::ClearMessages => "address/clear_messages",
            Self::SetCollection { .. } => "address/set_collection",
            Self::SetFocus(_) => "address/set_focus",
            Self::Insert(_) => "address/insert",
            Self::Replace(_) => "address/replace",
            Self::Remove(_) => "address/remove",
            Self::SetFilters(_) => "address/set_filters",
            Self::ClearFilters => "address/clear_filters",
            Self::SetPage(_) => "address/set_page",
        }
    }
}

impl Reduce for AddressState {
    type Action = AddressAction;

    fn reduce(mut self, action: AddressAction) -> Self {
        match action {
            AddressAction::Loading(loading) => self.entities.set_loading(loading),
            AddressAction::Error(message) => self.entities.fail(message),
            AddressAction::ClearMessages => self.entities.clear_messages(),
            AddressAction::SetCollection { window, page } => {
                self.entities.set_collection(window.items);
                self.pagination.page = page;
                self.pagination.total_pages = window.total_pages;
                self.pagination.total_count = window.total_count;
            }
            AddressAction::SetFocus(address) => self.entities.set_focus(address),
            AddressAction::Insert(address) => self.entities.insert(address),
            AddressAction::Replace(address) => self.entities.replace(address),
            AddressAction::Remove(id) => self.entities.remove(id),
            AddressAction::SetFilters(patch) => {
                self.filters.merge(&patch);
                // A changed filter invalidates whatever page was fetched before.
                self.pagination.page = 1;
            }
            AddressAction::ClearFilters => self.filters = AddressFilters::default(),
            AddressAction::SetPage(page) => self.pagination.page = page,
        }
        self
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
