//! The seam between controllers and whatever performs the remote calls.

use async_trait::async_trait;
use shared::{
    domain::{Address, Customer, Entity},
    protocol::{ListParams, ListResponse},
};

use crate::error::ClientError;

/// Remote CRUD operations for one entity type.
#[async_trait]
pub trait ResourceTransport<E: Entity>: Send + Sync {
    async fn list(&self, params: &ListParams) -> Result<ListResponse<E>, ClientError>;
    async fn get(&self, id: E::Id) -> Result<E, ClientError>;
    async fn create(&self, draft: &E::Draft) -> Result<E, ClientError>;
    async fn update(&self, id: E::Id, draft: &E::Draft) -> Result<E, ClientError>;
    async fn delete(&self, id: E::Id) -> Result<(), ClientError>;
}

#[async_trait]
pub trait CustomerTransport: ResourceTransport<Customer> {
    /// Customers narrowed by fields of their addresses (`city`, `state`, `pinCode`).
    async fn list_filtered(&self, params: &ListParams)
        -> Result<ListResponse<Customer>, ClientError>;
}

pub trait AddressTransport: ResourceTransport<Address> {}

impl<T: ResourceTransport<Address>> AddressTransport for T {}
