//! Client-side state and synchronization for the customer and address collections.
//!
//! Each collection lives in a [`store::Store`] whose state changes only through its reducer.
//! A controller wraps each store, calls the remote service through a
//! [`transport::ResourceTransport`] and dispatches the lifecycle actions around every call.

pub mod context;
pub mod controller;
pub mod error;
pub mod filters;
pub mod http;
pub mod reducer;
pub mod settings;
pub mod state;
pub mod store;
pub mod transport;
pub mod validation;

pub use context::AppContext;
pub use controller::{AddressController, ControllerOptions, CustomerController};
pub use error::ClientError;
pub use http::HttpTransport;
pub use settings::{load_settings, ClientSettings, MalformedListPolicy};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
