//! Controllers: the operations the presentation layer calls. Each one drives the request
//! lifecycle of its store (loading, then the settled state or an error) around one transport
//! call.
//!
//! Read operations record failures on the store and return nothing. Mutations record the
//! failure too, then hand it back to the caller.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::protocol::{ListPage, ListResponse};
use tracing::{debug, warn};

use crate::{
    error::ClientError,
    settings::{ClientSettings, MalformedListPolicy},
};

mod address;
mod customer;

pub use address::AddressController;
pub use customer::{
    CustomerController, CUSTOMER_CREATED, CUSTOMER_DELETED, CUSTOMER_UPDATED,
};

/// Behavior knobs shared by both controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub malformed_list_policy: MalformedListPolicy,
    /// How long a banner stays up under [`CustomerController::flash_messages`] and friends.
    pub message_flash: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from(&ClientSettings::default())
    }
}

impl From<&ClientSettings> for ControllerOptions {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            malformed_list_policy: settings.malformed_list_policy,
            message_flash: settings.success_flash(),
        }
    }
}

/// Monotonic request tags. Only the most recently issued token is current; responses
/// carrying any older token are stale.
#[derive(Debug, Default)]
pub struct RequestTokens {
    latest: AtomicU64,
    last_request: AtomicU64,
}

impl RequestTokens {
    /// Tags a request about to be sent.
    pub fn issue(&self) -> u64 {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.last_request.store(token, Ordering::SeqCst);
        token
    }

    /// Makes every outstanding request stale without starting a new one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    /// Whether the current token belongs to a request rather than to an invalidation.
    pub fn request_pending(&self) -> bool {
        self.last_request.load(Ordering::SeqCst) == self.latest.load(Ordering::SeqCst)
    }
}

pub(crate) type SharedTokens = Arc<RequestTokens>;

/// Normalizes a list response, applying `policy` to shapes that cannot be normalized.
pub(crate) fn settle_list<E>(
    resource: &'static str,
    response: ListResponse<E>,
    policy: MalformedListPolicy,
) -> Result<ListPage<E>, ClientError> {
    let shape = response.shape();
    match response.into_page() {
        Ok(page) => {
            debug!(
                resource,
                shape,
                count = page.items.len(),
                total_count = page.total_count,
                "normalized list response"
            );
            Ok(page)
        }
        Err(err) => {
            warn!(resource, reason = %err.reason, ?policy, "unrecognized list response shape");
            match policy {
                MalformedListPolicy::Degrade => Ok(ListPage::empty()),
                MalformedListPolicy::Report => Err(ClientError::MalformedResponse(err.reason)),
            }
        }
    }
}
