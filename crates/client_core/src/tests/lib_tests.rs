use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicI64, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{Address, AddressDraft, AddressId, Customer, CustomerDraft, CustomerId},
    protocol::{ListParams, ListResponse},
};
use tokio::sync::{oneshot, Mutex};

use super::*;
use crate::{
    controller::{CUSTOMER_CREATED, CUSTOMER_DELETED, CUSTOMER_UPDATED},
    filters::{should_refetch, AddressFilterPatch, CustomerFilter},
    state::Status,
    transport::{CustomerTransport, ResourceTransport},
};

fn customer(id: i64, first_name: &str) -> Customer {
    Customer {
        id: CustomerId(id),
        first_name: first_name.to_string(),
        last_name: "Lee".to_string(),
        phone: "5551234".to_string(),
        email: None,
        addresses: None,
    }
}

fn address(id: i64, city: &str) -> Address {
    Address {
        id: AddressId(id),
        customer_id: CustomerId(1),
        address_line1: format!("{id} Main Road"),
        address_line2: None,
        city: city.to_string(),
        state: "MH".to_string(),
        pin_code: "411001".to_string(),
        is_primary: false,
    }
}

fn ann_draft() -> CustomerDraft {
    CustomerDraft {
        first_name: "Ann".into(),
        last_name: "Lee".into(),
        phone: "5551234".into(),
        email: None,
    }
}

fn address_draft(city: &str) -> AddressDraft {
    AddressDraft {
        customer_id: Some(CustomerId(1)),
        address_line1: "12 MG Road".into(),
        address_line2: None,
        city: city.into(),
        state: "MH".into(),
        pin_code: "411001".into(),
        is_primary: true,
    }
}

/// In-memory customer service. Server-assigned ids start at 100.
struct TestCustomerTransport {
    customers: Mutex<Vec<Customer>>,
    next_id: AtomicI64,
    fail_with: Option<ClientError>,
    list_response: Mutex<Option<ListResponse<Customer>>>,
    filtered_params: Mutex<Vec<ListParams>>,
}

impl TestCustomerTransport {
    fn with(customers: Vec<Customer>) -> Self {
        Self {
            customers: Mutex::new(customers),
            next_id: AtomicI64::new(100),
            fail_with: None,
            list_response: Mutex::new(None),
            filtered_params: Mutex::new(Vec::new()),
        }
    }

    fn failing(err: ClientError) -> Self {
        let mut transport = Self::with(Vec::new());
        transport.fail_with = Some(err);
        transport
    }

    fn check(&self) -> Result<(), ClientError> {
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceTransport<Customer> for TestCustomerTransport {
    async fn list(&self, _params: &ListParams) -> Result<ListResponse<Customer>, ClientError> {
        self.check()?;
        if let Some(response) = self.list_response.lock().await.take() {
            return Ok(response);
        }
        Ok(ListResponse::Items {
            items: self.customers.lock().await.clone(),
            total_pages: None,
            total_count: None,
        })
    }

    async fn get(&self, id: CustomerId) -> Result<Customer, ClientError> {
        self.check()?;
        self.customers
            .lock()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .map(|mut c| {
                c.addresses = Some(vec![address(1, "Pune")]);
                c
            })
            .ok_or(ClientError::NotFound {
                resource: format!("customer {id}"),
            })
    }

    async fn create(&self, draft: &CustomerDraft) -> Result<Customer, ClientError> {
        self.check()?;
        let created = Customer {
            id: CustomerId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            addresses: None,
        };
        self.customers.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: CustomerId, draft: &CustomerDraft) -> Result<Customer, ClientError> {
        self.check()?;
        let mut customers = self.customers.lock().await;
        let existing = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ClientError::NotFound {
                resource: format!("customer {id}"),
            })?;
        existing.first_name.clone_from(&draft.first_name);
        existing.last_name.clone_from(&draft.last_name);
        existing.phone.clone_from(&draft.phone);
        existing.email.clone_from(&draft.email);
        Ok(existing.clone())
    }

    async fn delete(&self, id: CustomerId) -> Result<(), ClientError> {
        self.check()?;
        let mut customers = self.customers.lock().await;
        let before = customers.len();
        customers.retain(|c| c.id != id);
        if customers.len() == before {
            return Err(ClientError::NotFound {
                resource: format!("customer {id}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerTransport for TestCustomerTransport {
    async fn list_filtered(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Customer>, ClientError> {
        self.check()?;
        self.filtered_params.lock().await.push(params.clone());
        Ok(ListResponse::Bare(vec![customer(7, "Filtered")]))
    }
}

type ScriptedList = oneshot::Receiver<Result<ListResponse<Address>, ClientError>>;

/// Address service whose list responses are either fixed or scripted per call.
struct TestAddressTransport {
    list_response: Mutex<Option<ListResponse<Address>>>,
    scripted: Mutex<VecDeque<ScriptedList>>,
    seen_params: Mutex<Vec<ListParams>>,
    list_calls: AtomicUsize,
    fail_with: Option<ClientError>,
}

impl TestAddressTransport {
    fn returning(response: ListResponse<Address>) -> Self {
        Self {
            list_response: Mutex::new(Some(response)),
            scripted: Mutex::new(VecDeque::new()),
            seen_params: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            fail_with: None,
        }
    }

    fn scripted(receivers: Vec<ScriptedList>) -> Self {
        let transport = Self::returning(ListResponse::Bare(Vec::new()));
        Self {
            scripted: Mutex::new(receivers.into()),
            ..transport
        }
    }

    fn failing(err: ClientError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::returning(ListResponse::Bare(Vec::new()))
        }
    }

    fn check(&self) -> Result<(), ClientError> {
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceTransport<Address> for TestAddressTransport {
    async fn list(&self, params: &ListParams) -> Result<ListResponse<Address>, ClientError> {
        self.check()?;
        self.seen_params.lock().await.push(params.clone());
        let scripted = self.scripted.lock().await.pop_front();
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(rx) = scripted {
            return rx
                .await
                .unwrap_or_else(|_| Err(ClientError::Transport("script dropped".into())));
        }
        Ok(self
            .list_response
            .lock()
            .await
            .clone()
            .unwrap_or(ListResponse::Bare(Vec::new())))
    }

    async fn get(&self, id: AddressId) -> Result<Address, ClientError> {
        self.check()?;
        Ok(address(id.0, "Pune"))
    }

    async fn create(&self, draft: &AddressDraft) -> Result<Address, ClientError> {
        self.check()?;
        Ok(Address {
            id: AddressId(500),
            customer_id: draft.customer_id.unwrap_or(CustomerId(0)),
            address_line1: draft.address_line1.clone(),
            address_line2: draft.address_line2.clone(),
            city: draft.city.clone(),
            state: draft.state.clone(),
            pin_code: draft.pin_code.clone(),
            is_primary: draft.is_primary,
        })
    }

    async fn update(&self, id: AddressId, draft: &AddressDraft) -> Result<Address, ClientError> {
        self.check()?;
        let mut updated = self.create(draft).await?;
        updated.id = id;
        Ok(updated)
    }

    async fn delete(&self, _id: AddressId) -> Result<(), ClientError> {
        self.check()
    }
}

fn customer_controller(transport: TestCustomerTransport) -> CustomerController {
    CustomerController::new(Arc::new(transport))
}

fn address_controller(transport: Arc<TestAddressTransport>) -> AddressController {
    AddressController::new(transport)
}

#[tokio::test]
async fn create_flow_prepends_focuses_and_announces() {
    let controller = customer_controller(TestCustomerTransport::with(Vec::new()));

    let created = controller.create(&ann_draft()).await.expect("create");
    assert_eq!(created.id, CustomerId(100));

    let state = controller.state();
    assert_eq!(state.entities.collection.len(), 1);
    assert_eq!(state.entities.focus.as_ref(), Some(&created));
    assert_eq!(state.entities.last_success.as_deref(), Some(CUSTOMER_CREATED));
    assert_eq!(state.entities.last_success.as_deref(), Some("Customer created successfully!"));
    assert_eq!(state.entities.last_error, None);
    assert_eq!(state.entities.status, Status::Idle);
}

#[tokio::test]
async fn failed_create_records_and_returns_the_error() {
    let controller = customer_controller(TestCustomerTransport::failing(ClientError::Validation {
        messages: vec!["Phone is required".into()],
    }));

    let err = controller
        .create(&ann_draft())
        .await
        .expect_err("mutation failures are returned");
    assert_eq!(err.validation_messages(), ["Phone is required".to_string()]);

    let state = controller.state();
    assert!(state.entities.collection.is_empty());
    assert_eq!(
        state.entities.last_error.as_deref(),
        Some("validation failed: Phone is required")
    );
    assert_eq!(state.entities.status, Status::Idle);
}

#[tokio::test]
async fn delete_then_refetch_drops_the_member() {
    let controller = customer_controller(TestCustomerTransport::with(vec![
        customer(1, "Ann"),
        customer(2, "Bo"),
        customer(3, "Cy"),
    ]));
    controller.fetch_list().await;
    controller.fetch_one(CustomerId(2)).await;
    assert_eq!(controller.state().entities.collection.len(), 3);

    controller.delete(CustomerId(2)).await.expect("delete");

    let state = controller.state();
    assert_eq!(state.entities.collection.len(), 2);
    assert!(state.entities.collection.iter().all(|c| c.id != CustomerId(2)));
    assert_eq!(state.entities.focus, None);
    assert_eq!(state.entities.last_success.as_deref(), Some(CUSTOMER_DELETED));

    controller.fetch_list().await;
    let ids: Vec<i64> = controller
        .state()
        .entities
        .collection
        .iter()
        .map(|c| c.id.0)
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn update_replaces_in_place() {
    let controller = customer_controller(TestCustomerTransport::with(vec![
        customer(1, "Ann"),
        customer(2, "Bo"),
    ]));
    controller.fetch_list().await;

    let mut draft = ann_draft();
    draft.first_name = "Bonnie".into();
    let updated = controller.update(CustomerId(2), &draft).await.expect("update");

    let state = controller.state();
    assert_eq!(state.entities.collection[1], updated);
    assert_eq!(state.entities.collection[0].first_name, "Ann");
    assert_eq!(state.entities.last_success.as_deref(), Some(CUSTOMER_UPDATED));
}

#[tokio::test]
async fn delete_of_missing_customer_is_returned_and_recorded() {
    let controller = customer_controller(TestCustomerTransport::with(vec![customer(1, "Ann")]));
    controller.fetch_list().await;

    let err = controller.delete(CustomerId(9)).await.expect_err("not found");
    assert!(err.is_not_found());
    let state = controller.state();
    assert_eq!(state.entities.collection.len(), 1);
    assert_eq!(state.entities.last_error.as_deref(), Some("customer 9 not found"));
}

#[tokio::test]
async fn read_failures_only_surface_through_state() {
    let controller = customer_controller(TestCustomerTransport::failing(ClientError::Transport(
        "failed to connect".into(),
    )));
    controller.set_success("stale banner");

    controller.fetch_list().await;

    let state = controller.state();
    assert_eq!(
        state.entities.last_error.as_deref(),
        Some("network error: failed to connect")
    );
    assert_eq!(state.entities.last_success, None);
    assert!(!state.entities.is_loading());
}

#[tokio::test]
async fn fetch_one_focuses_detail_with_embedded_addresses() {
    let controller = customer_controller(TestCustomerTransport::with(vec![customer(4, "Dee")]));
    controller.fetch_one(CustomerId(4)).await;

    let focus = controller.state().entities.focus.expect("focus");
    assert_eq!(focus.id, CustomerId(4));
    assert_eq!(focus.addresses.map(|a| a.len()), Some(1));
}

#[tokio::test]
async fn filtered_customer_fetch_sends_address_fields() {
    let transport = Arc::new(TestCustomerTransport::with(Vec::new()));
    let controller = CustomerController::new(transport.clone());

    controller
        .fetch_filtered(&CustomerFilter {
            city: "Pune".into(),
            ..CustomerFilter::default()
        })
        .await;

    let params = transport.filtered_params.lock().await;
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].get("city"), Some("Pune"));
    assert_eq!(params[0].get("state"), None);
    let names: Vec<String> = controller
        .state()
        .entities
        .collection
        .iter()
        .map(|c| c.first_name.clone())
        .collect();
    assert_eq!(names, vec!["Filtered".to_string()]);
}

#[tokio::test]
async fn customer_list_accepts_wrapped_collection() {
    let transport = TestCustomerTransport::with(Vec::new());
    *transport.list_response.lock().await = Some(ListResponse::Items {
        items: vec![customer(1, "Ann"), customer(2, "Bo")],
        total_pages: None,
        total_count: None,
    });
    let controller = customer_controller(transport);
    controller.fetch_list().await;
    assert_eq!(controller.state().entities.collection.len(), 2);
}

#[tokio::test]
async fn filtered_address_fetch_with_pagination() {
    let transport = Arc::new(TestAddressTransport::returning(ListResponse::Items {
        items: vec![address(1, "Pune"), address(2, "Pune")],
        total_pages: Some(1),
        total_count: Some(2),
    }));
    let controller = address_controller(transport.clone());

    controller.set_page(3);
    controller.set_filters(AddressFilterPatch::new().city("Pune"));
    controller.fetch_list().await;

    let state = controller.state();
    assert_eq!(state.entities.collection.len(), 2);
    assert_eq!(state.pagination.total_count, 2);
    assert_eq!(state.pagination.total_pages, 1);
    assert_eq!(state.pagination.page, 1);

    let params = transport.seen_params.lock().await;
    assert_eq!(params[0].get("city"), Some("Pune"));
    assert_eq!(params[0].get("pinCode"), None);
    assert_eq!(params[0].get("page"), Some("1"));
    assert_eq!(params[0].get("limit"), Some("10"));
}

#[tokio::test]
async fn every_documented_shape_normalizes_identically() {
    let items = || vec![address(1, "Pune"), address(2, "Pune"), address(3, "Pune")];
    let shapes = vec![
        ListResponse::Bare(items()),
        ListResponse::Items {
            items: items(),
            total_pages: Some(1),
            total_count: Some(3),
        },
        ListResponse::Data {
            items: items(),
            total_pages: Some(1),
            total_count: Some(3),
        },
    ];

    for shape in shapes {
        let controller = address_controller(Arc::new(TestAddressTransport::returning(shape)));
        controller.fetch_list().await;
        let state = controller.state();
        assert_eq!(state.entities.collection.len(), 3);
        assert_eq!(state.pagination.total_count, 3);
    }
}

#[tokio::test]
async fn unrecognized_list_shape_degrades_to_empty_by_default() {
    let controller = address_controller(Arc::new(TestAddressTransport::returning(
        ListResponse::Unrecognized("object without a list field (keys: message)".into()),
    )));
    controller.fetch_list().await;

    let state = controller.state();
    assert!(state.entities.collection.is_empty());
    assert_eq!(state.pagination.total_count, 0);
    assert_eq!(state.pagination.total_pages, 1);
    assert_eq!(state.entities.last_error, None);
}

#[tokio::test]
async fn unrecognized_list_shape_can_be_reported() {
    let controller = AddressController::with_options(
        Arc::new(TestAddressTransport::returning(ListResponse::Unrecognized(
            "empty object".into(),
        ))),
        ControllerOptions {
            malformed_list_policy: MalformedListPolicy::Report,
            ..ControllerOptions::default()
        },
        state::AddressState::default(),
    );
    controller.fetch_list().await;

    assert_eq!(
        controller.state().entities.last_error.as_deref(),
        Some("malformed response: empty object")
    );
}

#[tokio::test]
async fn stale_list_response_is_discarded() {
    let (slow_tx, slow_rx) = oneshot::channel();
    let (fast_tx, fast_rx) = oneshot::channel();
    let transport = Arc::new(TestAddressTransport::scripted(vec![slow_rx, fast_rx]));
    let controller = address_controller(transport.clone());

    let slow = tokio::spawn({
        let controller = controller.clone();
        async move { controller.fetch_list().await }
    });
    while transport.list_calls.load(Ordering::SeqCst) < 1 {
        tokio::task::yield_now().await;
    }

    let fast = tokio::spawn({
        let controller = controller.clone();
        async move { controller.fetch_list().await }
    });
    while transport.list_calls.load(Ordering::SeqCst) < 2 {
        tokio::task::yield_now().await;
    }

    fast_tx
        .send(Ok(ListResponse::Bare(vec![address(2, "Mumbai")])))
        .expect("fast response");
    fast.await.expect("fast fetch");

    slow_tx
        .send(Ok(ListResponse::Bare(vec![address(1, "Pune")])))
        .expect("slow response");
    slow.await.expect("slow fetch");

    let state = controller.state();
    let cities: Vec<&str> = state
        .entities
        .collection
        .iter()
        .map(|a| a.city.as_str())
        .collect();
    assert_eq!(cities, vec!["Mumbai"]);
    assert!(!state.entities.is_loading());
}

#[tokio::test]
async fn stale_list_failure_is_discarded_too() {
    let (slow_tx, slow_rx) = oneshot::channel();
    let (fast_tx, fast_rx) = oneshot::channel();
    let transport = Arc::new(TestAddressTransport::scripted(vec![slow_rx, fast_rx]));
    let controller = address_controller(transport.clone());

    let slow = tokio::spawn({
        let controller = controller.clone();
        async move { controller.fetch_list().await }
    });
    while transport.list_calls.load(Ordering::SeqCst) < 1 {
        tokio::task::yield_now().await;
    }
    let fast = tokio::spawn({
        let controller = controller.clone();
        async move { controller.fetch_list().await }
    });
    while transport.list_calls.load(Ordering::SeqCst) < 2 {
        tokio::task::yield_now().await;
    }

    fast_tx
        .send(Ok(ListResponse::Bare(vec![address(2, "Mumbai")])))
        .expect("fast response");
    fast.await.expect("fast fetch");
    slow_tx
        .send(Err(ClientError::Transport("timed out".into())))
        .expect("slow response");
    slow.await.expect("slow fetch");

    let state = controller.state();
    assert_eq!(state.entities.last_error, None);
    assert_eq!(state.entities.collection.len(), 1);
}

#[tokio::test]
async fn filter_change_during_fetch_drops_the_old_window() {
    let (old_tx, old_rx) = oneshot::channel();
    let transport = Arc::new(TestAddressTransport::scripted(vec![old_rx]));
    let controller = address_controller(transport.clone());
    controller.set_page(3);

    let in_flight = tokio::spawn({
        let controller = controller.clone();
        async move { controller.fetch_list().await }
    });
    while transport.list_calls.load(Ordering::SeqCst) < 1 {
        tokio::task::yield_now().await;
    }

    controller.set_filters(AddressFilterPatch::new().city("Pune"));
    old_tx
        .send(Ok(ListResponse::Bare(vec![address(9, "Mumbai")])))
        .expect("old response");
    in_flight.await.expect("old fetch");

    let state = controller.state();
    assert_eq!(state.pagination.page, 1);
    assert_eq!(state.filters.city, "Pune");
    assert!(state.entities.collection.is_empty());
    assert!(!state.entities.is_loading());
    assert_eq!(transport.seen_params.lock().await[0].get("page"), Some("3"));
}

#[tokio::test]
async fn page_change_during_fetch_keeps_the_newer_fetch_loading() {
    let (old_tx, old_rx) = oneshot::channel();
    let (new_tx, new_rx) = oneshot::channel();
    let transport = Arc::new(TestAddressTransport::scripted(vec![old_rx, new_rx]));
    let controller = address_controller(transport.clone());

    let old = tokio::spawn({
        let controller = controller.clone();
        async move { controller.fetch_list().await }
    });
    while transport.list_calls.load(Ordering::SeqCst) < 1 {
        tokio::task::yield_now().await;
    }
    controller.set_page(2);
    let new = tokio::spawn({
        let controller = controller.clone();
        async move { controller.fetch_list().await }
    });
    while transport.list_calls.load(Ordering::SeqCst) < 2 {
        tokio::task::yield_now().await;
    }

    old_tx
        .send(Ok(ListResponse::Bare(vec![address(1, "Pune")])))
        .expect("old response");
    old.await.expect("old fetch");
    assert!(controller.state().entities.is_loading());

    new_tx
        .send(Ok(ListResponse::Items {
            items: vec![address(11, "Goa")],
            total_pages: Some(2),
            total_count: Some(11),
        }))
        .expect("new response");
    new.await.expect("new fetch");

    let state = controller.state();
    assert_eq!(state.pagination.page, 2);
    assert_eq!(state.entities.collection[0].city, "Goa");
    assert!(!state.entities.is_loading());
}

#[tokio::test]
async fn explicit_window_moves_the_page_on_success() {
    let transport = Arc::new(TestAddressTransport::returning(ListResponse::Data {
        items: vec![address(21, "Pune")],
        total_pages: Some(3),
        total_count: Some(21),
    }));
    let controller = address_controller(transport.clone());

    controller.fetch_list_page(3, 10).await;

    let state = controller.state();
    assert_eq!(state.pagination.page, 3);
    assert_eq!(state.pagination.total_pages, 3);
    assert_eq!(transport.seen_params.lock().await[0].get("page"), Some("3"));
}

#[tokio::test]
async fn page_and_filter_changes_do_not_fetch_but_request_refetch() {
    let transport = Arc::new(TestAddressTransport::returning(ListResponse::Bare(Vec::new())));
    let controller = address_controller(transport.clone());

    let before = controller.list_deps();
    controller.set_page(2);
    let after_page = controller.list_deps();
    controller.set_filters(AddressFilterPatch::new().pin_code(" 411001 "));
    let after_filter = controller.list_deps();

    assert_eq!(transport.list_calls.load(Ordering::SeqCst), 0);
    assert!(should_refetch(&before, &after_page));
    assert!(should_refetch(&after_page, &after_filter));
    assert_eq!(after_filter.page, 1);
    assert_eq!(after_filter.filters.pin_code, "411001");
    assert!(!should_refetch(&after_filter, &controller.list_deps()));
}

#[tokio::test]
async fn address_mutations_settle_and_reraise() {
    let transport = Arc::new(TestAddressTransport::returning(ListResponse::Bare(vec![
        address(1, "Pune"),
        address(2, "Pune"),
    ])));
    let controller = address_controller(transport);
    controller.fetch_list().await;

    let created = controller.create(&address_draft("Goa")).await.expect("create");
    assert_eq!(controller.state().entities.collection[0], created);
    assert!(!controller.state().entities.is_loading());

    let updated = controller
        .update(AddressId(1), &address_draft("Nagpur"))
        .await
        .expect("update");
    assert_eq!(controller.state().entities.collection[1], updated);

    controller.delete(AddressId(2)).await.expect("delete");
    let state = controller.state();
    assert_eq!(state.entities.collection.len(), 2);
    assert_eq!(state.entities.focus, None);
    assert_eq!(state.entities.last_success, None);

    let failing = address_controller(Arc::new(TestAddressTransport::failing(
        ClientError::NotFound {
            resource: "address 9".into(),
        },
    )));
    let err = failing.delete(AddressId(9)).await.expect_err("not found");
    assert!(err.is_not_found());
    assert_eq!(
        failing.state().entities.last_error.as_deref(),
        Some("address 9 not found")
    );
    failing.clear_messages();
    assert_eq!(failing.state().entities.last_error, None);
}

#[tokio::test]
async fn address_fetch_one_sets_focus() {
    let controller = address_controller(Arc::new(TestAddressTransport::returning(
        ListResponse::Bare(Vec::new()),
    )));
    controller.fetch_one(AddressId(8)).await;
    assert_eq!(
        controller.state().entities.focus.map(|a| a.id),
        Some(AddressId(8))
    );
}

#[tokio::test(start_paused = true)]
async fn success_banner_clears_after_flash() {
    let controller = customer_controller(TestCustomerTransport::with(Vec::new()));
    controller.create(&ann_draft()).await.expect("create");

    let handle = controller.clear_messages_after(Duration::from_millis(2000));
    tokio::time::advance(Duration::from_millis(1999)).await;
    assert!(controller.state().entities.last_success.is_some());

    handle.await.expect("clear task");
    assert_eq!(controller.state().entities.last_success, None);
}

#[tokio::test(start_paused = true)]
async fn newer_banner_survives_an_older_flash() {
    let controller = customer_controller(TestCustomerTransport::with(Vec::new()));
    controller.set_success("first");
    let handle = controller.flash_messages();
    controller.set_success("second");

    handle.await.expect("clear task");
    assert_eq!(controller.state().entities.last_success.as_deref(), Some("second"));
}

#[tokio::test]
async fn subscribers_observe_new_states() {
    let controller = customer_controller(TestCustomerTransport::with(Vec::new()));
    let mut updates = controller.subscribe();

    controller.create(&ann_draft()).await.expect("create");

    updates.changed().await.expect("state published");
    assert_eq!(updates.borrow_and_update().entities.collection.len(), 1);
}

#[test]
fn context_reports_missing_stores() {
    let context = AppContext::new().with_customers(customer_controller(
        TestCustomerTransport::with(Vec::new()),
    ));

    assert!(context.customers().is_ok());
    let err = context.addresses().err().expect("no address store");
    assert!(matches!(err, ClientError::ContextUnavailable("address store")));
    assert_eq!(err.to_string(), "address store is not available in this context");
}

#[test]
fn context_connects_both_stores_from_settings() {
    let settings = ClientSettings {
        page_size: 25,
        ..ClientSettings::default()
    };
    let context = AppContext::connect(&settings).expect("connect");
    let addresses = context.addresses().expect("address store");
    assert_eq!(addresses.state().pagination.limit, 25);
    assert!(context.customers().is_ok());
}
