use serde_json::json;

use super::*;
use crate::domain::{Address, AddressId, CustomerId};

fn address_json(id: i64) -> Value {
    json!({
        "id": id,
        "customerId": 1,
        "addressLine1": format!("{id} Main Road"),
        "city": "Pune",
        "state": "MH",
        "pinCode": "411001",
    })
}

fn three_addresses() -> Vec<Value> {
    (1..=3).map(address_json).collect()
}

#[test]
fn decodes_each_documented_shape_to_the_same_page() {
    let shapes = [
        json!(three_addresses()),
        json!({ "addresses": three_addresses(), "totalPages": 1, "totalCount": 3 }),
        json!({ "items": three_addresses(), "totalCount": 3 }),
        json!({ "data": three_addresses(), "totalPages": 1, "totalCount": 3 }),
    ];

    for shape in shapes {
        let page = ListResponse::<Address>::from_value(shape)
            .into_page()
            .expect("recognized shape");
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items[2].id, AddressId(3));
    }
}

#[test]
fn bare_array_counts_items() {
    let response = ListResponse::<Address>::from_value(json!([address_json(4), address_json(5)]));
    assert_eq!(response.shape(), "bare");
    let page = response.into_page().expect("page");
    assert_eq!(page.total_count, 2);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn envelope_zero_or_missing_meta_falls_back() {
    let page = ListResponse::<Address>::from_value(json!({
        "data": [address_json(1), address_json(2)],
        "totalPages": 0,
        "totalCount": 0,
    }))
    .into_page()
    .expect("page");
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.total_count, 2);
}

#[test]
fn envelope_keeps_server_reported_totals() {
    let page = ListResponse::<Address>::from_value(json!({
        "addresses": [address_json(1)],
        "totalPages": 7,
        "totalCount": 64,
    }))
    .into_page()
    .expect("page");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total_pages, 7);
    assert_eq!(page.total_count, 64);
}

#[test]
fn items_field_wins_over_data_field() {
    let response = ListResponse::<Address>::from_value(json!({
        "data": [],
        "addresses": [address_json(9)],
    }));
    assert_eq!(response.shape(), "items");
}

#[test]
fn unrecognized_shapes_are_reported() {
    for value in [
        json!({ "message": "ok" }),
        json!({}),
        json!(null),
        json!("addresses"),
        json!({ "addresses": "not-a-list" }),
    ] {
        let response = ListResponse::<Address>::from_value(value);
        assert_eq!(response.shape(), "unrecognized");
        assert!(response.into_page().is_err());
    }
}

#[test]
fn undecodable_entries_are_skipped_and_reported() {
    let mut broken = address_json(2);
    broken["city"] = Value::Null;
    let value = json!({ "data": [address_json(1), broken, address_json(3)], "totalCount": 3 });

    let (response, rejected) = ListResponse::<Address>::decode(value);
    assert_eq!(response.shape(), "data");
    assert_eq!(rejected.len(), 1);
    assert!(rejected[0].starts_with("entry 1"), "{}", rejected[0]);

    let page = response.into_page().expect("page");
    let ids: Vec<AddressId> = page.items.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![AddressId(1), AddressId(3)]);
    assert_eq!(page.total_count, 3);
}

#[test]
fn all_entries_undecodable_leaves_an_empty_page() {
    let page = ListResponse::<Address>::from_value(json!([{ "id": 1 }]))
        .into_page()
        .expect("still a list");
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 1);
}

#[test]
fn accepts_mongo_style_identifier() {
    let mut raw = address_json(0);
    raw.as_object_mut().expect("object").remove("id");
    raw["_id"] = json!(42);
    let page = ListResponse::<Address>::from_value(json!([raw]))
        .into_page()
        .expect("page");
    assert_eq!(page.items[0].id, AddressId(42));
    assert_eq!(page.items[0].customer_id, CustomerId(1));
    assert!(!page.items[0].is_primary);
}

#[test]
fn list_params_keep_insertion_order() {
    let mut params = ListParams::new();
    params.push("city", "Pune");
    params.push("page", 2);
    assert_eq!(params.get("page"), Some("2"));
    assert_eq!(
        params.as_slice(),
        &[
            ("city".to_string(), "Pune".to_string()),
            ("page".to_string(), "2".to_string()),
        ]
    );
}
