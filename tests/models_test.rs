//! Wire format of the users listing.
//!
//! Run with: `cargo test --test models_test`
use serde_json::{Value, json};

use user_pager::models::{PageLimit, PageRequest, PageResponse, UserRecord, field_text};

#[test]
fn test_page_payload_decodes_with_original_field_names() {
    let page: PageResponse = serde_json::from_value(json!({
        "users": [
            {
                "id": 1,
                "firstname": "Ada",
                "lastname": "Lovelace",
                "email": "ada@example.com",
                "branch": "CSE",
                "age": 36
            }
        ],
        "currentPage": 1,
        "totalPages": 4,
        "totalUsers": 37
    }))
    .unwrap();

    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_pages, 4);
    assert_eq!(page.total_users, 37);
    let ada = &page.users[0];
    assert_eq!(ada.first_name, json!("Ada"));
    assert_eq!(ada.last_name, json!("Lovelace"));
    assert_eq!(ada.age, json!(36));
    assert!(ada.extra.is_empty());
}

#[test]
fn test_user_fields_are_passed_through_loosely() {
    let user: UserRecord = serde_json::from_value(json!({
        "id": "u-17",
        "firstName": "Grace",
        "nickname": "Amazing Grace"
    }))
    .unwrap();

    assert_eq!(user.id, json!("u-17"));
    assert_eq!(field_text(&user.id), "u-17");
    assert_eq!(user.first_name, json!("Grace"));
    assert_eq!(user.last_name, Value::Null);
    assert_eq!(user.email, Value::Null);
    assert_eq!(user.extra.get("nickname"), Some(&json!("Amazing Grace")));
}

#[test]
fn test_mistyped_and_missing_fields_do_not_reject_the_page() {
    let page: PageResponse = serde_json::from_value(json!({
        "users": [
            {"id": 1, "firstname": "Ada", "age": "21"},
            {"firstname": 42, "lastname": null, "email": ["a@example.com"], "age": 19.5},
            {"id": -3, "branch": {"code": "ME"}, "age": -7}
        ],
        "currentPage": 2,
        "totalPages": 2,
        "totalUsers": 13
    }))
    .unwrap();

    assert_eq!(page.users.len(), 3);
    let [first, second, third] = &page.users[..] else {
        panic!("expected three users");
    };

    assert_eq!(first.age, json!("21"));
    assert_eq!(field_text(&first.age), "21");

    assert_eq!(second.id, Value::Null);
    assert_eq!(field_text(&second.id), "-");
    assert_eq!(second.first_name, json!(42));
    assert_eq!(second.last_name, Value::Null);
    assert_eq!(field_text(&second.email), r#"["a@example.com"]"#);
    assert_eq!(second.age, json!(19.5));

    assert_eq!(third.id, json!(-3));
    assert_eq!(third.branch, json!({"code": "ME"}));
    assert_eq!(field_text(&third.age), "-7");
}

#[test]
fn test_missing_users_array_is_rejected() {
    let result = serde_json::from_value::<PageResponse>(json!({
        "currentPage": 1,
        "totalPages": 1,
        "totalUsers": 0
    }));
    assert!(result.is_err());
}

#[test]
fn test_page_request_serializes_plain_numbers() {
    let request = PageRequest::new(2, PageLimit::new(20).unwrap());
    assert_eq!(
        serde_json::to_value(request).unwrap(),
        json!({"page": 2, "limit": 20})
    );

    let invalid = serde_json::from_value::<PageRequest>(json!({"page": 1, "limit": 7}));
    assert!(invalid.is_err());
}
