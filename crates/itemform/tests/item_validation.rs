//! End-to-end validation of item submissions
//!
//! Covers the message code shapes, the create/update rule selection, and the
//! bind -> validate -> redisplay flow a request handler goes through.

use itemform::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn dispatcher() -> ValidationDispatcher {
    ValidationDispatcher::for_items().unwrap()
}

fn field_summary(errors: &ErrorBag) -> Vec<(String, String)> {
    errors
        .field_errors()
        .map(|e| (e.field.clone(), e.codes.last().cloned().unwrap_or_default()))
        .collect()
}

#[test]
fn test_object_codes_example() {
    let resolver = MessageCodesResolver::new();
    assert_eq!(
        resolver.resolve_object_codes("required", "item"),
        vec!["required.item", "required"]
    );
}

#[test]
fn test_field_codes_example() {
    let resolver = MessageCodesResolver::new();
    assert_eq!(
        resolver.resolve_field_codes("required", "item", "itemName", "java.lang.String"),
        vec![
            "required.item.itemName",
            "required.itemName",
            "required.java.lang.String",
            "required",
        ]
    );
}

#[rstest]
#[case("range", "item", "price", "i32")]
#[case("max", "order", "quantity", "i64")]
#[case("typeMismatch", "user", "age", "int")]
#[case("a.b", "x", "y", "z")]
fn test_field_code_shape(
    #[case] code: &str,
    #[case] object: &str,
    #[case] field: &str,
    #[case] type_name: &str,
) {
    let codes = MessageCodesResolver::new().resolve_field_codes(code, object, field, type_name);
    assert_eq!(
        codes,
        vec![
            format!("{}.{}.{}", code, object, field),
            format!("{}.{}", code, field),
            format!("{}.{}", code, type_name),
            code.to_string(),
        ]
    );
}

#[rstest]
#[case("totalPriceMin", "item")]
#[case("required", "order")]
fn test_object_code_shape(#[case] code: &str, #[case] object: &str) {
    let codes = MessageCodesResolver::new().resolve_object_codes(code, object);
    assert_eq!(codes, vec![format!("{}.{}", code, object), code.to_string()]);
}

#[test]
fn test_blank_name_cheap_price_large_quantity_on_create() {
    let item = Item {
        id: None,
        item_name: Some(String::new()),
        price: Some(500),
        quantity: Some(10000),
    };
    let errors = dispatcher().validate(&item, ConstraintGroup::Create).unwrap();

    assert_eq!(
        field_summary(&errors),
        vec![
            ("itemName".to_string(), "required".to_string()),
            ("price".to_string(), "range".to_string()),
            ("quantity".to_string(), "max".to_string()),
        ]
    );
    assert_eq!(errors.global_error_count(), 0);
    assert_eq!(
        errors.field_error("price").unwrap().arguments,
        vec![Value::Integer(1000), Value::Integer(1_000_000)]
    );
    assert_eq!(errors.field_value("quantity"), Some(&Value::Integer(10000)));
}

#[test]
fn test_total_price_reported_with_price_range() {
    let errors = dispatcher()
        .validate(&Item::new("pen", 100, 1), ConstraintGroup::Create)
        .unwrap();

    assert_eq!(
        field_summary(&errors),
        vec![("price".to_string(), "range".to_string())]
    );
    let total = errors.global_errors().next().unwrap();
    assert_eq!(total.codes, vec!["totalPriceMin.item", "totalPriceMin"]);
    assert_eq!(total.arguments, vec![Value::Integer(10000), Value::Integer(100)]);
    assert_eq!(total.kind(), ViolationKind::CrossFieldInconsistency);
}

#[test]
fn test_update_requires_id_only() {
    let errors = dispatcher()
        .validate(&Item::new("pen", 5000, 10), ConstraintGroup::Update)
        .unwrap();

    assert_eq!(errors.error_count(), 1);
    let id = errors.field_error("id").unwrap();
    assert_eq!(
        id.codes,
        vec!["required.item.id", "required.id", "required.i64", "required"]
    );
    assert_eq!(id.rejected_value, Value::Null);
    assert_eq!(id.kind(), ViolationKind::MissingRequired);
}

#[rstest]
#[case(ConstraintGroup::Create)]
#[case(ConstraintGroup::Update)]
fn test_validation_is_idempotent(#[case] group: ConstraintGroup) {
    let dispatcher = dispatcher();
    let item = Item {
        id: None,
        item_name: Some("  ".to_string()),
        price: Some(2_000_000),
        quantity: None,
    };

    let first = dispatcher.validate(&item, group).unwrap();
    let second = dispatcher.validate(&item, group).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_price_and_quantity_both_reported() {
    let errors = dispatcher()
        .validate(&Item::new("pen", 0, 20_000), ConstraintGroup::Create)
        .unwrap();
    assert!(errors.has_errors_for("price"));
    assert!(errors.has_errors_for("quantity"));
    // 0 * 20000 is below the minimum total as well
    assert!(errors.has_global_errors());
}

#[test]
fn test_missing_values_are_required_not_range() {
    let errors = dispatcher()
        .validate(&Item::default(), ConstraintGroup::Create)
        .unwrap();
    assert_eq!(
        field_summary(&errors),
        vec![
            ("itemName".to_string(), "required".to_string()),
            ("price".to_string(), "required".to_string()),
            ("quantity".to_string(), "required".to_string()),
        ]
    );
    assert!(!errors.has_global_errors());
}

#[rstest]
#[case(1000, true)]
#[case(999, false)]
#[case(1_000_000, true)]
#[case(1_000_001, false)]
fn test_price_bounds_are_inclusive(#[case] price: i32, #[case] valid: bool) {
    let errors = dispatcher()
        .validate(&Item::new("pen", price, 100), ConstraintGroup::Create)
        .unwrap();
    assert_eq!(!errors.has_errors_for("price"), valid);
}

#[test]
fn test_binding_failure_skips_value_rules() {
    let dispatcher = dispatcher();
    let form = FormData::from_pairs([("itemName", "pen"), ("price", "ten"), ("quantity", "")]);

    let bound = Item::bind(&form, dispatcher.resolver()).unwrap();
    let bound = dispatcher.validate_bound(bound, ConstraintGroup::Create).unwrap();

    let price: Vec<_> = bound.errors.field_errors_for("price").collect();
    assert_eq!(price.len(), 1);
    assert!(price[0].binding_failure);
    assert_eq!(price[0].kind(), ViolationKind::BindingFailure);
    assert_eq!(price[0].rejected_value, Value::from("ten"));

    // empty quantity binds to nothing and is then required
    assert_eq!(
        bound.errors.field_error("quantity").unwrap().codes.last().map(String::as_str),
        Some("required")
    );
}

#[test]
fn test_redisplay_after_failed_submission() {
    let config = Config::default();
    let dispatcher = config.dispatcher(false).unwrap();
    let form = FormData::from_pairs([("itemName", " "), ("price", "100"), ("quantity", "1")]);

    let bound = Item::bind(&form, dispatcher.resolver()).unwrap();
    let bound = dispatcher.validate_bound(bound, ConstraintGroup::Create).unwrap();
    assert!(bound.has_errors());

    let context = FormContext::from_submission(&form, &bound.errors, &config.messages());
    assert_eq!(context.get_error("itemName"), Some("Item name is required."));
    assert_eq!(
        context.get_error("price"),
        Some("Price must be between 1,000 and 1,000,000.")
    );
    assert_eq!(context.get_value("price"), Some("100"));
    assert_eq!(context.global_errors().len(), 1);
}

#[test]
fn test_postfix_codes_from_config() {
    let config: Config = toml::from_str(
        r#"
        [codes]
        prefix = "item."
        format = "postfix-error-code"
        "#,
    )
    .unwrap();
    let errors = config
        .dispatcher(false)
        .unwrap()
        .validate(&Item::new("pen", 100, 100), ConstraintGroup::Create)
        .unwrap();

    assert_eq!(
        errors.field_error("price").unwrap().codes,
        vec!["item.item.price.range", "item.price.range", "item.i32.range", "item.range"]
    );
}

#[test]
fn test_json_shape_of_error_bag() {
    let errors = dispatcher()
        .validate(&Item::new("pen", 100, 1), ConstraintGroup::Create)
        .unwrap();
    let json = serde_json::to_value(&errors).unwrap();

    assert_eq!(json["objectName"], "item");
    assert_eq!(json["errors"][0]["scope"], "field");
    assert_eq!(json["errors"][0]["field"], "price");
    assert_eq!(json["errors"][0]["rejectedValue"], 100);
    assert_eq!(json["errors"][1]["scope"], "object");
    assert_eq!(json["errors"][1]["arguments"][1], 100);
}

#[test]
fn test_dispatcher_shared_across_threads() {
    let dispatcher = std::sync::Arc::new(dispatcher());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            std::thread::spawn(move || {
                let item = Item::new("pen", 100 * (i + 1), 1);
                dispatcher
                    .validate(&item, ConstraintGroup::Create)
                    .unwrap()
                    .error_count()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
}
