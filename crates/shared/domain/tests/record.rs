use consent_domain::{
    CategoryConsents, ConsentCategory, ConsentSnapshot, ServiceDescriptor, ServiceOverrides,
};
use serde_json::json;

#[test]
fn snapshot_uses_durable_record_field_names() {
    let snapshot = ConsentSnapshot::new(
        CategoryConsents { marketing: false, analytics: true, other: false },
        ServiceOverrides::new().with("ga", Some(false)).with("hotjar", None),
    );

    let value = serde_json::to_value(&snapshot).expect("serialize");
    assert_eq!(
        value,
        json!({
            "cookieCategoryConsents": { "marketing": false, "analytics": true, "other": false },
            "customServiceConsents": { "ga": false, "hotjar": null }
        })
    );
}

#[test]
fn default_snapshot_is_all_denied_without_overrides() {
    let snapshot = ConsentSnapshot::default();
    assert_eq!(snapshot.categories, CategoryConsents::denied());
    assert!(snapshot.overrides.is_empty());
}

#[test]
fn categories_reject_unknown_and_missing_keys() {
    let extra = json!({ "marketing": true, "analytics": true, "other": true, "essential": true });
    assert!(serde_json::from_value::<CategoryConsents>(extra).is_err());

    let missing = json!({ "marketing": true, "analytics": true });
    assert!(serde_json::from_value::<CategoryConsents>(missing).is_err());
}

#[test]
fn descriptor_category_is_lowercase_on_the_wire() {
    let descriptor = ServiceDescriptor::new("ga", "Google Analytics", ConsentCategory::Analytics);
    let value = serde_json::to_value(&descriptor).expect("serialize");
    assert_eq!(value, json!({ "id": "ga", "name": "Google Analytics", "category": "analytics" }));
}
