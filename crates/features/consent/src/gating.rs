//! Pure gating decisions over consent maps.

use consent_domain::{CategoryConsents, ServiceDescriptor, ServiceOverrides};

/// A present, non-null override wins; otherwise the service follows its category.
#[must_use]
pub fn is_service_enabled(
    categories: &CategoryConsents,
    overrides: &ServiceOverrides,
    service: &ServiceDescriptor,
) -> bool {
    overrides.get(&service.id).unwrap_or_else(|| categories.get(service.category))
}

/// Whether the maps deviate from "everything granted, nothing overridden".
///
/// Drives which secondary action the prompt offers: "save selection" when `true`,
/// "disable all" otherwise.
#[must_use]
pub fn has_custom_selection(categories: &CategoryConsents, overrides: &ServiceOverrides) -> bool {
    overrides.has_decisions() || !categories.is_fully_granted()
}

/// Value shown on a service row: draft, then stored override, then on.
///
/// Untouched services display as enabled even though the stored category may still be
/// denied.
#[must_use]
pub fn displayed_service_value(
    draft: &ServiceOverrides,
    stored: &ServiceOverrides,
    service_id: &str,
) -> bool {
    draft.get(service_id).or_else(|| stored.get(service_id)).unwrap_or(true)
}

/// Next draft override when a service row is toggled.
#[must_use]
pub fn toggled_service_value(draft: &ServiceOverrides, service_id: &str) -> bool {
    !draft.get(service_id).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_domain::ConsentCategory;
    use proptest::prelude::*;

    fn ga() -> ServiceDescriptor {
        ServiceDescriptor::new("ga", "Google Analytics", ConsentCategory::Analytics)
    }

    fn category() -> impl Strategy<Value = ConsentCategory> {
        prop_oneof![
            Just(ConsentCategory::Marketing),
            Just(ConsentCategory::Analytics),
            Just(ConsentCategory::Other),
        ]
    }

    proptest! {
        #[test]
        fn override_wins_else_category(
            cat in category(),
            cats in any::<(bool, bool, bool)>(),
            ovr in proptest::option::of(any::<Option<bool>>()),
        ) {
            let categories = CategoryConsents { marketing: cats.0, analytics: cats.1, other: cats.2 };
            let mut overrides = ServiceOverrides::new();
            if let Some(value) = ovr {
                overrides.set("svc", value);
            }
            let service = ServiceDescriptor::new("svc", "Service", cat);

            let expected = ovr.flatten().unwrap_or_else(|| categories.get(cat));
            prop_assert_eq!(is_service_enabled(&categories, &overrides, &service), expected);
        }
    }

    #[test]
    fn null_override_defers_to_category() {
        let overrides = ServiceOverrides::new().with("ga", None);
        let granted = CategoryConsents::denied().with(ConsentCategory::Analytics, true);

        assert!(is_service_enabled(&granted, &overrides, &ga()));
        assert!(!is_service_enabled(&CategoryConsents::denied(), &overrides, &ga()));
    }

    #[test]
    fn custom_selection_detection() {
        let none = ServiceOverrides::new();
        assert!(!has_custom_selection(&CategoryConsents::granted(), &none));
        assert!(has_custom_selection(&CategoryConsents::denied(), &none));
        assert!(!has_custom_selection(
            &CategoryConsents::granted(),
            &ServiceOverrides::new().with("ga", None)
        ));
        assert!(has_custom_selection(
            &CategoryConsents::granted(),
            &ServiceOverrides::new().with("ga", Some(true))
        ));
    }

    #[test]
    fn display_and_toggle_follow_opt_out_posture() {
        let stored = ServiceOverrides::new().with("pixel", Some(false));
        let draft = ServiceOverrides::new();

        assert!(displayed_service_value(&draft, &stored, "ga"));
        assert!(!displayed_service_value(&draft, &stored, "pixel"));
        assert!(!toggled_service_value(&draft, "ga"));

        let toggled = draft.with("ga", Some(false));
        assert!(toggled_service_value(&toggled, "ga"));
        assert!(!displayed_service_value(&toggled, &stored, "ga"));
    }
}
