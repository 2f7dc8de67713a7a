use crate::gating;
use consent_domain::{
    CategoryConsents, ConsentCategory, ConsentSnapshot, ServiceDescriptor, ServiceOverrides,
};

/// The secondary action the prompt offers next to "accept all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryAction {
    SaveSelection,
    DisableAll,
}

/// One service line inside a category row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRow {
    pub service: ServiceDescriptor,
    pub enabled: bool,
}

/// One category line of the prompt with the services that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub category: ConsentCategory,
    pub enabled: bool,
    pub services: Vec<ServiceRow>,
}

/// Editable copy of the consent maps backing an open prompt.
///
/// Nothing here touches storage; hand the draft to
/// [`ConsentEngine::save_selection`](crate::ConsentEngine::save_selection) to persist it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentSelection {
    categories: CategoryConsents,
    overrides: ServiceOverrides,
    stored: ServiceOverrides,
}

impl ConsentSelection {
    #[must_use]
    pub fn from_snapshot(snapshot: &ConsentSnapshot) -> Self {
        Self {
            categories: snapshot.categories,
            overrides: snapshot.overrides.clone(),
            stored: snapshot.overrides.clone(),
        }
    }

    #[must_use]
    pub const fn categories(&self) -> &CategoryConsents {
        &self.categories
    }

    #[must_use]
    pub const fn overrides(&self) -> &ServiceOverrides {
        &self.overrides
    }

    /// Flips a category and returns its new value.
    pub fn toggle_category(&mut self, category: ConsentCategory) -> bool {
        let next = !self.categories.get(category);
        self.categories.set(category, next);
        next
    }

    /// Flips a service row and returns the new explicit override.
    pub fn toggle_service(&mut self, service_id: &str) -> bool {
        let next = gating::toggled_service_value(&self.overrides, service_id);
        self.overrides.set(service_id, Some(next));
        next
    }

    #[must_use]
    pub const fn category_value(&self, category: ConsentCategory) -> bool {
        self.categories.get(category)
    }

    #[must_use]
    pub fn service_value(&self, service_id: &str) -> bool {
        gating::displayed_service_value(&self.overrides, &self.stored, service_id)
    }

    #[must_use]
    pub fn has_custom_selection(&self) -> bool {
        gating::has_custom_selection(&self.categories, &self.overrides)
    }

    #[must_use]
    pub fn secondary_action(&self) -> SecondaryAction {
        if self.has_custom_selection() {
            SecondaryAction::SaveSelection
        } else {
            SecondaryAction::DisableAll
        }
    }

    /// Prompt rows for `services`, skipping categories nobody declared.
    #[must_use]
    pub fn rows(&self, services: &[ServiceDescriptor]) -> Vec<CategoryRow> {
        ConsentCategory::ALL
            .into_iter()
            .filter_map(|category| {
                let rows: Vec<ServiceRow> = services
                    .iter()
                    .filter(|s| s.category == category)
                    .map(|s| ServiceRow { enabled: self.service_value(&s.id), service: s.clone() })
                    .collect();

                (!rows.is_empty()).then(|| CategoryRow {
                    category,
                    enabled: self.category_value(category),
                    services: rows,
                })
            })
            .collect()
    }

    pub(crate) fn into_parts(self) -> (CategoryConsents, ServiceOverrides) {
        (self.categories, self.overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_service_displays_enabled_over_denied_category() {
        let draft = ConsentSelection::from_snapshot(&ConsentSnapshot::default());

        assert!(draft.service_value("ga"));
        assert!(!draft.category_value(ConsentCategory::Analytics));
    }

    #[test]
    fn first_service_toggle_records_explicit_false() {
        let mut draft = ConsentSelection::from_snapshot(&ConsentSnapshot::default());

        assert!(!draft.toggle_service("ga"));
        assert_eq!(draft.overrides().get("ga"), Some(false));
        assert!(draft.toggle_service("ga"));
        assert_eq!(draft.overrides().get("ga"), Some(true));
    }

    #[test]
    fn secondary_action_tracks_custom_selection() {
        let granted = ConsentSnapshot::new(CategoryConsents::granted(), ServiceOverrides::new());
        let mut draft = ConsentSelection::from_snapshot(&granted);
        assert_eq!(draft.secondary_action(), SecondaryAction::DisableAll);

        draft.toggle_category(ConsentCategory::Other);
        assert_eq!(draft.secondary_action(), SecondaryAction::SaveSelection);
    }

    #[test]
    fn rows_skip_empty_categories() {
        let services = [
            ServiceDescriptor::new("ga", "Google Analytics", ConsentCategory::Analytics),
            ServiceDescriptor::new("plausible", "Plausible", ConsentCategory::Analytics),
        ];
        let stored = ServiceOverrides::new().with("plausible", Some(false));
        let draft = ConsentSelection::from_snapshot(&ConsentSnapshot::new(
            CategoryConsents::denied(),
            stored,
        ));

        let rows = draft.rows(&services);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, ConsentCategory::Analytics);
        assert!(!rows[0].enabled);
        let enabled: Vec<_> = rows[0].services.iter().map(|r| r.enabled).collect();
        assert_eq!(enabled, [true, false]);
    }
}
