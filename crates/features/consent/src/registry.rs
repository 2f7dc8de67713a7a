use consent_domain::{ConsentCategory, ServiceDescriptor};

/// Services that declared themselves to the engine, in attach order.
///
/// Registration is keyed by `id` and first-wins: a later declaration with the same id but
/// different metadata is ignored. Removal matches the whole descriptor, so a stale handle
/// carrying outdated metadata cannot evict the entry that won registration.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    entries: Vec<ServiceDescriptor>,
}

impl ServiceRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Returns `true` if the descriptor was inserted.
    pub fn register(&mut self, descriptor: ServiceDescriptor) -> bool {
        if self.entries.iter().any(|s| s.id == descriptor.id) {
            return false;
        }
        self.entries.push(descriptor);
        true
    }

    /// Returns `true` if an entry equal to `descriptor` was removed.
    pub fn remove(&mut self, descriptor: &ServiceDescriptor) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| s != descriptor);
        self.entries.len() != before
    }

    #[must_use]
    pub fn list(&self) -> &[ServiceDescriptor] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ServiceDescriptor> {
        self.entries.iter().find(|s| s.id == id)
    }

    pub fn in_category(
        &self,
        category: ConsentCategory,
    ) -> impl Iterator<Item = &ServiceDescriptor> + '_ {
        self.entries.iter().filter(move |s| s.category == category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ga() -> ServiceDescriptor {
        ServiceDescriptor::new("ga", "Google Analytics", ConsentCategory::Analytics)
    }

    #[test]
    fn register_is_idempotent_and_first_wins() {
        let mut registry = ServiceRegistry::new();

        assert!(registry.register(ga()));
        assert!(!registry.register(ga()));
        assert!(!registry.register(ServiceDescriptor::new(
            "ga",
            "Renamed",
            ConsentCategory::Marketing
        )));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("ga"), Some(&ga()));
    }

    #[test]
    fn remove_requires_exact_match() {
        let mut registry = ServiceRegistry::new();
        registry.register(ga());

        let stale = ServiceDescriptor::new("ga", "Renamed", ConsentCategory::Analytics);
        assert!(!registry.remove(&stale));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(&ga()));
        assert!(registry.is_empty());
        assert!(!registry.remove(&ga()));
    }

    #[test]
    fn preserves_insertion_order_per_category() {
        let mut registry = ServiceRegistry::new();
        registry.register(ServiceDescriptor::new("pixel", "Pixel", ConsentCategory::Marketing));
        registry.register(ga());
        registry.register(ServiceDescriptor::new("plausible", "Plausible", ConsentCategory::Analytics));

        let ids: Vec<_> = registry.list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["pixel", "ga", "plausible"]);

        let analytics: Vec<_> =
            registry.in_category(ConsentCategory::Analytics).map(|s| s.id.as_str()).collect();
        assert_eq!(analytics, ["ga", "plausible"]);
        assert_eq!(registry.in_category(ConsentCategory::Other).count(), 0);
    }
}
