use crate::consent::ConsentCategory;
use serde::{Deserialize, Serialize};

/// Metadata a dependent service declares when it attaches to the engine.
///
/// Identity is `id`; `name` is what the presentation layer shows next to the toggle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub id: String,
    pub name: String,
    pub category: ConsentCategory,
}

impl ServiceDescriptor {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ConsentCategory,
    ) -> Self {
        Self { id: id.into(), name: name.into(), category }
    }
}
