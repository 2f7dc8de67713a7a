use std::sync::atomic::{AtomicBool, Ordering};

/// Startup decision for the preference prompt.
///
/// Never shown on the privacy-policy page; elsewhere shown only when no record existed.
#[must_use]
pub fn initial_visibility(record_existed: bool, location: Option<&str>, privacy_path: &str) -> bool {
    if location.is_some_and(|path| path == privacy_path) {
        return false;
    }
    !record_existed
}

/// Whether the preference prompt is currently shown.
#[derive(Debug, Default)]
pub struct PromptVisibility {
    open: AtomicBool,
}

impl PromptVisibility {
    #[must_use]
    pub const fn new(open: bool) -> Self {
        Self { open: AtomicBool::new(open) }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Returns `true` if the value changed.
    pub fn set(&self, open: bool) -> bool {
        self.open.swap(open, Ordering::AcqRel) != open
    }
}
