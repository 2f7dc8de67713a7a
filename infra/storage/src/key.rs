use crate::error::StorageError;
use std::fmt;

const MAX_KEY_LEN: usize = 128;

/// A validated record key.
///
/// Keys are case-sensitive (`cookieConsent` and `cookieconsent` are different records) and
/// may only contain ASCII alphanumerics, `_`, `-` and `.`. A leading dot is rejected so a key
/// can never name a hidden file or a relative path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StorageKey {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        if value.is_empty() {
            return Err(StorageError::InvalidKey {
                message: "EMPTY".into(),
                context: Some("Storage key cannot be empty".into()),
            });
        }

        if value.len() > MAX_KEY_LEN {
            return Err(StorageError::InvalidKey {
                message: format!("{} bytes", value.len()).into(),
                context: Some(format!("Storage key longer than {MAX_KEY_LEN} bytes").into()),
            });
        }

        if value.starts_with('.')
            || !value.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(StorageError::InvalidKey {
                message: value.into(),
                context: Some("Storage key contains illegal characters".into()),
            });
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for StorageKey {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        Self::try_from(value.to_owned())
    }
}

impl TryFrom<&String> for StorageKey {
    type Error = StorageError;

    fn try_from(value: &String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
