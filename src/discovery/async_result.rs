//! Async-loaded values as an explicit sum type.

use serde::{Serialize, Serializer};

use crate::error::{Error, ErrorReport};

/// State of a value fetched in the background
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncResult<T> {
    /// Nothing requested yet
    Uninitialized,
    /// Request in flight
    Loading,
    /// Request succeeded
    Success(T),
    /// Request failed
    Failure(Error),
}

impl<T> Default for AsyncResult<T> {
    fn default() -> Self {
        AsyncResult::Uninitialized
    }
}

impl<T> AsyncResult<T> {
    /// The loaded value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            AsyncResult::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&Error> {
        match self {
            AsyncResult::Failure(err) => Some(err),
            _ => None,
        }
    }

    /// Whether a request is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, AsyncResult::Loading)
    }

    /// Whether the value reached a terminal state (success or failure)
    pub fn is_complete(&self) -> bool {
        matches!(self, AsyncResult::Success(_) | AsyncResult::Failure(_))
    }
}

impl<T> From<crate::error::Result<T>> for AsyncResult<T> {
    fn from(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(value) => AsyncResult::Success(value),
            Err(err) => AsyncResult::Failure(err),
        }
    }
}

// Tagged like `{"status": "success", "value": ...}` for host UIs.
impl<T: Serialize> Serialize for AsyncResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(tag = "status", rename_all = "snake_case")]
        enum Tagged<'a, T> {
            Uninitialized,
            Loading,
            Success { value: &'a T },
            Failure { error: ErrorReport },
        }

        let tagged = match self {
            AsyncResult::Uninitialized => Tagged::Uninitialized,
            AsyncResult::Loading => Tagged::Loading,
            AsyncResult::Success(value) => Tagged::Success { value },
            AsyncResult::Failure(err) => Tagged::Failure { error: err.into() },
        };
        tagged.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let loaded: AsyncResult<u32> = AsyncResult::Success(7);
        assert_eq!(loaded.value(), Some(&7));
        assert!(loaded.is_complete());

        let failed: AsyncResult<u32> = AsyncResult::Failure(Error::LoadFailed("x".into()));
        assert!(failed.value().is_none());
        assert_eq!(failed.error().map(Error::code), Some(100));

        assert!(AsyncResult::<u32>::Loading.is_loading());
        assert!(!AsyncResult::<u32>::default().is_complete());
    }

    #[test]
    fn test_serialized_shape() {
        let loaded: AsyncResult<Vec<u8>> = AsyncResult::Success(vec![]);
        let json = serde_json::to_value(&loaded).unwrap();
        assert_eq!(json["status"], "success");

        let failed: AsyncResult<Vec<u8>> = AsyncResult::Failure(Error::LoadFailed("x".into()));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["error"]["code"], 100);
    }
}
