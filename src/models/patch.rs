//! Tri-state field used by partial update requests.
//!
//! A JSON key that is missing, a key set to `null` and a key set to a value
//! are three different requests: leave alone, clear, and overwrite.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::AppError;

/// One field of a partial update.
///
/// Use with `#[serde(default)]` so that a missing key becomes [`Patch::Absent`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Column assignment for a nullable column: `None` when the key was
    /// absent, `Some(None)` to clear it.
    pub fn as_nullable(&self) -> Option<Option<&T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }

    /// Column assignment for a non-nullable column. `null` is rejected.
    pub fn required(&self, field: &str) -> Result<Option<&T>, AppError> {
        match self {
            Patch::Absent => Ok(None),
            Patch::Null => Err(AppError::Validation(format!("{} cannot be null", field))),
            Patch::Value(v) => Ok(Some(v)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(v) => v.serialize(serializer),
            Patch::Absent | Patch::Null => serializer.serialize_none(),
        }
    }
}
