//! Resource lifecycle and timestamp types
//!
//! Every record managed by a [`ResourceController`](crate::api::ResourceController)
//! carries an explicit lifecycle state and a pair of server-assigned timestamps.
//! Deletion is always logical: a destroyed record moves to
//! [`Lifecycle::Deleted`] and stays in storage, excluded from default
//! listings by the store's visibility scope.
//!
//! # Example
//!
//! ```rust
//! use crudkit::resource::{Lifecycle, Timestamps};
//!
//! let mut stamps = Timestamps::now();
//! let created = stamps.created_time;
//! stamps.touch();
//! assert!(stamps.updated_time >= created);
//! assert_eq!(Lifecycle::default(), Lifecycle::Active);
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a stored resource
///
/// `Deleted` is terminal: it is reached only through the destroy
/// operations and there is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Visible in default listings and lookups
    #[default]
    Active,
    /// Soft-deleted: retained in storage, hidden from default listings
    Deleted,
}

impl Lifecycle {
    /// Whether this state counts as soft-deleted
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// Server-assigned creation and modification times
///
/// `updated_time` is refreshed on every mutation, including soft delete,
/// and never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// When the record was created
    pub created_time: DateTime<Utc>,
    /// When the record was last mutated
    pub updated_time: DateTime<Utc>,
}

impl Timestamps {
    /// Create timestamps for a freshly created record
    #[must_use]
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_time: now,
            updated_time: now,
        }
    }

    /// Refresh `updated_time`, keeping it monotonic non-decreasing
    pub fn touch(&mut self) {
        self.updated_time = self.updated_time.max(Utc::now());
    }
}

/// A record the CRUD base layer can manage
///
/// Implementors own identifier assignment; the store owns lifecycle
/// transitions and timestamp refreshes through this interface.
///
/// # Example
///
/// ```rust
/// use crudkit::resource::{Lifecycle, Resource, Timestamps};
/// use serde::Serialize;
/// use uuid::Uuid;
///
/// #[derive(Clone, Serialize)]
/// struct Note {
///     id: Uuid,
///     body: String,
///     lifecycle: Lifecycle,
///     #[serde(flatten)]
///     timestamps: Timestamps,
/// }
///
/// impl Resource for Note {
///     type Id = Uuid;
///
///     fn id(&self) -> &Uuid {
///         &self.id
///     }
///
///     fn lifecycle(&self) -> Lifecycle {
///         self.lifecycle
///     }
///
///     fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
///         self.lifecycle = lifecycle;
///     }
///
///     fn timestamps(&self) -> &Timestamps {
///         &self.timestamps
///     }
///
///     fn timestamps_mut(&mut self) -> &mut Timestamps {
///         &mut self.timestamps
///     }
/// }
/// ```
pub trait Resource: Clone + Serialize + Send + Sync {
    /// The identifier type (e.g. `Uuid`, `i64`)
    type Id: Clone + Eq + fmt::Display + Send + Sync;

    /// The record's unique identifier
    fn id(&self) -> &Self::Id;

    /// Current lifecycle state
    fn lifecycle(&self) -> Lifecycle;

    /// Transition the lifecycle state
    fn set_lifecycle(&mut self, lifecycle: Lifecycle);

    /// Creation and modification times
    fn timestamps(&self) -> &Timestamps;

    /// Mutable access for timestamp refreshes
    fn timestamps_mut(&mut self) -> &mut Timestamps;

    /// Refresh `updated_time` after a mutation
    fn touch(&mut self) {
        self.timestamps_mut().touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_default_is_active() {
        assert_eq!(Lifecycle::default(), Lifecycle::Active);
        assert!(!Lifecycle::Active.is_deleted());
        assert!(Lifecycle::Deleted.is_deleted());
    }

    #[test]
    fn test_lifecycle_display() {
        assert_eq!(format!("{}", Lifecycle::Active), "active");
        assert_eq!(format!("{}", Lifecycle::Deleted), "deleted");
    }

    #[test]
    fn test_lifecycle_serde() {
        assert_eq!(
            serde_json::to_string(&Lifecycle::Active).unwrap(),
            "\"active\""
        );
        let parsed: Lifecycle = serde_json::from_str("\"deleted\"").unwrap();
        assert_eq!(parsed, Lifecycle::Deleted);
    }

    #[test]
    fn test_timestamps_now_matches() {
        let stamps = Timestamps::now();
        assert_eq!(stamps.created_time, stamps.updated_time);
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut stamps = Timestamps::now();
        let before = stamps.updated_time;
        stamps.touch();
        assert!(stamps.updated_time >= before);
        assert!(stamps.updated_time >= stamps.created_time);
    }

    #[test]
    fn test_touch_never_rewinds() {
        let mut stamps = Timestamps::now();
        // Simulate a clock that handed out a future updated_time earlier.
        let future = stamps.updated_time + chrono::Duration::seconds(60);
        stamps.updated_time = future;
        stamps.touch();
        assert_eq!(stamps.updated_time, future);
    }
}
