/// The row-ownership guard
///
/// Every owned resource is scoped to exactly one user. Mutating operations
/// (update/delete) must verify that the target row belongs to the caller
/// before proceeding. The caller-visible effect of an ownership mismatch
/// is identical to the row not existing at all, so the existence of other
/// users' rows never leaks.
///
/// The guard is deliberately the single place this check lives: route
/// handlers load the row, then call [`assert_owned`].
///
/// # Example
///
/// ```
/// use brandloom_shared::auth::ownership::{assert_owned, Owned, OwnershipError};
/// use uuid::Uuid;
///
/// struct Widget { user_id: Uuid }
///
/// impl Owned for Widget {
///     fn owner_id(&self) -> Uuid { self.user_id }
/// }
///
/// let me = Uuid::new_v4();
/// let widget = Widget { user_id: me };
///
/// assert!(assert_owned(Some(widget), me).is_ok());
/// assert!(matches!(
///     assert_owned::<Widget>(None, me),
///     Err(OwnershipError::NotFound)
/// ));
/// ```

use uuid::Uuid;

/// Error type for the ownership guard
///
/// A single variant by design: absent rows and foreign rows are
/// indistinguishable to the caller.
#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    /// Row is absent or owned by another user
    #[error("Resource not found")]
    NotFound,
}

/// A resource owned by exactly one user
pub trait Owned {
    /// The id of the owning user
    fn owner_id(&self) -> Uuid;
}

/// Asserts that a loaded row exists and belongs to the caller
///
/// # Arguments
///
/// * `row` - The row as loaded by id (None if absent)
/// * `caller_id` - The authenticated caller's user id
///
/// # Errors
///
/// Returns `OwnershipError::NotFound` when the row is absent OR owned by
/// a different user — the two cases are intentionally indistinguishable.
pub fn assert_owned<T: Owned>(row: Option<T>, caller_id: Uuid) -> Result<T, OwnershipError> {
    match row {
        Some(row) if row.owner_id() == caller_id => Ok(row),
        _ => Err(OwnershipError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        user_id: Uuid,
    }

    impl Owned for Row {
        fn owner_id(&self) -> Uuid {
            self.user_id
        }
    }

    #[test]
    fn test_owner_passes() {
        let me = Uuid::new_v4();
        let row = Row { user_id: me };

        assert!(assert_owned(Some(row), me).is_ok());
    }

    #[test]
    fn test_absent_row_is_not_found() {
        let result = assert_owned::<Row>(None, Uuid::new_v4());
        assert!(matches!(result, Err(OwnershipError::NotFound)));
    }

    #[test]
    fn test_foreign_row_is_not_found() {
        let row = Row {
            user_id: Uuid::new_v4(),
        };
        let result = assert_owned(Some(row), Uuid::new_v4());

        // Same error as an absent row, so existence never leaks
        assert!(matches!(result, Err(OwnershipError::NotFound)));
    }
}
