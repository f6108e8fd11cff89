/// Row-level ownership access control
///
/// Tablekeep has exactly two permission tiers: admin and owner. A resource
/// is accessible when the caller is an admin or owns the resource — the same
/// rule gates read, update, and delete of every owned resource.
///
/// Requests that fail authentication never reach these checks; a denial
/// here always means "valid identity, insufficient ownership" (HTTP 403).

use uuid::Uuid;

use super::middleware::AuthContext;

/// Error type for access control checks
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Caller is neither an admin nor the resource owner
    #[error("Not authorized to access this resource")]
    Denied,
}

/// The access decision function
///
/// Allows access when the caller holds the admin role or owns the resource:
///
/// ```
/// use tablekeep_shared::auth::access::can_access;
/// use tablekeep_shared::auth::middleware::AuthContext;
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let caller = AuthContext::new(owner, false);
///
/// assert!(can_access(&caller, owner));
/// assert!(!can_access(&caller, Uuid::new_v4()));
/// ```
pub fn can_access(auth: &AuthContext, resource_owner_id: Uuid) -> bool {
    auth.is_admin || auth.user_id == resource_owner_id
}

/// Checks access and returns an error on denial
///
/// `?`-friendly wrapper around [`can_access`] for use in request handlers.
pub fn require_access(auth: &AuthContext, resource_owner_id: Uuid) -> Result<(), AccessError> {
    if !can_access(auth, resource_owner_id) {
        return Err(AccessError::Denied);
    }

    Ok(())
}
