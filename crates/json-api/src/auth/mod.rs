//! Trusted gateway identity.
//!
//! An upstream gateway authenticates callers and forwards who they are in
//! request headers. These hoops only read them.

pub(crate) mod middleware;

/// Header carrying the authenticated member id.
pub(crate) const MEMBER_HEADER: &str = "x-user-uuid";

/// Header carrying the caller's role.
pub(crate) const ROLE_HEADER: &str = "x-user-role";

/// Role allowed on admin routes.
pub(crate) const ADMIN_ROLE: &str = "admin";
