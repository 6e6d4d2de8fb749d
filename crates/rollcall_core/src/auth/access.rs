//! Pure permission rules over an optional active user.

use crate::model::user::User;

/// Returns whether the user holds the admin role.
pub fn is_admin(user: Option<&User>) -> bool {
    user.is_some_and(User::is_admin)
}

/// Returns whether the user may mutate data.
pub fn can_edit(user: Option<&User>) -> bool {
    match user {
        None => false,
        Some(user) if user.is_admin() => true,
        Some(user) => user.permissions.can_edit,
    }
}

/// Returns whether the user may view and operate on `company`.
///
/// Matching is exact and case-sensitive. A `"*"` argument is treated as a
/// company name like any other.
pub fn can_view_company(user: Option<&User>, company: &str) -> bool {
    match user {
        None => false,
        Some(user) if user.is_admin() => true,
        Some(user) => user.permissions.allowed_companies.permits(company),
    }
}
