//! Authentication and authorization.
//!
//! # Responsibility
//! - Evaluate edit and company-visibility rights for the active user.
//! - Hash and verify passwords.
//! - Own the explicit session object and its persisted pointer.
//!
//! # Invariants
//! - Rights are recomputed from the current user record on every check.
//! - Admins may edit and view every company regardless of stored fields.

pub mod access;
pub mod password;
pub mod session;
