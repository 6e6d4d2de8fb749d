//! User management use-cases (administrators only).
//!
//! # Invariants
//! - Admin accounts always carry full permissions.
//! - At least one administrator always remains.

use super::{ServiceError, ServiceResult};
use crate::auth::session::Session;
use crate::model::user::{Permissions, Role, User, UserDraft};
use crate::model::{require, ValidationError};
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::user_repo::UserRepository;
use log::info;
use std::collections::BTreeSet;

/// Use-case service for user accounts.
pub struct UserService<'a, R> {
    repo: &'a R,
}

impl<'a, R: UserRepository + EmployeeRepository> UserService<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub fn list(&self, session: &Session) -> ServiceResult<Vec<User>> {
        require_admin(session)?;
        Ok(self.repo.list_users()?)
    }

    /// Creates or updates a user from `draft`.
    ///
    /// # Errors
    /// - `Validation` for missing username/display name, a missing password
    ///   on create, or a username held by another user.
    /// - `UserNotFound` when `draft.id` names no user.
    pub fn save(&self, session: &Session, draft: &UserDraft) -> ServiceResult<User> {
        require_admin(session)?;

        let mut draft = draft.clone();
        draft.username = require("username", &draft.username)?;
        draft.display_name = require("displayName", &draft.display_name)?;

        match draft.id.as_deref() {
            Some(id) => {
                let existing = self
                    .repo
                    .get_user(id)?
                    .ok_or_else(|| ServiceError::UserNotFound(id.to_string()))?;
                if existing.is_admin() && draft.role != Role::Admin {
                    self.ensure_other_admin(&existing.id)?;
                }
            }
            None => {
                if draft.supplied_password().is_none() {
                    return Err(ValidationError::PasswordRequired.into());
                }
            }
        }

        if draft.role == Role::Admin {
            draft.permissions = Permissions::full();
        }

        Ok(self.repo.save_user(&draft)?)
    }

    /// Deletes a user other than the acting one and the last admin.
    pub fn delete(&self, session: &Session, id: &str) -> ServiceResult<()> {
        require_admin(session)?;
        if session.user().is_some_and(|actor| actor.id == id) {
            return Err(ValidationError::SelfDeletion.into());
        }

        let target = self
            .repo
            .get_user(id)?
            .ok_or_else(|| ServiceError::UserNotFound(id.to_string()))?;
        if target.is_admin() {
            self.ensure_other_admin(&target.id)?;
        }

        self.repo.delete_user(id)?;
        info!(
            "event=user_delete module=service status=ok user_id={}",
            target.id
        );
        Ok(())
    }

    /// Companies that can be granted: those of employees plus those already
    /// named in user permissions. Sorted and unique; no wildcard.
    pub fn known_companies(&self, session: &Session) -> ServiceResult<Vec<String>> {
        require_admin(session)?;

        let mut companies: BTreeSet<String> = self
            .repo
            .list_employees()?
            .into_iter()
            .map(|employee| employee.company)
            .collect();
        for user in self.repo.list_users()? {
            companies.extend(user.permissions.allowed_companies.companies().iter().cloned());
        }
        companies.retain(|company| !company.is_empty());
        Ok(companies.into_iter().collect())
    }

    fn ensure_other_admin(&self, excluded_id: &str) -> ServiceResult<()> {
        let has_other = self
            .repo
            .list_users()?
            .iter()
            .any(|user| user.is_admin() && user.id != excluded_id);
        if has_other {
            Ok(())
        } else {
            Err(ValidationError::LastAdmin.into())
        }
    }
}

fn require_admin(session: &Session) -> ServiceResult<()> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::PermissionDenied("managing users"))
    }
}
