//! Explicit session object for the single active user.
//!
//! # Invariants
//! - The persisted pointer (`active_user_id`) names the logged-in user, or
//!   is absent when nobody is logged in.
//! - A failed login leaves the session and pointer untouched.

use super::access;
use super::password::verify_password;
use crate::model::user::User;
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoResult, StoreRepository};
use crate::store::{KeyValueStore, ACTIVE_USER_KEY};
use log::{info, warn};

/// Active user holder; all permission checks go through it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// Session with nobody logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session for an already-resolved user, without touching the store.
    pub fn for_user(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// Restores the session named by the persisted pointer.
    ///
    /// A pointer to a user that no longer exists yields an anonymous session.
    pub fn restore<S: KeyValueStore>(repo: &StoreRepository<S>) -> RepoResult<Self> {
        let Some(user_id) = repo.store().get(ACTIVE_USER_KEY)? else {
            return Ok(Self::anonymous());
        };

        match repo.get_user(&user_id)? {
            Some(user) => {
                info!(
                    "event=session_restore module=auth status=ok user_id={}",
                    user.id
                );
                Ok(Self::for_user(user))
            }
            None => {
                warn!(
                    "event=session_restore module=auth status=stale user_id={}",
                    user_id
                );
                Ok(Self::anonymous())
            }
        }
    }

    /// Verifies credentials and, on success, activates and persists the user.
    ///
    /// Returns `false` for an unknown username or a wrong password.
    pub fn login<S: KeyValueStore>(
        &mut self,
        repo: &StoreRepository<S>,
        username: &str,
        password: &str,
    ) -> RepoResult<bool> {
        let Some(user) = repo.find_user_by_username(username)? else {
            info!("event=session_login module=auth status=rejected reason=unknown_user");
            return Ok(false);
        };

        if !verify_password(password, &user.password_hash) {
            info!(
                "event=session_login module=auth status=rejected reason=bad_password user_id={}",
                user.id
            );
            return Ok(false);
        }

        repo.store().set(ACTIVE_USER_KEY, &user.id)?;
        info!(
            "event=session_login module=auth status=ok user_id={}",
            user.id
        );
        self.user = Some(user);
        Ok(true)
    }

    /// Clears the active user and the persisted pointer.
    pub fn logout<S: KeyValueStore>(&mut self, repo: &StoreRepository<S>) -> RepoResult<()> {
        repo.store().remove(ACTIVE_USER_KEY)?;
        if let Some(user) = self.user.take() {
            info!(
                "event=session_logout module=auth status=ok user_id={}",
                user.id
            );
        }
        Ok(())
    }

    /// Re-reads the active user record so permission edits take effect.
    ///
    /// Ends the session when the user was deleted meanwhile.
    pub fn refresh<S: KeyValueStore>(&mut self, repo: &StoreRepository<S>) -> RepoResult<()> {
        let Some(current) = self.user.as_ref() else {
            return Ok(());
        };

        match repo.get_user(&current.id)? {
            Some(user) => self.user = Some(user),
            None => self.logout(repo)?,
        }
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        access::is_admin(self.user())
    }

    pub fn can_edit(&self) -> bool {
        access::can_edit(self.user())
    }

    pub fn can_view_company(&self, company: &str) -> bool {
        access::can_view_company(self.user(), company)
    }
}
