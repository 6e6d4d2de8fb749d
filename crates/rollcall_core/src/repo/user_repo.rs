//! User persistence, first-run seeding and legacy password migration.
//!
//! # Invariants
//! - Listing users on an empty store seeds exactly one administrator; a
//!   collection holding only unreadable entries is never seeded over.
//! - Usernames are unique across the collection.
//! - Saving without a password keeps the stored hash.
//! - Plaintext passwords found on load are hashed and written back once.

use super::{RepoError, RepoResult, StoreRepository};
use crate::auth::password::hash_password;
use crate::model::user::{Permissions, Role, StoredUser, User, UserDraft};
use crate::model::ValidationError;
use crate::store::collection::{load_records, save_collection};
use crate::store::{KeyValueStore, USERS_KEY};
use log::{info, warn};
use uuid::Uuid;

pub const DEFAULT_ADMIN_ID: &str = "admin-001";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_ADMIN_DISPLAY_NAME: &str = "System Administrator";

/// Repository interface for user accounts.
pub trait UserRepository {
    /// All users; seeds the default administrator when none exist.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn get_user(&self, id: &str) -> RepoResult<Option<User>>;
    fn find_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    /// Upserts by id and returns the persisted record.
    fn save_user(&self, draft: &UserDraft) -> RepoResult<User>;
    /// Returns `false` when no user had this id.
    fn delete_user(&self, id: &str) -> RepoResult<bool>;
}

impl<S: KeyValueStore> StoreRepository<S> {
    /// Returns the canonical users and the number of unreadable entries.
    fn load_users(&self) -> RepoResult<(Vec<User>, usize)> {
        let stored = load_records::<StoredUser, _>(&self.store, USERS_KEY)?;
        let mut migrated = 0_usize;
        let mut users = Vec::with_capacity(stored.items.len());

        for raw in stored.items {
            let (user, was_migrated) = normalize_user(raw)?;
            migrated += usize::from(was_migrated);
            users.push(user);
        }

        if migrated > 0 {
            save_collection(&self.store, USERS_KEY, &users)?;
            info!(
                "event=user_password_migrate module=repo status=ok migrated={}",
                migrated
            );
        }
        Ok((users, stored.skipped))
    }
}

impl<S: KeyValueStore> UserRepository for StoreRepository<S> {
    fn list_users(&self) -> RepoResult<Vec<User>> {
        let (mut users, skipped) = self.load_users()?;
        if users.is_empty() && skipped > 0 {
            warn!(
                "event=user_seed module=repo status=skipped reason=unreadable_users skipped={}",
                skipped
            );
        } else if users.is_empty() {
            users.push(default_admin()?);
            save_collection(&self.store, USERS_KEY, &users)?;
            info!(
                "event=user_seed module=repo status=ok user_id={}",
                DEFAULT_ADMIN_ID
            );
        }
        Ok(users)
    }

    fn get_user(&self, id: &str) -> RepoResult<Option<User>> {
        Ok(self.list_users()?.into_iter().find(|user| user.id == id))
    }

    fn find_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .list_users()?
            .into_iter()
            .find(|user| user.username == username))
    }

    fn save_user(&self, draft: &UserDraft) -> RepoResult<User> {
        let mut users = self.list_users()?;
        let id = draft
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if users
            .iter()
            .any(|user| user.username == draft.username && user.id != id)
        {
            return Err(ValidationError::DuplicateUsername(draft.username.clone()).into());
        }

        let position = users.iter().position(|user| user.id == id);
        let password_hash = match (draft.supplied_password(), position) {
            (Some(password), _) => hash_password(password)?,
            (None, Some(index)) => users[index].password_hash.clone(),
            (None, None) => return Err(ValidationError::PasswordRequired.into()),
        };

        let user = User {
            id,
            username: draft.username.clone(),
            password_hash,
            display_name: draft.display_name.clone(),
            role: draft.role,
            permissions: draft.permissions.clone(),
        };

        match position {
            Some(index) => users[index] = user.clone(),
            None => users.push(user.clone()),
        }
        save_collection(&self.store, USERS_KEY, &users)?;
        info!(
            "event=user_save module=repo status=ok user_id={} created={} password_changed={}",
            user.id,
            position.is_none(),
            draft.supplied_password().is_some()
        );
        Ok(user)
    }

    fn delete_user(&self, id: &str) -> RepoResult<bool> {
        let mut users = self.list_users()?;
        let before = users.len();
        users.retain(|user| user.id != id);
        if users.len() == before {
            return Ok(false);
        }
        save_collection(&self.store, USERS_KEY, &users)?;
        Ok(true)
    }
}

fn default_admin() -> RepoResult<User> {
    Ok(User {
        id: DEFAULT_ADMIN_ID.to_string(),
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        password_hash: hash_password(DEFAULT_ADMIN_PASSWORD)?,
        display_name: DEFAULT_ADMIN_DISPLAY_NAME.to_string(),
        role: Role::Admin,
        permissions: Permissions::full(),
    })
}

/// Converts a stored record into the canonical shape.
///
/// Returns `true` alongside the user when a plaintext password was hashed.
fn normalize_user(raw: StoredUser) -> Result<(User, bool), RepoError> {
    let (password_hash, migrated) = match (raw.password_hash, raw.password) {
        (Some(hash), _) if !hash.is_empty() => (hash, false),
        (_, Some(plain)) if !plain.is_empty() => (hash_password(&plain)?, true),
        _ => {
            warn!(
                "event=user_load module=repo status=degraded user_id={} reason=no_password",
                raw.id
            );
            (String::new(), false)
        }
    };

    let display_name = if raw.display_name.trim().is_empty() {
        raw.username.clone()
    } else {
        raw.display_name
    };

    let user = User {
        id: raw.id,
        username: raw.username,
        password_hash,
        display_name,
        role: raw.role,
        permissions: raw.permissions.unwrap_or_default(),
    };
    Ok((user, migrated))
}
