//! Append-only notification feed.
//!
//! # Invariants
//! - The feed is ordered newest first.
//! - Entries are never edited except for `is_read`; only `clear` removes.

use crate::clock::Clock;
use crate::model::notification::{Notification, NotificationKind};
use crate::store::collection::{load_collection, save_collection};
use crate::store::{KeyValueStore, StoreResult, NOTIFICATIONS_KEY};
use log::info;
use uuid::Uuid;

/// Notification feed persisted under its own store key.
pub struct NotificationLog<S, C> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> NotificationLog<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Entries, newest first.
    pub fn list(&self) -> StoreResult<Vec<Notification>> {
        load_collection(&self.store, NOTIFICATIONS_KEY)
    }

    pub fn unread_count(&self) -> StoreResult<usize> {
        Ok(self
            .list()?
            .iter()
            .filter(|notification| !notification.is_read)
            .count())
    }

    /// Prepends an unread entry stamped with the current time.
    pub fn add(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> StoreResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            kind,
            is_read: false,
            timestamp: self.clock.now_millis(),
        };

        let mut feed = self.list()?;
        feed.insert(0, notification.clone());
        save_collection(&self.store, NOTIFICATIONS_KEY, &feed)?;
        info!(
            "event=notification_add module=service status=ok id={} kind={:?}",
            notification.id, notification.kind
        );
        Ok(notification)
    }

    /// Returns `false` when no entry has this id.
    pub fn mark_as_read(&self, id: &str) -> StoreResult<bool> {
        let mut feed = self.list()?;
        let Some(entry) = feed.iter_mut().find(|notification| notification.id == id) else {
            return Ok(false);
        };
        entry.is_read = true;
        save_collection(&self.store, NOTIFICATIONS_KEY, &feed)?;
        Ok(true)
    }

    /// Marks every entry read and returns how many changed.
    pub fn mark_all_as_read(&self) -> StoreResult<usize> {
        let mut feed = self.list()?;
        let mut changed = 0;
        for entry in feed.iter_mut().filter(|notification| !notification.is_read) {
            entry.is_read = true;
            changed += 1;
        }
        if changed > 0 {
            save_collection(&self.store, NOTIFICATIONS_KEY, &feed)?;
        }
        Ok(changed)
    }

    /// Empties the feed.
    pub fn clear(&self) -> StoreResult<()> {
        save_collection::<Notification, _>(&self.store, NOTIFICATIONS_KEY, &[])?;
        info!("event=notification_clear module=service status=ok");
        Ok(())
    }
}
