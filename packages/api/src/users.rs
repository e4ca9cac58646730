//! # Directory requests
//!
//! The user directory maps a phone identifier to a display name and an
//! admin flag. The login flow looks a phone up and registers it when it is
//! new; the settings tab renames it. Admin rights are never requested by a
//! member: they come from the `[directory.admins]` config, seeded once at
//! startup with [`Hub::seed_admins`].

use std::collections::BTreeMap;

use chrono::Utc;
use store::{DirectoryEntry, DocumentStore, UserPatch};

use crate::{logged, ApiError, Hub};

impl<S: DocumentStore> Hub<S> {
    pub async fn lookup_user(&self, phone: &str) -> Result<Option<DirectoryEntry>, ApiError> {
        logged("look up user", self.store.get_user(phone).await)
    }

    /// Create the directory entry for a new member. Never an admin.
    pub async fn register_user(&self, phone: &str, name: &str) -> Result<DirectoryEntry, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Incomplete("name"));
        }
        let entry = DirectoryEntry::member(name, Utc::now());
        logged("register user", self.store.set_user(phone, &entry).await)?;
        tracing::info!(%phone, "user registered");
        Ok(entry)
    }

    /// Change the display name, leaving every other field alone.
    pub async fn rename_user(&self, phone: &str, name: &str) -> Result<(), ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Incomplete("name"));
        }
        let patch = UserPatch {
            name: Some(name.to_string()),
            ..UserPatch::default()
        };
        logged("rename user", self.store.merge_user(phone, &patch).await)?;
        tracing::info!(%phone, "user renamed");
        Ok(())
    }

    /// Make sure every configured admin exists and carries the admin flag.
    ///
    /// Existing names are kept. Returns how many entries were written.
    pub async fn seed_admins(&self, admins: &BTreeMap<String, String>) -> Result<usize, ApiError> {
        let mut written = 0;
        for (phone, name) in admins {
            match self.lookup_user(phone).await? {
                Some(entry) if entry.is_admin => continue,
                Some(_) => {
                    let patch = UserPatch {
                        is_admin: Some(true),
                        ..UserPatch::default()
                    };
                    logged("promote admin", self.store.merge_user(phone, &patch).await)?;
                }
                None => {
                    let entry = DirectoryEntry {
                        is_admin: true,
                        ..DirectoryEntry::member(name, Utc::now())
                    };
                    logged("seed admin", self.store.set_user(phone, &entry).await)?;
                }
            }
            written += 1;
        }
        tracing::info!(written, "admins seeded");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use store::MemoryStore;

    #[tokio::test]
    async fn test_register_then_lookup() {
        let hub = Hub::new(MemoryStore::new());
        assert!(hub.lookup_user("111").await.unwrap().is_none());

        let entry = hub.register_user("111", "  Alice ").await.unwrap();
        assert_eq!(entry.name, "Alice");
        assert!(!entry.is_admin);
        assert!(entry.created_at.is_some());

        let found = hub.lookup_user("111").await.unwrap().unwrap();
        assert_eq!(found, entry);
    }

    #[tokio::test]
    async fn test_rename_keeps_admin_flag() {
        let hub = Hub::new(MemoryStore::new());
        hub.store
            .set_user(
                "111",
                &DirectoryEntry {
                    name: "Alice".to_string(),
                    is_admin: true,
                    created_at: None,
                },
            )
            .await
            .unwrap();

        hub.rename_user("111", "Alicia").await.unwrap();
        let entry = hub.lookup_user("111").await.unwrap().unwrap();
        assert_eq!(entry.name, "Alicia");
        assert!(entry.is_admin);
    }

    #[tokio::test]
    async fn test_rename_resolves_everywhere() {
        let hub = Hub::new(MemoryStore::new());
        hub.register_user("111", "Alice").await.unwrap();
        let mut directory = hub.watch_directory().unwrap();
        assert_eq!(directory.next().await.unwrap().display_name("111"), "Alice");

        hub.rename_user("111", "Alicia").await.unwrap();
        assert_eq!(directory.next().await.unwrap().display_name("111"), "Alicia");
    }

    #[tokio::test]
    async fn test_seed_admins_promotes_and_creates() {
        let hub = Hub::new(MemoryStore::new());
        hub.register_user("111", "Alice").await.unwrap();

        let admins: BTreeMap<String, String> = [
            ("111".to_string(), "Ignored".to_string()),
            ("222".to_string(), "Organiser".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(hub.seed_admins(&admins).await.unwrap(), 2);

        let alice = hub.lookup_user("111").await.unwrap().unwrap();
        assert_eq!(alice.name, "Alice");
        assert!(alice.is_admin);
        let organiser = hub.lookup_user("222").await.unwrap().unwrap();
        assert_eq!(organiser.name, "Organiser");
        assert!(organiser.is_admin);

        assert_eq!(hub.seed_admins(&admins).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let hub = Hub::new(MemoryStore::new());
        assert!(matches!(
            hub.register_user("111", "   ").await,
            Err(ApiError::Incomplete("name"))
        ));
        assert!(hub.lookup_user("111").await.unwrap().is_none());
    }
}
