//! # Device-backed document store
//!
//! [`DeviceStore`] keeps the three collections on the device so the board
//! survives a reload. Reads and live feeds are served by a [`MemoryStore`]
//! loaded at open time; every accepted write is then saved back through a
//! [`LocalStorage`] layer, one key per collection:
//!
//! | Key | Value |
//! |-----|-------|
//! | `announcements` | `Vec<Announcement>` |
//! | `courses` | `Vec<Course>` |
//! | `users` | `Directory` |
//!
//! A collection that cannot be read back (missing or corrupt) starts empty.
//! A write that the device refuses is reported as a failed request, even
//! though open feeds have already seen it.

use chrono::{DateTime, Utc};

use crate::document::{Collection, DocumentStore, MemberField, Subscription};
use crate::error::StoreError;
use crate::local::{KeyValueStore, LocalStorage};
use crate::memory::MemoryStore;
use crate::models::{
    Announcement, AnnouncementDraft, Course, CourseDraft, Directory, DirectoryEntry, UserPatch,
};

/// DocumentStore that writes every change through to device storage.
#[derive(Clone, Debug)]
pub struct DeviceStore<K: KeyValueStore> {
    memory: MemoryStore,
    storage: LocalStorage<K>,
}

fn storage_key(collection: Collection) -> String {
    collection.to_string()
}

impl<K: KeyValueStore> DeviceStore<K> {
    /// Load whatever the device holds and serve it.
    pub fn open(kv: K) -> Self {
        let storage = LocalStorage::new(kv);
        let announcements: Vec<Announcement> =
            storage.get_or(&storage_key(Collection::Announcements), Vec::new());
        let courses: Vec<Course> = storage.get_or(&storage_key(Collection::Courses), Vec::new());
        let directory: Directory = storage.get_or(&storage_key(Collection::Users), Directory::new());
        tracing::info!(
            announcements = announcements.len(),
            courses = courses.len(),
            users = directory.len(),
            "opened device store"
        );

        Self {
            memory: MemoryStore::with_documents(announcements, courses, directory),
            storage,
        }
    }

    fn save(&self, collection: Collection) -> Result<(), StoreError> {
        let key = storage_key(collection);
        let saved = match collection {
            Collection::Announcements => self.storage.set(&key, &self.memory.announcements()?),
            Collection::Courses => self.storage.set(&key, &self.memory.courses()?),
            Collection::Users => self.storage.set(&key, &self.memory.directory()?),
        };
        if let Err(e) = &saved {
            tracing::warn!("Could not save {collection}: {e}");
        }
        saved
    }
}

impl<K: KeyValueStore> DocumentStore for DeviceStore<K> {
    fn watch_announcements(&self) -> Result<Subscription<Vec<Announcement>>, StoreError> {
        self.memory.watch_announcements()
    }

    fn watch_courses(&self) -> Result<Subscription<Vec<Course>>, StoreError> {
        self.memory.watch_courses()
    }

    fn watch_directory(&self) -> Result<Subscription<Directory>, StoreError> {
        self.memory.watch_directory()
    }

    async fn insert_announcement(
        &self,
        draft: &AnnouncementDraft,
        published_at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let id = self.memory.insert_announcement(draft, published_at).await?;
        self.save(Collection::Announcements)?;
        Ok(id)
    }

    async fn update_announcement(
        &self,
        id: &str,
        draft: &AnnouncementDraft,
    ) -> Result<(), StoreError> {
        self.memory.update_announcement(id, draft).await?;
        self.save(Collection::Announcements)
    }

    async fn insert_course(&self, draft: &CourseDraft) -> Result<String, StoreError> {
        let id = self.memory.insert_course(draft).await?;
        self.save(Collection::Courses)?;
        Ok(id)
    }

    async fn update_course(&self, id: &str, draft: &CourseDraft) -> Result<(), StoreError> {
        self.memory.update_course(id, draft).await?;
        self.save(Collection::Courses)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.memory.delete(collection, id).await?;
        self.save(collection)
    }

    async fn add_member(&self, field: MemberField, id: &str, phone: &str) -> Result<(), StoreError> {
        self.memory.add_member(field, id, phone).await?;
        self.save(field.collection())
    }

    async fn remove_member(
        &self,
        field: MemberField,
        id: &str,
        phone: &str,
    ) -> Result<(), StoreError> {
        self.memory.remove_member(field, id, phone).await?;
        self.save(field.collection())
    }

    async fn get_user(&self, phone: &str) -> Result<Option<DirectoryEntry>, StoreError> {
        self.memory.get_user(phone).await
    }

    async fn set_user(&self, phone: &str, entry: &DirectoryEntry) -> Result<(), StoreError> {
        self.memory.set_user(phone, entry).await?;
        self.save(Collection::Users)
    }

    async fn merge_user(&self, phone: &str, patch: &UserPatch) -> Result<(), StoreError> {
        self.memory.merge_user(phone, patch).await?;
        self.save(Collection::Users)
    }
}
