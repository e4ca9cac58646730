use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::document::{Collection, DocumentStore, MemberField, SnapshotSender, Subscription};
use crate::error::StoreError;
use crate::local::KeyValueStore;
use crate::models::{
    Announcement, AnnouncementDraft, Course, CourseDraft, Directory, DirectoryEntry, MemberSet,
    UserPatch,
};

/// In-process DocumentStore with live snapshot feeds.
///
/// The working set behind [`crate::DeviceStore`], and the store tests run
/// against. Clones share the same data, so every handle sees every write.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    announcements: HashMap<String, Announcement>,
    courses: HashMap<String, Course>,
    users: BTreeMap<String, DirectoryEntry>,
    announcement_watchers: Vec<SnapshotSender<Vec<Announcement>>>,
    course_watchers: Vec<SnapshotSender<Vec<Course>>>,
    directory_watchers: Vec<SnapshotSender<Directory>>,
}

impl Inner {
    fn announcements_snapshot(&self) -> Vec<Announcement> {
        let mut all: Vec<Announcement> = self.announcements.values().cloned().collect();
        all.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        all
    }

    fn courses_snapshot(&self) -> Vec<Course> {
        let mut all: Vec<Course> = self.courses.values().cloned().collect();
        all.sort_by(|a, b| {
            a.scheduled_at
                .cmp(&b.scheduled_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        all
    }

    fn directory_snapshot(&self) -> Directory {
        self.users
            .iter()
            .map(|(phone, entry)| (phone.clone(), entry.clone()))
            .collect()
    }

    /// Push the current state of `collection` to every live watcher,
    /// dropping the ones that unsubscribed.
    fn publish(&mut self, collection: Collection) {
        match collection {
            Collection::Announcements => {
                let snapshot = self.announcements_snapshot();
                self.announcement_watchers
                    .retain(|w| w.send(snapshot.clone()));
                tracing::debug!(
                    watchers = self.announcement_watchers.len(),
                    "published announcements snapshot"
                );
            }
            Collection::Courses => {
                let snapshot = self.courses_snapshot();
                self.course_watchers.retain(|w| w.send(snapshot.clone()));
                tracing::debug!(
                    watchers = self.course_watchers.len(),
                    "published courses snapshot"
                );
            }
            Collection::Users => {
                let snapshot = self.directory_snapshot();
                self.directory_watchers.retain(|w| w.send(snapshot.clone()));
                tracing::debug!(
                    watchers = self.directory_watchers.len(),
                    "published directory snapshot"
                );
            }
        }
    }

    fn members_mut(
        &mut self,
        field: MemberField,
        id: &str,
    ) -> Result<&mut MemberSet, StoreError> {
        let found = match field {
            MemberField::Likes => self.announcements.get_mut(id).map(|a| &mut a.liked_by),
            MemberField::Enrollment => self.courses.get_mut(id).map(|c| &mut c.enrolled),
        };
        found.ok_or_else(|| StoreError::NotFound {
            collection: field.collection(),
            id: id.to_string(),
        })
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously saved documents. Ids are taken from the documents.
    pub fn with_documents(
        announcements: Vec<Announcement>,
        courses: Vec<Course>,
        directory: Directory,
    ) -> Self {
        let inner = Inner {
            announcements: announcements
                .into_iter()
                .map(|a| (a.id.clone(), a))
                .collect(),
            courses: courses.into_iter().map(|c| (c.id.clone(), c)).collect(),
            users: directory
                .iter()
                .map(|(phone, entry)| (phone.to_string(), entry.clone()))
                .collect(),
            ..Inner::default()
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    pub fn announcements(&self) -> Result<Vec<Announcement>, StoreError> {
        Ok(self.lock()?.announcements_snapshot())
    }

    pub fn courses(&self) -> Result<Vec<Course>, StoreError> {
        Ok(self.lock()?.courses_snapshot())
    }

    pub fn directory(&self) -> Result<Directory, StoreError> {
        Ok(self.lock()?.directory_snapshot())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl DocumentStore for MemoryStore {
    fn watch_announcements(&self) -> Result<Subscription<Vec<Announcement>>, StoreError> {
        let mut inner = self.lock()?;
        let (sender, subscription) = Subscription::channel();
        sender.send(inner.announcements_snapshot());
        inner.announcement_watchers.push(sender);
        Ok(subscription)
    }

    fn watch_courses(&self) -> Result<Subscription<Vec<Course>>, StoreError> {
        let mut inner = self.lock()?;
        let (sender, subscription) = Subscription::channel();
        sender.send(inner.courses_snapshot());
        inner.course_watchers.push(sender);
        Ok(subscription)
    }

    fn watch_directory(&self) -> Result<Subscription<Directory>, StoreError> {
        let mut inner = self.lock()?;
        let (sender, subscription) = Subscription::channel();
        sender.send(inner.directory_snapshot());
        inner.directory_watchers.push(sender);
        Ok(subscription)
    }

    async fn insert_announcement(
        &self,
        draft: &AnnouncementDraft,
        published_at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let mut inner = self.lock()?;
        let id = new_id();
        inner.announcements.insert(
            id.clone(),
            Announcement {
                id: id.clone(),
                title: draft.title.clone(),
                body: draft.body.clone(),
                image: draft.image.clone(),
                published_at,
                liked_by: MemberSet::new(),
            },
        );
        inner.publish(Collection::Announcements);
        Ok(id)
    }

    async fn update_announcement(
        &self,
        id: &str,
        draft: &AnnouncementDraft,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let announcement =
            inner
                .announcements
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound {
                    collection: Collection::Announcements,
                    id: id.to_string(),
                })?;
        announcement.title = draft.title.clone();
        announcement.body = draft.body.clone();
        announcement.image = draft.image.clone();
        inner.publish(Collection::Announcements);
        Ok(())
    }

    async fn insert_course(&self, draft: &CourseDraft) -> Result<String, StoreError> {
        let mut inner = self.lock()?;
        let id = new_id();
        inner.courses.insert(
            id.clone(),
            Course {
                id: id.clone(),
                name: draft.name.clone(),
                description: draft.description.clone(),
                scheduled_at: draft.scheduled_at,
                enrolled: MemberSet::new(),
            },
        );
        inner.publish(Collection::Courses);
        Ok(id)
    }

    async fn update_course(&self, id: &str, draft: &CourseDraft) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let course = inner
            .courses
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound {
                collection: Collection::Courses,
                id: id.to_string(),
            })?;
        course.name = draft.name.clone();
        course.description = draft.description.clone();
        course.scheduled_at = draft.scheduled_at;
        inner.publish(Collection::Courses);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let removed = match collection {
            Collection::Announcements => inner.announcements.remove(id).is_some(),
            Collection::Courses => inner.courses.remove(id).is_some(),
            Collection::Users => inner.users.remove(id).is_some(),
        };
        if removed {
            inner.publish(collection);
        }
        Ok(())
    }

    async fn add_member(&self, field: MemberField, id: &str, phone: &str) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.members_mut(field, id)?.insert(phone) {
            inner.publish(field.collection());
        }
        Ok(())
    }

    async fn remove_member(
        &self,
        field: MemberField,
        id: &str,
        phone: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.members_mut(field, id)?.remove(phone) {
            inner.publish(field.collection());
        }
        Ok(())
    }

    async fn get_user(&self, phone: &str) -> Result<Option<DirectoryEntry>, StoreError> {
        Ok(self.lock()?.users.get(phone).cloned())
    }

    async fn set_user(&self, phone: &str, entry: &DirectoryEntry) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.users.insert(phone.to_string(), entry.clone());
        inner.publish(Collection::Users);
        Ok(())
    }

    async fn merge_user(&self, phone: &str, patch: &UserPatch) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let entry = inner
            .users
            .entry(phone.to_string())
            .or_insert_with(|| DirectoryEntry {
                name: String::new(),
                is_admin: false,
                created_at: None,
            });
        if let Some(name) = &patch.name {
            entry.name = name.clone();
        }
        if let Some(is_admin) = patch.is_admin {
            entry.is_admin = is_admin;
        }
        inner.publish(Collection::Users);
        Ok(())
    }
}

/// In-memory KeyValueStore for tests and hosts without device storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryKv {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory kv lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory kv lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory kv lock poisoned".to_string()))?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use futures::StreamExt;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    fn draft(title: &str) -> AnnouncementDraft {
        AnnouncementDraft {
            title: title.to_string(),
            body: format!("{title} body"),
            image: None,
        }
    }

    fn course(name: &str, scheduled_at: DateTime<Utc>) -> CourseDraft {
        CourseDraft {
            name: name.to_string(),
            description: format!("{name} description"),
            scheduled_at,
        }
    }

    #[tokio::test]
    async fn test_watch_delivers_current_snapshot_first() {
        let store = MemoryStore::new();
        store.insert_announcement(&draft("hello"), at(9)).await.unwrap();

        let mut feed = store.watch_announcements().unwrap();
        let first = feed.next().await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].title, "hello");
        assert!(first[0].liked_by.is_empty());
    }

    #[tokio::test]
    async fn test_announcements_newest_first() {
        let store = MemoryStore::new();
        store.insert_announcement(&draft("old"), at(8)).await.unwrap();
        store.insert_announcement(&draft("new"), at(10)).await.unwrap();
        store.insert_announcement(&draft("mid"), at(9)).await.unwrap();

        let mut feed = store.watch_announcements().unwrap();
        let titles: Vec<String> = feed
            .next()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_courses_soonest_first() {
        let store = MemoryStore::new();
        let later = at(12);
        store.insert_course(&course("later", later)).await.unwrap();
        store
            .insert_course(&course("sooner", later - Duration::days(1)))
            .await
            .unwrap();

        let mut feed = store.watch_courses().unwrap();
        let names: Vec<String> = feed
            .next()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["sooner", "later"]);
    }

    #[tokio::test]
    async fn test_every_write_pushes_full_snapshot() {
        let store = MemoryStore::new();
        let mut feed = store.watch_courses().unwrap();
        assert!(feed.next().await.unwrap().is_empty());

        let id = store.insert_course(&course("yoga", at(9))).await.unwrap();
        assert_eq!(feed.next().await.unwrap().len(), 1);

        store
            .add_member(MemberField::Enrollment, &id, "111")
            .await
            .unwrap();
        let snapshot = feed.next().await.unwrap();
        assert!(snapshot[0].is_enrolled("111"));
    }

    #[tokio::test]
    async fn test_update_keeps_likes_and_publish_time() {
        let store = MemoryStore::new();
        let id = store.insert_announcement(&draft("draft"), at(9)).await.unwrap();
        store.add_member(MemberField::Likes, &id, "111").await.unwrap();

        let edited = AnnouncementDraft {
            title: "final".to_string(),
            body: "final body".to_string(),
            image: Some("data:image/jpeg;base64,AAAA".to_string()),
        };
        store.update_announcement(&id, &edited).await.unwrap();

        let mut feed = store.watch_announcements().unwrap();
        let snapshot = feed.next().await.unwrap();
        assert_eq!(snapshot[0].title, "final");
        assert_eq!(snapshot[0].published_at, at(9));
        assert!(snapshot[0].is_liked_by("111"));
        assert!(snapshot[0].image.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store
            .update_course("nope", &course("x", at(9)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                collection: Collection::Courses,
                ..
            }
        ));

        let err = store
            .add_member(MemberField::Likes, "nope", "111")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_document_is_ok() {
        let store = MemoryStore::new();
        store.delete(Collection::Announcements, "nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_watchers_are_pruned() {
        let store = MemoryStore::new();
        let feed = store.watch_directory().unwrap();
        let kept = store.watch_directory().unwrap();
        feed.unsubscribe();

        store
            .set_user("111", &DirectoryEntry::member("Alice", at(9)))
            .await
            .unwrap();
        assert_eq!(store.inner.lock().unwrap().directory_watchers.len(), 1);
        drop(kept);

        store
            .merge_user(
                "111",
                &UserPatch {
                    name: Some("Alicia".to_string()),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap();
        assert!(store.inner.lock().unwrap().directory_watchers.is_empty());
    }

    #[tokio::test]
    async fn test_merge_user_keeps_unpatched_fields() {
        let store = MemoryStore::new();
        store
            .set_user(
                "111",
                &DirectoryEntry {
                    name: "Alice".to_string(),
                    is_admin: true,
                    created_at: Some(at(9)),
                },
            )
            .await
            .unwrap();
        store
            .merge_user(
                "111",
                &UserPatch {
                    name: Some("Alicia".to_string()),
                    is_admin: None,
                },
            )
            .await
            .unwrap();

        let entry = store.get_user("111").await.unwrap().unwrap();
        assert_eq!(entry.name, "Alicia");
        assert!(entry.is_admin);
        assert_eq!(entry.created_at, Some(at(9)));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store
            .set_user("111", &DirectoryEntry::member("Alice", at(9)))
            .await
            .unwrap();
        assert!(other.get_user("111").await.unwrap().is_some());
    }

    #[test]
    fn test_memory_kv_roundtrip() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get_raw("k").unwrap(), None);
        kv.set_raw("k", "v").unwrap();
        assert_eq!(kv.get_raw("k").unwrap().as_deref(), Some("v"));
        kv.remove("k").unwrap();
        assert_eq!(kv.get_raw("k").unwrap(), None);
    }
}
