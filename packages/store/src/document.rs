//! # Document store: the boundary to the real-time database
//!
//! Everything the hub persists remotely goes through the [`DocumentStore`]
//! trait. It mirrors what a managed real-time document database offers:
//!
//! | Group | Methods | Semantics |
//! |-------|---------|-----------|
//! | Live queries | [`watch_announcements`](DocumentStore::watch_announcements), [`watch_courses`](DocumentStore::watch_courses), [`watch_directory`](DocumentStore::watch_directory) | Each returns a [`Subscription`] that yields the full, sorted result set immediately and again after every change. |
//! | Documents | `insert_*`, `update_*`, [`delete`](DocumentStore::delete) | Inserts assign the id; updates overwrite the edited fields and fail on a missing document; deletes of a missing document succeed. |
//! | Membership | [`add_member`](DocumentStore::add_member), [`remove_member`](DocumentStore::remove_member) | Union-add / difference-remove on a [`MemberField`]. Never counters. |
//! | Directory | [`get_user`](DocumentStore::get_user), [`set_user`](DocumentStore::set_user), [`merge_user`](DocumentStore::merge_user) | Point lookup, overwrite, and merge-upsert keyed by phone. |
//!
//! Sort orders are part of the contract: announcements newest first, courses
//! soonest first. The three feeds are independent; nothing orders a
//! directory push relative to an announcement push.
//!
//! Writes are last-write-wins. A store never reports partial success.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use chrono::{DateTime, Utc};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};

use crate::error::StoreError;
use crate::models::{
    Announcement, AnnouncementDraft, Course, CourseDraft, Directory, DirectoryEntry, UserPatch,
};

/// The three remote collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Announcements,
    Courses,
    Users,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collection::Announcements => "announcements",
            Collection::Courses => "courses",
            Collection::Users => "users",
        };
        f.write_str(name)
    }
}

/// Membership fields that support set union / difference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberField {
    /// `Announcement::liked_by`
    Likes,
    /// `Course::enrolled`
    Enrollment,
}

impl MemberField {
    pub fn collection(self) -> Collection {
        match self {
            MemberField::Likes => Collection::Announcements,
            MemberField::Enrollment => Collection::Courses,
        }
    }
}

/// A live query: an endless stream of full snapshots.
///
/// Dropping the subscription or calling [`unsubscribe`](Self::unsubscribe)
/// detaches it; the store prunes it on its next publish. Calling the
/// matching `watch_*` again starts a fresh feed from the current state.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: UnboundedReceiver<T>,
}

/// Producer half handed to a store implementation.
#[derive(Debug)]
pub struct SnapshotSender<T> {
    sender: UnboundedSender<T>,
}

impl<T> Subscription<T> {
    /// Create a connected sender/subscription pair.
    pub fn channel() -> (SnapshotSender<T>, Self) {
        let (sender, receiver) = mpsc::unbounded();
        (SnapshotSender { sender }, Self { receiver })
    }

    /// Stop receiving snapshots. Anything already queued is discarded.
    pub fn unsubscribe(mut self) {
        self.receiver.close();
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.receiver.poll_next_unpin(cx)
    }
}

impl<T> SnapshotSender<T> {
    /// Push a snapshot. Returns `false` once the subscriber has gone away.
    pub fn send(&self, snapshot: T) -> bool {
        self.sender.unbounded_send(snapshot).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Async interface to the real-time document database.
pub trait DocumentStore {
    fn watch_announcements(&self) -> Result<Subscription<Vec<Announcement>>, StoreError>;

    fn watch_courses(&self) -> Result<Subscription<Vec<Course>>, StoreError>;

    fn watch_directory(&self) -> Result<Subscription<Directory>, StoreError>;

    /// Add an announcement with an empty like set. Returns the new id.
    fn insert_announcement(
        &self,
        draft: &AnnouncementDraft,
        published_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<String, StoreError>>;

    /// Overwrite title, body and image. Likes and publish time are kept.
    fn update_announcement(
        &self,
        id: &str,
        draft: &AnnouncementDraft,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;

    /// Add a course with nobody enrolled. Returns the new id.
    fn insert_course(
        &self,
        draft: &CourseDraft,
    ) -> impl std::future::Future<Output = Result<String, StoreError>>;

    /// Overwrite name, description and schedule. Enrollment is kept.
    fn update_course(
        &self,
        id: &str,
        draft: &CourseDraft,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;

    fn delete(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;

    fn add_member(
        &self,
        field: MemberField,
        id: &str,
        phone: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;

    fn remove_member(
        &self,
        field: MemberField,
        id: &str,
        phone: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;

    fn get_user(
        &self,
        phone: &str,
    ) -> impl std::future::Future<Output = Result<Option<DirectoryEntry>, StoreError>>;

    /// Replace the directory entry for `phone`.
    fn set_user(
        &self,
        phone: &str,
        entry: &DirectoryEntry,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;

    /// Merge the present fields of `patch` into the entry, creating it if needed.
    fn merge_user(
        &self,
        phone: &str,
        patch: &UserPatch,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsubscribe_closes_sender() {
        let (sender, subscription) = Subscription::<u32>::channel();
        assert!(sender.send(1));
        subscription.unsubscribe();
        assert!(sender.is_closed());
        assert!(!sender.send(2));
    }

    #[tokio::test]
    async fn test_subscription_yields_in_order() {
        let (sender, mut subscription) = Subscription::channel();
        sender.send("first");
        sender.send("second");
        assert_eq!(subscription.next().await, Some("first"));
        assert_eq!(subscription.next().await, Some("second"));
        drop(sender);
        assert_eq!(subscription.next().await, None);
    }

    #[test]
    fn test_member_field_collection() {
        assert_eq!(MemberField::Likes.collection(), Collection::Announcements);
        assert_eq!(MemberField::Enrollment.collection(), Collection::Courses);
        assert_eq!(Collection::Users.to_string(), "users");
    }
}
