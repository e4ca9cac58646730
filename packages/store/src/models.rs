//! # Domain models for announcements, courses and the user directory
//!
//! Defines the records delivered by [`crate::DocumentStore`] feeds and the
//! drafts the editing forms hand to the dispatcher. Everything here is
//! `Serialize + Deserialize` so the same types can travel through a remote
//! store adapter or sit in local storage unchanged.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Announcement`] | A published notice with an optional inline image and the set of phones that liked it. |
//! | [`Course`] | A scheduled session and the set of phones enrolled in it. |
//! | [`DirectoryEntry`] | Display name and privilege for one phone identifier. |
//! | [`Directory`] | The full `phone → entry` map pushed by the directory feed. |
//! | [`MemberSet`] | Ordered, duplicate-free list of phone identifiers. Union-add / difference-remove only. |
//! | [`AnnouncementDraft`] / [`CourseDraft`] | Form contents awaiting create or update. |
//!
//! Phone identifiers are plain strings. Display names are always resolved
//! through [`Directory::display_name`], never copied into the referencing
//! record, so a rename shows up everywhere on the next directory push.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered set of phone identifiers.
///
/// Insertion order is kept for display (first to enroll is listed first).
/// Adding a present member or removing an absent one changes nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberSet(Vec<String>);

impl MemberSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, phone: &str) -> bool {
        self.0.iter().any(|p| p == phone)
    }

    /// Set union with a single member. Returns `true` if it was added.
    pub fn insert(&mut self, phone: &str) -> bool {
        if self.contains(phone) {
            return false;
        }
        self.0.push(phone.to_string());
        true
    }

    /// Set difference with a single member. Returns `true` if it was removed.
    pub fn remove(&mut self, phone: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|p| p != phone);
        self.0.len() != before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for MemberSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = MemberSet::new();
        for phone in iter {
            set.insert(&phone.into());
        }
        set
    }
}

/// A notice shown on the announcements tab.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Inline `data:` URL produced by the image downscaler.
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub liked_by: MemberSet,
}

impl Announcement {
    pub fn is_liked_by(&self, phone: &str) -> bool {
        self.liked_by.contains(phone)
    }
}

/// A course members can enroll in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    pub enrolled: MemberSet,
}

impl Course {
    pub fn is_enrolled(&self, phone: &str) -> bool {
        self.enrolled.contains(phone)
    }
}

/// The authoritative name and privilege for one phone identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl DirectoryEntry {
    /// A freshly registered, non-admin member.
    pub fn member(name: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            is_admin: false,
            created_at: Some(created_at),
        }
    }
}

/// Partial directory write, merged field by field into an existing entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub is_admin: Option<bool>,
}

/// Snapshot of the whole user directory keyed by phone identifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Directory(BTreeMap<String, DirectoryEntry>);

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, phone: &str) -> Option<&DirectoryEntry> {
        self.0.get(phone)
    }

    pub fn insert(&mut self, phone: &str, entry: DirectoryEntry) {
        self.0.insert(phone.to_string(), entry);
    }

    /// Resolve a phone to its display name, falling back to the phone itself.
    pub fn display_name<'a>(&'a self, phone: &'a str) -> &'a str {
        match self.0.get(phone) {
            Some(entry) if !entry.name.is_empty() => &entry.name,
            _ => phone,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DirectoryEntry)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, DirectoryEntry)> for Directory {
    fn from_iter<I: IntoIterator<Item = (String, DirectoryEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Contents of the announcement form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnouncementDraft {
    pub title: String,
    pub body: String,
    pub image: Option<String>,
}

impl AnnouncementDraft {
    /// Prefill the form from an existing announcement.
    pub fn from_announcement(announcement: &Announcement) -> Self {
        Self {
            title: announcement.title.clone(),
            body: announcement.body.clone(),
            image: announcement.image.clone(),
        }
    }

    /// Title and body are both required.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.body.trim().is_empty()
    }
}

/// Contents of the course form.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseDraft {
    pub name: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
}

impl CourseDraft {
    pub fn from_course(course: &Course) -> Self {
        Self {
            name: course.name.clone(),
            description: course.description.clone(),
            scheduled_at: course.scheduled_at,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.description.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_set_is_idempotent() {
        let mut set = MemberSet::new();
        assert!(set.insert("91234567"));
        assert!(!set.insert("91234567"));
        assert_eq!(set.len(), 1);

        assert!(set.remove("91234567"));
        assert!(!set.remove("91234567"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_member_set_keeps_insertion_order() {
        let set: MemberSet = ["3", "1", "2", "1"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_member_set_serializes_as_array() {
        let set: MemberSet = ["a", "b"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn test_display_name_falls_back_to_phone() {
        let mut directory = Directory::new();
        directory.insert("111", DirectoryEntry::member("Alice", Utc::now()));
        directory.insert(
            "222",
            DirectoryEntry {
                name: String::new(),
                is_admin: false,
                created_at: None,
            },
        );

        assert_eq!(directory.display_name("111"), "Alice");
        assert_eq!(directory.display_name("222"), "222");
        assert_eq!(directory.display_name("333"), "333");
    }

    #[test]
    fn test_drafts_require_text() {
        let mut draft = AnnouncementDraft {
            title: "Open day".to_string(),
            body: "   ".to_string(),
            image: None,
        };
        assert!(!draft.is_complete());
        draft.body = "Saturday 10am".to_string();
        assert!(draft.is_complete());

        let course = CourseDraft {
            name: "Tai chi".to_string(),
            description: String::new(),
            scheduled_at: Utc::now(),
        };
        assert!(!course.is_complete());
    }
}
