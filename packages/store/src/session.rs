//! # Session record and directory reconciliation
//!
//! [`Session`] is everything the client remembers about who is using it.
//! It is persisted through [`SessionStore`] on every change and rehydrated
//! at startup, falling back to [`Session::default`] when nothing usable is
//! stored.
//!
//! The cached `is_admin` flag is never trusted on its own. [`reconcile`]
//! takes the live directory entry for the session's phone and makes the
//! flag match it, so a revoked (or newly granted) privilege lands within one
//! directory push and without a re-login. Only `is_admin` is ever taken from
//! the directory; the display name stays whatever the user set locally.
//!
//! When the phone has no directory entry at all the flag is left as it is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::local::{KeyValueStore, LocalStorage};
use crate::models::{Directory, DirectoryEntry};

pub const MIN_FONT_SCALE: f32 = 0.8;
pub const MAX_FONT_SCALE: f32 = 1.4;
pub const FONT_SCALE_STEP: f32 = 0.2;
pub const DEFAULT_FONT_SCALE: f32 = 1.2;

/// The locally cached session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    #[serde(default)]
    pub signed_in_at: Option<DateTime<Utc>>,
}

fn default_font_scale() -> f32 {
    DEFAULT_FONT_SCALE
}

impl Default for Session {
    fn default() -> Self {
        Self {
            logged_in: false,
            phone: None,
            name: None,
            is_admin: false,
            font_scale: DEFAULT_FONT_SCALE,
            signed_in_at: None,
        }
    }
}

impl Session {
    /// Session defaults with a configured font scale.
    pub fn with_default_font_scale(font_scale: f32) -> Self {
        Self {
            font_scale: snap_font_scale(font_scale),
            ..Self::default()
        }
    }

    /// Log in as `phone`, taking name and privilege from its directory entry.
    pub fn logged_in_as(&self, phone: &str, entry: &DirectoryEntry, now: DateTime<Utc>) -> Self {
        Self {
            logged_in: true,
            phone: Some(phone.to_string()),
            name: Some(entry.name.clone()),
            is_admin: entry.is_admin,
            signed_in_at: Some(now),
            ..self.clone()
        }
    }

    /// Drop identity and privilege. Name and font preference are kept.
    pub fn logged_out(&self) -> Self {
        Self {
            logged_in: false,
            phone: None,
            is_admin: false,
            signed_in_at: None,
            ..self.clone()
        }
    }

    pub fn renamed(&self, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..self.clone()
        }
    }

    pub fn with_font_scale(&self, font_scale: f32) -> Self {
        Self {
            font_scale: snap_font_scale(font_scale),
            ..self.clone()
        }
    }

    /// The phone of a logged-in session.
    pub fn current_phone(&self) -> Option<&str> {
        if self.logged_in {
            self.phone.as_deref()
        } else {
            None
        }
    }

    /// Create, edit and delete announcements and courses.
    pub fn can_manage_content(&self) -> bool {
        self.logged_in && self.is_admin
    }

    pub fn can_like(&self) -> bool {
        self.current_phone().is_some()
    }

    /// Enroll or cancel for `phone`: the member themselves, or an admin.
    pub fn can_change_enrollment(&self, phone: &str) -> bool {
        self.can_manage_content() || self.current_phone() == Some(phone)
    }
}

/// Clamp into the supported range and snap to the slider step.
pub fn snap_font_scale(font_scale: f32) -> f32 {
    if !font_scale.is_finite() {
        return DEFAULT_FONT_SCALE;
    }
    let clamped = font_scale.clamp(MIN_FONT_SCALE, MAX_FONT_SCALE);
    let steps = ((clamped - MIN_FONT_SCALE) / FONT_SCALE_STEP).round();
    let snapped = MIN_FONT_SCALE + steps * FONT_SCALE_STEP;
    (snapped * 10.0).round() / 10.0
}

/// Make the cached admin flag match the live directory entry.
///
/// Does nothing when logged out or when `entry` is `None`.
pub fn reconcile(session: Session, entry: Option<&DirectoryEntry>) -> Session {
    match entry {
        Some(entry) if session.logged_in && session.is_admin != entry.is_admin => {
            tracing::info!(
                phone = session.phone.as_deref().unwrap_or_default(),
                is_admin = entry.is_admin,
                "admin flag changed remotely"
            );
            Session {
                is_admin: entry.is_admin,
                ..session
            }
        }
        _ => session,
    }
}

/// [`reconcile`] against a whole directory snapshot.
pub fn reconcile_with_directory(session: Session, directory: &Directory) -> Session {
    let entry = session
        .current_phone()
        .and_then(|phone| directory.get(phone))
        .cloned();
    reconcile(session, entry.as_ref())
}

/// Loads and saves the [`Session`] under a fixed key.
#[derive(Clone, Debug)]
pub struct SessionStore<K: KeyValueStore> {
    storage: LocalStorage<K>,
    key: String,
    defaults: Session,
}

impl<K: KeyValueStore> SessionStore<K> {
    pub fn new(kv: K, key: &str) -> Self {
        Self {
            storage: LocalStorage::new(kv),
            key: key.to_string(),
            defaults: Session::default(),
        }
    }

    /// Session returned when nothing usable is stored.
    pub fn with_defaults(mut self, defaults: Session) -> Self {
        self.defaults = defaults;
        self
    }

    /// Rehydrate, silently falling back to defaults on absent or corrupt data.
    pub fn load(&self) -> Session {
        let mut session = self.storage.get_or(&self.key, self.defaults.clone());
        session.font_scale = snap_font_scale(session.font_scale);
        session
    }

    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.storage.set(&self.key, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::KeyValueStore;
    use crate::MemoryKv;
    use chrono::TimeZone;

    fn entry(name: &str, is_admin: bool) -> DirectoryEntry {
        DirectoryEntry {
            name: name.to_string(),
            is_admin,
            created_at: None,
        }
    }

    fn logged_in(phone: &str, is_admin: bool) -> Session {
        Session::default().logged_in_as(phone, &entry("Member", is_admin), Utc::now())
    }

    #[test]
    fn test_reconcile_adopts_live_admin_flag() {
        for (cached, live) in [(false, true), (true, false), (true, true), (false, false)] {
            let session = logged_in("111", cached);
            let mut directory = Directory::new();
            directory.insert("111", entry("Member", live));

            let reconciled = reconcile_with_directory(session, &directory);
            assert_eq!(reconciled.is_admin, live);
        }
    }

    #[test]
    fn test_reconcile_touches_only_admin_flag() {
        let session = logged_in("111", false).renamed("Local name");
        let mut directory = Directory::new();
        directory.insert("111", entry("Remote name", true));

        let reconciled = reconcile_with_directory(session.clone(), &directory);
        assert_eq!(
            reconciled,
            Session {
                is_admin: true,
                ..session
            }
        );
    }

    #[test]
    fn test_reconcile_ignores_missing_entry() {
        let session = logged_in("111", true);
        let reconciled = reconcile_with_directory(session.clone(), &Directory::new());
        assert_eq!(reconciled, session);
    }

    #[test]
    fn test_reconcile_ignores_logged_out_session() {
        let session = Session {
            phone: Some("111".to_string()),
            ..Session::default()
        };
        let reconciled = reconcile(session.clone(), Some(&entry("Member", true)));
        assert!(!reconciled.is_admin);
        assert_eq!(reconciled, session);
    }

    #[test]
    fn test_logout_keeps_name_and_font() {
        let session = logged_in("111", true).with_font_scale(0.8);
        let out = session.logged_out();
        assert!(!out.logged_in);
        assert!(!out.is_admin);
        assert_eq!(out.phone, None);
        assert_eq!(out.signed_in_at, None);
        assert_eq!(out.name.as_deref(), Some("Member"));
        assert_eq!(out.font_scale, 0.8);
    }

    #[test]
    fn test_permissions() {
        let member = logged_in("111", false);
        assert!(member.can_like());
        assert!(!member.can_manage_content());
        assert!(member.can_change_enrollment("111"));
        assert!(!member.can_change_enrollment("222"));

        let admin = logged_in("999", true);
        assert!(admin.can_manage_content());
        assert!(admin.can_change_enrollment("222"));

        let anonymous = Session::default();
        assert!(!anonymous.can_like());
        assert!(!anonymous.can_change_enrollment("111"));
    }

    #[test]
    fn test_font_scale_snaps_to_slider() {
        assert_eq!(snap_font_scale(0.5), 0.8);
        assert_eq!(snap_font_scale(1.05), 1.0);
        assert_eq!(snap_font_scale(1.31), 1.4);
        assert_eq!(snap_font_scale(9.0), 1.4);
        assert_eq!(snap_font_scale(f32::NAN), DEFAULT_FONT_SCALE);
    }

    #[test]
    fn test_session_roundtrip_revives_dates() {
        let store = SessionStore::new(MemoryKv::new(), "hub_session");
        let signed_in_at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();
        let session = Session::default().logged_in_as("111", &entry("Alice", true), signed_in_at);

        store.save(&session).unwrap();
        let loaded = store.load();

        assert_eq!(loaded, session);
        let revived: DateTime<Utc> = loaded.signed_in_at.unwrap();
        assert_eq!(revived, signed_in_at);
    }

    #[test]
    fn test_load_defaults_when_absent_or_corrupt() {
        let kv = MemoryKv::new();
        let defaults = Session::with_default_font_scale(1.0);
        let store = SessionStore::new(kv.clone(), "hub_session").with_defaults(defaults.clone());
        assert_eq!(store.load(), defaults);

        kv.set_raw("hub_session", "][").unwrap();
        assert_eq!(store.load(), defaults);

        kv.set_raw("hub_session", r#"{"logged_in":true,"phone":"111"}"#)
            .unwrap();
        let partial = store.load();
        assert!(partial.logged_in);
        assert_eq!(partial.font_scale, DEFAULT_FONT_SCALE);
    }
}
