//! Announcement requests.

use chrono::Utc;
use store::{Announcement, AnnouncementDraft, Collection, DocumentStore, MemberField};

use crate::{logged, ApiError, Hub};

fn validate(draft: &AnnouncementDraft) -> Result<(), ApiError> {
    if draft.title.trim().is_empty() {
        return Err(ApiError::Incomplete("title"));
    }
    if draft.body.trim().is_empty() {
        return Err(ApiError::Incomplete("body"));
    }
    Ok(())
}

impl<S: DocumentStore> Hub<S> {
    /// Publish a new announcement stamped with the current time.
    pub async fn publish_announcement(&self, draft: &AnnouncementDraft) -> Result<String, ApiError> {
        validate(draft)?;
        let id = logged(
            "publish announcement",
            self.store.insert_announcement(draft, Utc::now()).await,
        )?;
        tracing::info!(%id, title = %draft.title, "announcement published");
        Ok(id)
    }

    pub async fn update_announcement(
        &self,
        id: &str,
        draft: &AnnouncementDraft,
    ) -> Result<(), ApiError> {
        validate(draft)?;
        logged(
            "update announcement",
            self.store.update_announcement(id, draft).await,
        )?;
        tracing::info!(%id, "announcement updated");
        Ok(())
    }

    /// Save the announcement form: update `existing`, or publish a new one.
    pub async fn save_announcement(
        &self,
        existing: Option<&str>,
        draft: &AnnouncementDraft,
    ) -> Result<(), ApiError> {
        match existing {
            Some(id) => self.update_announcement(id, draft).await,
            None => self.publish_announcement(draft).await.map(|_| ()),
        }
    }

    pub async fn delete_announcement(&self, id: &str) -> Result<(), ApiError> {
        logged(
            "delete announcement",
            self.store.delete(Collection::Announcements, id).await,
        )?;
        tracing::info!(%id, "announcement deleted");
        Ok(())
    }

    /// Like if `phone` has not liked `announcement` yet, otherwise unlike.
    ///
    /// Decided from the snapshot the user is looking at. Returns whether the
    /// announcement is now liked.
    pub async fn toggle_like(
        &self,
        announcement: &Announcement,
        phone: &str,
    ) -> Result<bool, ApiError> {
        let id = announcement.id.as_str();
        if announcement.is_liked_by(phone) {
            logged(
                "unlike announcement",
                self.store.remove_member(MemberField::Likes, id, phone).await,
            )?;
            tracing::debug!(%id, %phone, "announcement unliked");
            Ok(false)
        } else {
            logged(
                "like announcement",
                self.store.add_member(MemberField::Likes, id, phone).await,
            )?;
            tracing::debug!(%id, %phone, "announcement liked");
            Ok(true)
        }
    }
}
