//! Course requests.

use store::{Collection, CourseDraft, DocumentStore, MemberField};

use crate::{logged, ApiError, Hub};

fn validate(draft: &CourseDraft) -> Result<(), ApiError> {
    if draft.name.trim().is_empty() {
        return Err(ApiError::Incomplete("name"));
    }
    if draft.description.trim().is_empty() {
        return Err(ApiError::Incomplete("description"));
    }
    Ok(())
}

impl<S: DocumentStore> Hub<S> {
    pub async fn create_course(&self, draft: &CourseDraft) -> Result<String, ApiError> {
        validate(draft)?;
        let id = logged("create course", self.store.insert_course(draft).await)?;
        tracing::info!(%id, name = %draft.name, "course created");
        Ok(id)
    }

    pub async fn update_course(&self, id: &str, draft: &CourseDraft) -> Result<(), ApiError> {
        validate(draft)?;
        logged("update course", self.store.update_course(id, draft).await)?;
        tracing::info!(%id, "course updated");
        Ok(())
    }

    /// Save the course form: update `existing`, or create a new course.
    pub async fn save_course(
        &self,
        existing: Option<&str>,
        draft: &CourseDraft,
    ) -> Result<(), ApiError> {
        match existing {
            Some(id) => self.update_course(id, draft).await,
            None => self.create_course(draft).await.map(|_| ()),
        }
    }

    /// Remove the course together with its enrollment list.
    pub async fn delete_course(&self, id: &str) -> Result<(), ApiError> {
        logged("delete course", self.store.delete(Collection::Courses, id).await)?;
        tracing::info!(%id, "course deleted");
        Ok(())
    }

    pub async fn enroll(&self, course_id: &str, phone: &str) -> Result<(), ApiError> {
        logged(
            "enroll",
            self.store
                .add_member(MemberField::Enrollment, course_id, phone)
                .await,
        )?;
        tracing::info!(course = %course_id, %phone, "enrolled");
        Ok(())
    }

    pub async fn cancel_enrollment(&self, course_id: &str, phone: &str) -> Result<(), ApiError> {
        logged(
            "cancel enrollment",
            self.store
                .remove_member(MemberField::Enrollment, course_id, phone)
                .await,
        )?;
        tracing::info!(course = %course_id, %phone, "enrollment cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use futures::StreamExt;
    use store::{Course, MemoryStore};

    fn draft(name: &str) -> CourseDraft {
        CourseDraft {
            name: name.to_string(),
            description: "Bring water".to_string(),
            scheduled_at: Utc.with_ymd_and_hms(2025, 5, 4, 9, 0, 0).unwrap(),
        }
    }

    async fn latest(hub: &Hub<MemoryStore>) -> Vec<Course> {
        let mut feed = hub.watch_courses().unwrap();
        feed.next().await.unwrap()
    }

    #[tokio::test]
    async fn test_enroll_and_cancel() {
        let hub = Hub::new(MemoryStore::new());
        let id = hub.create_course(&draft("Yoga")).await.unwrap();

        hub.enroll(&id, "111").await.unwrap();
        hub.enroll(&id, "111").await.unwrap();
        hub.enroll(&id, "222").await.unwrap();
        let course = latest(&hub).await.remove(0);
        assert_eq!(course.enrolled.iter().collect::<Vec<_>>(), vec!["111", "222"]);

        hub.cancel_enrollment(&id, "111").await.unwrap();
        hub.cancel_enrollment(&id, "111").await.unwrap();
        let course = latest(&hub).await.remove(0);
        assert_eq!(course.enrolled.iter().collect::<Vec<_>>(), vec!["222"]);
    }

    #[tokio::test]
    async fn test_update_keeps_enrollment() {
        let hub = Hub::new(MemoryStore::new());
        let id = hub.create_course(&draft("Yoga")).await.unwrap();
        hub.enroll(&id, "111").await.unwrap();

        hub.save_course(Some(&id), &draft("Evening yoga"))
            .await
            .unwrap();
        let course = latest(&hub).await.remove(0);
        assert_eq!(course.name, "Evening yoga");
        assert!(course.is_enrolled("111"));
    }

    #[tokio::test]
    async fn test_deleting_course_leaves_no_enrollment_behind() {
        let hub = Hub::new(MemoryStore::new());
        let keep = hub.create_course(&draft("Chess")).await.unwrap();
        let doomed = hub.create_course(&draft("Yoga")).await.unwrap();
        hub.enroll(&doomed, "111").await.unwrap();
        hub.enroll(&doomed, "222").await.unwrap();

        // Two independent views watching the same collection.
        let mut first_view = hub.watch_courses().unwrap();
        let mut second_view = hub.watch_courses().unwrap();
        assert_eq!(first_view.next().await.unwrap().len(), 2);
        assert_eq!(second_view.next().await.unwrap().len(), 2);

        hub.delete_course(&doomed).await.unwrap();

        for view in [&mut first_view, &mut second_view] {
            let snapshot = view.next().await.unwrap();
            assert_eq!(snapshot.len(), 1);
            assert_eq!(snapshot[0].id, keep);
            assert!(snapshot
                .iter()
                .all(|c| !c.is_enrolled("111") && !c.is_enrolled("222")));
        }

        let err = hub.enroll(&doomed, "111").await.unwrap_err();
        assert!(matches!(err, ApiError::Store(_)));
        assert_eq!(latest(&hub).await.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_description_rejected() {
        let hub = Hub::new(MemoryStore::new());
        let err = hub
            .create_course(&CourseDraft {
                description: String::new(),
                ..draft("Yoga")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Incomplete("description")));
    }
}
