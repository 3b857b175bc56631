//! Onboarding step write operations.
//!
//! One operation per screen, each validating its field group, writing it
//! to the profile row scoped by `user_id`, and re-running the gate on the
//! updated row so the caller always navigates off the fresh destination.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, OnboardingError};
use crate::store::ProfileStore;

use super::gate::{Destination, next_destination};
use super::model::{
    AcademicsUpdate, BasicsUpdate, GenderUpdate, HeightUpdate, PhotosUpdate, Profile,
    ProfileUpdate, MIN_PROFILE_PHOTOS,
};

/// Outcome of a successful step write.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// The row after the write.
    pub profile: Profile,
    /// Freshly recomputed destination — strictly later than the step that
    /// was just written, which is what guarantees forward progress.
    pub next: Destination,
}

/// Writes one onboarding field group at a time.
pub struct OnboardingWriter {
    store: Arc<dyn ProfileStore>,
}

impl OnboardingWriter {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Step 1: name and birthday.
    pub async fn submit_basics(
        &self,
        user_id: Uuid,
        full_name: &str,
        birthday: NaiveDate,
    ) -> Result<StepOutcome, Error> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(OnboardingError::MissingField("full_name").into());
        }
        self.write(
            user_id,
            ProfileUpdate::Basics(BasicsUpdate {
                full_name: full_name.to_string(),
                birthday,
            }),
        )
        .await
    }

    /// Step 2: department and graduation year.
    pub async fn submit_academics(
        &self,
        user_id: Uuid,
        department: &str,
        grad_year: i32,
    ) -> Result<StepOutcome, Error> {
        let department = department.trim();
        if department.is_empty() {
            return Err(OnboardingError::MissingField("department").into());
        }
        self.write(
            user_id,
            ProfileUpdate::Academics(AcademicsUpdate {
                department: department.to_string(),
                grad_year,
            }),
        )
        .await
    }

    /// Step 3: gender.
    pub async fn submit_gender(&self, user_id: Uuid, gender: &str) -> Result<StepOutcome, Error> {
        let gender = gender.trim();
        if gender.is_empty() {
            return Err(OnboardingError::MissingField("gender").into());
        }
        self.write(
            user_id,
            ProfileUpdate::Gender(GenderUpdate {
                gender: gender.to_string(),
            }),
        )
        .await
    }

    /// Step 4: height.
    pub async fn submit_height(&self, user_id: Uuid, height_cm: i32) -> Result<StepOutcome, Error> {
        if height_cm <= 0 {
            return Err(OnboardingError::InvalidValue {
                field: "height_cm",
                message: format!("must be positive, got {height_cm}"),
            }
            .into());
        }
        self.write(
            user_id,
            ProfileUpdate::Height(HeightUpdate { height_cm }),
        )
        .await
    }

    /// Step 5: hosted photo URLs (terminal step, minimum of three).
    pub async fn submit_photos(
        &self,
        user_id: Uuid,
        urls: Vec<String>,
    ) -> Result<StepOutcome, Error> {
        if urls.len() < MIN_PROFILE_PHOTOS {
            return Err(OnboardingError::NotEnoughPhotos {
                got: urls.len(),
                min: MIN_PROFILE_PHOTOS,
            }
            .into());
        }
        self.write(
            user_id,
            ProfileUpdate::Photos(PhotosUpdate {
                profile_image_urls: urls,
            }),
        )
        .await
    }

    async fn write(&self, user_id: Uuid, update: ProfileUpdate) -> Result<StepOutcome, Error> {
        let profile = self.store.update_profile(user_id, &update).await?;
        let next = next_destination(Some(&profile));
        info!(user_id = %user_id, next = %next, "Onboarding step written");
        Ok(StepOutcome { profile, next })
    }
}

#[cfg(test)]
mod tests {
    use crate::store::MemoryBackend;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn setup() -> (Arc<MemoryBackend>, OnboardingWriter, Uuid) {
        let backend = Arc::new(MemoryBackend::new());
        let user_id = Uuid::new_v4();
        backend.register("token", user_id);
        let writer = OnboardingWriter::new(Arc::clone(&backend) as Arc<dyn ProfileStore>);
        (backend, writer, user_id)
    }

    #[tokio::test]
    async fn each_write_advances_the_destination() {
        let (_, writer, user_id) = setup();

        let out = writer
            .submit_basics(user_id, "Ana", date("2003-01-01"))
            .await
            .unwrap();
        assert_eq!(out.next, Destination::Step2);

        let out = writer
            .submit_academics(user_id, "CS", 2026)
            .await
            .unwrap();
        assert_eq!(out.next, Destination::Step3);

        let out = writer.submit_gender(user_id, "Woman").await.unwrap();
        assert_eq!(out.next, Destination::Step4);

        let out = writer.submit_height(user_id, 165).await.unwrap();
        assert_eq!(out.next, Destination::Home);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_without_writing() {
        let (backend, writer, user_id) = setup();

        let err = writer
            .submit_basics(user_id, "   ", date("2003-01-01"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::MissingField("full_name"))
        ));

        let profile = backend.fetch_profile(user_id).await.unwrap().unwrap();
        assert!(profile.full_name.is_none());
    }

    #[tokio::test]
    async fn height_must_be_positive() {
        let (_, writer, user_id) = setup();
        let err = writer.submit_height(user_id, 0).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::InvalidValue { field: "height_cm", .. })
        ));
    }

    #[tokio::test]
    async fn photos_require_three_urls() {
        let (_, writer, user_id) = setup();
        let err = writer
            .submit_photos(user_id, vec!["a".into(), "b".into()])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::NotEnoughPhotos { got: 2, min: 3 })
        ));

        let out = writer
            .submit_photos(user_id, vec!["a".into(), "b".into(), "c".into()])
            .await
            .unwrap();
        assert!(out.profile.has_photos());
    }

    #[tokio::test]
    async fn writes_are_scoped_to_the_user() {
        let (backend, writer, user_id) = setup();
        let other = Uuid::new_v4();
        backend.register("other-token", other);

        writer
            .submit_gender(user_id, "Man")
            .await
            .unwrap();

        let untouched = backend.fetch_profile(other).await.unwrap().unwrap();
        assert!(untouched.gender.is_none());
    }
}
