//! Profile data model and per-step update payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum number of profile photos once the photo step is submitted.
pub const MIN_PROFILE_PHOTOS: usize = 3;

/// One row per user in the `profiles` table.
///
/// The row is created alongside the identity record with every optional
/// field empty; the onboarding steps fill it in one field group at a time,
/// always scoped by `user_id` equality. It is destroyed only by the
/// account deletion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Foreign reference to the identity record.
    pub user_id: Uuid,
    /// Step 1: display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Step 1: date of birth.
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    /// Step 2: academic department.
    #[serde(default)]
    pub department: Option<String>,
    /// Step 2: graduation year.
    #[serde(default)]
    pub grad_year: Option<i32>,
    /// Step 3: gender.
    #[serde(default)]
    pub gender: Option<String>,
    /// Step 4: height in centimeters.
    #[serde(default)]
    pub height_cm: Option<i32>,
    /// Step 5: hosted photo URLs, in display order.
    #[serde(default)]
    pub profile_image_urls: Option<Vec<String>>,
}

impl Profile {
    /// An empty profile for a freshly created identity.
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            full_name: None,
            birthday: None,
            department: None,
            grad_year: None,
            gender: None,
            height_cm: None,
            profile_image_urls: None,
        }
    }

    /// Step 1 complete: non-empty name and a birthday.
    pub fn has_basics(&self) -> bool {
        self.full_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
            && self.birthday.is_some()
    }

    /// Step 2 complete: department and graduation year.
    pub fn has_academics(&self) -> bool {
        self.department.is_some() && self.grad_year.is_some()
    }

    /// Step 3 complete.
    pub fn has_gender(&self) -> bool {
        self.gender.is_some()
    }

    /// Step 4 complete.
    pub fn has_height(&self) -> bool {
        self.height_cm.is_some()
    }

    /// Step 5 photos present. Informational only — never gates routing.
    pub fn has_photos(&self) -> bool {
        self.profile_image_urls
            .as_ref()
            .is_some_and(|urls| urls.len() >= MIN_PROFILE_PHOTOS)
    }

    /// Apply an update payload to this snapshot.
    ///
    /// Mirrors what the backend PATCH does to the row, so callers can keep
    /// a fresh snapshot without a refetch.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        match update {
            ProfileUpdate::Basics(u) => {
                self.full_name = Some(u.full_name.clone());
                self.birthday = Some(u.birthday);
            }
            ProfileUpdate::Academics(u) => {
                self.department = Some(u.department.clone());
                self.grad_year = Some(u.grad_year);
            }
            ProfileUpdate::Gender(u) => {
                self.gender = Some(u.gender.clone());
            }
            ProfileUpdate::Height(u) => {
                self.height_cm = Some(u.height_cm);
            }
            ProfileUpdate::Photos(u) => {
                self.profile_image_urls = Some(u.profile_image_urls.clone());
            }
        }
    }
}

/// Step 1 payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicsUpdate {
    pub full_name: String,
    pub birthday: NaiveDate,
}

/// Step 2 payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicsUpdate {
    pub department: String,
    pub grad_year: i32,
}

/// Step 3 payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderUpdate {
    pub gender: String,
}

/// Step 4 payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightUpdate {
    pub height_cm: i32,
}

/// Step 5 payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotosUpdate {
    pub profile_image_urls: Vec<String>,
}

/// One field-group update, serialized untagged as the PATCH body so the
/// row only receives the columns the step owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileUpdate {
    Basics(BasicsUpdate),
    Academics(AcademicsUpdate),
    Gender(GenderUpdate),
    Height(HeightUpdate),
    Photos(PhotosUpdate),
}
