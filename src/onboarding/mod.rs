//! Onboarding system — profile completeness gate and step writes.
//!
//! A user's profile is filled in one field group at a time across the
//! onboarding screens. The gate is a single pure function mapping the
//! current profile snapshot to the next destination, consulted on every
//! cold start and after every step write, so every screen routes through
//! the same completeness logic.

pub mod gate;
pub mod model;
pub mod steps;

pub use gate::{Destination, next_destination};
pub use model::{
    AcademicsUpdate, BasicsUpdate, GenderUpdate, HeightUpdate, PhotosUpdate, Profile,
    ProfileUpdate, MIN_PROFILE_PHOTOS,
};
pub use steps::{OnboardingWriter, StepOutcome};
