//! CampusCrush core — onboarding gate and account deletion service.

pub mod config;
pub mod deletion;
pub mod error;
pub mod onboarding;
pub mod session;
pub mod store;
