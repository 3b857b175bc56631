//! Completeness gate — routes a user to their first incomplete step.

use serde::{Deserialize, Serialize};

use super::model::Profile;

/// Routing destinations produced by the gate.
///
/// Photos (onboarding step 5) are deliberately not a destination here: the
/// photo screen is the terminal action of the flow and is never re-gated on
/// re-entry, so a profile complete through step 4 always routes `Home`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Step1,
    Step2,
    Step3,
    Step4,
    Home,
}

impl Destination {
    /// Navigation path the app router uses for this destination.
    pub fn route(&self) -> &'static str {
        match self {
            Self::Step1 => "/onboarding/step1",
            Self::Step2 => "/onboarding/step2",
            Self::Step3 => "/onboarding/step3",
            Self::Step4 => "/onboarding/step4",
            Self::Home => "/(tabs)/home",
        }
    }

    /// Whether this destination ends the onboarding flow.
    pub fn is_home(&self) -> bool {
        matches!(self, Self::Home)
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Step1 => "step1",
            Self::Step2 => "step2",
            Self::Step3 => "step3",
            Self::Step4 => "step4",
            Self::Home => "home",
        };
        write!(f, "{s}")
    }
}

/// Decide the next destination for a signed-in user.
///
/// Evaluates the completeness predicates in fixed order and returns the
/// destination of the first unmet one, or [`Destination::Home`] once all
/// four hold. Pure and total: a missing profile or missing fields mean
/// "not complete", never an error, so earlier unmet steps always win over
/// later completed ones.
///
/// Call this again on every profile change — each successful step write
/// produces a strictly later destination, which is what guarantees forward
/// progress and correct resumption after an interrupted flow.
pub fn next_destination(profile: Option<&Profile>) -> Destination {
    let Some(profile) = profile else {
        return Destination::Step1;
    };

    if !profile.has_basics() {
        Destination::Step1
    } else if !profile.has_academics() {
        Destination::Step2
    } else if !profile.has_gender() {
        Destination::Step3
    } else if !profile.has_height() {
        Destination::Step4
    } else {
        Destination::Home
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn with_basics() -> Profile {
        let mut p = Profile::empty(Uuid::new_v4());
        p.full_name = Some("Ana".to_string());
        p.birthday = Some(date("2003-01-01"));
        p
    }

    #[test]
    fn no_profile_routes_to_step1() {
        assert_eq!(next_destination(None), Destination::Step1);
    }

    #[test]
    fn empty_profile_routes_to_step1() {
        let p = Profile::empty(Uuid::new_v4());
        assert_eq!(next_destination(Some(&p)), Destination::Step1);
    }

    #[test]
    fn basics_route_to_step2() {
        let p = with_basics();
        assert_eq!(next_destination(Some(&p)), Destination::Step2);
    }

    #[test]
    fn academics_route_to_step3() {
        let mut p = with_basics();
        p.department = Some("CS".to_string());
        p.grad_year = Some(2026);
        assert_eq!(next_destination(Some(&p)), Destination::Step3);
    }

    #[test]
    fn gender_routes_to_step4() {
        let mut p = with_basics();
        p.department = Some("CS".to_string());
        p.grad_year = Some(2026);
        p.gender = Some("Woman".to_string());
        assert_eq!(next_destination(Some(&p)), Destination::Step4);
    }

    #[test]
    fn height_completes_the_gate() {
        let mut p = with_basics();
        p.department = Some("CS".to_string());
        p.grad_year = Some(2026);
        p.gender = Some("Woman".to_string());
        p.height_cm = Some(165);
        assert_eq!(next_destination(Some(&p)), Destination::Home);
    }

    #[test]
    fn earlier_unmet_steps_win_over_later_fields() {
        // Height set out of order: step1 is still the first unmet predicate.
        let mut p = Profile::empty(Uuid::new_v4());
        p.height_cm = Some(180);
        assert_eq!(next_destination(Some(&p)), Destination::Step1);

        // Photos never gate: complete through step4 routes home without them.
        let mut p = with_basics();
        p.department = Some("CS".to_string());
        p.grad_year = Some(2026);
        p.gender = Some("Man".to_string());
        p.height_cm = Some(180);
        assert!(p.profile_image_urls.is_none());
        assert_eq!(next_destination(Some(&p)), Destination::Home);
    }

    #[test]
    fn resumption_is_monotone() {
        // Completing steps in order re-derives a strictly later destination
        // each time, terminating at home.
        let mut p = Profile::empty(Uuid::new_v4());
        let mut seen = vec![next_destination(Some(&p))];

        p.full_name = Some("Ana".to_string());
        p.birthday = Some(date("2003-01-01"));
        seen.push(next_destination(Some(&p)));

        p.department = Some("CS".to_string());
        p.grad_year = Some(2026);
        seen.push(next_destination(Some(&p)));

        p.gender = Some("Woman".to_string());
        seen.push(next_destination(Some(&p)));

        p.height_cm = Some(165);
        seen.push(next_destination(Some(&p)));

        assert_eq!(
            seen,
            vec![
                Destination::Step1,
                Destination::Step2,
                Destination::Step3,
                Destination::Step4,
                Destination::Home,
            ]
        );
    }

    #[test]
    fn display_matches_serde() {
        for dest in [
            Destination::Step1,
            Destination::Step2,
            Destination::Step3,
            Destination::Step4,
            Destination::Home,
        ] {
            let display = format!("{dest}");
            let json = serde_json::to_string(&dest).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }

    #[test]
    fn routes_are_app_paths() {
        assert_eq!(Destination::Step1.route(), "/onboarding/step1");
        assert_eq!(Destination::Home.route(), "/(tabs)/home");
        assert!(Destination::Home.is_home());
        assert!(!Destination::Step4.is_home());
    }
}
