/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs
use proptest::prelude::*;

use panchanga_client::export::ical_filename;
use panchanga_client::zodiac::{
    moon_phase_label, nakshatra_index, sidereal_sign_index,
};

proptest! {
    // Property: the sign index follows floor(angle/30) mod 12 everywhere
    // in the sidereal range
    #[test]
    fn sign_index_matches_formula(angle in 0.0f64..360.0) {
        let index = sidereal_sign_index(angle);
        prop_assert_eq!(index, ((angle / 30.0).floor() as usize) % 12);
        prop_assert!(index < 12);
    }

    // Property: the computation is total, including garbage angles
    #[test]
    fn sign_index_never_panics(angle in proptest::num::f64::ANY) {
        let index = sidereal_sign_index(angle);
        prop_assert!(index < 12);
    }

    #[test]
    fn nakshatra_index_stays_in_range(angle in 0.0f64..360.0) {
        prop_assert!(nakshatra_index(angle) < 27);
    }

    // Property: every non-boundary angle renders as a separation with one
    // decimal place
    #[test]
    fn phase_label_between_boundaries_is_a_separation(angle in 0.5f64..179.5) {
        let label = moon_phase_label(angle);
        prop_assert!(label.ends_with("° separation"), "label was {}", label);
    }

    #[test]
    fn phase_label_never_panics(angle in proptest::num::f64::ANY) {
        let _ = moon_phase_label(angle);
    }

    // Property: derived download names contain no whitespace and keep the
    // extension
    #[test]
    fn ical_filename_has_no_whitespace(title in "\\PC*") {
        let name = ical_filename(&title);
        prop_assert!(name.ends_with(".ics"));
        prop_assert!(!name.chars().any(|c| c.is_whitespace()), "name was {:?}", name);
    }

    // Property: titles without whitespace pass through untouched
    #[test]
    fn ical_filename_preserves_solid_titles(title in "[A-Za-z0-9_-]{1,32}") {
        prop_assert_eq!(ical_filename(&title), format!("{}.ics", title));
    }
}
