//! Property tests for the normalizer and the similarity metric.

use event_reconcile::core::normalize::{dice_coefficient, normalize};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalize_is_idempotent(s in ".{0,64}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_output_is_single_spaced(s in ".{0,64}") {
        let out = normalize(&s);
        prop_assert!(!out.contains("  "));
        prop_assert!(!out.starts_with(' '));
        prop_assert!(!out.ends_with(' '));
    }

    #[test]
    fn normalize_is_caseless(s in "[a-zA-Z ]{0,40}") {
        prop_assert_eq!(normalize(&s), normalize(&s.to_uppercase()));
    }

    #[test]
    fn dice_self_similarity_is_one(s in ".{0,40}") {
        prop_assert_eq!(dice_coefficient(&s, &s), 1.0);
    }

    #[test]
    fn dice_stays_in_unit_interval(a in ".{0,40}", b in ".{0,40}") {
        let score = dice_coefficient(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score), "{a:?} / {b:?} -> {score}");
    }
}
