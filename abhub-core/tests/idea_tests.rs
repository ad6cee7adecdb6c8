use abhub_core::backlog::{Backlog, IdeaQuery, IdeaSort};
use abhub_core::domain::*;
use abhub_core::error::CoreError;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn idea(name: &str, impact: u8, confidence: u8, ease: u8) -> TestIdea {
    TestIdea::new(name, impact, confidence, ease, 3.0, 15.0, 50000).unwrap()
}

// ===== ICE Invariant Tests =====

#[test_case(1, 1, 1, 1; "minimum factors")]
#[test_case(10, 10, 10, 1000; "maximum factors")]
#[test_case(8, 7, 6, 336; "mixed factors")]
#[test_case(10, 5, 4, 200; "band boundary")]
fn test_ice_score_is_product(impact: u8, confidence: u8, ease: u8, expected: u16) {
    let idea = idea("Idea", impact, confidence, ease);
    assert_eq!(idea.ice_score, expected);
    assert_eq!(
        idea.ice_score,
        idea.impact as u16 * idea.confidence as u16 * idea.ease as u16
    );
}

#[test]
fn test_ice_score_never_stale_through_updates() {
    let mut backlog = Backlog::new();
    let id = backlog.add(idea("Idea", 3, 3, 3)).unwrap();

    for factors in [(5u8, 6u8, 7u8), (10, 10, 10), (1, 1, 1), (9, 2, 4)] {
        backlog
            .update_factors(&id, factors.0, factors.1, factors.2)
            .unwrap();
        let stored = backlog.get(&id).unwrap();
        assert_eq!(
            stored.ice_score,
            stored.impact as u16 * stored.confidence as u16 * stored.ease as u16
        );
    }
}

// ===== Lifecycle Tests =====

#[test]
fn test_full_lifecycle_with_retest() {
    let mut idea = idea("Free shipping threshold", 9, 8, 7);

    idea.start().unwrap();
    idea.set_test_duration(21);
    idea.complete(18.5).unwrap();

    assert_eq!(idea.status, IdeaStatus::Completed);
    assert_eq!(idea.test_duration, Some(21));
    assert_eq!(idea.actual_result, Some(18.5));

    // Retest: back to planned, result cleared, duration kept
    idea.reopen().unwrap();
    assert_eq!(idea.status, IdeaStatus::Planned);
    assert_eq!(idea.actual_result, None);
    assert_eq!(idea.test_duration, Some(21));

    // And the cycle can run again
    idea.start().unwrap();
    idea.complete(22.0).unwrap();
    assert_eq!(idea.actual_result, Some(22.0));
}

#[test]
fn test_transitions_rejected_with_invalid_state() {
    let mut planned = idea("Planned", 5, 5, 5);
    let err = planned.complete(10.0).unwrap_err();
    assert!(matches!(err, CoreError::InvalidState(_)));
    assert!(err.to_string().contains("planned"));
}

// ===== Backlog Query Tests =====

#[test]
fn test_mixed_query() {
    let mut backlog = Backlog::new();
    backlog.add(idea("Checkout trust badges", 9, 9, 9)).unwrap();
    backlog.add(idea("Checkout one-page flow", 4, 4, 4)).unwrap();
    let done = backlog.add(idea("Checkout coupon box", 6, 6, 6)).unwrap();
    backlog.add(idea("Landing hero copy", 8, 8, 8)).unwrap();

    {
        let idea = backlog.get_mut(&done).unwrap();
        idea.start().unwrap();
        idea.complete(9.0).unwrap();
    }

    let query = IdeaQuery::new()
        .with_search("checkout")
        .with_status(IdeaStatus::Planned)
        .with_sort(IdeaSort::IceScore);
    let listed = backlog.query(&query);

    let names: Vec<&str> = listed.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Checkout trust badges", "Checkout one-page flow"]);
}

#[test]
fn test_created_at_sort_is_newest_first() {
    let mut backlog = Backlog::new();
    backlog.add(idea("Older", 5, 5, 5)).unwrap();
    backlog.add(idea("Newer", 5, 5, 5)).unwrap();

    let listed = backlog.query(&IdeaQuery::new().with_sort(IdeaSort::CreatedAt));
    assert_eq!(listed[0].name, "Newer");
}

// ===== Summary Tests =====

#[test]
fn test_summary_tracks_band_changes() {
    let mut idea = idea("Idea", 5, 5, 5);
    assert_eq!(IdeaSummary::from(&idea).priority, PriorityBand::Low);

    idea.set_factors(9, 9, 9).unwrap();
    assert_eq!(IdeaSummary::from(&idea).priority, PriorityBand::Top);
}

// ===== Property Tests =====

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ice_invariant_holds_for_all_valid_factors(
            impact in 1u8..=10,
            confidence in 1u8..=10,
            ease in 1u8..=10,
        ) {
            let idea = TestIdea::new("p", impact, confidence, ease, 3.0, 15.0, 1000).unwrap();
            prop_assert_eq!(
                idea.ice_score,
                impact as u16 * confidence as u16 * ease as u16
            );
            prop_assert!(idea.ice_score >= 1 && idea.ice_score <= 1000);
        }

        #[test]
        fn out_of_range_factors_are_rejected(factor in 11u8..=255) {
            prop_assert!(TestIdea::new("p", factor, 5, 5, 3.0, 15.0, 1000).is_err());
            prop_assert!(TestIdea::new("p", 5, factor, 5, 3.0, 15.0, 1000).is_err());
            prop_assert!(TestIdea::new("p", 5, 5, factor, 3.0, 15.0, 1000).is_err());
        }
    }
}
