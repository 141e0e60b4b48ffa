//! Whole-session properties of the adaptive engine.
//!
//! Sessions are driven synchronously with seeded random answers so every
//! invariant can be checked after each step.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use adaptest_core::config::{AdaptiveConfig, TestPurpose, TierSettings};
use adaptest_core::engine::{AdaptiveEngine, NextStep};
use adaptest_core::irt::probability_correct;
use adaptest_core::model::{ItemParameters, Tier};
use adaptest_core::stopping::StopReason;
use adaptest_core::tier::classify;

/// 80 items from b = -2.95 to 2.95, four topics, tier from difficulty.
fn pool() -> Vec<ItemParameters> {
    let tiers = TierSettings::default();
    let topics = ["grammar", "vocabulary", "reading", "listening"];
    (0..80)
        .map(|i| {
            let b = -2.95 + i as f64 * (5.9 / 79.0);
            let a = 0.9 + (i % 5) as f64 * 0.2;
            let c = [0.0, 0.1, 0.2][i % 3];
            ItemParameters::new(format!("p{i:02}"), b, a, c)
                .with_tier(classify(b, &tiers))
                .with_topic(topics[i % 4])
        })
        .collect()
}

#[derive(Debug, Default)]
struct Trace {
    answered: usize,
    stop_reason: Option<StopReason>,
    sems: Vec<f64>,
}

/// Run a full session, asserting the per-step invariants along the way.
fn run_checked(
    engine: &AdaptiveEngine,
    pool: &[ItemParameters],
    true_theta: f64,
    seed: u64,
) -> Trace {
    let config = engine.config();
    let est = &config.estimator;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = engine.start_session_at(0.0);
    let mut trace = Trace::default();
    let mut previous: Option<(bool, f64)> = None;

    loop {
        let compliant_left = previous.map(|(correct, last_b)| {
            correct
                && pool
                    .iter()
                    .any(|i| !state.has_asked(&i.id) && i.difficulty >= last_b)
        });

        match engine.next_step(&mut state, pool).unwrap() {
            NextStep::Stop(decision) => {
                trace.stop_reason = decision.reason;
                break;
            }
            NextStep::Ask(selection) => {
                let item = selection.item;

                if let (Some((true, last_b)), Some(true)) = (previous, compliant_left) {
                    assert!(
                        item.difficulty >= last_b,
                        "after a correct answer {} (b={}) was chosen below {last_b}",
                        item.id,
                        item.difficulty
                    );
                }

                let p = probability_correct(
                    true_theta,
                    item.difficulty,
                    item.discrimination,
                    item.guessing,
                );
                let correct = rng.r#gen::<f64>() < p;
                let tier_before = state.active_tier;
                let outcome = engine.record_response(&mut state, correct).unwrap();

                assert!(state.theta >= est.theta_min && state.theta <= est.theta_max);
                assert!(
                    outcome.active_tier.index().abs_diff(tier_before.index()) <= 1,
                    "tier jumped from {tier_before} to {}",
                    outcome.active_tier
                );
                assert_eq!(state.questions_answered(), state.responses.len());
                assert_eq!(state.asked_item_ids.len(), state.responses.len());

                trace.sems.push(state.sem);
                previous = Some((correct, item.difficulty));
            }
        }
    }

    let mut ids: Vec<&str> = state.responses.iter().map(|r| r.item_id.as_str()).collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total, "an item was asked twice");

    trace.answered = total;
    trace
}

#[test]
fn invariants_hold_across_abilities_and_purposes() {
    let pool = pool();
    for purpose in TestPurpose::ALL {
        let engine = AdaptiveEngine::new(AdaptiveConfig::for_purpose(purpose)).unwrap();
        let config = engine.config().clone();
        for (n, true_theta) in [-2.5, -1.2, -0.3, 0.4, 1.3, 2.6].into_iter().enumerate() {
            for seed in 0..4u64 {
                let trace = run_checked(&engine, &pool, true_theta, seed * 31 + n as u64);
                assert!(
                    trace.answered >= config.min_questions,
                    "{purpose}: stopped after {} answers",
                    trace.answered
                );
                assert!(trace.answered <= config.max_questions);
                assert!(trace.stop_reason.is_some());
            }
        }
    }
}

#[test]
fn precision_improves_over_a_session() {
    let pool = pool();
    let engine = AdaptiveEngine::new(AdaptiveConfig::default()).unwrap();
    for seed in 0..5 {
        let trace = run_checked(&engine, &pool, 0.5, seed);
        let first = trace.sems[0];
        let last = *trace.sems.last().unwrap();
        assert!(last < first, "sem went from {first} to {last}");
    }
}

#[test]
fn probability_at_matching_difficulty() {
    let p = probability_correct(0.0, 0.0, 1.5, 0.25);
    assert!((p - 0.625).abs() < 1e-9);
}

#[test]
fn eight_wrong_answers_from_c3_demote_at_most_once() {
    let pool = pool();
    let engine = AdaptiveEngine::new(AdaptiveConfig::default()).unwrap();
    let mut state = engine.start_session_at(0.5);
    assert_eq!(state.active_tier, Tier::C3);

    for _ in 0..8 {
        engine.select_next_item(&mut state, &pool).unwrap().unwrap();
        let outcome = engine.record_response(&mut state, false).unwrap();
        assert!(outcome.active_tier <= Tier::C3, "promoted after a wrong answer");
        assert!(outcome.active_tier >= Tier::C2, "demoted more than once");
    }
    assert!(state.theta < 0.5);
}

#[test]
fn already_asked_single_item_pool_has_no_candidate() {
    let engine = AdaptiveEngine::new(AdaptiveConfig::default()).unwrap();
    let item = ItemParameters::new("only", 0.0, 1.0, 0.0).with_tier(Tier::C3);
    let pool = vec![item];

    let mut state = engine.start_session_at(0.0);
    state.asked_item_ids.insert("only".to_string());
    assert!(engine.select_next_item(&mut state, &pool).unwrap().is_none());

    match engine.next_step(&mut state, &pool).unwrap() {
        NextStep::Stop(decision) => {
            assert_eq!(decision.reason, Some(StopReason::NoItemsAvailable));
        }
        NextStep::Ask(selection) => panic!("unexpected selection {}", selection.item.id),
    }
    assert!(state.finished);
}

#[test]
fn equal_question_bounds_stop_exactly_at_the_limit() {
    let pool = pool();
    for target_sem in [0.01, 10.0] {
        let engine = AdaptiveEngine::new(AdaptiveConfig {
            min_questions: 5,
            max_questions: 5,
            target_sem,
            ..AdaptiveConfig::default()
        })
        .unwrap();
        let mut state = engine.start_session_at(0.0);

        for n in 0..5 {
            assert!(!engine.should_stop(&mut state).stop, "stopped early at {n}");
            engine.select_next_item(&mut state, &pool).unwrap().unwrap();
            engine.record_response(&mut state, n % 2 == 0).unwrap();
        }

        let decision = engine.should_stop(&mut state);
        assert!(decision.stop);
        assert_eq!(state.questions_answered(), 5);
        if target_sem < 1.0 {
            assert_eq!(decision.reason, Some(StopReason::MaxQuestions));
        }
    }
}

#[test]
fn all_correct_sessions_move_up_one_tier_at_a_time() {
    let pool = pool();
    let engine = AdaptiveEngine::new(AdaptiveConfig::for_purpose(TestPurpose::Placement)).unwrap();
    let mut state = engine.start_session_at(-1.5);
    let mut tiers = vec![state.active_tier];

    while let NextStep::Ask(_) = engine.next_step(&mut state, &pool).unwrap() {
        let outcome = engine.record_response(&mut state, true).unwrap();
        tiers.push(outcome.active_tier);
    }

    for pair in tiers.windows(2) {
        assert!(pair[1] >= pair[0], "demoted during an all-correct run");
        assert!(pair[1].index() - pair[0].index() <= 1);
    }
    assert!(state.theta > -1.5);
}
