//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary message streams.

use super::*;
use crate::session::{Draft, Session, StatLine};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Session sitting in `state` with Alice (#3) and Bob (#7) on the roster
fn seeded_session(state: StatState, active: bool) -> Session {
    let mut session = Session::new("test-conv");
    for (name, number) in [("Alice", 3), ("Bob", 7)] {
        session
            .roster
            .add_player(Draft {
                name: name.to_string(),
                number: Some(number),
            })
            .unwrap();
    }
    if active {
        session.active_player = Some("Alice".to_string());
    }
    session.state = state;
    session
}

fn ledger(session: &Session) -> Vec<StatLine> {
    session.roster.snapshot().into_iter().map(|(_, line)| line).collect()
}

fn total_events(session: &Session) -> u32 {
    ledger(session)
        .iter()
        .map(|l| {
            l.twopt_made
                + l.twopt_miss
                + l.threept_made
                + l.threept_miss
                + l.freept_made
                + l.freept_miss
                + l.off_rebound
                + l.def_rebound
        })
        .sum()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = StatState> {
    proptest::sample::select(StatState::ALL.to_vec())
}

fn arb_loop_back() -> impl Strategy<Value = LoopBack> {
    prop_oneof![Just(LoopBack::EnterPlayer), Just(LoopBack::EnterNumber)]
}

/// Every vocabulary word plus numbers and a few names
fn arb_command() -> impl Strategy<Value = String> {
    let mut words: Vec<String> = Guard::ALL
        .iter()
        .flat_map(|g| g.vocabulary().iter().map(|w| (*w).to_string()))
        .collect();
    words.extend(["3", "7", "42", "Carol", "Dana 9"].map(String::from));
    proptest::sample::select(words)
}

fn arb_casing(word: String) -> impl Strategy<Value = String> {
    prop_oneof![
        Just(word.clone()),
        Just(word.to_uppercase()),
        Just(format!("  {word} ")),
    ]
}

fn arb_noise() -> impl Strategy<Value = String> {
    "[a-z]{4,12}xq"
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// A non-matching message never changes the session
    #[test]
    fn prop_no_match_is_idempotent(
        state in arb_state(),
        active in any::<bool>(),
        noise in proptest::collection::vec(arb_noise(), 1..6),
    ) {
        let table = TransitionTable::default();
        let mut session = seeded_session(state, active);
        // Names are valid drafts in enter_player, and a leaf with a selected
        // player commits on any text
        prop_assume!(state != StatState::EnterPlayer);
        prop_assume!(!(state.is_leaf() && active));
        let before = format!("{session:?}");
        for text in &noise {
            let err = advance(&table, &mut session, text).unwrap_err();
            prop_assert_eq!(err, TransitionError::NoMatch { state });
        }
        prop_assert_eq!(format!("{session:?}"), before);
    }

    /// Casing and surrounding whitespace never change the outcome
    #[test]
    fn prop_case_insensitive(
        state in arb_state(),
        active in any::<bool>(),
        (word, variant) in arb_command().prop_flat_map(|w| (Just(w.clone()), arb_casing(w))),
    ) {
        let table = TransitionTable::default();
        let mut plain = seeded_session(state, active);
        let mut varied = plain.clone();

        let a = advance(&table, &mut plain, &word).map(|r| r.final_state());
        let b = advance(&table, &mut varied, &variant).map(|r| r.final_state());
        prop_assert_eq!(a, b);
        prop_assert_eq!(plain.state, varied.state);
        prop_assert_eq!(ledger(&plain), ledger(&varied));
        prop_assert_eq!(plain.active_player, varied.active_player);
    }

    /// Clear from any clearable state lands on enter_player and keeps counts
    #[test]
    fn prop_clear_keeps_ledger(
        state in arb_state().prop_filter("clearable", |s| s.is_clearable()),
        active in any::<bool>(),
        spelling in arb_casing("clear".to_string()),
    ) {
        let table = TransitionTable::default();
        let mut session = seeded_session(state, active);
        session.roster.record("Bob", crate::session::Stat::DefensiveRebound).unwrap();
        let before = ledger(&session);

        let result = advance(&table, &mut session, &spelling).unwrap();
        prop_assert_eq!(result.final_state(), StatState::EnterPlayer);
        prop_assert_eq!(result.steps.len(), 1);
        prop_assert_eq!(ledger(&session), before);
        prop_assert_eq!(session.active_player, None);
    }

    /// Each advance commits at most one event, and counts never go down
    #[test]
    fn prop_ledger_is_monotonic(
        loop_back in arb_loop_back(),
        commands in proptest::collection::vec(arb_command(), 0..60),
    ) {
        let table = TransitionTable::new(loop_back);
        let mut session = Session::new("test-conv");
        let mut previous = total_events(&session);
        for text in &commands {
            let outcome = advance(&table, &mut session, text);
            let now = total_events(&session);
            let recorded = outcome.as_ref().map_or(false, |r| r.recorded().is_some());
            prop_assert_eq!(now, previous + u32::from(recorded));
            if let Ok(result) = &outcome {
                prop_assert_eq!(result.final_state(), session.state);
            }
            previous = now;
        }
    }

    /// The commit for a leaf always lands on the configured loop-back state
    #[test]
    fn prop_commit_destination(
        loop_back in arb_loop_back(),
        route in proptest::sample::select(vec![
            ("2pt", "made"), ("2pt", "miss"),
            ("3pt", "made"), ("3pt", "miss"),
            ("ft", "made"), ("ft", "miss"),
            ("rebound", "offensive"), ("rebound", "defensive"),
        ]),
    ) {
        let table = TransitionTable::new(loop_back);
        let mut session = seeded_session(StatState::Statistic, true);
        advance(&table, &mut session, route.0).unwrap();
        let result = advance(&table, &mut session, route.1).unwrap();

        prop_assert_eq!(result.final_state(), loop_back.state());
        prop_assert_eq!(result.recorded().map(|(p, _)| p), Some("Alice"));
        prop_assert_eq!(total_events(&session), 1);
    }

    /// Two sessions fed the same stream in lock-step end up identical, and
    /// a session fed nothing stays fresh
    #[test]
    fn prop_sessions_do_not_share_state(
        commands in proptest::collection::vec(arb_command(), 0..40),
    ) {
        let table = TransitionTable::default();
        let mut a = Session::new("conv-a");
        let mut b = Session::new("conv-b");
        let idle = Session::new("conv-c");
        for text in &commands {
            let ra = advance(&table, &mut a, text).map(|r| r.final_state());
            let rb = advance(&table, &mut b, text).map(|r| r.final_state());
            prop_assert_eq!(ra, rb);
        }
        prop_assert_eq!(a.state, b.state);
        prop_assert_eq!(ledger(&a), ledger(&b));
        prop_assert_eq!(idle.state, StatState::User);
        prop_assert!(idle.roster.is_empty());
    }
}

#[test]
fn test_two_cycles_count_twice() {
    let table = TransitionTable::new(LoopBack::EnterNumber);
    let mut session = seeded_session(StatState::EnterNumber, false);
    for text in ["3", "3pt", "MISS", "3", "3pt", "miss"] {
        advance(&table, &mut session, text).unwrap();
    }
    let alice = session.roster.line("Alice");
    assert_eq!(alice.threept_miss, 2);
    assert_eq!(
        alice,
        StatLine {
            threept_miss: 2,
            ..StatLine::default()
        }
    );
    assert_eq!(session.roster.line("Bob"), StatLine::default());
}
