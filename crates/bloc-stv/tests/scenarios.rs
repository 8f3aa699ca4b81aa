use std::collections::BTreeMap;

use bloc_ballot::{
    Ballot, BallotProfile, BlocAllocation, BlocProportions, CohesionMatrix, ElectionConfig,
    IntervalTable, PreferenceInterval, SlatePlackettLuce,
};
use bloc_core::errors::VoteError;
use bloc_core::{BlocId, CandidateId, RngHandle, SlateId};
use bloc_stv::{tabulate, DeadlockPolicy, ElectedVia, QuotaKind, StvOptions};

fn ids(labels: &[&str]) -> Vec<CandidateId> {
    labels.iter().map(|l| CandidateId::new(*l)).collect()
}

fn profile(rows: &[(&[&str], u64)]) -> BallotProfile {
    rows.iter()
        .map(|(ranking, count)| (Ballot::from_labels(ranking).unwrap(), *count))
        .collect()
}

fn logged() -> StvOptions {
    StvOptions {
        record_rounds: true,
        ..StvOptions::default()
    }
}

#[test]
fn unanimous_blocs_elect_majority_candidate() {
    let mut slates = BTreeMap::new();
    slates.insert(SlateId::new("A"), ids(&["a1"]));
    slates.insert(SlateId::new("B"), ids(&["b1"]));
    let mut intervals = IntervalTable::new();
    let mut cohesion = BTreeMap::new();
    for bloc in ["A", "B"] {
        let mut by_slate = BTreeMap::new();
        by_slate.insert(SlateId::new("A"), PreferenceInterval::from_pairs([("a1", 1.0)]).unwrap());
        by_slate.insert(SlateId::new("B"), PreferenceInterval::from_pairs([("b1", 1.0)]).unwrap());
        intervals.insert(BlocId::new(bloc), by_slate);
        let mut row = BTreeMap::new();
        row.insert(SlateId::new(bloc), 1.0);
        cohesion.insert(BlocId::new(bloc), row);
    }
    let config = ElectionConfig::new(
        slates,
        intervals,
        BlocProportions::from_pairs([("A", 0.3), ("B", 0.7)]).unwrap(),
        CohesionMatrix::new(cohesion).unwrap(),
    )
    .unwrap();
    let generator = SlatePlackettLuce::new(&config).with_allocation(BlocAllocation::Apportioned);

    for seed in 0..5 {
        let profile = generator
            .generate_profile(100, &mut RngHandle::from_seed(seed))
            .unwrap();
        let outcome = tabulate(&profile, &config.candidates(), 1, &StvOptions::default()).unwrap();
        assert_eq!(outcome.elected_ids(), ids(&["b1"]));
        assert_eq!(outcome.elected[0].round, 1);
        assert_eq!(outcome.elected[0].via, ElectedVia::Quota);
    }
}

#[test]
fn bullet_votes_fill_last_seat_after_exhaustion() {
    let profile = profile(&[(&["A"], 40), (&["B"], 35), (&["C"], 25)]);
    let outcome = tabulate(&profile, &ids(&["A", "B", "C"]), 1, &logged()).unwrap();

    assert_eq!(outcome.quota, 51.0);
    assert_eq!(outcome.round_count, 3);
    let rounds = outcome.rounds.as_ref().unwrap();

    assert!(rounds[0].elected.is_empty());
    assert_eq!(rounds[0].eliminated, Some(CandidateId::new("C")));
    assert_eq!(rounds[0].tallies[&CandidateId::new("A")], 40.0);
    assert_eq!(rounds[0].exhausted_weight, 25.0);
    assert_eq!(rounds[0].active_weight, 75.0);

    assert_eq!(rounds[1].eliminated, Some(CandidateId::new("B")));
    assert_eq!(rounds[1].exhausted_weight, 60.0);

    assert_eq!(rounds[2].elected, ids(&["A"]));
    assert_eq!(outcome.elected[0].via, ElectedVia::Fill);
    assert_eq!(outcome.elected[0].round, 3);
    assert_eq!(outcome.elected[0].tally, 40.0);
    assert_eq!(
        outcome
            .eliminated
            .iter()
            .map(|e| e.candidate.clone())
            .collect::<Vec<_>>(),
        ids(&["C", "B"])
    );
}

#[test]
fn surplus_moves_at_fractional_value() {
    let profile = profile(&[(&["A", "B"], 60), (&["C"], 30), (&["B"], 10)]);
    let outcome = tabulate(&profile, &ids(&["A", "B", "C"]), 2, &logged()).unwrap();

    assert_eq!(outcome.quota, 34.0);
    assert_eq!(outcome.elected_ids(), ids(&["A", "B"]));
    assert_eq!(outcome.elected[0].round, 1);
    assert_eq!(outcome.elected[1].round, 2);

    let rounds = outcome.rounds.unwrap();
    let b_round_two = rounds[1].tallies[&CandidateId::new("B")];
    assert!((b_round_two - 36.0).abs() < 1e-9);
    let last = rounds.last().unwrap();
    assert!((last.retained_weight - 68.0).abs() < 1e-9);
    assert!((last.exhausted_weight - 2.0).abs() < 1e-9);
    assert!((last.active_weight - 30.0).abs() < 1e-9);
}

#[test]
fn simultaneous_winners_elected_in_tally_then_id_order() {
    let profile = profile(&[(&["B", "C"], 40), (&["A", "C"], 40), (&["C"], 20)]);
    let outcome = tabulate(&profile, &ids(&["A", "B", "C"]), 2, &StvOptions::default()).unwrap();
    assert_eq!(outcome.elected_ids(), ids(&["A", "B"]));
    assert!(outcome.elected.iter().all(|e| e.round == 1));
    assert_eq!(outcome.round_count, 1);
}

#[test]
fn elimination_tie_removes_larger_identifier() {
    let profile = profile(&[(&["A"], 4), (&["B", "A"], 3), (&["C", "B"], 3)]);
    let outcome = tabulate(&profile, &ids(&["A", "B", "C"]), 1, &StvOptions::default()).unwrap();
    assert_eq!(outcome.eliminated[0].candidate, CandidateId::new("C"));
    assert_eq!(outcome.elected_ids(), ids(&["B"]));
    assert_eq!(outcome.elected[0].round, 2);
}

#[test]
fn exhausted_field_deadlocks_by_default() {
    let profile = profile(&[(&["A"], 3)]);
    let err = tabulate(&profile, &ids(&["A", "B", "C"]), 2, &StvOptions::default()).unwrap_err();
    match err {
        VoteError::TabulationDeadlock(info) => {
            assert_eq!(info.code, "stv-ballots-exhausted");
            assert_eq!(info.context.get("round"), Some(&"2".to_string()));
            assert_eq!(info.context.get("elected"), Some(&"1".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let options = StvOptions {
        deadlock: DeadlockPolicy::EliminateByTieBreak,
        ..StvOptions::default()
    };
    let outcome = tabulate(&profile, &ids(&["A", "B", "C"]), 2, &options).unwrap();
    assert_eq!(outcome.elected_ids(), ids(&["A", "B"]));
    assert_eq!(outcome.eliminated[0].candidate, CandidateId::new("C"));
    assert_eq!(outcome.elected[1].via, ElectedVia::Fill);
}

#[test]
fn quota_exact_winner_passes_no_rounding_dust() {
    // Hare quota 4/3: c1 inherits exactly a quota from c2's surplus, so nothing
    // live is left for the final seat.
    let profile = profile(&[(&["c2"], 2), (&["c2", "c1", "c3", "c0"], 2)]);
    let options = StvOptions {
        quota: QuotaKind::Hare,
        record_rounds: true,
        ..StvOptions::default()
    };
    let err = tabulate(&profile, &ids(&["c0", "c1", "c2", "c3"]), 3, &options).unwrap_err();
    match err {
        VoteError::TabulationDeadlock(info) => {
            assert_eq!(info.code, "stv-ballots-exhausted");
            assert_eq!(info.context.get("round"), Some(&"3".to_string()));
            assert_eq!(info.context.get("elected"), Some(&"2".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let options = StvOptions {
        deadlock: DeadlockPolicy::EliminateByTieBreak,
        ..options
    };
    let outcome = tabulate(&profile, &ids(&["c0", "c1", "c2", "c3"]), 3, &options).unwrap();
    assert_eq!(outcome.elected_ids(), ids(&["c2", "c1", "c0"]));
    let rounds = outcome.rounds.expect("round log");
    assert!(rounds[1].active_weight.abs() < 1e-12);
    assert!(rounds[2].tallies.values().all(|tally| *tally == 0.0));
}

#[test]
fn empty_profile_deadlocks_unless_field_fits() {
    let err = tabulate(&BallotProfile::new(), &ids(&["A", "B"]), 1, &StvOptions::default())
        .unwrap_err();
    assert!(matches!(err, VoteError::TabulationDeadlock(_)));

    let outcome = tabulate(&BallotProfile::new(), &ids(&["A", "B"]), 2, &StvOptions::default())
        .unwrap();
    assert_eq!(outcome.elected_ids(), ids(&["A", "B"]));
}

#[test]
fn hare_quota_is_fractional() {
    let profile = profile(&[(&["A", "B"], 5), (&["B"], 2), (&["C"], 3)]);
    let options = StvOptions {
        quota: QuotaKind::Hare,
        ..StvOptions::default()
    };
    let outcome = tabulate(&profile, &ids(&["A", "B", "C"]), 3, &options).unwrap();
    assert!((outcome.quota - 10.0 / 3.0).abs() < 1e-12);
    assert_eq!(outcome.elected_ids()[0], CandidateId::new("A"));
    assert_eq!(outcome.elected.len(), 3);
}

#[test]
fn seat_and_field_errors() {
    let profile = profile(&[(&["A"], 1)]);
    let err = tabulate(&profile, &ids(&["A"]), 2, &StvOptions::default()).unwrap_err();
    assert!(matches!(err, VoteError::InsufficientCandidates(_)));

    let err = tabulate(&profile, &ids(&["A"]), 0, &StvOptions::default()).unwrap_err();
    assert!(matches!(err, VoteError::InsufficientCandidates(_)));
    assert_eq!(err.info().code, "stv-seats-zero");

    let err = tabulate(&profile, &ids(&["B", "C"]), 1, &StvOptions::default()).unwrap_err();
    assert_eq!(err.info().code, "stv-unknown-candidate");
}

#[test]
fn outcome_serializes_without_empty_round_log() {
    let profile = profile(&[(&["A"], 40), (&["B"], 35), (&["C"], 25)]);
    let outcome = tabulate(&profile, &ids(&["A", "B", "C"]), 1, &StvOptions::default()).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json.get("rounds").is_none());
    assert_eq!(json["elected"][0]["via"], "fill");
    assert_eq!(json["elected"][0]["candidate"], "A");
}
