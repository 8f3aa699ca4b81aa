use bloc_ballot::PreferenceInterval;
use bloc_core::errors::VoteError;
use bloc_core::{CandidateId, RngHandle};
use proptest::prelude::*;

#[test]
fn weights_are_rescaled_and_zeros_kept() {
    let interval = PreferenceInterval::from_pairs([("P1", 5.0), ("P2", 3.0), ("P3", 2.0), ("P4", 0.0)])
        .unwrap();
    assert_eq!(interval.len(), 4);
    assert!((interval.weight(&CandidateId::new("P1")).unwrap() - 0.5).abs() < 1e-12);
    assert_eq!(interval.weight(&CandidateId::new("P4")), Some(0.0));
    assert_eq!(interval.weight(&CandidateId::new("X")), None);
}

#[test]
fn negative_weight_is_rejected() {
    let err = PreferenceInterval::from_pairs([("R1", 0.4), ("R2", -0.1)]).unwrap_err();
    match err {
        VoteError::InvalidWeight(info) => {
            assert_eq!(info.code, "interval-negative");
            assert_eq!(info.context.get("candidate"), Some(&"R2".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn all_zero_and_empty_are_rejected() {
    let err = PreferenceInterval::from_pairs([("R1", 0.0), ("R2", 0.0)]).unwrap_err();
    assert_eq!(err.info().code, "interval-all-zero");
    let err = PreferenceInterval::from_pairs(std::iter::empty()).unwrap_err();
    assert_eq!(err.info().code, "interval-empty");
    let err = PreferenceInterval::from_pairs([("R1", f64::NAN)]).unwrap_err();
    assert!(matches!(err, VoteError::InvalidWeight(_)));
}

#[test]
fn concentrated_interval_still_ranks_everyone() {
    let interval = PreferenceInterval::from_pairs([("A", 0.0), ("B", 1.0), ("C", 0.0)]).unwrap();
    let mut rng = RngHandle::from_seed(77);
    for _ in 0..50 {
        let ranking = interval.sample_ranking(&mut rng);
        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0], CandidateId::new("B"));
    }
}

#[test]
fn deserializes_from_plain_map() {
    let interval: PreferenceInterval = serde_json::from_str(r#"{"R1": 2.0, "R2": 6.0}"#).unwrap();
    assert!((interval.weight(&CandidateId::new("R2")).unwrap() - 0.75).abs() < 1e-12);
    assert!(serde_json::from_str::<PreferenceInterval>(r#"{"R1": 0.0}"#).is_err());
}

proptest! {
    #[test]
    fn normalized_weights_sum_to_one(raw in proptest::collection::vec(0.0f64..1_000.0, 1..12)) {
        prop_assume!(raw.iter().any(|w| *w > 0.0));
        let labels: Vec<String> = (0..raw.len()).map(|i| format!("C{i}")).collect();
        let interval = PreferenceInterval::from_pairs(
            labels.iter().map(String::as_str).zip(raw.iter().copied()),
        )
        .unwrap();
        let sum: f64 = interval.iter().map(|(_, w)| w).sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
        prop_assert_eq!(interval.len(), raw.len());
    }
}
