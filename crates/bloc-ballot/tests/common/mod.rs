#![allow(dead_code)]

use std::collections::BTreeMap;

use bloc_ballot::{BlocProportions, CohesionMatrix, ElectionConfig, IntervalTable, PreferenceInterval};
use bloc_core::{BlocId, CandidateId, SlateId};

pub fn slates(entries: &[(&str, &[&str])]) -> BTreeMap<SlateId, Vec<CandidateId>> {
    entries
        .iter()
        .map(|(slate, members)| {
            (
                SlateId::new(*slate),
                members.iter().map(|m| CandidateId::new(*m)).collect(),
            )
        })
        .collect()
}

pub fn row(entries: &[(&str, f64)]) -> BTreeMap<SlateId, f64> {
    entries
        .iter()
        .map(|(slate, p)| (SlateId::new(*slate), *p))
        .collect()
}

pub fn interval(entries: &[(&str, f64)]) -> PreferenceInterval {
    PreferenceInterval::from_pairs(entries.iter().copied()).unwrap()
}

/// Two single-candidate slates voted for only by their own bloc.
pub fn polarized(majority: f64) -> ElectionConfig {
    let mut intervals = IntervalTable::new();
    for bloc in ["A", "B"] {
        let mut by_slate = BTreeMap::new();
        by_slate.insert(SlateId::new("A"), interval(&[("a1", 1.0)]));
        by_slate.insert(SlateId::new("B"), interval(&[("b1", 1.0)]));
        intervals.insert(BlocId::new(bloc), by_slate);
    }
    let mut cohesion = BTreeMap::new();
    cohesion.insert(BlocId::new("A"), row(&[("A", 1.0)]));
    cohesion.insert(BlocId::new("B"), row(&[("B", 1.0)]));
    ElectionConfig::new(
        slates(&[("A", &["a1"]), ("B", &["b1"])]),
        intervals,
        BlocProportions::from_pairs([("A", majority), ("B", 1.0 - majority)]).unwrap(),
        CohesionMatrix::new(cohesion).unwrap(),
    )
    .unwrap()
}

/// Three slates, two blocs, with a zero-weight candidate on each slate.
pub fn three_slate() -> ElectionConfig {
    let slate_table = slates(&[
        ("Dem", &["D1", "D2", "D3"]),
        ("Prog", &["P1", "P2"]),
        ("Rep", &["R1"]),
    ]);
    let mut intervals = IntervalTable::new();
    for bloc in ["Dem", "Prog"] {
        let mut by_slate = BTreeMap::new();
        by_slate.insert(SlateId::new("Dem"), interval(&[("D1", 0.7), ("D2", 0.3), ("D3", 0.0)]));
        by_slate.insert(SlateId::new("Prog"), interval(&[("P1", 1.0), ("P2", 0.0)]));
        by_slate.insert(SlateId::new("Rep"), interval(&[("R1", 1.0)]));
        intervals.insert(BlocId::new(bloc), by_slate);
    }
    let mut cohesion = BTreeMap::new();
    cohesion.insert(BlocId::new("Dem"), row(&[("Dem", 0.7), ("Prog", 0.2), ("Rep", 0.1)]));
    cohesion.insert(BlocId::new("Prog"), row(&[("Dem", 0.3), ("Prog", 0.7), ("Rep", 0.0)]));
    ElectionConfig::new(
        slate_table,
        intervals,
        BlocProportions::from_pairs([("Dem", 0.55), ("Prog", 0.45)]).unwrap(),
        CohesionMatrix::new(cohesion).unwrap(),
    )
    .unwrap()
}
