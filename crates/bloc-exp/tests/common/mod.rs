#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use bloc_ballot::BlocAllocation;
use bloc_core::{BlocId, CandidateId, SlateId};
use bloc_exp::{BlocSpec, ElectionSpec};

pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(relative)
}

/// One single-candidate slate per bloc, every bloc fully cohesive.
pub fn unanimous(shares: &[(&str, f64)]) -> ElectionSpec {
    let slates = shares
        .iter()
        .map(|(label, _)| (SlateId::new(*label), vec![CandidateId::new(*label)]))
        .collect();
    let blocs = shares
        .iter()
        .map(|(label, share)| {
            let cohesion: BTreeMap<SlateId, f64> = shares
                .iter()
                .map(|(other, _)| (SlateId::new(*other), if other == label { 1.0 } else { 0.0 }))
                .collect();
            (
                BlocId::new(*label),
                BlocSpec {
                    proportion: *share,
                    cohesion,
                    preferences: BTreeMap::new(),
                    home: None,
                },
            )
        })
        .collect();
    ElectionSpec {
        slates,
        blocs,
        allocation: BlocAllocation::Apportioned,
    }
}
