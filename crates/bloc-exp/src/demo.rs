//! Built-in three-slate electorate used by the `demo` command and smoke tests.
//!
//! Republican, Democrat and Progressive blocs (20/40/40) each field a slate
//! named after them. Cross-over between blocs is controlled by four
//! probabilities; Republicans never attend to the Progressive slate first and
//! vice versa.

use std::collections::BTreeMap;

use bloc_core::{BlocId, CandidateId, SlateId};
use bloc_stv::StvOptions;
use serde::{Deserialize, Serialize};

use crate::plan::{BlocSpec, ElectionPlan, ElectionSpec};
use crate::sweep::{CohesionParameter, Scheduler, SweepPlan};

/// Ballots cast in the demo election.
pub const DEMO_BALLOTS: u64 = 1000;
/// Seats filled in the demo election.
pub const DEMO_SEATS: usize = 5;

/// Cross-over probabilities between the demo blocs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossOver {
    /// Progressive voters attending to the Democrat slate.
    pub progressive_to_democrat: f64,
    /// Democrat voters attending to the Progressive slate.
    pub democrat_to_progressive: f64,
    /// Democrat voters attending to the Republican slate.
    pub democrat_to_republican: f64,
    /// Republican voters attending to the Democrat slate.
    pub republican_to_democrat: f64,
}

impl CrossOver {
    /// Same cross-over probability everywhere.
    pub fn uniform(p: f64) -> Self {
        Self {
            progressive_to_democrat: p,
            democrat_to_progressive: p,
            democrat_to_republican: p,
            republican_to_democrat: p,
        }
    }
}

impl Default for CrossOver {
    fn default() -> Self {
        Self::uniform(0.2)
    }
}

const REPUBLICAN: &str = "Republican";
const DEMOCRAT: &str = "Democrat";
const PROGRESSIVE: &str = "Progressive";

fn weights(pairs: &[(&str, f64)]) -> BTreeMap<CandidateId, f64> {
    pairs
        .iter()
        .map(|(label, w)| (CandidateId::new(*label), *w))
        .collect()
}

fn row(republican: f64, democrat: f64, progressive: f64) -> BTreeMap<SlateId, f64> {
    [
        (SlateId::new(REPUBLICAN), republican),
        (SlateId::new(DEMOCRAT), democrat),
        (SlateId::new(PROGRESSIVE), progressive),
    ]
    .into_iter()
    .collect()
}

fn preferences(
    republican: &[(&str, f64)],
    democrat: &[(&str, f64)],
) -> BTreeMap<SlateId, BTreeMap<CandidateId, f64>> {
    // Every bloc ranks the Progressive slate the same way.
    let progressive = [("P1", 0.5), ("P2", 0.3), ("P3", 0.1), ("P4", 0.1)];
    [
        (SlateId::new(REPUBLICAN), weights(republican)),
        (SlateId::new(DEMOCRAT), weights(democrat)),
        (SlateId::new(PROGRESSIVE), weights(&progressive)),
    ]
    .into_iter()
    .collect()
}

/// The demo electorate under the given cross-over.
pub fn demo_election(cross: CrossOver) -> ElectionSpec {
    let slates: BTreeMap<SlateId, Vec<CandidateId>> = [
        (REPUBLICAN, vec!["R1", "R2"]),
        (DEMOCRAT, vec!["D1", "D2", "D3", "D4", "D5", "D6", "D7"]),
        (PROGRESSIVE, vec!["P1", "P2", "P3", "P4"]),
    ]
    .into_iter()
    .map(|(slate, members)| {
        (
            SlateId::new(slate),
            members.into_iter().map(CandidateId::new).collect(),
        )
    })
    .collect();

    let mut blocs = BTreeMap::new();
    blocs.insert(
        BlocId::new(REPUBLICAN),
        BlocSpec {
            proportion: 0.2,
            cohesion: row(1.0 - cross.republican_to_democrat, cross.republican_to_democrat, 0.0),
            preferences: preferences(
                &[("R1", 0.2), ("R2", 0.8)],
                &[
                    ("D1", 0.1),
                    ("D2", 0.1),
                    ("D3", 0.1),
                    ("D4", 0.1),
                    ("D5", 0.4),
                    ("D6", 0.1),
                    ("D7", 0.1),
                ],
            ),
            home: None,
        },
    );
    blocs.insert(
        BlocId::new(DEMOCRAT),
        BlocSpec {
            proportion: 0.4,
            cohesion: row(
                cross.democrat_to_republican,
                1.0 - cross.democrat_to_republican - cross.democrat_to_progressive,
                cross.democrat_to_progressive,
            ),
            preferences: preferences(
                &[("R1", 0.5), ("R2", 0.5)],
                &[
                    ("D1", 0.3),
                    ("D2", 0.2),
                    ("D3", 0.1),
                    ("D4", 0.1),
                    ("D5", 0.1),
                    ("D6", 0.1),
                    ("D7", 0.1),
                ],
            ),
            home: None,
        },
    );
    blocs.insert(
        BlocId::new(PROGRESSIVE),
        BlocSpec {
            proportion: 0.4,
            cohesion: row(0.0, cross.progressive_to_democrat, 1.0 - cross.progressive_to_democrat),
            preferences: preferences(
                &[("R1", 0.8), ("R2", 0.2)],
                &[
                    ("D1", 0.1),
                    ("D2", 0.1),
                    ("D3", 0.2),
                    ("D4", 0.2),
                    ("D5", 0.2),
                    ("D6", 0.1),
                    ("D7", 0.1),
                ],
            ),
            home: None,
        },
    );

    ElectionSpec {
        slates,
        blocs,
        allocation: Default::default(),
    }
}

/// A single demo election.
pub fn demo_plan(cross: CrossOver, ballots: u64, seats: usize) -> ElectionPlan {
    ElectionPlan {
        election: demo_election(cross),
        ballots,
        seats,
        stv: StvOptions::default(),
    }
}

/// Grid over Democrat/Progressive cross-over in both directions, with the
/// Republican cross-over held at the default.
pub fn demo_sweep_plan(values: &[f64], trials: usize) -> SweepPlan {
    let parameter = |name: &str, bloc: &str, slate: &str| CohesionParameter {
        name: name.to_string(),
        bloc: BlocId::new(bloc),
        slate: SlateId::new(slate),
        values: values.to_vec(),
    };
    SweepPlan {
        election: demo_election(CrossOver::default()),
        ballots: DEMO_BALLOTS,
        seats: DEMO_SEATS,
        trials,
        stv: StvOptions::default(),
        parameters: vec![
            parameter("democrat_to_progressive", DEMOCRAT, PROGRESSIVE),
            parameter("progressive_to_democrat", PROGRESSIVE, DEMOCRAT),
        ],
        scheduler: Scheduler::default(),
    }
}
