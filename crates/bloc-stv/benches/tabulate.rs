use bloc_ballot::{Ballot, BallotProfile};
use bloc_core::{CandidateId, RngHandle};
use bloc_stv::{tabulate, StvOptions};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::seq::SliceRandom;

fn make_profile(candidates: &[CandidateId], ballots: usize) -> BallotProfile {
    let mut rng = RngHandle::from_seed(7);
    (0..ballots)
        .map(|_| {
            let mut ranking = candidates.to_vec();
            ranking.shuffle(&mut rng);
            (Ballot::new(ranking).expect("ballot"), 1)
        })
        .collect()
}

fn bench_tabulate(c: &mut Criterion) {
    let candidates: Vec<CandidateId> = (0..13).map(|i| CandidateId::new(format!("c{i:02}"))).collect();
    let profile = make_profile(&candidates, 1_000);
    let options = StvOptions::default();
    c.bench_function("stv_13_candidates_5_seats", |b| {
        b.iter(|| {
            let _ = tabulate(&profile, &candidates, 5, &options).expect("tabulate");
        });
    });
}

criterion_group!(benches, bench_tabulate);
criterion_main!(benches);
