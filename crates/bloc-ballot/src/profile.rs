use std::collections::{BTreeMap, BTreeSet};

use bloc_core::errors::{ErrorInfo, VoteError};
use bloc_core::CandidateId;
use serde::{Deserialize, Serialize};

/// A ranking of distinct candidates, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<CandidateId>", into = "Vec<CandidateId>")]
pub struct Ballot {
    ranking: Vec<CandidateId>,
}

impl Ballot {
    /// Builds a ballot, rejecting rankings that repeat a candidate.
    pub fn new(ranking: Vec<CandidateId>) -> Result<Self, VoteError> {
        let mut seen = BTreeSet::new();
        for candidate in &ranking {
            if !seen.insert(candidate) {
                return Err(VoteError::Config(
                    ErrorInfo::new("ballot-duplicate", "a ballot ranks a candidate twice")
                        .with_context("candidate", candidate.as_str()),
                ));
            }
        }
        Ok(Self { ranking })
    }

    /// Convenience constructor from candidate labels.
    pub fn from_labels(labels: &[&str]) -> Result<Self, VoteError> {
        Self::new(labels.iter().map(|label| CandidateId::new(*label)).collect())
    }

    pub(crate) fn from_unique(ranking: Vec<CandidateId>) -> Self {
        Self { ranking }
    }

    /// Candidates in preference order.
    pub fn ranking(&self) -> &[CandidateId] {
        &self.ranking
    }

    /// Most preferred candidate, if any.
    pub fn first(&self) -> Option<&CandidateId> {
        self.ranking.first()
    }

    /// Number of ranked candidates.
    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    /// True when the ballot ranks nobody.
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}

impl TryFrom<Vec<CandidateId>> for Ballot {
    type Error = VoteError;

    fn try_from(ranking: Vec<CandidateId>) -> Result<Self, Self::Error> {
        Self::new(ranking)
    }
}

impl From<Ballot> for Vec<CandidateId> {
    fn from(ballot: Ballot) -> Self {
        ballot.ranking
    }
}

/// Serialized form of one profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
    /// Ranked candidates.
    pub ranking: Ballot,
    /// Number of identical ballots.
    pub count: u64,
}

/// Multiset of ballots keyed by content.
///
/// Rows are held in ballot order so two profiles built from the same draws
/// compare and serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ProfileEntry>", into = "Vec<ProfileEntry>")]
pub struct BallotProfile {
    counts: BTreeMap<Ballot, u64>,
    total: u64,
}

impl BallotProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` copies of `ballot`.
    pub fn add(&mut self, ballot: Ballot, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(ballot).or_insert(0) += count;
        self.total += count;
    }

    /// Total number of ballots, counting repeats.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct ballots.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// True when no ballot was added.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterates distinct ballots with their counts in ballot order.
    pub fn iter(&self) -> impl Iterator<Item = (&Ballot, u64)> + '_ {
        self.counts.iter().map(|(b, c)| (b, *c))
    }

    /// Number of ballots ranking each candidate first.
    pub fn first_preferences(&self) -> BTreeMap<CandidateId, u64> {
        let mut tally = BTreeMap::new();
        for (ballot, count) in self.iter() {
            if let Some(first) = ballot.first() {
                *tally.entry(first.clone()).or_insert(0) += count;
            }
        }
        tally
    }

    /// Every candidate named on at least one ballot.
    pub fn named_candidates(&self) -> BTreeSet<CandidateId> {
        self.counts
            .keys()
            .flat_map(|ballot| ballot.ranking().iter().cloned())
            .collect()
    }
}

impl FromIterator<(Ballot, u64)> for BallotProfile {
    fn from_iter<T: IntoIterator<Item = (Ballot, u64)>>(iter: T) -> Self {
        let mut profile = Self::new();
        for (ballot, count) in iter {
            profile.add(ballot, count);
        }
        profile
    }
}

impl From<Vec<ProfileEntry>> for BallotProfile {
    fn from(entries: Vec<ProfileEntry>) -> Self {
        entries
            .into_iter()
            .map(|entry| (entry.ranking, entry.count))
            .collect()
    }
}

impl From<BallotProfile> for Vec<ProfileEntry> {
    fn from(profile: BallotProfile) -> Self {
        profile
            .counts
            .into_iter()
            .map(|(ranking, count)| ProfileEntry { ranking, count })
            .collect()
    }
}
