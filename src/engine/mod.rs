//! Election-state engine for single-winner instant-runoff voting.
//!
//! An [`Election`] owns the fixed candidate registry, the accepted
//! ballots, and the set of eliminated candidates. Rounds of counting
//! transfer each ballot's vote to its highest-ranked candidate still
//! standing until someone holds a strict majority or the remaining field
//! is completely tied.

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElectionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Ballot ranks {actual} candidates, expected {expected}")]
    BallotLength { expected: usize, actual: usize },
    #[error("Unknown candidate: {0}")]
    UnknownCandidate(String),
    #[error("Candidate ranked more than once: {0}")]
    DuplicateCandidate(String),
    #[error("Candidate already eliminated: {0}")]
    AlreadyEliminated(String),
    #[error("Undecidable election: every remaining candidate is tied")]
    UndecidableElection,
}

pub type Result<T> = std::result::Result<T, ElectionError>;

/// One tabulation round: the tally over the candidates still standing,
/// the candidate eliminated at the end of the round (none in a terminal
/// round), and the number of exhausted ballots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub round: u64,
    pub tally: HashMap<String, u64>,
    pub eliminated: Option<String>,
    pub exhausted: u64,
}

/// Outcome of driving an election to termination. `winner` is `None`
/// when the remaining field ended completely tied.
#[derive(Debug, Clone)]
pub struct Tabulation {
    pub winner: Option<String>,
    pub rounds: Vec<Round>,
}

/// Instant-runoff election state.
///
/// The candidate set is fixed at construction; ballots are validated
/// against it and never mutated after acceptance. Eliminations are
/// permanent. The engine does no I/O and exposes its collections only
/// as copies or read-only views.
#[derive(Debug, Clone)]
pub struct Election {
    candidates: Vec<String>,
    ballots: Vec<Vec<String>>,
    eliminated: HashSet<String>,
}

impl Election {
    /// Create an election over the given candidates. At least two
    /// distinct names are required for a runoff to mean anything.
    pub fn new(candidates: Vec<String>) -> Result<Election> {
        if candidates.len() < 2 {
            return Err(ElectionError::InvalidConfiguration(format!(
                "need at least 2 candidates, got {}",
                candidates.len()
            )));
        }
        if let Some(name) = candidates.iter().duplicates().next() {
            return Err(ElectionError::InvalidConfiguration(format!(
                "duplicate candidate: {}",
                name
            )));
        }

        Ok(Election {
            candidates,
            ballots: Vec::new(),
            eliminated: HashSet::new(),
        })
    }

    /// Candidate names in registration order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Accepted ballots, in submission order.
    pub fn ballots(&self) -> &[Vec<String>] {
        &self.ballots
    }

    pub fn ballot_count(&self) -> usize {
        self.ballots.len()
    }

    fn is_registered(&self, name: &str) -> bool {
        self.candidates.iter().any(|candidate| candidate == name)
    }

    /// Validate and store one voter's full ranking.
    ///
    /// The ranking must list every registered candidate exactly once.
    /// Checks run in order (length, then unknown names, then repeats) and
    /// the first failure rejects the ballot with the store unchanged.
    pub fn add_ballot(&mut self, ranking: &[String]) -> Result<()> {
        if ranking.len() != self.candidates.len() {
            return Err(ElectionError::BallotLength {
                expected: self.candidates.len(),
                actual: ranking.len(),
            });
        }
        if let Some(name) = ranking.iter().find(|name| !self.is_registered(name)) {
            return Err(ElectionError::UnknownCandidate(name.clone()));
        }
        if let Some(name) = ranking.iter().duplicates().next() {
            return Err(ElectionError::DuplicateCandidate(name.clone()));
        }

        self.ballots.push(ranking.to_vec());
        Ok(())
    }

    /// Candidates not yet eliminated, as an unordered set.
    pub fn get_remaining_candidates(&self) -> HashSet<String> {
        self.candidates
            .iter()
            .filter(|name| !self.eliminated.contains(*name))
            .cloned()
            .collect()
    }

    /// Tally the current round: each ballot's highest-ranked candidate
    /// still standing gets one vote. Ballots whose every choice has been
    /// eliminated are exhausted and count for no one.
    ///
    /// Every remaining candidate appears in the table, so the key set
    /// always matches [`Election::get_remaining_candidates`].
    pub fn get_vote_counts(&self) -> HashMap<String, u64> {
        let mut counts: HashMap<String, u64> = self
            .get_remaining_candidates()
            .into_iter()
            .map(|name| (name, 0))
            .collect();

        for ballot in &self.ballots {
            // First choice still in the running, if any
            let choice = ballot.iter().find(|name| !self.eliminated.contains(*name));
            if let Some(name) = choice {
                if let Some(count) = counts.get_mut(name) {
                    *count += 1;
                }
            }
        }

        counts
    }

    /// The candidate holding a strict majority of this round's votes, if
    /// any. Exactly half is not a majority, and a round with no active
    /// votes has no winner.
    pub fn has_majority_winner(&self, vote_counts: &HashMap<String, u64>) -> Option<String> {
        let total: u64 = vote_counts.values().sum();
        vote_counts
            .iter()
            .find(|(_, &count)| count * 2 > total)
            .map(|(name, _)| name.clone())
    }

    /// Every candidate tied for the fewest votes, sorted by name so
    /// callers see a deterministic order.
    pub fn find_last_place(&self, vote_counts: &HashMap<String, u64>) -> Vec<String> {
        let mut last_place: Vec<String> = vote_counts
            .iter()
            .min_set_by_key(|&(_, count)| *count)
            .into_iter()
            .map(|(name, _)| name.clone())
            .collect();
        last_place.sort();
        last_place
    }

    /// True when every listed candidate holds the same vote count.
    /// Candidates absent from the table count as zero.
    pub fn is_tie(&self, vote_counts: &HashMap<String, u64>, candidates: &[String]) -> bool {
        candidates
            .iter()
            .map(|name| vote_counts.get(name).copied().unwrap_or(0))
            .all_equal()
    }

    /// Remove a candidate from all future rounds. Irreversible.
    pub fn eliminate_candidate(&mut self, name: &str) -> Result<()> {
        if !self.is_registered(name) {
            return Err(ElectionError::UnknownCandidate(name.to_string()));
        }
        if self.eliminated.contains(name) {
            return Err(ElectionError::AlreadyEliminated(name.to_string()));
        }

        self.eliminated.insert(name.to_string());
        Ok(())
    }

    /// Drive the election to termination, recording every round.
    ///
    /// Each round tallies, checks for a strict majority, and otherwise
    /// eliminates the last-place candidate, breaking ties for last toward
    /// the lexicographically first name. The loop terminates because the
    /// remaining field strictly shrinks every non-terminal round; a field
    /// where everyone is tied with everyone ends the tabulation with no
    /// winner so the rounds can still be reported.
    pub fn tabulate(&mut self) -> Result<Tabulation> {
        let mut rounds: Vec<Round> = Vec::new();

        loop {
            let round = rounds.len() as u64 + 1;
            let tally = self.get_vote_counts();
            let active: u64 = tally.values().sum();
            let exhausted = self.ballots.len() as u64 - active;

            if let Some(winner) = self.has_majority_winner(&tally) {
                debug!("round {}: {} holds a majority of {} active votes", round, winner, active);
                rounds.push(Round { round, tally, eliminated: None, exhausted });
                return Ok(Tabulation { winner: Some(winner), rounds });
            }

            let mut last_place = self.find_last_place(&tally);
            if last_place.len() == tally.len() {
                debug!("round {}: all {} remaining candidates tied", round, tally.len());
                rounds.push(Round { round, tally, eliminated: None, exhausted });
                return Ok(Tabulation { winner: None, rounds });
            }

            // Non-empty here: an empty tally would have taken the
            // all-tied branch above.
            let eliminated = last_place.remove(0);
            self.eliminate_candidate(&eliminated)?;
            debug!("round {}: eliminating {}", round, eliminated);
            rounds.push(Round { round, tally, eliminated: Some(eliminated), exhausted });
        }
    }

    /// Run instant-runoff rounds until a single winner emerges.
    ///
    /// Fails with [`ElectionError::UndecidableElection`] when every
    /// remaining candidate is tied with every other, leaving no
    /// principled eliminee.
    pub fn run_election(&mut self) -> Result<String> {
        match self.tabulate()?.winner {
            Some(winner) => Ok(winner),
            None => Err(ElectionError::UndecidableElection),
        }
    }
}
