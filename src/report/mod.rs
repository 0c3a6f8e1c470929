//! Round-by-round election reports in a stable JSON shape.

use crate::engine::{Election, ElectionError, Round, Tabulation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Election error: {0}")]
    Election(#[from] ElectionError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Full election report: who ran, how many ballots were cast, what
/// happened each round, and how it ended.
#[derive(Debug, Serialize, Deserialize)]
pub struct ElectionReport {
    pub candidates: Vec<String>,
    #[serde(rename = "ballotCount")]
    pub ballot_count: u64,
    pub results: Vec<Round>,
    pub summary: ResultSummary,
}

/// Result summary. `winner` is absent for an undecidable election.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultSummary {
    pub winner: Option<String>,
    #[serde(rename = "totalRounds")]
    pub total_rounds: u64,
    #[serde(rename = "totalBallots")]
    pub total_ballots: u64,
}

/// Assemble the report for an already-completed tabulation.
pub fn build_report(election: &Election, tabulation: Tabulation) -> ElectionReport {
    let ballot_count = election.ballot_count() as u64;
    let summary = ResultSummary {
        winner: tabulation.winner,
        total_rounds: tabulation.rounds.len() as u64,
        total_ballots: ballot_count,
    };

    ElectionReport {
        candidates: election.candidates().to_vec(),
        ballot_count,
        results: tabulation.rounds,
        summary,
    }
}

/// Tabulate the election and assemble its report. Undecidable elections
/// still produce a report, with no winner in the summary.
pub fn generate_report(election: &mut Election) -> ReportResult<ElectionReport> {
    let tabulation = election.tabulate()?;
    Ok(build_report(election, tabulation))
}

/// Write a report to disk as pretty-printed JSON.
pub fn write_report(report: &ElectionReport, path: &Path) -> ReportResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    fn runoff_election() -> Election {
        let mut election = Election::new(names(&["Alice", "Bob", "Charlie"])).unwrap();
        for ballot in [
            ["Alice", "Bob", "Charlie"],
            ["Alice", "Charlie", "Bob"],
            ["Bob", "Alice", "Charlie"],
            ["Bob", "Charlie", "Alice"],
            ["Charlie", "Alice", "Bob"],
        ]
        .iter()
        {
            election.add_ballot(&names(ballot)).unwrap();
        }
        election
    }

    #[test]
    fn test_report_summarizes_the_tabulation() {
        let mut election = runoff_election();
        let report = generate_report(&mut election).unwrap();

        assert_eq!(report.candidates, names(&["Alice", "Bob", "Charlie"]));
        assert_eq!(report.ballot_count, 5);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.summary.winner, Some("Alice".to_string()));
        assert_eq!(report.summary.total_rounds, 2);
        assert_eq!(report.summary.total_ballots, 5);
    }

    #[test]
    fn test_undecidable_election_still_reports() {
        let mut election = Election::new(names(&["X", "Y"])).unwrap();
        election.add_ballot(&names(&["X", "Y"])).unwrap();
        election.add_ballot(&names(&["Y", "X"])).unwrap();

        let report = generate_report(&mut election).unwrap();
        assert_eq!(report.summary.winner, None);
        assert_eq!(report.results.len(), 1);
    }
}
