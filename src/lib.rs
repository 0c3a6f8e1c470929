//! Single-winner election tabulation with instant-runoff voting.
//!
//! Voters rank every candidate on the ballot. Each counting round gives a
//! ballot's vote to its highest-ranked candidate still standing; without a
//! strict majority the last-place candidate is eliminated and the round
//! repeats, until a winner emerges or the remaining field is completely
//! tied.
//!
//! ```
//! use rankvote::Election;
//!
//! let mut election = Election::new(vec![
//!     "Alice".to_string(),
//!     "Bob".to_string(),
//! ])?;
//! election.add_ballot(&["Alice".to_string(), "Bob".to_string()])?;
//! election.add_ballot(&["Alice".to_string(), "Bob".to_string()])?;
//! election.add_ballot(&["Bob".to_string(), "Alice".to_string()])?;
//!
//! assert_eq!(election.run_election()?, "Alice");
//! # Ok::<(), rankvote::ElectionError>(())
//! ```

pub mod engine;
pub mod report;

pub use crate::engine::{Election, ElectionError, Result, Round, Tabulation};
pub use crate::report::{ElectionReport, ReportError, ReportResult, ResultSummary};
