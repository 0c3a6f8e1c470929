use clap::Parser;
use colored::*;
use rankvote::engine::{Election, Tabulation};
use rankvote::report;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Tabulate a single-winner election with instant-runoff voting.
///
/// Prompts for one fully ranked ballot per voter, then runs elimination
/// rounds until a candidate holds a strict majority.
#[derive(Parser)]
#[clap(name = "rankvote", version)]
struct Opts {
    /// Candidate names, in ballot order.
    #[clap(required = true, min_values = 2)]
    candidates: Vec<String>,
    /// Write a round-by-round JSON report to this path.
    #[clap(long)]
    report: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let opts = Opts::parse();

    let election = match Election::new(opts.candidates) {
        Ok(election) => election,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(election, opts.report.as_deref()) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run(mut election: Election, report_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    collect_ballots(&mut election)?;

    let tabulation = election.tabulate()?;
    println!();
    print_rounds(&tabulation);

    let winner = tabulation.winner.clone();
    if let Some(path) = report_path {
        let report = report::build_report(&election, tabulation);
        report::write_report(&report, path)?;
        println!("\n✅ Report written to {}", path.display().to_string().bright_green());
    }

    match winner {
        Some(name) => println!("\n🎉 Winner: {}", name.bright_green().bold()),
        None => {
            println!(
                "\n❌ {}",
                "No winner: every remaining candidate is tied".red()
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Prompt for the voter count, then collect one full ranking per voter.
/// Invalid input re-prompts instead of aborting the election.
fn collect_ballots(election: &mut Election) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let num_voters = loop {
        let line = prompt(&mut input, "Number of voters: ")?;
        match line.parse::<usize>() {
            Ok(count) => break count,
            Err(_) => println!("Invalid number of voters"),
        }
    };

    println!("\nCandidates: {}", election.candidates().join(", ").cyan());
    println!("Rank candidates from most preferred (1) to least preferred.\n");

    for voter in 1..=num_voters {
        println!("Voter {}:", voter);
        loop {
            let ranking = read_ranking(&mut input, election.candidates())?;
            match election.add_ballot(&ranking) {
                Ok(()) => break,
                Err(e) => println!("  {} {}", "Ballot rejected:".red(), e),
            }
        }
        println!();
    }

    Ok(())
}

/// Read one ranking, one choice per prompt, re-prompting on any name that
/// is not an unranked registered candidate.
fn read_ranking(input: &mut impl BufRead, candidates: &[String]) -> io::Result<Vec<String>> {
    let mut ranking: Vec<String> = Vec::with_capacity(candidates.len());

    for rank in 1..=candidates.len() {
        loop {
            let choice = prompt(input, &format!("  Rank {}: ", rank))?;
            if candidates.contains(&choice) && !ranking.contains(&choice) {
                ranking.push(choice);
                break;
            }
            println!("  Invalid choice. Must be a candidate not already ranked.");
        }
    }

    Ok(ranking)
}

fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input ended before all ballots were collected",
        ));
    }
    Ok(line.trim().to_string())
}

fn print_rounds(tabulation: &Tabulation) {
    for round in &tabulation.rounds {
        println!("📊 Round {}", round.round.to_string().bright_yellow());

        let total: u64 = round.tally.values().sum();
        let mut tally: Vec<_> = round.tally.iter().collect();
        tally.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (name, count) in tally {
            let percentage = if total > 0 {
                *count as f64 * 100.0 / total as f64
            } else {
                0.0
            };
            println!("  {}: {} votes ({:.1}%)", name.cyan(), count, percentage);
        }
        if round.exhausted > 0 {
            println!("  {} exhausted ballots", round.exhausted);
        }
        if let Some(name) = &round.eliminated {
            println!("  Eliminating {}", name.red());
        }
    }
}
