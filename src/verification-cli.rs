//! A simple CLI tool for checking a dump of the ballot log.
//! This uses the server's own verification implementation, and is by definition
//! compatible with the output of `GET /results/dump`.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;

use clap::{Arg, ArgAction, ArgMatches, Command};
use rocket::serde::json::serde_json;

use urna_backend::model::{
    api::{BallotDump, VerificationError},
    common::Category,
};

const PROGRAM_NAME: &str = "verify-urna";

const ABOUT_TEXT: &str = "Verify the consistency of a ballot log dump.

EXIT CODES:
     0: Verification succeeded.
   255: Ran successfully, but verification failed.
 Other: Error.";

const DUMP_PATH: &str = "DUMP_PATH";

const DUMP_PATH_HELP: &str = "The path to a JSON dump of the ballot log,\n\
as returned by `GET /results/dump`";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME).about(ABOUT_TEXT).arg(
        Arg::new(DUMP_PATH)
            .help(DUMP_PATH_HELP)
            .action(ArgAction::Set)
            .required(true),
    )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the JSON dump.
    Format(String),
    /// Verification failed due to the contained reason.
    Verification(VerificationError),
}

/// The verified result for a single candidate.
#[derive(Debug, Eq, PartialEq)]
struct FriendlyResults {
    pub candidate_name: String,
    pub category: Category,
    pub tally: u64,
}

impl Display for FriendlyResults {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {} vote{}",
            self.category,
            self.candidate_name,
            self.tally,
            if self.tally != 1 { "s" } else { "" },
        )
    }
}

/// Run verification.
fn verify(path: &str) -> Result<Vec<FriendlyResults>, Error> {
    // Load the file.
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(e.to_string()))?);
    let dump: BallotDump =
        serde_json::from_reader(file).map_err(|e| Error::Format(e.to_string()))?;

    // Run verification.
    dump.verify().map_err(Error::Verification)?;

    // Verified tallies are exact, so they can be reported as-is.
    let mut results_list = dump
        .candidates
        .into_iter()
        .map(|desc| FriendlyResults {
            candidate_name: desc.candidate.name,
            category: desc.candidate.category,
            tally: desc.vote_count,
        })
        .collect::<Vec<_>>();

    // Order by tally, then name.
    results_list.sort_unstable_by(|a, b| a.candidate_name.cmp(&b.candidate_name));
    results_list.sort_by(|a, b| b.tally.cmp(&a.tally));

    Ok(results_list)
}

/// Run verification, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(DUMP_PATH).unwrap(); // Required argument is guaranteed to be present.
    match verify(path) {
        Ok(friendly_results) => {
            println!("Verification succeeded.");
            for result in friendly_results {
                println!("{}", result);
            }
            0
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {}", msg);
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid JSON: {}", msg);
            1
        }
        Err(Error::Verification(err)) => {
            println!("Verification failed: {}.", err);
            255
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}
