use std::path::PathBuf;

use clap::Parser;

use crate::model::roster::Adoption;

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "Felo Processor",
    author = "Felo",
    long_about = "Calculates Felo ratings of fencers from their bouts"
)]
pub struct Args {
    /// JSON file with parameters, fencers and bouts
    #[arg(env = "FELO_INPUT", help = "Felo input file (JSON)")]
    pub input: PathBuf,

    /// Estimates starting ratings that are consistent with the bout history
    /// before calculating. Changes the initial ratings of all fencers.
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub bootstrap: bool,

    /// Overrides the maxBootstrapCycles parameter of the input file
    #[arg(long, value_name = "NUMBER")]
    pub max_cycles: Option<usize>,

    /// Writes the rating report as JSON to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Writes the plot data (tab separated, one row per day) to this file
    #[arg(short, long, value_name = "FILE")]
    pub plot_data: Option<PathBuf>,

    /// Estimates ratings for freshmen who have fenced enough bouts
    #[arg(short, long, action = clap::ArgAction::SetTrue, conflicts_with = "bootstrap")]
    pub estimate_freshmen: bool,

    /// Writes the bootstrapped ratings or the freshman estimates back into the input file
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub write_back: bool,

    /// Prognosticates a bout between two fencers instead of printing the ranking
    #[arg(long, num_args = 2, value_names = ["FIRST", "SECOND"])]
    pub predict: Option<Vec<String>>,

    /// Winning points of the prognosticated bout
    #[arg(long, default_value_t = 5)]
    pub fenced_to: u32,

    /// Directory containing the aufN.dat win probability tables
    #[arg(long, env = "FELO_TABLES", default_value = "data")]
    pub tables: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}

impl Args {
    /// What `--write-back` copies into the input file, if anything.
    pub fn adoption(&self) -> Option<Adoption> {
        if !self.write_back {
            None
        } else if self.bootstrap {
            Some(Adoption::RatedFencers)
        } else if self.estimate_freshmen {
            Some(Adoption::Freshmen)
        } else {
            None
        }
    }
}
