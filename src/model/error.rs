use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Malformed input, detected before any rating is touched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Fencer \"{0}\" is unknown")]
    UnknownFencer(String),

    #[error("Fencer \"{0}\" is declared more than once")]
    DuplicateFencer(String),

    #[error("Foreign fencer \"{0}\" has an invalid Felo rating")]
    InvalidForeignRating(String),

    #[error("Declaration \"{name}\" is invalid: {reason}")]
    InvalidDeclaration { name: String, reason: String },

    #[error("Bout {date} {first} -- {second}: one fencer has more points than the winning points ({fenced_to})")]
    PointsExceedWinningThreshold {
        date: NaiveDate,
        first: String,
        second: String,
        fenced_to: u32
    },

    #[error("Invalid date string \"{0}\", expected YYYY-MM-DD or YYYY-MM-DD.I")]
    InvalidDate(String),

    #[error("Bout {date}: \"{name}\" cannot fence against themselves")]
    SelfBout { date: NaiveDate, name: String },

    #[error("Parameter \"{name}\" is invalid: {reason}")]
    InvalidParameter { name: &'static str, reason: String }
}

/// The prediction tables could not be used.
#[derive(Debug, Error)]
pub enum ExternalAssetError {
    #[error("Win probability table {0} was not found")]
    Missing(PathBuf),

    #[error("Failed to read win probability table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("Win probability table {path}, line {line}: {reason}")]
    Malformed { path: PathBuf, line: usize, reason: String },

    #[error("No win probability table for bouts fenced to {0}")]
    UnsupportedFencedTo(u32)
}

#[derive(Debug, Error)]
pub enum FeloError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("The bootstrapping didn't converge after {cycles} cycles (largest change {max_deviation})")]
    Convergence { cycles: usize, max_deviation: f64 },

    #[error(transparent)]
    ExternalAsset(#[from] ExternalAssetError)
}
