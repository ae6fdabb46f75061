use std::{cmp::Ordering, fmt};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::error::ValidationError;

/// A single bout between two fencers.
///
/// `fenced_to` is the number of winning points; 0 means the bout was one
/// leg of a team relay. Bouts on the same `date` have no known order among
/// each other; `index` splits a day into consecutive groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bout {
    pub date: NaiveDate,
    #[serde(default)]
    pub index: u32,
    pub first_fencer: String,
    pub second_fencer: String,
    pub points_first: u32,
    pub points_second: u32,
    pub fenced_to: u32
}

impl Bout {
    pub fn new(
        date: NaiveDate,
        index: u32,
        first_fencer: impl Into<String>,
        second_fencer: impl Into<String>,
        points_first: u32,
        points_second: u32,
        fenced_to: Option<u32>
    ) -> Bout {
        Bout {
            date,
            index,
            first_fencer: first_fencer.into(),
            second_fencer: second_fencer.into(),
            points_first,
            points_second,
            fenced_to: fenced_to.unwrap_or(points_first.max(points_second))
        }
    }

    /// Relay legs have no winning threshold, so the sum is widened.
    pub fn total_points(&self) -> u64 {
        u64::from(self.points_first) + u64::from(self.points_second)
    }

    pub fn max_points(&self) -> u32 {
        self.points_first.max(self.points_second)
    }

    pub fn is_relay(&self) -> bool {
        self.fenced_to == 0
    }

    /// Bouts with the same key are rated from the same starting ratings.
    pub fn batch_key(&self) -> (NaiveDate, u32) {
        (self.date, self.index)
    }

    /// Proleptic Gregorian ordinal of the date, 0001-01-01 being day 1.
    pub fn day_ordinal(&self) -> i32 {
        self.date.num_days_from_ce()
    }

    /// `YYYY-MM-DD`, followed by `.I` if the index is not 0.
    pub fn date_string(&self) -> String {
        match self.index {
            0 => self.date.format("%Y-%m-%d").to_string(),
            i => format!("{}.{}", self.date.format("%Y-%m-%d"), i)
        }
    }

    /// Parses a `YYYY-MM-DD` or `YYYY-MM-DD.I` date string.
    pub fn parse_date_string(date_string: &str) -> Result<(NaiveDate, u32), ValidationError> {
        let invalid = || ValidationError::InvalidDate(date_string.to_string());
        let trimmed = date_string.trim();

        let (date, index) = match trimmed.split_once('.') {
            Some((date, index)) => (date, index.parse::<u32>().map_err(|_| invalid())?),
            None => (trimmed, 0)
        };

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())?;

        Ok((date, index))
    }

    /// Chronological order: by date, then by index.
    pub fn chronological_cmp(&self, other: &Bout) -> Ordering {
        self.batch_key().cmp(&other.batch_key())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.first_fencer == self.second_fencer {
            return Err(ValidationError::SelfBout {
                date: self.date,
                name: self.first_fencer.clone()
            });
        }

        if !self.is_relay() && self.max_points() > self.fenced_to {
            return Err(ValidationError::PointsExceedWinningThreshold {
                date: self.date,
                first: self.first_fencer.clone(),
                second: self.second_fencer.clone(),
                fenced_to: self.fenced_to
            });
        }

        Ok(())
    }
}

impl fmt::Display for Bout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{} -- {}\t{}:{}",
            self.date_string(),
            self.first_fencer,
            self.second_fencer,
            self.points_first,
            self.points_second
        )?;

        if self.is_relay() {
            write!(f, " *")
        } else if self.max_points() != self.fenced_to {
            write!(f, "/{}", self.fenced_to)
        } else {
            Ok(())
        }
    }
}
