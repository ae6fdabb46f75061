use serde::Serialize;
use tracing::trace;

use crate::model::{
    bias_correction,
    constants::NEUTRAL_RESULT,
    parameters::Parameters,
    rating_utils::{expectation, result_first, weighting},
    structures::{bout::Bout, fencer::Fencer, side::Side}
};

/// What a single bout does to its two fencers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BoutEvaluation {
    /// Both fencers are freshmen, the bout cannot be counted
    Skipped,
    /// Exactly one fencer is a freshman; only their statistics change
    FreshmanTally { freshman: Side, tally: Tally },
    Rated(RatedBout)
}

/// Contribution of one bout to a freshman's statistics. `result` and
/// `opponent_rating` are already weighted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tally {
    pub weighting: f64,
    pub result: f64,
    pub opponent_rating: f64
}

/// Preliminary rating changes of a bout between two rated fencers.
/// A delta is `None` for a foreign fencer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatedBout {
    pub weighting: f64,
    pub expectation: f64,
    pub improvement: f64,
    pub delta_first: Option<f64>,
    pub delta_second: Option<f64>
}

impl RatedBout {
    pub fn delta(&self, side: Side) -> Option<f64> {
        match side {
            Side::First => self.delta_first,
            Side::Second => self.delta_second
        }
    }
}

pub struct RatingEngine<'a> {
    parameters: &'a Parameters
}

impl<'a> RatingEngine<'a> {
    pub fn new(parameters: &'a Parameters) -> RatingEngine<'a> {
        RatingEngine { parameters }
    }

    /// # Felo bout rating
    ///
    /// Evaluates a bout against the fencers' current (committed) ratings.
    /// Nothing is written here; the caller stages the result.
    ///
    /// 1. The bout is weighted by its total points (or the team bout weighting
    ///     for relay bouts), the result is the fraction of points won.
    /// 2. Bouts with a freshman only feed the freshman's estimate.
    /// 3. Otherwise the Elo expectation value is compared with the result.
    ///     Relay bouts are not weighted by their points, so their expectation
    ///     is corrected for the winning-hit bias first.
    pub fn process_bout(&self, first: &Fencer, second: &Fencer, bout: &Bout) -> BoutEvaluation {
        let weighting = weighting(bout, self.parameters);
        let result_first = result_first(bout);

        let (rating_first, rating_second) = match (first.known_rating(), second.known_rating()) {
            (None, None) => {
                trace!(bout = %bout, "Two freshmen, bout skipped");
                return BoutEvaluation::Skipped;
            }
            (None, Some(opponent_rating)) => {
                return BoutEvaluation::FreshmanTally {
                    freshman: Side::First,
                    tally: Tally {
                        weighting,
                        result: (result_first - NEUTRAL_RESULT) * weighting,
                        opponent_rating: opponent_rating * weighting
                    }
                };
            }
            (Some(opponent_rating), None) => {
                return BoutEvaluation::FreshmanTally {
                    freshman: Side::Second,
                    tally: Tally {
                        weighting,
                        result: (NEUTRAL_RESULT - result_first) * weighting,
                        opponent_rating: opponent_rating * weighting
                    }
                };
            }
            (Some(a), Some(b)) => (a, b)
        };

        let mut expectation_first = expectation(rating_first, rating_second);
        if bout.is_relay() {
            if let Some(corrected) = bias_correction::correct(expectation_first, bout.max_points()) {
                expectation_first = corrected;
            }
        }

        let improvement = (result_first - expectation_first) * weighting;
        trace!(
            bout = %bout,
            expectation = expectation_first,
            improvement,
            regime_first = %first.regime(self.parameters),
            regime_second = %second.regime(self.parameters),
            "Bout rated"
        );

        let delta = |fencer: &Fencer, sign: f64| {
            (!fencer.foreign).then(|| sign * fencer.k_factor(self.parameters) * improvement)
        };

        BoutEvaluation::Rated(RatedBout {
            weighting,
            expectation: expectation_first,
            improvement,
            delta_first: delta(first, 1.0),
            delta_second: delta(second, -1.0)
        })
    }
}
