use serde::Serialize;

/// Rating of a fencer. A freshman has no rating yet; only the statistics
/// needed to estimate one are accumulated.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub enum RatingState {
    Known(f64),
    Estimating {
        /// Weighted sum of the results minus 0.5
        total_result: f64,
        /// Weighted sum of the opponents' ratings
        total_opponent_rating: f64
    }
}

impl RatingState {
    pub fn estimating() -> RatingState {
        RatingState::Estimating {
            total_result: 0.0,
            total_opponent_rating: 0.0
        }
    }

    pub fn known(&self) -> Option<f64> {
        match self {
            RatingState::Known(rating) => Some(*rating),
            RatingState::Estimating { .. } => None
        }
    }

    pub fn is_estimating(&self) -> bool {
        matches!(self, RatingState::Estimating { .. })
    }
}
