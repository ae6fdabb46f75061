use crate::model::{
    constants::{ESTIMATE_PRIOR_WEIGHTING, ESTIMATE_SPREAD},
    parameters::Parameters,
    structures::{fencer::Fencer, rating_state::RatingState}
};

/// Estimates the rating of a freshman with the "Austrian method"
/// (Österreichischer Schachbund, Turnierordnung 2006, section 5.1):
///
/// `average opponent rating + A * B * 700` with `A` the average result
/// above 0.5 and `B = W / (W + 2)` damping small total weightings `W`.
///
/// Returns 0.0 (no estimate) while the freshman's total weighting is below
/// `estimate_weighting_threshold`, and for fencers who are not freshmen.
/// The estimate is never written into the fencer; see [`Fencer::promote`].
pub fn estimate(fencer: &Fencer, parameters: &Parameters) -> f64 {
    let RatingState::Estimating {
        total_result,
        total_opponent_rating
    } = *fencer.rating_state()
    else {
        return 0.0;
    };

    let total_weighting = fencer.total_weighting();
    if total_weighting == 0.0 || total_weighting < parameters.estimate_weighting_threshold {
        return 0.0;
    }

    let a = total_result / total_weighting;
    let b = total_weighting / (total_weighting + ESTIMATE_PRIOR_WEIGHTING);
    let average_opponent_rating = total_opponent_rating / total_weighting;

    average_opponent_rating + a * b * ESTIMATE_SPREAD
}

pub fn has_estimate(fencer: &Fencer, parameters: &Parameters) -> bool {
    estimate(fencer, parameters) != 0.0
}
