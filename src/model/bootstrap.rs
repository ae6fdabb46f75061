use serde::Serialize;
use tracing::{debug, info, warn};

use crate::model::{
    batch_committer::BatchCommitter,
    constants::BOOTSTRAP_PROGRESS_INTERVAL,
    error::FeloError,
    parameters::Parameters,
    roster::Roster,
    schedule::Schedule
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapOutcome {
    /// Number of passes run, including the converging one
    pub cycles: usize,
    /// Largest rating change of the last pass
    pub max_deviation: f64
}

/// Replays the whole bout history until the ratings are consistent with it,
/// i.e. no rating changes by `bootstrap_threshold` or more during a pass.
///
/// Every cycle starts from the ratings and total weightings the previous one
/// ended with, so after the first cycles every fencer is past the freshmen
/// k factor. Freshman statistics are cleared before each cycle; a freshman's
/// estimate always covers the history exactly once.
///
/// `progress` is called every 10 cycles with the fraction of the cycle
/// budget used so far. If the last allowed cycle does not converge, the
/// ratings are left as they are and [`FeloError::Convergence`] is returned.
pub fn bootstrap<F>(
    roster: &mut Roster,
    schedule: &Schedule,
    parameters: &Parameters,
    mut progress: F
) -> Result<BootstrapOutcome, FeloError>
where
    F: FnMut(f64)
{
    let max_cycles = parameters.max_bootstrap_cycles;
    let mut committer = BatchCommitter::new(parameters);
    let mut max_deviation = 0.0;

    info!(max_cycles, threshold = parameters.bootstrap_threshold, "Bootstrapping");

    for cycle in 0..max_cycles {
        if cycle % BOOTSTRAP_PROGRESS_INTERVAL == 0 {
            progress(cycle as f64 / (max_cycles - 1) as f64);
        }

        let old_ratings = roster.known_ratings();

        roster.reset_freshman_tallies();
        committer.pass(roster, schedule);

        max_deviation = max_rating_deviation(&old_ratings, &roster.known_ratings());
        debug!(cycle, max_deviation, "Bootstrap cycle complete");

        if max_deviation < parameters.bootstrap_threshold {
            let outcome = BootstrapOutcome {
                cycles: cycle + 1,
                max_deviation
            };
            info!(cycles = outcome.cycles, max_deviation, "Bootstrapping converged");

            return Ok(outcome);
        }
    }

    warn!(max_cycles, max_deviation, "Bootstrapping did not converge");

    Err(FeloError::Convergence {
        cycles: max_cycles,
        max_deviation
    })
}

/// Largest absolute change between two snapshots of [`Roster::known_ratings`].
/// Freshmen (`None`) are ignored.
fn max_rating_deviation(old: &[Option<f64>], new: &[Option<f64>]) -> f64 {
    old.iter()
        .zip(new)
        .filter_map(|(old, new)| Some((old.as_ref()? - new.as_ref()?).abs()))
        .fold(0.0, f64::max)
}
