use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{constants::*, error::ValidationError};

/// Felo parameters. Every option has a default, so an empty JSON object
/// deserializes into [`Parameters::default`]. Call [`Parameters::validate`]
/// (or use [`Parameters::new`]) before handing them to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Parameters {
    /// k factor of fencers whose rating once reached `rating_top_threshold`
    pub k_factor_top: f64,
    pub rating_top_threshold: f64,
    pub k_factor_others: f64,
    pub k_factor_freshmen: f64,
    /// Below this total weighting (in 5-point bouts) the freshmen k factor applies
    pub freshman_weighting_threshold: f64,
    /// Floor for every written rating
    pub minimal_rating: f64,
    /// Total weighting a freshman needs before an estimate is given
    pub estimate_weighting_threshold: f64,
    /// Weighting of a single relay bout in a team competition
    pub team_bout_weighting: f64,
    pub bootstrap_threshold: f64,
    pub max_bootstrap_cycles: usize,
    /// Label of this group of fencers in reports
    pub group_name: String,
    pub plot: PlotSettings
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlotSettings {
    pub earliest_date: NaiveDate,
    /// Days before "today" after which bouts are no longer plotted
    pub maximal_days: i64,
    /// Minimal distance in days between two labelled tic marks
    pub min_tic_distance: i64
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            earliest_date: DEFAULT_PLOT_EARLIEST_DATE
                .parse()
                .unwrap_or(NaiveDate::MIN),
            maximal_days: DEFAULT_PLOT_MAXIMAL_DAYS,
            min_tic_distance: DEFAULT_PLOT_MIN_TIC_DISTANCE
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            k_factor_top: DEFAULT_K_FACTOR_TOP,
            rating_top_threshold: DEFAULT_RATING_TOP_THRESHOLD,
            k_factor_others: DEFAULT_K_FACTOR_OTHERS,
            k_factor_freshmen: DEFAULT_K_FACTOR_FRESHMEN,
            freshman_weighting_threshold: DEFAULT_FRESHMAN_WEIGHTING_THRESHOLD,
            minimal_rating: DEFAULT_MINIMAL_RATING,
            estimate_weighting_threshold: DEFAULT_ESTIMATE_WEIGHTING_THRESHOLD,
            team_bout_weighting: DEFAULT_TEAM_BOUT_WEIGHTING,
            bootstrap_threshold: DEFAULT_BOOTSTRAP_THRESHOLD,
            max_bootstrap_cycles: DEFAULT_MAX_BOOTSTRAP_CYCLES,
            group_name: DEFAULT_GROUP_NAME.to_string(),
            plot: PlotSettings::default()
        }
    }
}

impl Parameters {
    /// Validates `parameters` and returns them unchanged if they are usable.
    pub fn new(parameters: Parameters) -> Result<Parameters, ValidationError> {
        parameters.validate()?;
        Ok(parameters)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let non_negative = [
            ("kFactorTop", self.k_factor_top),
            ("ratingTopThreshold", self.rating_top_threshold),
            ("kFactorOthers", self.k_factor_others),
            ("kFactorFreshmen", self.k_factor_freshmen),
            ("freshmanWeightingThreshold", self.freshman_weighting_threshold),
            ("minimalRating", self.minimal_rating),
            ("estimateWeightingThreshold", self.estimate_weighting_threshold)
        ];

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(name, format!("expected a finite, non-negative number, got {value}")));
            }
        }

        let positive = [
            ("teamBoutWeighting", self.team_bout_weighting),
            ("bootstrapThreshold", self.bootstrap_threshold)
        ];

        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(name, format!("expected a finite, positive number, got {value}")));
            }
        }

        // The progress fraction divides by max_bootstrap_cycles - 1
        if self.max_bootstrap_cycles < 2 {
            return Err(invalid(
                "maxBootstrapCycles",
                format!("expected at least 2, got {}", self.max_bootstrap_cycles)
            ));
        }

        if self.plot.maximal_days < 0 {
            return Err(invalid("plot.maximalDays", "must not be negative".to_string()));
        }

        if self.plot.min_tic_distance < 0 {
            return Err(invalid("plot.minTicDistance", "must not be negative".to_string()));
        }

        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> ValidationError {
    ValidationError::InvalidParameter { name, reason }
}
