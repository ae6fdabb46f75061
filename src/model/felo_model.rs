use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::model::{
    batch_committer::{BatchCommitter, PassStatistics},
    bootstrap::{self, BootstrapOutcome},
    error::{FeloError, ValidationError},
    parameters::Parameters,
    plot_data::{PlotCollector, PlotData},
    prediction::{self, Prognosis, WinProbabilityTables},
    roster::{FreshmanEstimate, RankedFencer, Roster},
    schedule::Schedule,
    structures::{
        bout::Bout,
        fencer::{Fencer, FencerDeclaration}
    }
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalculationOptions {
    /// Estimate starting ratings from the history first
    pub bootstrap: bool,
    /// Collect plot data relative to this day
    pub plot_today: Option<NaiveDate>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingReport {
    pub group_name: String,
    pub ranking: Vec<RankedFencer>,
    pub freshmen: Vec<FreshmanEstimate>,
    pub plot: Option<PlotData>,
    pub bootstrap: Option<BootstrapOutcome>,
    pub stats: PassStatistics
}

/// Ratings of one group of fencers, calculated from their bouts.
pub struct FeloModel {
    parameters: Parameters,
    roster: Roster,
    schedule: Schedule
}

impl FeloModel {
    /// Validates everything up front; a model that was constructed can be
    /// calculated without validation errors.
    pub fn new(
        parameters: Parameters,
        declarations: &[FencerDeclaration],
        bouts: Vec<Bout>
    ) -> Result<FeloModel, FeloError> {
        parameters.validate()?;

        let mut roster = Roster::from_declarations(declarations, &parameters)?;
        let schedule = Schedule::new(bouts, &mut roster, &parameters)?;

        Ok(FeloModel {
            parameters,
            roster,
            schedule
        })
    }

    /// One chronological pass over all bouts.
    pub fn process(&mut self) -> PassStatistics {
        BatchCommitter::new(&self.parameters).pass(&mut self.roster, &self.schedule)
    }

    pub fn bootstrap<F>(&mut self, progress: F) -> Result<BootstrapOutcome, FeloError>
    where
        F: FnMut(f64)
    {
        let outcome = bootstrap::bootstrap(&mut self.roster, &self.schedule, &self.parameters, progress)?;

        // The final pass tallies the freshmen once more
        self.roster.reset_freshman_tallies();

        Ok(outcome)
    }

    /// # Felo rating calculation
    ///
    /// 1. Optionally bootstrap the starting ratings.
    /// 2. Run the final pass, recording plot data at the end of every day.
    /// 3. Rank the visible fencers and estimate the freshmen.
    pub fn calculate<F>(&mut self, options: CalculationOptions, progress: F) -> Result<RatingReport, FeloError>
    where
        F: FnMut(f64)
    {
        let bootstrap = if options.bootstrap {
            Some(self.bootstrap(progress)?)
        } else {
            None
        };

        let mut collector = options
            .plot_today
            .map(|today| PlotCollector::new(&self.roster, &self.parameters, today));

        let stats = BatchCommitter::new(&self.parameters).pass_with_observer(
            &mut self.roster,
            &self.schedule,
            |date, roster| {
                if let Some(collector) = collector.as_mut() {
                    collector.observe(date, roster);
                }
            }
        );

        info!(
            bouts_rated = stats.bouts_rated,
            bouts_skipped = stats.bouts_skipped,
            freshman_tallies = stats.freshman_tallies,
            "Calculated Felo ratings for {}",
            self.parameters.group_name
        );

        Ok(RatingReport {
            group_name: self.parameters.group_name.clone(),
            ranking: self.roster.visible_ranking(&self.parameters),
            freshmen: self.roster.freshman_estimates(&self.parameters),
            plot: collector.map(PlotCollector::finish),
            bootstrap,
            stats
        })
    }

    /// Most probable result of a bout between two fencers of this group.
    pub fn prognosticate(
        &self,
        first: &str,
        second: &str,
        fenced_to: u32,
        tables: &WinProbabilityTables
    ) -> Result<Prognosis, FeloError> {
        let first = self.fencer(first)?;
        let second = self.fencer(second)?;

        Ok(prediction::prognosticate_bout(first, second, fenced_to, &self.parameters, tables)?)
    }

    pub fn expectation_value(&self, first: &str, second: &str) -> Result<f64, FeloError> {
        Ok(prediction::expectation_value(self.fencer(first)?, self.fencer(second)?, &self.parameters))
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn fencer(&self, name: &str) -> Result<&Fencer, FeloError> {
        self.roster
            .get(name)
            .ok_or_else(|| ValidationError::UnknownFencer(name.to_string()).into())
    }
}
