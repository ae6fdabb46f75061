use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{
    parameters::Parameters,
    rating_engine::{BoutEvaluation, RatingEngine},
    roster::Roster,
    schedule::{Schedule, ScheduledBout},
    structures::side::Side
};

/// Preliminary values of a fencer within one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StagedRating {
    rating: f64,
    total_weighting: f64
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassStatistics {
    pub bouts_rated: usize,
    pub bouts_skipped: usize,
    pub freshman_tallies: usize,
    pub batches_committed: usize
}

/// Rates bouts in batches. All bouts with the same date string are rated
/// from the same ratings; results are only committed once the batch is
/// complete, because the order of bouts within a batch is unknown.
pub struct BatchCommitter<'a> {
    parameters: &'a Parameters,
    engine: RatingEngine<'a>,
    // Fencers with uncommitted changes, by roster index
    staged: IndexMap<usize, StagedRating>
}

impl<'a> BatchCommitter<'a> {
    pub fn new(parameters: &'a Parameters) -> BatchCommitter<'a> {
        BatchCommitter {
            parameters,
            engine: RatingEngine::new(parameters),
            staged: IndexMap::new()
        }
    }

    /// One chronological pass over all bouts.
    pub fn pass(&mut self, roster: &mut Roster, schedule: &Schedule) -> PassStatistics {
        self.pass_with_observer(roster, schedule, |_, _| {})
    }

    /// Like [`BatchCommitter::pass`], calling `observer` with the committed
    /// roster once the last batch of each day is done.
    pub fn pass_with_observer<F>(&mut self, roster: &mut Roster, schedule: &Schedule, mut observer: F) -> PassStatistics
    where
        F: FnMut(NaiveDate, &Roster)
    {
        let mut statistics = PassStatistics::default();
        let mut batches = schedule.batches().peekable();

        while let Some(batch) = batches.next() {
            for scheduled in batch {
                self.stage(roster, scheduled, &mut statistics);
            }

            self.commit(roster);
            statistics.batches_committed += 1;

            let date = batch[0].bout.date;
            let day_complete = batches.peek().map_or(true, |next| next[0].bout.date != date);
            if day_complete {
                observer(date, roster);
            }
        }

        debug!(?statistics, "Pass complete");
        statistics
    }

    /// Rates one bout against the committed ratings and stages the result.
    /// Freshman statistics are updated right away; they do not influence
    /// other bouts of the batch.
    pub fn stage(&mut self, roster: &mut Roster, scheduled: &ScheduledBout, statistics: &mut PassStatistics) {
        let (Some(first), Some(second)) = (roster.by_index(scheduled.first), roster.by_index(scheduled.second)) else {
            warn!(bout = %scheduled.bout, "Bout refers to a fencer outside of the roster, skipped");
            statistics.bouts_skipped += 1;
            return;
        };

        match self.engine.process_bout(first, second, &scheduled.bout) {
            BoutEvaluation::Skipped => statistics.bouts_skipped += 1,
            BoutEvaluation::FreshmanTally { freshman, tally } => {
                let index = match freshman {
                    Side::First => scheduled.first,
                    Side::Second => scheduled.second
                };

                if let Some(fencer) = roster.by_index_mut(index) {
                    fencer.add_tally(tally.weighting, tally.result, tally.opponent_rating);
                }
                statistics.freshman_tallies += 1;
            }
            BoutEvaluation::Rated(rated) => {
                for (side, index) in [(Side::First, scheduled.first), (Side::Second, scheduled.second)] {
                    let Some(delta) = rated.delta(side) else {
                        continue;
                    };

                    if let Some(staged) = self.staged_entry(roster, index) {
                        staged.rating += delta;
                        staged.total_weighting += rated.weighting;
                    }
                }
                statistics.bouts_rated += 1;
            }
        }
    }

    /// Writes all staged values into the roster and clears the staging area.
    /// Returns the number of fencers committed.
    pub fn commit(&mut self, roster: &mut Roster) -> usize {
        let committed = self.staged.len();

        for (index, staged) in self.staged.drain(..) {
            if let Some(fencer) = roster.by_index_mut(index) {
                fencer.write_rating(staged.rating, self.parameters);
                fencer.set_total_weighting(staged.total_weighting);
            }
        }

        committed
    }

    /// Number of fencers with uncommitted changes.
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Staging slot of a rated fencer, seeded from the committed values.
    fn staged_entry(&mut self, roster: &Roster, index: usize) -> Option<&mut StagedRating> {
        let fencer = roster.by_index(index)?;
        let rating = fencer.known_rating()?;

        Some(self.staged.entry(index).or_insert(StagedRating {
            rating,
            total_weighting: fencer.total_weighting()
        }))
    }
}
