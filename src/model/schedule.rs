use itertools::Itertools;
use tracing::{debug, info};

use crate::model::{
    error::ValidationError,
    parameters::Parameters,
    roster::Roster,
    structures::{
        bout::Bout,
        fencer::{is_foreign_name, Fencer}
    }
};

/// A bout whose fencers have been resolved to roster indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledBout {
    pub first: usize,
    pub second: usize,
    pub bout: Bout
}

/// Validated bouts in chronological order.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    bouts: Vec<ScheduledBout>
}

impl Schedule {
    /// Validates `bouts` against `roster` and sorts them by date and index.
    ///
    /// Fencers that are not in the roster but carry a foreign rating in their
    /// name (`Name <1850>`) are added to the roster. Any other unknown fencer
    /// is an error. Nothing is added to the roster unless all bouts are valid.
    pub fn new(bouts: Vec<Bout>, roster: &mut Roster, parameters: &Parameters) -> Result<Schedule, ValidationError> {
        let mut foreign_fencers: Vec<Fencer> = Vec::new();

        for bout in &bouts {
            bout.validate()?;

            for name in [&bout.first_fencer, &bout.second_fencer] {
                if roster.contains(name) || foreign_fencers.iter().any(|f| &f.name == name) {
                    continue;
                }

                if !is_foreign_name(name) {
                    return Err(ValidationError::UnknownFencer(name.clone()));
                }

                foreign_fencers.push(Fencer::new(name.as_str(), 0.0, 0.0, parameters)?);
            }
        }

        for fencer in foreign_fencers {
            debug!(fencer = %fencer.name, "Adding foreign fencer");
            roster.insert(fencer)?;
        }

        let bouts = bouts
            .into_iter()
            .sorted_by(|a, b| a.chronological_cmp(b))
            .map(|bout| {
                let first = roster
                    .index_of(&bout.first_fencer)
                    .ok_or_else(|| ValidationError::UnknownFencer(bout.first_fencer.clone()))?;
                let second = roster
                    .index_of(&bout.second_fencer)
                    .ok_or_else(|| ValidationError::UnknownFencer(bout.second_fencer.clone()))?;

                Ok(ScheduledBout { first, second, bout })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        info!("{} bouts scheduled for {} fencers", bouts.len(), roster.len());

        Ok(Schedule { bouts })
    }

    pub fn bouts(&self) -> &[ScheduledBout] {
        &self.bouts
    }

    pub fn len(&self) -> usize {
        self.bouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bouts.is_empty()
    }

    /// Groups of bouts sharing a date string; their order is unknown.
    pub fn batches(&self) -> impl Iterator<Item = &[ScheduledBout]> {
        self.bouts
            .chunk_by(|a, b| a.bout.batch_key() == b.bout.batch_key())
    }
}

#[cfg(test)]
mod tests {
    use super::Schedule;
    use crate::model::{
        error::ValidationError,
        parameters::Parameters,
        roster::Roster,
        structures::{bout::Bout, fencer::FencerDeclaration}
    };
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2006, 3, d).unwrap()
    }

    fn roster(parameters: &Parameters) -> Roster {
        Roster::from_declarations(
            &[FencerDeclaration::new("A", 1500.0), FencerDeclaration::new("B", 1600.0)],
            parameters
        )
        .unwrap()
    }

    #[test]
    fn test_sorted_and_batched() {
        let parameters = Parameters::default();
        let mut roster = roster(&parameters);
        let bouts = vec![
            Bout::new(date(3), 0, "A", "B", 5, 1, None),
            Bout::new(date(1), 2, "B", "A", 5, 2, None),
            Bout::new(date(1), 0, "A", "B", 5, 3, None),
            Bout::new(date(1), 0, "B", "A", 5, 4, None),
        ];

        let schedule = Schedule::new(bouts, &mut roster, &parameters).unwrap();
        let keys = schedule
            .bouts()
            .iter()
            .map(|b| (b.bout.batch_key(), b.bout.points_second))
            .collect::<Vec<_>>();

        // Stable within one date string
        assert_eq!(
            keys,
            vec![((date(1), 0), 3), ((date(1), 0), 4), ((date(1), 2), 2), ((date(3), 0), 1)]
        );

        let batch_sizes = schedule.batches().map(|b| b.len()).collect::<Vec<_>>();
        assert_eq!(batch_sizes, vec![2, 1, 1]);
        assert_eq!(schedule.bouts()[0].first, 0);
        assert_eq!(schedule.bouts()[1].first, 1);
    }

    #[test]
    fn test_unknown_fencer() {
        let parameters = Parameters::default();
        let mut roster = roster(&parameters);
        let bouts = vec![Bout::new(date(1), 0, "A", "Zed", 5, 1, None)];

        assert_eq!(
            Schedule::new(bouts, &mut roster, &parameters).unwrap_err(),
            ValidationError::UnknownFencer("Zed".to_string())
        );
    }

    #[test]
    fn test_foreign_fencer_added() {
        let parameters = Parameters::default();
        let mut roster = roster(&parameters);
        let bouts = vec![
            Bout::new(date(1), 0, "A", "Zed <1700>", 5, 1, None),
            Bout::new(date(2), 0, "Zed <1700>", "B", 5, 1, None),
        ];

        let schedule = Schedule::new(bouts, &mut roster, &parameters).unwrap();

        assert_eq!(roster.len(), 3);
        assert!(roster.get("Zed <1700>").unwrap().foreign);
        assert_eq!(schedule.bouts()[1].first, 2);
    }

    #[test]
    fn test_invalid_bout_leaves_roster_untouched() {
        let parameters = Parameters::default();
        let mut roster = roster(&parameters);
        let bouts = vec![
            Bout::new(date(1), 0, "A", "Zed <1700>", 5, 1, None),
            Bout::new(date(2), 0, "A", "B", 7, 1, Some(5)),
        ];

        assert!(matches!(
            Schedule::new(bouts, &mut roster, &parameters),
            Err(ValidationError::PointsExceedWinningThreshold { .. })
        ));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_invalid_foreign_rating() {
        let parameters = Parameters::default();
        let mut roster = roster(&parameters);
        let bouts = vec![Bout::new(date(1), 0, "A", "Zed <x>", 5, 1, None)];

        assert_eq!(
            Schedule::new(bouts, &mut roster, &parameters).unwrap_err(),
            ValidationError::InvalidForeignRating("Zed <x>".to_string())
        );
    }
}
