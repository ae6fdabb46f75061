use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use serde::Serialize;

use crate::model::{parameters::Parameters, roster::Roster};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotRow {
    /// Days since 0001-01-01, which is day 1
    pub day_ordinal: i32,
    pub date: NaiveDate,
    /// Ratings of the visible fencers, in column order
    pub ratings: Vec<f64>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotTic {
    pub day_ordinal: i32,
    pub label: String
}

/// Rating history of the visible fencers, one row per day with bouts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotData {
    pub columns: Vec<String>,
    pub rows: Vec<PlotRow>,
    pub tics: Vec<PlotTic>
}

impl PlotData {
    /// Tab separated data, the day ordinal followed by one column per fencer.
    pub fn to_tsv(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                let day = row.day_ordinal.to_string();
                std::iter::once(day)
                    .chain(row.ratings.iter().map(f64::to_string))
                    .join("\t")
                    + "\n"
            })
            .collect()
    }
}

/// Collects [`PlotData`] from the per-day observer of a pass.
pub struct PlotCollector<'a> {
    parameters: &'a Parameters,
    today: NaiveDate,
    columns: Vec<usize>,
    data: PlotData,
    last_tic: Option<i32>
}

impl<'a> PlotCollector<'a> {
    /// The columns are the fencers visible in `roster` right now.
    pub fn new(roster: &Roster, parameters: &'a Parameters, today: NaiveDate) -> PlotCollector<'a> {
        let columns = roster.visible_indices();
        let names = columns
            .iter()
            .filter_map(|&index| roster.by_index(index))
            .map(|fencer| fencer.name.clone())
            .collect();

        PlotCollector {
            parameters,
            today,
            columns,
            data: PlotData {
                columns: names,
                ..Default::default()
            },
            last_tic: None
        }
    }

    /// Records the ratings at the end of `date`, if the day is in the plotted range.
    pub fn observe(&mut self, date: NaiveDate, roster: &Roster) {
        let plot = &self.parameters.plot;
        if date < plot.earliest_date || (self.today - date).num_days() > plot.maximal_days {
            return;
        }

        let day_ordinal = date.num_days_from_ce();

        if self.last_tic.map_or(true, |last| i64::from(day_ordinal - last) >= plot.min_tic_distance) {
            self.last_tic = Some(day_ordinal);
            self.data.tics.push(PlotTic {
                day_ordinal,
                label: date.format("%Y-%m-%d").to_string()
            });
        }

        let ratings = self
            .columns
            .iter()
            .map(|&index| {
                roster
                    .by_index(index)
                    .and_then(|fencer| fencer.known_rating())
                    .unwrap_or(0.0)
            })
            .collect();

        self.data.rows.push(PlotRow {
            day_ordinal,
            date,
            ratings
        });
    }

    pub fn finish(self) -> PlotData {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::{PlotCollector, PlotData, PlotRow};
    use crate::model::{
        parameters::{Parameters, PlotSettings},
        roster::Roster,
        structures::fencer::FencerDeclaration
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn roster(parameters: &Parameters) -> Roster {
        Roster::from_declarations(
            &[
                FencerDeclaration::new("A", 1600.0),
                FencerDeclaration::new("(H)", 1500.0),
                FencerDeclaration::new("F", 0.0),
                FencerDeclaration::new("B", 1400.0),
            ],
            parameters
        )
        .unwrap()
    }

    #[test]
    fn test_columns_are_visible_fencers() {
        let parameters = Parameters::default();
        let roster = roster(&parameters);
        let mut collector = PlotCollector::new(&roster, &parameters, date(2000, 1, 10));

        collector.observe(date(2000, 1, 1), &roster);
        let data = collector.finish();

        assert_eq!(data.columns, vec!["A", "B"]);
        assert_eq!(
            data.rows,
            vec![PlotRow {
                day_ordinal: 730120,
                date: date(2000, 1, 1),
                ratings: vec![1600.0, 1400.0]
            }]
        );
    }

    #[test]
    fn test_date_filters() {
        let parameters = Parameters {
            plot: PlotSettings {
                earliest_date: date(2000, 1, 1),
                maximal_days: 30,
                min_tic_distance: 7
            },
            ..Default::default()
        };
        let roster = roster(&parameters);
        let mut collector = PlotCollector::new(&roster, &parameters, date(2000, 3, 1));

        for day in [date(1999, 12, 31), date(2000, 1, 30), date(2000, 1, 31), date(2000, 3, 1)] {
            collector.observe(day, &roster);
        }

        let dates = collector.finish().rows.iter().map(|r| r.date).collect::<Vec<_>>();
        assert_eq!(dates, vec![date(2000, 1, 31), date(2000, 3, 1)]);
    }

    #[test]
    fn test_tic_spacing() {
        let parameters = Parameters::default();
        let roster = roster(&parameters);
        let mut collector = PlotCollector::new(&roster, &parameters, date(2000, 2, 1));

        for day in [1, 3, 8, 14, 15] {
            collector.observe(date(2000, 1, day), &roster);
        }

        let data = collector.finish();
        let labels = data.tics.iter().map(|t| t.label.as_str()).collect::<Vec<_>>();

        assert_eq!(data.rows.len(), 5);
        assert_eq!(labels, vec!["2000-01-01", "2000-01-08", "2000-01-15"]);
    }

    #[test]
    fn test_to_tsv() {
        let mut data = PlotData {
            columns: vec!["A".to_string(), "B".to_string()],
            rows: vec![
                PlotRow {
                    day_ordinal: 730120,
                    date: date(2000, 1, 1),
                    ratings: vec![1600.5, 1400.0]
                },
                PlotRow {
                    day_ordinal: 730121,
                    date: date(2000, 1, 2),
                    ratings: vec![1598.25, 1402.25]
                },
            ],
            tics: Vec::new()
        };

        assert_eq!(data.to_tsv(), "730120\t1600.5\t1400\n730121\t1598.25\t1402.25\n");

        data.rows.clear();
        assert_eq!(data.to_tsv(), "");
    }
}
