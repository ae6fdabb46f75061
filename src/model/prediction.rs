use std::{
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf}
};

use serde::Serialize;
use tracing::debug;

use crate::model::{
    constants::{MAX_TABULATED_FENCED_TO, NEUTRAL_RESULT, WIN_PROBABILITY_TOLERANCE},
    error::ExternalAssetError,
    freshman,
    parameters::Parameters,
    rating_utils::expectation,
    structures::{fencer::Fencer, rating_state::RatingState}
};

/// Expected fraction of points the first fencer makes against the second.
/// Freshmen take part with their estimate.
pub fn expectation_value(first: &Fencer, second: &Fencer, parameters: &Parameters) -> f64 {
    expectation(prediction_rating(first, parameters), prediction_rating(second, parameters))
}

fn prediction_rating(fencer: &Fencer, parameters: &Parameters) -> f64 {
    match fencer.rating_state() {
        RatingState::Known(rating) => *rating,
        RatingState::Estimating { .. } => freshman::estimate(fencer, parameters)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinProbabilityRow {
    /// Fraction of points the first fencer makes
    pub result_first: f64,
    /// Probability that the first fencer wins the bout
    pub win_probability_first: f64
}

/// Simulated win probabilities for bouts fenced to one number of points.
#[derive(Debug, Clone, PartialEq)]
pub struct WinProbabilityTable {
    rows: Vec<WinProbabilityRow>
}

impl WinProbabilityTable {
    pub fn from_rows(rows: Vec<WinProbabilityRow>) -> Option<WinProbabilityTable> {
        (!rows.is_empty()).then_some(WinProbabilityTable { rows })
    }

    /// Parses whitespace separated columns `result win_probability [...]`.
    /// Lines starting with `#` and blank lines are ignored. `path` is only
    /// used in error messages.
    pub fn parse(path: &Path, contents: &str) -> Result<WinProbabilityTable, ExternalAssetError> {
        let malformed = |line: usize, reason: String| ExternalAssetError::Malformed {
            path: path.to_path_buf(),
            line,
            reason
        };

        let mut rows = Vec::new();

        for (i, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut columns = line.split_whitespace().map(str::parse::<f64>);
            let (Some(result_first), Some(win_probability_first)) = (columns.next(), columns.next()) else {
                return Err(malformed(i + 1, "expected at least two columns".to_string()));
            };

            rows.push(WinProbabilityRow {
                result_first: result_first.map_err(|e| malformed(i + 1, e.to_string()))?,
                win_probability_first: win_probability_first.map_err(|e| malformed(i + 1, e.to_string()))?
            });
        }

        WinProbabilityTable::from_rows(rows).ok_or_else(|| malformed(0, "table is empty".to_string()))
    }

    /// The first row whose result lies within the tolerance of `expectation`.
    /// If there is none, the last row.
    pub fn lookup(&self, expectation: f64) -> &WinProbabilityRow {
        let last = &self.rows[self.rows.len() - 1];

        self.rows
            .iter()
            .find(|row| (expectation - row.result_first).abs() < WIN_PROBABILITY_TOLERANCE)
            .unwrap_or(last)
    }

    pub fn rows(&self) -> &[WinProbabilityRow] {
        &self.rows
    }
}

/// Win probability tables for bouts fenced to 1 up to 15 points.
#[derive(Debug, Clone, Default)]
pub struct WinProbabilityTables {
    directory: Option<PathBuf>,
    tables: BTreeMap<u32, WinProbabilityTable>
}

impl WinProbabilityTables {
    pub fn new() -> WinProbabilityTables {
        WinProbabilityTables::default()
    }

    /// File name of the table for bouts fenced to `fenced_to`.
    pub fn file_name(fenced_to: u32) -> String {
        format!("auf{fenced_to}.dat")
    }

    /// Loads every `aufN.dat` found in `directory`. Tables missing from the
    /// directory are reported when they are asked for.
    pub fn load_dir(directory: impl AsRef<Path>) -> Result<WinProbabilityTables, ExternalAssetError> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(ExternalAssetError::Missing(directory.to_path_buf()));
        }

        let mut tables = WinProbabilityTables {
            directory: Some(directory.to_path_buf()),
            tables: BTreeMap::new()
        };

        for fenced_to in 1..=MAX_TABULATED_FENCED_TO {
            let path = directory.join(WinProbabilityTables::file_name(fenced_to));

            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(ExternalAssetError::Io { path, source })
            };

            tables.insert(fenced_to, WinProbabilityTable::parse(&path, &contents)?)?;
        }

        debug!(directory = %directory.display(), count = tables.tables.len(), "Loaded win probability tables");

        Ok(tables)
    }

    pub fn insert(&mut self, fenced_to: u32, table: WinProbabilityTable) -> Result<(), ExternalAssetError> {
        if !(1..=MAX_TABULATED_FENCED_TO).contains(&fenced_to) {
            return Err(ExternalAssetError::UnsupportedFencedTo(fenced_to));
        }

        self.tables.insert(fenced_to, table);
        Ok(())
    }

    pub fn table(&self, fenced_to: u32) -> Result<&WinProbabilityTable, ExternalAssetError> {
        if !(1..=MAX_TABULATED_FENCED_TO).contains(&fenced_to) {
            return Err(ExternalAssetError::UnsupportedFencedTo(fenced_to));
        }

        self.tables.get(&fenced_to).ok_or_else(|| {
            let file_name = WinProbabilityTables::file_name(fenced_to);
            ExternalAssetError::Missing(match &self.directory {
                Some(directory) => directory.join(file_name),
                None => PathBuf::from(file_name)
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prognosis {
    pub points_first: u32,
    pub points_second: u32,
    /// Winning chance of the first fencer in percent
    pub win_probability_first: u32
}

/// Most probable result of a bout between `first` and `second`.
///
/// The favourite reaches `fenced_to`; the other fencer makes points in
/// proportion to the expectation value. If that rounds to a tie, the
/// fencer less likely to win gets one point less.
pub fn prognosticate_bout(
    first: &Fencer,
    second: &Fencer,
    fenced_to: u32,
    parameters: &Parameters,
    tables: &WinProbabilityTables
) -> Result<Prognosis, ExternalAssetError> {
    let table = tables.table(fenced_to)?;
    let expectation_first = expectation_value(first, second, parameters);
    let fenced_to_f = f64::from(fenced_to);

    let (mut points_first, mut points_second) = if expectation_first > NEUTRAL_RESULT {
        (fenced_to, round_points(fenced_to_f * (1.0 / expectation_first - 1.0)))
    } else {
        (round_points(fenced_to_f / (1.0 / expectation_first - 1.0)), fenced_to)
    };

    let win_probability_first = table.lookup(expectation_first).win_probability_first;

    if points_first == points_second {
        if win_probability_first > NEUTRAL_RESULT {
            points_second = points_second.saturating_sub(1);
        } else {
            points_first = points_first.saturating_sub(1);
        }
    }

    Ok(Prognosis {
        points_first,
        points_second,
        win_probability_first: (win_probability_first * 100.0).round().max(0.0) as u32
    })
}

fn round_points(points: f64) -> u32 {
    if points.is_finite() {
        points.round().max(0.0) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{
        expectation_value, prognosticate_bout, WinProbabilityRow, WinProbabilityTable, WinProbabilityTables
    };
    use crate::model::{error::ExternalAssetError, parameters::Parameters, structures::fencer::Fencer};
    use approx::assert_abs_diff_eq;
    use std::path::Path;

    const TABLE: &str = "# result  win probability  deviation
0.30 0.10 0.01
0.40 0.25 0.01
0.50 0.50 0.01
0.60 0.75 0.01
0.64 0.83 0.01
0.70 0.90 0.01
";

    fn tables() -> WinProbabilityTables {
        let mut tables = WinProbabilityTables::new();
        let table = WinProbabilityTable::parse(Path::new("auf5.dat"), TABLE).unwrap();
        tables.insert(5, table).unwrap();
        tables
    }

    fn fencer(name: &str, rating: f64, parameters: &Parameters) -> Fencer {
        Fencer::new(name, rating, 0.0, parameters).unwrap()
    }

    #[test]
    fn test_expectation_value_complement() {
        let parameters = Parameters::default();
        let a = fencer("A", 1700.0, &parameters);
        let b = fencer("B", 1500.0, &parameters);

        let e = expectation_value(&a, &b, &parameters);
        assert_abs_diff_eq!(e + expectation_value(&b, &a, &parameters), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(expectation_value(&a, &a, &parameters), 0.5);
    }

    #[test]
    fn test_expectation_value_uses_freshman_estimate() {
        let parameters = Parameters::default();
        let rated = fencer("A", 1700.0, &parameters);
        let mut freshman = fencer("F", 0.0, &parameters);
        for _ in 0..12 {
            freshman.add_tally(1.0, 0.0, 1700.0);
        }

        // An even record against 1700 estimates 1700
        assert_abs_diff_eq!(expectation_value(&freshman, &rated, &parameters), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_table() {
        let table = WinProbabilityTable::parse(Path::new("auf5.dat"), TABLE).unwrap();

        assert_eq!(table.rows().len(), 6);
        assert_eq!(
            table.rows()[0],
            WinProbabilityRow {
                result_first: 0.3,
                win_probability_first: 0.1
            }
        );
    }

    #[test]
    fn test_parse_malformed_table() {
        let result = WinProbabilityTable::parse(Path::new("auf5.dat"), "0.5 0.5\n0.6 x\n");
        assert!(matches!(result, Err(ExternalAssetError::Malformed { line: 2, .. })));

        let result = WinProbabilityTable::parse(Path::new("auf5.dat"), "# only a comment\n");
        assert!(matches!(result, Err(ExternalAssetError::Malformed { .. })));
    }

    #[test]
    fn test_lookup_falls_back_to_last_row() {
        let table = WinProbabilityTable::parse(Path::new("auf5.dat"), TABLE).unwrap();

        assert_eq!(table.lookup(0.404).win_probability_first, 0.25);
        assert_eq!(table.lookup(0.95).win_probability_first, 0.90);
    }

    #[test]
    fn test_prognosis_favourite_first() {
        let parameters = Parameters::default();
        let a = fencer("A", 1600.0, &parameters);
        let b = fencer("B", 1500.0, &parameters);

        // e = 0.640065: 5 * (1/e - 1) = 2.81
        let prognosis = prognosticate_bout(&a, &b, 5, &parameters, &tables()).unwrap();

        assert_eq!(prognosis.points_first, 5);
        assert_eq!(prognosis.points_second, 3);
        assert_eq!(prognosis.win_probability_first, 83);
    }

    #[test]
    fn test_prognosis_favourite_second() {
        let parameters = Parameters::default();
        let a = fencer("A", 1500.0, &parameters);
        let b = fencer("B", 1600.0, &parameters);

        let prognosis = prognosticate_bout(&a, &b, 5, &parameters, &tables()).unwrap();

        assert_eq!(prognosis.points_first, 3);
        assert_eq!(prognosis.points_second, 5);
        // No row near 0.36, so the last row is used
        assert_eq!(prognosis.win_probability_first, 90);
    }

    #[test]
    fn test_prognosis_tie_is_broken() {
        let parameters = Parameters::default();
        let a = fencer("A", 1500.0, &parameters);
        let b = fencer("B", 1500.0, &parameters);

        // Even fencers: 5:5, and the table gives exactly 0.5, so the first loses a point
        let prognosis = prognosticate_bout(&a, &b, 5, &parameters, &tables()).unwrap();

        assert_eq!((prognosis.points_first, prognosis.points_second), (4, 5));
        assert_eq!(prognosis.win_probability_first, 50);
    }

    #[test]
    fn test_missing_and_unsupported_tables() {
        let parameters = Parameters::default();
        let a = fencer("A", 1500.0, &parameters);
        let b = fencer("B", 1500.0, &parameters);

        assert!(matches!(
            prognosticate_bout(&a, &b, 10, &parameters, &tables()),
            Err(ExternalAssetError::Missing(_))
        ));
        assert!(matches!(
            prognosticate_bout(&a, &b, 16, &parameters, &tables()),
            Err(ExternalAssetError::UnsupportedFencedTo(16))
        ));
        assert!(matches!(
            WinProbabilityTables::load_dir("/nonexistent/felo/tables"),
            Err(ExternalAssetError::Missing(_))
        ));
    }

    #[test]
    fn test_load_dir() {
        let directory = std::env::temp_dir().join(format!("felo-tables-{}", std::process::id()));
        std::fs::create_dir_all(&directory).unwrap();
        std::fs::write(directory.join("auf5.dat"), TABLE).unwrap();

        let tables = WinProbabilityTables::load_dir(&directory).unwrap();

        assert_eq!(tables.table(5).unwrap().rows().len(), 6);
        assert!(matches!(tables.table(3), Err(ExternalAssetError::Missing(path)) if path.ends_with("auf3.dat")));

        std::fs::remove_dir_all(&directory).unwrap();
    }
}
