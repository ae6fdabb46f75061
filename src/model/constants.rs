// Default parameters
pub const DEFAULT_K_FACTOR_TOP: f64 = 25.0;
pub const DEFAULT_RATING_TOP_THRESHOLD: f64 = 2400.0;
pub const DEFAULT_K_FACTOR_OTHERS: f64 = 32.0;
pub const DEFAULT_K_FACTOR_FRESHMEN: f64 = 40.0;
pub const DEFAULT_FRESHMAN_WEIGHTING_THRESHOLD: f64 = 15.0;
pub const DEFAULT_MINIMAL_RATING: f64 = 1200.0;
pub const DEFAULT_ESTIMATE_WEIGHTING_THRESHOLD: f64 = 10.0;
pub const DEFAULT_TEAM_BOUT_WEIGHTING: f64 = 1.0;
pub const DEFAULT_BOOTSTRAP_THRESHOLD: f64 = 0.001;
pub const DEFAULT_MAX_BOOTSTRAP_CYCLES: usize = 1000;
pub const DEFAULT_GROUP_NAME: &str = "Felo";
// Plot defaults
pub const DEFAULT_PLOT_EARLIEST_DATE: &str = "1980-01-01";
pub const DEFAULT_PLOT_MAXIMAL_DAYS: i64 = 366;
pub const DEFAULT_PLOT_MIN_TIC_DISTANCE: i64 = 7;
// Model constants
/// Total points of an average bout fenced to 5, so that such a bout weighs ~1.
pub const POINTS_PER_WEIGHTING_UNIT: f64 = 6.76;
pub const ELO_SCALE: f64 = 400.0;
pub const ESTIMATE_SPREAD: f64 = 700.0;
pub const ESTIMATE_PRIOR_WEIGHTING: f64 = 2.0;
pub const NEUTRAL_RESULT: f64 = 0.5;
pub const BOOTSTRAP_PROGRESS_INTERVAL: usize = 10;
// Prediction
pub const MAX_TABULATED_FENCED_TO: u32 = 15;
pub const WIN_PROBABILITY_TOLERANCE: f64 = 0.0051;
