use std::sync::Once;

use chrono::NaiveDate;
use felo_processor::model::{
    felo_model::{CalculationOptions, FeloModel, RatingReport},
    parameters::Parameters,
    structures::{bout::Bout, fencer::FencerDeclaration}
};

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builds a model and runs one plain calculation.
pub fn calculate(
    parameters: Parameters,
    declarations: &[FencerDeclaration],
    bouts: Vec<Bout>
) -> (FeloModel, RatingReport) {
    let mut model = FeloModel::new(parameters, declarations, bouts).unwrap();
    let report = model.calculate(CalculationOptions::default(), |_| {}).unwrap();

    (model, report)
}
