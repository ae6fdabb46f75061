pub mod batch_committer;
pub mod bias_correction;
pub mod bootstrap;
pub mod constants;
pub mod error;
pub mod felo_model;
pub mod freshman;
pub mod parameters;
pub mod plot_data;
pub mod prediction;
pub mod rating_engine;
pub mod rating_utils;
pub mod roster;
pub mod schedule;
pub mod structures;
