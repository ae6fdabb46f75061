pub mod args;
pub mod input;
pub mod model;
pub mod utils;
