pub mod bout;
pub mod fencer;
pub mod k_factor_regime;
pub mod rating_state;
pub mod side;
