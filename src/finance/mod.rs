//! Deterministic finance primitives
//!
//! Pure numeric helpers shared by the feasibility and allocation engines.
//! No I/O, no shared state.

pub mod annuity;
pub mod format;

pub use annuity::{
    future_value_of_annuity, monthly_rate, periods_to_reach, required_payment,
    MAX_TIMEFRAME_MONTHS, NEAR_ZERO_RATE,
};
pub use format::{format_currency, format_months};
