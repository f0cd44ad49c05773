//! Momentum based on calendar-year price returns.
//!
//! The same period return serves twice: over the formation year it is the
//! momentum factor, over the outcome year it is the performance being
//! explained.

mod factor;
mod returns;

pub use factor::MomentumFactor;
pub use returns::{Exclusion, PeriodReturns, PriceHistory};
