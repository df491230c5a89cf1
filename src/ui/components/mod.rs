pub mod bars;
pub mod gauge;

pub use bars::{Bar, BarsWidget};
pub use gauge::{depth_gauge, et0_gauge, r2_gauge, rainfall_gauge, temperature_gauge};
