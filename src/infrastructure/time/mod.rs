//! Time formatting infrastructure module

mod interval;

pub use interval::IntervalFormatter;
