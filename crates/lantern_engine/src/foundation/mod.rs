//! Foundation utilities: math types, logging, timing

pub mod logging;
pub mod math;
pub mod time;
