pub mod observation;
pub mod profile;
pub mod time;

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;

pub use observation::*;
pub use profile::*;
pub use time::*;
