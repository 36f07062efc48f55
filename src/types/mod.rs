pub mod constants;
mod frequency;
mod schedule;
mod series;

pub use frequency::Frequency;
pub use schedule::{BlockSchedule, Period};
pub use series::Series;
