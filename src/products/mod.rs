use thiserror::Error;

pub mod infrastructure;
pub mod rig;

pub use infrastructure::{Cooling, Electrical, HeatRejection, Infrastructure, RejectionCurve};
pub use rig::Rig;

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Rig '{0}' has zero hash rate; efficiency is undefined")]
    ZeroHashRate(String),
}
