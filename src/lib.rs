pub mod archive;
pub mod cache;
pub mod catalog;
pub mod constants;
pub mod env_state;
pub mod exohunt;
pub mod exohunt_errors;
pub mod lightcurve;
pub mod missions;
pub mod pipeline;
pub mod target;

pub use crate::exohunt::Exohunt;
pub use crate::exohunt_errors::ExohuntError;
pub use crate::lightcurve::LightCurve;
pub use crate::pipeline::PipelineResult;
