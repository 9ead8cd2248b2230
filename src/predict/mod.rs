mod error;
mod observer;
mod pass_finder;
mod propagation;
mod types;

pub use error::PredictError;
pub use observer::Observer;
pub use pass_finder::find_passes;
pub use propagation::{observe, subpoint, SubPoint, MAX_ELEMENT_AGE_DAYS};
pub use types::{Pass, PositionSample};
