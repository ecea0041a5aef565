//! Ground-station visibility: look angles along a trajectory and the pass
//! scanner built on them.

mod error;
mod ground_station;
mod pass_finder;
mod trajectory;
mod types;

pub use error::PredictError;
pub use ground_station::GroundStation;
pub use pass_finder::{predict_passes, PassOptions};
pub use trajectory::{build_trajectory, look, sample, SampleOptions};
pub use types::{Pass, PassEvent, TrackSample};
