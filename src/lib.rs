//! SGP-4/SDP-4 satellite propagation from two-line element sets, the frame
//! chain down to a ground observer, and pass prediction.

pub mod config;
pub mod constants;
pub mod environment;
pub mod frames;
pub mod kepler;
pub mod predict;
pub mod propagation;
pub mod time;
pub mod tle;

#[cfg(test)]
mod tests;
