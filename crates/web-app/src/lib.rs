#![warn(clippy::pedantic)]

pub mod in_flight;
pub mod log;
pub mod service;

pub use in_flight::InFlight;
pub use service::Service;
