pub mod enhance;
pub mod metrics;
pub mod payments;
pub mod redesign;
pub mod social;
pub mod tts;
pub mod uploads;
pub mod visits;
