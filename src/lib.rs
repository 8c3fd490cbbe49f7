// Buzzer: timeline collection and feature extraction for buzzer detection.
//
// This is the library root. Each module corresponds to one stage of the
// research pipeline, from API access through to per-user feature rows.

pub mod config;
pub mod features;
pub mod output;
pub mod pipeline;
pub mod social_political;
pub mod store;
pub mod twitter;
