// Buzzer feature extraction: timeline files to per-user feature rows.
//
// `extractor` ties the pieces together; the other submodules each compute
// one family of features and can be used on their own.

pub mod clean;
pub mod extractor;
pub mod media;
pub mod profile;
pub mod record;
pub mod stats;
pub mod tags;
pub mod timeline;
