// Pipelines: timeline collection, following collection, batch extraction.

pub mod batch;
pub mod collect;
pub mod following;
