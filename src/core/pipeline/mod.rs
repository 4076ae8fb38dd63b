//! # Pipeline Module
//!
//! Orchestrates one organizing run.
//!
//! ## Pipeline Stages
//! 1. **Prepare** - Validate settings, create the destination skeleton
//! 2. **Scan** - Discover candidate photos under the source, in path order
//! 3. **Organize** - Analyze a batch, then route and copy it photo by photo
//! 4. **Report** - Write the JSON log and the text summary
//!
//! ## Parallelism
//! Analysis (content digest, decode, date) has no side effects, so each batch
//! is analyzed on the rayon pool. Routing mutates the run's registry and is
//! always done on the calling thread, in scan order, so the earliest photo of
//! a duplicate set is the one kept.

mod config;
mod executor;

pub use config::OrganizerConfig;
pub use executor::{Pipeline, PipelineBuilder, PipelineResult};
