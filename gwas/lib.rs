#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(clippy::no_effect_underscore_binding)]
pub mod assay;
pub mod association;
pub mod cohort;
pub mod config;
pub mod ingest;
pub mod io;
pub mod report;
pub mod types;
