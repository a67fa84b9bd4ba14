//! Orchestration of a sitediff run.
//!
//! Sequences scroll → capture → diff per page target over a single reused
//! page handle, resolves the baseline for each target, and collects every
//! diff before the run completes.

pub mod context;
pub mod report;
pub mod run;

pub use {
    context::RunContext,
    report::{RunReport, TargetReport, TargetStatus},
    run::{RunOptions, Runner},
};
