// ABOUTME: Command module aggregator for the capstan CLI.
// ABOUTME: Re-exports the deploy command entry points.

mod deploy;

pub use deploy::{deploy, run_deployment};
