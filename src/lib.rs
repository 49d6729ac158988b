// ABOUTME: Library root for capstan - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod output;
pub mod ssh;
