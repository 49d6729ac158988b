// ABOUTME: SSH client module for the remote deployment session.
// ABOUTME: Key-based authentication, streamed execution, and SFTP upload over russh.

mod client;
mod error;
mod ops;
mod stream;

pub use client::{ExecResult, KeyMaterial, Probe, Session, SessionConfig, sh_quote};
pub use error::{Error, Result};
pub use ops::{CommandOps, SessionOps, TransferOps};
pub use stream::{LineSink, OutputChannel};
