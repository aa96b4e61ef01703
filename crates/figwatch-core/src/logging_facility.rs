//! Structured logging facility for figwatch
//!
//! This module provides a canonical logging facility with:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - A `log_degraded!` macro for the partial-failure signals of report
//!   generation (identity fallback, skipped records, unreachable upstream)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use figwatch_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
