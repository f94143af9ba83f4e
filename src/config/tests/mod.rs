//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `precedence`: Layer precedence tests and merge helpers
//! - `loading`: Environment and CLI loading tests
//! - `derived`: Timings and state file resolution tests
