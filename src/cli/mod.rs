//! CLI operation mode handlers.
//!
//! - [`analyze`]: submit one analysis request and print the outcome
//!
//! Output formatting utilities are in [`output`].

pub mod analyze;
pub mod output;
