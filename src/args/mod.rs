//! Command-line handling for hosted tools.
//!
//! Hosted tools receive their arguments as one raw string. This module splits
//! that string into an argument vector and builds strings back from vectors.

mod quote;
mod tokenizer;

pub use quote::{join_args, quote_arg};
pub use tokenizer::tokenize;
