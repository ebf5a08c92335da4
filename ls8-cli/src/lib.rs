//! Program loading and the `ls8` command line.

pub mod lexer;
pub mod loader;
