// File: src/lib.rs
//
// Library interface for the BCL interpreter.
// Exposes modules for integration testing and external use.

pub mod analyzer;
pub mod ast;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod parser;
