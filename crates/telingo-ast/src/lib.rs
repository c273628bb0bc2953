#![doc = include_str!("../README.md")]

//! Statement tree, parser and printer for temporal logic programs.
//!
//! The parser accepts the gringo input language extended with prime
//! markers on predicate names (`'p` refers to the previous state, `p'` to
//! the next one). The printer renders statements back to plain gringo
//! syntax.

pub mod ast;
pub mod errors;
pub mod parser;

pub use ast::render_program;
pub use parser::parse;
