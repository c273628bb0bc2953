#[cfg(feature = "clingo")]
pub mod clingo_backend;
