#![doc = include_str!("../README.md")]

//! Incremental solving loop for transformed temporal programs, generic over
//! the grounding and solving engine.

pub mod backends;
pub mod control;
pub mod imain;
pub mod options;

pub use control::{Control, GroundAtom, GroundPart, Model, SatResult, SolverLiteral, Symbol};
pub use imain::{imain, SolveError, SolveSummary};
pub use options::{SolveOptions, StopCriterion};
