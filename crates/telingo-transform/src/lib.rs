#![doc = include_str!("../README.md")]
//! Rewriting of temporal logic programs into incremental programs.

pub mod errors;
pub mod parts;
pub mod program;
pub mod registry;
pub mod statement;
pub mod term;

pub use errors::{SourceTransformError, SpannedTransformError, TransformError};
pub use parts::{PartRoot, ProgramPart};
pub use program::{
    transform, transform_sources, RegroundPart, Signature, SourceFile, TransformOutput,
    Transformer,
};
pub use registry::{FutureKey, FutureRegistry};
pub use statement::{DeferredConstraint, RegroundKey, RegroundLedger, StatementRewriter};
pub use term::{TermPolicy, TermRewriter, FINAL_PREDICATE, FUTURE_PREFIX, TIME_PARAMETER};
