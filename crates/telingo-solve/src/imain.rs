//! The incremental solving loop.
//!
//! Every step grounds the parts active at the current horizon, moves the
//! finality marker to the new last state, forbids placeholder atoms that
//! point beyond the horizon, and solves.

use thiserror::Error;
use tracing::{debug, info};

use telingo_transform::{ProgramPart, Signature, TransformOutput, FINAL_PREDICATE};

use crate::control::{Control, GroundPart, Model, SatResult, SolverLiteral, Symbol};
use crate::options::SolveOptions;

#[derive(Debug, Error)]
pub enum SolveError<E: std::error::Error + 'static> {
    #[error("solver error: {0}")]
    Control(#[source] E),
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Outcome of a run of [`imain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolveSummary {
    /// Number of completed steps.
    pub steps: u32,
    /// Result of the last solve call, if any.
    pub last: Option<SatResult>,
}

/// The finality marker for `step`.
pub fn final_marker(step: u32) -> Symbol {
    Symbol::function(FINAL_PREDICATE, vec![Symbol::Number(i64::from(step))])
}

/// Parts to ground at `step` with their window arguments `[step - i, step]`.
pub fn parts_for_step(parts: &[ProgramPart], step: u32) -> Vec<GroundPart> {
    let mut out = Vec::new();
    for part in parts {
        for &offset in &part.range {
            if part.root.is_active(step, offset) {
                let start = i64::from(step) - i64::from(offset);
                out.push(GroundPart::new(part.name.clone(), vec![start, i64::from(step)]));
            }
        }
    }
    out
}

/// Negative assumptions for every placeholder atom whose time lies beyond
/// `step`.
pub fn future_assumptions<C: Control>(
    control: &mut C,
    signatures: &[Signature],
    step: u32,
) -> Result<Vec<SolverLiteral>, C::Error> {
    let mut assumptions = Vec::new();
    for signature in signatures {
        for atom in control.atoms_matching(&signature.name, signature.arity)? {
            if atom.symbol.time().is_some_and(|t| t > i64::from(step)) {
                assumptions.push(-atom.literal);
            }
        }
    }
    Ok(assumptions)
}

/// Run the incremental loop over a transformed program whose statements
/// have already been handed to `control`.
///
/// `on_model` receives every model together with the step it was found at;
/// returning false stops the enumeration of the current solve call.
pub fn imain<C, F>(
    control: &mut C,
    program: &TransformOutput,
    options: &SolveOptions,
    mut on_model: F,
) -> Result<SolveSummary, SolveError<C::Error>>
where
    C: Control,
    C::Error: 'static,
    F: FnMut(&Model, u32) -> bool,
{
    if !program.reground_parts.is_empty() {
        return Err(SolveError::Unsupported(format!(
            "regrounding {} program part(s) for constraints that refer to the future",
            program.reground_parts.len()
        )));
    }

    let mut summary = SolveSummary::default();
    let mut step: u32 = 0;
    while options.should_continue(step, summary.last) {
        let parts = parts_for_step(&program.program_parts, step);
        if step > 0 {
            control
                .release_external(&final_marker(step - 1))
                .map_err(SolveError::Control)?;
            control.cleanup().map_err(SolveError::Control)?;
        }

        info!(step, parts = parts.len(), "grounding");
        control.ground(&parts).map_err(SolveError::Control)?;
        control
            .assign_external(&final_marker(step), true)
            .map_err(SolveError::Control)?;

        let assumptions = future_assumptions(control, &program.future_signatures, step)
            .map_err(SolveError::Control)?;
        debug!(step, assumptions = assumptions.len(), "solving");
        let result = control
            .solve(&assumptions, &mut |model: &Model| on_model(model, step))
            .map_err(SolveError::Control)?;
        info!(step, %result, "solved");

        summary.last = Some(result);
        step += 1;
        summary.steps = step;
    }
    Ok(summary)
}
