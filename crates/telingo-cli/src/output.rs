// Rendering of transform results and models for the terminal.

use std::collections::BTreeMap;

use serde::Serialize;

use telingo_solve::{Model, SatResult, Symbol};
use telingo_transform::{ProgramPart, Signature, TransformOutput};

#[derive(Debug, Serialize)]
pub(crate) struct TransformReport<'a> {
    pub(crate) program: String,
    pub(crate) future_signatures: &'a [Signature],
    pub(crate) program_parts: &'a [ProgramPart],
    pub(crate) deferred_constraints: usize,
}

impl<'a> TransformReport<'a> {
    pub(crate) fn new(output: &'a TransformOutput) -> Self {
        Self {
            program: output.render(),
            future_signatures: &output.future_signatures,
            program_parts: &output.program_parts,
            deferred_constraints: output.deferred_constraints.len(),
        }
    }
}

/// The rewritten program followed by the loop metadata as comments.
pub(crate) fn render_transform_text(output: &TransformOutput) -> String {
    let mut out = output.render();
    for signature in &output.future_signatures {
        out.push_str(&format!("% future: {}/{}\n", signature.name, signature.arity));
    }
    for part in &output.program_parts {
        let range: Vec<String> = part.range.iter().map(u32::to_string).collect();
        out.push_str(&format!(
            "% part: {} {:?} [{}]\n",
            part.name,
            part.root,
            range.join(",")
        ));
    }
    out
}

/// Print the atoms of `model` state by state for states `0..=steps`.
///
/// Atoms are grouped by their time argument, which is dropped; within a state
/// every predicate starts a new line. Atoms of internal predicates (names
/// starting with `__`) are suppressed.
pub(crate) fn format_model(model: &Model, steps: u32) -> String {
    let mut table: BTreeMap<i64, Vec<Symbol>> = BTreeMap::new();
    for symbol in &model.symbols {
        if let Some(time) = symbol.time() {
            table.entry(time).or_default().push(symbol.without_time());
        }
    }

    let mut out = format!("Answer: {}\n", model.number);
    for state in 0..=steps {
        out.push_str(&format!(" State {state}:"));
        let mut symbols = table.remove(&i64::from(state)).unwrap_or_default();
        symbols.sort_by(|a, b| {
            (a.name(), a.arguments().len())
                .cmp(&(b.name(), b.arguments().len()))
                .then_with(|| a.cmp(b))
        });
        let mut signature = None;
        for symbol in &symbols {
            let name = symbol.name().unwrap_or_default();
            if name.starts_with("__") {
                continue;
            }
            let current = (name, symbol.arguments().len());
            if signature != Some(current) {
                out.push_str("\n ");
                signature = Some(current);
            }
            out.push_str(&format!(" {symbol}"));
        }
        out.push('\n');
    }
    out
}

pub(crate) fn exit_code(result: Option<SatResult>) -> i32 {
    match result {
        Some(SatResult::Sat) => 10,
        Some(SatResult::Unsat) => 20,
        Some(SatResult::Unknown) | None => 0,
    }
}
