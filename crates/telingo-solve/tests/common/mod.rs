//! Recording stand-in for a grounding and solving engine.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fmt;

use telingo_solve::{Control, GroundAtom, GroundPart, Model, SatResult, SolverLiteral, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Ground(Vec<GroundPart>),
    Assign(Symbol, bool),
    Release(Symbol),
    Cleanup,
    Solve {
        assumptions: Vec<SolverLiteral>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockError(pub String);

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for MockError {}

/// Grounding the `static` part with window start `s` produces the atom
/// `__future_<name>(shift, s + shift)` for each configured placeholder,
/// classically negated for placeholders added with
/// [`MockControl::with_negated_placeholder`].
pub struct MockControl {
    pub events: Vec<Event>,
    results: Vec<SatResult>,
    fallback: SatResult,
    placeholders: Vec<(String, i64, bool)>,
    atoms: Vec<GroundAtom>,
    externals_true: BTreeSet<Symbol>,
    pub max_true_externals: usize,
    fail_ground_at: Option<usize>,
    solves: usize,
}

impl MockControl {
    /// Solve calls return `results` in order and `fallback` afterwards.
    pub fn new(results: Vec<SatResult>, fallback: SatResult) -> Self {
        Self {
            events: Vec::new(),
            results,
            fallback,
            placeholders: Vec::new(),
            atoms: Vec::new(),
            externals_true: BTreeSet::new(),
            max_true_externals: 0,
            fail_ground_at: None,
            solves: 0,
        }
    }

    pub fn with_placeholder(mut self, name: &str, shift: i64) -> Self {
        self.placeholders.push((format!("__future_{name}"), shift, true));
        self
    }

    pub fn with_negated_placeholder(mut self, name: &str, shift: i64) -> Self {
        self.placeholders.push((format!("__future_{name}"), shift, false));
        self
    }

    /// Make the `n`-th ground call (0-based) fail.
    pub fn failing_ground_at(mut self, n: usize) -> Self {
        self.fail_ground_at = Some(n);
        self
    }

    pub fn ground_calls(&self) -> Vec<&Vec<GroundPart>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Ground(parts) => Some(parts),
                _ => None,
            })
            .collect()
    }

    pub fn solve_calls(&self) -> Vec<&Vec<SolverLiteral>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Solve { assumptions } => Some(assumptions),
                _ => None,
            })
            .collect()
    }

    pub fn symbol_of(&self, literal: SolverLiteral) -> Option<&Symbol> {
        self.atoms
            .iter()
            .find(|a| a.literal == literal)
            .map(|a| &a.symbol)
    }
}

impl Control for MockControl {
    type Error = MockError;

    fn ground(&mut self, parts: &[GroundPart]) -> Result<(), MockError> {
        let index = self.ground_calls().len();
        self.events.push(Event::Ground(parts.to_vec()));
        if self.fail_ground_at == Some(index) {
            return Err(MockError(format!("ground call {index} failed")));
        }
        for part in parts.iter().filter(|p| p.name == "static") {
            let start = part.arguments[0];
            for (name, shift, positive) in &self.placeholders {
                let literal = SolverLiteral(self.atoms.len() as i32 + 1);
                self.atoms.push(GroundAtom {
                    symbol: Symbol::Function {
                        name: name.clone(),
                        arguments: vec![Symbol::Number(*shift), Symbol::Number(start + shift)],
                        positive: *positive,
                    },
                    literal,
                });
            }
        }
        Ok(())
    }

    fn assign_external(&mut self, atom: &Symbol, value: bool) -> Result<(), MockError> {
        self.events.push(Event::Assign(atom.clone(), value));
        if value {
            self.externals_true.insert(atom.clone());
        } else {
            self.externals_true.remove(atom);
        }
        self.max_true_externals = self.max_true_externals.max(self.externals_true.len());
        Ok(())
    }

    fn release_external(&mut self, atom: &Symbol) -> Result<(), MockError> {
        self.events.push(Event::Release(atom.clone()));
        self.externals_true.remove(atom);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), MockError> {
        self.events.push(Event::Cleanup);
        Ok(())
    }

    fn atoms_matching(&mut self, name: &str, arity: usize) -> Result<Vec<GroundAtom>, MockError> {
        Ok(self
            .atoms
            .iter()
            .filter(|a| a.symbol.name() == Some(name) && a.symbol.arguments().len() == arity)
            .cloned()
            .collect())
    }

    fn solve(
        &mut self,
        assumptions: &[SolverLiteral],
        on_model: &mut dyn FnMut(&Model) -> bool,
    ) -> Result<SatResult, MockError> {
        self.events.push(Event::Solve {
            assumptions: assumptions.to_vec(),
        });
        let result = self
            .results
            .get(self.solves)
            .copied()
            .unwrap_or(self.fallback);
        self.solves += 1;
        if result == SatResult::Sat {
            on_model(&Model {
                number: 1,
                symbols: vec![Symbol::constant("witness")],
            });
        }
        Ok(result)
    }
}
