//! Program parts the incremental loop grounds at every step.

use indexmap::IndexSet;
use telingo_ast::ast::Statement;
use tracing::warn;

use crate::statement::{DYNAMIC_PART, INITIAL_PART, STATIC_PART};

/// Decides at which steps a part is grounded, relative to its offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum PartRoot {
    /// Grounded once the step reaches the offset.
    Static,
    /// Grounded at every step strictly after the offset.
    Dynamic,
    /// Grounded exactly at the offset.
    Initial,
}

impl PartRoot {
    pub fn from_part_name(name: &str) -> Option<Self> {
        match name {
            STATIC_PART => Some(PartRoot::Static),
            DYNAMIC_PART => Some(PartRoot::Dynamic),
            INITIAL_PART => Some(PartRoot::Initial),
            _ => None,
        }
    }

    /// Whether a part with this root and offset `offset` is grounded at `step`.
    pub fn is_active(self, step: u32, offset: u32) -> bool {
        let distance = i64::from(step) - i64::from(offset);
        match self {
            PartRoot::Static => distance >= 0,
            PartRoot::Dynamic => distance > 0,
            PartRoot::Initial => distance == 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ProgramPart {
    pub root: PartRoot,
    pub name: String,
    /// Offsets at which the part applies.
    pub range: Vec<u32>,
}

impl ProgramPart {
    pub fn new(root: PartRoot, name: impl Into<String>, range: Vec<u32>) -> Self {
        Self {
            root,
            name: name.into(),
            range,
        }
    }
}

/// Collect the parts declared by rewritten statements, in first-seen order.
///
/// Parts with a name other than `static`, `dynamic` or `initial` cannot be
/// scheduled by the loop and are skipped with a warning.
pub fn collect_program_parts<'s>(
    statements: impl IntoIterator<Item = &'s Statement>,
) -> Vec<ProgramPart> {
    let mut seen = IndexSet::new();
    for statement in statements {
        if let Statement::Program { name, .. } = statement {
            seen.insert(name.as_str());
        }
    }
    seen.into_iter()
        .filter_map(|name| match PartRoot::from_part_name(name) {
            Some(root) => Some(ProgramPart::new(root, name, vec![0])),
            None => {
                warn!(part = name, "program part is never grounded by the incremental loop");
                None
            }
        })
        .collect()
}
