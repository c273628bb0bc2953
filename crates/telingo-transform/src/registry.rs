//! Table of predicates referenced in the future from rule heads.

use indexmap::IndexMap;

/// A predicate occurring with a positive shift in a rule head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct FutureKey {
    /// Predicate name with all temporal markers stripped.
    pub name: String,
    /// Arity before the time arguments were appended.
    pub arity: usize,
    pub shift: i64,
    /// False for classically negated atoms such as `-p'`.
    pub positive: bool,
}

impl FutureKey {
    pub fn new(name: impl Into<String>, arity: usize, shift: i64) -> Self {
        Self {
            name: name.into(),
            arity,
            shift,
            positive: true,
        }
    }

    pub fn with_sign(mut self, positive: bool) -> Self {
        self.positive = positive;
        self
    }
}

/// Maps every [`FutureKey`] to whether the predicate ever occurred in a
/// disjunctive head.
///
/// Entries are kept in first-registration order. Once a key is marked
/// disjunctive it stays disjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FutureRegistry {
    entries: IndexMap<FutureKey, bool>,
}

impl FutureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: FutureKey, disjunctive: bool) {
        let entry = self.entries.entry(key).or_insert(false);
        if disjunctive {
            *entry = true;
        }
    }

    pub fn is_disjunctive(&self, key: &FutureKey) -> Option<bool> {
        self.entries.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FutureKey, bool)> {
        self.entries.iter().map(|(k, d)| (k, *d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registration_is_not_disjunctive() {
        let mut reg = FutureRegistry::new();
        reg.register(FutureKey::new("p", 1, 2), false);
        assert_eq!(reg.is_disjunctive(&FutureKey::new("p", 1, 2)), Some(false));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn disjunctive_flag_is_promoted_and_never_reset() {
        let mut reg = FutureRegistry::new();
        let key = FutureKey::new("p", 0, 1);
        reg.register(key.clone(), false);
        reg.register(key.clone(), true);
        assert_eq!(reg.is_disjunctive(&key), Some(true));
        reg.register(key.clone(), false);
        assert_eq!(reg.is_disjunctive(&key), Some(true));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn keys_differ_by_arity_and_shift() {
        let mut reg = FutureRegistry::new();
        reg.register(FutureKey::new("p", 0, 1), false);
        reg.register(FutureKey::new("p", 1, 1), false);
        reg.register(FutureKey::new("p", 0, 2), true);
        assert_eq!(reg.len(), 3);
        let order: Vec<_> = reg.iter().map(|(k, _)| (k.arity, k.shift)).collect();
        assert_eq!(order, vec![(0, 1), (1, 1), (0, 2)]);
    }

    #[test]
    fn classical_negation_is_a_separate_key() {
        let mut reg = FutureRegistry::new();
        reg.register(FutureKey::new("p", 0, 1), false);
        reg.register(FutureKey::new("p", 0, 1).with_sign(false), true);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.is_disjunctive(&FutureKey::new("p", 0, 1)), Some(false));
        assert_eq!(
            reg.is_disjunctive(&FutureKey::new("p", 0, 1).with_sign(false)),
            Some(true)
        );
    }

    #[test]
    fn unknown_key_is_none() {
        let reg = FutureRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.is_disjunctive(&FutureKey::new("q", 0, 1)), None);
    }
}
