use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::control::SatResult;

/// Result that ends the loop once the minimum number of steps is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum StopCriterion {
    #[default]
    Sat,
    Unsat,
    Unknown,
}

impl StopCriterion {
    pub fn result(self) -> SatResult {
        match self {
            StopCriterion::Sat => SatResult::Sat,
            StopCriterion::Unsat => SatResult::Unsat,
            StopCriterion::Unknown => SatResult::Unknown,
        }
    }

    /// Whether `last` lets the loop continue.
    pub fn continues_after(self, last: SatResult) -> bool {
        last != self.result()
    }
}

impl fmt::Display for StopCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopCriterion::Sat => "SAT",
            StopCriterion::Unsat => "UNSAT",
            StopCriterion::Unknown => "UNKNOWN",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid stop criterion '{0}': expected SAT, UNSAT or UNKNOWN")]
pub struct ParseStopCriterionError(pub String);

impl FromStr for StopCriterion {
    type Err = ParseStopCriterionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SAT" => Ok(StopCriterion::Sat),
            "UNSAT" => Ok(StopCriterion::Unsat),
            "UNKNOWN" => Ok(StopCriterion::Unknown),
            _ => Err(ParseStopCriterionError(s.to_string())),
        }
    }
}

/// Bounds and stop condition of the incremental loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveOptions {
    /// Number of steps performed regardless of results.
    pub imin: u32,
    /// Maximum number of steps; unbounded when `None`.
    pub imax: Option<u32>,
    pub istop: StopCriterion,
}

impl SolveOptions {
    /// Whether the loop runs another step after `step` steps, the last of
    /// which ended with `last`.
    pub fn should_continue(&self, step: u32, last: Option<SatResult>) -> bool {
        let below_max = self.imax.map_or(true, |max| step < max);
        let keep_going = match last {
            None => true,
            Some(result) => step < self.imin || self.istop.continues_after(result),
        };
        below_max && (step == 0 || keep_going)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("sat".parse::<StopCriterion>(), Ok(StopCriterion::Sat));
        assert_eq!("UnSat".parse::<StopCriterion>(), Ok(StopCriterion::Unsat));
        assert_eq!("UNKNOWN".parse::<StopCriterion>(), Ok(StopCriterion::Unknown));
    }

    #[test]
    fn parse_rejects_other_values() {
        let err = "optimum".parse::<StopCriterion>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid stop criterion 'optimum': expected SAT, UNSAT or UNKNOWN"
        );
    }

    #[test]
    fn defaults() {
        let opts = SolveOptions::default();
        assert_eq!(opts.imin, 0);
        assert_eq!(opts.imax, None);
        assert_eq!(opts.istop, StopCriterion::Sat);
    }

    // ---------------------------------------------------------------
    // Stopping policy
    // ---------------------------------------------------------------

    #[test]
    fn first_step_always_runs_without_max() {
        assert!(SolveOptions::default().should_continue(0, None));
    }

    #[test]
    fn zero_max_runs_nothing() {
        let opts = SolveOptions {
            imax: Some(0),
            ..SolveOptions::default()
        };
        assert!(!opts.should_continue(0, None));
    }

    #[test]
    fn sat_criterion_stops_on_sat() {
        let opts = SolveOptions::default();
        assert!(opts.should_continue(1, Some(SatResult::Unsat)));
        assert!(opts.should_continue(1, Some(SatResult::Unknown)));
        assert!(!opts.should_continue(1, Some(SatResult::Sat)));
    }

    #[test]
    fn unsat_criterion_stops_on_unsat() {
        let opts = SolveOptions {
            istop: StopCriterion::Unsat,
            ..SolveOptions::default()
        };
        assert!(opts.should_continue(3, Some(SatResult::Sat)));
        assert!(!opts.should_continue(3, Some(SatResult::Unsat)));
    }

    #[test]
    fn minimum_overrides_criterion() {
        let opts = SolveOptions {
            imin: 3,
            ..SolveOptions::default()
        };
        assert!(opts.should_continue(1, Some(SatResult::Sat)));
        assert!(opts.should_continue(2, Some(SatResult::Sat)));
        assert!(!opts.should_continue(3, Some(SatResult::Sat)));
    }

    #[test]
    fn maximum_overrides_everything() {
        let opts = SolveOptions {
            imin: 10,
            imax: Some(2),
            istop: StopCriterion::Sat,
        };
        assert!(opts.should_continue(1, Some(SatResult::Unsat)));
        assert!(!opts.should_continue(2, Some(SatResult::Unsat)));
    }
}
