use serde::Serialize;

/// Scalar element type used throughout the crate.
pub type E = f64;
/// Index type used throughout the crate.
pub type I = usize;

pub mod callback;
pub mod linalg;
pub mod lp;
pub mod terminators;

#[cfg(test)]
pub mod tests;

/// Status codes for a presolve run.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Status {
    #[default]
    /// The engine is still running.
    InProgress,
    /// A fixed point under the enabled rules was reached.
    Reduced,
    /// Reduction finished, but at least one rule detected infeasibility.
    Infeasible,
    /// Reduction finished, but at least one rule detected unboundedness.
    Unbounded,
    /// The run stopped at a rule boundary due to a time limit.
    TimeLimit,
    /// The run was interrupted (e.g., by user or signal) at a rule boundary.
    Interrupted,
}

/// The kind of model defect a rule detected.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum WarningKind {
    Infeasible,
    Unbounded,
}

/// A non-fatal defect report emitted by a reduction rule.
///
/// Warnings never abort the run; callers inspect them to decide whether the
/// reduced LP is worth handing to a solver.
#[derive(Debug, Clone, Serialize)]
pub struct PresolveWarning {
    pub kind: WarningKind,
    /// Journal key of the rule that emitted the warning.
    pub rule: &'static str,
    pub message: String,
}

/// Hooks observed by the orchestrator: a per-rule callback and a cooperative
/// terminator polled between rules.
pub struct PresolveHooks {
    pub callback: Box<dyn crate::callback::Callback>,
    pub terminator: Box<dyn crate::terminators::Terminator>,
}

impl Default for PresolveHooks {
    fn default() -> Self {
        Self {
            callback: Box::new(crate::callback::NoOpCallback {}),
            terminator: Box::new(crate::terminators::NoOpTerminator {}),
        }
    }
}
