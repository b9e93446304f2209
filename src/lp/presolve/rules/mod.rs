//! The reduction rules.
//!
//! Each rule is a single idempotent transformation of the LP state: locate a
//! structural pattern, mutate the matrices and every parallel vector
//! consistently, journal the removals in original indices, and report model
//! defects as warnings rather than errors.

pub mod equality;
pub mod inequality;
pub mod redundancy;
pub mod sparsify;
pub mod zero;

use enum_dispatch::enum_dispatch;

use crate::lp::LpState;
use crate::lp::presolve::journal::ChangeJournal;
use crate::{PresolveWarning, WarningKind};

pub(crate) use self::equality::{KtonEqualities, SingletonEqualities};
pub(crate) use self::inequality::{DualSingletonInequalities, SingletonInequalities};
pub(crate) use self::redundancy::{ImpliedBounds, RedundantColumns, RedundantRows};
pub(crate) use self::sparsify::SmallCoefficients;
pub(crate) use self::zero::{ZeroColumns, ZeroRows};

/// A single reduction applied by the orchestrator.
#[enum_dispatch]
pub(crate) trait Reduction {
    /// Label recorded in the operation table.
    fn label(&self) -> &'static str;

    /// Applies the rule once (internally iterative rules run to their own
    /// fixed point), journaling removals and pushing warnings.
    fn apply(
        &self,
        state: &mut LpState,
        journal: &mut ChangeJournal,
        warnings: &mut Vec<PresolveWarning>,
    );
}

/// The rule set, dispatched statically in the orchestrator's fixed order.
#[enum_dispatch(Reduction)]
pub(crate) enum Rule {
    SmallCoefficients,
    ImpliedBounds,
    RedundantRows,
    KtonEqualities,
    SingletonEqualities,
    SingletonInequalities,
    DualSingletonInequalities,
    RedundantColumns,
    ZeroRows,
    ZeroColumns,
}

pub(crate) fn warn(
    warnings: &mut Vec<PresolveWarning>,
    kind: WarningKind,
    rule: &'static str,
    message: impl Into<String>,
) {
    warnings.push(PresolveWarning {
        kind,
        rule,
        message: message.into(),
    });
}
