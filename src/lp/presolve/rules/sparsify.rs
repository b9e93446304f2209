//! Small-coefficient sparsification.

use crate::E;
use crate::lp::LpState;
use crate::lp::presolve::journal::ChangeJournal;
use crate::lp::presolve::rules::Reduction;
use crate::linalg::scaling::{normalize_rows, sparsify};
use crate::PresolveWarning;

/// Zeroes coefficients that are negligible on their row's scale.
///
/// The matrix is row-normalized, entries of the normalized copy below the
/// threshold are identified, and the corresponding entries of the original
/// matrix are removed. Right-hand sides, costs, and bounds are untouched;
/// the structural rules that follow pick up the slack.
pub(crate) struct SmallCoefficients {
    pub threshold: E,
}

impl Reduction for SmallCoefficients {
    fn label(&self) -> &'static str {
        "Reduction Small Coefficients"
    }

    fn apply(
        &self,
        state: &mut LpState,
        _journal: &mut ChangeJournal,
        _warnings: &mut Vec<PresolveWarning>,
    ) {
        let (normalized, _) = normalize_rows(&state.A);
        sparsify(self.threshold, &normalized, &mut state.A);
    }
}
