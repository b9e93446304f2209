//! Zero-row and zero-column elimination.

use crate::WarningKind;
use crate::lp::LpState;
use crate::lp::presolve::journal::ChangeJournal;
use crate::lp::presolve::rules::{Reduction, warn};
use crate::PresolveWarning;

/// Deletes rows with no coefficients. A zero row with a positive
/// right-hand side is unsatisfiable and additionally raises an
/// infeasibility warning.
pub(crate) struct ZeroRows {}

impl Reduction for ZeroRows {
    fn label(&self) -> &'static str {
        "Eliminate Zero Rows"
    }

    fn apply(
        &self,
        state: &mut LpState,
        journal: &mut ChangeJournal,
        warnings: &mut Vec<PresolveWarning>,
    ) {
        let mut to_delete = Vec::new();
        let mut to_delete_original = Vec::new();
        for (i, &count) in state.A.row_counts().iter().enumerate() {
            if count != 0 {
                continue;
            }
            if state.b[i] > 0. {
                warn(
                    warnings,
                    WarningKind::Infeasible,
                    "eliminate_zero_rows",
                    "zero row with a positive right-hand side",
                );
            }
            to_delete.push(i);
            to_delete_original.push(state.original_row_index[i]);
        }

        state.delete_rows(&to_delete);
        journal
            .eliminate_zero_rows
            .deleted_rows_indices
            .extend(to_delete_original);
    }
}

/// Classifies empty columns by their cost: a nonnegative cost fixes the
/// variable at zero (journaled as a solution entry); a negative cost means
/// the LP is unbounded in that coordinate.
pub(crate) struct ZeroColumns {}

impl Reduction for ZeroColumns {
    fn label(&self) -> &'static str {
        "Eliminate Zero Columns"
    }

    fn apply(
        &self,
        state: &mut LpState,
        journal: &mut ChangeJournal,
        warnings: &mut Vec<PresolveWarning>,
    ) {
        let mut to_delete = Vec::new();
        let mut to_delete_original = Vec::new();
        for (j, &count) in state.A.col_counts().iter().enumerate() {
            if count != 0 {
                continue;
            }
            if state.c[j] >= 0. {
                to_delete.push(j);
                to_delete_original.push(state.original_column_index[j]);
                journal
                    .eliminate_zero_columns
                    .solution
                    .insert(state.variable_names[j].clone(), 0.);
            } else {
                warn(
                    warnings,
                    WarningKind::Unbounded,
                    "eliminate_zero_columns",
                    "empty column with a negative cost coefficient",
                );
            }
        }

        state.delete_cols(&to_delete);
        journal
            .eliminate_zero_columns
            .deleted_columns
            .extend(to_delete_original);
    }
}
