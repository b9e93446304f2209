//! Singleton inequality elimination, row-wise and column-wise.
//!
//! A singleton row without a negative counterpart is a genuine one-variable
//! inequality; a singleton column is a variable that appears in a single
//! constraint. Both classify by a sign table: some cases are redundant given
//! the nonnegative-variable convention, some fix structure, and some expose
//! an infeasible or pathological model.

use crate::WarningKind;
use crate::lp::LpState;
use crate::lp::presolve::detect::{negative_counterparts, rows_with_support};
use crate::lp::presolve::journal::ChangeJournal;
use crate::lp::presolve::rules::{Reduction, warn};
use crate::PresolveWarning;

/// Removes singleton rows that are true inequalities.
pub(crate) struct SingletonInequalities {}

impl Reduction for SingletonInequalities {
    fn label(&self) -> &'static str {
        "Eliminate Singleton Inequalities"
    }

    fn apply(
        &self,
        state: &mut LpState,
        journal: &mut ChangeJournal,
        warnings: &mut Vec<PresolveWarning>,
    ) {
        let pairs = negative_counterparts(&state.A, &state.b);

        let mut rows = Vec::new();
        let mut rows_original = Vec::new();
        let mut cols = Vec::new();
        let mut cols_original = Vec::new();

        for i in rows_with_support(&state.A, 1) {
            if pairs.has(i) {
                continue;
            }

            let (row_cols, row_vals) = state.A.row(i);
            let k = row_cols[0];
            let a_ik = row_vals[0];
            let b_i = state.b[i];

            if a_ik > 0. && b_i < 0. {
                rows.push(i);
                rows_original.push(state.original_row_index[i]);
            } else if a_ik < 0. && b_i > 0. {
                warn(
                    warnings,
                    WarningKind::Infeasible,
                    "eliminate_singleton_inequalities",
                    "negative singleton inequality with a positive right-hand side",
                );
            } else if a_ik > 0. && b_i == 0. {
                rows.push(i);
                rows_original.push(state.original_row_index[i]);
            } else if a_ik < 0. && b_i == 0. {
                rows.push(i);
                rows_original.push(state.original_row_index[i]);
                if !cols.contains(&k) {
                    cols.push(k);
                    cols_original.push(state.original_column_index[k]);
                }
            }
        }

        state.delete_rows(&rows);
        state.delete_cols(&cols);

        let changes = &mut journal.eliminate_singleton_inequalities;
        changes.deleted_variables_indices.extend(cols_original);
        changes.deleted_rows_indices.extend(rows_original);
    }
}

/// Removes variables that appear in exactly one constraint.
pub(crate) struct DualSingletonInequalities {}

impl Reduction for DualSingletonInequalities {
    fn label(&self) -> &'static str {
        "Eliminate Dual Singleton Inequalities"
    }

    fn apply(
        &self,
        state: &mut LpState,
        journal: &mut ChangeJournal,
        warnings: &mut Vec<PresolveWarning>,
    ) {
        let counts = state.A.col_counts();

        let mut rows = Vec::new();
        let mut rows_original = Vec::new();
        let mut cols = Vec::new();
        let mut cols_original = Vec::new();

        for j in 0..state.get_n_vars() {
            if counts[j] != 1 {
                continue;
            }

            let column = state.A.col_dense(j);
            let Some(r) = column.iter().position(|&v| v != 0.) else {
                continue;
            };
            let a_rj = column[r];
            let c_j = state.c[j];

            if a_rj > 0. && c_j < 0. {
                warn(
                    warnings,
                    WarningKind::Infeasible,
                    "eliminate_dual_singleton_inequalities",
                    "positive singleton column with a negative cost",
                );
            } else if a_rj < 0. && c_j > 0. {
                cols.push(j);
                cols_original.push(state.original_column_index[j]);
            } else if a_rj > 0. && c_j == 0. {
                cols.push(j);
                cols_original.push(state.original_column_index[j]);
                if !rows.contains(&r) {
                    rows.push(r);
                    rows_original.push(state.original_row_index[r]);
                }
            } else if a_rj < 0. && c_j == 0. {
                cols.push(j);
                cols_original.push(state.original_column_index[j]);
            }
        }

        state.delete_rows(&rows);
        state.delete_cols(&cols);

        let changes = &mut journal.eliminate_dual_singleton_inequalities;
        changes.deleted_variables_indices.extend(cols_original);
        changes.deleted_rows_indices.extend(rows_original);
    }
}
