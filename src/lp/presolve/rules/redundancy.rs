//! Bound- and rank-based redundancy elimination.

use crate::{E, WarningKind};
use crate::lp::LpState;
use crate::lp::presolve::activity::row_activities;
use crate::lp::presolve::detect::{linear_dependencies, negative_counterparts};
use crate::lp::presolve::journal::ChangeJournal;
use crate::lp::presolve::rules::{Reduction, warn};
use crate::PresolveWarning;

/// Removes equality rows with a zero right-hand side whose coefficients all
/// share a sign: with nonnegative variables such a row forces every
/// participating variable to zero, so the row and all its columns go.
pub(crate) struct RedundantColumns {}

impl Reduction for RedundantColumns {
    fn label(&self) -> &'static str {
        "Eliminate Redundant Columns"
    }

    fn apply(
        &self,
        state: &mut LpState,
        journal: &mut ChangeJournal,
        _warnings: &mut Vec<PresolveWarning>,
    ) {
        let pairs = negative_counterparts(&state.A, &state.b);

        let mut rows = Vec::new();
        let mut rows_original = Vec::new();
        let mut cols = Vec::new();
        let mut cols_original = Vec::new();

        for i in 0..state.get_n_cons() {
            if state.b[i] != 0. || !pairs.has(i) {
                continue;
            }
            let (row_cols, row_vals) = state.A.row(i);
            let uniform_sign = row_vals.iter().all(|&v| v >= 0.)
                || row_vals.iter().all(|&v| v <= 0.);
            if !uniform_sign {
                continue;
            }

            rows.push(i);
            rows_original.push(state.original_row_index[i]);
            for &j in row_cols {
                if !cols.contains(&j) {
                    cols.push(j);
                    cols_original.push(state.original_column_index[j]);
                }
            }
        }

        state.delete_rows(&rows);
        state.delete_cols(&cols);

        let changes = &mut journal.eliminate_redundant_columns;
        changes.deleted_variables_indices.extend(cols_original);
        changes.deleted_rows_indices.extend(rows_original);
    }
}

/// Compares each row's activity interval against its right-hand side:
/// vacuous rows are dropped, already-violated rows are dropped or flagged
/// (see [`drop_violated_rows`](Self::drop_violated_rows)), and rows whose
/// supremum cannot reach the right-hand side are reported infeasible.
pub(crate) struct ImpliedBounds {
    pub feasibility_tolerance: E,
    pub infinity: E,
    /// When set, a row with `INF > b + tol` is deleted as redundant;
    /// otherwise it is kept and reported infeasible.
    pub drop_violated_rows: bool,
}

impl Reduction for ImpliedBounds {
    fn label(&self) -> &'static str {
        "Eliminate Implied Bounds"
    }

    fn apply(
        &self,
        state: &mut LpState,
        journal: &mut ChangeJournal,
        warnings: &mut Vec<PresolveWarning>,
    ) {
        let activities = row_activities(state, self.infinity);

        let mut rows = Vec::new();
        let mut rows_original = Vec::new();
        // the three conditions are independent: a row deleted by one of the
        // first two can still raise the supremum warning
        for (i, activity) in activities.iter().enumerate() {
            if state.b[i] >= self.infinity {
                rows.push(i);
                rows_original.push(state.original_row_index[i]);
            }
            if activity.inf > state.b[i] + self.feasibility_tolerance {
                if !self.drop_violated_rows {
                    warn(
                        warnings,
                        WarningKind::Infeasible,
                        "eliminate_implied_bounds",
                        format!("the infimum of row {i} exceeds its right-hand side"),
                    );
                } else if rows.last() != Some(&i) {
                    rows.push(i);
                    rows_original.push(state.original_row_index[i]);
                }
            }
            if activity.sup < state.b[i] + self.feasibility_tolerance {
                warn(
                    warnings,
                    WarningKind::Infeasible,
                    "eliminate_implied_bounds",
                    format!("the supremum of row {i} is below its right-hand side"),
                );
            }
        }

        state.delete_rows(&rows);
        journal
            .eliminate_implied_bounds
            .deleted_rows_indices
            .extend(rows_original);
    }
}

/// Deletes rows that are linear combinations of other rows, keeping one
/// representative per dependency group together with its negative
/// counterpart.
pub(crate) struct RedundantRows {}

impl Reduction for RedundantRows {
    fn label(&self) -> &'static str {
        "Eliminate Redundant Rows"
    }

    fn apply(
        &self,
        state: &mut LpState,
        journal: &mut ChangeJournal,
        _warnings: &mut Vec<PresolveWarning>,
    ) {
        let dependencies = linear_dependencies(&state.A, &state.b);
        let pairs = negative_counterparts(&state.A, &state.b);

        let mut rows = Vec::new();
        let mut rows_original = Vec::new();
        for i in 0..state.get_n_cons() {
            if rows.contains(&i) || !dependencies.has_dependency[i] {
                continue;
            }
            for &j in &dependencies.dependent_rows[i] {
                if pairs.mate(i) == Some(j) {
                    continue;
                }
                if !rows.contains(&j) {
                    rows.push(j);
                    rows_original.push(state.original_row_index[j]);
                }
            }
        }

        state.delete_rows(&rows);
        journal
            .eliminate_redundant_rows
            .deleted_rows_indices
            .extend(rows_original);
    }
}
