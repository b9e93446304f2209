//! Substitution of variables pinned down by equality rows.
//!
//! Equalities arrive encoded as pairs of rows that are exact negations of
//! each other. A singleton pair fixes its variable outright; a k-ton pair is
//! solved for its last variable, which is eliminated from the rest of the
//! system by Gaussian substitution. Both rules iterate to a fixed point
//! because each substitution can expose new candidates.

use crate::WarningKind;
use crate::lp::LpState;
use crate::lp::presolve::detect::{negative_counterparts, rows_with_support};
use crate::lp::presolve::journal::{ChangeJournal, KtonSolution, Substitution};
use crate::lp::presolve::rules::{Reduction, warn};
use crate::PresolveWarning;

/// Fixes the variable of every singleton equality row and removes the pair.
pub(crate) struct SingletonEqualities {}

impl Reduction for SingletonEqualities {
    fn label(&self) -> &'static str {
        "Eliminate Singleton Equalities"
    }

    fn apply(
        &self,
        state: &mut LpState,
        journal: &mut ChangeJournal,
        warnings: &mut Vec<PresolveWarning>,
    ) {
        loop {
            let pairs = negative_counterparts(&state.A, &state.b);
            let found = rows_with_support(&state.A, 1)
                .into_iter()
                .find(|&i| pairs.has(i));
            let Some(i) = found else {
                break;
            };
            let Some(mate) = pairs.mate(i) else {
                break;
            };

            let (cols, vals) = state.A.row(i);
            let k = cols[0];
            let x_k = state.b[i] / vals[0];
            if x_k < 0. {
                warn(
                    warnings,
                    WarningKind::Infeasible,
                    "eliminate_singleton_equalities",
                    "singleton equality fixes a variable at a negative value",
                );
                break;
            }

            let name = state.variable_names[k].clone();
            let original_rows = vec![state.original_row_index[i], state.original_row_index[mate]];
            let original_column = state.original_column_index[k];

            // substitute x_k into every row before anything moves
            let column = state.A.col_dense(k);
            for (r, rhs) in state.b.iter_mut().enumerate() {
                *rhs -= column[r] * x_k;
            }
            if state.c[k] != 0. {
                state.co -= state.c[k] * x_k;
            }

            state.delete_rows(&[i, mate]);
            state.delete_cols(&[k]);

            let changes = &mut journal.eliminate_singleton_equalities;
            changes.eliminated.insert(
                name.clone(),
                Substitution {
                    deleted_variables_indices: original_column,
                    deleted_rows_indices: original_rows,
                },
            );
            changes.solutions.insert(name, x_k);
        }
    }
}

/// Solves every k-ton equality row for its last variable and eliminates
/// that variable from the whole system.
pub(crate) struct KtonEqualities {
    pub k: usize,
}

impl Reduction for KtonEqualities {
    fn label(&self) -> &'static str {
        "Eliminate Kton Equalities"
    }

    fn apply(
        &self,
        state: &mut LpState,
        journal: &mut ChangeJournal,
        _warnings: &mut Vec<PresolveWarning>,
    ) {
        if self.k == 0 {
            return;
        }

        loop {
            let pairs = negative_counterparts(&state.A, &state.b);
            let found = rows_with_support(&state.A, self.k)
                .into_iter()
                .find(|&i| pairs.has(i));
            let Some(i) = found else {
                break;
            };
            let Some(mate) = pairs.mate(i) else {
                break;
            };

            let (cols, vals) = state.A.row(i);
            let pivot = cols[cols.len() - 1];
            let a_pivot = vals[vals.len() - 1];

            let name = state.variable_names[pivot].clone();
            let original_rows = vec![state.original_row_index[i], state.original_row_index[mate]];
            let original_column = state.original_column_index[pivot];
            // the symbolic expression is snapshotted before the row is scaled
            let solution = KtonSolution {
                lhs: state.A.row_dense(i),
                rhs: state.b[i],
                variables: state.variable_names.clone(),
            };

            // normalize the pivot row so the pivot coefficient is one
            state.b[i] /= a_pivot;
            state.A.scale_row(i, 1. / a_pivot);

            // eliminate the pivot column from every other row
            let b_i = state.b[i];
            for r in 0..state.get_n_cons() {
                if r == i {
                    continue;
                }
                let a_r = state.A.get(r, pivot);
                if a_r != 0. {
                    state.b[r] -= a_r * b_i;
                    state.A.sub_scaled_row(r, i, a_r);
                }
            }

            // move the pivot's cost onto the remaining variables
            let c_pivot = state.c[pivot];
            state.co += c_pivot * b_i;
            if c_pivot != 0. {
                let (cols, vals) = state.A.row(i);
                let updates = cols
                    .iter()
                    .zip(vals)
                    .map(|(&j, &v)| (j, v))
                    .collect::<Vec<_>>();
                for (j, v) in updates {
                    state.c[j] -= c_pivot * v;
                }
            }

            state.delete_cols(&[pivot]);

            // the halved equality that remains is a ">=" in disguise; negate
            // it back into canonical "<=" form
            state.A.negate_row(i);
            state.b[i] = -state.b[i];

            state.delete_rows(&[mate]);

            let changes = &mut journal.eliminate_kton_equalities;
            changes.eliminated.insert(
                name.clone(),
                Substitution {
                    deleted_variables_indices: original_column,
                    deleted_rows_indices: original_rows,
                },
            );
            changes.solutions.insert(name, solution);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::util::state_from_dense;

    fn apply(rule: &dyn Reduction, state: &mut LpState) -> (ChangeJournal, Vec<PresolveWarning>) {
        let mut journal = ChangeJournal::default();
        let mut warnings = Vec::new();
        rule.apply(state, &mut journal, &mut warnings);
        (journal, warnings)
    }

    #[test]
    fn test_singleton_equality_fixes_variable() {
        // rows 0/1 encode 2*x0 = 6
        let mut state = state_from_dense(
            &[
                vec![2., 0., 0.],
                vec![-2., 0., 0.],
                vec![0., 1., 1.],
            ],
            &[6., -6., 5.],
            &[1., 1., 1.],
        );

        let (journal, warnings) = apply(&SingletonEqualities {}, &mut state);

        assert!(warnings.is_empty());
        assert_eq!(state.get_n_cons(), 1);
        assert_eq!(state.get_n_vars(), 2);
        assert_eq!(state.A.row_dense(0), vec![1., 1.]);
        // A[2,0] was zero, so the surviving right-hand side is untouched
        assert_eq!(state.b, vec![5.]);
        assert_eq!(state.co, -3.);

        let changes = &journal.eliminate_singleton_equalities;
        assert_eq!(changes.solutions.get("x0"), Some(&3.));
        let substitution = changes.eliminated.get("x0").unwrap();
        assert_eq!(substitution.deleted_variables_indices, 0);
        assert_eq!(substitution.deleted_rows_indices, vec![0, 1]);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_singleton_equality_substitutes_into_other_rows() {
        // x1 = 2, and row 2 contains x1
        let mut state = state_from_dense(
            &[
                vec![0., 1., 0.],
                vec![0., -1., 0.],
                vec![1., 3., 1.],
            ],
            &[2., -2., 10.],
            &[0., 4., 0.],
        );

        let (journal, _) = apply(&SingletonEqualities {}, &mut state);

        assert_eq!(state.get_n_cons(), 1);
        assert_eq!(state.A.row_dense(0), vec![1., 1.]);
        assert_eq!(state.b, vec![10. - 3. * 2.]);
        assert_eq!(state.co, -8.);
        assert_eq!(
            journal.eliminate_singleton_equalities.solutions.get("x1"),
            Some(&2.)
        );
    }

    #[test]
    fn test_singleton_chain_reaches_fixed_point() {
        // fixing x0 = 1 turns rows 2/3 into a singleton equality on x1
        let mut state = state_from_dense(
            &[
                vec![1., 0.],
                vec![-1., 0.],
                vec![1., 1.],
                vec![-1., -1.],
            ],
            &[1., -1., 3., -3.],
            &[1., 1.],
        );

        let (journal, warnings) = apply(&SingletonEqualities {}, &mut state);

        assert!(warnings.is_empty());
        assert_eq!(state.get_n_cons(), 0);
        assert_eq!(state.get_n_vars(), 0);
        let solutions = &journal.eliminate_singleton_equalities.solutions;
        assert_eq!(solutions.get("x0"), Some(&1.));
        assert_eq!(solutions.get("x1"), Some(&2.));
        assert_eq!(state.co, -3.);
    }

    #[test]
    fn test_negative_singleton_value_warns_and_stops() {
        let mut state = state_from_dense(
            &[vec![1., 0.], vec![-1., 0.]],
            &[-2., 2.],
            &[1., 1.],
        );

        let (journal, warnings) = apply(&SingletonEqualities {}, &mut state);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::Infeasible);
        assert_eq!(state.get_n_cons(), 2);
        assert!(journal.eliminate_singleton_equalities.solutions.is_empty());
    }

    #[test]
    fn test_two_nonzero_row_is_not_a_singleton() {
        let mut state = state_from_dense(
            &[
                vec![2., 1., 0.],
                vec![-2., -1., 0.],
                vec![0., 1., 1.],
            ],
            &[4., -4., 5.],
            &[1., 1., 1.],
        );

        let (journal, _) = apply(&SingletonEqualities {}, &mut state);

        assert!(journal.is_empty());
        assert_eq!(state.get_n_cons(), 3);
    }

    #[test]
    fn test_kton_elimination() {
        // rows 0/1 encode x0 + 2*x1 = 4; pivot is x1
        let mut state = state_from_dense(
            &[
                vec![1., 2., 0.],
                vec![-1., -2., 0.],
                vec![0., 1., 1.],
            ],
            &[4., -4., 5.],
            &[1., 1., 1.],
        );

        let (journal, warnings) = apply(&KtonEqualities { k: 2 }, &mut state);

        assert!(warnings.is_empty());
        assert_eq!(state.get_n_cons(), 2);
        assert_eq!(state.get_n_vars(), 2);
        // halved equality, negated into "<=" form: -0.5*x0 <= -2
        assert_eq!(state.A.row_dense(0), vec![-0.5, 0.]);
        assert_eq!(state.b[0], -2.);
        // row 2 after substitution: -0.5*x0 + x2 <= 3
        assert_eq!(state.A.row_dense(1), vec![-0.5, 1.]);
        assert_eq!(state.b[1], 3.);
        // objective: co += c1 * 2; c -= c1 * [0.5, 1, 0]
        assert_eq!(state.co, 2.);
        assert_eq!(state.c, vec![0.5, 1.]);

        let changes = &journal.eliminate_kton_equalities;
        let substitution = changes.eliminated.get("x1").unwrap();
        assert_eq!(substitution.deleted_variables_indices, 1);
        assert_eq!(substitution.deleted_rows_indices, vec![0, 1]);
        let solution = changes.solutions.get("x1").unwrap();
        assert_eq!(solution.lhs, vec![1., 2., 0.]);
        assert_eq!(solution.rhs, 4.);
        assert_eq!(
            solution.variables,
            vec!["x0".to_string(), "x1".to_string(), "x2".to_string()]
        );
        assert!(state.is_consistent());
    }

    #[test]
    fn test_kton_ignores_rows_of_other_support() {
        let mut state = state_from_dense(
            &[
                vec![1., 2., 3.],
                vec![-1., -2., -3.],
            ],
            &[4., -4.],
            &[1., 1., 1.],
        );

        let (journal, _) = apply(&KtonEqualities { k: 2 }, &mut state);

        assert!(journal.is_empty());
        assert_eq!(state.get_n_cons(), 2);
    }
}
