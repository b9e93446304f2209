//! Structural pattern detectors.
//!
//! The rules recognize three patterns: rows with a given support size, rows
//! whose exact negation also appears in the system (the encoding of an
//! equality in a ≤-only formulation), and rows that are linear combinations
//! of other rows.

use std::collections::BTreeSet;

use crate::{E, I};
use crate::linalg::csr::CsrMatrix;

/// Residual threshold below which a max-abs normalized row counts as a
/// linear combination of the rows before it.
const DEPENDENCY_EPS: E = 1e-9;

/// Indices of all rows with exactly `k` stored entries.
pub fn rows_with_support(a: &CsrMatrix, k: usize) -> Vec<I> {
    a.row_counts()
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count == k)
        .map(|(i, _)| i)
        .collect()
}

/// For each row, the first other row that is its exact negation (matching
/// right-hand sides included), if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeCounterparts {
    mate: Vec<Option<I>>,
}

impl NegativeCounterparts {
    /// Whether row `i` belongs to an equality pair.
    pub fn has(&self, i: I) -> bool {
        self.mate[i].is_some()
    }

    /// The mate of row `i`, undefined (`None`) when `has(i)` is false.
    pub fn mate(&self, i: I) -> Option<I> {
        self.mate[i]
    }
}

/// Finds, for every row `i`, some row `j != i` with `A[j,:] == -A[i,:]` and
/// `b[j] == -b[i]`. Comparison is exact.
pub fn negative_counterparts(a: &CsrMatrix, b: &[E]) -> NegativeCounterparts {
    let m = a.nrows();
    let mate = (0..m)
        .map(|i| (0..m).find(|&j| j != i && b[j] == -b[i] && rows_negated(a, i, j)))
        .collect();
    NegativeCounterparts { mate }
}

fn rows_negated(a: &CsrMatrix, i: I, j: I) -> bool {
    let (icols, ivals) = a.row(i);
    let (jcols, jvals) = a.row(j);
    icols == jcols && ivals.iter().zip(jvals).all(|(&x, &y)| y == -x)
}

/// Linear dependencies among the rows of `[A | b]`.
///
/// `dependent_rows[i]` lists the other members of every dependency group row
/// `i` participates in; `has_dependency[i]` is the matching flag. A row and
/// its negative counterpart always form such a group, which is why the
/// redundant-row rule skips mates when it deletes.
#[derive(Debug, Clone)]
pub struct LinearDependencies {
    pub dependent_rows: Vec<Vec<I>>,
    pub has_dependency: Vec<bool>,
}

/// Detects dependency groups by incremental Gauss–Jordan elimination over
/// the max-abs normalized rows of `[A | b]`.
///
/// Rows are processed in order. Alongside each reduced row a combination
/// vector over the original rows is carried, so a row that reduces to
/// (numerically) zero knows exactly which earlier rows it is a combination
/// of; those rows form its dependency group. Zero rows never participate.
pub fn linear_dependencies(a: &CsrMatrix, b: &[E]) -> LinearDependencies {
    struct BasisRow {
        pivot: usize,
        row: Vec<E>,
        /// `row == combo · normalized original rows`.
        combo: Vec<E>,
    }

    let m = a.nrows();
    let mut dependent: Vec<BTreeSet<I>> = vec![BTreeSet::new(); m];
    let mut has_dependency = vec![false; m];
    let mut basis: Vec<BasisRow> = Vec::new();

    for i in 0..m {
        let mut row = a.row_dense(i);
        row.push(b[i]);

        let scale = max_abs(&row);
        if scale == 0. {
            continue;
        }
        for x in &mut row {
            *x /= scale;
        }

        let mut combo = vec![0.; m];
        combo[i] = 1.;
        for entry in &basis {
            let coef = row[entry.pivot];
            if coef != 0. {
                for (x, y) in row.iter_mut().zip(&entry.row) {
                    *x -= coef * y;
                }
                row[entry.pivot] = 0.;
                for (x, y) in combo.iter_mut().zip(&entry.combo) {
                    *x -= coef * y;
                }
            }
        }

        if max_abs(&row) <= DEPENDENCY_EPS {
            let group = combo
                .iter()
                .enumerate()
                .filter(|&(_, &coef)| coef.abs() > DEPENDENCY_EPS)
                .map(|(j, _)| j)
                .collect::<BTreeSet<_>>();
            for &x in &group {
                has_dependency[x] = true;
                dependent[x].extend(group.iter().copied().filter(|&y| y != x));
            }
            continue;
        }

        // independent: normalize on the largest entry and keep the basis in
        // reduced form so future rows reduce in a single pass
        let pivot = arg_max_abs(&row);
        let pv = row[pivot];
        for x in &mut row {
            *x /= pv;
        }
        for x in &mut combo {
            *x /= pv;
        }
        for entry in &mut basis {
            let coef = entry.row[pivot];
            if coef != 0. {
                for (x, y) in entry.row.iter_mut().zip(&row) {
                    *x -= coef * y;
                }
                entry.row[pivot] = 0.;
                for (x, y) in entry.combo.iter_mut().zip(&combo) {
                    *x -= coef * y;
                }
            }
        }
        basis.push(BasisRow { pivot, row, combo });
    }

    LinearDependencies {
        dependent_rows: dependent
            .into_iter()
            .map(|set| set.into_iter().collect())
            .collect(),
        has_dependency,
    }
}

fn max_abs(row: &[E]) -> E {
    row.iter().fold(0., |acc: E, &v| acc.max(v.abs()))
}

fn arg_max_abs(row: &[E]) -> usize {
    let mut best = 0;
    for (k, v) in row.iter().enumerate() {
        if v.abs() > row[best].abs() {
            best = k;
        }
    }
    best
}
