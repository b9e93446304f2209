//! Shared fixtures for the crate tests.

use faer::{
    Col,
    sparse::{SparseColMat, Triplet},
};

use crate::lp::{ConstraintSense, LpState, ObjectiveSense};
use crate::{E, I};

/// Builds an [`LpState`] from dense rows, with `lb = 0`, `ub = +inf`, a zero
/// objective constant, all-`<=` senses, and variables named `x0, x1, ...`.
pub(crate) fn state_from_dense(rows: &[Vec<E>], b: &[E], c: &[E]) -> LpState {
    let m = rows.len();
    let n = c.len();

    let triplets = rows
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| v != 0.)
                .map(move |(j, &v)| Triplet::<I, I, E>::new(i, j, v))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let a = SparseColMat::try_new_from_triplets(m, n, triplets.as_slice()).unwrap();

    LpState::try_new(
        a,
        Col::from_fn(m, |i| b[i]),
        Col::from_fn(n, |j| c[j]),
        0.,
        Col::zeros(n),
        E::INFINITY * Col::<E>::ones(n),
        ObjectiveSense::Minimize,
        vec![ConstraintSense::Le; m],
        (0..n).map(|j| format!("x{j}")).collect(),
    )
    .unwrap()
}
