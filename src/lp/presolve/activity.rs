//! Row-activity analysis.
//!
//! For each row the activity `A[i,:] · x` ranges over an interval as `x`
//! ranges over the bound box `[lb, ub]`; the implied-bound rule compares the
//! endpoints of that interval against the right-hand side.

use crate::{E, I};
use crate::lp::LpState;

/// Support and activity bounds of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowActivity {
    /// Column indices where the row is nonzero.
    pub supp: Vec<I>,
    /// Infimum of the row activity over the bound box.
    pub inf: E,
    /// Supremum of the row activity over the bound box.
    pub sup: E,
}

/// Computes `(SUPP, INF, SUP)` for every row.
///
/// A bound whose magnitude reaches `infinity` is treated as unbounded and
/// propagates as ±∞ with the sign of its contribution. An infinite
/// contribution dominates the finite part of the sum.
pub fn row_activities(state: &LpState, infinity: E) -> Vec<RowActivity> {
    (0..state.A.nrows())
        .map(|i| {
            let (cols, vals) = state.A.row(i);

            let mut inf = 0.;
            let mut sup = 0.;
            let mut inf_unbounded = false;
            let mut sup_unbounded = false;
            for (&j, &a) in cols.iter().zip(vals) {
                // the bound attaining the infimum and the one attaining the
                // supremum swap places when the coefficient is negative
                let (lo, hi) = if a > 0. {
                    (state.lb[j], state.ub[j])
                } else {
                    (state.ub[j], state.lb[j])
                };

                if lo.abs() >= infinity {
                    // only the downward direction can unbound an infimum
                    inf_unbounded |= a * lo.signum() < 0.;
                } else {
                    inf += a * lo;
                }
                if hi.abs() >= infinity {
                    sup_unbounded |= a * hi.signum() > 0.;
                } else {
                    sup += a * hi;
                }
            }

            RowActivity {
                supp: cols.to_vec(),
                inf: if inf_unbounded { -E::INFINITY } else { inf },
                sup: if sup_unbounded { E::INFINITY } else { sup },
            }
        })
        .collect()
}
