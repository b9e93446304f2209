//! Row scaling helpers shared by the sparsification rule and downstream
//! consumers that want the constraint matrix on a comparable per-row scale.

use crate::E;
use crate::linalg::csr::CsrMatrix;

/// The maximum absolute value of each row. Empty rows scale as zero.
pub fn row_scales(a: &CsrMatrix) -> Vec<E> {
    (0..a.nrows())
        .map(|i| {
            let (_, vals) = a.row(i);
            vals.iter().fold(0., |acc: E, &v| acc.max(v.abs()))
        })
        .collect()
}

/// Returns a copy of `a` with every row divided by its maximum absolute
/// value, together with the scales used.
pub fn normalize_rows(a: &CsrMatrix) -> (CsrMatrix, Vec<E>) {
    let scales = row_scales(a);
    let mut normalized = a.clone();
    for (i, &scale) in scales.iter().enumerate() {
        if scale != 0. {
            normalized.scale_row(i, 1. / scale);
        }
    }
    (normalized, scales)
}

/// Removes from `a` every entry whose counterpart in `normalized` has
/// magnitude below `threshold`.
///
/// `normalized` must share `a`'s sparsity pattern (as produced by
/// [`normalize_rows`]). A threshold of zero keeps every entry.
pub fn sparsify(threshold: E, normalized: &CsrMatrix, a: &mut CsrMatrix) {
    a.retain(|i, j, _| normalized.get(i, j).abs() >= threshold);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CsrMatrix {
        CsrMatrix::from_dense(&[vec![4., 0.2, 0.], vec![0., 0., 0.], vec![0., 0.5, 1.]])
    }

    #[test]
    fn test_row_scales() {
        assert_eq!(row_scales(&sample()), vec![4., 0., 1.]);
    }

    #[test]
    fn test_normalize_rows() {
        let (normalized, scales) = normalize_rows(&sample());
        assert_eq!(scales, vec![4., 0., 1.]);
        assert_eq!(normalized.row_dense(0), vec![1., 0.05, 0.]);
        assert_eq!(normalized.row_dense(2), vec![0., 0.5, 1.]);
    }

    #[test]
    fn test_sparsify_drops_relatively_small_entries() {
        let mut a = sample();
        let (normalized, _) = normalize_rows(&a);
        sparsify(0.5, &normalized, &mut a);
        // 0.2/4 = 0.05 < 0.5 goes; 0.5/1 survives at the boundary
        assert_eq!(a.row_dense(0), vec![4., 0., 0.]);
        assert_eq!(a.row_dense(2), vec![0., 0.5, 1.]);
    }

    #[test]
    fn test_sparsify_zero_threshold_is_noop() {
        let mut a = sample();
        let before = a.clone();
        let (normalized, _) = normalize_rows(&a);
        sparsify(0., &normalized, &mut a);
        assert_eq!(a, before);
    }
}
