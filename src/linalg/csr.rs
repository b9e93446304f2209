//! Compressed sparse-row matrix kernel.
//!
//! The reduction rules mutate the constraint matrix heavily: rows and columns
//! disappear, rows are rescaled and combined, and entries are pruned. The
//! column-major [`SparseColMat`] used at the crate boundary is immutable once
//! assembled, so the engine works on this row-major structure and converts at
//! the edges.
//!
//! Invariants: column indices are strictly increasing within each row, and no
//! explicit zeros are stored. Every mutating operation restores both.

use faer::sparse::{SparseColMat, Triplet};

use crate::{E, I};

/// A real-valued sparse matrix in compressed sparse-row form.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    ncols: usize,
    row_ptr: Vec<I>,
    col_idx: Vec<I>,
    val: Vec<E>,
}

impl CsrMatrix {
    /// Builds a matrix from `(row, col, value)` triplets.
    ///
    /// Duplicate entries are summed; entries that are (or sum to) zero are not
    /// stored.
    pub fn from_triplets(nrows: usize, ncols: usize, entries: &[(I, I, E)]) -> Self {
        let mut rows: Vec<Vec<(I, E)>> = vec![Vec::new(); nrows];
        for &(i, j, v) in entries {
            assert!(i < nrows && j < ncols, "triplet out of bounds");
            rows[i].push((j, v));
        }

        let mut row_ptr = Vec::with_capacity(nrows + 1);
        let mut col_idx = Vec::with_capacity(entries.len());
        let mut val = Vec::with_capacity(entries.len());
        row_ptr.push(0);
        for row in &mut rows {
            row.sort_unstable_by_key(|&(j, _)| j);
            let mut k = 0;
            while k < row.len() {
                let j = row[k].0;
                let mut v = 0.;
                while k < row.len() && row[k].0 == j {
                    v += row[k].1;
                    k += 1;
                }
                if v != 0. {
                    col_idx.push(j);
                    val.push(v);
                }
            }
            row_ptr.push(col_idx.len());
        }

        Self {
            ncols,
            row_ptr,
            col_idx,
            val,
        }
    }

    /// Builds a matrix from dense rows. All rows must have the same length.
    pub fn from_dense(rows: &[Vec<E>]) -> Self {
        let ncols = rows.first().map_or(0, Vec::len);
        let entries: Vec<(I, I, E)> = rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                assert_eq!(row.len(), ncols, "ragged dense input");
                row.iter()
                    .enumerate()
                    .filter(|&(_, &v)| v != 0.)
                    .map(move |(j, &v)| (i, j, v))
                    .collect::<Vec<_>>()
            })
            .collect();
        Self::from_triplets(rows.len(), ncols, &entries)
    }

    /// Converts a column-major faer matrix into the kernel representation.
    pub fn from_faer(a: &SparseColMat<I, E>) -> Self {
        let a_csr = a.to_row_major().unwrap();
        let row_ptr = a_csr.symbolic().row_ptr();
        let col_idx = a_csr.symbolic().col_idx();
        let values = a_csr.val();

        let mut entries = Vec::with_capacity(values.len());
        for i in 0..a.nrows() {
            for k in row_ptr[i]..row_ptr[i + 1] {
                entries.push((i, col_idx[k], values[k]));
            }
        }
        Self::from_triplets(a.nrows(), a.ncols(), &entries)
    }

    /// Converts back into a column-major faer matrix.
    pub fn to_faer(&self) -> SparseColMat<I, E> {
        let triplets = self
            .entries()
            .map(|(i, j, v)| Triplet::new(i, j, v))
            .collect::<Vec<_>>();
        SparseColMat::try_new_from_triplets(self.nrows(), self.ncols, triplets.as_slice()).unwrap()
    }

    pub fn nrows(&self) -> usize {
        self.row_ptr.len() - 1
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored (nonzero) entries.
    pub fn nnz(&self) -> usize {
        self.val.len()
    }

    /// The column indices and values of row `i`.
    pub fn row(&self, i: I) -> (&[I], &[E]) {
        let (start, end) = (self.row_ptr[i], self.row_ptr[i + 1]);
        (&self.col_idx[start..end], &self.val[start..end])
    }

    /// Iterates over all stored entries as `(row, col, value)`.
    pub fn entries(&self) -> impl Iterator<Item = (I, I, E)> + '_ {
        (0..self.nrows()).flat_map(move |i| {
            let (cols, vals) = self.row(i);
            cols.iter().zip(vals).map(move |(&j, &v)| (i, j, v))
        })
    }

    /// The entry at `(i, j)`, zero if not stored.
    pub fn get(&self, i: I, j: I) -> E {
        let (cols, vals) = self.row(i);
        match cols.binary_search(&j) {
            Ok(k) => vals[k],
            Err(_) => 0.,
        }
    }

    /// Row `i` as a dense vector.
    pub fn row_dense(&self, i: I) -> Vec<E> {
        let mut out = vec![0.; self.ncols];
        let (cols, vals) = self.row(i);
        for (&j, &v) in cols.iter().zip(vals) {
            out[j] = v;
        }
        out
    }

    /// Column `j` as a dense vector.
    pub fn col_dense(&self, j: I) -> Vec<E> {
        (0..self.nrows()).map(|i| self.get(i, j)).collect()
    }

    /// Number of stored entries in each row.
    pub fn row_counts(&self) -> Vec<usize> {
        self.row_ptr
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect()
    }

    /// Number of stored entries in each column.
    pub fn col_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.ncols];
        for &j in &self.col_idx {
            counts[j] += 1;
        }
        counts
    }

    /// Multiplies row `i` by `factor`.
    pub fn scale_row(&mut self, i: I, factor: E) {
        let (start, end) = (self.row_ptr[i], self.row_ptr[i + 1]);
        for v in &mut self.val[start..end] {
            *v *= factor;
        }
        if factor == 0. {
            self.replace_row(i, Vec::new());
        }
    }

    /// Negates row `i` in place.
    pub fn negate_row(&mut self, i: I) {
        self.scale_row(i, -1.);
    }

    /// Performs `row[target] -= factor * row[source]`.
    ///
    /// Entries that cancel exactly are dropped from storage.
    pub fn sub_scaled_row(&mut self, target: I, source: I, factor: E) {
        debug_assert_ne!(target, source);
        if factor == 0. {
            return;
        }

        let (scols, svals) = {
            let (c, v) = self.row(source);
            (c.to_vec(), v.to_vec())
        };
        let (tcols, tvals) = self.row(target);

        let mut merged = Vec::with_capacity(tcols.len() + scols.len());
        let (mut p, mut q) = (0, 0);
        while p < tcols.len() || q < scols.len() {
            let (j, v) = if q >= scols.len() || (p < tcols.len() && tcols[p] < scols[q]) {
                let out = (tcols[p], tvals[p]);
                p += 1;
                out
            } else if p >= tcols.len() || scols[q] < tcols[p] {
                let out = (scols[q], -factor * svals[q]);
                q += 1;
                out
            } else {
                let out = (tcols[p], tvals[p] - factor * svals[q]);
                p += 1;
                q += 1;
                out
            };
            if v != 0. {
                merged.push((j, v));
            }
        }

        self.replace_row(target, merged);
    }

    /// Deletes the given rows. Indices may be unsorted and repeated.
    pub fn delete_rows(&mut self, rows: &[I]) {
        let marks = sorted_unique(rows);
        if marks.is_empty() {
            return;
        }

        let mut row_ptr = Vec::with_capacity(self.nrows() + 1 - marks.len());
        let mut col_idx = Vec::with_capacity(self.col_idx.len());
        let mut val = Vec::with_capacity(self.val.len());
        row_ptr.push(0);
        for i in 0..self.nrows() {
            if marks.binary_search(&i).is_ok() {
                continue;
            }
            let (cols, vals) = self.row(i);
            col_idx.extend_from_slice(cols);
            val.extend_from_slice(vals);
            row_ptr.push(col_idx.len());
        }

        self.row_ptr = row_ptr;
        self.col_idx = col_idx;
        self.val = val;
    }

    /// Deletes the given columns, remapping the indices of the survivors.
    /// Indices may be unsorted and repeated.
    pub fn delete_cols(&mut self, cols: &[I]) {
        let marks = sorted_unique(cols);
        if marks.is_empty() {
            return;
        }

        let mut remap = vec![usize::MAX; self.ncols];
        let mut kept = 0;
        for (j, slot) in remap.iter_mut().enumerate() {
            if marks.binary_search(&j).is_err() {
                *slot = kept;
                kept += 1;
            }
        }

        let mut row_ptr = Vec::with_capacity(self.row_ptr.len());
        let mut col_idx = Vec::with_capacity(self.col_idx.len());
        let mut val = Vec::with_capacity(self.val.len());
        row_ptr.push(0);
        for i in 0..self.nrows() {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals) {
                if remap[j] != usize::MAX {
                    col_idx.push(remap[j]);
                    val.push(v);
                }
            }
            row_ptr.push(col_idx.len());
        }

        self.ncols = kept;
        self.row_ptr = row_ptr;
        self.col_idx = col_idx;
        self.val = val;
    }

    /// Keeps only the entries for which `keep(row, col, value)` holds.
    pub fn retain<F: FnMut(I, I, E) -> bool>(&mut self, mut keep: F) {
        let mut row_ptr = Vec::with_capacity(self.row_ptr.len());
        let mut col_idx = Vec::with_capacity(self.col_idx.len());
        let mut val = Vec::with_capacity(self.val.len());
        row_ptr.push(0);
        for i in 0..self.nrows() {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals) {
                if keep(i, j, v) {
                    col_idx.push(j);
                    val.push(v);
                }
            }
            row_ptr.push(col_idx.len());
        }

        self.row_ptr = row_ptr;
        self.col_idx = col_idx;
        self.val = val;
    }

    fn replace_row(&mut self, i: I, entries: Vec<(I, E)>) {
        let (start, end) = (self.row_ptr[i], self.row_ptr[i + 1]);
        let delta = entries.len() as isize - (end - start) as isize;
        self.col_idx.splice(start..end, entries.iter().map(|&(j, _)| j));
        self.val.splice(start..end, entries.iter().map(|&(_, v)| v));
        for p in self.row_ptr.iter_mut().skip(i + 1) {
            *p = (*p as isize + delta) as usize;
        }
    }
}

fn sorted_unique(indices: &[I]) -> Vec<I> {
    let mut out = indices.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CsrMatrix {
        // [ 2  1  0 ]
        // [-2 -1  0 ]
        // [ 0  1  1 ]
        CsrMatrix::from_dense(&[
            vec![2., 1., 0.],
            vec![-2., -1., 0.],
            vec![0., 1., 1.],
        ])
    }

    #[test]
    fn test_construction_and_counts() {
        let a = sample();
        assert_eq!(a.nrows(), 3);
        assert_eq!(a.ncols(), 3);
        assert_eq!(a.nnz(), 6);
        assert_eq!(a.row_counts(), vec![2, 2, 2]);
        assert_eq!(a.col_counts(), vec![2, 3, 1]);
        assert_eq!(a.get(1, 0), -2.);
        assert_eq!(a.get(0, 2), 0.);
    }

    #[test]
    fn test_duplicate_triplets_are_summed() {
        let a = CsrMatrix::from_triplets(1, 2, &[(0, 0, 1.), (0, 0, 2.), (0, 1, 1.), (0, 1, -1.)]);
        assert_eq!(a.get(0, 0), 3.);
        // cancelled entry is not stored
        assert_eq!(a.nnz(), 1);
    }

    #[test]
    fn test_dense_extraction() {
        let a = sample();
        assert_eq!(a.row_dense(1), vec![-2., -1., 0.]);
        assert_eq!(a.col_dense(1), vec![1., -1., 1.]);
    }

    #[test]
    fn test_delete_rows() {
        let mut a = sample();
        a.delete_rows(&[1, 1]);
        assert_eq!(a.nrows(), 2);
        assert_eq!(a.row_dense(0), vec![2., 1., 0.]);
        assert_eq!(a.row_dense(1), vec![0., 1., 1.]);
    }

    #[test]
    fn test_delete_cols_remaps_survivors() {
        let mut a = sample();
        a.delete_cols(&[0]);
        assert_eq!(a.ncols(), 2);
        assert_eq!(a.row_dense(0), vec![1., 0.]);
        assert_eq!(a.row_dense(2), vec![1., 1.]);
        assert_eq!(a.nnz(), 4);
    }

    #[test]
    fn test_scale_and_negate_row() {
        let mut a = sample();
        a.scale_row(0, 0.5);
        assert_eq!(a.row_dense(0), vec![1., 0.5, 0.]);
        a.negate_row(0);
        assert_eq!(a.row_dense(0), vec![-1., -0.5, 0.]);
    }

    #[test]
    fn test_sub_scaled_row_cancels_storage() {
        let mut a = sample();
        // row1 -= -1 * row0 cancels the row exactly
        a.sub_scaled_row(1, 0, -1.);
        assert_eq!(a.row_dense(1), vec![0., 0., 0.]);
        assert_eq!(a.row_counts(), vec![2, 0, 2]);
    }

    #[test]
    fn test_sub_scaled_row_fill_in() {
        let mut a = sample();
        a.sub_scaled_row(0, 2, 2.);
        assert_eq!(a.row_dense(0), vec![2., -1., -2.]);
        assert_eq!(a.nnz(), 7);
    }

    #[test]
    fn test_retain() {
        let mut a = sample();
        a.retain(|_, _, v| v.abs() > 1.);
        assert_eq!(a.nnz(), 2);
        assert_eq!(a.col_dense(0), vec![2., -2., 0.]);
    }

    #[test]
    fn test_faer_round_trip() {
        let a = sample();
        let b = CsrMatrix::from_faer(&a.to_faer());
        assert_eq!(a, b);
    }
}
