use derive_more::Display;
use faer::{
    Col,
    sparse::SparseColMat,
};
use problemo::{Problem, common::IntoCommonProblem};
use serde::Serialize;

use crate::{E, I, linalg::csr::CsrMatrix};

pub mod presolve;

/// Objective direction. No reduction rule changes it.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectiveSense {
    #[display("minimize")]
    Minimize,
    #[display("maximize")]
    Maximize,
}

/// Per-row constraint sense.
///
/// The engine recognizes equalities structurally, as pairs of rows that are
/// exact negations of each other; senses are carried in parallel with the
/// rows (and deleted with them) but never drive a rule.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstraintSense {
    #[display("<=")]
    Le,
    #[display(">=")]
    Ge,
    #[display("=")]
    Eq,
}

/// A linear program in the mutable form the presolve engine operates on:
///
/// ```text
/// min/max  c^T x + co
/// s.t.     A x  {<=, >=, =}  b
///          lb <= x <= ub
/// ```
///
/// Alongside the matrices, the state carries the per-variable names and the
/// maps from current row/column positions back to the positions in the
/// original problem; the change journal is expressed in original indices so
/// a solution can be reconstructed after the reductions.
#[allow(non_snake_case)]
pub struct LpState {
    pub(crate) A: CsrMatrix,
    pub(crate) b: Vec<E>,
    pub(crate) c: Vec<E>,
    pub(crate) co: E,
    pub(crate) lb: Vec<E>,
    pub(crate) ub: Vec<E>,
    pub(crate) of_sense: ObjectiveSense,
    pub(crate) cons_senses: Vec<ConstraintSense>,
    pub(crate) variable_names: Vec<String>,
    pub(crate) original_row_index: Vec<I>,
    pub(crate) original_column_index: Vec<I>,
}

#[allow(non_snake_case)]
impl LpState {
    /// Assembles the presolve state from the matrix tuple produced by model
    /// extraction.
    ///
    /// # Errors
    ///
    /// Returns a [`Problem`] when any parallel vector disagrees with the
    /// dimensions of `A`. These are caller-side programming errors; the
    /// reduction rules themselves keep the dimensions synchronized.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        A: SparseColMat<I, E>,
        b: Col<E>,
        c: Col<E>,
        co: E,
        lb: Col<E>,
        ub: Col<E>,
        of_sense: ObjectiveSense,
        cons_senses: Vec<ConstraintSense>,
        variable_names: Vec<String>,
    ) -> Result<Self, Problem> {
        let (n_con, n_var) = (A.nrows(), A.ncols());

        (b.nrows() == n_con)
            .then_some(())
            .ok_or_else(|| "Right-hand side length does not match the number of rows".gloss())?;
        (c.nrows() == n_var)
            .then_some(())
            .ok_or_else(|| "Cost vector length does not match the number of columns".gloss())?;
        (lb.nrows() == n_var && ub.nrows() == n_var)
            .then_some(())
            .ok_or_else(|| "Bound vector length does not match the number of columns".gloss())?;
        (cons_senses.len() == n_con)
            .then_some(())
            .ok_or_else(|| "Constraint sense count does not match the number of rows".gloss())?;
        (variable_names.len() == n_var)
            .then_some(())
            .ok_or_else(|| "Variable name count does not match the number of columns".gloss())?;

        Ok(Self {
            A: CsrMatrix::from_faer(&A),
            b: b.iter().copied().collect(),
            c: c.iter().copied().collect(),
            co,
            lb: lb.iter().copied().collect(),
            ub: ub.iter().copied().collect(),
            of_sense,
            cons_senses,
            variable_names,
            original_row_index: (0..n_con).collect(),
            original_column_index: (0..n_var).collect(),
        })
    }

    /// Returns the number of constraints (rows of `A`).
    pub fn get_n_cons(&self) -> usize {
        self.A.nrows()
    }

    /// Returns the number of variables (columns of `A`).
    pub fn get_n_vars(&self) -> usize {
        self.A.ncols()
    }

    /// Number of nonzero coefficients in `A`.
    pub fn nnz(&self) -> usize {
        self.A.nnz()
    }

    /// The constraint matrix in the crate-boundary (column-major) form.
    pub fn get_A(&self) -> SparseColMat<I, E> {
        self.A.to_faer()
    }

    pub fn get_b(&self) -> Col<E> {
        Col::from_fn(self.b.len(), |i| self.b[i])
    }

    pub fn get_c(&self) -> Col<E> {
        Col::from_fn(self.c.len(), |i| self.c[i])
    }

    /// Additive constant on the objective, maintained by the substitution
    /// rules.
    pub fn get_objective_constant(&self) -> E {
        self.co
    }

    pub fn get_lower_bounds(&self) -> Col<E> {
        Col::from_fn(self.lb.len(), |i| self.lb[i])
    }

    pub fn get_upper_bounds(&self) -> Col<E> {
        Col::from_fn(self.ub.len(), |i| self.ub[i])
    }

    pub fn get_objective_sense(&self) -> ObjectiveSense {
        self.of_sense
    }

    pub fn get_constraint_senses(&self) -> &[ConstraintSense] {
        &self.cons_senses
    }

    pub fn get_variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Maps each current row to its index in the original problem.
    pub fn get_original_row_index(&self) -> &[I] {
        &self.original_row_index
    }

    /// Maps each current column to its index in the original problem.
    pub fn get_original_column_index(&self) -> &[I] {
        &self.original_column_index
    }

    /// Deletes the given rows from `A` and every row-parallel vector.
    /// Indices may be unsorted and repeated.
    pub(crate) fn delete_rows(&mut self, rows: &[I]) {
        let mut marks = rows.to_vec();
        marks.sort_unstable();
        marks.dedup();

        self.A.delete_rows(&marks);
        for &i in marks.iter().rev() {
            self.b.remove(i);
            self.cons_senses.remove(i);
            self.original_row_index.remove(i);
        }
    }

    /// Deletes the given columns from `A` and every column-parallel vector.
    /// Indices may be unsorted and repeated.
    pub(crate) fn delete_cols(&mut self, cols: &[I]) {
        let mut marks = cols.to_vec();
        marks.sort_unstable();
        marks.dedup();

        self.A.delete_cols(&marks);
        for &j in marks.iter().rev() {
            self.c.remove(j);
            self.lb.remove(j);
            self.ub.remove(j);
            self.variable_names.remove(j);
            self.original_column_index.remove(j);
        }
    }

    /// Whether every parallel vector still matches the dimensions of `A`.
    pub fn is_consistent(&self) -> bool {
        let (m, n) = (self.A.nrows(), self.A.ncols());
        self.b.len() == m
            && self.cons_senses.len() == m
            && self.original_row_index.len() == m
            && self.c.len() == n
            && self.lb.len() == n
            && self.ub.len() == n
            && self.variable_names.len() == n
            && self.original_column_index.len() == n
    }
}

#[cfg(test)]
mod test {
    use faer::sparse::Triplet;

    use super::*;

    fn build_state() -> LpState {
        let a_triplets: [Triplet<I, I, E>; 4] = [
            Triplet::new(0, 0, 2.),
            Triplet::new(0, 1, 1.),
            Triplet::new(1, 1, -1.),
            Triplet::new(1, 2, 1.),
        ];
        let a = SparseColMat::try_new_from_triplets(2, 3, a_triplets.as_slice()).unwrap();

        LpState::try_new(
            a,
            Col::from_fn(2, |i| [4., 5.][i]),
            Col::from_fn(3, |i| [1., 1., 1.][i]),
            0.,
            Col::zeros(3),
            E::INFINITY * Col::<E>::ones(3),
            ObjectiveSense::Minimize,
            vec![ConstraintSense::Le; 2],
            vec!["x0".into(), "x1".into(), "x2".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_try_new_populates_index_maps() {
        let state = build_state();
        assert_eq!(state.get_original_row_index(), &[0, 1]);
        assert_eq!(state.get_original_column_index(), &[0, 1, 2]);
        assert_eq!(state.get_n_cons(), 2);
        assert_eq!(state.get_n_vars(), 3);
        assert_eq!(state.nnz(), 4);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_try_new_rejects_mismatched_rhs() {
        let a = SparseColMat::try_new_from_triplets(
            2,
            2,
            [Triplet::new(0usize, 0usize, 1.)].as_slice(),
        )
        .unwrap();

        let result = LpState::try_new(
            a,
            Col::zeros(3),
            Col::zeros(2),
            0.,
            Col::zeros(2),
            Col::zeros(2),
            ObjectiveSense::Minimize,
            vec![ConstraintSense::Le; 2],
            vec!["x0".into(), "x1".into()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_rows_keeps_parallel_vectors_in_step() {
        let mut state = build_state();
        state.delete_rows(&[0]);
        assert!(state.is_consistent());
        assert_eq!(state.b, vec![5.]);
        assert_eq!(state.get_original_row_index(), &[1]);
        assert_eq!(state.A.row_dense(0), vec![0., -1., 1.]);
    }

    #[test]
    fn test_delete_cols_keeps_parallel_vectors_in_step() {
        let mut state = build_state();
        state.delete_cols(&[1]);
        assert!(state.is_consistent());
        assert_eq!(state.get_variable_names(), &["x0".to_string(), "x2".to_string()]);
        assert_eq!(state.get_original_column_index(), &[0, 2]);
        assert_eq!(state.A.row_dense(0), vec![2., 0.]);
        assert_eq!(state.A.row_dense(1), vec![0., 1.]);
    }

    #[test]
    fn test_boundary_round_trip() {
        let state = build_state();
        let a = state.get_A();
        assert_eq!(a.nrows(), 2);
        assert_eq!(a.ncols(), 3);
        assert_eq!(a.compute_nnz(), 4);
        assert_eq!(state.get_b()[1], 5.);
    }
}
