//! The change journal and the operation table.
//!
//! Every rule that removes structure records the *original* indices of what
//! it removed (and, for the substitution rules, the value or symbolic
//! expression of the eliminated variable). Postsolve consumes these records
//! to lift a solution of the reduced LP back to the original problem, so the
//! serialized key layout is a stable contract.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::{E, I};

/// Hierarchical record of everything the enabled rules removed, keyed by
/// rule name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeJournal {
    pub eliminate_zero_rows: RowChanges,
    pub eliminate_zero_columns: ZeroColumnChanges,
    pub eliminate_singleton_equalities: SingletonEqualityChanges,
    pub eliminate_kton_equalities: KtonEqualityChanges,
    pub eliminate_singleton_inequalities: RowColumnChanges,
    pub eliminate_dual_singleton_inequalities: RowColumnChanges,
    pub eliminate_redundant_columns: RowColumnChanges,
    pub eliminate_implied_bounds: RowChanges,
    pub eliminate_redundant_rows: RowChanges,
}

impl ChangeJournal {
    /// Whether no rule has recorded a change.
    pub fn is_empty(&self) -> bool {
        self.eliminate_zero_rows.deleted_rows_indices.is_empty()
            && self.eliminate_zero_columns.deleted_columns.is_empty()
            && self.eliminate_zero_columns.solution.is_empty()
            && self.eliminate_singleton_equalities.eliminated.is_empty()
            && self.eliminate_kton_equalities.eliminated.is_empty()
            && self.eliminate_singleton_inequalities.is_empty()
            && self.eliminate_dual_singleton_inequalities.is_empty()
            && self.eliminate_redundant_columns.is_empty()
            && self.eliminate_implied_bounds.deleted_rows_indices.is_empty()
            && self.eliminate_redundant_rows.deleted_rows_indices.is_empty()
    }
}

/// Deleted rows, in original indices.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RowChanges {
    pub deleted_rows_indices: Vec<I>,
}

/// Deleted rows and columns, in original indices.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RowColumnChanges {
    pub deleted_variables_indices: Vec<I>,
    pub deleted_rows_indices: Vec<I>,
}

impl RowColumnChanges {
    pub fn is_empty(&self) -> bool {
        self.deleted_variables_indices.is_empty() && self.deleted_rows_indices.is_empty()
    }
}

/// Columns fixed at zero by the zero-column rule.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ZeroColumnChanges {
    pub deleted_columns: Vec<I>,
    /// Variable name to its fixed value (always zero for this rule).
    pub solution: BTreeMap<String, E>,
}

/// One variable substituted out by an equality rule: the original column it
/// occupied and the pair of original rows that encoded the equality.
#[derive(Debug, Clone, Serialize)]
pub struct Substitution {
    pub deleted_variables_indices: I,
    pub deleted_rows_indices: Vec<I>,
}

/// Per-variable removals of the singleton-equality rule, plus the fixed
/// values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SingletonEqualityChanges {
    #[serde(flatten)]
    pub eliminated: BTreeMap<String, Substitution>,
    pub solutions: BTreeMap<String, E>,
}

/// Per-variable removals of the k-ton rule, plus the symbolic expression of
/// each pivot in the variables surviving at the moment of elimination.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KtonEqualityChanges {
    #[serde(flatten)]
    pub eliminated: BTreeMap<String, Substitution>,
    pub solutions: BTreeMap<String, KtonSolution>,
}

/// The equality `lhs · x = rhs` a pivot variable was eliminated from,
/// snapshotted by value at the moment of elimination.
#[derive(Debug, Clone, Serialize)]
pub struct KtonSolution {
    pub lhs: Vec<E>,
    pub rhs: E,
    pub variables: Vec<String>,
}

/// One row of the operation table: the problem size after a rule ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationRecord {
    pub label: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub nnz: usize,
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {:<38} | {:>8} | {:>8} | {:>10} |",
            self.label, self.rows, self.cols, self.nnz
        )
    }
}
