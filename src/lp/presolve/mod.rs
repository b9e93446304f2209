//! The presolve engine.
//!
//! [`Presolve`] drives the enabled reduction rules over an [`LpState`] in a
//! fixed order, records an operation table entry after every rule, journals
//! all removals, and accumulates infeasibility/unboundedness warnings. The
//! ordering is contractual: sparsification runs first so that coefficients
//! removed as noise no longer participate in support counts, and the
//! zero-row/zero-column cleanup runs last to absorb residue from the other
//! rules.

pub mod activity;
pub mod detect;
pub mod journal;
pub(crate) mod rules;

use crate::lp::LpState;
use crate::{E, PresolveHooks, PresolveWarning, Status, WarningKind};
use self::journal::{ChangeJournal, OperationRecord};
use self::rules::{
    DualSingletonInequalities, ImpliedBounds, KtonEqualities, Reduction, RedundantColumns,
    RedundantRows, Rule, SingletonEqualities, SingletonInequalities, SmallCoefficients,
    ZeroColumns, ZeroRows,
};

/// Configuration of the presolve engine. Every rule defaults to off.
#[derive(Debug, Clone)]
pub struct PresolveOptions {
    pub eliminate_zero_rows: bool,
    pub eliminate_zero_columns: bool,
    pub eliminate_singleton_equalities: bool,
    pub eliminate_kton_equalities: bool,
    pub eliminate_singleton_inequalities: bool,
    pub eliminate_dual_singleton_inequalities: bool,
    pub eliminate_redundant_columns: bool,
    pub eliminate_implied_bounds: bool,
    pub eliminate_redundant_rows: bool,
    pub reduction_small_coefficients: bool,

    /// Support size targeted by the k-ton equality rule.
    pub k: usize,
    pub feasibility_tolerance: E,
    /// Magnitude from which a bound or right-hand side counts as infinite.
    pub infinity: E,
    pub sparsification_threshold: E,
    /// Whether the implied-bound rule deletes rows whose activity infimum
    /// already exceeds the right-hand side, instead of reporting them as
    /// infeasible.
    pub drop_violated_rows: bool,
}

impl Default for PresolveOptions {
    fn default() -> Self {
        Self {
            eliminate_zero_rows: false,
            eliminate_zero_columns: false,
            eliminate_singleton_equalities: false,
            eliminate_kton_equalities: false,
            eliminate_singleton_inequalities: false,
            eliminate_dual_singleton_inequalities: false,
            eliminate_redundant_columns: false,
            eliminate_implied_bounds: false,
            eliminate_redundant_rows: false,
            reduction_small_coefficients: false,

            k: 5,
            feasibility_tolerance: 1e-6,
            infinity: 1e30,
            sparsification_threshold: 0.5,
            drop_violated_rows: true,
        }
    }
}

impl PresolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables all ten reduction rules.
    pub fn with_all_rules(mut self) -> Self {
        self.eliminate_zero_rows = true;
        self.eliminate_zero_columns = true;
        self.eliminate_singleton_equalities = true;
        self.eliminate_kton_equalities = true;
        self.eliminate_singleton_inequalities = true;
        self.eliminate_dual_singleton_inequalities = true;
        self.eliminate_redundant_columns = true;
        self.eliminate_implied_bounds = true;
        self.eliminate_redundant_rows = true;
        self.reduction_small_coefficients = true;
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }
}

/// Orchestrates the reduction rules over an LP state.
pub struct Presolve {
    options: PresolveOptions,
    journal: ChangeJournal,
    operations: Vec<OperationRecord>,
    warnings: Vec<PresolveWarning>,
}

impl Presolve {
    pub fn new(options: PresolveOptions) -> Self {
        Self {
            options,
            journal: ChangeJournal::default(),
            operations: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Applies the enabled rules to `state` in the contractual order.
    ///
    /// The terminator in `hooks` is polled between rules; a firing terminator
    /// ends the run early with its status, leaving the state, journal, and
    /// operation table consistent up to the last completed rule. Otherwise
    /// the returned status reflects the strongest warning recorded so far.
    pub fn run(&mut self, state: &mut LpState, hooks: &mut PresolveHooks) -> Status {
        self.operations.push(OperationRecord {
            label: "Initial",
            rows: state.get_n_cons(),
            cols: state.get_n_vars(),
            nnz: state.nnz(),
        });

        hooks.terminator.initialize();
        for rule in self.rule_sequence() {
            if let Some(status) = hooks.terminator.terminate() {
                return status;
            }

            rule.apply(state, &mut self.journal, &mut self.warnings);
            let record = OperationRecord {
                label: rule.label(),
                rows: state.get_n_cons(),
                cols: state.get_n_vars(),
                nnz: state.nnz(),
            };
            hooks.callback.call(&record);
            self.operations.push(record);
        }

        if self.warnings.iter().any(|w| w.kind == WarningKind::Infeasible) {
            Status::Infeasible
        } else if self.warnings.iter().any(|w| w.kind == WarningKind::Unbounded) {
            Status::Unbounded
        } else {
            Status::Reduced
        }
    }

    /// Everything the enabled rules removed, in original indices.
    pub fn journal(&self) -> &ChangeJournal {
        &self.journal
    }

    /// The operation table: problem sizes before and after every rule.
    pub fn operations(&self) -> &[OperationRecord] {
        &self.operations
    }

    /// All warnings recorded so far.
    pub fn warnings(&self) -> &[PresolveWarning] {
        &self.warnings
    }

    fn rule_sequence(&self) -> Vec<Rule> {
        let o = &self.options;
        let mut sequence = Vec::new();
        if o.reduction_small_coefficients {
            sequence.push(
                SmallCoefficients {
                    threshold: o.sparsification_threshold,
                }
                .into(),
            );
        }
        if o.eliminate_implied_bounds {
            sequence.push(
                ImpliedBounds {
                    feasibility_tolerance: o.feasibility_tolerance,
                    infinity: o.infinity,
                    drop_violated_rows: o.drop_violated_rows,
                }
                .into(),
            );
        }
        if o.eliminate_redundant_rows {
            sequence.push(RedundantRows {}.into());
        }
        if o.eliminate_kton_equalities {
            sequence.push(KtonEqualities { k: o.k }.into());
        }
        if o.eliminate_singleton_equalities {
            sequence.push(SingletonEqualities {}.into());
        }
        if o.eliminate_singleton_inequalities {
            sequence.push(SingletonInequalities {}.into());
        }
        if o.eliminate_dual_singleton_inequalities {
            sequence.push(DualSingletonInequalities {}.into());
        }
        if o.eliminate_redundant_columns {
            sequence.push(RedundantColumns {}.into());
        }
        if o.eliminate_zero_rows {
            sequence.push(ZeroRows {}.into());
        }
        if o.eliminate_zero_columns {
            sequence.push(ZeroColumns {}.into());
        }
        sequence
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::terminators::Terminator;
    use crate::tests::util::state_from_dense;

    #[test]
    fn test_operation_table_starts_with_initial() {
        let mut state = state_from_dense(&[vec![1., 1.]], &[2.], &[1., 1.]);
        let mut presolve = Presolve::new(PresolveOptions::new());

        let status = presolve.run(&mut state, &mut PresolveHooks::default());

        assert_eq!(status, Status::Reduced);
        assert_eq!(presolve.operations().len(), 1);
        assert_eq!(presolve.operations()[0].label, "Initial");
        assert_eq!(presolve.operations()[0].rows, 1);
        assert_eq!(presolve.operations()[0].cols, 2);
        assert_eq!(presolve.operations()[0].nnz, 2);
    }

    #[test]
    fn test_rule_sequence_order() {
        let presolve = Presolve::new(PresolveOptions::new().with_all_rules());
        let labels = presolve
            .rule_sequence()
            .iter()
            .map(|rule| rule.label())
            .collect::<Vec<_>>();

        assert_eq!(
            labels,
            vec![
                "Reduction Small Coefficients",
                "Eliminate Implied Bounds",
                "Eliminate Redundant Rows",
                "Eliminate Kton Equalities",
                "Eliminate Singleton Equalities",
                "Eliminate Singleton Inequalities",
                "Eliminate Dual Singleton Inequalities",
                "Eliminate Redundant Columns",
                "Eliminate Zero Rows",
                "Eliminate Zero Columns",
            ]
        );
    }

    struct FireImmediately {}

    impl Terminator for FireImmediately {
        fn terminate(&mut self) -> Option<Status> {
            Some(Status::Interrupted)
        }
    }

    #[test]
    fn test_terminator_is_polled_between_rules() {
        let mut state = state_from_dense(&[vec![0., 0.], vec![1., 1.]], &[0., 2.], &[1., 1.]);
        let mut presolve = Presolve::new(PresolveOptions::new().with_all_rules());
        let mut hooks = PresolveHooks {
            callback: Box::new(crate::callback::NoOpCallback {}),
            terminator: Box::new(FireImmediately {}),
        };

        let status = presolve.run(&mut state, &mut hooks);

        assert_eq!(status, Status::Interrupted);
        // nothing ran: only the initial record, no journal entries
        assert_eq!(presolve.operations().len(), 1);
        assert!(presolve.journal().is_empty());
        assert_eq!(state.get_n_cons(), 2);
    }
}
