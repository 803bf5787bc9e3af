//! The Munkres state machine.

use tracing::trace;

use crate::state::CostState;

/// One state of the algorithm; [`Step::Done`] is terminal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Step {
    ReduceRows,
    StarZeros,
    CoverStarredColumns,
    PrimeZeros,
    Augment { origin: (usize, usize) },
    ShiftCosts,
    Done,
}

impl Step {
    /// Runs this step against `state` and returns the next one.
    pub(crate) fn run(self, state: &mut CostState) -> Self {
        trace!("munkres step {:?}", self);
        match self {
            Self::ReduceRows => {
                state.reduce_rows();
                Self::StarZeros
            }
            Self::StarZeros => {
                state.star_zeros();
                Self::CoverStarredColumns
            }
            Self::CoverStarredColumns => {
                if state.cover_starred_columns() >= state.rows().min(state.cols()) {
                    Self::Done
                } else {
                    Self::PrimeZeros
                }
            }
            Self::PrimeZeros => match state.prime_zeros() {
                Some(origin) => Self::Augment { origin },
                None => Self::ShiftCosts,
            },
            Self::Augment { origin } => {
                state.augment(origin);
                Self::CoverStarredColumns
            }
            Self::ShiftCosts => match state.smallest_uncovered() {
                Some(delta) => {
                    state.shift_costs(delta);
                    Self::PrimeZeros
                }
                None => {
                    // every line is covered, so the stars already form the answer
                    debug_assert!(false, "no uncovered cell left to shift");
                    Self::Done
                }
            },
            Self::Done => Self::Done,
        }
    }
}

/// Drives `state` from the first step to [`Step::Done`].
pub(crate) fn run_to_completion(state: &mut CostState) {
    let mut step = Step::ReduceRows;
    while step != Step::Done {
        step = step.run(state);
    }
}
