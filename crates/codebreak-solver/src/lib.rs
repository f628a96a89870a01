//! Computer opponent for codebreak matches.
//!
//! The solver is a brute-force constraint solver: it keeps every secret that
//! could still be hidden behind the feedback received so far and guesses one
//! of them at random. It never guesses a sequence that contradicts earlier
//! feedback, but it does not try to maximize the information gained by a
//! guess.
//!
//! # Overview
//!
//! - [`HypothesisSpace`]: all `10!/(10-n)!` repeat-free sequences of a length,
//!   filtered down by observed feedback.
//! - [`ScoredGuess`] / [`Observation`]: a guess together with the feedback it
//!   received, the solver's only input.
//! - [`ConstraintSolver`]: picks the next guess and reports a [`SolverDecision`].
//!
//! # Examples
//!
//! ```
//! use codebreak_core::{Sequence, SequenceLength, score};
//! use codebreak_generator::{SecretGenerator, SecretSeed};
//! use codebreak_solver::{ConstraintSolver, Observation};
//!
//! let secret = Sequence::parse("582", SequenceLength::Three)?;
//! let solver = ConstraintSolver::new();
//! let mut generator = SecretGenerator::with_seed(SecretSeed::from_bytes([0; 32]));
//!
//! let mut history = Vec::new();
//! loop {
//!     let decision = solver.next_guess(SequenceLength::Three, &history, &mut generator);
//!     let feedback = score(&secret, &decision.guess)?;
//!     history.push(Observation::new(decision.guess, feedback));
//!     if feedback.is_win(SequenceLength::Three) {
//!         break;
//!     }
//! }
//! assert_eq!(history.first().map(|o| o.guess.to_string()), Some("012".to_owned()));
//! assert_eq!(history.last().map(|o| o.guess), Some(secret));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{hypothesis::*, observation::*, solver::*};

mod hypothesis;
mod observation;
mod solver;
