//! Application layer for Codebreak.
//!
//! Ties the match rules from `codebreak-game` to the outside world: a
//! [`session::Session`] owns the running match, saves it through
//! [`persistence`], exchanges moves with an online peer through [`relay`],
//! paces the computer opponent and runs the turn clock. The `codebreak`
//! binary is a terminal front end over this library.

pub mod clock;
pub mod cpu;
pub mod persistence;
pub mod relay;
pub mod session;
pub mod settings;
pub mod testing;

pub use self::session::{Session, SessionError, SessionEvent};
