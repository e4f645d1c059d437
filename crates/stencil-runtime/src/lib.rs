//! Stencil Runtime
//!
//! Everything a compiled template touches at render time:
//! - **Values**: the boxed dynamic [`Value`] and the unboxed stack [`Slot`]
//! - **Routines**: the [`RoutineTable`] of helper routines, registered once at
//!   startup and looked up by owner, name and parameter representations
//! - **Helpers**: portable implementations behind the routines (`basic`, `random`)

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod basic;
pub mod error;
pub mod random;
pub mod routine;
pub mod slot;
pub mod value;

pub use error::{RuntimeError, RuntimeResult};
pub use random::RandomRuntime;
pub use routine::{owner, Routine, RoutineKind, RoutineTable, RoutineTableBuilder, RuntimeInstances};
pub use slot::{Repr, Slot};
pub use value::Value;
