mod double_stack;
mod immutable;
mod slab;
mod state;
pub use double_stack::*;
pub use immutable::*;
pub use slab::*;
pub use state::*;
