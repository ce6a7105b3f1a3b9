#[macro_use]
mod wire;
mod accumulator;
mod counter;
mod multiplexer;
mod shift_register;
pub use accumulator::*;
pub use counter::*;
pub use multiplexer::*;
pub use shift_register::*;
