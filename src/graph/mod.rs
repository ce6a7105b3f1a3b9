#[macro_use]
mod node;
mod circuit;
mod circuit_builder;
mod closure;
mod error;
mod eval;
mod expr;
mod handles;
mod optimizations;
pub use circuit::*;
pub use circuit_builder::*;
pub use error::*;
pub use eval::EvalContext;
pub use expr::*;
pub use handles::*;
pub use node::*;
