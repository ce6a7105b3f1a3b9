mod const_folding;
mod dead_code_elimination;
pub(super) use const_folding::*;
pub(super) use dead_code_elimination::*;
