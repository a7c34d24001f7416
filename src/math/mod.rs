//! Numerical kernels: normal-equation assembly and a dense linear solver.

pub mod normal;
pub mod solve;

pub use normal::*;
pub use solve::*;
