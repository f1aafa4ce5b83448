pub mod compare;
pub mod evaluator;
pub mod result;
pub mod runner;
pub mod target;
pub mod testcase;

pub use compare::*;
pub use evaluator::*;
pub use result::*;
pub use runner::*;
pub use target::*;
pub use testcase::*;
