mod free_input;
mod mfibonacci;
mod trace;

pub use free_input::{FreeInputProvider, FunctionTable, RowContext};
pub use mfibonacci::MFibonacci;
pub use trace::{ExecutionError, ExecutionTrace, MainColumn};
