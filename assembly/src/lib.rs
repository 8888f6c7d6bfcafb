//! zkASM front end, compiler and trace builder.
//!
//! Source text is parsed into lines, compiled into trace-step descriptors and
//! then projected twice: once into the program ROM and once, by replaying the
//! program over `N` rows, into the execution trace.

mod assembler;
pub mod compiler;
mod config;
pub mod execution;
pub mod field;
pub mod memory;
pub mod parser;
mod util;

pub use assembler::{compile_source, AsmError, Assembler, MainArtifacts};
pub use compiler::{compile, CompileError, CompileErrorKind, CompiledProgram, TraceStep};
pub use config::{ConfigError, TraceLength};
pub use execution::{
    ExecutionError, ExecutionTrace, FreeInputProvider, FunctionTable, MFibonacci, MainColumn,
    RowContext,
};
pub use field::F;
pub use memory::{GlobalConstants, Rom, RomColumn, RomError};
pub use parser::{parse_program, ParseError};
pub use util::init_logger;
