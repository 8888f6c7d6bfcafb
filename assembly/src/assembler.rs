use std::{fs, io, path::Path};

use thiserror::Error;
use tracing::instrument;

use crate::{
    compiler::{compile, CompileError, CompiledProgram},
    config::{ConfigError, TraceLength},
    execution::{ExecutionError, ExecutionTrace, FreeInputProvider},
    memory::{GlobalConstants, Rom, RomError},
    parser::{parse_program, ParseError},
};

#[derive(Error, Debug)]
pub enum AsmError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("ROM error: {0}")]
    Rom(#[from] RomError),
    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Entry point from zkASM source text to a compiled program.
pub struct Assembler;

impl Assembler {
    pub fn from_code(file_name: &str, code: &str) -> Result<CompiledProgram, AsmError> {
        let lines = parse_program(code)?;
        Ok(compile(&lines, file_name, code)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<CompiledProgram, AsmError> {
        let path = path.as_ref();
        let code = fs::read_to_string(path).map_err(|source| AsmError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        Self::from_code(&file_name, &code)
    }
}

/// Parses and compiles `src`.
pub fn compile_source(file_name: &str, src: &str) -> Result<CompiledProgram, AsmError> {
    Assembler::from_code(file_name, src)
}

/// Every column of the main state machine for one run: the fixed global
/// columns, the ROM and the execution trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainArtifacts {
    pub constants: GlobalConstants,
    pub rom: Rom,
    pub trace: ExecutionTrace,
}

impl MainArtifacts {
    #[instrument(level = "info", skip_all, fields(n = trace_len.get()))]
    pub fn build(
        program: &CompiledProgram,
        trace_len: TraceLength,
        free_inputs: &impl FreeInputProvider,
    ) -> Result<Self, AsmError> {
        let constants = GlobalConstants::new(trace_len);
        let rom = Rom::build(program, trace_len)?;
        let trace = ExecutionTrace::generate(program, trace_len, free_inputs)?;
        Ok(Self {
            constants,
            rom,
            trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        execution::FunctionTable,
        field::{from_u64, to_u64},
    };

    #[test]
    fn test_build_artifacts_for_demo() {
        let program = Assembler::from_code(
            "simple_sm.zkasm",
            include_str!("../../demos/simple_sm.zkasm"),
        )
        .unwrap();
        let n = TraceLength::new(32).unwrap();
        let artifacts = MainArtifacts::build(
            &program,
            n,
            &FunctionTable::simple_sm(from_u64(7), from_u64(7)),
        )
        .unwrap();

        assert_eq!(artifacts.constants.len(), 32);
        assert_eq!(artifacts.rom.len(), 32);
        assert_eq!(artifacts.trace.len(), 32);
        assert_eq!(to_u64(artifacts.trace.result()), 7 * (1 + (32 - 4) / 2));
    }

    #[test]
    fn test_errors_are_wrapped() {
        assert!(matches!(
            Assembler::from_code("bad.zkasm", "A => => B\n"),
            Err(AsmError::Parse(_))
        ));

        let err = compile_source("bad.zkasm", ":JMP(nowhere)\n").unwrap_err();
        assert!(matches!(err, AsmError::Compile(_)));
        assert_eq!(err.to_string(), "ERROR bad.zkasm:1: Label: nowhere not defined.");

        assert!(matches!(
            Assembler::from_file("does/not/exist.zkasm"),
            Err(AsmError::Io { .. })
        ));
    }
}
