use std::sync::Arc;

use thiserror::Error;

use crate::parser::Register;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileErrorKind {
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    #[error("Register {0} added twice in assignment output")]
    DuplicateOutputRegister(Register),

    #[error("RedefinedLabel: {0}")]
    RedefinedLabel(String),

    #[error("Label: {0} not defined.")]
    UndefinedLabel(String),

    #[error("Invalid line type: {0}")]
    InvalidLineType(String),
}

/// A compile error located at its source line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ERROR {file_name}:{line}: {kind}")]
pub struct CompileError {
    pub file_name: Arc<str>,
    pub line: usize,
    #[source]
    pub kind: CompileErrorKind,
}

impl CompileError {
    pub fn new(file_name: Arc<str>, line: usize, kind: CompileErrorKind) -> Self {
        Self {
            file_name,
            line,
            kind,
        }
    }
}
