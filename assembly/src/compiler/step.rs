//! Trace-step descriptors.
//!
//! A step is assembled from fragments: the lowered input operand, the lowered
//! outputs and each operation flag. Fragments merge field by field, the later
//! one overwriting whatever the earlier one set.

use std::sync::Arc;

use crate::parser::JumpTarget;

/// Free-input descriptor attached to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreeIn {
    FunctionCall { func_name: String },
    /// A bare `$` tag, which names no function.
    Empty,
}

impl FreeIn {
    pub fn func_name(&self) -> Option<&str> {
        match self {
            FreeIn::FunctionCall { func_name } => Some(func_name),
            FreeIn::Empty => None,
        }
    }
}

/// Partial step produced by lowering. Numeric fields hold signed literals;
/// they are only mapped into the field when the ROM and trace are built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepFragment {
    pub in_a: Option<i128>,
    pub in_b: Option<i128>,
    pub in_free: Option<i128>,
    pub set_a: Option<i128>,
    pub set_b: Option<i128>,
    pub constant: Option<i128>,
    pub constant_l: Option<i128>,
    pub free_in: Option<FreeIn>,
    pub add: bool,
    pub jmp: bool,
    pub jmpz: bool,
    pub offset: Option<JumpTarget>,
}

#[inline]
fn overwrite<T>(dst: &mut Option<T>, src: Option<T>) {
    if src.is_some() {
        *dst = src;
    }
}

impl StepFragment {
    /// Applies `other` on top of `self`.
    pub fn merge(&mut self, other: StepFragment) {
        overwrite(&mut self.in_a, other.in_a);
        overwrite(&mut self.in_b, other.in_b);
        overwrite(&mut self.in_free, other.in_free);
        overwrite(&mut self.set_a, other.set_a);
        overwrite(&mut self.set_b, other.set_b);
        overwrite(&mut self.constant, other.constant);
        overwrite(&mut self.constant_l, other.constant_l);
        overwrite(&mut self.free_in, other.free_in);
        overwrite(&mut self.offset, other.offset);
        self.add |= other.add;
        self.jmp |= other.jmp;
        self.jmpz |= other.jmpz;
    }

    /// Negates every numeric field.
    pub fn negate(&mut self) {
        for value in [
            &mut self.in_a,
            &mut self.in_b,
            &mut self.in_free,
            &mut self.set_a,
            &mut self.set_b,
            &mut self.constant,
            &mut self.constant_l,
        ]
        .into_iter()
        .flatten()
        {
            *value = -*value;
        }
    }

    pub fn is_jump(&self) -> bool {
        self.jmp || self.jmpz
    }
}

/// A fully compiled step: every jump offset is a resolved step index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub in_a: Option<i128>,
    pub in_b: Option<i128>,
    pub in_free: Option<i128>,
    pub set_a: Option<i128>,
    pub set_b: Option<i128>,
    pub constant: Option<i128>,
    pub constant_l: Option<i128>,
    pub free_in: Option<FreeIn>,
    pub add: bool,
    pub jmp: bool,
    pub jmpz: bool,
    pub offset: Option<u64>,
    /// Label the offset was resolved from, kept for diagnostics.
    pub offset_label: Option<String>,
    pub line: usize,
    pub file_name: Arc<str>,
    pub line_str: String,
}

impl TraceStep {
    pub fn is_jump(&self) -> bool {
        self.jmp || self.jmpz
    }

    /// Value feeding the `CONST` column. Long constants share the column with
    /// short ones, the short form wins when both are present.
    pub fn constant_value(&self) -> Option<i128> {
        self.constant.or(self.constant_l)
    }

    /// Name of the free-input function this step calls, if any.
    pub fn free_input_function(&self) -> Option<&str> {
        self.free_in.as_ref().and_then(FreeIn::func_name)
    }
}
