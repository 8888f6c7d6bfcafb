use p3_field::PrimeCharacteristicRing;
use strum_macros::{Display, EnumCount, EnumIter};
use thiserror::Error;
use tracing::{instrument, trace};

use super::free_input::{FreeInputProvider, RowContext};
use crate::{
    compiler::{CompiledProgram, TraceStep},
    config::TraceLength,
    field::{self, F},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("row {row}: program counter {pc} does not point to a compiled step")]
    PcOutOfBounds { row: usize, pc: u64 },
}

/// Committed columns of the main state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
pub enum MainColumn {
    A,
    B,
    #[strum(serialize = "offset")]
    Offset,
    #[strum(serialize = "CONST")]
    Const,
    #[strum(serialize = "FREE")]
    Free,
    #[strum(serialize = "inA")]
    InA,
    #[strum(serialize = "inB")]
    InB,
    #[strum(serialize = "inFREE")]
    InFree,
    #[strum(serialize = "invOp")]
    InvOp,
    #[strum(serialize = "JMPZ")]
    Jmpz,
    #[strum(serialize = "JMP")]
    Jmp,
    #[strum(serialize = "setA")]
    SetA,
    #[strum(serialize = "setB")]
    SetB,
    #[strum(serialize = "zkPC")]
    ZkPc,
}

/// The execution trace: every column has exactly `N` rows, and row `N - 1`
/// feeds row 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionTrace {
    pub a: Vec<F>,
    pub b: Vec<F>,
    pub offset: Vec<F>,
    pub constant: Vec<F>,
    pub free: Vec<F>,
    pub in_a: Vec<F>,
    pub in_b: Vec<F>,
    pub in_free: Vec<F>,
    pub inv_op: Vec<F>,
    pub jmpz: Vec<F>,
    pub jmp: Vec<F>,
    pub set_a: Vec<F>,
    pub set_b: Vec<F>,
    pub zk_pc: Vec<F>,
}

impl ExecutionTrace {
    fn zeroed(n: usize) -> Self {
        let zeros = vec![F::ZERO; n];
        Self {
            a: zeros.clone(),
            b: zeros.clone(),
            offset: zeros.clone(),
            constant: zeros.clone(),
            free: zeros.clone(),
            in_a: zeros.clone(),
            in_b: zeros.clone(),
            in_free: zeros.clone(),
            inv_op: zeros.clone(),
            jmpz: zeros.clone(),
            jmp: zeros.clone(),
            set_a: zeros.clone(),
            set_b: zeros.clone(),
            zk_pc: zeros,
        }
    }

    /// Replays `program` over `trace_len` rows, starting from step 0 with
    /// both registers at zero.
    #[instrument(level = "info", skip_all, fields(steps = program.len(), n = trace_len.get()))]
    pub fn generate(
        program: &CompiledProgram,
        trace_len: TraceLength,
        free_inputs: &impl FreeInputProvider,
    ) -> Result<Self, ExecutionError> {
        let mut interpreter = Interpreter {
            program,
            trace_len,
            free_inputs,
            trace: Self::zeroed(trace_len.get()),
        };
        for row in 0..trace_len.get() {
            interpreter.step(row)?;
        }
        Ok(interpreter.trace)
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Value of register `A` on the last row.
    pub fn result(&self) -> F {
        self.a.last().copied().unwrap_or(F::ZERO)
    }

    /// `inA*A + inB*B + inFREE*FREE + CONST` on `row`.
    pub fn op(&self, row: usize) -> F {
        self.in_a[row] * self.a[row]
            + self.in_b[row] * self.b[row]
            + self.in_free[row] * self.free[row]
            + self.constant[row]
    }

    pub fn column(&self, column: MainColumn) -> &[F] {
        match column {
            MainColumn::A => &self.a,
            MainColumn::B => &self.b,
            MainColumn::Offset => &self.offset,
            MainColumn::Const => &self.constant,
            MainColumn::Free => &self.free,
            MainColumn::InA => &self.in_a,
            MainColumn::InB => &self.in_b,
            MainColumn::InFree => &self.in_free,
            MainColumn::InvOp => &self.inv_op,
            MainColumn::Jmpz => &self.jmpz,
            MainColumn::Jmp => &self.jmp,
            MainColumn::SetA => &self.set_a,
            MainColumn::SetB => &self.set_b,
            MainColumn::ZkPc => &self.zk_pc,
        }
    }

    pub fn column_mut(&mut self, column: MainColumn) -> &mut [F] {
        match column {
            MainColumn::A => &mut self.a,
            MainColumn::B => &mut self.b,
            MainColumn::Offset => &mut self.offset,
            MainColumn::Const => &mut self.constant,
            MainColumn::Free => &mut self.free,
            MainColumn::InA => &mut self.in_a,
            MainColumn::InB => &mut self.in_b,
            MainColumn::InFree => &mut self.in_free,
            MainColumn::InvOp => &mut self.inv_op,
            MainColumn::Jmpz => &mut self.jmpz,
            MainColumn::Jmp => &mut self.jmp,
            MainColumn::SetA => &mut self.set_a,
            MainColumn::SetB => &mut self.set_b,
            MainColumn::ZkPc => &mut self.zk_pc,
        }
    }
}

/// Row-by-row replay state.
struct Interpreter<'a, P> {
    program: &'a CompiledProgram,
    trace_len: TraceLength,
    free_inputs: &'a P,
    trace: ExecutionTrace,
}

fn selector(value: Option<i128>) -> F {
    value.map_or(F::ZERO, field::from_i128)
}

impl<'a, P: FreeInputProvider> Interpreter<'a, P> {
    fn governing_step(&self, row: usize) -> Result<&'a TraceStep, ExecutionError> {
        let program: &'a CompiledProgram = self.program;
        let pc = field::to_u64(self.trace.zk_pc[row]);
        usize::try_from(pc)
            .ok()
            .and_then(|index| program.step(index))
            .ok_or(ExecutionError::PcOutOfBounds { row, pc })
    }

    fn step(&mut self, row: usize) -> Result<(), ExecutionError> {
        let step = self.governing_step(row)?;
        let next = self.trace_len.next(row);
        let trace = &mut self.trace;

        // `inFREE` mirrors the ROM even when no function answers, in which
        // case `FREE` stays zero. A negated tag keeps its sign here.
        trace.in_free[row] = selector(step.in_free);
        if let Some(func_name) = step.free_input_function() {
            let ctx = RowContext {
                row,
                trace_len: self.trace_len.get(),
            };
            if let Some(value) = self.free_inputs.free_input(func_name, &ctx) {
                trace.free[row] = value;
            }
        }

        trace.constant[row] = selector(step.constant_value());
        trace.in_a[row] = selector(step.in_a);
        trace.in_b[row] = selector(step.in_b);
        trace.set_a[row] = selector(step.set_a);
        trace.set_b[row] = selector(step.set_b);
        if step.add {
            trace.in_a[row] = F::ONE;
            trace.in_b[row] = F::ONE;
            trace.set_a[row] = F::ONE;
        }

        let op = trace.op(row);
        let (a, b) = (trace.a[row], trace.b[row]);
        trace.a[next] = trace.set_a[row] * (op - a) + a;
        trace.b[next] = trace.set_b[row] * (op - b) + b;

        if let Some(inv) = field::inverse(op) {
            trace.inv_op[row] = inv;
        }

        let pc = trace.zk_pc[row];
        let addr = field::from_u64(step.offset.unwrap_or(0));
        trace.zk_pc[next] = if step.jmpz {
            trace.jmpz[row] = F::ONE;
            trace.offset[row] = addr;
            if field::is_zero(op) {
                addr
            } else {
                pc + F::ONE
            }
        } else if step.jmp {
            trace.jmp[row] = F::ONE;
            trace.offset[row] = addr;
            addr
        } else {
            pc + F::ONE
        };

        trace!(
            row,
            pc = field::to_u64(pc),
            op = field::to_u64(op),
            next_pc = field::to_u64(trace.zk_pc[next]),
            "executed step"
        );
        Ok(())
    }
}
