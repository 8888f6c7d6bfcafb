use p3_field::PrimeCharacteristicRing;
use strum_macros::{Display, EnumCount, EnumIter};
use thiserror::Error;
use tracing::instrument;

use crate::{
    compiler::CompiledProgram,
    config::TraceLength,
    field::{self, F},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RomError {
    #[error("program has {steps} steps but the trace only has {rows} rows")]
    ProgramTooLong { steps: usize, rows: usize },
}

/// Columns of the program ROM, named as the lookup argument expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
pub enum RomColumn {
    #[strum(serialize = "line")]
    Line,
    #[strum(serialize = "offset")]
    Offset,
    #[strum(serialize = "CONST")]
    Const,
    #[strum(serialize = "inA")]
    InA,
    #[strum(serialize = "inB")]
    InB,
    #[strum(serialize = "inFREE")]
    InFree,
    #[strum(serialize = "JMPZ")]
    Jmpz,
    #[strum(serialize = "JMP")]
    Jmp,
    #[strum(serialize = "setA")]
    SetA,
    #[strum(serialize = "setB")]
    SetB,
}

/// The program ROM: one row per compiled step, zero beyond the program.
///
/// It encodes only static selector information, no control flow is
/// simulated while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rom {
    pub line: Vec<F>,
    pub offset: Vec<F>,
    pub constant: Vec<F>,
    pub in_a: Vec<F>,
    pub in_b: Vec<F>,
    pub in_free: Vec<F>,
    pub jmpz: Vec<F>,
    pub jmp: Vec<F>,
    pub set_a: Vec<F>,
    pub set_b: Vec<F>,
}

impl Rom {
    fn zeroed(n: usize) -> Self {
        let zeros = vec![F::ZERO; n];
        Self {
            line: zeros.clone(),
            offset: zeros.clone(),
            constant: zeros.clone(),
            in_a: zeros.clone(),
            in_b: zeros.clone(),
            in_free: zeros.clone(),
            jmpz: zeros.clone(),
            jmp: zeros.clone(),
            set_a: zeros.clone(),
            set_b: zeros,
        }
    }

    /// Projects the compiled program into ROM columns of `trace_len` rows.
    #[instrument(level = "info", skip_all, fields(steps = program.len(), n = trace_len.get()))]
    pub fn build(program: &CompiledProgram, trace_len: TraceLength) -> Result<Self, RomError> {
        let n = trace_len.get();
        if program.len() > n {
            return Err(RomError::ProgramTooLong {
                steps: program.len(),
                rows: n,
            });
        }

        let mut rom = Self::zeroed(n);
        for (i, step) in program.steps().iter().enumerate() {
            rom.line[i] = field::from_u64(i as u64);

            if let Some(constant) = step.constant_value() {
                rom.constant[i] = field::from_i128(constant);
            }
            if let Some(in_a) = step.in_a {
                rom.in_a[i] = field::from_i128(in_a);
            }
            if let Some(in_b) = step.in_b {
                rom.in_b[i] = field::from_i128(in_b);
            }
            if let Some(in_free) = step.in_free {
                rom.in_free[i] = field::from_i128(in_free);
            }
            if let Some(set_a) = step.set_a {
                rom.set_a[i] = field::from_i128(set_a);
            }
            if let Some(set_b) = step.set_b {
                rom.set_b[i] = field::from_i128(set_b);
            }
            if step.add {
                rom.in_a[i] = F::ONE;
                rom.in_b[i] = F::ONE;
                rom.set_a[i] = F::ONE;
            }

            let offset = field::from_u64(step.offset.unwrap_or(0));
            if step.jmpz {
                rom.jmpz[i] = F::ONE;
                rom.offset[i] = offset;
            } else if step.jmp {
                rom.jmp[i] = F::ONE;
                rom.offset[i] = offset;
            }
        }

        Ok(rom)
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    pub fn column(&self, column: RomColumn) -> &[F] {
        match column {
            RomColumn::Line => &self.line,
            RomColumn::Offset => &self.offset,
            RomColumn::Const => &self.constant,
            RomColumn::InA => &self.in_a,
            RomColumn::InB => &self.in_b,
            RomColumn::InFree => &self.in_free,
            RomColumn::Jmpz => &self.jmpz,
            RomColumn::Jmp => &self.jmp,
            RomColumn::SetA => &self.set_a,
            RomColumn::SetB => &self.set_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::{EnumCount, IntoEnumIterator};

    use super::*;
    use crate::{
        assembler::Assembler,
        field::{to_u64, MODULUS},
    };

    fn rom_for(src: &str, n: usize) -> Rom {
        let program = Assembler::from_code("test.zkasm", src).unwrap();
        Rom::build(&program, TraceLength::new(n).unwrap()).unwrap()
    }

    #[test]
    fn test_rows_mirror_steps() {
        let rom = rom_for(include_str!("../../../demos/simple_sm.zkasm"), 16);
        assert_eq!(rom.len(), 16);

        let lines = rom.line.iter().map(|v| to_u64(*v)).collect::<Vec<_>>();
        assert_eq!(&lines[..5], &[0, 1, 2, 3, 4]);
        assert!(lines[5..].iter().all(|line| *line == 0));

        // ${beforeLast()} :JMPZ(body)
        assert_eq!(rom.in_free[2], F::ONE);
        assert_eq!(rom.jmpz[2], F::ONE);
        assert_eq!(to_u64(rom.offset[2]), 4);

        // 0 => A, B :JMP(start)
        assert_eq!(rom.set_a[3], F::ONE);
        assert_eq!(rom.set_b[3], F::ONE);
        assert_eq!(rom.jmp[3], F::ONE);
        assert_eq!(rom.offset[3], F::ZERO);

        // :ADD, JMP(loop)
        assert_eq!(rom.in_a[4], F::ONE);
        assert_eq!(rom.in_b[4], F::ONE);
        assert_eq!(rom.set_a[4], F::ONE);
        assert_eq!(rom.set_b[4], F::ZERO);
        assert_eq!(to_u64(rom.offset[4]), 2);
    }

    #[test]
    fn test_negative_constants_are_normalized() {
        let rom = rom_for("-3 => A\n-A => B\n", 4);
        assert_eq!(to_u64(rom.constant[0]), MODULUS - 3);
        assert_eq!(to_u64(rom.in_a[1]), MODULUS - 1);
    }

    #[test]
    fn test_offset_only_on_jumps() {
        let rom = rom_for("1 => A\n:JMP(0)\n", 2);
        assert_eq!(rom.offset[0], F::ZERO);
        assert_eq!(rom.jmp[1], F::ONE);
        assert_eq!(rom.jmpz[1], F::ZERO);
    }

    #[test]
    fn test_program_longer_than_trace() {
        let program = Assembler::from_code("test.zkasm", "1 => A\n2 => A\n3 => A\n").unwrap();
        let err = Rom::build(&program, TraceLength::new(2).unwrap()).unwrap_err();
        assert_eq!(err, RomError::ProgramTooLong { steps: 3, rows: 2 });
    }

    #[test]
    fn test_column_names() {
        let names = RomColumn::iter().map(|c| c.to_string()).collect::<Vec<_>>();
        assert_eq!(names.len(), RomColumn::COUNT);
        assert_eq!(
            names,
            ["line", "offset", "CONST", "inA", "inB", "inFREE", "JMPZ", "JMP", "setA", "setB"]
        );
    }
}
