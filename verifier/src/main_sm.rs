use ahash::AHashSet;
use p3_field::PrimeCharacteristicRing;
use strum::IntoEnumIterator;
use tracing::{info, instrument};
use zkasm_asm::{
    field::to_u64, ExecutionTrace, GlobalConstants, MainColumn, Rom, RomColumn, F,
};

use crate::{check_len, Checker, Identity, Result, Violation};

/// Width of a ROM lookup entry.
const LOOKUP_WIDTH: usize = 10;

type LookupKey = [u64; LOOKUP_WIDTH];

fn rom_key(rom: &Rom, row: usize) -> LookupKey {
    [
        rom.line[row],
        rom.constant[row],
        rom.in_a[row],
        rom.in_b[row],
        rom.in_free[row],
        rom.set_a[row],
        rom.set_b[row],
        rom.jmp[row],
        rom.jmpz[row],
        rom.offset[row],
    ]
    .map(to_u64)
}

fn trace_key(trace: &ExecutionTrace, row: usize) -> LookupKey {
    [
        trace.zk_pc[row],
        trace.constant[row],
        trace.in_a[row],
        trace.in_b[row],
        trace.in_free[row],
        trace.set_a[row],
        trace.set_b[row],
        trace.jmp[row],
        trace.jmpz[row],
        trace.offset[row],
    ]
    .map(to_u64)
}

/// Checks the main state machine identities on every row.
///
/// Returns the violated identities; an empty list means the trace is
/// accepted. Columns of the wrong length are reported as an error.
#[instrument(level = "info", skip_all, fields(n = constants.len()))]
pub fn verify_main(
    constants: &GlobalConstants,
    rom: &Rom,
    trace: &ExecutionTrace,
) -> Result<Vec<Violation>> {
    let n = constants.len();
    check_len("Global.LLAST", &constants.llast, n)?;
    for column in RomColumn::iter() {
        check_len(&format!("Rom.{column}"), rom.column(column), n)?;
    }
    for column in MainColumn::iter() {
        check_len(&format!("Main.{column}"), trace.column(column), n)?;
    }

    let rom_rows = (0..n).map(|row| rom_key(rom, row)).collect::<AHashSet<_>>();
    let mut checker = Checker::default();

    for row in 0..n {
        let next = (row + 1) % n;
        let op = trace.op(row);
        let (a, b, pc) = (trace.a[row], trace.b[row], trace.zk_pc[row]);

        checker.assert_zero(
            Identity::UpdateA,
            row,
            trace.a[next] - (trace.set_a[row] * (op - a) + a),
        );
        checker.assert_zero(
            Identity::UpdateB,
            row,
            trace.b[next] - (trace.set_b[row] * (op - b) + b),
        );

        let is_zero = F::ONE - op * trace.inv_op[row];
        checker.assert_zero(Identity::ZeroTest, row, op * is_zero);

        let jump_delta = trace.offset[row] - pc - F::ONE;
        let expected_pc = pc
            + F::ONE
            + trace.jmp[row] * jump_delta
            + trace.jmpz[row] * is_zero * jump_delta;
        checker.assert_zero(Identity::ProgramCounter, row, trace.zk_pc[next] - expected_pc);

        checker.assert_zero(Identity::StartsAtZero, row, constants.l1[row] * pc);
        // The last row hands row 0 the zeroed registers the run started from.
        checker.assert_zero(Identity::RestartA, row, constants.llast[row] * trace.a[next]);
        checker.assert_zero(Identity::RestartB, row, constants.llast[row] * trace.b[next]);

        if !rom_rows.contains(&trace_key(trace, row)) {
            checker.push(Identity::RomLookup, row);
        }
    }

    let violations = checker.finish();
    info!(violations = violations.len(), "checked main state machine");
    Ok(violations)
}
