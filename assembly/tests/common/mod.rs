use zkasm_asm::{
    field::from_u64, Assembler, CompiledProgram, FunctionTable, MainArtifacts, TraceLength,
};

pub const SIMPLE_SM: &str = include_str!("../../../demos/simple_sm.zkasm");

pub fn simple_sm_program() -> CompiledProgram {
    Assembler::from_code("simple_sm.zkasm", SIMPLE_SM).expect("demo program compiles")
}

/// Builds every column for the demo with the given free inputs.
pub fn run_simple_sm(n: usize, a: u64, b: u64) -> MainArtifacts {
    let trace_len = TraceLength::new(n).expect("valid trace length");
    let table = FunctionTable::simple_sm(from_u64(a), from_u64(b));
    MainArtifacts::build(&simple_sm_program(), trace_len, &table).expect("demo runs")
}

/// Value the demo leaves in `A` on the last row.
pub fn expected_simple_sm_result(n: usize, a: u64, b: u64) -> zkasm_asm::F {
    from_u64(a) + from_u64(b) * from_u64(((n - 4) / 2) as u64)
}
