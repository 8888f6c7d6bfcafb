use zkasm_asm::{field::from_u64, Assembler, FunctionTable, MainArtifacts, TraceLength};

pub const SIMPLE_SM: &str = include_str!("../../../demos/simple_sm.zkasm");

pub fn simple_sm_artifacts(n: usize, a: u64, b: u64) -> MainArtifacts {
    let program = Assembler::from_code("simple_sm.zkasm", SIMPLE_SM).expect("demo program compiles");
    MainArtifacts::build(
        &program,
        TraceLength::new(n).expect("valid trace length"),
        &FunctionTable::simple_sm(from_u64(a), from_u64(b)),
    )
    .expect("demo runs")
}
