use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use zkasm_asm::{
    field::from_u64, Assembler, ExecutionTrace, FunctionTable, MFibonacci, Rom, TraceLength,
};

const SIMPLE_SM: &str = include_str!("../../demos/simple_sm.zkasm");
const LOG_SIZES: [u32; 3] = [10, 14, 16];

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile simple_sm", |b| {
        b.iter(|| Assembler::from_code("simple_sm.zkasm", SIMPLE_SM).unwrap())
    });
}

fn bench_simple_sm(c: &mut Criterion) {
    let program = Assembler::from_code("simple_sm.zkasm", SIMPLE_SM).unwrap();
    let table = FunctionTable::simple_sm(from_u64(7), from_u64(7));
    let mut group = c.benchmark_group("simple_sm trace");

    for log_n in LOG_SIZES {
        let n = TraceLength::new(1 << log_n).unwrap();
        group.bench_with_input(BenchmarkId::new("rom", n.get()), &n, |b, &n| {
            b.iter(|| Rom::build(&program, n).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("trace", n.get()), &n, |b, &n| {
            b.iter(|| ExecutionTrace::generate(&program, n, &table).unwrap())
        });
    }

    group.finish();
}

fn bench_mfibonacci(c: &mut Criterion) {
    let mut group = c.benchmark_group("mfibonacci trace");

    for log_n in LOG_SIZES {
        let n = TraceLength::new(1 << log_n).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n.get()), &n, |b, &n| {
            b.iter(|| MFibonacci::execute(n, [from_u64(1), from_u64(2)]))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_simple_sm, bench_mfibonacci);
criterion_main!(benches);
