//! End-to-end checks of the main state machine: generated traces pass,
//! tampered ones are caught.

pub mod common;

use common::simple_sm_artifacts;
use p3_field::PrimeCharacteristicRing;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::IntoEnumIterator;
use zkasm_asm::{field, init_logger, MainArtifacts, MainColumn, F};
use zkasm_verifier::{ensure_valid, verify_main, Identity, Violation};

fn violations(artifacts: &MainArtifacts) -> Vec<Violation> {
    verify_main(&artifacts.constants, &artifacts.rom, &artifacts.trace).unwrap()
}

fn violated(artifacts: &MainArtifacts) -> Vec<Identity> {
    violations(artifacts).into_iter().map(|v| v.identity).collect()
}

#[test]
fn test_default_trace_is_accepted() {
    init_logger();
    let artifacts = simple_sm_artifacts(1024, 7, 7);
    assert_eq!(ensure_valid(&violations(&artifacts)), Ok(()));
    assert_eq!(field::to_u64(artifacts.trace.result()), 3577);
}

#[test]
fn test_tampered_register_is_rejected() {
    let mut artifacts = simple_sm_artifacts(64, 7, 7);
    artifacts.trace.a[10] += F::ONE;
    assert!(violated(&artifacts).contains(&Identity::UpdateA));
}

#[test]
fn test_tampered_selector_misses_rom() {
    let mut artifacts = simple_sm_artifacts(64, 7, 7);
    // Row 2 runs `${beforeLast()} :JMPZ(body)`, which never sets B.
    artifacts.trace.set_b[2] = F::ONE;
    assert!(violated(&artifacts).contains(&Identity::RomLookup));
}

#[test]
fn test_tampered_jump_is_rejected() {
    let mut artifacts = simple_sm_artifacts(64, 7, 7);
    artifacts.trace.zk_pc[5] = field::from_u64(3);
    let identities = violated(&artifacts);
    assert!(identities.contains(&Identity::ProgramCounter));
}

#[test]
fn test_random_tampering_is_caught() {
    let mut rng = StdRng::seed_from_u64(42);
    let columns = MainColumn::iter().collect::<Vec<_>>();
    let clean = simple_sm_artifacts(32, 7, 7);

    for _ in 0..64 {
        let mut artifacts = clean.clone();
        let column = columns[rng.random_range(0..columns.len())];
        let row = rng.random_range(0..artifacts.trace.len());
        let delta = field::from_u64(rng.random_range(1..1_000_000));

        let op_before = artifacts.trace.op(row);
        artifacts.trace.column_mut(column)[row] += delta;

        // Perturbing FREE where inFREE is 0, or invOp where op is 0, leaves
        // every identity intact.
        let inert = match column {
            MainColumn::Free => artifacts.trace.in_free[row] == F::ZERO,
            MainColumn::InvOp => op_before == F::ZERO,
            _ => false,
        };
        assert_eq!(
            violations(&artifacts).is_empty(),
            inert,
            "column {column} row {row}"
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_generated_traces_are_accepted(
        a in any::<u64>(),
        b in any::<u64>(),
        log_n in 2u32..8,
    ) {
        let artifacts = simple_sm_artifacts(1 << log_n, a, b);
        prop_assert!(violations(&artifacts).is_empty());
    }
}
