use p3_field::PrimeCharacteristicRing;
use tracing::{info, instrument};
use zkasm_asm::{MFibonacci, F};

use crate::{check_len, Checker, Identity, Result, Violation};

/// Checks the mFibonacci identities against the public inputs and output.
#[instrument(level = "info", skip_all, fields(n = is_last.len()))]
pub fn verify_mfibonacci(
    is_last: &[F],
    machine: &MFibonacci,
    inputs: [F; 2],
    out: F,
) -> Result<Vec<Violation>> {
    let n = is_last.len();
    check_len("mFibonacci.a", &machine.a, n)?;
    check_len("mFibonacci.b", &machine.b, n)?;

    let mut checker = Checker::default();
    for row in 0..n {
        let next = (row + 1) % n;
        let (a, b) = (machine.a[row], machine.b[row]);
        let not_last = F::ONE - is_last[row];

        checker.assert_zero(Identity::FibonacciA, row, not_last * (machine.a[next] - b));
        checker.assert_zero(Identity::FibonacciB, row, not_last * (machine.b[next] - a * b));
        checker.assert_zero(Identity::Output, row, is_last[row] * (a - out));
    }
    if let Some((a, b)) = machine.a.first().zip(machine.b.first()) {
        checker.assert_zero(Identity::FirstInput, 0, *a - inputs[0]);
        checker.assert_zero(Identity::SecondInput, 0, *b - inputs[1]);
    }

    let violations = checker.finish();
    info!(violations = violations.len(), "checked mFibonacci");
    Ok(violations)
}

#[cfg(test)]
mod tests {
    use zkasm_asm::{field::from_u64, TraceLength};

    use super::*;

    #[test]
    fn test_accepts_execution() {
        let n = TraceLength::new(16).unwrap();
        let inputs = [from_u64(1), from_u64(2)];
        let (machine, out) = MFibonacci::execute(n, inputs);
        let is_last = MFibonacci::is_last(n);

        assert_eq!(verify_mfibonacci(&is_last, &machine, inputs, out), Ok(vec![]));
    }

    #[test]
    fn test_wrong_output_and_inputs() {
        let n = TraceLength::new(8).unwrap();
        let inputs = [from_u64(3), from_u64(4)];
        let (machine, out) = MFibonacci::execute(n, inputs);
        let is_last = MFibonacci::is_last(n);

        let violations =
            verify_mfibonacci(&is_last, &machine, [from_u64(3), from_u64(5)], out + F::ONE)
                .unwrap();
        assert_eq!(
            violations,
            vec![
                Violation {
                    identity: Identity::Output,
                    row: 7
                },
                Violation {
                    identity: Identity::SecondInput,
                    row: 0
                },
            ]
        );
    }
}
