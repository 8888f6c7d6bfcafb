//! The multiplicative Fibonacci machine: `a' = b`, `b' = a*b`.

use p3_field::PrimeCharacteristicRing;
use tracing::instrument;

use crate::{config::TraceLength, field::F};

/// Committed columns `a` and `b` of the mFibonacci machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MFibonacci {
    pub a: Vec<F>,
    pub b: Vec<F>,
}

impl MFibonacci {
    /// Fills both columns from `inputs` and returns them with the output
    /// `a[N-1]`.
    #[instrument(level = "info", skip(inputs), fields(n = trace_len.get()))]
    pub fn execute(trace_len: TraceLength, inputs: [F; 2]) -> (Self, F) {
        let n = trace_len.get();
        let mut a = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        let [mut prev_a, mut prev_b] = inputs;
        a.push(prev_a);
        b.push(prev_b);
        for _ in 1..n {
            (prev_a, prev_b) = (prev_b, prev_a * prev_b);
            a.push(prev_a);
            b.push(prev_b);
        }
        (Self { a, b }, prev_a)
    }

    /// The `ISLAST` constant column.
    pub fn is_last(trace_len: TraceLength) -> Vec<F> {
        let n = trace_len.get();
        (0..n)
            .map(|i| if i == n - 1 { F::ONE } else { F::ZERO })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{from_u64, to_u64};

    #[test]
    fn test_small_sequence() {
        let (machine, out) = MFibonacci::execute(TraceLength::new(8).unwrap(), [from_u64(1), from_u64(2)]);
        let a = machine.a.iter().map(|v| to_u64(*v)).collect::<Vec<_>>();
        // b: 2, 2, 4, 8, 32, 256, 8192, ...
        assert_eq!(a, [1, 2, 2, 4, 8, 32, 256, 8192]);
        assert_eq!(to_u64(out), 8192);
        assert_eq!(machine.len(), 8);
    }

    #[test]
    fn test_ones_stay_one() {
        let (machine, out) = MFibonacci::execute(TraceLength::DEFAULT, [F::ONE, F::ONE]);
        assert!(machine.a.iter().chain(&machine.b).all(|v| *v == F::ONE));
        assert_eq!(out, F::ONE);
    }

    #[test]
    fn test_is_last() {
        let col = MFibonacci::is_last(TraceLength::new(4).unwrap());
        assert_eq!(col, [F::ZERO, F::ZERO, F::ZERO, F::ONE]);
    }
}
