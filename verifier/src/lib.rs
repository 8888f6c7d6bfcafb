//! Row-by-row checker for the polynomial identities of the zkASM state
//! machines.
//!
//! Every identity is evaluated on all `N` rows, with the row after `N - 1`
//! being row 0.

use std::fmt;

use p3_field::PrimeCharacteristicRing;
use strum_macros::{Display, EnumIter};
use tracing::debug;

mod error;
mod main_sm;
mod mfibonacci;

pub use error::{Result, VerifierError};
pub use main_sm::verify_main;
pub use mfibonacci::verify_mfibonacci;
use zkasm_asm::F;

/// Identities checked by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Identity {
    #[strum(serialize = "Main.A' = setA*(op - A) + A")]
    UpdateA,
    #[strum(serialize = "Main.B' = setB*(op - B) + B")]
    UpdateB,
    #[strum(serialize = "Main.op*(1 - op*invOp) = 0")]
    ZeroTest,
    #[strum(serialize = "Main.zkPC'")]
    ProgramCounter,
    #[strum(serialize = "Global.L1*Main.zkPC = 0")]
    StartsAtZero,
    #[strum(serialize = "Global.LLAST*Main.A' = 0")]
    RestartA,
    #[strum(serialize = "Global.LLAST*Main.B' = 0")]
    RestartB,
    #[strum(serialize = "Main in Rom")]
    RomLookup,
    #[strum(serialize = "mFibonacci.(1 - ISLAST)*(a' - b) = 0")]
    FibonacciA,
    #[strum(serialize = "mFibonacci.(1 - ISLAST)*(b' - a*b) = 0")]
    FibonacciB,
    #[strum(serialize = "mFibonacci.L1*(a - in1) = 0")]
    FirstInput,
    #[strum(serialize = "mFibonacci.L1*(b - in2) = 0")]
    SecondInput,
    #[strum(serialize = "mFibonacci.ISLAST*(a - out) = 0")]
    Output,
}

/// An identity that does not hold on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Violation {
    pub identity: Identity,
    pub row: usize,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (row {})", self.identity, self.row)
    }
}

/// Turns a list of violations into an error unless it is empty.
pub fn ensure_valid(violations: &[Violation]) -> Result<()> {
    match violations.first() {
        None => Ok(()),
        Some(first) => Err(VerifierError::IdentitiesViolated {
            count: violations.len(),
            first: *first,
        }),
    }
}

pub(crate) fn check_len(column: &str, values: &[F], expected: usize) -> Result<()> {
    if values.len() != expected {
        return Err(VerifierError::LengthMismatch {
            column: column.to_string(),
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Collects violations row by row.
#[derive(Debug, Default)]
pub(crate) struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    pub(crate) fn assert_zero(&mut self, identity: Identity, row: usize, value: F) {
        if value != F::ZERO {
            self.push(identity, row);
        }
    }

    pub(crate) fn push(&mut self, identity: Identity, row: usize) {
        debug!(%identity, row, "identity violated");
        self.violations.push(Violation { identity, row });
    }

    pub(crate) fn finish(self) -> Vec<Violation> {
        self.violations
    }
}
