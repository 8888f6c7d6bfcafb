use p3_field::PrimeCharacteristicRing;

use crate::{config::TraceLength, field::F};

/// Global constant columns shared by every state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConstants {
    /// 1 on the first row, 0 elsewhere.
    pub l1: Vec<F>,
    /// 1 on the last row, 0 elsewhere.
    pub llast: Vec<F>,
}

impl GlobalConstants {
    pub fn new(trace_len: TraceLength) -> Self {
        let n = trace_len.get();
        let indicator = |row: usize| (0..n).map(|i| if i == row { F::ONE } else { F::ZERO }).collect();
        Self {
            l1: indicator(0),
            llast: indicator(n - 1),
        }
    }

    pub fn len(&self) -> usize {
        self.l1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.l1.is_empty()
    }
}
