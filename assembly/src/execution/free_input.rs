//! Free-input providers.
//!
//! A step tagged with `${name()}` reads its `FREE` value from a provider,
//! which is asked by function name on every row the step governs.

use std::fmt;

use ahash::AHashMap;
use p3_field::PrimeCharacteristicRing;

use crate::field::F;

/// Position of the row a free input is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowContext {
    pub row: usize,
    pub trace_len: usize,
}

impl RowContext {
    pub const fn is_before_last(&self) -> bool {
        self.row + 2 == self.trace_len
    }
}

/// Supplies values for free-input tags.
pub trait FreeInputProvider {
    /// Returns `None` when `func_name` is not a function this provider knows.
    fn free_input(&self, func_name: &str, ctx: &RowContext) -> Option<F>;
}

type FreeInputFn = Box<dyn Fn(&RowContext) -> F + Send + Sync>;

/// A provider backed by a table of named functions.
#[derive(Default)]
pub struct FunctionTable {
    functions: AHashMap<String, FreeInputFn>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as a function returning `value` on every row.
    pub fn with_constant(self, name: &str, value: F) -> Self {
        self.with_function(name, move |_| value)
    }

    pub fn with_function<Func>(mut self, name: &str, func: Func) -> Self
    where
        Func: Fn(&RowContext) -> F + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Box::new(func));
        self
    }

    /// The functions used by the simple state machine: two constant inputs
    /// and `beforeLast`, which is 1 only on row `N - 2`.
    pub fn simple_sm(a: F, b: F) -> Self {
        Self::new()
            .with_constant("getAFreeInput", a)
            .with_constant("getAnotherFreeInput", b)
            .with_function("beforeLast", |ctx| {
                if ctx.is_before_last() {
                    F::ONE
                } else {
                    F::ZERO
                }
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.functions.keys()).finish()
    }
}

impl FreeInputProvider for FunctionTable {
    fn free_input(&self, func_name: &str, ctx: &RowContext) -> Option<F> {
        self.functions.get(func_name).map(|func| func(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::from_u64;

    #[test]
    fn test_simple_sm_functions() {
        let table = FunctionTable::simple_sm(from_u64(7), from_u64(7));
        let ctx = |row| RowContext { row, trace_len: 16 };

        assert_eq!(table.free_input("getAFreeInput", &ctx(3)), Some(from_u64(7)));
        assert_eq!(table.free_input("getAnotherFreeInput", &ctx(0)), Some(from_u64(7)));
        assert_eq!(table.free_input("beforeLast", &ctx(13)), Some(F::ZERO));
        assert_eq!(table.free_input("beforeLast", &ctx(14)), Some(F::ONE));
        assert_eq!(table.free_input("beforeLast", &ctx(15)), Some(F::ZERO));
    }

    #[test]
    fn test_unknown_function() {
        let table = FunctionTable::new().with_constant("one", F::ONE);
        assert!(table.contains("one"));
        assert_eq!(
            table.free_input("two", &RowContext { row: 0, trace_len: 2 }),
            None
        );
    }
}
