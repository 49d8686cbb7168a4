//! Core runtime types
//!
//! Operation names (`Symbol`) and the values operations exchange
//! (`RuntimeValue`).

pub mod runtime_value;
pub mod symbol;

pub use runtime_value::*;
pub use symbol::Symbol;

#[cfg(test)]
mod tests;
