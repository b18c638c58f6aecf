//! Formula compiler used for late-bound plots and function calls.
//!
//! `"x^2 + a"` compiled with parameters `["x"]` against a scope `{a: 5}` yields a [`Formula`]
//! evaluating `x^2 + 5`. The engine only depends on the [`FormulaCompiler`] trait, so hosts can
//! substitute their own implementation.

mod ast;
mod bytecode;
mod compile;
mod error;
mod lexer;
mod parser;
mod vm;

pub use compile::{BytecodeCompiler, Formula, FormulaCompiler};
pub use error::FormulaError;
