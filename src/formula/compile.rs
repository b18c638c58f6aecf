use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::context::value::{Primitive, Scope};
use crate::formula::ast::{BinaryOp, Expr};
use crate::formula::bytecode::{BuiltinId, BytecodeProgram, Op, named_constant};
use crate::formula::error::FormulaError;
use crate::formula::parser::parse_formula;
use crate::formula::vm::eval_program;

type FormulaFn = dyn Fn(&[f64]) -> f64 + Send + Sync;

/// A compiled numeric function of its parameters.
///
/// The scope the formula was compiled against is baked in: re-resolving a node recompiles and
/// produces a fresh `Formula` rather than mutating this one. Evaluation never fails; faults
/// surface as non-finite results that callers degrade per sample.
#[derive(Clone)]
pub struct Formula {
    source: Arc<str>,
    params: Arc<[String]>,
    func: Arc<FormulaFn>,
}

impl Formula {
    /// Wrap an arbitrary closure, e.g. one produced by a host-supplied compiler.
    pub fn new(
        source: impl Into<Arc<str>>,
        params: Vec<String>,
        func: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: source.into(),
            params: params.into(),
            func: Arc::new(func),
        }
    }

    /// Evaluate at `args` (one value per parameter).
    pub fn eval(&self, args: &[f64]) -> f64 {
        (self.func)(args)
    }

    /// Formula source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parameter names, in call order.
    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formula")
            .field("source", &self.source)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Turns a formula string, parameter list and scope snapshot into a callable [`Formula`].
///
/// No caching is assumed: resolution compiles on every call.
pub trait FormulaCompiler: fmt::Debug {
    /// Compile `source` as a function of `params`, reading free variables from `scope`.
    fn compile(
        &self,
        source: &str,
        params: &[String],
        scope: &Scope,
    ) -> Result<Formula, FormulaError>;

    /// Names `source` reads that are not parameters. Call targets are excluded; named constants
    /// are kept since a bound variable of the same name shadows them.
    fn free_variables(
        &self,
        source: &str,
        params: &[String],
    ) -> Result<BTreeSet<String>, FormulaError>;
}

/// Default compiler: parses to an AST and lowers to a small stack bytecode.
#[derive(Debug, Default, Clone, Copy)]
pub struct BytecodeCompiler;

impl FormulaCompiler for BytecodeCompiler {
    fn compile(
        &self,
        source: &str,
        params: &[String],
        scope: &Scope,
    ) -> Result<Formula, FormulaError> {
        let ast = parse_formula(source)?;
        let program = lower_to_bytecode(&ast, params, scope)?;
        Ok(Formula::new(source, params.to_vec(), move |args| {
            eval_program(&program, args).unwrap_or(f64::NAN)
        }))
    }

    fn free_variables(
        &self,
        source: &str,
        params: &[String],
    ) -> Result<BTreeSet<String>, FormulaError> {
        let ast = parse_formula(source)?;
        let mut out = BTreeSet::new();
        ast.for_each_ident(&mut |name| {
            if !params.iter().any(|p| p == name) {
                out.insert(name.to_owned());
            }
        });
        Ok(out)
    }
}

pub(crate) fn lower_to_bytecode(
    expr: &Expr,
    params: &[String],
    scope: &Scope,
) -> Result<BytecodeProgram, FormulaError> {
    if params.len() > usize::from(u8::MAX) {
        return Err(FormulaError::new(0, "too many formula parameters"));
    }
    let mut out = BytecodeProgram::new(params.len());
    lower(expr, params, scope, &mut out)?;
    Ok(out)
}

fn lower(
    expr: &Expr,
    params: &[String],
    scope: &Scope,
    out: &mut BytecodeProgram,
) -> Result<(), FormulaError> {
    match expr {
        Expr::Num(v) => {
            let idx = out.push_const(*v);
            out.ops.push(Op::PushConst(idx));
        }
        Expr::Ident(name) => {
            // Parameters shadow scope variables, which shadow named constants.
            if let Some(i) = params.iter().position(|p| p == name) {
                out.ops.push(Op::LoadParam(i as u8));
                return Ok(());
            }
            let v = match scope.get(name) {
                Some(Primitive::Number(v)) => *v,
                Some(Primitive::Text(_)) => {
                    return Err(FormulaError::new(
                        0,
                        format!("variable '{name}' is not numeric"),
                    ));
                }
                None => named_constant(name).ok_or_else(|| {
                    FormulaError::new(0, format!("unknown variable '{name}'"))
                })?,
            };
            let idx = out.push_const(v);
            out.ops.push(Op::PushConst(idx));
        }
        Expr::Neg(e) => {
            lower(e, params, scope, out)?;
            out.ops.push(Op::Neg);
        }
        Expr::Binary { op, left, right } => {
            lower(left, params, scope, out)?;
            lower(right, params, scope, out)?;
            out.ops.push(match op {
                BinaryOp::Add => Op::Add,
                BinaryOp::Sub => Op::Sub,
                BinaryOp::Mul => Op::Mul,
                BinaryOp::Div => Op::Div,
                BinaryOp::Mod => Op::Mod,
                BinaryOp::Pow => Op::Pow,
            });
        }
        Expr::Call { func, args } => {
            let Some(id) = BuiltinId::lookup(func) else {
                return Err(FormulaError::new(0, format!("unknown function '{func}'")));
            };
            if args.len() != usize::from(id.arity()) {
                return Err(FormulaError::new(
                    0,
                    format!(
                        "{func} expects {} arg(s), got {}",
                        id.arity(),
                        args.len()
                    ),
                ));
            }
            for a in args {
                lower(a, params, scope, out)?;
            }
            out.ops.push(Op::CallBuiltin(id));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/formula/compile.rs"]
mod tests;
