use crate::formula::bytecode::{BuiltinId, BytecodeProgram, Op};
use crate::formula::error::FormulaError;

pub(crate) fn eval_program(p: &BytecodeProgram, args: &[f64]) -> Result<f64, FormulaError> {
    let mut stack: Vec<f64> = Vec::with_capacity(16);
    eval_program_with_stack(p, args, &mut stack)
}

pub(crate) fn eval_program_with_stack(
    p: &BytecodeProgram,
    args: &[f64],
    stack: &mut Vec<f64>,
) -> Result<f64, FormulaError> {
    if args.len() != p.arity {
        return Err(FormulaError::new(
            0,
            format!("expected {} argument(s), got {}", p.arity, args.len()),
        ));
    }
    stack.clear();

    for &op in &p.ops {
        match op {
            Op::PushConst(idx) => {
                let c = p
                    .consts
                    .get(idx.0 as usize)
                    .ok_or_else(|| FormulaError::new(0, "const idx out of range"))?;
                stack.push(*c);
            }
            Op::LoadParam(i) => {
                let v = args
                    .get(i as usize)
                    .ok_or_else(|| FormulaError::new(0, "param idx out of range"))?;
                stack.push(*v);
            }
            Op::Neg => {
                let v = pop(stack)?;
                stack.push(-v);
            }
            Op::Add => bin(stack, |a, b| a + b)?,
            Op::Sub => bin(stack, |a, b| a - b)?,
            Op::Mul => bin(stack, |a, b| a * b)?,
            Op::Div => bin(stack, |a, b| a / b)?,
            Op::Mod => bin(stack, |a, b| a % b)?,
            Op::Pow => bin(stack, pow)?,
            Op::CallBuiltin(id) => call_builtin(stack, id)?,
        }
    }

    if stack.len() != 1 {
        return Err(FormulaError::new(
            0,
            format!("stack has {} values at end of program", stack.len()),
        ));
    }
    pop(stack)
}

// Integer exponents use `powi`: `(-2)^3 == -8`.
fn pow(a: f64, b: f64) -> f64 {
    if b.fract() == 0.0 && b.abs() <= f64::from(i32::MAX) {
        a.powi(b as i32)
    } else {
        a.powf(b)
    }
}

fn pop(stack: &mut Vec<f64>) -> Result<f64, FormulaError> {
    stack
        .pop()
        .ok_or_else(|| FormulaError::new(0, "stack underflow"))
}

fn bin(stack: &mut Vec<f64>, f: impl FnOnce(f64, f64) -> f64) -> Result<(), FormulaError> {
    let b = pop(stack)?;
    let a = pop(stack)?;
    stack.push(f(a, b));
    Ok(())
}

fn call_builtin(stack: &mut Vec<f64>, id: BuiltinId) -> Result<(), FormulaError> {
    if id.arity() == 2 {
        let b = pop(stack)?;
        let a = pop(stack)?;
        stack.push(match id {
            BuiltinId::Min => a.min(b),
            BuiltinId::Max => a.max(b),
            _ => pow(a, b),
        });
        return Ok(());
    }

    let x = pop(stack)?;
    stack.push(match id {
        BuiltinId::Sin => x.sin(),
        BuiltinId::Cos => x.cos(),
        BuiltinId::Tan => x.tan(),
        BuiltinId::Asin => x.asin(),
        BuiltinId::Acos => x.acos(),
        BuiltinId::Atan => x.atan(),
        BuiltinId::Sqrt => x.sqrt(),
        BuiltinId::Abs => x.abs(),
        BuiltinId::Exp => x.exp(),
        BuiltinId::Ln => x.ln(),
        BuiltinId::Log10 => x.log10(),
        BuiltinId::Floor => x.floor(),
        BuiltinId::Ceil => x.ceil(),
        BuiltinId::Min | BuiltinId::Max | BuiltinId::Pow => {
            return Err(FormulaError::new(0, "binary builtin called with one arg"));
        }
    });
    Ok(())
}
