#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Num(f64),
    Ident(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        func: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl Expr {
    /// Visit every identifier that is read as a value (call targets are skipped).
    pub(crate) fn for_each_ident(&self, f: &mut impl FnMut(&str)) {
        match self {
            Self::Num(_) => {}
            Self::Ident(name) => f(name),
            Self::Neg(e) => e.for_each_ident(f),
            Self::Binary { left, right, .. } => {
                left.for_each_ident(f);
                right.for_each_ident(f);
            }
            Self::Call { args, .. } => {
                for a in args {
                    a.for_each_ident(f);
                }
            }
        }
    }
}
