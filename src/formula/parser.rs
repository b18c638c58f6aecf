use crate::formula::ast::{BinaryOp, Expr};
use crate::formula::error::FormulaError;
use crate::formula::lexer::{Span, Token, TokenKind, lex};

pub(crate) fn parse_formula(src: &str) -> Result<Expr, FormulaError> {
    let tokens = lex(src.trim())?;
    let mut p = Parser { tokens, pos: 0 };
    if p.peek().kind == TokenKind::Eof {
        return Err(FormulaError::new(0, "empty formula"));
    }
    let expr = p.parse_sum()?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if t.kind != TokenKind::Eof {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), FormulaError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(FormulaError::new(
                self.span().start,
                format!("expected {kind:?}, found {:?}", self.peek().kind),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, FormulaError> {
        let mut e = self.parse_product()?;
        loop {
            let op = if self.consume(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.consume(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let r = self.parse_product()?;
            e = Expr::Binary {
                op,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        Ok(e)
    }

    fn parse_product(&mut self) -> Result<Expr, FormulaError> {
        let mut e = self.parse_unary()?;
        loop {
            let op = if self.consume(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.consume(TokenKind::Slash) {
                BinaryOp::Div
            } else if self.consume(TokenKind::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };
            let r = self.parse_unary()?;
            e = Expr::Binary {
                op,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        Ok(e)
    }

    fn parse_unary(&mut self) -> Result<Expr, FormulaError> {
        if self.consume(TokenKind::Minus) {
            let e = self.parse_unary()?;
            return Ok(Expr::Neg(Box::new(e)));
        }
        if self.consume(TokenKind::Plus) {
            return self.parse_unary();
        }
        self.parse_power()
    }

    // `^` binds tighter than unary minus on its left and is right associative: -x^2 = -(x^2),
    // 2^3^2 = 2^(3^2).
    fn parse_power(&mut self) -> Result<Expr, FormulaError> {
        let base = self.parse_postfix()?;
        if self.consume(TokenKind::Caret) {
            let exp = self.parse_unary()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                left: Box::new(base),
                right: Box::new(exp),
            });
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> Result<Expr, FormulaError> {
        let e = self.parse_primary()?;
        if self.peek().kind != TokenKind::LParen {
            return Ok(e);
        }
        let Expr::Ident(func) = e else {
            return Err(FormulaError::new(
                self.span().start,
                "call target must be an identifier",
            ));
        };
        self.bump();
        let args = self.parse_args()?;
        Ok(Expr::Call { func, args })
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, FormulaError> {
        let mut args = Vec::new();
        if self.consume(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_sum()?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, FormulaError> {
        let t = self.bump();
        match t.kind {
            TokenKind::Number(v) => Ok(Expr::Num(v)),
            TokenKind::Ident(s) => Ok(Expr::Ident(s)),
            TokenKind::LParen => {
                let e = self.parse_sum()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            other => Err(FormulaError::new(
                t.span.start,
                format!("unexpected token {other:?}"),
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/formula/parser.rs"]
mod tests;
