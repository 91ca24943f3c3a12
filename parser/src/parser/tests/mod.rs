use crate::{BinaryOp, Expr, UnaryOp};

mod for_loop;
mod formula;

fn num(value: f64) -> Expr {
    Expr::Const(value)
}

fn var(name: &str) -> Expr {
    Expr::var(name)
}

fn bin(lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
    Expr::binary(lhs, op, rhs)
}

fn neg(inner: Expr) -> Expr {
    Expr::Unary {
        op: UnaryOp::Neg,
        inner: Box::new(inner),
    }
}
