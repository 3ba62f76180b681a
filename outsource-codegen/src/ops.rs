//! Operator overloads layered over [`Node::binary`] and [`Node::unary`].
//!
//! `node <op> value` builds `(node <op> value)`. For a primitive on the left,
//! `value <op> node` goes through [`Node::reflected`]. Comparisons have no
//! overloadable form in Rust; use [`Node::lt`], [`Node::equals`] and friends.

use std::ops;

use crate::node::{BinOp, Node, UnaryOp};

macro_rules! binary_ops {
    ($($trait:ident::$method:ident => $op:ident),* $(,)?) => {$(
        impl<T: Into<Node>> ops::$trait<T> for Node {
            type Output = Node;

            fn $method(self, rhs: T) -> Node {
                Node::binary(BinOp::$op, self, rhs)
            }
        }

        impl<T: Into<Node>> ops::$trait<T> for &Node {
            type Output = Node;

            fn $method(self, rhs: T) -> Node {
                Node::binary(BinOp::$op, self, rhs)
            }
        }
    )*};
}

binary_ops!(
    Add::add => Add,
    Sub::sub => Sub,
    Mul::mul => Mul,
    Div::div => Div,
    Rem::rem => Mod,
    BitAnd::bitand => BitAnd,
    BitOr::bitor => BitOr,
    BitXor::bitxor => BitXor,
    Shl::shl => LShift,
    Shr::shr => RShift,
);

macro_rules! reflected_ops {
    ($trait:ident::$method:ident => $op:ident; $($lhs:ty),* $(,)?) => {$(
        impl ops::$trait<Node> for $lhs {
            type Output = Node;

            fn $method(self, rhs: Node) -> Node {
                Node::reflected(BinOp::$op, rhs, self)
            }
        }

        impl ops::$trait<&Node> for $lhs {
            type Output = Node;

            fn $method(self, rhs: &Node) -> Node {
                Node::reflected(BinOp::$op, rhs, self)
            }
        }
    )*};
}

reflected_ops!(Add::add => Add; i32, i64, u64, f64, &str);
reflected_ops!(Sub::sub => Sub; i32, i64, u64, f64);
reflected_ops!(Mul::mul => Mul; i32, i64, u64, f64, &str);
reflected_ops!(Div::div => Div; i32, i64, u64, f64);
reflected_ops!(Rem::rem => Mod; i32, i64, u64, f64, &str);
reflected_ops!(BitAnd::bitand => BitAnd; i32, i64, u64, bool);
reflected_ops!(BitOr::bitor => BitOr; i32, i64, u64, bool);
reflected_ops!(BitXor::bitxor => BitXor; i32, i64, u64, bool);
reflected_ops!(Shl::shl => LShift; i32, i64, u64);
reflected_ops!(Shr::shr => RShift; i32, i64, u64);

impl ops::Neg for Node {
    type Output = Node;

    fn neg(self) -> Node {
        Node::unary(UnaryOp::Neg, self)
    }
}

impl ops::Neg for &Node {
    type Output = Node;

    fn neg(self) -> Node {
        Node::unary(UnaryOp::Neg, self)
    }
}

/// `!node` is bitwise inversion (`~node`); logical negation is [`Node::not_`].
impl ops::Not for Node {
    type Output = Node;

    fn not(self) -> Node {
        Node::unary(UnaryOp::Invert, self)
    }
}

impl ops::Not for &Node {
    type Output = Node;

    fn not(self) -> Node {
        Node::unary(UnaryOp::Invert, self)
    }
}
