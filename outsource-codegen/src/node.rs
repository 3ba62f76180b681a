//! Immutable expression trees.
//!
//! A [`Node`] is an ordered list of parts: raw source text, scalar
//! [`Literal`]s, and other nodes. Every construction function returns a new
//! node and leaves its operands untouched, so nodes can be shared freely
//! between statements.
//!
//! # Example
//!
//! ```
//! use outsource_codegen::{BinOp, Node};
//!
//! let foo = Node::code("foo");
//! let bar = Node::code("bar");
//!
//! let cond = Node::binary(BinOp::Lt, Node::binary(BinOp::Add, &foo, 1), &bar);
//! assert_eq!(cond.to_source(), "((foo + 1) < bar)");
//!
//! // The operator overloads build the same tree.
//! assert_eq!((&foo + 1).lt(&bar), cond);
//! ```

use std::{collections::BTreeMap, fmt, rc::Rc};

use indexmap::IndexMap;

use crate::{
    literal::Literal,
    writer::{Render, Writer},
};

/// Binary operators. Rendered expressions are always parenthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    MatMul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    And,
    Or,
    In,
    NotIn,
    Is,
    IsNot,
}

impl BinOp {
    /// The operator token.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::MatMul => "@",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::LShift => "<<",
            BinOp::RShift => ">>",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::LtE => "<=",
            BinOp::Gt => ">",
            BinOp::GtE => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::In => "in",
            BinOp::NotIn => "not in",
            BinOp::Is => "is",
            BinOp::IsNot => "is not",
        }
    }

    /// Whether this is one of `<`, `<=`, `>`, `>=`.
    pub fn is_ordering(&self) -> bool {
        matches!(self, BinOp::Lt | BinOp::LtE | BinOp::Gt | BinOp::GtE)
    }

    /// The operator that gives the same result with swapped operands.
    ///
    /// Only ordering operators change; everything else maps to itself.
    pub fn mirror(self) -> Self {
        match self {
            BinOp::Lt => BinOp::Gt,
            BinOp::LtE => BinOp::GtE,
            BinOp::Gt => BinOp::Lt,
            BinOp::GtE => BinOp::LtE,
            op => op,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `~x`
    Invert,
    /// `not (x)`
    Not,
}

impl UnaryOp {
    /// The operator token.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Invert => "~",
            UnaryOp::Not => "not ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Text(String),
    Literal(Literal),
    Node(Node),
}

/// An immutable fragment of generated source.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    parts: Rc<[Part]>,
}

/// Accumulates parts for a new node.
struct Parts(Vec<Part>);

impl Parts {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn text(mut self, text: &str) -> Self {
        self.0.push(Part::Text(text.to_string()));
        self
    }

    fn node(mut self, node: impl Into<Node>) -> Self {
        self.0.push(Part::Node(node.into()));
        self
    }

    /// Push `node` as the operand of an operator, call, or subscript.
    ///
    /// A negative number is wrapped so its sign cannot bind looser than the
    /// surrounding operator: `(-2) ** y`, not `-2 ** y`.
    fn operand(self, node: impl Into<Node>) -> Self {
        let node = node.into();
        if node.is_negative_number() {
            self.text("(").node(node).text(")")
        } else {
            self.node(node)
        }
    }

    /// Push `items` separated by `", "`.
    fn separated<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self = self.text(", ");
            }
            self = self.node(item);
        }
        self
    }

    fn build(self) -> Node {
        Node {
            parts: Rc::from(self.0),
        }
    }
}

impl Node {
    /// Raw source text, emitted verbatim.
    pub fn code(text: impl Into<String>) -> Self {
        Node {
            parts: Rc::from(vec![Part::Text(text.into())]),
        }
    }

    /// A scalar literal.
    pub fn literal(value: Literal) -> Self {
        Node {
            parts: Rc::from(vec![Part::Literal(value)]),
        }
    }

    /// A quoted string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(Literal::Str(value.into()))
    }

    /// `None`.
    pub fn none() -> Self {
        Self::literal(Literal::None)
    }

    /// Juxtapose nodes with no separator.
    pub fn concat<I, A>(parts: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Node>,
    {
        parts.into_iter().fold(Parts::new(), Parts::node).build()
    }

    /// `(left <op> right)`.
    pub fn binary(op: BinOp, left: impl Into<Node>, right: impl Into<Node>) -> Self {
        Parts::new()
            .text("(")
            .operand(left)
            .text(&format!(" {} ", op.as_str()))
            .operand(right)
            .text(")")
            .build()
    }

    /// `value <op> node`, where the value is the left-hand operand that
    /// could not build a node itself.
    ///
    /// The result keeps the node on the left when the operator allows it:
    /// ordering operators are mirrored and equality operators are symmetric.
    /// Every other operator keeps `value` on the left.
    ///
    /// ```
    /// use outsource_codegen::{BinOp, Node};
    ///
    /// let foo = Node::code("foo");
    /// assert_eq!(Node::reflected(BinOp::Gt, &foo, 19).to_source(), "(foo < 19)");
    /// assert_eq!(Node::reflected(BinOp::Eq, &foo, 27).to_source(), "(foo == 27)");
    /// assert_eq!(Node::reflected(BinOp::Sub, &foo, 20).to_source(), "(20 - foo)");
    /// ```
    pub fn reflected(op: BinOp, node: impl Into<Node>, value: impl Into<Node>) -> Self {
        match op {
            op if op.is_ordering() => Self::binary(op.mirror(), node, value),
            BinOp::Eq | BinOp::NotEq => Self::binary(op, node, value),
            op => Self::binary(op, value, node),
        }
    }

    /// `(<op>operand)`, or `(not (operand))` for [`UnaryOp::Not`].
    pub fn unary(op: UnaryOp, operand: impl Into<Node>) -> Self {
        let parts = Parts::new().text("(").text(op.as_str());
        let parts = match op {
            UnaryOp::Not => parts.text("(").node(operand).text(")"),
            _ => parts.operand(operand),
        };
        parts.text(")").build()
    }

    /// `(not (operand))`.
    pub fn not_(operand: impl Into<Node>) -> Self {
        Self::unary(UnaryOp::Not, operand)
    }

    /// `(yield value)`.
    pub fn yield_(value: impl Into<Node>) -> Self {
        Parts::new().text("(yield ").node(value).text(")").build()
    }

    /// `[a, b, ...]`.
    pub fn list<I, A>(items: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Node>,
    {
        Parts::new()
            .text("[")
            .separated(items.into_iter().map(Into::into))
            .text("]")
            .build()
    }

    /// `(a, b, ...)`, with a trailing comma for a single element.
    pub fn tuple<I, A>(items: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Node>,
    {
        let items: Vec<Node> = items.into_iter().map(Into::into).collect();
        let single = items.len() == 1;
        let parts = Parts::new().text("(").separated(items);
        let parts = if single { parts.text(",") } else { parts };
        parts.text(")").build()
    }

    /// `{k: v, ...}` in iteration order.
    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Node>,
        V: Into<Node>,
    {
        let pairs = entries.into_iter().map(|(key, value)| {
            Parts::new()
                .node(key)
                .text(": ")
                .node(value)
                .build()
        });
        Parts::new().text("{").separated(pairs).text("}").build()
    }

    /// `slice(start, stop, step)`.
    pub fn slice_of(
        start: impl Into<Node>,
        stop: impl Into<Node>,
        step: impl Into<Node>,
    ) -> Self {
        Node::code("slice").call([start.into(), stop.into(), step.into()])
    }

    /// `self(args...)`.
    pub fn call<I, A>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Node>,
    {
        self.call_with(args, std::iter::empty::<(String, Node)>())
    }

    /// `self()`.
    pub fn invoke(&self) -> Self {
        self.call(std::iter::empty::<Node>())
    }

    /// `self(args..., name=value...)`.
    ///
    /// Positional arguments come first, followed by keyword arguments in
    /// the given order.
    pub fn call_with<I, A, K, KS, V>(&self, args: I, kwargs: K) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Node>,
        K: IntoIterator<Item = (KS, V)>,
        KS: Into<String>,
        V: Into<Node>,
    {
        let kwargs = kwargs.into_iter().map(|(name, value)| {
            Parts::new()
                .text(&name.into())
                .text("=")
                .node(value)
                .build()
        });
        let arguments = args.into_iter().map(Into::into).chain(kwargs);
        Parts::new()
            .operand(self)
            .text("(")
            .separated(arguments)
            .text(")")
            .build()
    }

    /// `self.name`.
    pub fn attr(&self, name: &str) -> Self {
        Parts::new().operand(self).text(".").text(name).build()
    }

    /// `self[key]`.
    pub fn index(&self, key: impl Into<Node>) -> Self {
        Parts::new()
            .operand(self)
            .text("[")
            .node(key)
            .text("]")
            .build()
    }

    /// `self[slice(start, stop, None)]`.
    pub fn slice(&self, start: impl Into<Node>, stop: impl Into<Node>) -> Self {
        self.index(Self::slice_of(start, stop, Node::none()))
    }

    fn is_negative_number(&self) -> bool {
        match &*self.parts {
            [Part::Literal(Literal::Int(v))] => *v < 0,
            [Part::Literal(Literal::Float(v))] => v.is_finite() && v.is_sign_negative(),
            _ => false,
        }
    }

    /// `self = value`.
    pub fn assign(&self, value: impl Into<Node>) -> Self {
        Parts::new().node(self).text(" = ").node(value).build()
    }

    /// `self : annotation`.
    pub fn annotate(&self, annotation: impl Into<Node>) -> Self {
        Parts::new().node(self).text(" : ").node(annotation).build()
    }

    /// `(+self)`.
    pub fn pos(&self) -> Self {
        Self::unary(UnaryOp::Pos, self)
    }

    /// `(self // other)`.
    pub fn floor_div(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::FloorDiv, self, other)
    }

    /// `(self ** other)`.
    pub fn pow(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::Pow, self, other)
    }

    /// `(self @ other)`.
    pub fn matmul(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::MatMul, self, other)
    }

    /// `(self == other)`.
    pub fn equals(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::Eq, self, other)
    }

    /// `(self != other)`.
    pub fn not_equals(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::NotEq, self, other)
    }

    /// `(self < other)`.
    pub fn lt(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::Lt, self, other)
    }

    /// `(self <= other)`.
    pub fn le(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::LtE, self, other)
    }

    /// `(self > other)`.
    pub fn gt(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::Gt, self, other)
    }

    /// `(self >= other)`.
    pub fn ge(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::GtE, self, other)
    }

    /// `(self and other)`.
    pub fn and(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::And, self, other)
    }

    /// `(self or other)`.
    pub fn or(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::Or, self, other)
    }

    /// `(self in container)`.
    pub fn in_(&self, container: impl Into<Node>) -> Self {
        Self::binary(BinOp::In, self, container)
    }

    /// `(self not in container)`.
    pub fn not_in(&self, container: impl Into<Node>) -> Self {
        Self::binary(BinOp::NotIn, self, container)
    }

    /// `(self is other)`.
    pub fn is(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::Is, self, other)
    }

    /// `(self is not other)`.
    pub fn is_not(&self, other: impl Into<Node>) -> Self {
        Self::binary(BinOp::IsNot, self, other)
    }

    /// Render this node to a string.
    pub fn to_source(&self) -> String {
        let mut writer = Writer::default();
        writer.write(self);
        writer.finish()
    }
}

impl Render for Node {
    fn render(&self, writer: &mut Writer) {
        for part in self.parts.iter() {
            match part {
                Part::Text(text) => writer.write(text.as_str()),
                Part::Literal(literal) => writer.write(literal),
                Part::Node(node) => writer.write(node),
            };
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}

/// Shorthand for [`Node::code`].
pub fn code(text: impl Into<String>) -> Node {
    Node::code(text)
}

// =========================================================================
// Literal conversion
// =========================================================================

impl From<&Node> for Node {
    fn from(node: &Node) -> Self {
        node.clone()
    }
}

impl From<Literal> for Node {
    fn from(value: Literal) -> Self {
        Node::literal(value)
    }
}

macro_rules! int_literals {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for Node {
            fn from(value: $ty) -> Self {
                Node::literal(Literal::Int(value as i128))
            }
        }
    )*};
}

int_literals!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<i128> for Node {
    fn from(value: i128) -> Self {
        Node::literal(Literal::Int(value))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::literal(Literal::Float(value))
    }
}

impl From<f32> for Node {
    fn from(value: f32) -> Self {
        Node::literal(Literal::Float(f64::from(value)))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::literal(Literal::Bool(value))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::string(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::string(value)
    }
}

impl From<&String> for Node {
    fn from(value: &String) -> Self {
        Node::string(value.as_str())
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Node::none, Into::into)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(items: Vec<T>) -> Self {
        Node::list(items)
    }
}

impl<T: Into<Node>, const N: usize> From<[T; N]> for Node {
    fn from(items: [T; N]) -> Self {
        Node::list(items)
    }
}

impl From<()> for Node {
    fn from(_: ()) -> Self {
        Node::tuple(std::iter::empty::<Node>())
    }
}

macro_rules! tuple_literals {
    ($(($($name:ident),+)),* $(,)?) => {$(
        impl<$($name: Into<Node>),+> From<($($name,)+)> for Node {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                Node::tuple([$($name.into()),+])
            }
        }
    )*};
}

tuple_literals!(
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
    (A, B, C, D, E, F),
);

impl<K: Into<Node>, V: Into<Node>> From<IndexMap<K, V>> for Node {
    fn from(map: IndexMap<K, V>) -> Self {
        Node::dict(map)
    }
}

impl<K: Into<Node>, V: Into<Node>> From<BTreeMap<K, V>> for Node {
    fn from(map: BTreeMap<K, V>) -> Self {
        Node::dict(map)
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Node::none(),
            Value::Bool(v) => v.into(),
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    v.into()
                } else if let Some(v) = n.as_u64() {
                    v.into()
                } else {
                    n.as_f64().map_or_else(Node::none, Into::into)
                }
            }
            Value::String(v) => v.into(),
            Value::Array(items) => Node::list(items),
            Value::Object(map) => Node::dict(map),
        }
    }
}
