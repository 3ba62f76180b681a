//! Statements and indented blocks.

use crate::{
    node::Node,
    writer::{Render, Writer},
};

/// The keyword family of a block construct.
///
/// Continuation clauses (`elif`, `else`, `except`, `finally`) check the kind
/// of the construct they follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructKind {
    If,
    Elif,
    Else,
    While,
    For,
    With,
    Try,
    Except,
    /// `else` following `except`.
    TryElse,
    Finally,
    Def,
    Class,
}

impl ConstructKind {
    /// The keyword that opens the construct.
    pub fn keyword(&self) -> &'static str {
        match self {
            ConstructKind::If => "if",
            ConstructKind::Elif => "elif",
            ConstructKind::Else | ConstructKind::TryElse => "else",
            ConstructKind::While => "while",
            ConstructKind::For => "for",
            ConstructKind::With => "with",
            ConstructKind::Try => "try",
            ConstructKind::Except => "except",
            ConstructKind::Finally => "finally",
            ConstructKind::Def => "def",
            ConstructKind::Class => "class",
        }
    }
}

/// A header line followed by an indented body, e.g. `while cond:`.
#[derive(Debug, Clone, PartialEq)]
pub struct Construct {
    kind: ConstructKind,
    header: Node,
    body: Block,
}

impl Construct {
    /// Create a construct. `header` is rendered before the trailing `:`.
    pub fn new(kind: ConstructKind, header: Node, body: Block) -> Self {
        Self { kind, header, body }
    }

    /// The keyword family.
    pub fn kind(&self) -> ConstructKind {
        self.kind
    }

    /// The header, without its trailing `:`.
    pub fn header(&self) -> &Node {
        &self.header
    }

    /// The indented body.
    pub fn body(&self) -> &Block {
        &self.body
    }

    /// Whether this is an `except:` clause that catches everything.
    pub(crate) fn is_bare_except(&self) -> bool {
        self.kind == ConstructKind::Except && self.header.to_source() == "except"
    }
}

/// One statement in a statement sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A single-line statement.
    Node(Node),
    /// A header with an indented body.
    Construct(Construct),
    /// `# ...` lines, one per input line.
    Comment(String),
    /// A `"""` delimited block, one line per input line.
    Docstring(String),
    /// An empty line.
    Blank,
}

impl Statement {
    /// Whether this statement is ignored when looking for the construct a
    /// continuation clause attaches to.
    pub(crate) fn is_trivia(&self) -> bool {
        matches!(self, Statement::Comment(_) | Statement::Blank)
    }
}

impl From<Node> for Statement {
    fn from(node: Node) -> Self {
        Statement::Node(node)
    }
}

impl From<Construct> for Statement {
    fn from(construct: Construct) -> Self {
        Statement::Construct(construct)
    }
}

/// Statements are rendered as complete lines at the writer's current depth.
impl Render for Statement {
    fn render(&self, writer: &mut Writer) {
        match self {
            Statement::Node(node) => {
                writer.write_line(node);
            }
            Statement::Construct(construct) => {
                writer.write_line(&HeaderLine(&construct.header));
                writer.write(&construct.body);
            }
            Statement::Comment(text) => {
                for line in lines(text) {
                    if line.is_empty() {
                        writer.write_line("#");
                    } else {
                        writer.write_line(&format!("# {line}"));
                    }
                }
            }
            Statement::Docstring(text) => {
                writer.write_line("\"\"\"");
                for line in lines(text) {
                    writer.write_line(&escape_docstring(line));
                }
                writer.write_line("\"\"\"");
            }
            Statement::Blank => {
                writer.write_line("");
            }
        }
    }
}

/// An indented region of statements.
///
/// An empty block renders as a single `pass`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    statements: Vec<Statement>,
}

impl Block {
    /// Create a block from a statement sequence.
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// The statements in this block.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Whether the block has no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Render for Block {
    fn render(&self, writer: &mut Writer) {
        writer.indented(|w| {
            if self.statements.is_empty() {
                w.write_line("pass");
            }
            for statement in &self.statements {
                w.write(statement);
            }
        });
    }
}

struct HeaderLine<'a>(&'a Node);

impl Render for HeaderLine<'_> {
    fn render(&self, writer: &mut Writer) {
        writer.write(self.0).write(":");
    }
}

/// Split on every sequence Python treats as a line end: `\r\n`, `\r`, `\n`.
fn lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let text = rest?;
        match text.find(['\r', '\n']) {
            Some(end) => {
                let skip = if text[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&text[end + skip..]);
                Some(&text[..end])
            }
            None => {
                rest = None;
                Some(text)
            }
        }
    })
}

/// Escape text for the inside of a `"""` literal.
fn escape_docstring(line: &str) -> String {
    line.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::code;

    fn render(statement: &Statement) -> String {
        let mut writer = Writer::default();
        writer.write(statement);
        writer.finish()
    }

    #[test]
    fn test_empty_block_renders_pass() {
        let construct = Construct::new(ConstructKind::While, code("while True"), Block::default());
        assert_eq!(render(&construct.into()), "while True:\n    pass\n");
    }

    #[test]
    fn test_nested_constructs() {
        let inner = Construct::new(
            ConstructKind::If,
            code("if x"),
            Block::new(vec![code("y()").into()]),
        );
        let outer = Construct::new(
            ConstructKind::Def,
            code("def f(x)"),
            Block::new(vec![inner.into(), code("return x").into()]),
        );
        assert_eq!(
            render(&outer.into()),
            "def f(x):\n    if x:\n        y()\n    return x\n"
        );
    }

    #[test]
    fn test_comment_lines() {
        let comment = Statement::Comment("first\n\nthird".to_string());
        assert_eq!(render(&comment), "# first\n#\n# third\n");
    }

    #[test]
    fn test_comment_splits_on_carriage_returns() {
        let comment = Statement::Comment("note\rimport os\r\nmore\nend".to_string());
        assert_eq!(render(&comment), "# note\n# import os\n# more\n# end\n");
    }

    #[test]
    fn test_docstring_splits_on_carriage_returns() {
        let doc = Statement::Docstring("one\rtwo".to_string());
        assert_eq!(render(&doc), "\"\"\"\none\ntwo\n\"\"\"\n");
    }

    #[test]
    fn test_docstring_escapes_triple_quotes() {
        let doc = Statement::Docstring("Say \"\"\"hi\"\"\"\nC:\\path".to_string());
        assert_eq!(
            render(&doc),
            "\"\"\"\nSay \\\"\\\"\\\"hi\\\"\\\"\\\"\nC:\\\\path\n\"\"\"\n"
        );
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(render(&Statement::Blank), "\n");
    }

    #[test]
    fn test_trivia() {
        assert!(Statement::Blank.is_trivia());
        assert!(Statement::Comment(String::new()).is_trivia());
        assert!(!Statement::Docstring(String::new()).is_trivia());
        assert!(!Statement::Node(code("x")).is_trivia());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(ConstructKind::TryElse.keyword(), "else");
        assert_eq!(ConstructKind::Except.keyword(), "except");
    }
}
