//! Statement builder with nested scopes.
//!
//! Each block-opening method takes a closure that fills the block's body.
//! While the closure runs, appended statements land in a fresh buffer; when
//! it returns (with `Ok` or `Err`) the previous buffer is restored and the
//! finished construct is appended to it.
//!
//! # Example
//!
//! ```
//! use outsource_codegen::{Builder, code};
//!
//! let mut b = Builder::new();
//! let (foo, bar) = (code("foo"), code("bar"));
//!
//! b.if_((&foo + 1).lt(&bar), |b| {
//!     b.append(code("print").call(["ok"]));
//!     Ok(())
//! })?;
//!
//! assert_eq!(b.write_source(), "if ((foo + 1) < bar):\n    print('ok')\n");
//! # Ok::<(), outsource_codegen::Error>(())
//! ```

use std::{collections::HashMap, mem};

use crate::{
    Error, Options, Result,
    block::{Block, Construct, ConstructKind, Statement},
    node::Node,
    writer::Writer,
};

/// Builds a module body out of statements and nested blocks.
#[derive(Debug, Clone)]
pub struct Builder {
    statements: Vec<Statement>,
    globals: Vec<Statement>,
    num_blocks: usize,
    /// Block depth at which the active global section started.
    hoist_base: Option<usize>,
    names: HashMap<String, usize>,
    options: Options,
}

impl Builder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create a builder with the given options.
    pub fn with_options(options: Options) -> Self {
        Self {
            statements: Vec::new(),
            globals: Vec::new(),
            num_blocks: 1,
            hoist_base: None,
            names: HashMap::new(),
            options,
        }
    }

    /// The options this builder was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Render the hoisted statements followed by the module body.
    pub fn write_source(&self) -> String {
        let mut writer = Writer::new(self.options.indent);
        for statement in self.globals.iter().chain(&self.statements) {
            writer.write(statement);
        }
        writer.finish()
    }

    // =========================================================================
    // Appending statements
    // =========================================================================

    /// Append a statement to the current buffer.
    pub fn append(&mut self, statement: impl Into<Node>) -> &mut Self {
        self.push(Statement::Node(statement.into()))
    }

    /// Append several statements to the current buffer, in order.
    pub fn extend<I, A>(&mut self, statements: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Node>,
    {
        for statement in statements {
            self.append(statement);
        }
        self
    }

    /// Append a statement to the hoisted outer sequence.
    ///
    /// Inside a [`global_section`](Self::global_section), a statement
    /// appended from a block opened within the section is placed in the
    /// outer sequence ahead of that block.
    pub fn append_global(&mut self, statement: impl Into<Node>) -> &mut Self {
        let statement = Statement::Node(statement.into());
        match self.hoist_base {
            Some(base) if base == self.num_blocks => self.statements.push(statement),
            _ => self.globals.push(statement),
        }
        self
    }

    /// Redirect every append made by `body` to the hoisted outer sequence.
    ///
    /// Hoisted statements are rendered before the first top-level statement,
    /// in the order they were appended, however deeply `body` is nested.
    /// Sections may nest, including inside blocks opened by another section.
    pub fn global_section<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let outermost = match self.hoist_base {
            Some(base) if base == self.num_blocks => return body(self),
            Some(_) => false,
            None => true,
        };

        let current = if outermost {
            let globals = mem::take(&mut self.globals);
            self.hoist_base = Some(self.num_blocks);
            mem::replace(&mut self.statements, globals)
        } else {
            mem::take(&mut self.statements)
        };
        let mut guard = HoistGuard {
            builder: self,
            current: Some(current),
            outermost,
        };
        body(&mut *guard.builder)
    }

    /// Move statements hoisted from inside a global section's blocks into
    /// the section once control is back at its base depth.
    fn flush_hoisted(&mut self) {
        if self.hoist_base == Some(self.num_blocks) {
            let pending = mem::take(&mut self.globals);
            self.statements.extend(pending);
        }
    }

    fn push(&mut self, statement: Statement) -> &mut Self {
        self.statements.push(statement);
        self
    }

    // =========================================================================
    // Names and capacity
    // =========================================================================

    /// Allocate a fresh name `"<base_name><n>"`.
    ///
    /// Suffixes start at 1 and increase for every call with the same base.
    pub fn var(&mut self, base_name: &str) -> Node {
        let counter = self.names.entry(base_name.to_string()).or_insert(0);
        *counter += 1;
        Node::code(format!("{base_name}{counter}"))
    }

    /// Allocate a fresh name and append `name = initializer`.
    pub fn var_with(&mut self, base_name: &str, initializer: impl Into<Node>) -> Node {
        let name = self.var(base_name);
        self.append(name.assign(initializer));
        name
    }

    /// Whether `num_blocks` more nested blocks can be opened.
    pub fn has_available_blocks(&self, num_blocks: usize) -> bool {
        (self.num_blocks - 1)
            .checked_add(num_blocks)
            .is_some_and(|open| open <= self.options.max_nested_blocks)
    }

    /// The number of blocks currently open, counting the module body.
    pub fn current_num_blocks(&self) -> usize {
        self.num_blocks
    }

    // =========================================================================
    // Conditionals and loops
    // =========================================================================

    /// `if condition:`
    pub fn if_<T>(
        &mut self,
        condition: impl Into<Node>,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let header = keyword_header("if ", condition.into());
        self.control_block(ConstructKind::If, header, body)
    }

    /// `if not (condition):`
    pub fn if_not<T>(
        &mut self,
        condition: impl Into<Node>,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let header = keyword_header("if ", negated(condition.into()));
        self.control_block(ConstructKind::If, header, body)
    }

    /// `elif condition:`; must follow an `if` or `elif` block.
    pub fn elif<T>(
        &mut self,
        condition: impl Into<Node>,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.expect_previous(ConstructKind::Elif)?;
        let header = keyword_header("elif ", condition.into());
        self.control_block(ConstructKind::Elif, header, body)
    }

    /// `elif not (condition):`; must follow an `if` or `elif` block.
    pub fn elif_not<T>(
        &mut self,
        condition: impl Into<Node>,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.expect_previous(ConstructKind::Elif)?;
        let header = keyword_header("elif ", negated(condition.into()));
        self.control_block(ConstructKind::Elif, header, body)
    }

    /// `else:` after an `if`, `elif`, `while`, `for` or `except` block.
    pub fn else_<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let kind = match self.expect_previous(ConstructKind::Else)? {
            ConstructKind::Except => ConstructKind::TryElse,
            _ => ConstructKind::Else,
        };
        self.control_block(kind, Node::code("else"), body)
    }

    /// `while condition:`
    pub fn while_<T>(
        &mut self,
        condition: impl Into<Node>,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let header = keyword_header("while ", condition.into());
        self.control_block(ConstructKind::While, header, body)
    }

    /// `while True:`
    pub fn loop_<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.while_(true, body)
    }

    /// `while True:` whose body runs once and then breaks.
    ///
    /// Lets generated code leave a sequence of steps early with `break`.
    pub fn breakable<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.loop_(|b| {
            let result = body(b)?;
            b.break_();
            Ok(result)
        })
    }

    /// `for target in iterable:`
    pub fn for_<T>(
        &mut self,
        target: impl Into<Node>,
        iterable: impl Into<Node>,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let header = Node::concat([
            Node::code("for "),
            target.into(),
            Node::code(" in "),
            iterable.into(),
        ]);
        self.control_block(ConstructKind::For, header, body)
    }

    /// `with context:` or `with context as name:`
    pub fn with<T>(
        &mut self,
        context: impl Into<Node>,
        name: Option<&str>,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let mut parts = vec![Node::code("with "), context.into()];
        if let Some(name) = name {
            parts.push(Node::code(format!(" as {name}")));
        }
        self.control_block(ConstructKind::With, Node::concat(parts), body)
    }

    // =========================================================================
    // Exception handling
    // =========================================================================

    /// `try:`
    pub fn try_<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.control_block(ConstructKind::Try, Node::code("try"), body)
    }

    /// `except:`, `except Type:` or `except Type as name:`.
    ///
    /// Must follow a `try` block or an `except` that names a type. Binding a name without a type
    /// is rejected.
    pub fn except<T>(
        &mut self,
        exception: Option<Node>,
        name: Option<&str>,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let mut parts = vec![Node::code("except")];
        match (exception, name) {
            (None, Some(name)) => {
                return Err(Error::invalid_argument(format!(
                    "`except` binds `{name}` but names no exception type"
                )));
            }
            (None, None) => {}
            (Some(exception), name) => {
                parts.push(Node::code(" "));
                parts.push(exception);
                if let Some(name) = name {
                    parts.push(Node::code(format!(" as {name}")));
                }
            }
        }
        self.expect_previous(ConstructKind::Except)?;
        self.control_block(ConstructKind::Except, Node::concat(parts), body)
    }

    /// `finally:` after a `try`, `except` or `else` clause of a `try` block.
    pub fn finally<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.expect_previous(ConstructKind::Finally)?;
        self.control_block(ConstructKind::Finally, Node::code("finally"), body)
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    /// `def name(params...):`
    pub fn def<T, I, S>(
        &mut self,
        name: &str,
        params: I,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let params: Vec<String> = params.into_iter().map(|p| p.as_ref().to_string()).collect();
        let header = Node::code(format!("def {name}({})", params.join(", ")));
        self.control_block(ConstructKind::Def, header, body)
    }

    /// `class name:`
    pub fn class<T>(&mut self, name: &str, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.control_block(ConstructKind::Class, Node::code(format!("class {name}")), body)
    }

    /// `class name(bases...):`
    pub fn class_with_bases<T, I, A>(
        &mut self,
        name: &str,
        bases: I,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T>
    where
        I: IntoIterator<Item = A>,
        A: Into<Node>,
    {
        let header = Node::code(format!("class {name}")).call(bases);
        self.control_block(ConstructKind::Class, header, body)
    }

    // =========================================================================
    // Simple statements
    // =========================================================================

    /// `return value`
    pub fn return_(&mut self, value: impl Into<Node>) -> &mut Self {
        self.append(keyword_header("return ", value.into()))
    }

    /// `return`
    pub fn return_none(&mut self) -> &mut Self {
        self.append(Node::code("return"))
    }

    /// `yield value`
    pub fn yield_(&mut self, value: impl Into<Node>) -> &mut Self {
        self.append(keyword_header("yield ", value.into()))
    }

    /// `raise exception`
    pub fn raise(&mut self, exception: impl Into<Node>) -> &mut Self {
        self.append(keyword_header("raise ", exception.into()))
    }

    /// `raise`, re-raising the active exception.
    pub fn raise_bare(&mut self) -> &mut Self {
        self.append(Node::code("raise"))
    }

    /// `assert condition`
    pub fn assert(&mut self, condition: impl Into<Node>) -> &mut Self {
        self.append(keyword_header("assert ", condition.into()))
    }

    /// `assert condition, message`
    pub fn assert_with_message(
        &mut self,
        condition: impl Into<Node>,
        message: impl Into<Node>,
    ) -> &mut Self {
        self.append(Node::concat([
            Node::code("assert "),
            condition.into(),
            Node::code(", "),
            message.into(),
        ]))
    }

    /// `break`
    pub fn break_(&mut self) -> &mut Self {
        self.append(Node::code("break"))
    }

    /// `continue`
    pub fn continue_(&mut self) -> &mut Self {
        self.append(Node::code("continue"))
    }

    /// `pass`
    pub fn pass(&mut self) -> &mut Self {
        self.append(Node::code("pass"))
    }

    // =========================================================================
    // Comments and layout
    // =========================================================================

    /// Append `# ...` lines, one per line of `text`.
    pub fn add_comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Statement::Comment(text.into()))
    }

    /// Append a `"""` docstring holding `text`.
    pub fn add_docstring(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Statement::Docstring(text.into()))
    }

    /// Append an empty line.
    pub fn add_newline(&mut self) -> &mut Self {
        self.push(Statement::Blank)
    }

    // =========================================================================
    // Scope management
    // =========================================================================

    fn control_block<T>(
        &mut self,
        kind: ConstructKind,
        header: Node,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if !self.has_available_blocks(1) {
            return Err(Error::BlockLimitExceeded {
                max: self.options.max_nested_blocks,
            });
        }

        let (statements, result) = self.new_block(body);
        self.flush_hoisted();
        self.push(Statement::Construct(Construct::new(
            kind,
            header,
            Block::new(statements),
        )));
        result
    }

    /// Run `body` against a fresh buffer, returning what it appended.
    fn new_block<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> (Vec<Statement>, Result<T>) {
        let prev = mem::take(&mut self.statements);
        self.num_blocks += 1;
        let mut guard = BlockGuard {
            builder: self,
            prev: Some(prev),
        };
        let result = body(&mut *guard.builder);
        (guard.restore(), result)
    }

    /// Check that `clause` may continue the last construct in the current
    /// buffer, returning that construct's kind.
    fn expect_previous(&self, clause: ConstructKind) -> Result<ConstructKind> {
        let (allowed, expected): (&[ConstructKind], &'static str) = match clause {
            ConstructKind::Elif => (
                &[ConstructKind::If, ConstructKind::Elif],
                "an `if` or `elif` block",
            ),
            ConstructKind::Else => (
                &[
                    ConstructKind::If,
                    ConstructKind::Elif,
                    ConstructKind::While,
                    ConstructKind::For,
                    ConstructKind::Except,
                ],
                "an `if`, `elif`, `while`, `for` or `except` block",
            ),
            ConstructKind::Except => (
                &[ConstructKind::Try, ConstructKind::Except],
                "a `try` block or an `except` block that names a type",
            ),
            ConstructKind::Finally => (
                &[
                    ConstructKind::Try,
                    ConstructKind::Except,
                    ConstructKind::TryElse,
                ],
                "a `try`, `except` or `else` block of a `try` statement",
            ),
            _ => return Ok(clause),
        };

        let previous = self
            .statements
            .iter()
            .rev()
            .find(|statement| !statement.is_trivia());
        match previous {
            // A bare `except:` has to be the last handler.
            Some(Statement::Construct(construct))
                if clause == ConstructKind::Except && construct.is_bare_except() =>
            {
                Err(Error::InvalidStructure {
                    clause: clause.keyword(),
                    expected,
                })
            }
            Some(Statement::Construct(construct)) if allowed.contains(&construct.kind()) => {
                Ok(construct.kind())
            }
            _ => Err(Error::InvalidStructure {
                clause: clause.keyword(),
                expected,
            }),
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Restores the enclosing buffer when a block body finishes or unwinds.
struct BlockGuard<'a> {
    builder: &'a mut Builder,
    prev: Option<Vec<Statement>>,
}

impl BlockGuard<'_> {
    fn restore(&mut self) -> Vec<Statement> {
        let prev = self.prev.take().unwrap_or_default();
        self.builder.num_blocks -= 1;
        mem::replace(&mut self.builder.statements, prev)
    }
}

impl Drop for BlockGuard<'_> {
    fn drop(&mut self) {
        if self.prev.is_some() {
            self.restore();
        }
    }
}

/// Swaps the hoisted sequence back out when a global section ends.
///
/// A section nested inside a block of another section queues what it
/// collected behind the statements still waiting to be flushed.
struct HoistGuard<'a> {
    builder: &'a mut Builder,
    current: Option<Vec<Statement>>,
    outermost: bool,
}

impl Drop for HoistGuard<'_> {
    fn drop(&mut self) {
        let Some(current) = self.current.take() else {
            return;
        };
        let builder = &mut *self.builder;
        let mut hoisted = mem::replace(&mut builder.statements, current);
        if self.outermost {
            hoisted.append(&mut builder.globals);
            builder.globals = hoisted;
            builder.hoist_base = None;
        } else {
            builder.globals.append(&mut hoisted);
        }
    }
}

fn keyword_header(keyword: &'static str, expr: Node) -> Node {
    Node::concat([Node::code(keyword), expr])
}

fn negated(condition: Node) -> Node {
    Node::concat([Node::code("not ("), condition, Node::code(")")])
}
