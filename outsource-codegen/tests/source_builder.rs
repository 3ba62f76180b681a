//! End-to-end tests for building and rendering Python source.

use outsource_codegen::{Builder, Error, Node, Options, code};

fn render(expr: impl Into<Node>) -> String {
    let mut b = Builder::new();
    b.append(expr);
    b.write_source().trim_end().to_string()
}

fn source(b: &Builder) -> String {
    b.write_source().trim_end().to_string()
}

#[test]
fn test_simple_program() {
    let (foo, bar) = (code("foo"), code("bar"));
    let mut b = Builder::new();

    b.if_((&foo + 1).lt(&bar), |b| {
        b.append(code("print").call(["ok"]));
        Ok(())
    })
    .unwrap();

    assert_eq!(source(&b), "if ((foo + 1) < bar):\n    print('ok')");
}

#[test]
fn test_simple_literals() {
    assert_eq!(render(Vec::<Node>::new()), "[]");
    assert_eq!(render(()), "()");
    assert_eq!(render(vec!["ok"]), "['ok']");
    assert_eq!(render(("ok",)), "('ok',)");
    assert_eq!(render(vec![1, 2, 3]), "[1, 2, 3]");
    assert_eq!(render((1, 2, 3)), "(1, 2, 3)");
}

#[test]
fn test_collections_with_expressions() {
    let (foo, bar) = (code("foo"), code("bar"));
    assert_eq!(
        render(vec![&foo + 1, bar.call(["ok"])]),
        "[(foo + 1), bar('ok')]"
    );
}

#[test]
fn test_reflected_comparisons_render_like_their_mirrors() {
    use outsource_codegen::BinOp;

    let foo = code("foo");
    assert_eq!(render(Node::reflected(BinOp::Gt, &foo, 19)), render(foo.lt(19)));
    assert_eq!(render(Node::reflected(BinOp::GtE, &foo, 23)), render(foo.le(23)));
    assert_eq!(render(Node::reflected(BinOp::Eq, &foo, 27)), "(foo == 27)");
}

#[test]
fn test_for_statement() {
    let (foo, bar) = (code("foo"), code("bar"));
    let mut b = Builder::new();

    b.append(bar.assign(code("baz").invoke()));
    b.for_(&foo, &bar, |b| {
        b.append(code("print").call([&foo]));
        Ok(())
    })
    .unwrap();

    assert_eq!(source(&b), "bar = baz()\nfor foo in bar:\n    print(foo)");
}

#[test]
fn test_extend_method() {
    let (fiz, buz) = (code("fiz"), code("buz"));
    let mut b = Builder::new();

    b.extend([fiz.assign("ok"), buz.assign(fiz.attr("upper").invoke())]);

    assert_eq!(source(&b), "fiz = 'ok'\nbuz = fiz.upper()");
}

#[test]
fn test_add_global_method() {
    let (fiz, baz) = (code("fiz"), code("baz"));
    let mut b = Builder::new();

    b.def("foo", ["bar", "bam"], |b| {
        let (bar, bam) = (code("bar"), code("bam"));
        b.append(fiz.assign(&bar + 1));
        b.append_global(baz.assign(100));
        b.return_(bam.lt(&baz - &fiz));
        b.append_global(code("assert baz > 50"));
        Ok(())
    })
    .unwrap();

    insta::assert_snapshot!(source(&b), @r"
baz = 100
assert baz > 50
def foo(bar, bam):
    fiz = (bar + 1)
    return (bam < (baz - fiz))
");
}

#[test]
fn test_has_available_blocks() {
    fn nest(b: &mut Builder, level: usize) -> Result<(), Error> {
        if level == 20 {
            assert!(!b.has_available_blocks(1));
            return Ok(());
        }
        assert_eq!(b.current_num_blocks(), level);
        assert!(b.has_available_blocks(1));
        b.if_(true, |b| nest(b, level + 1))
    }

    let mut b = Builder::new();
    nest(&mut b, 1).unwrap();

    assert_eq!(b.current_num_blocks(), 1);
    assert!(b.has_available_blocks(1));

    let source = b.write_source();
    let last = source.lines().last().unwrap();
    assert_eq!(last, format!("{}pass", "    ".repeat(19)));
}

#[test]
fn test_twentieth_block_is_refused() {
    fn nest(b: &mut Builder, depth: usize) -> Result<(), Error> {
        if depth == 0 {
            return Ok(());
        }
        b.while_(true, |b| nest(b, depth - 1))
    }

    let mut b = Builder::new();
    assert!(nest(&mut b, 19).is_ok());

    let mut b = Builder::new();
    let err = nest(&mut b, 20).unwrap_err();
    assert!(matches!(err, Error::BlockLimitExceeded { max: 19 }));
    assert_eq!(b.current_num_blocks(), 1);
    assert!(b.has_available_blocks(19));
    assert!(!b.has_available_blocks(20));
}

#[test]
fn test_custom_block_limit() {
    let mut b = Builder::with_options(Options::default().with_max_nested_blocks(1));
    b.if_(true, |b| {
        assert!(!b.has_available_blocks(1));
        assert!(b.if_(true, |_| Ok(())).is_err());
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_var_method() {
    let mut b = Builder::new();
    b.var_with("foo", 1);
    b.var_with("foo", 2);
    let foo = b.var("foo");
    b.append(foo.assign(3));
    b.var("bar");

    assert_eq!(source(&b), "foo1 = 1\nfoo2 = 2\nfoo3 = 3");
}

#[test]
fn test_comment_methods() {
    let mut b = Builder::new();
    b.add_docstring("This is a docstring.\nTry using \"\"\"triple quotes\"\"\"...");
    b.add_newline();
    b.class("Foo", |b| {
        b.add_docstring("This is another docstring.");
        b.add_newline();
        b.def("bar", ["self", "baz", "fiz"], |b| {
            let (fiz, baz, buz) = (code("fiz"), code("baz"), code("buz"));
            b.add_docstring("One more docstring.");
            b.append(buz.assign(123));
            b.add_comment("This is a normal comment.\nThis is a second line.");
            b.return_(fiz + baz + buz);
            Ok(())
        })
    })
    .unwrap();

    insta::assert_snapshot!(source(&b), @r#"
"""
This is a docstring.
Try using \"\"\"triple quotes\"\"\"...
"""

class Foo:
    """
    This is another docstring.
    """

    def bar(self, baz, fiz):
        """
        One more docstring.
        """
        buz = 123
        # This is a normal comment.
        # This is a second line.
        return ((fiz + baz) + buz)
"#);
}

#[test]
fn test_with_statement() {
    let mut b = Builder::new();
    b.with(code("zim").call([true]), Some("fiz"), |_| Ok(()))
        .unwrap();
    assert_eq!(source(&b), "with zim(True) as fiz:\n    pass");

    let mut b = Builder::new();
    b.with(code("lock"), None, |b| {
        b.pass();
        Ok(())
    })
    .unwrap();
    assert_eq!(source(&b), "with lock:\n    pass");
}

#[test]
fn test_if_elif_else_inside_while() {
    let (zim, zam, zom) = (code("zim"), code("zam"), code("zom"));
    let mut b = Builder::new();

    b.while_(zim.invoke().gt(0), |b| {
        b.if_(zam.call([1, 2, 3]).equals("ok"), |b| {
            b.assert(code("something").equals(code("value")));
            b.append(zom.call(["hi"]));
            Ok(())
        })?;
        b.elif(zam.call([4, 5, 6]).equals("fine"), |b| {
            b.append(zom.call(["well"]));
            Ok(())
        })?;
        b.else_(|b| {
            b.append(zom.call(["bye"]));
            Ok(())
        })
    })
    .unwrap();

    insta::assert_snapshot!(source(&b), @r"
while (zim() > 0):
    if (zam(1, 2, 3) == 'ok'):
        assert (something == value)
        zom('hi')
    elif (zam(4, 5, 6) == 'fine'):
        zom('well')
    else:
        zom('bye')
");
}

#[test]
fn test_negated_conditions_and_yield() {
    let (zim, zam, zom) = (code("zim"), code("zam"), code("zom"));
    let mut b = Builder::new();

    b.for_(&zim, vec![1, 2, 3], |b| {
        b.if_not(zam.call(["ok"]), |b| {
            b.if_(zom.call(["so"]), |b| {
                b.yield_("waiting");
                Ok(())
            })
        })?;
        b.elif_not(zam.call(["fine"]), |b| {
            b.while_(zom.call(["continue"]), |b| {
                b.yield_("running");
                Ok(())
            })
        })
    })
    .unwrap();

    insta::assert_snapshot!(source(&b), @r"
for zim in [1, 2, 3]:
    if not (zam('ok')):
        if zom('so'):
            yield 'waiting'
    elif not (zam('fine')):
        while zom('continue'):
            yield 'running'
");
}

#[test]
fn test_exception_handling() {
    let (zim, zam) = (code("zim"), code("zam"));
    let (foo, bar) = (code("Foo"), code("Bar"));
    let mut b = Builder::new();

    b.try_(|b| {
        b.raise(foo.call(["fail"]));
        Ok(())
    })
    .unwrap();
    b.except(Some((&foo, &bar).into()), Some("exc"), |b| {
        b.append(zim.call([1, 2, 3]));
        Ok(())
    })
    .unwrap();
    b.finally(|b| {
        b.return_(zam.call([true]));
        Ok(())
    })
    .unwrap();

    insta::assert_snapshot!(source(&b), @r"
try:
    raise Foo('fail')
except (Foo, Bar) as exc:
    zim(1, 2, 3)
finally:
    return zam(True)
");
}

#[test]
fn test_except_without_type_but_with_name() {
    let mut b = Builder::new();
    b.try_(|b| {
        b.pass();
        Ok(())
    })
    .unwrap();
    let err = b.except(None, Some("foo"), |_| Ok(())).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_global_section() {
    let mut b = Builder::new();

    b.def("foo", ["bar", "baz"], |b| {
        b.if_(code("fiz"), |b| {
            b.global_section(|b| {
                b.append(code("bam").assign(100));
                Ok(())
            })?;
            b.append(code("zim").call([1, 2, 3]));
            Ok(())
        })?;
        b.else_(|b| {
            b.global_section(|b| {
                b.append(code("buz").assign(200));
                Ok(())
            })?;
            b.append(code("zam").call([4, 5, 6]));
            Ok(())
        })
    })
    .unwrap();

    insta::assert_snapshot!(source(&b), @r"
bam = 100
buz = 200
def foo(bar, baz):
    if fiz:
        zim(1, 2, 3)
    else:
        zam(4, 5, 6)
");
}

#[test]
fn test_hoisted_helper_definition() {
    let mut b = Builder::new();
    b.def("main", Vec::<&str>::new(), |b| {
        let helper = b.global_section(|b| {
            let name = b.var("helper");
            b.def(&name.to_source(), ["x"], |b| {
                b.return_(code("x") * 2);
                Ok(())
            })?;
            Ok(name)
        })?;
        b.return_(helper.call([21]));
        Ok(())
    })
    .unwrap();

    assert_eq!(
        source(&b),
        "def helper1(x):\n    return (x * 2)\ndef main():\n    return helper1(21)"
    );
}

#[test]
fn test_yield_expression() {
    let expr = code("foo").assign(Node::yield_(code("bar").call([1, 2, 3])));
    assert_eq!(render(expr), "foo = (yield bar(1, 2, 3))");
}

#[test]
fn test_unpacking_assignment() {
    let (zim, zam, zoom) = (code("zim"), code("zam"), code("zoom"));
    assert_eq!(
        render(Node::from((&zim, &zam)).assign(zoom.invoke())),
        "(zim, zam) = zoom()"
    );
    assert_eq!(
        render(Node::list([&zim, &zam]).assign(zoom.index(0))),
        "[zim, zam] = zoom[0]"
    );
}
