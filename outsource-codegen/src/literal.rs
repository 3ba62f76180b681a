//! Scalar literals and their canonical Python representation.

use std::fmt::Write as _;

use crate::writer::{Render, Writer};

/// A scalar value embedded in an expression.
///
/// Rendering follows Python's `repr` so the emitted text reads back as an
/// equal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `None`.
    None,
    /// `True` / `False`.
    Bool(bool),
    /// Integer of any width Python can hold in 128 bits.
    Int(i128),
    /// Floating point value.
    Float(f64),
    /// Quoted string.
    Str(String),
}

impl Literal {
    /// Render this literal to a string.
    pub fn repr(&self) -> String {
        match self {
            Literal::None => "None".to_string(),
            Literal::Bool(true) => "True".to_string(),
            Literal::Bool(false) => "False".to_string(),
            Literal::Int(v) => v.to_string(),
            Literal::Float(v) => repr_float(*v),
            Literal::Str(v) => repr_str(v),
        }
    }
}

impl Render for Literal {
    fn render(&self, writer: &mut Writer) {
        writer.write(&self.repr());
    }
}

/// Quote a string the way Python's `repr` does.
///
/// Single quotes are preferred; double quotes are used when the text
/// contains a single quote but no double quote.
pub fn repr_str(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = u32::from(c);
                // Writing into a String cannot fail.
                let _ = match code {
                    0..=0xff => write!(out, "\\x{code:02x}"),
                    0x100..=0xffff => write!(out, "\\u{code:04x}"),
                    _ => write!(out, "\\U{code:08x}"),
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Render a float so that Python parses it back to the same value.
pub fn repr_float(value: f64) -> String {
    if value.is_nan() {
        "float('nan')".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "float('inf')".to_string()
        } else {
            "float('-inf')".to_string()
        }
    } else {
        // Debug output is the shortest round-trip form and always carries
        // a `.` or an exponent, so it never reads back as an int.
        format!("{value:?}")
    }
}
