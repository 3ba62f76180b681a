//! Data file loading and Python module rendering.

use std::{fmt, path::Path, str::FromStr};

use eyre::{Context, Result, bail};
use outsource_codegen::{Builder, Node, Options, code};

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Toml => "toml",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            _ => Err(format!("unknown format '{}', expected 'json' or 'toml'", s)),
        }
    }
}

/// Read and parse a data file into an expression tree.
pub fn load(path: &Path, format: Format) -> Result<Node> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    parse(&content, format).wrap_err_with(|| format!("Failed to parse {}", path.display()))
}

/// Parse data text into an expression tree.
pub fn parse(content: &str, format: Format) -> Result<Node> {
    let node = match format {
        Format::Json => Node::from(serde_json::from_str::<serde_json::Value>(content)?),
        Format::Toml => toml_to_node(toml::Value::Table(toml::from_str(content)?)),
    };
    Ok(node)
}

fn toml_to_node(value: toml::Value) -> Node {
    match value {
        toml::Value::String(s) => s.into(),
        toml::Value::Integer(i) => i.into(),
        toml::Value::Float(f) => f.into(),
        toml::Value::Boolean(b) => b.into(),
        toml::Value::Datetime(dt) => dt.to_string().into(),
        toml::Value::Array(items) => Node::list(items.into_iter().map(toml_to_node)),
        toml::Value::Table(table) => {
            Node::dict(table.into_iter().map(|(k, v)| (Node::from(k), toml_to_node(v))))
        }
    }
}

/// Whether `name` can be bound at module level.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !is_keyword(name)
}

fn is_keyword(name: &str) -> bool {
    const KEYWORDS: &[&str] = &[
        "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
        "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
        "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise",
        "return", "try", "while", "with", "yield",
    ];
    KEYWORDS.contains(&name)
}

/// Render a module binding `name` to `data`.
pub fn render(name: &str, data: Node, docstring: Option<&str>, options: Options) -> Result<String> {
    if !is_identifier(name) {
        bail!("`{name}` is not a valid Python identifier");
    }

    let mut b = Builder::with_options(options);
    if let Some(doc) = docstring {
        b.add_docstring(doc);
        b.add_newline();
    }
    b.add_comment("Generated by outsource. Do not edit.");
    b.append(code("__all__").assign(vec![name]));
    b.add_newline();
    b.append(code(name).assign(data));

    Ok(b.write_source())
}

#[cfg(test)]
mod tests {
    use outsource_codegen::Indent;

    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/b.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("b.toml")), Some(Format::Toml));
        assert_eq!(Format::from_path(Path::new("b.yaml")), None);
        assert_eq!(Format::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(Format::from_str("JSON").unwrap(), Format::Json);
        assert_eq!(Format::from_str("toml").unwrap(), Format::Toml);
        assert!(Format::from_str("yaml").is_err());
        assert_eq!(Format::Toml.to_string(), "toml");
    }

    #[test]
    fn test_parse_json_keeps_key_order() {
        let node = parse(r#"{"zeta": 1, "alpha": [true, null, 1.5]}"#, Format::Json).unwrap();
        assert_eq!(node.to_source(), "{'zeta': 1, 'alpha': [True, None, 1.5]}");
    }

    #[test]
    fn test_parse_toml() {
        let content = r#"
name = "demo"
released = 1979-05-27T07:32:00Z

[server]
port = 8080
hosts = ["a", "b"]
"#;
        let node = parse(content, Format::Toml).unwrap();
        assert_eq!(
            node.to_source(),
            "{'name': 'demo', 'released': '1979-05-27T07:32:00Z', 'server': {'port': 8080, 'hosts': ['a', 'b']}}"
        );
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse("{", Format::Json).is_err());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("SETTINGS"));
        assert!(is_identifier("_private2"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("with-dash"));
        assert!(!is_identifier("class"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_render_module() {
        let data = parse(r#"{"debug": false, "tags": ["x"]}"#, Format::Json).unwrap();
        let source = render("SETTINGS", data, Some("App settings."), Options::default()).unwrap();
        assert_eq!(
            source,
            "\"\"\"\nApp settings.\n\"\"\"\n\n# Generated by outsource. Do not edit.\n__all__ = ['SETTINGS']\n\nSETTINGS = {'debug': False, 'tags': ['x']}\n"
        );
    }

    #[test]
    fn test_render_uses_options() {
        let options = Options::default().with_indent(Indent::Tab);
        let source = render("X", Node::from(1), Some("a\nb"), options).unwrap();
        assert!(source.starts_with("\"\"\"\na\nb\n\"\"\"\n"));
    }

    #[test]
    fn test_render_rejects_bad_name() {
        assert!(render("not valid", Node::from(1), None, Options::default()).is_err());
    }
}
