use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for source construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while a [`Builder`](crate::Builder) tree is being constructed.
///
/// Rendering never fails; every error here is surfaced at the call that
/// broke a precondition, and the builder should be discarded afterwards.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("`{clause}` cannot be opened here")]
    #[diagnostic(
        code(outsource::invalid_structure),
        help("`{clause}` must directly follow {expected}")
    )]
    InvalidStructure {
        clause: &'static str,
        expected: &'static str,
    },

    #[error("invalid argument: {message}")]
    #[diagnostic(code(outsource::invalid_argument))]
    InvalidArgument { message: String },

    #[error("cannot open another block: at most {max} nested blocks are allowed")]
    #[diagnostic(
        code(outsource::block_limit),
        help(
            "check `Builder::has_available_blocks` before nesting, or raise `max_nested_blocks` in the builder options"
        )
    )]
    BlockLimitExceeded { max: usize },

    #[error("failed to parse builder options")]
    #[diagnostic(code(outsource::options_parse_error))]
    Options {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an options parse error from a toml error with source context.
    pub fn options(source: toml::de::Error, src: &str, filename: &str) -> Self {
        let span = source.span().map(SourceSpan::from);
        Error::Options {
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        }
    }
}
