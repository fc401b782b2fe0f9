use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum YamlDocError {
	#[error(transparent)]
	#[diagnostic(code(yamldoc::io_error))]
	Io(#[from] std::io::Error),

	#[error("cannot render {kind} value at `{path}`")]
	#[diagnostic(
		code(yamldoc::unsupported_value),
		help("only strings, booleans, numbers, sequences, mappings and records can be rendered")
	)]
	UnsupportedValue { path: String, kind: String },

	#[error("malformed annotation on field `{field}`: {reason}")]
	#[diagnostic(
		code(yamldoc::malformed_annotation),
		help(
			"annotations use `key:\"value\"` pairs separated by whitespace, e.g. `comment:\"The \
			 name\" default:\"abc\"`"
		)
	)]
	MalformedAnnotation { field: String, reason: String },

	#[error("failed to parse options file: {0}")]
	#[diagnostic(
		code(yamldoc::options_parse),
		help("check that yamldoc.toml is valid TOML with `wrap_width`, `indent`, `blank_lines` or `strict_annotations`")
	)]
	OptionsParse(String),
}

pub type YamlDocResult<T> = Result<T, YamlDocError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
