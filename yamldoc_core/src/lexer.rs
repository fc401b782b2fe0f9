use std::ops::Range;

use logos::Logos;

use crate::tag::AnnotationError;
use crate::tag::Attribute;

/// Raw tokens produced by logos for a field annotation such as
/// `comment:"The name" default:abc`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
	#[regex(r"[ \t\r\n]+")]
	Whitespace,
	#[token(":")]
	Colon,
	#[regex(r#""([^"\\]|\\.)*""#)]
	DoubleQuotedString,
	#[regex(r"'([^'\\]|\\.)*'")]
	SingleQuotedString,
	#[regex(r#"[^ \t\r\n:"']+"#)]
	Word,
}

/// Walks the logos token stream as a `key:value` scanning automaton,
/// collecting every attribute in source order.
///
/// A quote only opens a quoted value at the start of a value. An unquoted
/// value is cut from the source up to the next whitespace and the rest of
/// the annotation is lexed again from there.
struct TagWalker<'a> {
	/// The raw annotation text.
	source: &'a str,
	/// The raw tokens still to walk and their byte spans in `source`.
	raw_tokens: Vec<(Result<RawToken, ()>, Range<usize>)>,
	/// Current index into `raw_tokens`.
	cursor: usize,
	/// Attributes found so far.
	attributes: Vec<Attribute>,
}

impl<'a> TagWalker<'a> {
	fn new(source: &'a str) -> Self {
		let mut walker = Self {
			source,
			raw_tokens: vec![],
			cursor: 0,
			attributes: vec![],
		};
		walker.lex_from(0);
		walker
	}

	fn lex_from(&mut self, offset: usize) {
		self.raw_tokens = RawToken::lexer(&self.source[offset..])
			.spanned()
			.map(|(result, span)| (result, span.start + offset..span.end + offset))
			.collect();
		self.cursor = 0;
	}

	/// The next token. The only input logos cannot tokenize is a quote that
	/// never closes.
	fn peek(&self) -> Result<Option<(RawToken, Range<usize>)>, AnnotationError> {
		match self.raw_tokens.get(self.cursor) {
			None => Ok(None),
			Some((Ok(token), span)) => Ok(Some((*token, span.clone()))),
			Some((Err(()), span)) => Err(AnnotationError::UnterminatedQuote { offset: span.start }),
		}
	}

	fn advance(&mut self) {
		self.cursor += 1;
	}

	fn skip_whitespace(&mut self) -> Result<(), AnnotationError> {
		while let Some((RawToken::Whitespace, _)) = self.peek()? {
			self.advance();
		}

		Ok(())
	}

	fn process(&mut self) -> Result<(), AnnotationError> {
		loop {
			self.skip_whitespace()?;

			let Some((token, span)) = self.peek()? else {
				return Ok(());
			};

			let key = match token {
				RawToken::Word => self.source[span.clone()].to_string(),
				RawToken::Colon => return Err(AnnotationError::MissingKey { offset: span.start }),
				RawToken::DoubleQuotedString | RawToken::SingleQuotedString => {
					return Err(AnnotationError::UnexpectedValue { offset: span.start });
				}
				RawToken::Whitespace => unreachable!("whitespace is skipped before reading a key"),
			};
			self.advance();

			match self.peek()? {
				Some((RawToken::Colon, _)) => self.advance(),
				Some((_, span)) => {
					return Err(AnnotationError::MissingColon {
						key,
						offset: span.start,
					});
				}
				None => {
					return Err(AnnotationError::MissingColon {
						key,
						offset: self.source.len(),
					});
				}
			}

			self.skip_whitespace()?;
			let value = self.read_value()?;
			self.attributes.push(Attribute { key, value });
		}
	}

	/// Read a quoted value (escapes resolved) or an unquoted value running to
	/// the next whitespace.
	fn read_value(&mut self) -> Result<String, AnnotationError> {
		let Some((token, span)) = self.peek()? else {
			return Ok(String::new());
		};

		let value = match token {
			RawToken::DoubleQuotedString | RawToken::SingleQuotedString => {
				self.advance();
				let slice = &self.source[span];
				unescape(&slice[1..slice.len() - 1])
			}
			RawToken::Word | RawToken::Colon => {
				let rest = &self.source[span.start..];
				let len = rest
					.find([' ', '\t', '\r', '\n'])
					.unwrap_or(rest.len());
				let end = span.start + len;
				self.lex_from(end);
				self.source[span.start..end].to_string()
			}
			RawToken::Whitespace => String::new(),
		};

		Ok(value)
	}
}

/// Resolve the backslash escapes supported inside quoted annotation values.
/// Unknown escapes are kept verbatim.
fn unescape(inner: &str) -> String {
	if !inner.contains('\\') {
		return inner.to_string();
	}

	let mut result = String::with_capacity(inner.len());
	let mut chars = inner.chars();

	while let Some(ch) = chars.next() {
		if ch != '\\' {
			result.push(ch);
			continue;
		}

		match chars.next() {
			Some('n') => result.push('\n'),
			Some('r') => result.push('\r'),
			Some('t') => result.push('\t'),
			Some(escaped @ ('"' | '\'' | '\\')) => result.push(escaped),
			Some(other) => {
				result.push('\\');
				result.push(other);
			}
			None => result.push('\\'),
		}
	}

	result
}

/// Tokenize an annotation string into its attributes.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Attribute>, AnnotationError> {
	let mut walker = TagWalker::new(source);
	walker.process()?;
	Ok(walker.attributes)
}
