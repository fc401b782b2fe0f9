use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::DEFAULT_WRAP_WIDTH;
use crate::YamlDocError;
use crate::YamlDocResult;

/// Supported options file locations in discovery order (highest precedence
/// first).
pub const OPTIONS_FILE_CANDIDATES: [&str; 2] = ["yamldoc.toml", ".yamldoc.toml"];

/// Options controlling how a document is rendered.
///
/// Every key is optional in the options file:
///
/// ```toml
/// wrap_width = 80
/// indent = 2
/// blank_lines = true
/// strict_annotations = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderOptions {
	/// Maximum width of a head comment line, including the `# ` marker.
	pub wrap_width: usize,
	/// Spaces per nesting level.
	pub indent: usize,
	/// Separate the entries of a mapping with a blank line. Mappings that are
	/// sequence items are always written compactly.
	pub blank_lines: bool,
	/// Fail the render when a record has a malformed annotation, a duplicate
	/// key or an invalid default, instead of degrading silently.
	pub strict_annotations: bool,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			wrap_width: DEFAULT_WRAP_WIDTH,
			indent: 2,
			blank_lines: true,
			strict_annotations: false,
		}
	}
}

impl RenderOptions {
	#[must_use]
	pub fn with_wrap_width(mut self, wrap_width: usize) -> Self {
		self.wrap_width = wrap_width;
		self
	}

	#[must_use]
	pub fn with_strict_annotations(mut self, strict: bool) -> Self {
		self.strict_annotations = strict;
		self
	}

	/// Resolve the options file path for a root directory.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		OPTIONS_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the options from the first discovered options file at `root`.
	/// Returns `None` if there is no options file.
	pub fn load(root: &Path) -> YamlDocResult<Option<Self>> {
		let Some(path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&path)?;
		let options: Self =
			toml::from_str(&content).map_err(|e| YamlDocError::OptionsParse(e.to_string()))?;
		tracing::debug!(path = %path.display(), ?options, "loaded render options");

		Ok(Some(options))
	}
}
