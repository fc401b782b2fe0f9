/// The marker written before every comment line.
pub const COMMENT_MARKER: &str = "# ";

/// Default maximum width of a comment line, marker included.
pub const DEFAULT_WRAP_WIDTH: usize = 100;

/// Wrap doc text into `# `-prefixed comment lines of at most `width`
/// characters, the marker included.
///
/// Every explicit line of `doc` is wrapped on its own and blank lines are
/// dropped. Words are packed greedily; a word that cannot fit on a line by
/// itself is cut into width-sized pieces rather than dropped.
///
/// ```rust
/// use yamldoc_core::format_comment;
///
/// let lines = format_comment("The name of the post\ntemplate", 14);
/// assert_eq!(lines, ["# The name of", "# the post", "# template"]);
/// ```
pub fn format_comment(doc: &str, width: usize) -> Vec<String> {
	let available = width.saturating_sub(COMMENT_MARKER.len()).max(1);
	let mut lines = vec![];

	for line in doc.lines() {
		let mut current = String::new();
		let mut current_len = 0;

		for word in line.split_whitespace() {
			let word_len = word.chars().count();

			if current_len > 0 && current_len + 1 + word_len <= available {
				current.push(' ');
				current.push_str(word);
				current_len += 1 + word_len;
				continue;
			}

			if current_len > 0 {
				lines.push(comment_line(&current));
				current.clear();
				current_len = 0;
			}

			if word_len <= available {
				current.push_str(word);
				current_len = word_len;
				continue;
			}

			let chars: Vec<char> = word.chars().collect();
			let mut pieces = chars.chunks(available).peekable();
			while let Some(piece) = pieces.next() {
				let piece: String = piece.iter().collect();
				if pieces.peek().is_some() {
					lines.push(comment_line(&piece));
				} else {
					current_len = piece.chars().count();
					current = piece;
				}
			}
		}

		if current_len > 0 {
			lines.push(comment_line(&current));
		}
	}

	lines
}

fn comment_line(text: &str) -> String {
	format!("{COMMENT_MARKER}{text}")
}
