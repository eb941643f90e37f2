use crate::span::SpanHandle;

/// One key/value/comment record plus its location in the source text.
///
/// Equality compares key, value and comment only. The span belongs to the
/// text-position layer and says nothing about content.
#[derive(Debug, Clone)]
pub struct Item {
	key: String,
	value: String,
	comment: Option<String>,
	span: Option<SpanHandle>,
}

impl Item {
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			value: value.into(),
			comment: None,
			span: None,
		}
	}

	/// Empty stand-in for a key that no longer exists.
	///
	/// Only ever carried inside change notifications, never stored in a
	/// live [`crate::Structure`].
	pub fn placeholder(key: impl Into<String>) -> Self {
		Self::new(key, String::new())
	}

	pub fn with_comment(mut self, comment: impl Into<Option<String>>) -> Self {
		self.comment = comment.into();
		self
	}

	pub fn with_span(mut self, span: impl Into<Option<SpanHandle>>) -> Self {
		self.span = span.into();
		self
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn value(&self) -> &str {
		&self.value
	}

	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	pub fn span(&self) -> Option<&SpanHandle> {
		self.span.as_ref()
	}

	pub(crate) fn set_key(&mut self, key: String) {
		self.key = key;
	}

	pub(crate) fn set_value(&mut self, value: String) {
		self.value = value;
	}

	pub(crate) fn set_comment(&mut self, comment: Option<String>) {
		self.comment = comment;
	}

	/// Canonical text for this item: comment lines, then `key=value`.
	///
	/// Every comment line is prefixed with `#` unless it already starts with a
	/// comment marker. Separators and whitespace in keys and line breaks in
	/// values are backslash-escaped. The result always ends with a newline.
	pub fn render(&self) -> String {
		let mut out = String::new();
		if let Some(comment) = &self.comment {
			for line in comment.lines() {
				let trimmed = line.trim_start();
				if !(trimmed.starts_with('#') || trimmed.starts_with('!')) {
					out.push_str("# ");
				}
				out.push_str(line);
				out.push('\n');
			}
		}
		escape_into(&mut out, &self.key, true);
		out.push('=');
		escape_into(&mut out, &self.value, false);
		out.push('\n');
		out
	}
}

fn escape_into(out: &mut String, text: &str, is_key: bool) {
	for ch in text.chars() {
		match ch {
			'\\' => out.push_str("\\\\"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			'=' | ':' | ' ' | '#' | '!' if is_key => {
				out.push('\\');
				out.push(ch);
			}
			_ => out.push(ch),
		}
	}
}

impl PartialEq for Item {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key && self.value == other.value && self.comment == other.comment
	}
}

impl Eq for Item {}
