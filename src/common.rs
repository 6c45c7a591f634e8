use rusqlite::types::Value;



/// Builds the `?,?,?` list for an `IN (...)` clause with `count` parameters.
pub fn placeholders( count: usize ) -> String {
	let mut result = String::with_capacity( count * 2 );
	for i in 0..count {
		if i > 0 { result.push(',') }
		result.push('?');
	}
	result
}

/// Converts row ids into owned SQL parameters.
pub fn id_params( ids: &[i64] ) -> Vec<Value> {
	ids.iter().map(|id| Value::Integer(*id)).collect()
}

/// Returns at most the first `max_chars` characters of `text`.
/// Counts characters, not bytes, and pays no attention to word boundaries.
pub fn truncate_chars( text: &str, max_chars: usize ) -> String {
	match text.char_indices().nth( max_chars ) {
		None => text.to_owned(),
		Some((end, _)) => text[..end].to_owned()
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn placeholders_match_count() {
		assert_eq!(placeholders(0), "");
		assert_eq!(placeholders(1), "?");
		assert_eq!(placeholders(3), "?,?,?");
	}

	#[test]
	fn truncate_keeps_short_text() {
		assert_eq!(truncate_chars("short", 200), "short");
		assert_eq!(truncate_chars("", 10), "");
	}

	#[test]
	fn truncate_counts_characters() {
		let text = "привет мир";
		assert_eq!(truncate_chars(text, 6), "привет");
		assert_eq!(truncate_chars("abcdef", 3), "abc");
		assert_eq!(truncate_chars("abc", 3), "abc");
	}
}
