use serde::Serialize;

use std::fmt;

use crate::persistence::{Error, Result};



/// The maximum length of a tag title, in characters.
pub const MAX_TITLE_LENGTH: usize = 20;



#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
	pub id: i64,
	/// Always lowercase and unique among all tags.
	pub title: String
}



impl Tag {

	/// The path under which the posts carrying this tag are listed.
	pub fn url( &self ) -> String {
		format!("/tag/{}", self.title)
	}
}

impl fmt::Display for Tag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.title)
	}
}

/// Validates a tag title entered by an author and returns the form it has to be stored in.
///
/// Titles are stored in lowercase, so `"Python"` becomes `"python"`.
pub fn clean_title( title: &str ) -> Result<String> {
	let title = title.trim().to_lowercase();
	let length = title.chars().count();
	if length == 0 || length > MAX_TITLE_LENGTH {
		return Err( Error::InvalidTagTitle( title ) )
	}

	Ok( title )
}
