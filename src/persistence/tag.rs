use std::ops::Deref;

use fallible_iterator::FallibleIterator;
use rusqlite::{self, types::Value};

use crate::{
	persistence::{
		self,
		Counted,
		Result
	},
	tag::Tag
};



/// Queries over all tags.
#[derive(Clone)]
pub struct Handle {
	pub base: persistence::Handle
}



impl Handle {

	/// All tags, in alphabetical order.
	pub async fn all( &self ) -> Result<Vec<Tag>> {
		self.base.query( "SELECT id, title FROM tag ORDER BY title ASC", Vec::new(),
			|rows| rows.map(|row| tag_from_row(row)).collect()
		).await
	}

	/// The `limit` tags carried by the most posts, annotated with their post count.
	///
	/// Tags carried by equally many posts are ordered alphabetically.
	pub async fn popular( &self, limit: usize ) -> Result<Vec<Counted<Tag>>> {
		self.base.query( "SELECT t.id, t.title, COUNT(pt.post_id) AS posts FROM tag t LEFT JOIN post_tag pt ON pt.tag_id = t.id \
			GROUP BY t.id ORDER BY posts DESC, t.title ASC LIMIT ?",
			vec![Value::Integer(limit as i64)],
			|rows| rows.map(|row| {
				let posts: i64 = row.get(2)?;
				Ok( Counted::new( tag_from_row(row)?, posts as u64 ) )
			}).collect()
		).await
	}

	/// Finds the tag with exactly the given title.
	pub async fn by_title( &self, title: &str ) -> Result<Tag> {
		self.base.query_unique( "tag", title, "SELECT id, title FROM tag WHERE title = ?",
			vec![Value::Text(title.to_owned())],
			tag_from_row
		).await
	}

	/// The number of posts carrying the tag.
	pub async fn post_count( &self, tag_id: i64 ) -> Result<u64> {
		self.base.count( "SELECT COUNT(*) FROM post_tag WHERE tag_id = ?", vec![Value::Integer(tag_id)] ).await
	}
}

fn tag_from_row( row: &rusqlite::Row<'_> ) -> rusqlite::Result<Tag> {
	Ok( Tag {
		id: row.get(0)?,
		title: row.get(1)?
	})
}



impl Deref for Handle {
	type Target = persistence::Handle;

	fn deref( &self ) -> &Self::Target {
		&self.base
	}
}
