use std::ops::Deref;

use fallible_iterator::FallibleIterator;
use rusqlite::types::Value;

use crate::{
	persistence::{
		self,
		get_timestamp,
		Result
	},
	post::Comment,
	user::User
};



/// Queries over all comments.
#[derive(Clone)]
pub struct Handle {
	pub base: persistence::Handle
}



impl Handle {

	/// The comments written under a post, oldest first, each with its author.
	pub async fn of_post( &self, post_id: i64 ) -> Result<Vec<Comment>> {
		self.base.query( "SELECT c.id, c.post_id, p.title, u.id, u.username, u.is_staff, c.text, c.published_at \
			FROM comment c INNER JOIN post p ON p.id = c.post_id INNER JOIN user u ON u.id = c.author_id \
			WHERE c.post_id = ? ORDER BY c.published_at ASC, c.id ASC",
			vec![Value::Integer(post_id)],
			|rows| rows.map(|row| Ok( Comment {
				id: row.get(0)?,
				post_id: row.get(1)?,
				post_title: row.get(2)?,
				author: User {
					id: row.get(3)?,
					username: row.get(4)?,
					is_staff: row.get(5)?
				},
				text: row.get(6)?,
				published_at: get_timestamp( row, 7 )?
			})).collect()
		).await
	}

	/// The number of comments written under a post.
	pub async fn count_of( &self, post_id: i64 ) -> Result<u64> {
		self.base.count( "SELECT COUNT(*) FROM comment WHERE post_id = ?", vec![Value::Integer(post_id)] ).await
	}
}



impl Deref for Handle {
	type Target = persistence::Handle;

	fn deref( &self ) -> &Self::Target {
		&self.base
	}
}
