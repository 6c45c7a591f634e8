use std::{
	collections::HashMap,
	ops::Deref
};

use chrono::{TimeZone, Utc};
use fallible_iterator::FallibleIterator;
use rusqlite::{self, types::Value};

use crate::{
	common::{id_params, placeholders},
	persistence::{
		self,
		get_timestamp,
		Counted,
		Result
	},
	post::Post,
	tag::Tag,
	user::User
};



/// Columns selected for every post, together with its author.
const POST_COLUMNS: &str = "p.id, p.title, p.text, p.slug, p.image, p.published_at, u.id, u.username, u.is_staff";
const POST_TABLES: &str = "post p INNER JOIN user u ON u.id = p.author_id";
/// Newest first. The id keeps posts published in the same second in a fixed order.
const POST_ORDER: &str = "p.published_at DESC, p.id DESC";



/// Queries over all posts.
#[derive(Clone)]
pub struct Handle {
	pub base: persistence::Handle
}



impl Handle {

	/// The posts published in the given calendar year (UTC), oldest first.
	///
	/// Years that chrono cannot represent have no posts.
	pub async fn in_year( &self, year: i32 ) -> Result<Vec<Post>> {
		let start = Utc.with_ymd_and_hms( year, 1, 1, 0, 0, 0 ).single();
		let end = year.checked_add(1).and_then(|next| Utc.with_ymd_and_hms( next, 1, 1, 0, 0, 0 ).single());
		let (start, end) = match (start, end) {
			(Some(s), Some(e)) => (s.timestamp(), e.timestamp()),
			_ => return Ok( Vec::new() )
		};

		let sql = format!("SELECT {} FROM {} WHERE p.published_at >= ? AND p.published_at < ? ORDER BY p.published_at ASC, p.id ASC",
			POST_COLUMNS, POST_TABLES);
		self.base.query( sql, vec![Value::Integer(start), Value::Integer(end)],
			|rows| rows.map(|row| post_from_row(row)).collect()
		).await
	}

	/// The `limit` posts with the most likes, annotated with their like count.
	///
	/// Posts with the same number of likes keep the default post order.
	pub async fn popular( &self, limit: usize ) -> Result<Vec<Counted<Post>>> {
		let sql = format!("SELECT {}, COUNT(l.user_id) AS likes FROM {} LEFT JOIN post_like l ON l.post_id = p.id \
			GROUP BY p.id ORDER BY likes DESC, {} LIMIT ?",
			POST_COLUMNS, POST_TABLES, POST_ORDER);

		self.base.query( sql, vec![Value::Integer(limit as i64)],
			|rows| rows.map(|row| {
				let likes: i64 = row.get(9)?;
				Ok( Counted::new( post_from_row(row)?, likes as u64 ) )
			}).collect()
		).await
	}

	/// The `limit` most recently published posts, annotated with their comment count.
	pub async fn fresh( &self, limit: usize ) -> Result<Vec<Counted<Post>>> {
		let sql = format!("SELECT {} FROM {} ORDER BY {} LIMIT ?", POST_COLUMNS, POST_TABLES, POST_ORDER);
		let posts: Vec<Post> = self.base.query( sql, vec![Value::Integer(limit as i64)],
			|rows| rows.map(|row| post_from_row(row)).collect()
		).await?;

		let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
		let counts = self.comment_counts( &ids ).await?;

		Ok( posts.into_iter().map(|post| {
			let count = counts.get( &post.id ).copied().unwrap_or(0);
			Counted::new( post, count )
		}).collect() )
	}

	/// Finds the post with the given slug.
	pub async fn by_slug( &self, slug: &str ) -> Result<Post> {
		let sql = format!("SELECT {} FROM {} WHERE p.slug = ?", POST_COLUMNS, POST_TABLES);

		self.base.query_unique( "post", slug, sql, vec![Value::Text(slug.to_owned())], post_from_row ).await
	}

	/// Up to `limit` posts carrying the given tag, in default post order.
	pub async fn with_tag( &self, tag_id: i64, limit: usize ) -> Result<Vec<Post>> {
		let sql = format!("SELECT {} FROM {} WHERE p.id IN (SELECT post_id FROM post_tag WHERE tag_id = ?) ORDER BY {} LIMIT ?",
			POST_COLUMNS, POST_TABLES, POST_ORDER);

		self.base.query( sql, vec![Value::Integer(tag_id), Value::Integer(limit as i64)],
			|rows| rows.map(|row| post_from_row(row)).collect()
		).await
	}

	pub async fn like_count( &self, post_id: i64 ) -> Result<u64> {
		self.base.count( "SELECT COUNT(*) FROM post_like WHERE post_id = ?", vec![Value::Integer(post_id)] ).await
	}

	/// The number of comments of each of the given posts, fetched with one query.
	///
	/// Every requested id is present in the result, posts without comments map to zero.
	pub async fn comment_counts( &self, post_ids: &[i64] ) -> Result<HashMap<i64, u64>> {
		let mut counts: HashMap<i64, u64> = post_ids.iter().map(|id| (*id, 0)).collect();
		if post_ids.is_empty() { return Ok( counts ) }

		let sql = format!("SELECT post_id, COUNT(*) FROM comment WHERE post_id IN ({}) GROUP BY post_id", placeholders( post_ids.len() ));
		let found: Vec<(i64, i64)> = self.base.query( sql, id_params( post_ids ),
			|rows| rows.map(|row| Ok( (row.get(0)?, row.get(1)?) )).collect()
		).await?;

		counts.extend( found.into_iter().map(|(id, count)| (id, count as u64)) );
		Ok( counts )
	}

	/// The tags of each of the given posts, fetched with one query.
	///
	/// Tags are listed in the default tag order, by title, and are annotated with the number of posts carrying them.
	/// Posts without tags map to an empty list.
	pub async fn tags_of( &self, post_ids: &[i64] ) -> Result<HashMap<i64, Vec<Counted<Tag>>>> {
		let mut tags: HashMap<i64, Vec<Counted<Tag>>> = post_ids.iter().map(|id| (*id, Vec::new())).collect();
		if post_ids.is_empty() { return Ok( tags ) }

		let sql = format!("SELECT pt.post_id, t.id, t.title, c.posts FROM post_tag pt \
			INNER JOIN tag t ON t.id = pt.tag_id \
			INNER JOIN (SELECT tag_id, COUNT(*) AS posts FROM post_tag GROUP BY tag_id) c ON c.tag_id = t.id \
			WHERE pt.post_id IN ({}) ORDER BY pt.post_id, t.title ASC", placeholders( post_ids.len() ));
		let found: Vec<(i64, Counted<Tag>)> = self.base.query( sql, id_params( post_ids ),
			|rows| rows.map(|row| {
				let posts: i64 = row.get(3)?;
				let tag = Tag { id: row.get(1)?, title: row.get(2)? };
				Ok( (row.get(0)?, Counted::new( tag, posts as u64 )) )
			}).collect()
		).await?;

		for (post_id, tag) in found {
			tags.entry( post_id ).or_default().push( tag );
		}
		Ok( tags )
	}
}

fn post_from_row( row: &rusqlite::Row<'_> ) -> rusqlite::Result<Post> {
	Ok( Post {
		id: row.get(0)?,
		title: row.get(1)?,
		text: row.get(2)?,
		slug: row.get(3)?,
		image: row.get(4)?,
		published_at: get_timestamp( row, 5 )?,
		author: User {
			id: row.get(6)?,
			username: row.get(7)?,
			is_staff: row.get(8)?
		}
	})
}



impl Deref for Handle {
	type Target = persistence::Handle;

	fn deref( &self ) -> &Self::Target {
		&self.base
	}
}
