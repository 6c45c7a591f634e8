#![allow(dead_code)] // not every test file uses every fixture

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::Value;
use tagblog::{persistence::Handle, tag};



/// Ids of the rows created by `setup_blog`.
pub struct Blog {
	pub authors: Vec<i64>,
	pub readers: Vec<i64>,
	/// In creation order: tiger, sir-charles, mount-doom, everest, kilimanjaro, untagged.
	pub posts: Vec<i64>,
	pub danger: i64,
	pub asia: i64,
	pub mountains: i64,
	pub cats: i64
}



pub async fn db() -> Handle {
	Handle::open_in_memory().await.unwrap()
}

pub fn at( year: i32, month: u32, day: u32, hour: u32 ) -> DateTime<Utc> {
	Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

pub async fn create_user( db: &Handle, username: &str, is_staff: bool ) -> i64 {
	db.insert("INSERT INTO user (username, is_staff) VALUES (?, ?)",
		vec![Value::Text(username.to_owned()), Value::Integer(is_staff as i64)]
	).await.unwrap()
}

/// Creates a tag the way the authoring surface does: the title is cleaned first.
pub async fn create_tag( db: &Handle, title: &str ) -> i64 {
	let title = tag::clean_title(title).unwrap();
	db.insert("INSERT INTO tag (title) VALUES (?)", vec![Value::Text(title)]).await.unwrap()
}

pub async fn try_create_post( db: &Handle, author: i64, title: &str, slug: &str, published_at: DateTime<Utc>, image: Option<&str> ) -> tagblog::Result<i64> {
	db.insert("INSERT INTO post (title, text, slug, image, published_at, author_id) VALUES (?, ?, ?, ?, ?, ?)",
		vec![
			Value::Text(title.to_owned()),
			Value::Text(format!("{} is a story worth telling.", title)),
			Value::Text(slug.to_owned()),
			image.map(|i| Value::Text(i.to_owned())).unwrap_or(Value::Null),
			Value::Integer(published_at.timestamp()),
			Value::Integer(author)
		]
	).await
}

pub async fn create_post( db: &Handle, author: i64, title: &str, slug: &str, published_at: DateTime<Utc>, tags: &[i64] ) -> i64 {
	let post = try_create_post(db, author, title, slug, published_at, None).await.unwrap();
	for tag in tags {
		db.insert("INSERT INTO post_tag (post_id, tag_id) VALUES (?, ?)",
			vec![Value::Integer(post), Value::Integer(*tag)]
		).await.unwrap();
	}
	post
}

pub async fn try_like( db: &Handle, post: i64, user: i64 ) -> tagblog::Result<i64> {
	db.insert("INSERT INTO post_like (post_id, user_id) VALUES (?, ?)",
		vec![Value::Integer(post), Value::Integer(user)]
	).await
}

pub async fn like_by( db: &Handle, post: i64, users: &[i64] ) {
	for user in users {
		try_like(db, post, *user).await.unwrap();
	}
}

pub async fn comment( db: &Handle, post: i64, author: i64, text: &str, published_at: DateTime<Utc> ) -> i64 {
	db.insert("INSERT INTO comment (post_id, author_id, text, published_at) VALUES (?, ?, ?, ?)",
		vec![Value::Integer(post), Value::Integer(author), Value::Text(text.to_owned()), Value::Integer(published_at.timestamp())]
	).await.unwrap()
}

/// Sets up six posts by two staff authors.
///
/// | post        | published  | tags                      | likes | comments |
/// |-------------|------------|---------------------------|-------|----------|
/// | tiger       | 2020-03-01 | danger, asia              | 5     | 2        |
/// | sir-charles | 2020-07-15 | cats                      | 3     | 0        |
/// | mount-doom  | 2021-01-10 | danger, mountains         | 3     | 3        |
/// | everest     | 2021-06-01 | mountains, asia, danger   | 1     | 1        |
/// | kilimanjaro | 2022-02-02 | mountains                 | 0     | 0        |
/// | untagged    | 2022-05-05 |                           | 0     | 0        |
pub async fn setup_blog( db: &Handle ) -> Blog {
	let authors = vec![
		create_user(db, "gandalf", true).await,
		create_user(db, "bilbo", true).await
	];
	let mut readers = Vec::new();
	for name in ["sam", "pippin", "merry", "rosie", "gollum"] {
		readers.push( create_user(db, name, false).await );
	}

	let danger = create_tag(db, "Danger").await;
	let asia = create_tag(db, "asia").await;
	let mountains = create_tag(db, "Mountains").await;
	let cats = create_tag(db, "cats").await;

	let tiger = try_create_post(db, authors[0], "The Tiger", "tiger", at(2020, 3, 1, 9), Some("tiger.jpg")).await.unwrap();
	for tag in [danger, asia] {
		db.insert("INSERT INTO post_tag (post_id, tag_id) VALUES (?, ?)", vec![Value::Integer(tiger), Value::Integer(tag)]).await.unwrap();
	}
	let posts = vec![
		tiger,
		create_post(db, authors[0], "Sir Charles", "sir-charles", at(2020, 7, 15, 9), &[cats]).await,
		create_post(db, authors[1], "Mount Doom", "mount-doom", at(2021, 1, 10, 9), &[danger, mountains]).await,
		create_post(db, authors[1], "Mt. Everest", "everest", at(2021, 6, 1, 9), &[mountains, asia, danger]).await,
		create_post(db, authors[1], "Kilimanjaro", "kilimanjaro", at(2022, 2, 2, 9), &[mountains]).await,
		create_post(db, authors[0], "Untagged", "untagged", at(2022, 5, 5, 9), &[]).await
	];

	like_by(db, posts[0], &readers[..5]).await;
	like_by(db, posts[1], &readers[..3]).await;
	like_by(db, posts[2], &readers[2..5]).await;
	like_by(db, posts[3], &readers[4..5]).await;

	comment(db, posts[0], readers[0], "Scary.", at(2020, 3, 2, 10)).await;
	comment(db, posts[0], readers[1], "Beautiful animal.", at(2020, 3, 3, 10)).await;
	comment(db, posts[2], readers[0], "Third", at(2021, 1, 12, 12)).await;
	comment(db, posts[2], readers[1], "First", at(2021, 1, 12, 10)).await;
	comment(db, posts[2], readers[4], "Second", at(2021, 1, 12, 11)).await;
	comment(db, posts[3], readers[2], "Too cold.", at(2021, 6, 2, 8)).await;

	Blog { authors, readers, posts, danger, asia, mountains, cats }
}
