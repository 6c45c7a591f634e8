use std::{
	ops::Deref,
	path::Path,
	sync::{Arc, Mutex}
};

use chrono::{DateTime, Utc};
use rusqlite::{self, params_from_iter, types::Value};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::debug;

use crate::runtime;

pub mod comment;
pub mod post;
pub mod tag;



/// The schema of the blog.
///
/// Timestamps are stored as seconds since the UNIX epoch.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS user (
	id INTEGER PRIMARY KEY,
	username TEXT NOT NULL UNIQUE,
	is_staff INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS post (
	id INTEGER PRIMARY KEY,
	title TEXT NOT NULL CHECK (length(title) <= 200),
	text TEXT NOT NULL,
	slug TEXT NOT NULL CHECK (length(slug) <= 200),
	image TEXT,
	published_at INTEGER NOT NULL,
	author_id INTEGER NOT NULL REFERENCES user (id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS post_published_at ON post (published_at);
CREATE INDEX IF NOT EXISTS post_slug ON post (slug);
CREATE TABLE IF NOT EXISTS tag (
	id INTEGER PRIMARY KEY,
	title TEXT NOT NULL UNIQUE CHECK (title = lower(title) AND length(title) BETWEEN 1 AND 20)
);
CREATE TABLE IF NOT EXISTS post_tag (
	id INTEGER PRIMARY KEY,
	post_id INTEGER NOT NULL REFERENCES post (id) ON DELETE CASCADE,
	tag_id INTEGER NOT NULL REFERENCES tag (id) ON DELETE CASCADE,
	UNIQUE (post_id, tag_id)
);
CREATE INDEX IF NOT EXISTS post_tag_tag ON post_tag (tag_id);
CREATE TABLE IF NOT EXISTS post_like (
	post_id INTEGER NOT NULL REFERENCES post (id) ON DELETE CASCADE,
	user_id INTEGER NOT NULL REFERENCES user (id) ON DELETE CASCADE,
	PRIMARY KEY (post_id, user_id)
);
CREATE TABLE IF NOT EXISTS comment (
	id INTEGER PRIMARY KEY,
	post_id INTEGER NOT NULL REFERENCES post (id) ON DELETE CASCADE,
	author_id INTEGER NOT NULL REFERENCES user (id) ON DELETE CASCADE,
	text TEXT NOT NULL,
	published_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS comment_post ON comment (post_id);
CREATE TRIGGER IF NOT EXISTS post_author_insert
BEFORE INSERT ON post
WHEN NOT EXISTS (SELECT 1 FROM user WHERE id = NEW.author_id AND is_staff)
BEGIN
	SELECT RAISE(ABORT, 'post author must be a staff member');
END;
CREATE TRIGGER IF NOT EXISTS post_author_update
BEFORE UPDATE OF author_id ON post
WHEN NOT EXISTS (SELECT 1 FROM user WHERE id = NEW.author_id AND is_staff)
BEGIN
	SELECT RAISE(ABORT, 'post author must be a staff member');
END;
";



pub struct Connection ( rusqlite::Connection );

/// A cheaply clonable handle to the blog database.
///
/// All queries are executed on the blocking thread pool.
#[derive(Clone)]
pub struct Handle {
	db: Arc<Mutex<Connection>>
}

/// A model annotated with the size of one of its relations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counted<T> {
	pub item: T,
	pub count: u64
}

#[derive(Debug, Error)]
pub enum Error {
	/// No entry of the model matched the lookup.
	#[error("no {model} found for {key:?}")]
	NotFound { model: &'static str, key: String },
	/// More than one entry matched a lookup on a field that is supposed to be unique.
	#[error("more than one {model} found for {key:?}")]
	AmbiguousMatch { model: &'static str, key: String },
	#[error("invalid tag title {0:?}")]
	InvalidTagTitle( String ),
	/// A SQL error
	#[error("database error: {0}")]
	Database( #[from] rusqlite::Error ),
	/// A previous query panicked while holding the connection.
	#[error("database connection poisoned")]
	Poisoned,
	#[error("blocking task failed: {0}")]
	Blocking( #[from] JoinError )
}

pub type Result<T> = std::result::Result<T, Error>;



impl Connection {

	fn init( connection: rusqlite::Connection ) -> rusqlite::Result<Self> {
		connection.pragma_update( None, "foreign_keys", true )?;
		connection.execute_batch( SCHEMA )?;
		Ok( Self( connection ) )
	}
}

impl Handle {

	/// Opens (or creates) the database at `path` and makes sure the schema exists.
	pub async fn open( path: impl AsRef<Path> ) -> Result<Self> {
		let path = path.as_ref().to_owned();

		let connection = runtime::block_on(move || -> rusqlite::Result<Connection> {
			Connection::init( rusqlite::Connection::open( path )? )
		}).await??;

		Ok( Self::from( connection ) )
	}

	/// Opens a private in-memory database, mostly useful for tests.
	pub async fn open_in_memory() -> Result<Self> {
		let connection = runtime::block_on(|| -> rusqlite::Result<Connection> {
			Connection::init( rusqlite::Connection::open_in_memory()? )
		}).await??;

		Ok( Self::from( connection ) )
	}

	pub fn comments( &self ) -> comment::Handle {
		comment::Handle { base: self.clone() }
	}

	pub fn posts( &self ) -> post::Handle {
		post::Handle { base: self.clone() }
	}

	pub fn tags( &self ) -> tag::Handle {
		tag::Handle { base: self.clone() }
	}

	/// Runs `on_connection` with exclusive access to the connection, on the blocking pool.
	async fn with_connection<F, R>( &self, on_connection: F ) -> Result<R> where
		F: FnOnce(&Connection) -> rusqlite::Result<R> + Send + 'static,
		R: Send + 'static
	{
		let db = self.db.clone();

		runtime::block_on(move || -> Result<R> {
			let guard = db.lock().map_err(|_| Error::Poisoned)?;
			Ok( on_connection( &*guard )? )
		}).await?
	}

	/// Executes a statement and returns the number of affected rows.
	pub async fn execute( &self, sql: impl Into<String>, params: Vec<Value> ) -> Result<usize> {
		let sql = sql.into();
		debug!(%sql, "execute");

		self.with_connection(move |con| {
			con.execute( &sql, params_from_iter( params ) )
		}).await
	}

	/// Executes an `INSERT` statement and returns the row id of the new row.
	pub async fn insert( &self, sql: impl Into<String>, params: Vec<Value> ) -> Result<i64> {
		let sql = sql.into();
		debug!(%sql, "insert");

		self.with_connection(move |con| {
			let mut statement = con.prepare( &sql )?;
			statement.insert( params_from_iter( params ) )
		}).await
	}

	pub async fn query<F, R>( &self, sql: impl Into<String>, params: Vec<Value>, on_result: F ) -> Result<R> where
		F: FnOnce(rusqlite::Rows<'_>) -> rusqlite::Result<R> + Send + 'static,
		R: Send + 'static
	{
		let sql = sql.into();
		debug!(%sql, "query");

		self.with_connection(move |con| {
			let mut statement = con.prepare( &sql )?;
			let rows = statement.query( params_from_iter( params ) )?;
			on_result( rows )
		}).await
	}

	/// Queries one row.
	pub async fn query_one<F, R>( &self, sql: impl Into<String>, params: Vec<Value>, on_result: F ) -> Result<Option<R>> where
		F: FnOnce(&rusqlite::Row<'_>) -> rusqlite::Result<R> + Send + 'static,
		R: Send + 'static
	{
		self.query( sql, params, |mut rows| {
			let result = match rows.next()? {
				None => None,
				Some(row) => Some( on_result( row )? )
			};
			Ok( result )
		}).await
	}

	/// Queries a single count.
	pub async fn count( &self, sql: impl Into<String>, params: Vec<Value> ) -> Result<u64> {
		let count: Option<i64> = self.query_one( sql, params, |row| row.get(0) ).await?;
		Ok( count.unwrap_or(0) as u64 )
	}

	/// Looks up the single row that is supposed to match a unique `key`.
	///
	/// Fails with `NotFound` when nothing matches and with `AmbiguousMatch` when more than one row does.
	pub(crate) async fn query_unique<F, R>( &self, model: &'static str, key: &str, sql: impl Into<String>, params: Vec<Value>, on_row: F ) -> Result<R> where
		F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<R> + Send + 'static,
		R: Send + 'static
	{
		use fallible_iterator::FallibleIterator;

		let mut found: Vec<R> = self.query( sql, params, move |rows| rows.map( on_row ).take(2).collect::<Vec<R>>() ).await?;

		match found.len() {
			0 => Err( Error::NotFound { model, key: key.to_owned() } ),
			1 => Ok( found.remove(0) ),
			_ => Err( Error::AmbiguousMatch { model, key: key.to_owned() } )
		}
	}
}

impl<T> Counted<T> {
	pub fn new( item: T, count: u64 ) -> Self {
		Self { item, count }
	}
}

/// Reads a timestamp column stored as seconds since the UNIX epoch.
pub(crate) fn get_timestamp( row: &rusqlite::Row<'_>, index: usize ) -> rusqlite::Result<DateTime<Utc>> {
	let seconds: i64 = row.get( index )?;
	DateTime::<Utc>::from_timestamp( seconds, 0 )
		.ok_or( rusqlite::Error::IntegralValueOutOfRange( index, seconds ) )
}



impl From<Connection> for Handle {
	fn from( connection: Connection ) -> Self {
		Self {
			db: Arc::new( Mutex::new( connection ) )
		}
	}
}

impl Deref for Connection {
	type Target = rusqlite::Connection;

	fn deref( &self ) -> &Self::Target {
		&self.0
	}
}
