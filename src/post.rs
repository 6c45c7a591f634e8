use chrono::{DateTime, Utc};
use serde::Serialize;

use std::fmt;

use crate::user::User;



#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Post {
	pub id: i64,
	pub title: String,
	pub text: String,
	/// The last path segment of the post's URL.
	/// Meant to be unique, but the storage does not enforce it.
	pub slug: String,
	/// Name of the image within the media storage, if the post has one.
	pub image: Option<String>,
	pub published_at: DateTime<Utc>,
	pub author: User
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Comment {
	pub id: i64,
	pub post_id: i64,
	pub post_title: String,
	pub author: User,
	pub text: String,
	pub published_at: DateTime<Utc>
}



impl Post {

	/// The path under which the post detail page is served.
	pub fn url( &self ) -> String {
		format!("/post/{}", self.slug)
	}

	/// The public URL of the post image, given the URL prefix the media storage is served under.
	pub fn image_url( &self, media_url: &str ) -> Option<String> {
		self.image.as_ref().map(|name| {
			if media_url.ends_with('/') {
				format!("{}{}", media_url, name)
			}
			else {
				format!("{}/{}", media_url, name)
			}
		})
	}
}

impl fmt::Display for Post {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.title)
	}
}

impl fmt::Display for Comment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} under {}", self.author.username, self.post_title)
	}
}
