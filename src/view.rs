//! Shapes fetched models into the records handed to the templates.
//!
//! Nothing in here touches the database: every count an assembler needs has already been fetched.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
	common::truncate_chars,
	config::Config,
	persistence::Counted,
	post::{Comment, Post},
	tag::Tag
};



#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagSummary {
	pub title: String,
	pub posts_with_tag: u64,
	pub url: String
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PostSummary {
	pub title: String,
	pub teaser_text: String,
	/// Username of the author
	pub author: String,
	pub comments_amount: u64,
	pub image_url: Option<String>,
	pub published_at: DateTime<Utc>,
	pub slug: String,
	pub tags: Vec<TagSummary>,
	/// `None` for posts without tags.
	pub first_tag_title: Option<String>,
	pub url: String
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommentView {
	pub text: String,
	pub published_at: DateTime<Utc>,
	pub author: String
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PostDetail {
	pub title: String,
	pub text: String,
	pub author: String,
	pub comments: Vec<CommentView>,
	pub likes_amount: u64,
	pub image_url: Option<String>,
	pub published_at: DateTime<Utc>,
	pub slug: String,
	pub tags: Vec<TagSummary>
}



pub fn assemble_tag_summary( tag: &Counted<Tag> ) -> TagSummary {
	TagSummary {
		title: tag.item.title.clone(),
		posts_with_tag: tag.count,
		url: tag.item.url()
	}
}

/// `tags` are the post's tags in the default tag order.
pub fn assemble_post_summary( post: &Post, comment_count: u64, tags: &[Counted<Tag>], config: &Config ) -> PostSummary {
	PostSummary {
		title: post.title.clone(),
		teaser_text: truncate_chars( &post.text, config.listing.teaser_length ),
		author: post.author.username.clone(),
		comments_amount: comment_count,
		image_url: post.image_url( &config.media_url ),
		published_at: post.published_at,
		slug: post.slug.clone(),
		tags: tags.iter().map( assemble_tag_summary ).collect(),
		first_tag_title: tags.first().map(|t| t.item.title.clone()),
		url: post.url()
	}
}

/// `comments` are expected in their default order, oldest first.
pub fn assemble_post_detail( post: &Post, comments: &[Comment], like_count: u64, tags: &[Counted<Tag>], config: &Config ) -> PostDetail {
	PostDetail {
		title: post.title.clone(),
		text: post.text.clone(),
		author: post.author.username.clone(),
		comments: comments.iter().map(|c| CommentView {
			text: c.text.clone(),
			published_at: c.published_at,
			author: c.author.username.clone()
		}).collect(),
		likes_amount: like_count,
		image_url: post.image_url( &config.media_url ),
		published_at: post.published_at,
		slug: post.slug.clone(),
		tags: tags.iter().map( assemble_tag_summary ).collect()
	}
}
