//! The page contexts of the blog.
//!
//! Every page reads the current state of the database and nothing else.
//! Post summaries on all pages go through `Summaries`, which fetches comment counts and tags for a whole batch of posts at once.

use futures::try_join;
use serde::Serialize;
use tracing::debug;

use std::collections::HashMap;

use crate::{
	config::Config,
	persistence::{self, Counted, Result},
	post::Post,
	tag::Tag,
	view::{self, PostDetail, PostSummary, TagSummary}
};



#[derive(Debug, Serialize)]
pub struct HomeContext {
	pub most_popular_posts: Vec<PostSummary>,
	/// The most recently published posts.
	pub page_posts: Vec<PostSummary>,
	pub popular_tags: Vec<TagSummary>
}

#[derive(Debug, Serialize)]
pub struct PostDetailContext {
	pub post: PostDetail,
	pub popular_tags: Vec<TagSummary>,
	pub most_popular_posts: Vec<PostSummary>
}

#[derive(Debug, Serialize)]
pub struct TagFilterContext {
	/// Title of the tag being browsed
	pub tag: String,
	pub posts: Vec<PostSummary>,
	pub popular_tags: Vec<TagSummary>,
	pub most_popular_posts: Vec<PostSummary>
}

/// The contacts page has no data yet.
#[derive(Debug, Default, Serialize)]
pub struct ContactsContext {}

/// Everything needed to summarize a batch of posts besides the posts themselves.
struct Summaries {
	comment_counts: HashMap<i64, u64>,
	tags: HashMap<i64, Vec<Counted<Tag>>>
}



pub async fn home( db: &persistence::Handle, config: &Config ) -> Result<HomeContext> {
	let (posts, tags) = (db.posts(), db.tags());
	let listing = &config.listing;

	let (popular, fresh, popular_tags) = try_join!(
		posts.popular( listing.popular_posts ),
		posts.fresh( listing.fresh_posts ),
		tags.popular( listing.popular_tags )
	)?;

	let popular: Vec<Post> = popular.into_iter().map(|p| p.item).collect();
	let (fresh, known_counts): (Vec<Post>, HashMap<i64, u64>) = fresh.into_iter()
		.map(|p| { let id = p.item.id; (p.item, (id, p.count)) })
		.unzip();

	let summaries = Summaries::fetch( db, popular.iter().chain( fresh.iter() ), known_counts ).await?;

	Ok( HomeContext {
		most_popular_posts: summaries.assemble( &popular, config ),
		page_posts: summaries.assemble( &fresh, config ),
		popular_tags: popular_tags.iter().map( view::assemble_tag_summary ).collect()
	})
}

/// Fails with `NotFound` if no post has the given slug.
pub async fn post_detail( db: &persistence::Handle, config: &Config, slug: &str ) -> Result<PostDetailContext> {
	debug!(slug, "loading post detail");
	let (posts, tags, comments) = (db.posts(), db.tags(), db.comments());
	let post = posts.by_slug( slug ).await?;
	let listing = &config.listing;

	let (post_comments, like_count, popular_tags, popular) = try_join!(
		comments.of_post( post.id ),
		posts.like_count( post.id ),
		tags.popular( listing.popular_tags ),
		posts.popular( listing.popular_posts )
	)?;

	let popular: Vec<Post> = popular.into_iter().map(|p| p.item).collect();
	let summaries = Summaries::fetch( db, popular.iter().chain( Some(&post) ), HashMap::new() ).await?;

	Ok( PostDetailContext {
		post: view::assemble_post_detail( &post, &post_comments, like_count, summaries.tags_of( &post ), config ),
		popular_tags: popular_tags.iter().map( view::assemble_tag_summary ).collect(),
		most_popular_posts: summaries.assemble( &popular, config )
	})
}

/// Fails with `NotFound` if no tag has exactly the given title.
pub async fn tag_filter( db: &persistence::Handle, config: &Config, tag_title: &str ) -> Result<TagFilterContext> {
	debug!(tag_title, "loading tag filter");
	let (posts, tags) = (db.posts(), db.tags());
	let tag = tags.by_title( tag_title ).await?;
	let listing = &config.listing;

	let (related, popular_tags, popular) = try_join!(
		posts.with_tag( tag.id, listing.tag_posts ),
		tags.popular( listing.popular_tags ),
		posts.popular( listing.popular_posts )
	)?;

	let popular: Vec<Post> = popular.into_iter().map(|p| p.item).collect();
	let summaries = Summaries::fetch( db, related.iter().chain( popular.iter() ), HashMap::new() ).await?;

	Ok( TagFilterContext {
		tag: tag.title,
		posts: summaries.assemble( &related, config ),
		popular_tags: popular_tags.iter().map( view::assemble_tag_summary ).collect(),
		most_popular_posts: summaries.assemble( &popular, config )
	})
}

pub fn contacts() -> ContactsContext {
	ContactsContext::default()
}



impl Summaries {

	/// Fetches comment counts and tags for `posts`.
	/// Comment counts already present in `known_counts` are not fetched again.
	async fn fetch<'a>( db: &persistence::Handle, posts: impl Iterator<Item=&'a Post>, known_counts: HashMap<i64, u64> ) -> Result<Self> {
		let mut ids: Vec<i64> = posts.map(|p| p.id).collect();
		ids.sort_unstable();
		ids.dedup();

		let missing: Vec<i64> = ids.iter().copied().filter(|id| !known_counts.contains_key(id)).collect();
		let handle = db.posts();
		let (mut comment_counts, tags) = try_join!(
			handle.comment_counts( &missing ),
			handle.tags_of( &ids )
		)?;
		comment_counts.extend( known_counts );

		Ok( Self { comment_counts, tags } )
	}

	fn tags_of( &self, post: &Post ) -> &[Counted<Tag>] {
		self.tags.get( &post.id ).map(|tags| tags.as_slice()).unwrap_or(&[])
	}

	fn assemble( &self, posts: &[Post], config: &Config ) -> Vec<PostSummary> {
		posts.iter().map(|post| {
			let comment_count = self.comment_counts.get( &post.id ).copied().unwrap_or(0);
			view::assemble_post_summary( post, comment_count, self.tags_of( post ), config )
		}).collect()
	}
}
