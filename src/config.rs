use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use std::{
	fs,
	io,
	path::{Path, PathBuf}
};



#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
	/// Path of the SQLite database file.
	pub database: PathBuf,
	/// Address the HTTP server listens on.
	pub bind: String,
	/// Glob matching the page templates.
	pub templates: String,
	/// URL prefix under which post images are served.
	pub media_url: String,
	pub listing: Listing
}

/// How many entries the pages show.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Listing {
	pub popular_posts: usize,
	pub fresh_posts: usize,
	pub popular_tags: usize,
	/// Posts shown on a tag page.
	pub tag_posts: usize,
	/// Characters of the post text shown as teaser.
	pub teaser_length: usize
}



impl Config {

	/// Loads the configuration from a TOML file.
	/// A file that doesn't exist yields the default configuration.
	pub fn load( path: &Path ) -> Result<Self> {
		let content = match fs::read_to_string( path ) {
			Ok(content) => content,
			Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok( Self::default() ),
			Err(e) => return Err( e ).with_context(|| format!("unable to read {}", path.display()))
		};

		Self::parse( &content ).with_context(|| format!("invalid configuration in {}", path.display()))
	}

	pub fn parse( content: &str ) -> Result<Self> {
		Ok( toml::from_str( content )? )
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			database: PathBuf::from("blog.sqlite"),
			bind: "127.0.0.1:8000".to_owned(),
			templates: concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*").to_owned(),
			media_url: "/media/".to_owned(),
			listing: Listing::default()
		}
	}
}

impl Default for Listing {
	fn default() -> Self {
		Self {
			popular_posts: 5,
			fresh_posts: 5,
			popular_tags: 5,
			tag_posts: 20,
			teaser_length: 200
		}
	}
}
