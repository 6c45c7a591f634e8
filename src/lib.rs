pub mod common;
pub mod config;
pub mod pages;
pub mod persistence;
pub mod post;
pub mod runtime;
pub mod tag;
pub mod user;
pub mod view;
pub mod web;

pub use crate::config::Config;
pub use crate::persistence::{Counted, Error, Result};



/// State shared by all request handlers.
pub struct Globals {
	pub db: persistence::Handle,
	pub tera: tera::Tera,
	pub config: Config
}
