use actix_web::{error, get, HttpResponse, web};
use serde::Serialize;
use tracing::debug;

use crate::{
	pages,
	persistence,
	Globals
};



/// Registers all pages of the blog.
pub fn configure( cfg: &mut web::ServiceConfig ) {
	cfg.service( homepage )
		.service( post_detail )
		.service( tag_filter )
		.service( contacts );
}

fn render<C: Serialize>( g: &Globals, template: &str, context: &C ) -> error::Result<HttpResponse> {
	let context = tera::Context::from_serialize( context )
		.map_err(|e| { tracing::error!("Unable to build context for {}: {}", template, e); error::ErrorInternalServerError("Template error") } )?;

	let html = g.tera.render( template, &context )
		.map_err(|e| { tracing::error!("Template error: {}", e); error::ErrorInternalServerError("Template error") } )?;
	Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

#[get("/")]
pub async fn homepage(g: web::Data<Globals>) -> error::Result<HttpResponse> {
	let context = pages::home( &g.db, &g.config ).await?;
	render( &g, "index.html", &context )
}

#[get("/post/{slug}")]
pub async fn post_detail(g: web::Data<Globals>, slug: web::Path<String>) -> error::Result<HttpResponse> {
	let context = pages::post_detail( &g.db, &g.config, &slug ).await?;
	render( &g, "post-details.html", &context )
}

#[get("/tag/{tag_title}")]
pub async fn tag_filter(g: web::Data<Globals>, tag_title: web::Path<String>) -> error::Result<HttpResponse> {
	let context = pages::tag_filter( &g.db, &g.config, &tag_title ).await?;
	render( &g, "posts-list.html", &context )
}

#[get("/contacts")]
pub async fn contacts(g: web::Data<Globals>) -> error::Result<HttpResponse> {
	render( &g, "contacts.html", &pages::contacts() )
}



impl From<persistence::Error> for actix_web::Error {
	fn from( other: persistence::Error ) -> Self {
		match other {
			persistence::Error::NotFound { .. } => {
				debug!("{}", other);
				error::ErrorNotFound("Not found")
			},
			other => {
				tracing::error!("Persistence error: {}", other);
				error::ErrorInternalServerError("Internal server error occurred")
			}
		}
	}
}
