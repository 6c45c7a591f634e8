mod common;

use actix_web::{http::StatusCode, test, web, App};
use common::*;
use tagblog::{Config, Globals};
use tera::Tera;



async fn globals() -> web::Data<Globals> {
	let db = db().await;
	setup_blog(&db).await;

	let tera = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*")).unwrap();
	web::Data::new(Globals { db, tera, config: Config::default() })
}

async fn get( uri: &str ) -> (StatusCode, String) {
	let app = test::init_service(
		App::new()
			.app_data(globals().await)
			.configure(tagblog::web::configure)
	).await;

	let req = test::TestRequest::get().uri(uri).to_request();
	let resp = test::call_service(&app, req).await;
	let status = resp.status();
	let body = test::read_body(resp).await;
	(status, String::from_utf8_lossy(&body).into_owned())
}

#[actix_web::test]
async fn homepage_renders() {
	let (status, body) = get("/").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("Mount Doom"));
	// Tera escapes the slashes of the link.
	assert!(body.contains("&#x2F;tag&#x2F;danger"));
}

#[actix_web::test]
async fn post_detail_renders() {
	let (status, body) = get("/post/mount-doom").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("likes: 3"));
	assert!(body.contains("Second"));
}

#[actix_web::test]
async fn unknown_post_is_404() {
	let (status, _) = get("/post/the-shire").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn tag_filter_renders() {
	let (status, body) = get("/tag/mountains").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("Kilimanjaro"));
}

#[actix_web::test]
async fn unknown_tag_is_404() {
	let (status, _) = get("/tag/nonexistent").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn contacts_renders() {
	let (status, body) = get("/contacts").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("Contacts"));
}
