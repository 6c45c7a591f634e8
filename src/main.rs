use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use tera::Tera;
use tracing::info;
use tracing_subscriber::fmt;

use std::path::PathBuf;

use tagblog::{persistence, Config, Globals};



#[derive(Parser)]
#[command(version, about = "Serves the blog pages")]
struct Cli {
	/// Path of the TOML configuration file
	#[arg(short, long, default_value = "tagblog.toml")]
	config: PathBuf
}



#[actix_web::main]
async fn main() -> Result<()> {
	fmt()
		.with_target(false)
		.init();

	let cli = Cli::parse();
	let config = Config::load( &cli.config )?;

	let db = persistence::Handle::open( &config.database ).await
		.with_context(|| format!("unable to open database {}", config.database.display()))?;
	let tera = Tera::new( &config.templates )
		.with_context(|| format!("unable to load templates from {}", config.templates))?;

	let bind = config.bind.clone();
	let globals = web::Data::new( Globals {
		db,
		tera,
		config
	});

	let server = HttpServer::new(move || {
		App::new()
			.app_data(globals.clone())
			.wrap(Logger::default())
			.configure(tagblog::web::configure)
	}).bind( bind.as_str() ).with_context(|| format!("unable to start HTTP server on {}", bind))?;

	info!("HTTP server starting on {}...", bind);
	server.run().await?;
	info!("HTTP server stopped.");

	Ok(())
}
