use anyhow::Result;
use axum::Router;
use blogsearch_server::{build_app, AppState};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "blogsearch-server")]
#[command(about = "Serve a blog's post list and a search endpoint for local development")]
struct Args {
    /// Posts JSON file served at /json/posts.json
    #[arg(long, env = "BLOGSEARCH_POSTS", default_value = "./_site/json/posts.json")]
    posts: PathBuf,
    /// Page holding the #search-result template; the built-in page is used when omitted
    #[arg(long)]
    page: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 4000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let page_html = args.page.as_ref().map(std::fs::read_to_string).transpose()?;
    let state = AppState::load(&args.posts, page_html.as_deref())?;
    let app: Router = build_app(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
