use anyhow::{Context, Result};
use blogsearch_core::{FileSource, HttpSource, PostSource, PostStore, RawPost};
use blogsearch_widget::{SearchBox, UiEvent, WidgetConfig, DEFAULT_PAGE};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "blogsearch")]
#[command(about = "Search a blog's post list the way its search box does", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Common {
    /// Site root URL (posts are read from the config's posts_path under it) or a local posts file
    #[arg(long, env = "BLOGSEARCH_SOURCE")]
    source: String,
    /// HTML page holding the #search-result template
    #[arg(long)]
    page: Option<PathBuf>,
    /// Widget config as JSON; missing keys use defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query and print the rendered results
    Search {
        #[command(flatten)]
        common: Common,
        /// Search term
        term: String,
    },
    /// Read field values from stdin, one per line, and print results as the debounce fires
    Interactive {
        #[command(flatten)]
        common: Common,
        /// Override the debounce interval
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
}

/// Either kind of source, picked from the `--source` argument.
enum Source {
    Http(HttpSource),
    File(FileSource),
}

impl Source {
    fn parse(s: &str, posts_path: &str) -> Result<Self> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Source::Http(HttpSource::with_path(s, posts_path)?))
        } else {
            Ok(Source::File(FileSource::new(s)))
        }
    }
}

impl PostSource for Source {
    async fn load(&self) -> Result<Vec<RawPost>> {
        match self {
            Source::Http(src) => src.load().await,
            Source::File(src) => src.load().await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { common, term } => search(&common, &term).await,
        Commands::Interactive { common, debounce_ms } => interactive(&common, debounce_ms).await,
    }
}

fn load_config(common: &Common) -> Result<WidgetConfig> {
    match &common.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            WidgetConfig::from_json(&text)
        }
        None => Ok(WidgetConfig::default()),
    }
}

fn mount(common: &Common, config: WidgetConfig) -> Result<SearchBox> {
    let page_html = match &common.page {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        None => DEFAULT_PAGE.to_string(),
    };
    Ok(SearchBox::mount(config, &page_html)?)
}

async fn search(common: &Common, term: &str) -> Result<()> {
    let config = load_config(common)?;
    let source = Source::parse(&common.source, &config.posts_path)?;
    let search = mount(common, config)?;
    // a one-shot query should fail loudly rather than print "no results"
    let store = PostStore::fetch(&source).await?;
    let posts = store.filter(term.trim());
    tracing::info!(term, hits = posts.len(), "search complete");
    for node in search.renderer().render_results(&posts) {
        println!("{}", node.to_html());
    }
    Ok(())
}

async fn interactive(common: &Common, debounce_ms: Option<u64>) -> Result<()> {
    let mut config = load_config(common)?;
    if let Some(ms) = debounce_ms {
        config.debounce_ms = ms;
    }
    let delay = config.debounce();
    let source = Source::parse(&common.source, &config.posts_path)?;
    let search = mount(common, config)?;
    let n = search.load(&source).await;
    eprintln!("blogsearch: {n} posts loaded, type to search (ctrl-d to quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printed = 0u64;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(value) => { search.dispatch(UiEvent::KeyUp(value)); }
                    None => break,
                }
            }
            _ = tokio::time::sleep(delay / 2) => {}
        }
        printed = print_if_new(&search, printed);
    }

    // let the last keystroke's timer fire before exiting
    tokio::time::sleep(delay + Duration::from_millis(10)).await;
    print_if_new(&search, printed);
    Ok(())
}

fn print_if_new(search: &SearchBox, printed: u64) -> u64 {
    let run = search.queries_run();
    if run > printed {
        println!("--- {:?}", search.input_value().trim());
        for node in search.results() {
            println!("{}", node.to_html());
        }
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_source_uses_configured_posts_path() {
        let config = WidgetConfig::from_json(r#"{"posts_path": "/api/posts.json"}"#).unwrap();
        match Source::parse("http://blog.example/", &config.posts_path).unwrap() {
            Source::Http(src) => assert_eq!(src.url().as_str(), "http://blog.example/api/posts.json"),
            Source::File(_) => panic!("expected an http source"),
        }
    }

    #[test]
    fn other_sources_are_files() {
        assert!(matches!(Source::parse("./posts.json", "/json/posts.json").unwrap(), Source::File(_)));
    }
}
