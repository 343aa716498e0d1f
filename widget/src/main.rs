use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use discord_widget::config::{
    DEFAULT_CONTENT_SELECTOR, DEFAULT_PRESENCE_COUNTER_SELECTOR, DEFAULT_SELECTOR, WidgetConfig,
    WidgetOptions,
};
use discord_widget::provider::{HttpProvider, SnapshotProvider, StaticProvider};
use discord_widget::widget::{InstanceState, init_with_config};
use discord_widget::{Document, Element};

#[derive(Parser)]
#[command(name = "discord-widget", version, about = "Render community server widgets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mount widgets into a scratch page, load them, and print the page markup.
    Preview {
        /// TOML file with widget options; missing file means defaults.
        #[arg(long, default_value = "discord-widget.toml")]
        config: String,
        /// Overrides `server_id` from the config file and environment.
        #[arg(long)]
        server_id: Option<String>,
        /// Number of mount points on the page.
        #[arg(long, default_value_t = 1)]
        instances: usize,
        /// Render from a saved embed.json instead of calling the API.
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Add an external online counter element to the page.
        #[arg(long)]
        counter: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean markup
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Preview {
            config,
            server_id,
            instances,
            snapshot,
            counter,
        } => {
            let mut options = WidgetOptions::load(&config)?;
            if server_id.is_some() {
                options.server_id = server_id;
            }
            let config = Arc::new(WidgetConfig::resolve(options));
            let page = build_page(&config, instances, counter);

            match snapshot {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
                    let provider = StaticProvider::from_json(&json)
                        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
                    preview(&page, config, provider).await;
                }
                None => {
                    let provider = HttpProvider::new(config.api_base_url.clone());
                    preview(&page, config, provider).await;
                }
            }

            println!("{}", page.to_html());
        }
    }
    Ok(())
}

/// A page with `instances` mount points, each holding one content element.
fn build_page(config: &WidgetConfig, instances: usize, counter: bool) -> Document {
    let page = Document::new();
    for _ in 0..instances {
        let mount = Element::new("div");
        mount.add_class(class_of(&config.selector, DEFAULT_SELECTOR));
        let content = Element::new("div");
        content.add_class(class_of(&config.content_selector, DEFAULT_CONTENT_SELECTOR));
        mount.append_child(&content);
        page.root().append_child(&mount);
    }
    if counter {
        let span = Element::new("span");
        span.add_class(class_of(
            &config.presence_counter_selector,
            DEFAULT_PRESENCE_COUNTER_SELECTOR,
        ));
        page.root().append_child(&span);
    }
    page
}

/// Class name for a plain `.class` selector. Anything fancier falls back to
/// the default, which the configured selector then won't match.
fn class_of<'a>(selector: &'a str, default: &'static str) -> &'a str {
    selector
        .strip_prefix('.')
        .filter(|s| !s.is_empty() && !s.contains(['.', '#', ' ', ',']))
        .unwrap_or_else(|| default.trim_start_matches('.'))
}

async fn preview<P: SnapshotProvider>(page: &Document, config: Arc<WidgetConfig>, provider: P) {
    let registry = init_with_config(page, config, Arc::new(provider))
        .finished()
        .await;
    for (mount, status) in registry.statuses() {
        info!(
            %mount,
            state = ?status.state,
            elapsed_ms = status.elapsed().num_milliseconds(),
            "instance finished"
        );
    }
    info!(
        loaded = registry.count(&InstanceState::Success),
        failed = registry.error_count(),
        "preview finished"
    );
}
