use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgMatches, Command};

use bbox_gallery::config::{AppConfig, LogLevel};
use bbox_gallery::export::AnnotationExporter;
use bbox_gallery::gallery::{GallerySource, GalleryStore};
use bbox_gallery::http::{AppState, BasicAuth, build_router};
use bbox_gallery::render::PageRenderer;

fn cli() -> Command {
    Command::new("bbox-gallery")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Serve images with editable bounding boxes and export edits to CSV")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .required_unless_present("root"),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .help("Scan this directory's subdirectories instead of the configured source")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .value_name("ADDR")
                .help("Listen address, e.g. 127.0.0.1:8001"),
        )
        .arg(
            Arg::new("template")
                .long("template")
                .value_name("FILE")
                .help("Page template")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .value_parser(["error", "warn", "info", "debug", "trace"]),
        )
}

fn load_config(matches: &ArgMatches) -> Result<AppConfig> {
    let root = matches.get_one::<PathBuf>("root");
    let mut config = match (matches.get_one::<PathBuf>("config"), root) {
        (Some(path), _) => AppConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        (None, Some(root)) => AppConfig::new(GallerySource::scan(root)),
        (None, None) => bail!("either --config or --root is required"),
    };

    if let Some(root) = root {
        config.source = GallerySource::scan(root);
    }
    if let Some(bind) = matches.get_one::<String>("bind") {
        config.bind = bind.clone();
    }
    if let Some(template) = matches.get_one::<PathBuf>("template") {
        config.template = template.clone();
    }
    if let Some(level) = matches
        .get_one::<String>("log-level")
        .and_then(|name| LogLevel::from_name(name))
    {
        config.log_level = level;
    }

    Ok(config)
}

fn build_state(config: &AppConfig) -> Result<AppState> {
    let store = GalleryStore::from_source(&config.source, &config.class_map())
        .context("Failed to build gallery")?;
    let renderer = PageRenderer::load(&config.template, config.template_syntax)
        .context("Failed to load page template")?;
    let exporter = AnnotationExporter::new(&config.annotations_dir);

    log::info!(
        "Gallery ready: {} entries, exporting to {:?}",
        store.len(),
        exporter.dir()
    );

    let state = AppState::new(store, renderer, exporter);
    Ok(match &config.auth {
        Some(auth) => {
            log::info!("Basic auth enabled for user '{}'", auth.username);
            state.with_auth(BasicAuth::from_config(auth))
        }
        None => state,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    match matches.get_one::<PathBuf>("config") {
        Some(path) => log::info!("Loaded configuration from {}", path.display()),
        None => log::info!("No configuration file, using defaults"),
    }

    let app = build_router(build_state(&config)?);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}
