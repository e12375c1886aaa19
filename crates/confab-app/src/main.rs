mod cli;
mod repl;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use confab_ai::{
    ConversationSession, FileStore, GeminiClient, GeminiConfig, LogStore, MemoryStore,
};

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let candidates = [
        std::path::PathBuf::from(".env"),
        // Workspace root when run via `cargo run` from a member crate
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env before anything reads the environment
    load_dotenv();

    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("Confab v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => confab_config::load_from_path(std::path::Path::new(path)),
        None => confab_config::load_config(),
    }
    .unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        confab_config::ConfabConfig::default()
    });

    let gemini = match GeminiConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let mut gemini = gemini
        .with_model(config.api.model.clone())
        .with_max_tokens(config.api.max_tokens)
        .with_temperature(config.api.temperature)
        .with_timeout(Duration::from_secs(config.api.timeout_secs));
    if let Some(base) = &config.api.api_base {
        gemini = gemini.with_api_base(base.clone());
    }
    let client = GeminiClient::new(gemini);

    let store: Box<dyn LogStore> = if args.no_persist || !config.storage.persist {
        Box::new(MemoryStore::new())
    } else {
        match config.storage.dir.clone().or_else(FileStore::default_dir) {
            Some(dir) => Box::new(FileStore::new(dir)),
            None => {
                tracing::warn!("no data directory available, conversation will not persist");
                Box::new(MemoryStore::new())
            }
        }
    };

    let window = args.window.unwrap_or(config.chat.history_window);
    let session = ConversationSession::with_options(store, config.storage.key.clone(), window);

    repl::run(&session, &client).await;
    tracing::info!("Shutdown complete");
}
