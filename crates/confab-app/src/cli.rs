use clap::Parser;

/// Confab — a streaming Gemini chat client for the terminal.
#[derive(Parser, Debug)]
#[command(name = "confab", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Keep the conversation in memory only.
    #[arg(long)]
    pub no_persist: bool,

    /// Override the number of prior messages sent as context.
    #[arg(long)]
    pub window: Option<usize>,
}

pub fn parse() -> Args {
    Args::parse()
}
