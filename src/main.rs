use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ragchat::api::{AnswerEndpoint, HttpAnswerClient};
use ragchat::core::config::{self, CliOverrides, ResolvedConfig};
use ragchat::core::persistence::{self, FileRepository};
use ragchat::core::state::App;
use ragchat::core::store::ChatState;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "ragchat", about = "Terminal chat client for a RAG question-answering service")]
struct Args {
    /// Answer endpoint URL (overrides config and RAGCHAT_ENDPOINT_URL)
    #[arg(short, long)]
    url: Option<String>,

    /// Number of passages to retrieve per question
    #[arg(short = 'k', long)]
    top_k: Option<u32>,

    /// Keep conversations on disk between runs
    #[arg(long)]
    persist: bool,

    /// Where to write the debug log
    #[arg(long, default_value = "ragchat.log")]
    log_file: PathBuf,
}

fn open_chat_state(config: &ResolvedConfig) -> ChatState {
    if !config.persist {
        return ChatState::default();
    }
    let dir = match config.storage_dir.clone() {
        Some(dir) => Ok(dir),
        None => persistence::default_dir(),
    };
    match dir.map_err(Into::into).and_then(FileRepository::open) {
        Ok(repo) => ChatState::new(Box::new(repo)),
        Err(e) => {
            log::warn!("Conversation storage unavailable ({e}), keeping history in memory");
            ChatState::default()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger; stdout belongs to the terminal UI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ragchat: {e}");
            log::error!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let cli = CliOverrides {
        url: args.url,
        top_k: args.top_k,
        persist: args.persist,
    };
    let resolved = config::resolve(&file_config, &cli);
    log::info!(
        "ragchat starting up: endpoint={}, top_k={}, persist={}",
        resolved.endpoint_url,
        resolved.top_k,
        resolved.persist
    );

    let endpoint: Arc<dyn AnswerEndpoint> = Arc::new(HttpAnswerClient::new(
        resolved.endpoint_url.clone(),
        resolved.request_timeout,
    ));
    let app = App::from_config(endpoint, open_chat_state(&resolved), &resolved);

    match ragchat::tui::run(app, &resolved.endpoint_url) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ragchat: {e}");
            log::error!("Terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}
