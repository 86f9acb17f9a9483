use anyhow::Context;
use clap::Parser;
use eco_choice::config::toml_config::TomlConfig;
use eco_choice::core::presenter;
use eco_choice::utils::error::ErrorSeverity;
use eco_choice::utils::{logger, validation::Validate};
use eco_choice::{
    CliConfig, EcoError, GeminiClient, RecommendationSession, ServiceSettings, SubmitOutcome,
    ViewState,
};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

type Session = RecommendationSession<GeminiClient<ServiceSettings>>;

fn exit_with(e: &EcoError) -> ! {
    tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
    };
    std::process::exit(exit_code);
}

fn load_settings(config: &CliConfig) -> eco_choice::Result<ServiceSettings> {
    let file = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            Some(file)
        }
        None => None,
    };

    ServiceSettings::resolve(config.overrides(), file.as_ref())
}

fn print_state(state: &ViewState, json: bool) {
    match (state, json) {
        (ViewState::Loaded(recommendation), true) => {
            match serde_json::to_string_pretty(recommendation) {
                Ok(text) => println!("{}", text),
                Err(e) => tracing::error!("Failed to serialize recommendation: {}", e),
            }
        }
        (ViewState::Loaded(_), false) => println!("{}\n", presenter::render(state)),
        // JSON 模式下 stdout 只放結果
        (_, true) => eprintln!("{}", presenter::render(state)),
        (_, false) => println!("{}\n", presenter::render(state)),
    }
}

/// Submits one query and prints every state the session passes through.
async fn run_submission(session: &Session, query: &str, json: bool) -> SubmitOutcome {
    let mut states = session.subscribe();
    let submit = session.submit(query);
    tokio::pin!(submit);

    loop {
        tokio::select! {
            outcome = &mut submit => {
                if outcome != SubmitOutcome::Ignored {
                    print_state(&session.state(), json);
                }
                return outcome;
            }
            changed = states.changed() => {
                if changed.is_err() {
                    continue;
                }
                let state = states.borrow_and_update().clone();
                if state.is_loading() {
                    print_state(&state, json);
                }
            }
        }
    }
}

async fn run_interactive(session: &Session, json: bool) -> anyhow::Result<()> {
    print_state(&session.state(), json);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let last_query = session.query();
        if matches!(session.state(), ViewState::Error(_)) && !last_query.trim().is_empty() {
            print!("Product [{}]> ", last_query);
        } else {
            print!("Product> ");
        }
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read from stdin")? else {
            break;
        };
        let input = line.as_str();
        if matches!(input.trim(), "quit" | "exit") {
            break;
        }

        // 錯誤後直接按 Enter 表示用同一個商品重試
        let query = if input.trim().is_empty()
            && matches!(session.state(), ViewState::Error(_))
            && !last_query.trim().is_empty()
        {
            last_query
        } else {
            input.to_string()
        };

        run_submission(session, &query, json).await;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose, config.log_json);
    tracing::info!("Starting eco-choice");

    let settings = match load_settings(&config) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Service settings: {:?}", settings);

    let client = match GeminiClient::new(settings) {
        Ok(client) => client,
        Err(e) => exit_with(&e),
    };
    let session = RecommendationSession::new(client);

    match config.query.as_deref() {
        Some(query) => {
            let outcome = run_submission(&session, query, config.json).await;
            let exit_code = match outcome {
                SubmitOutcome::Loaded => 0,
                SubmitOutcome::Failed => 2,
                SubmitOutcome::Rejected | SubmitOutcome::Ignored => 1,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
        None => run_interactive(&session, config.json).await?,
    }

    Ok(())
}
