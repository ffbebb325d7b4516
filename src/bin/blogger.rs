//! Interactive trending-topic blogging agent.

use std::sync::Arc;

use quickopedia::blogging::{
    ArtifactStore, InteractionLoop, RedditTopicSource, SessionOutcome, WorkflowEngine,
};
use quickopedia::config::BloggingConfig;
use quickopedia::console::StdConsole;
use quickopedia::error::{error_info, QuickopediaError};
use quickopedia::language_models::CallOptions;
use quickopedia::llm::Groq;
use quickopedia::logging;

async fn run() -> Result<SessionOutcome, QuickopediaError> {
    let config = BloggingConfig::from_env()?;
    logging::init(config.log_file.as_deref())?;

    let llm = Groq::new()
        .with_api_key(&config.groq_api_key)
        .with_options(
            CallOptions::new()
                .with_model(&config.model_name)
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens),
        );
    let engine = WorkflowEngine::new(Arc::new(llm))
        .with_max_attempts(config.max_generation_attempts)
        .with_word_range(config.min_word_count..=config.max_word_count);

    let mut session = InteractionLoop::new(
        StdConsole::new(),
        Arc::new(RedditTopicSource::from_config(&config)),
        engine,
        ArtifactStore::new(config.output_dir.clone()),
    );

    println!("Welcome to the AI Blogging Agent!");
    println!("==================================================");
    Ok(session.run().await?)
}

#[tokio::main]
async fn main() {
    let code = tokio::select! {
        result = run() => match result {
            Ok(outcome) => {
                log::info!("Session finished: {:?}", outcome);
                0
            }
            Err(e) => {
                eprintln!("\nAn error occurred: {}", e);
                log::error!("Application error: {}", error_info(&e, "blogging session"));
                1
            }
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\n\nProcess interrupted by user.");
            log::info!("Process interrupted by user");
            130
        }
    };

    println!("\nThank you for using the AI Blogging Agent!");
    // Exit directly: a pending stdin read would otherwise hold the runtime open.
    std::process::exit(code);
}
