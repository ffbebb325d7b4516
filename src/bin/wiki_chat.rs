//! Chat with a Wikipedia article from the terminal.
//!
//! Commands inside a chat: `/full` prints the whole article, `/save` writes it
//! to the working directory, `/clear` empties the history, `/new` picks
//! another page and `/quit` exits.

use std::path::Path;
use std::sync::Arc;

use quickopedia::chat::{preview_text, save_text, ChatError, ChatSession};
use quickopedia::config::WikiChatConfig;
use quickopedia::console::{Console, StdConsole};
use quickopedia::error::{error_info, QuickopediaError};
use quickopedia::language_models::CallOptions;
use quickopedia::llm::Groq;
use quickopedia::logging;
use quickopedia::rag::{TopicIndexCache, WikiQa};
use quickopedia::retrievers::WikipediaScraper;
use quickopedia::text_splitter::RecursiveCharacterTextSplitterOptions;

enum Next {
    NewPage,
    Quit,
}

async fn chat(
    console: &mut StdConsole,
    session: &mut ChatSession,
    text: &str,
) -> Result<Next, QuickopediaError> {
    loop {
        let Some(line) = console.read_line("\nYou: ").await? else {
            return Ok(Next::Quit);
        };

        match line.trim() {
            "/quit" => return Ok(Next::Quit),
            "/new" => return Ok(Next::NewPage),
            "/full" => println!("\n{}", text),
            "/clear" => {
                session.clear();
                println!("Chat history cleared.");
            }
            "/save" => match save_text(Path::new("."), session.page(), text).await {
                Ok(path) => println!("Saved to {}", path.display()),
                Err(e) => println!("Could not save: {}", e),
            },
            question => match session.ask(question).await {
                Ok(reply) => println!("\nAssistant: {}", reply.content),
                Err(ChatError::EmptyQuestion) => {
                    println!("Please enter a question before sending!");
                }
                Err(e) => return Err(e.into()),
            },
        }
    }
}

async fn run() -> Result<(), QuickopediaError> {
    let config = WikiChatConfig::from_env()?;
    logging::init(None)?;

    let llm = Groq::new().with_api_key(&config.groq_api_key).with_options(
        CallOptions::new()
            .with_model(&config.model_name)
            .with_temperature(config.temperature),
    );
    let qa = WikiQa::new(
        WikipediaScraper::new().with_language(&config.language),
        Arc::new(llm),
    );
    let mut cache = TopicIndexCache::new(
        RecursiveCharacterTextSplitterOptions::new()
            .with_chunk_size(config.chunk_size)
            .with_chunk_overlap(config.chunk_overlap),
        config.top_k,
    );
    let mut console = StdConsole::new();

    println!("Wikipedia AI Assistant");
    loop {
        let Some(page) = console
            .read_line("\nWikipedia page name (blank to quit): ")
            .await?
        else {
            return Ok(());
        };
        let page = page.trim();
        if page.is_empty() {
            return Ok(());
        }

        let text = match qa.scraper().scrape(page).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                println!("Could not find a Wikipedia page named '{}'.", page);
                continue;
            }
            Err(e) => {
                println!("Error scraping page: {}", e);
                continue;
            }
        };
        println!("\n{}", preview_text(&text));

        let mut session = match ChatSession::start(&qa, &mut cache, page, &text).await {
            Ok(session) => session,
            Err(e) => {
                println!("Error setting up chat system: {}", e);
                continue;
            }
        };
        for message in session.messages() {
            println!("\nAssistant: {}", message.content);
        }

        if let Next::Quit = chat(&mut console, &mut session, &text).await? {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            log::error!("{}", error_info(&e, "wiki chat"));
            1
        }
    };
    std::process::exit(code);
}
