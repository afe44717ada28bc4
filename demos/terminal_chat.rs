//! Terminal chat demo: streams answers from a chat server into stdout.
//!
//! Run with:
//! ```bash
//! export CHAT_ENDPOINT="http://localhost:8000"
//! cargo run --example terminal_chat
//! ```

use std::io::{self, BufRead, Write};

use chatstream::chat::ChatStreamClient;
use chatstream::model::{Message, Role};
use chatstream::options::TransportOptions;
use chatstream::render::Render;
use chatstream::transport::HttpGateway;

/// Renderer that writes the conversation to the terminal as it happens.
struct TermRender;

impl Render for TermRender {
    fn message_added(&mut self, message: &Message) {
        match message.role {
            // Bot messages start empty and fill in via message_appended;
            // anything non-empty here is a notice (welcome or error).
            Role::Bot if !message.text.is_empty() => println!("{}", message.text),
            Role::Bot => print!("bot> "),
            Role::User => {}
        }
        let _ = io::stdout().flush();
    }

    fn message_appended(&mut self, delta: &str, _full: &str) {
        print!("{}", delta);
        let _ = io::stdout().flush();
    }

    fn typing_shown(&mut self) {
        print!("...");
        let _ = io::stdout().flush();
    }

    fn typing_hidden(&mut self) {
        print!("\r      \r");
        let _ = io::stdout().flush();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let endpoint =
        std::env::var("CHAT_ENDPOINT").unwrap_or_else(|_| "http://localhost:8000".to_string());

    let gateway = HttpGateway::new(TransportOptions::new(endpoint))?;
    let mut client = ChatStreamClient::with_welcome(
        gateway,
        TermRender,
        "Hello! Ask me anything. (empty line to quit)",
    );

    // Seeded welcome placeholder
    if let Some(welcome) = client.transcript().messages().first() {
        println!("{}", welcome.text);
    }

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            break;
        }

        client.submit(&line).await;
        println!();
    }

    Ok(())
}
