//! Scribepad chat - minimal terminal front end for the completion core
//!
//! Reads prompts from stdin, streams the provider's answer to stdout, and
//! keeps the exchange in a bounded conversation. Ctrl-C cancels the response
//! currently streaming instead of killing the process.

use parking_lot::Mutex;
use scribepad::config;
use scribepad::llm::{self, CancelToken};
use scribepad::ConversationManager;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const SYSTEM_PROMPT: &str =
    "You are a concise writing assistant. Improve, rewrite, and answer questions about text.";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let settings = config::load_settings();
    let provider = llm::provider_from_settings(&settings);

    // one in-flight stream at a time; Ctrl-C cancels it cooperatively
    let active_cancel: Arc<Mutex<Option<CancelToken>>> = Arc::new(Mutex::new(None));
    {
        let active_cancel = active_cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            if let Some(token) = active_cancel.lock().as_ref() {
                token.cancel();
            }
        }) {
            eprintln!("warning: could not install Ctrl-C handler: {}", e);
        }
    }

    println!("scribepad chat - provider: {}", provider.name());
    if !provider.is_configured() {
        println!("note: provider is not configured; responses will explain what is missing");
    }
    println!("/new starts a fresh conversation, /quit exits, Ctrl-C stops a response.");

    let mut conversation = ConversationManager::default();
    let stdin = io::stdin();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("input error: {}", e);
                break;
            }
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match input {
            "/quit" => break,
            "/new" => {
                conversation.clear();
                println!("(new conversation)");
                continue;
            }
            _ => {}
        }

        conversation.add_user_message(input);

        let cancel = CancelToken::new();
        *active_cancel.lock() = Some(cancel.clone());

        let history = conversation.messages_for_api();
        let mut reply = String::new();
        for chunk in provider.stream_completion(&history, SYSTEM_PROMPT, cancel.clone()) {
            print!("{}", chunk);
            let _ = io::stdout().flush();
            reply.push_str(&chunk);
        }
        *active_cancel.lock() = None;

        // the stream never reports cancellation itself; the caller annotates
        if cancel.is_cancelled() {
            reply.push_str("\n[stopped]");
            println!("\n[stopped]");
        } else {
            println!();
        }

        conversation.add_assistant_message(reply);
    }
}
