//! Ordered local intent rules.
//!
//! Rules are evaluated in a fixed order and the first match wins. Most
//! checks are substring-based on the lowercased, trimmed input, so "hi"
//! anywhere in the text counts as a greeting. That permissiveness is a
//! deliberate policy carried over from the original rule set; callers
//! depend on the observable behavior.

use crate::extract::extract_name;
use banter_memory::MemoryRecord;
use chrono::Local;
use log::debug;
use rand::seq::IndexedRandom;

/// Greeting variants used while no name is known.
pub const GREETINGS: [&str; 3] = ["Hello there!", "Hi! 👋", "Hey!"];

/// Fixed joke list.
pub const JOKES: [&str; 3] = [
    "Why did the developer go broke? Because they used up all their cache.",
    "I told my computer I needed a break, and it said: 'No problem — I'll go to sleep.'",
    "There are 10 kinds of people: those who understand binary and those who don't.",
];

const STATUS_REPLY: &str = "I'm just a bunch of code, but I'm running great 😄";
const IDENTITY_REPLY: &str = "I'm Banter, your Rust-powered assistant.";
const CLEARED_REPLY: &str =
    "Cleared memory. I won't remember your name until you tell me again.";
const THANKS_REPLY: &str = "You're welcome! 😄";
const HELP_REPLY: &str = "Try these:\n\
    - 'hello' / 'hi'\n\
    - 'how are you'\n\
    - 'my name is <Name>'\n\
    - 'time'\n\
    - 'tell me a joke'\n\
    - '/ai <question>' for full AI mode\n\
    - '/clear' to reset memory\n\
    - 'bye' to exit";

/// Match the input against the ordered rules.
///
/// Returns the local reply, or `None` to signal escalation to the
/// completion provider. Only the name-capture and `/clear` rules mutate
/// the record; persisting it is the caller's job. Never fails and performs
/// no I/O.
pub fn route(text: &str, memory: &mut MemoryRecord) -> Option<String> {
    let t = text.trim().to_lowercase();

    // 1. Greetings
    if ["hello", "hi", "hey"].iter().any(|k| t.contains(k)) {
        return Some(greeting(memory));
    }

    // 2. Check-in
    if t.contains("how are you") {
        return Some(STATUS_REPLY.to_string());
    }

    // 3. Asking for the bot's name
    if t.contains("your name") || t == "name" {
        return Some(IDENTITY_REPLY.to_string());
    }

    // 4. Detecting the user's name
    if t.contains("my name is") {
        return Some(capture_name(&t, memory));
    }

    // 5. Time queries
    if t.contains("time") || t.contains("what time") {
        return Some(time_reply());
    }

    // 6. Jokes
    if t.contains("joke") || t.contains("make me laugh") {
        return Some(pick(&JOKES));
    }

    // 7. Help command
    if t == "help" {
        return Some(HELP_REPLY.to_string());
    }

    // 8. Clear memory
    if t == "/clear" {
        memory.clear_name();
        return Some(CLEARED_REPLY.to_string());
    }

    // 9. Thanks
    if t == "thanks" || t == "thank you" {
        return Some(THANKS_REPLY.to_string());
    }

    None
}

fn greeting(memory: &MemoryRecord) -> String {
    match &memory.user_name {
        Some(name) => format!("Hello {name}! Great to see you."),
        None => pick(&GREETINGS),
    }
}

/// Store the extracted name. When the trigger phrase matched but no name
/// token follows, the identity reply is the documented fallback.
fn capture_name(text: &str, memory: &mut MemoryRecord) -> String {
    match extract_name(text) {
        Some(name) => {
            memory.set_name(&name);
            debug!("captured user name (len={})", name.len());
            format!("Nice to meet you, {name}! I'll remember your name.")
        }
        None => IDENTITY_REPLY.to_string(),
    }
}

fn time_reply() -> String {
    format!("It's {}.", Local::now().format("%A %I:%M %p"))
}

fn pick(replies: &[&str]) -> String {
    replies
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or_default()
        .to_string()
}
