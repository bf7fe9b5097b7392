//! System prompts and message lists sent to the chat client.

use crate::models::{ChatMessage, Role};

const ASSISTANT_PREAMBLE: &str = "You are a helpful assistant discussing a YouTube video.";
const CONTEXT_INTRO: &str = "Here is the relevant context from the video:";
const NO_TRANSCRIPT: &str = "No transcript available yet.";

pub const SUMMARY_INSTRUCTION: &str = "Create a concise summary of the following transcript that captures the main points and key details:";

/// The system prompt wrapping an assembled context.
pub fn system_prompt(context: &str) -> String {
    if context.trim().is_empty() {
        format!("{} {}", ASSISTANT_PREAMBLE, NO_TRANSCRIPT)
    } else {
        format!("{} {}\n\n{}", ASSISTANT_PREAMBLE, CONTEXT_INTRO, context)
    }
}

/// System prompt, then prior turns, then the new question.
pub fn build_messages(context: &str, history: &[ChatMessage], question: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt(context)));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(question));
    messages
}

/// Messages asking for a summary of the whole transcript.
pub fn summary_messages(transcript: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SUMMARY_INSTRUCTION),
        ChatMessage::user(transcript),
    ]
}

/// Parse a `role=content` history argument. Only `user` and `assistant`
/// turns are accepted; the system prompt is always built from the context.
pub fn parse_history_arg(s: &str) -> Result<ChatMessage, String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid ROLE=CONTENT: no '=' found in '{}'", s))?;
    let role: Role = s[..pos].trim().parse()?;
    if role == Role::System {
        return Err("history turns must be user or assistant, not system".to_string());
    }
    Ok(ChatMessage {
        role,
        content: s[pos + 1..].to_string(),
    })
}
