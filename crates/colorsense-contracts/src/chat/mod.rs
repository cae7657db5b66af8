mod persona;
mod tips;

pub use persona::{general_prompt, DEFAULT_PERSONA};
pub use tips::{clean_tips, parse_tips_subject, tips_prompt, TipsSubject, NO_TIPS_FALLBACK};

/// Phrase that routes a chat message to the tips flow.
pub const TIPS_TRIGGER: &str = "Generate 3 specific tips for using";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRoute {
    Tips,
    General,
}

pub fn route_message(message: &str) -> ChatRoute {
    if message.contains(TIPS_TRIGGER) {
        ChatRoute::Tips
    } else {
        ChatRoute::General
    }
}
