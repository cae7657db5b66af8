use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;

use colorsense_contracts::chat::{
    clean_tips, general_prompt, parse_tips_subject, route_message, tips_prompt, ChatRoute,
    DEFAULT_PERSONA,
};

use crate::providers::TextGenerator;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("No message provided")]
    MissingMessage,
    #[error("Could not extract color information from request")]
    MalformedTipsRequest,
    #[error("language model is not configured")]
    NotConfigured,
    #[error("language model returned an empty response")]
    EmptyResponse,
    #[error("language model request failed: {0:#}")]
    Model(anyhow::Error),
}

impl ChatError {
    /// Whether the caller sent something unusable, as opposed to a
    /// server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingMessage | Self::MalformedTipsRequest)
    }
}

/// Answers consultant chat messages through a text generator.
#[derive(Clone)]
pub struct ChatService {
    generator: Option<Arc<dyn TextGenerator>>,
    persona: String,
}

impl ChatService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            persona: DEFAULT_PERSONA.to_string(),
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn respond(&self, message: &str) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::MissingMessage);
        }
        match route_message(message) {
            ChatRoute::Tips => self.tips(message),
            ChatRoute::General => self.general(message),
        }
    }

    /// One tip per line.
    fn tips(&self, message: &str) -> Result<String, ChatError> {
        let subject = parse_tips_subject(message).ok_or(ChatError::MalformedTipsRequest)?;
        info!("Generating tips for {} ({})", subject.name, subject.code);
        let raw = self.generate(&tips_prompt(&subject))?;
        Ok(clean_tips(&raw).join("\n"))
    }

    fn general(&self, message: &str) -> Result<String, ChatError> {
        let raw = self.generate(&general_prompt(&self.persona, message))?;
        Ok(raw.trim().to_string())
    }

    fn generate(&self, prompt: &str) -> Result<String, ChatError> {
        let generator = self.generator.as_ref().ok_or(ChatError::NotConfigured)?;
        let text = generator.generate_text(prompt).map_err(|err| {
            warn!("{} generation failed: {err:#}", generator.name());
            ChatError::Model(err)
        })?;
        if text.trim().is_empty() {
            return Err(ChatError::EmptyResponse);
        }
        Ok(text)
    }
}
