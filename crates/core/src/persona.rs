//! Persona and knowledge base: who the agent speaks as, and what it knows.
//!
//! Both are loaded once at startup and shared read-only by every turn. The
//! framing instructions (the system message that opens every working
//! transcript) are derived from them and never change for the lifetime of
//! the process.

use serde::{Deserialize, Serialize};

/// Tool names referenced by the framing instructions.
pub const RECORD_USER_DETAILS: &str = "record_user_details";
pub const RECORD_UNKNOWN_QUESTION: &str = "record_unknown_question";

/// The person the agent represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Display name; the agent introduces itself with it
    pub name: String,

    /// What visitors come to ask about
    pub topics: String,

    /// Opening line shown by a chat surface before the first turn
    pub greeting: String,
}

impl Persona {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            greeting: default_greeting(&name),
            topics: "career, background, skills and experience".into(),
            name,
        }
    }

    pub fn with_topics(mut self, topics: impl Into<String>) -> Self {
        self.topics = topics.into();
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::new("Gotham")
    }
}

fn default_greeting(name: &str) -> String {
    format!("Hi! I'm {name}. Feel free to ask me about my background, skills, or experience!")
}

/// The static knowledge embedded into every conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Text extracted from the profile document (resume / LinkedIn export)
    pub profile: String,

    /// Free-form summary written by the persona's owner
    pub summary: String,
}

impl KnowledgeBase {
    pub fn new(profile: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            summary: summary.into(),
        }
    }

    /// Rough token estimate (4 chars ≈ 1 token).
    pub fn estimated_tokens(&self) -> usize {
        (self.profile.len() + self.summary.len()) / 4
    }
}

/// Build the framing instructions for a persona.
///
/// The result states the persona and its subject, tells the model to greet
/// first, to steer engaged visitors toward leaving an email, to record
/// unanswerable questions, and embeds both knowledge blobs verbatim.
pub fn framing_instructions(persona: &Persona, knowledge: &KnowledgeBase) -> String {
    let name = &persona.name;
    let topics = &persona.topics;
    let mut prompt = format!(
        "You are acting as {name}. You are answering questions on {name}'s website, \
         particularly questions related to {name}'s {topics}.\n\
         Greet the user as soon as the conversation starts and refer to yourself as {name}.\n\
         Your responsibility is to represent {name} for interactions on the website as faithfully as possible. \
         You are given a summary of {name}'s background and profile which you can use to answer questions.\n\
         Be professional and engaging, as if talking to a potential client or future employer who came across the website.\n\
         If you don't know the answer to any question, use your {RECORD_UNKNOWN_QUESTION} tool to record the question \
         that you couldn't answer, even if it's about something trivial or unrelated to {topics}.\n\
         If the user is engaging in discussion, try to steer them towards getting in touch via email; \
         ask for their email and record it using your {RECORD_USER_DETAILS} tool.\n"
    );
    prompt.push_str(&format!("\n## Summary\n{}\n", knowledge.summary));
    prompt.push_str(&format!("\n## Profile\n{}\n", knowledge.profile));
    prompt.push_str(&format!(
        "\nWith this context, please chat with the user, always staying in character as {name}."
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_embeds_knowledge_verbatim() {
        let kb = KnowledgeBase::new("Led the Rust rewrite at Acme.\n", "Loves distributed systems.");
        let prompt = framing_instructions(&Persona::new("Ada"), &kb);
        assert!(prompt.contains("Led the Rust rewrite at Acme.\n"));
        assert!(prompt.contains("Loves distributed systems."));
    }

    #[test]
    fn framing_names_persona_and_tools() {
        let prompt = framing_instructions(&Persona::new("Ada"), &KnowledgeBase::default());
        assert!(prompt.starts_with("You are acting as Ada."));
        assert!(prompt.contains("Greet the user"));
        assert!(prompt.contains(RECORD_USER_DETAILS));
        assert!(prompt.contains(RECORD_UNKNOWN_QUESTION));
        assert!(prompt.contains("staying in character as Ada"));
    }

    #[test]
    fn custom_topics_flow_into_prompt() {
        let persona = Persona::new("Ada").with_topics("research and publications");
        let prompt = framing_instructions(&persona, &KnowledgeBase::default());
        assert!(prompt.contains("Ada's research and publications"));
    }

    #[test]
    fn default_greeting_uses_name() {
        assert!(Persona::new("Ada").greeting.contains("I'm Ada"));
    }
}
