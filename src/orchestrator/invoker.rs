//! Prompt composition for a single agent exchange.

use crate::agent::Agent;
use crate::provider::{ChatMessage, ChatRequest, CompletionOptions};
use crate::skill::Skill;

/// Header placed between the agent template and its skill blocks.
pub const SKILLS_HEADER: &str = "\n\n# Your Available Skills:\n";

/// Agent template followed by one delimited block per skill, in list order.
pub fn compose_system_prompt(template: &str, skills: &[Skill]) -> String {
    if skills.is_empty() {
        return template.to_string();
    }
    let mut prompt = template.to_string();
    prompt.push_str(SKILLS_HEADER);
    for skill in skills {
        prompt.push('\n');
        prompt.push_str(&skill.content);
        prompt.push('\n');
    }
    prompt
}

/// System prompt, then optional prior-result context, then the live query.
pub fn build_messages(
    system_prompt: String,
    query: &str,
    context: Option<&str>,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt)];
    if let Some(context) = context {
        messages.push(ChatMessage::user(format!("Context:\n{}", context)));
    }
    messages.push(ChatMessage::user(query));
    messages
}

/// Full chat request for one agent invocation.
pub fn build_request(
    agent: &Agent,
    query: &str,
    skills: &[Skill],
    context: Option<&str>,
) -> ChatRequest {
    let system_prompt = compose_system_prompt(&agent.system_prompt, skills);
    ChatRequest {
        model: agent.model.clone(),
        messages: build_messages(system_prompt, query, context),
        options: CompletionOptions::default(),
    }
}
