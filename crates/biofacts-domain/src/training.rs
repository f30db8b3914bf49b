//! Training pairs
//!
//! Training pairs come in the two shapes fine-tuning tooling accepts: a chat
//! transcript (`{"messages": [...]}`) or an instruction/output record with
//! free-form metadata.

use crate::category::title_case;
use crate::fact::FactRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System instructions
    System,
    /// End user
    User,
    /// Model reply
    Assistant,
}

/// One message in a chat transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker
    pub role: ChatRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System message
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    /// Assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// An example replayed during fine-tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrainingPair {
    /// Chat transcript
    Chat {
        /// Ordered messages
        messages: Vec<ChatMessage>,
    },
    /// Instruction and expected output
    Instruction {
        /// Prompt text
        instruction: String,
        /// Expected response
        output: String,
        /// Free-form metadata (category, tags, ...)
        #[serde(default, skip_serializing_if = "Map::is_empty")]
        metadata: Map<String, Value>,
    },
}

impl TrainingPair {
    /// Chat pair from a single question and answer
    pub fn chat(question: impl Into<String>, answer: impl Into<String>) -> Self {
        TrainingPair::Chat {
            messages: vec![ChatMessage::user(question), ChatMessage::assistant(answer)],
        }
    }

    /// Derive an instruction pair from a fact
    ///
    /// Deterministic: the same fact and subject always give the same pair.
    pub fn from_fact(fact: &FactRecord, subject: &str) -> Self {
        let topic = title_case(&fact.category).to_lowercase();
        let mut instruction = format!("Tell me something about {}'s {}.", subject, topic);
        if !fact.evidence.is_empty() {
            instruction.push_str(&format!(" Context: {}", fact.evidence));
        }

        let mut metadata = Map::new();
        metadata.insert("category".to_string(), Value::from(fact.category.clone()));
        metadata.insert("confidence".to_string(), Value::from(fact.confidence));
        metadata.insert("importance".to_string(), Value::from(fact.importance.as_str()));
        metadata.insert("verifiable".to_string(), Value::from(fact.verifiable));

        TrainingPair::Instruction {
            instruction,
            output: fact.fact.clone(),
            metadata,
        }
    }

    /// The prompt and response this pair teaches
    ///
    /// For chat pairs this is the last user message and the last assistant
    /// message; `None` when either is missing.
    pub fn prompt_and_response(&self) -> Option<(&str, &str)> {
        match self {
            TrainingPair::Chat { messages } => {
                let last = |role: ChatRole| {
                    messages
                        .iter()
                        .rev()
                        .find(|m| m.role == role)
                        .map(|m| m.content.as_str())
                };
                Some((last(ChatRole::User)?, last(ChatRole::Assistant)?))
            }
            TrainingPair::Instruction { instruction, output, .. } => {
                Some((instruction.as_str(), output.as_str()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Importance;

    #[test]
    fn test_chat_pair_json_shape() {
        let pair = TrainingPair::chat("Where did you study?", "At MIT.");
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(
            json,
            r#"{"messages":[{"role":"user","content":"Where did you study?"},{"role":"assistant","content":"At MIT."}]}"#
        );
    }

    #[test]
    fn test_untagged_parse_both_shapes() {
        let chat: TrainingPair = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"hi"},{"role":"assistant","content":"hello"}]}"#,
        )
        .unwrap();
        assert!(matches!(chat, TrainingPair::Chat { .. }));

        let instruction: TrainingPair =
            serde_json::from_str(r#"{"instruction":"Q","output":"A"}"#).unwrap();
        match instruction {
            TrainingPair::Instruction { metadata, .. } => assert!(metadata.is_empty()),
            _ => panic!("Expected instruction pair"),
        }
    }

    #[test]
    fn test_from_fact_is_deterministic() {
        let fact = FactRecord::new(
            "education",
            "Earned a PhD in robotics",
            0.9,
            "PhD from Stanford",
            Importance::High,
            true,
        );
        let a = TrainingPair::from_fact(&fact, "Dr. Marcus Chen");
        let b = TrainingPair::from_fact(&fact, "Dr. Marcus Chen");
        assert_eq!(a, b);

        let (prompt, response) = a.prompt_and_response().unwrap();
        assert!(prompt.contains("Dr. Marcus Chen's education"));
        assert!(prompt.contains("PhD from Stanford"));
        assert_eq!(response, "Earned a PhD in robotics");

        match a {
            TrainingPair::Instruction { metadata, .. } => {
                assert_eq!(metadata["category"], "education");
                assert_eq!(metadata["importance"], "high");
            }
            _ => panic!("Expected instruction pair"),
        }
    }

    #[test]
    fn test_prompt_and_response_uses_last_exchange() {
        let pair = TrainingPair::Chat {
            messages: vec![
                ChatMessage::user("first"),
                ChatMessage::assistant("one"),
                ChatMessage::user("second"),
                ChatMessage::assistant("two"),
            ],
        };
        assert_eq!(pair.prompt_and_response(), Some(("second", "two")));

        let pair = TrainingPair::Chat { messages: vec![ChatMessage::user("only")] };
        assert_eq!(pair.prompt_and_response(), None);
    }
}
