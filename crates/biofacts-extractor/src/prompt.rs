//! LLM prompt engineering for fact extraction and pair synthesis

use biofacts_domain::{CategorySpec, CompletionRequest, FactRecord};

/// System message for per-category extraction
pub const EXTRACTION_SYSTEM: &str = "You are an expert at extracting structured information \
from biographical text. Always return valid JSON.";

/// System message for training-pair synthesis
pub const SYNTHESIS_SYSTEM: &str =
    "Generate training data for fine-tuning based on biographical facts.";

/// Builds the extraction prompt for one category
pub struct PromptBuilder<'a> {
    text: &'a str,
    category: &'a CategorySpec,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(text: &'a str, category: &'a CategorySpec) -> Self {
        Self { text, category }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "Extract information from the following biography for the category: {}\n\n",
            self.category.name
        ));

        prompt.push_str("Biography:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(&self.category.instructions);
        prompt.push_str("\n\n");

        prompt.push_str(&OUTPUT_FORMAT_TEMPLATE.replace("{category}", &self.category.name));

        prompt
    }

    /// Wrap the prompt in a completion request
    pub fn request(&self, temperature: f32, max_tokens: u32) -> CompletionRequest {
        CompletionRequest::new(EXTRACTION_SYSTEM, self.build(), temperature, max_tokens)
    }
}

const OUTPUT_FORMAT_TEMPLATE: &str = r#"Return the results as a valid JSON array where each object has these fields:
- "fact": The specific factual statement
- "category": "{category}"
- "confidence": A number between 0.0 and 1.0 indicating confidence
- "evidence": The specific text from the biography that supports this fact
- "importance": "high", "medium", or "low"
- "verifiable": true or false

IMPORTANT: Return ONLY the JSON array, no other text."#;

/// Builds the training-pair synthesis prompt
pub struct SynthesisPromptBuilder<'a> {
    subject: &'a str,
    facts: &'a [FactRecord],
    sample_size: usize,
    min_pairs: usize,
    max_pairs: usize,
}

impl<'a> SynthesisPromptBuilder<'a> {
    /// Create a synthesis prompt over `facts`
    pub fn new(subject: &'a str, facts: &'a [FactRecord]) -> Self {
        Self {
            subject,
            facts,
            sample_size: 20,
            min_pairs: 50,
            max_pairs: 100,
        }
    }

    /// Cap on facts included in the prompt
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Requested number of pairs
    pub fn with_pair_range(mut self, min_pairs: usize, max_pairs: usize) -> Self {
        self.min_pairs = min_pairs;
        self.max_pairs = max_pairs;
        self
    }

    /// Build the prompt
    pub fn build(&self) -> Result<String, serde_json::Error> {
        let sample = &self.facts[..self.facts.len().min(self.sample_size)];
        let facts_json = serde_json::to_string_pretty(sample)?;

        let mut prompt = String::new();
        prompt.push_str(&format!(
            "Based on these facts about {}, generate conversation training pairs.\n\n",
            self.subject
        ));
        prompt.push_str("Facts:\n");
        prompt.push_str(&facts_json);
        prompt.push_str("\n\n");
        prompt.push_str(&format!(
            "Generate {}-{} training pairs in this format:\n",
            self.min_pairs, self.max_pairs
        ));
        prompt.push_str(&SYNTHESIS_GUIDANCE.replace("{subject}", self.subject));
        Ok(prompt)
    }

    /// Wrap the prompt in a completion request
    pub fn request(
        &self,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<CompletionRequest, serde_json::Error> {
        Ok(CompletionRequest::new(SYNTHESIS_SYSTEM, self.build()?, temperature, max_tokens))
    }
}

const SYNTHESIS_GUIDANCE: &str = r#"[
  {
    "messages": [
      {"role": "user", "content": "Question about {subject}"},
      {"role": "assistant", "content": "Response as if you are {subject} or representing their knowledge and personality"}
    ]
  }
]

Include various question types:
- Direct biographical questions
- Questions about their research or expertise
- Questions about their opinions or approach to problems
- Questions about their experiences or stories

Make the responses authentic to their personality and background.
Return ONLY the JSON array."#;
