//! Extraction categories
//!
//! Each category scopes one extraction request. The default list is fixed
//! and ordered; extraction walks it front to back.

use serde::{Deserialize, Serialize};

/// A topical bucket and the instructions that go with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Category name, e.g. "education"
    pub name: String,

    /// Category-specific extraction instructions
    pub instructions: String,
}

impl CategorySpec {
    /// Create a category spec
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
        }
    }

    /// Human-readable title: "career_professional" becomes "Career Professional"
    pub fn title(&self) -> String {
        title_case(&self.name)
    }
}

/// Convert a snake_case name to a space separated title
pub fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    (
        "personal_demographics",
        "Extract basic demographic and personal information including:
- Birth date, age, birthplace
- Family members and relationships
- Physical characteristics if mentioned
- Cultural background and languages",
    ),
    (
        "education",
        "Extract educational background including:
- Schools attended with dates
- Degrees earned
- Academic achievements and honors
- Significant professors or mentors
- Thesis topics or research areas",
    ),
    (
        "career_professional",
        "Extract career and professional information including:
- Job positions and employers
- Research areas and specializations
- Publications, patents, or professional achievements
- Professional transitions and career moves",
    ),
    (
        "personality_traits",
        "Extract personality characteristics including:
- Work style and approach to problems
- Social preferences and interpersonal style
- Described character traits
- Behavioral patterns and tendencies",
    ),
    (
        "interests_hobbies",
        "Extract interests and hobbies including:
- Personal interests and pastimes
- Skills or activities outside of work
- Collections or specialized knowledge areas
- Recreational activities",
    ),
    (
        "relationships_social",
        "Extract relationship and social information including:
- Marriage and romantic relationships
- Children and family dynamics
- Professional relationships and mentoring
- Social preferences and interaction patterns",
    ),
    (
        "values_beliefs",
        "Extract values and beliefs including:
- Professional ethics and principles
- Personal values and priorities
- Beliefs about science, life, or society
- Motivations and driving principles",
    ),
    (
        "communication_style",
        "Extract communication and interaction patterns including:
- Speaking or writing style
- How they interact with students or colleagues
- Communication preferences
- Language use and expression patterns",
    ),
    (
        "decision_making",
        "Extract decision-making patterns including:
- How they approach major life or career decisions
- Problem-solving methodology
- Risk tolerance and decision criteria
- Examples of significant choices made",
    ),
    (
        "current_status",
        "Extract current life status including:
- Current position and responsibilities
- Ongoing projects or research
- Recent developments or changes
- Current family or personal situation",
    ),
];

/// The fixed, ordered list of extraction categories
pub fn default_categories() -> Vec<CategorySpec> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, instructions)| CategorySpec::new(*name, *instructions))
        .collect()
}
