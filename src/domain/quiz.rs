//! Quiz step definitions. Static content embedded at build time.

use serde::Deserialize;

const EMBEDDED_QUIZ: &str = include_str!("../../data/quiz.json");

#[derive(Debug, Clone, Deserialize)]
pub struct QuizStep {
    pub title: String,
    pub options: Vec<String>,
    /// Several options may be picked.
    #[serde(default)]
    pub multiple: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quiz {
    pub steps: Vec<QuizStep>,
}

impl Quiz {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The quiz shipped with the binary.
    pub fn embedded() -> Result<Self, serde_json::Error> {
        Self::from_json(EMBEDDED_QUIZ)
    }
}
