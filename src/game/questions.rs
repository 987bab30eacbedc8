//! Scripture quiz questions asked while exploring.

use crate::error::Result;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Bundled question bank (JSON).
pub const DEFAULT_QUESTIONS: &str = include_str!("../../assets/questions.json");

/// How hard a question is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionDifficulty {
    /// Well-known passages.
    Preliminary,
    /// Needs closer reading.
    Competent,
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonQuestion {
    /// Stable identifier within the bank.
    pub id: u32,
    /// Prompt shown to the player.
    pub question: String,
    /// Choices, in display order.
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
    /// Passage the answer comes from, shown after answering.
    pub bible_reference: String,
    /// How hard the question is.
    pub difficulty: QuestionDifficulty,
}

impl DungeonQuestion {
    /// Whether `choice` is the correct option index.
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_answer
    }
}

/// A set of questions to draw from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionBank {
    questions: Vec<DungeonQuestion>,
}

impl QuestionBank {
    /// Parses a JSON array of questions.
    pub fn from_json(json: &str) -> Result<Self> {
        let questions: Vec<DungeonQuestion> = serde_json::from_str(json)?;
        debug!(count = questions.len(), "question bank loaded");
        Ok(Self { questions })
    }

    /// Wraps an existing list of questions.
    pub fn new(questions: Vec<DungeonQuestion>) -> Self {
        Self { questions }
    }

    /// Keeps only questions of the given difficulty; `None` keeps everything.
    pub fn filtered(self, difficulty: Option<QuestionDifficulty>) -> Self {
        match difficulty {
            Some(d) => Self {
                questions: self
                    .questions
                    .into_iter()
                    .filter(|q| q.difficulty == d)
                    .collect(),
            },
            None => self,
        }
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether there is nothing to ask.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// All questions, in file order.
    pub fn questions(&self) -> &[DungeonQuestion] {
        &self.questions
    }

    /// Picks a question uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&DungeonQuestion> {
        self.questions.choose(rng)
    }
}

/// The bundled bank.
///
/// The asset is compiled in, so a parse failure means a broken build. It is
/// logged and play continues without questions.
pub fn default_bank() -> QuestionBank {
    bank_or_empty(DEFAULT_QUESTIONS)
}

fn bank_or_empty(json: &str) -> QuestionBank {
    match QuestionBank::from_json(json) {
        Ok(bank) => bank,
        Err(e) => {
            warn!(error = %e, "Question bank failed to parse, no questions will be asked");
            QuestionBank::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn test_bundled_bank_parses() {
        let bank = QuestionBank::from_json(DEFAULT_QUESTIONS).unwrap();
        assert_eq!(bank.len(), 7);
        for q in bank.questions() {
            assert!(q.correct_answer < q.options.len(), "question {}", q.id);
        }
    }

    #[test]
    fn test_filter_by_difficulty() {
        let bank = default_bank();
        let preliminary = bank.clone().filtered(Some(QuestionDifficulty::Preliminary));
        let competent = bank.clone().filtered(Some(QuestionDifficulty::Competent));
        assert_eq!(preliminary.len() + competent.len(), bank.len());
        assert!(
            competent
                .questions()
                .iter()
                .all(|q| q.difficulty == QuestionDifficulty::Competent)
        );
        assert_eq!(bank.clone().filtered(None), bank);
    }

    #[test]
    fn test_pick_from_empty_bank() {
        let bank = QuestionBank::default();
        assert!(bank.pick(&mut StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn test_is_correct() {
        let bank = default_bank();
        let q = &bank.questions()[1];
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(QuestionBank::from_json("{ not json").is_err());
    }

    #[test]
    fn test_unparsable_bank_falls_back_to_empty() {
        assert!(bank_or_empty("{ not json").is_empty());
        assert_eq!(bank_or_empty(DEFAULT_QUESTIONS), default_bank());
        assert!(!default_bank().is_empty());
    }
}
