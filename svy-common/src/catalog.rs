//! Question catalog
//!
//! Immutable ordered list of yes/no question texts. Defines the question
//! count N and the canonical index order every respondent walks through.

use serde::Serialize;

use crate::{Error, Result};

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub index: usize,
    pub text: String,
}

/// Fixed, ordered set of questions (N >= 1)
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Build a catalog from question texts in canonical order
    ///
    /// Fails with [`Error::Config`] when the list is empty or contains a blank text.
    pub fn new<I, S>(texts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let questions: Vec<Question> = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Question { index, text: text.into() })
            .collect();

        if questions.is_empty() {
            return Err(Error::Config("question catalog must contain at least one question".to_string()));
        }
        if let Some(blank) = questions.iter().find(|q| q.text.trim().is_empty()) {
            return Err(Error::Config(format!("question {} has empty text", blank.index)));
        }

        Ok(Self { questions })
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.questions.len()
    }

    /// Text of the question at `index`
    pub fn text_at(&self, index: usize) -> Result<&str> {
        self.questions
            .get(index)
            .map(|q| q.text.as_str())
            .ok_or(Error::OutOfRange { index, count: self.questions.len() })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
