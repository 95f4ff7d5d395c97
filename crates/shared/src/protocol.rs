use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::{
    domain::{Category, VoteKind, MAX_FACT_TEXT_CHARS},
    error::DraftError,
};

/// Insert payload. Ids and counters are filled in by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFact {
    pub text: String,
    pub source: String,
    pub category: Category,
}

/// Raw form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactDraft {
    pub text: String,
    pub source: String,
    /// Empty until a category is picked.
    pub category: String,
}

impl FactDraft {
    pub fn new(
        text: impl Into<String>,
        source: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            category: category.into(),
        }
    }

    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Character budget left; negative once the text is over the limit.
    pub fn remaining_chars(&self) -> i64 {
        MAX_FACT_TEXT_CHARS as i64 - self.text_len() as i64
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.source.is_empty() && self.category.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.source.clear();
        self.category.clear();
    }

    pub fn validate(&self) -> Result<NewFact, DraftError> {
        if self.text.is_empty() {
            return Err(DraftError::EmptyText);
        }
        let len = self.text_len();
        if len > MAX_FACT_TEXT_CHARS {
            return Err(DraftError::TextTooLong {
                len,
                max: MAX_FACT_TEXT_CHARS,
            });
        }
        if !is_valid_http_url(&self.source) {
            return Err(DraftError::InvalidSource(self.source.clone()));
        }
        if self.category.is_empty() {
            return Err(DraftError::MissingCategory);
        }
        let category = self
            .category
            .parse::<Category>()
            .map_err(|_| DraftError::UnknownCategory(self.category.clone()))?;

        Ok(NewFact {
            text: self.text.clone(),
            source: self.source.clone(),
            category,
        })
    }
}

pub fn is_valid_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Update body setting one counter to `current + 1`.
pub fn vote_increment_body(kind: VoteKind, current: u32) -> Value {
    let mut body = Map::new();
    body.insert(
        kind.column().to_string(),
        Value::from(u64::from(current) + 1),
    );
    Value::Object(body)
}
