use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(FactId);

/// Longest accepted fact text, counted in characters.
pub const MAX_FACT_TEXT_CHARS: usize = 200;

/// Upper bound on rows returned by a single list read.
pub const FACT_PAGE_LIMIT: usize = 20;

pub const ALL_CATEGORIES_SENTINEL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Science,
    Finance,
    Society,
    Entertainment,
    Health,
    History,
    News,
}

impl Category {
    /// Sidebar order.
    pub const ALL: [Category; 8] = [
        Category::Technology,
        Category::Science,
        Category::Finance,
        Category::Society,
        Category::Entertainment,
        Category::Health,
        Category::History,
        Category::News,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Science => "science",
            Category::Finance => "finance",
            Category::Society => "society",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::History => "history",
            Category::News => "news",
        }
    }

    /// Display color as `#rrggbb`.
    pub fn color(self) -> &'static str {
        match self {
            Category::Technology => "#3b82f6",
            Category::Science => "#16a34a",
            Category::Finance => "#ef4444",
            Category::Society => "#eab308",
            Category::Entertainment => "#db2777",
            Category::Health => "#14b8a6",
            Category::History => "#f97316",
            Category::News => "#8b5cf6",
        }
    }

    pub fn color_rgb(self) -> [u8; 3] {
        parse_hex_color(self.color()).unwrap_or([0x80, 0x80, 0x80])
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("category {category} has malformed color '{color}'")]
    MalformedColor {
        category: Category,
        color: &'static str,
    },
    #[error("categories {first} and {second} share color {color}")]
    DuplicateColor {
        first: Category,
        second: Category,
        color: &'static str,
    },
    #[error("category name '{0}' is listed more than once")]
    DuplicateName(&'static str),
}

/// Startup check that every category has a distinct, well-formed color and name.
pub fn validate_palette() -> Result<(), PaletteError> {
    for (index, category) in Category::ALL.iter().copied().enumerate() {
        if parse_hex_color(category.color()).is_none() {
            return Err(PaletteError::MalformedColor {
                category,
                color: category.color(),
            });
        }
        for other in Category::ALL.iter().copied().skip(index + 1) {
            if other.name() == category.name() {
                return Err(PaletteError::DuplicateName(category.name()));
            }
            if other.color().eq_ignore_ascii_case(category.color()) {
                return Err(PaletteError::DuplicateColor {
                    first: category,
                    second: other,
                    color: category.color(),
                });
            }
        }
    }
    Ok(())
}

fn parse_hex_color(raw: &str) -> Option<[u8; 3]> {
    let hex = raw.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Active sidebar selection: the "all" sentinel or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn category(self) -> Option<Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(category),
        }
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(value: Category) -> Self {
        CategoryFilter::Only(value)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES_SENTINEL),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL_CATEGORIES_SENTINEL) {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Likes,
    Upvotes,
    Downvotes,
}

impl VoteKind {
    pub const ALL: [VoteKind; 3] = [VoteKind::Likes, VoteKind::Upvotes, VoteKind::Downvotes];

    /// Backend column holding this counter.
    pub fn column(self) -> &'static str {
        match self {
            VoteKind::Likes => "likes",
            VoteKind::Upvotes => "upvotes",
            VoteKind::Downvotes => "downvotes",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vote counter '{0}' (expected likes, upvotes or downvotes)")]
pub struct UnknownVoteKind(pub String);

impl FromStr for VoteKind {
    type Err = UnknownVoteKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        VoteKind::ALL
            .into_iter()
            .find(|kind| kind.column().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVoteKind(s.to_string()))
    }
}

/// A stored fact row. The backend owns ids and counter defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,
    pub text: String,
    pub source: String,
    pub category: Category,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Fact {
    pub fn votes(&self, kind: VoteKind) -> u32 {
        match kind {
            VoteKind::Likes => self.likes,
            VoteKind::Upvotes => self.upvotes,
            VoteKind::Downvotes => self.downvotes,
        }
    }

    pub fn is_disputed(&self) -> bool {
        u64::from(self.likes) + u64::from(self.upvotes) < u64::from(self.downvotes)
    }
}
