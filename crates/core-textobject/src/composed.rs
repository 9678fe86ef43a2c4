//! Composed patterns and their cartesian expansion.
//!
//! A composed pattern is an ordered list of levels; each level is one pattern
//! or a list of alternatives. Matching works on *nested patterns*: one concrete
//! choice per level. The last level doubles as the extraction template.

use crate::error::{Result, TextobjectError};
use crate::pattern::{Pattern, escape};
use smallvec::SmallVec;

/// Uncompiled level as written by users or configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Level {
    Single(String),
    Alternatives(Vec<String>),
}

impl From<&str> for Level {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl<S: Into<String>> From<Vec<S>> for Level {
    fn from(v: Vec<S>) -> Self {
        Self::Alternatives(v.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPattern {
    levels: Vec<Vec<Pattern>>,
}

/// One concrete pattern per level, borrowed from its composed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedPattern<'a> {
    patterns: SmallVec<[&'a Pattern; 4]>,
}

impl<'a> NestedPattern<'a> {
    pub fn patterns(&self) -> &[&'a Pattern] {
        &self.patterns
    }

    /// Final level, used as extraction template.
    pub fn extraction(&self) -> &'a Pattern {
        // Expansion never yields an empty nested pattern.
        self.patterns[self.patterns.len() - 1]
    }
}

impl ComposedPattern {
    /// Compile and validate `levels` for textobject `id`.
    pub fn new<I, L>(id: char, levels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Level>,
    {
        let invalid = |reason: String| TextobjectError::InvalidTextobjectPattern { id, reason };
        let mut compiled = Vec::new();
        for (idx, level) in levels.into_iter().enumerate() {
            let sources = match level.into() {
                Level::Single(s) => vec![s],
                Level::Alternatives(v) => v,
            };
            if sources.is_empty() {
                return Err(invalid(format!("level {} has no alternatives", idx + 1)));
            }
            let patterns = sources
                .iter()
                .map(|s| Pattern::compile(s).map_err(|e| invalid(e.to_string())))
                .collect::<Result<Vec<_>>>()?;
            compiled.push(patterns);
        }
        if compiled.is_empty() {
            return Err(invalid("no pattern levels".to_string()));
        }
        Ok(Self { levels: compiled })
    }

    /// Fallback for punctuation, whitespace and digits: the character on both
    /// sides, e.g. `_().-()_`.
    pub fn delimited_by(id: char) -> Result<Self> {
        let esc = escape(&id.to_string());
        Self::new(id, [format!("{esc}().-(){esc}")])
    }

    pub fn levels(&self) -> &[Vec<Pattern>] {
        &self.levels
    }

    /// Cartesian product of all level choices.
    ///
    /// Order: the last level varies slowest and alternatives keep their listed
    /// order, so every combination using a level's first alternative precedes
    /// combinations using its second.
    pub fn expand(&self) -> Vec<NestedPattern<'_>> {
        let mut out = vec![NestedPattern {
            patterns: SmallVec::new(),
        }];
        for level in &self.levels {
            let mut next = Vec::with_capacity(out.len() * level.len());
            for choice in level {
                for prefix in &out {
                    let mut patterns = prefix.patterns.clone();
                    patterns.push(choice);
                    next.push(NestedPattern { patterns });
                }
            }
            out = next;
        }
        out
    }
}
