//! Textobject id → composed pattern lookup.
//!
//! Lookup order is: custom entries, then built-ins, then a synthetic
//! "same character on both sides" textobject for ASCII punctuation, whitespace
//! and digits. Any other id is unknown.

use crate::composed::{ComposedPattern, Level};
use crate::error::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Zero-argument producer of a composed pattern. May have side effects (for
/// example prompting the user); invoked once per search call.
pub type SpecFn = dyn Fn() -> Result<ComposedPattern> + Send + Sync;

/// A registered textobject.
#[derive(Clone)]
pub enum TextobjectSpec {
    Pattern(ComposedPattern),
    /// Uncompiled levels; compiled each time the id is resolved, so a bad
    /// entry only fails requests for its own id.
    Levels(Vec<Level>),
    Callable(Arc<SpecFn>),
}

impl TextobjectSpec {
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn() -> Result<ComposedPattern> + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }

    fn produce(&self, id: char) -> Result<ComposedPattern> {
        match self {
            Self::Pattern(p) => Ok(p.clone()),
            Self::Levels(levels) => ComposedPattern::new(id, levels.iter().cloned()),
            Self::Callable(f) => f(),
        }
    }
}

impl fmt::Debug for TextobjectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            Self::Levels(l) => f.debug_tuple("Levels").field(l).finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

impl From<ComposedPattern> for TextobjectSpec {
    fn from(p: ComposedPattern) -> Self {
        Self::Pattern(p)
    }
}

/// Resolves a textobject id to its composed pattern.
pub trait SpecProvider {
    /// `Ok(None)` for ids without a textobject.
    fn resolve(&self, id: char) -> Result<Option<ComposedPattern>>;
}

impl<P: SpecProvider + ?Sized> SpecProvider for &P {
    fn resolve(&self, id: char) -> Result<Option<ComposedPattern>> {
        (**self).resolve(id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    custom: HashMap<char, TextobjectSpec>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `spec` under `id`, shadowing any built-in. Returns the
    /// previous custom entry.
    pub fn insert(&mut self, id: char, spec: impl Into<TextobjectSpec>) -> Option<TextobjectSpec> {
        self.custom.insert(id, spec.into())
    }

    /// Register uncompiled `levels` under `id`. Validation is deferred to
    /// [`SpecProvider::resolve`] for that id.
    pub fn insert_levels<I, L>(&mut self, id: char, levels: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<Level>,
    {
        let levels = levels.into_iter().map(Into::into).collect();
        self.custom.insert(id, TextobjectSpec::Levels(levels));
    }

    /// Whether `id` resolves to anything, without invoking callables.
    pub fn contains(&self, id: char) -> bool {
        self.custom.contains_key(&id) || BUILTIN_IDS.contains(&id) || is_fallback_id(id)
    }

    pub fn custom_ids(&self) -> impl Iterator<Item = char> + '_ {
        self.custom.keys().copied()
    }
}

impl SpecProvider for Registry {
    fn resolve(&self, id: char) -> Result<Option<ComposedPattern>> {
        if let Some(spec) = self.custom.get(&id) {
            return spec.produce(id).map(Some);
        }
        if let Some(composed) = builtin(id)? {
            return Ok(Some(composed));
        }
        if is_fallback_id(id) {
            return ComposedPattern::delimited_by(id).map(Some);
        }
        Ok(None)
    }
}

const BUILTIN_IDS: [char; 12] = ['(', ')', '[', ']', '{', '}', '<', '>', 'b', 'q', 't', 'f'];

const TIGHT: &str = "^.().*().$";
const SPACED: &str = "^.%s*().-()%s*.$";

fn builtin(id: char) -> Result<Option<ComposedPattern>> {
    let composed = match id {
        '(' => ComposedPattern::new(id, ["%b()", SPACED]),
        '[' => ComposedPattern::new(id, ["%b[]", SPACED]),
        '{' => ComposedPattern::new(id, ["%b{}", SPACED]),
        '<' => ComposedPattern::new(id, ["%b<>", SPACED]),
        ')' => ComposedPattern::new(id, ["%b()", TIGHT]),
        ']' => ComposedPattern::new(id, ["%b[]", TIGHT]),
        '}' => ComposedPattern::new(id, ["%b{}", TIGHT]),
        '>' => ComposedPattern::new(id, ["%b<>", TIGHT]),
        'b' => ComposedPattern::new(id, [Level::from(vec!["%b()", "%b[]", "%b{}"]), Level::from(TIGHT)]),
        'q' => ComposedPattern::new(id, [Level::from(vec!["%b''", "%b\"\"", "%b``"]), Level::from(TIGHT)]),
        't' => ComposedPattern::new(id, ["<(%w-)%f[^<%w][^<>]->.-</%1>", "^<.->().*()</[^/]->$"]),
        'f' => ComposedPattern::new(id, ["%f[%w_%.][%w_%.]+%b()", "^.-%(().*()%)$"]),
        _ => return Ok(None),
    };
    composed.map(Some)
}

fn is_fallback_id(id: char) -> bool {
    id.is_ascii_punctuation() || id.is_ascii_whitespace() || id.is_ascii_digit()
}
