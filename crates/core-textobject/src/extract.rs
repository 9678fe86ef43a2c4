//! Around/inside sub-span extraction from a matched span.

use crate::error::{Result, TextobjectError};
use crate::pattern::{Capture, Pattern};
use crate::region::Span;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiType {
    /// `a`: delimiters included.
    Around,
    /// `i`: delimiters excluded.
    Inside,
}

impl AiType {
    pub const fn as_char(self) -> char {
        match self {
            Self::Around => 'a',
            Self::Inside => 'i',
        }
    }
}

impl TryFrom<char> for AiType {
    type Error = TextobjectError;

    fn try_from(c: char) -> Result<Self> {
        match c {
            'a' => Ok(Self::Around),
            'i' => Ok(Self::Inside),
            other => Err(TextobjectError::InvalidAiType(other.to_string())),
        }
    }
}

impl FromStr for AiType {
    type Err = TextobjectError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(TextobjectError::InvalidAiType(s.to_string())),
        }
    }
}

impl fmt::Display for AiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Sub-span of `matched` selected by `ai_type`, 1-based and local to
/// `matched`.
///
/// The extraction pattern must yield exactly two or four position captures:
/// * two (`p1`, `p2`): around is the whole match, inside is `[p1, p2 - 1]`;
/// * four: around is `[p1, p4 - 1]`, inside is `[p2, p3 - 1]`.
pub fn extract_subspan(matched: &[u8], extraction: &Pattern, ai_type: AiType) -> Result<Span> {
    let invalid = || TextobjectError::InvalidExtraction {
        matched: String::from_utf8_lossy(matched).into_owned(),
        pattern: extraction.as_str().to_string(),
    };
    let captures = extraction.captures(matched).ok_or_else(invalid)?;
    let positions = captures
        .iter()
        .map(|c| match c {
            Capture::Position(p) => Some(*p),
            Capture::Text { .. } => None,
        })
        .collect::<Option<SmallVec<[usize; 4]>>>()
        .ok_or_else(invalid)?;

    match (positions.as_slice(), ai_type) {
        ([_, _], AiType::Around) => Ok(Span::new(1, matched.len())),
        ([p1, p2], AiType::Inside) => Ok(Span::new(*p1, p2 - 1)),
        ([p1, _, _, p4], AiType::Around) => Ok(Span::new(*p1, p4 - 1)),
        ([_, p2, p3, _], AiType::Inside) => Ok(Span::new(*p2, p3 - 1)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pat(s: &str) -> Pattern {
        Pattern::compile(s).unwrap()
    }

    #[test]
    fn two_captures_split_delimiters() {
        let p = pat("^.().*().$");
        assert_eq!(extract_subspan(b"(bb)", &p, AiType::Around).unwrap(), Span::new(1, 4));
        assert_eq!(extract_subspan(b"(bb)", &p, AiType::Inside).unwrap(), Span::new(2, 3));
    }

    #[test]
    fn empty_inside_is_an_empty_span() {
        let p = pat("^.().*().$");
        let inside = extract_subspan(b"()", &p, AiType::Inside).unwrap();
        assert_eq!(inside, Span::new(2, 1));
        assert!(inside.is_empty());
    }

    #[test]
    fn four_captures_trim_whitespace_inside() {
        let p = pat("^.()%s*().-()%s*().$");
        let m = b"(  x  )";
        assert_eq!(extract_subspan(m, &p, AiType::Around).unwrap(), Span::new(2, 6));
        assert_eq!(extract_subspan(m, &p, AiType::Inside).unwrap(), Span::new(4, 4));
    }

    #[test]
    fn wrong_capture_shape_is_invalid_extraction() {
        for source in ["^.(.*).$", "^().*$", "^()()().*$", "%d"] {
            let err = extract_subspan(b"(bb)", &pat(source), AiType::Inside).unwrap_err();
            assert!(
                matches!(err, TextobjectError::InvalidExtraction { .. }),
                "{source}: {err}"
            );
        }
    }

    #[test]
    fn extraction_is_pure() {
        let p = pat("^.().*().$");
        let first = extract_subspan(b"[abc]", &p, AiType::Inside).unwrap();
        assert_eq!(first, extract_subspan(b"[abc]", &p, AiType::Inside).unwrap());
    }

    #[test]
    fn ai_type_parsing() {
        assert_eq!("a".parse::<AiType>().unwrap(), AiType::Around);
        assert_eq!(AiType::try_from('i').unwrap(), AiType::Inside);
        assert!(matches!("ai".parse::<AiType>(), Err(TextobjectError::InvalidAiType(_))));
        assert_eq!(AiType::Inside.to_string(), "i");
    }
}
