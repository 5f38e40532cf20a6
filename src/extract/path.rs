use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldPathError {
    #[error("field path `{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("field path `{0}` ends with a dangling escape")]
    DanglingEscape(String),
}

/// Dot-separated address into a JSON document, e.g. `data.first_name`.
///
/// A backslash escapes a literal dot inside a key (`browsers.chrome.100\.0`).
/// The empty string addresses the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Result<Self, FieldPathError> {
        if raw.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = raw.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some(next) => current.push(next),
                    None => return Err(FieldPathError::DanglingEscape(raw.to_string())),
                },
                '.' => {
                    if current.is_empty() {
                        return Err(FieldPathError::EmptySegment(raw.to_string()));
                    }
                    segments.push(std::mem::take(&mut current));
                }
                _ => current.push(ch),
            }
        }

        if current.is_empty() {
            return Err(FieldPathError::EmptySegment(raw.to_string()));
        }
        segments.push(current);

        Ok(Self { segments })
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            for ch in segment.chars() {
                if matches!(ch, '.' | '\\') {
                    f.write_str("\\")?;
                }
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}
