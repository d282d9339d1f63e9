//! Text form of a segment: `[(v1^T1);(v2^T2);...]`

use std::fmt;
use std::str::FromStr;

use super::{Segment, Tag, TaggedValue};
use crate::{Result, SkeletonError};

impl<V: fmt::Display> fmt::Display for Segment<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            write!(f, "{}", entry)?;
        }
        write!(f, "]")
    }
}

impl<V> Segment<V> {
    /// Parse one segment, reading each value with `parser`
    pub fn parse_with<F, E>(text: &str, parser: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<V, E>,
        E: fmt::Display,
    {
        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| SkeletonError::invalid_text(trimmed, "expected `[...]`"))?;

        if inner.trim().is_empty() {
            return Ok(Segment::new());
        }
        inner
            .split(';')
            .map(|token| parse_entry(token, &parser))
            .collect()
    }
}

fn parse_entry<V, F, E>(token: &str, parser: &F) -> Result<TaggedValue<V>>
where
    F: Fn(&str) -> std::result::Result<V, E>,
    E: fmt::Display,
{
    let token = token.trim();
    let body = token
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| SkeletonError::invalid_text(token, "expected `(value^tag)`"))?;
    let (value, tag) = body
        .rsplit_once('^')
        .ok_or_else(|| SkeletonError::invalid_text(token, "missing `^` before the tag"))?;
    let tag: Tag = tag.parse()?;
    let value = parser(value.trim())
        .map_err(|e| SkeletonError::invalid_text(value.trim(), e.to_string()))?;
    Ok(TaggedValue::new(tag, value))
}

impl<V> FromStr for Segment<V>
where
    V: FromStr,
    V::Err: fmt::Display,
{
    type Err = SkeletonError;

    fn from_str(s: &str) -> Result<Self> {
        Segment::parse_with(s, str::parse::<V>)
    }
}
