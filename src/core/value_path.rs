use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location of a value inside a request body, e.g. `body.items[0].name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

impl ValuePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Last segment that names a key, skipping trailing list indexes.
    pub fn last_key(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    /// Drops a leading key segment equal to `prefix`, if present.
    pub fn without_prefix(&self, prefix: &str) -> ValuePath {
        match self.segments.first() {
            Some(PathSegment::Key(key)) if key == prefix => {
                ValuePath::new(self.segments[1..].to_vec())
            }
            _ => self.clone(),
        }
    }

    /// Builds a path from a server `loc` array such as `["body", "items", 0]`.
    ///
    /// Strings become keys and non-negative integers become indexes; any
    /// other element is rejected.
    pub fn from_location(location: &[serde_json::Value]) -> Result<Self, PathError> {
        let mut out = Vec::with_capacity(location.len());
        for (idx, item) in location.iter().enumerate() {
            let segment = match item {
                serde_json::Value::String(key) if !key.is_empty() => PathSegment::Key(key.clone()),
                serde_json::Value::Number(n) => match n.as_u64() {
                    Some(index) => PathSegment::Index(index as usize),
                    None => {
                        return Err(PathError::new(format!(
                            "location index {n} at position {idx} is not a non-negative integer"
                        )));
                    }
                },
                other => {
                    return Err(PathError::new(format!(
                        "unsupported location element {other} at position {idx}"
                    )));
                }
            };
            out.push(segment);
        }
        Ok(Self::new(out))
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return Ok(());
        }

        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if idx == 0 && is_identifier(key) {
                        f.write_str(key)?;
                    } else if is_identifier(key) {
                        f.write_str(".")?;
                        f.write_str(key)?;
                    } else {
                        f.write_str("[\"")?;
                        f.write_str(key.replace('\\', "\\\\").replace('"', "\\\"").as_str())?;
                        f.write_str("\"]")?;
                    }
                }
                PathSegment::Index(index) => {
                    write!(f, "[{index}]")?;
                }
            }
        }
        Ok(())
    }
}

/// A `loc` element that cannot become a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PathError {
    message: String,
}

impl PathError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn is_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
