use crate::errors::Result;
use regex::bytes::Regex;
use std::borrow::Cow;
use std::fmt;

/// A compiled pattern paired with the bytes that replace its matches.
///
/// The replacement may reference capture groups with `$1`, `${1}` or
/// `${name}`; `$$` inserts a literal dollar sign.
#[derive(Debug, Clone)]
pub struct Transform {
    pattern: Regex,
    replacement: Vec<u8>,
}

impl Transform {
    /// Compiles `pattern` and pairs it with `replacement`.
    pub fn new(pattern: &str, replacement: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// Returns `true` if the pattern occurs at least once in `src`.
    pub fn is_match(&self, src: &[u8]) -> bool {
        self.pattern.is_match(src)
    }

    /// Replaces every non-overlapping match in `src`, leftmost first.
    pub fn replace_all<'a>(&self, src: &'a [u8]) -> Cow<'a, [u8]> {
        self.pattern.replace_all(src, self.replacement.as_slice())
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &[u8] {
        &self.replacement
    }
}

/// An ordered list of transforms applied one after another.
///
/// Each transform sees the output of the one before it, so later patterns can
/// match text introduced by earlier replacements.
#[derive(Debug, Clone, Default)]
pub struct TransformChain {
    transforms: Vec<Transform>,
}

impl TransformChain {
    pub fn new(transforms: Vec<Transform>) -> Self {
        Self { transforms }
    }

    pub fn push(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Returns `true` if any single transform matches `src`.
    ///
    /// Each transform is checked against the original input, not against the
    /// output of its predecessors.
    pub fn is_match(&self, src: &[u8]) -> bool {
        self.transforms.iter().any(|t| t.is_match(src))
    }

    /// Folds every transform over `src` in order.
    pub fn replace_all<'a>(&self, src: &'a [u8]) -> Cow<'a, [u8]> {
        let mut out = Cow::Borrowed(src);
        for transform in &self.transforms {
            let replaced = match transform.replace_all(&out) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(bytes) => bytes,
            };
            out = Cow::Owned(replaced);
        }
        out
    }
}

impl fmt::Display for TransformChain {
    /// Renders the chain as `['pattern', 'replacement'] ...`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.transforms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(
                f,
                "['{}', '{}']",
                t.pattern(),
                String::from_utf8_lossy(t.replacement())
            )?;
        }
        Ok(())
    }
}
