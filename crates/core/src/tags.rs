//! Documentation tags and their comments

use crate::error::{Error, Result};
use crate::specs::Specification;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Kind of documentation tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TagKind {
    Param,
    Return,
    Throws,
}

/// Raw text of one tag plus the words its author marked as code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,

    /// Substrings written as `{@code ...}` in the original documentation
    #[serde(default)]
    pub code_words: Vec<String>,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code_words: Vec::new(),
        }
    }

    pub fn with_code_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.code_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Whether any of the given identifiers was marked as code
    pub fn intersects<S: AsRef<str>>(&self, identifiers: &[S]) -> bool {
        identifiers
            .iter()
            .any(|id| self.code_words.iter().any(|w| w == id.as_ref()))
    }
}

/// One `@param`, `@return` or `@throws` tag of a method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationTag {
    pub kind: TagKind,

    pub comment: Comment,

    /// Name of the documented parameter (`@param` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,

    /// Name of the documented exception type (`@throws` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    translation: Option<Specification>,
}

impl DocumentationTag {
    pub fn param(parameter: impl Into<String>, comment: Comment) -> Self {
        Self {
            kind: TagKind::Param,
            comment,
            parameter: Some(parameter.into()),
            exception: None,
            translation: None,
        }
    }

    pub fn throws(exception: impl Into<String>, comment: Comment) -> Self {
        Self {
            kind: TagKind::Throws,
            comment,
            parameter: None,
            exception: Some(exception.into()),
            translation: None,
        }
    }

    pub fn returns(comment: Comment) -> Self {
        Self {
            kind: TagKind::Return,
            comment,
            parameter: None,
            exception: None,
            translation: None,
        }
    }

    /// Short label used in logs (`@param x`, `@throws NullPointerException`)
    pub fn label(&self) -> String {
        match self.kind {
            TagKind::Param => format!("@param {}", self.parameter.as_deref().unwrap_or("?")),
            TagKind::Throws => format!("@throws {}", self.exception.as_deref().unwrap_or("?")),
            TagKind::Return => "@return".to_string(),
        }
    }

    pub fn translation(&self) -> Option<&Specification> {
        self.translation.as_ref()
    }

    /// Records the translation of this tag; a tag is translated exactly once
    pub fn set_translation(&mut self, method: &str, spec: Specification) -> Result<()> {
        if self.translation.is_some() {
            return Err(Error::already_translated(method, self.label()));
        }
        self.translation = Some(spec);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::Guard;

    #[test]
    fn test_comment_intersects_code_words() {
        let comment = Comment::new("if key is null").with_code_words(["key"]);
        assert!(comment.intersects(&["key", "k"]));
        assert!(!comment.intersects(&["value"]));
    }

    #[test]
    fn test_translation_is_set_once() {
        let mut tag = DocumentationTag::throws(
            "java.lang.NullPointerException",
            Comment::new("if key is null"),
        );
        let spec = Specification::precondition(Guard::new("if key is null", "args[0]==null"));
        tag.set_translation("Cache.put(K)", spec.clone()).unwrap();
        assert_eq!(tag.translation(), Some(&spec));

        let err = tag.set_translation("Cache.put(K)", spec).unwrap_err();
        assert!(err.to_string().contains("already has a translation"));
    }

    #[test]
    fn test_tag_kind_round_trips_through_strings() {
        assert_eq!(TagKind::Throws.to_string(), "throws");
        assert_eq!("param".parse::<TagKind>().unwrap(), TagKind::Param);
    }
}
