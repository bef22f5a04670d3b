//! Translated specifications
//!
//! Condition texts use the notation in [`crate::notation`]. An empty condition
//! means no confident translation was found.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Boolean condition under which a specification applies
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guard {
    /// The comment text the condition was translated from
    pub description: String,
    pub condition: String,
}

impl Guard {
    pub fn new(description: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            condition: condition.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.condition.is_empty()
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.condition)
    }
}

/// Condition a postcondition asserts once its guard holds
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub description: String,
    pub condition: String,
}

impl Property {
    pub fn new(description: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            condition: condition.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.condition.is_empty()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.condition)
    }
}

/// One `guard ? property` pair of a postcondition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostconditionCase {
    pub guard: Guard,
    pub property: Property,
}

impl fmt::Display for PostconditionCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ? {}", self.guard, self.property)
    }
}

/// Translation result of one documentation tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Specification {
    /// From a `@param` tag
    Precondition { guard: Guard },

    /// From a `@throws` tag: the exception is expected whenever the guard holds
    ExceptionalPostcondition { guard: Guard, exception: String },

    /// From a `@return` tag: one or two cases, empty when nothing was translated
    Postcondition { cases: Vec<PostconditionCase> },
}

impl Specification {
    pub fn precondition(guard: Guard) -> Self {
        Self::Precondition { guard }
    }

    pub fn exceptional(guard: Guard, exception: impl Into<String>) -> Self {
        Self::ExceptionalPostcondition {
            guard,
            exception: exception.into(),
        }
    }

    pub fn postcondition(cases: Vec<PostconditionCase>) -> Self {
        Self::Postcondition { cases }
    }

    /// True when the translator found no confident translation
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Precondition { guard } | Self::ExceptionalPostcondition { guard, .. } => {
                guard.is_empty()
            }
            Self::Postcondition { cases } => cases.is_empty(),
        }
    }

    /// Guard of a precondition or exceptional postcondition
    pub fn guard(&self) -> Option<&Guard> {
        match self {
            Self::Precondition { guard } | Self::ExceptionalPostcondition { guard, .. } => {
                Some(guard)
            }
            Self::Postcondition { .. } => None,
        }
    }

    pub fn cases(&self) -> &[PostconditionCase] {
        match self {
            Self::Postcondition { cases } => cases,
            _ => &[],
        }
    }
}

impl fmt::Display for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precondition { guard } => write!(f, "{guard}"),
            Self::ExceptionalPostcondition { guard, exception } => {
                write!(f, "{guard} => throws {exception}")
            }
            Self::Postcondition { cases } => {
                let rendered: Vec<String> = cases.iter().map(ToString::to_string).collect();
                f.write_str(&rendered.join("; "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_specifications() {
        assert!(Specification::precondition(Guard::new("x", "")).is_empty());
        assert!(Specification::postcondition(Vec::new()).is_empty());
        assert!(!Specification::exceptional(Guard::new("always", "true"), "E").is_empty());
    }

    #[test]
    fn test_postcondition_display() {
        let spec = Specification::postcondition(vec![
            PostconditionCase {
                guard: Guard::new("", "args[0]>0"),
                property: Property::new("", "result==true"),
            },
            PostconditionCase {
                guard: Guard::new("", "!(args[0]>0)"),
                property: Property::new("", "result==false"),
            },
        ]);
        assert_eq!(
            spec.to_string(),
            "args[0]>0 ? result==true; !(args[0]>0) ? result==false"
        );
    }

    #[test]
    fn test_specification_serializes_with_kind_tag() {
        let spec = Specification::exceptional(Guard::new("always", "true"), "IllegalStateException");
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "exceptional_postcondition");
        assert_eq!(json["guard"]["condition"], "true");
    }
}
