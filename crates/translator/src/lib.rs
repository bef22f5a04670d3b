//! Documentation tags to executable conditions
//!
//! Given a method and its `@param`, `@return` and `@throws` tags, produces
//! preconditions, postconditions and exceptional postconditions over the
//! method's parameters, receiver and return value:
//!
//! - **Collection**: program elements a comment can talk about ([`collector`])
//! - **Matching**: proposition subjects to elements, predicates to operators ([`matcher`])
//! - **Translation**: per-tag rules on top of the matcher ([`translate`])
//! - **Gate**: conditions that do not type check are dropped ([`gate`])
//! - **Service**: the whole pipeline behind one shareable type ([`TranslationService`])

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod collector;
pub mod distance;
pub mod elements;
pub mod gate;
pub mod matcher;
pub mod predicates;
pub mod service;
pub mod translate;

pub use collector::MethodScope;
pub use elements::{CodeElement, ElementKind};
pub use gate::{
    create_type_checker, CompilabilityGate, JavacChecker, ScopeChecker, SourceSnippet, TypeCheck,
    TypeChecker,
};
pub use matcher::{MatchContext, Matcher};
pub use predicates::{Operator, PredicateForm};
pub use service::TranslationService;
pub use translate::{translator_for, TagTranslator, TranslateContext};
