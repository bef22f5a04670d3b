//! Core types for the docguard comment-to-condition translator
//!
//! This crate provides the foundational abstractions shared by the parsing and
//! translation crates:
//!
//! - **Entities**: the method under analysis and the program elements around it
//! - **Tags**: documentation tags, their comments and translation slots
//! - **Specifications**: guards, properties and the three specification kinds
//! - **Notation**: how conditions refer to parameters, receiver and result
//! - **Configuration**: system configuration management
//! - **Error handling**: unified error types

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod entities;
pub mod error;
pub mod notation;
pub mod specs;
pub mod tags;

// Re-export main types for convenience
pub use config::{Config, GateConfig, MatcherConfig, ParserConfig, PreprocessConfig, RuntimeConfig};
pub use entities::{
    DeclaringType, Field, MemberMethod, MethodContext, MethodContextBuilder, Parameter, TypeRef,
    Visibility,
};
pub use error::{Error, Result, ResultExt};
pub use specs::{Guard, PostconditionCase, Property, Specification};
pub use tags::{Comment, DocumentationTag, TagKind};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::entities::{MethodContext, Parameter, TypeRef};
    pub use crate::error::{Result, ResultExt};
    pub use crate::specs::{Guard, Specification};
    pub use crate::tags::{Comment, DocumentationTag, TagKind};
}
