//! Compilability gate
//!
//! A translated condition is only kept if it type checks in the scope of the
//! method it documents. Rejections are logged with the compiler diagnostic;
//! a checker that cannot run keeps the condition.

mod javac;
mod scope;
mod snippet;

pub use javac::JavacChecker;
pub use scope::ScopeChecker;
pub use snippet::{SourceSnippet, CLASS_NAME};

use docguard_core::config::GateConfig;
use docguard_core::entities::{MethodContext, Visibility};
use docguard_core::error::{Error, Result};
use docguard_core::specs::{Guard, PostconditionCase, Specification};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of type checking one snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCheck {
    Ok,
    Diagnostics(Vec<String>),
}

/// Type checks generated snippets
///
/// `Err` means the checker itself failed; a condition that does not compile
/// is `Ok(TypeCheck::Diagnostics(..))`.
pub trait TypeChecker: Send + Sync {
    fn name(&self) -> &str;

    fn typecheck(&self, snippet: &SourceSnippet<'_>) -> Result<TypeCheck>;
}

/// Create the configured type checker, `None` when checking is disabled
pub fn create_type_checker(config: &GateConfig) -> Result<Option<Arc<dyn TypeChecker>>> {
    match config.checker.as_str() {
        "scope" => Ok(Some(Arc::new(ScopeChecker::new()))),
        "javac" => Ok(Some(Arc::new(JavacChecker::from_config(config)?))),
        "none" => Ok(None),
        other => Err(Error::config(format!("Unknown type checker '{other}'"))),
    }
}

/// Filters specifications down to conditions that type check
#[derive(Clone, Default)]
pub struct CompilabilityGate {
    checker: Option<Arc<dyn TypeChecker>>,
}

impl CompilabilityGate {
    pub fn new(checker: Option<Arc<dyn TypeChecker>>) -> Self {
        Self { checker }
    }

    pub fn from_config(config: &GateConfig) -> Result<Self> {
        Ok(Self::new(create_type_checker(config)?))
    }

    pub fn checker_name(&self) -> &str {
        self.checker.as_ref().map_or("none", |c| c.name())
    }

    /// `spec` with every condition that fails to type check removed
    ///
    /// Preconditions and exceptional postconditions lose their condition;
    /// postcondition cases are checked with guard and property together and
    /// dropped one by one.
    pub fn admit(&self, method: &MethodContext, spec: Specification) -> Specification {
        let Some(checker) = self.checker.as_deref() else {
            return spec;
        };
        if spec.is_empty() || method.declaring_type.visibility == Visibility::Private {
            return spec;
        }

        match spec {
            Specification::Precondition { guard } => Specification::Precondition {
                guard: admit_guard(checker, method, guard),
            },
            Specification::ExceptionalPostcondition { guard, exception } => {
                Specification::ExceptionalPostcondition {
                    guard: admit_guard(checker, method, guard),
                    exception,
                }
            }
            Specification::Postcondition { cases } => Specification::Postcondition {
                cases: cases
                    .into_iter()
                    .filter(|case| admit_case(checker, method, case))
                    .collect(),
            },
        }
    }
}

fn admit_guard(checker: &dyn TypeChecker, method: &MethodContext, guard: Guard) -> Guard {
    if accepts(checker, method, &guard.condition, false) {
        guard
    } else {
        Guard::new(guard.description, "")
    }
}

fn admit_case(checker: &dyn TypeChecker, method: &MethodContext, case: &PostconditionCase) -> bool {
    let condition = format!("({}) && ({})", case.guard.condition, case.property.condition);
    accepts(checker, method, &condition, true)
}

fn accepts(checker: &dyn TypeChecker, method: &MethodContext, condition: &str, postcondition: bool) -> bool {
    let snippet = SourceSnippet::new(method, condition, postcondition);
    match checker.typecheck(&snippet) {
        Ok(TypeCheck::Ok) => true,
        Ok(TypeCheck::Diagnostics(diagnostics)) => {
            info!(
                "Discarding \"{}\" for {}: {}",
                condition,
                method.signature(),
                diagnostics.join("; ")
            );
            false
        }
        Err(e) => {
            warn!(
                "{} checker failed on \"{}\", keeping it: {}",
                checker.name(),
                condition,
                e
            );
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docguard_core::entities::{DeclaringType, Parameter, TypeRef};
    use docguard_core::specs::Property;
    use pretty_assertions::assert_eq;

    /// Rejects every condition mentioning a banned word
    struct Banned(&'static str);

    impl TypeChecker for Banned {
        fn name(&self) -> &str {
            "banned"
        }

        fn typecheck(&self, snippet: &SourceSnippet<'_>) -> Result<TypeCheck> {
            if snippet.condition().contains(self.0) {
                Ok(TypeCheck::Diagnostics(vec![format!("{} is banned", self.0)]))
            } else {
                Ok(TypeCheck::Ok)
            }
        }
    }

    struct Broken;

    impl TypeChecker for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn typecheck(&self, _snippet: &SourceSnippet<'_>) -> Result<TypeCheck> {
            Err(Error::type_check("compiler crashed"))
        }
    }

    fn method(visibility: Visibility) -> MethodContext {
        let mut declaring = DeclaringType::new("org.example.Box");
        declaring.visibility = visibility;
        MethodContext::builder()
            .name("get")
            .params(vec![Parameter::new("index", "int")])
            .return_type(Some(TypeRef::new("int")))
            .declaring_type(declaring)
            .build()
            .unwrap()
    }

    fn gate(checker: impl TypeChecker + 'static) -> CompilabilityGate {
        CompilabilityGate::new(Some(Arc::new(checker)))
    }

    #[test]
    fn test_rejected_guard_is_emptied() {
        let spec = Specification::precondition(Guard::new("index is bad", "args[0]<bad"));
        let admitted = gate(Banned("bad")).admit(&method(Visibility::Public), spec);
        assert!(admitted.is_empty());
        assert_eq!(admitted.guard().map(|g| g.description.as_str()), Some("index is bad"));
    }

    #[test]
    fn test_postcondition_cases_are_checked_one_by_one() {
        let case = |guard: &str, property: &str| PostconditionCase {
            guard: Guard::new("", guard),
            property: Property::new("", property),
        };
        let spec = Specification::postcondition(vec![
            case("args[0]>0", "result==1"),
            case("!(args[0]>0)", "result==bad"),
        ]);
        let admitted = gate(Banned("bad")).admit(&method(Visibility::Public), spec);
        assert_eq!(admitted.cases(), &[case("args[0]>0", "result==1")]);
    }

    #[test]
    fn test_checker_failure_keeps_condition() {
        let spec = Specification::exceptional(Guard::new("", "args[0]<0"), "IndexOutOfBoundsException");
        let admitted = gate(Broken).admit(&method(Visibility::Public), spec.clone());
        assert_eq!(admitted, spec);
    }

    #[test]
    fn test_private_types_skip_the_check() {
        let spec = Specification::precondition(Guard::new("", "args[0]<bad"));
        let admitted = gate(Banned("bad")).admit(&method(Visibility::Private), spec.clone());
        assert_eq!(admitted, spec);
    }

    #[test]
    fn test_create_type_checker() {
        let mut config = GateConfig::default();
        assert_eq!(CompilabilityGate::from_config(&config).unwrap().checker_name(), "scope");

        config.checker = "none".to_string();
        assert!(create_type_checker(&config).unwrap().is_none());

        config.checker = "lint".to_string();
        assert!(create_type_checker(&config).is_err());
    }

    #[test]
    fn test_scope_checker_rejects_misspelled_member() {
        let gate = CompilabilityGate::new(Some(Arc::new(ScopeChecker::new())));
        let spec = Specification::precondition(Guard::new("", "receiver.sise()>args[0]"));
        assert!(gate.admit(&method(Visibility::Public), spec).is_empty());
    }
}
