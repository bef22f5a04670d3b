//! Program elements a comment subject can refer to

use crate::distance::edit_distance;
use docguard_core::entities::TypeRef;
use std::fmt;
use strum_macros::Display;

/// Variable name bound to each element inside a container lambda
pub const ELEMENT_VARIABLE: &str = "e";

/// Kind of program element
///
/// Declaration order is the tie-break priority, lowest first: when several
/// elements of different kinds match a subject equally well, the greatest kind
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ElementKind {
    ReturnValue,
    ContainerOfElement,
    InstanceMethod,
    StaticMethod,
    Field,
    Receiver,
    Parameter,
}

/// A program element with the names it goes by in prose and the expression
/// denoting it in a condition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeElement {
    kind: ElementKind,
    identifiers: Vec<String>,
    expression: String,
    ty: TypeRef,

    /// Type of the enclosing container, for container elements only
    container: Option<TypeRef>,
}

impl CodeElement {
    pub fn new(kind: ElementKind, expression: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            kind,
            identifiers: Vec::new(),
            expression: expression.into(),
            ty,
            container: None,
        }
    }

    pub fn with_identifiers<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for identifier in identifiers {
            self.add_identifier(identifier);
        }
        self
    }

    /// Elements of the container denoted by `container`, which must be an array
    /// or a collection
    ///
    /// The element type of the result is the container's element type, so
    /// type-aware predicates apply to the elements.
    pub fn elements_of(container: &CodeElement) -> Option<Self> {
        let element_type = container.ty.element_type()?;
        let mut elements = Self::new(
            ElementKind::ContainerOfElement,
            container.expression.clone(),
            element_type,
        )
        .with_identifiers(container.identifiers.iter().cloned());
        elements.container = Some(container.ty.clone());
        Some(elements)
    }

    /// Adds an identifier, ignoring blanks and duplicates
    pub fn add_identifier(&mut self, identifier: impl Into<String>) {
        let identifier = identifier.into();
        let identifier = identifier.trim();
        if !identifier.is_empty() && !self.identifiers.iter().any(|i| i == identifier) {
            self.identifiers.push(identifier.to_string());
        }
    }

    pub fn remove_identifier(&mut self, identifier: &str) {
        self.identifiers.retain(|i| i != identifier);
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Expression of the element; for container elements, the container itself
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Smallest edit distance between `subject` and any identifier, `None`
    /// when the element has no identifiers
    pub fn distance_from(&self, subject: &str, word_removal_cost: usize) -> Option<usize> {
        self.identifiers
            .iter()
            .map(|identifier| edit_distance(identifier, subject, word_removal_cost))
            .min()
    }

    /// Expression a predicate is appended to
    pub fn operand(&self) -> &str {
        match self.kind {
            ElementKind::ContainerOfElement => ELEMENT_VARIABLE,
            _ => &self.expression,
        }
    }

    /// Completes a condition built on [`operand`](Self::operand)
    ///
    /// Container elements quantify existentially over the container:
    /// `java.util.Arrays.stream(args[0]).anyMatch(e -> e==null)`.
    pub fn enclose(&self, condition: String) -> String {
        if self.kind != ElementKind::ContainerOfElement {
            return condition;
        }
        let stream = if self.container.as_ref().is_some_and(TypeRef::is_array) {
            format!("java.util.Arrays.stream({})", self.expression)
        } else {
            format!("{}.stream()", self.expression)
        };
        format!("{stream}.anyMatch({ELEMENT_VARIABLE} -> {condition})")
    }
}

impl fmt::Display for CodeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.kind, self.expression, self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_priority() {
        assert!(ElementKind::Parameter > ElementKind::Receiver);
        assert!(ElementKind::Receiver > ElementKind::Field);
        assert!(ElementKind::Field > ElementKind::StaticMethod);
        assert!(ElementKind::StaticMethod > ElementKind::InstanceMethod);
        assert!(ElementKind::InstanceMethod > ElementKind::ContainerOfElement);
        assert!(ElementKind::ContainerOfElement > ElementKind::ReturnValue);
    }

    #[test]
    fn test_identifiers_are_deduplicated() {
        let mut element = CodeElement::new(ElementKind::Parameter, "args[0]", TypeRef::new("int"))
            .with_identifiers(["x", "x", " ", "int x"]);
        assert_eq!(element.identifiers(), &["x".to_string(), "int x".to_string()]);

        element.remove_identifier("x");
        assert_eq!(element.identifiers(), &["int x".to_string()]);
    }

    #[test]
    fn test_distance_uses_closest_identifier() {
        let element = CodeElement::new(ElementKind::Parameter, "args[0]", TypeRef::new("int"))
            .with_identifiers(["count", "parameter"]);
        assert_eq!(element.distance_from("the count", 1), Some(1));
        assert_eq!(element.distance_from("parameter", 1), Some(0));

        let anonymous = CodeElement::new(ElementKind::Receiver, "receiver", TypeRef::new("A"));
        assert_eq!(anonymous.distance_from("a", 1), None);
    }

    #[test]
    fn test_container_elements_quantify_over_the_container() {
        let array = CodeElement::new(ElementKind::Parameter, "args[0]", TypeRef::new("int[]"))
            .with_identifiers(["values", "array"]);
        let elements = CodeElement::elements_of(&array).unwrap();
        assert_eq!(elements.ty(), &TypeRef::new("int"));
        assert_eq!(
            elements.enclose(format!("{}<0", elements.operand())),
            "java.util.Arrays.stream(args[0]).anyMatch(e -> e<0)"
        );

        let list = CodeElement::new(
            ElementKind::Parameter,
            "args[1]",
            TypeRef::new("java.util.List<String>"),
        )
        .with_identifiers(["names", "collection"]);
        let elements = CodeElement::elements_of(&list).unwrap();
        assert_eq!(
            elements.enclose("e==null".to_string()),
            "args[1].stream().anyMatch(e -> e==null)"
        );

        let scalar = CodeElement::new(ElementKind::Parameter, "args[2]", TypeRef::new("int"));
        assert!(CodeElement::elements_of(&scalar).is_none());
    }
}
