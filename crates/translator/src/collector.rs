//! Program elements reachable from the method under analysis
//!
//! [`MethodScope`] is computed once per method and shared by every tag of that
//! method. It holds the receiver, the parameters (with identifiers discovered
//! from their own `@param` comments), the fields, the callable sibling methods
//! and, for postconditions, the return value.

use crate::elements::{CodeElement, ElementKind};
use docguard_core::entities::{MemberMethod, MethodContext, TypeRef};
use docguard_core::notation;
use docguard_core::tags::{DocumentationTag, TagKind};
use docguard_nlp::{DependencyGraph, ParseHints, PropositionExtractor};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Identifiers of the return value in postconditions
const RETURN_VALUE_IDENTIFIERS: &[&str] = &["result", "return value", "returned value"];

#[derive(Debug, Clone)]
pub struct MethodScope {
    signature: String,
    elements: Vec<CodeElement>,
    boolean_methods: Vec<MemberMethod>,
    hints: ParseHints,
}

impl MethodScope {
    /// Collects the elements of `method`, discovering parameter identifiers from
    /// the `@param` tags among `tags`
    pub fn build(
        method: &MethodContext,
        tags: &[DocumentationTag],
        extractor: &PropositionExtractor,
    ) -> Self {
        let hints = method_hints(method, tags);
        let signature = method.signature();

        let discovered: Vec<Vec<String>> = method
            .params
            .iter()
            .map(|param| {
                tags.iter()
                    .filter(|tag| {
                        tag.kind == TagKind::Param
                            && tag.parameter.as_deref() == Some(param.name.as_str())
                    })
                    .flat_map(|tag| {
                        discover_identifiers(&tag.comment.text, &signature, &hints, extractor)
                    })
                    .collect()
            })
            .collect();

        Self::from_discovered(method, discovered, hints)
    }

    /// Collects the elements of `method` given identifiers already discovered per
    /// parameter
    pub fn from_discovered(
        method: &MethodContext,
        discovered: Vec<Vec<String>>,
        hints: ParseHints,
    ) -> Self {
        let names: Vec<&str> = method.param_names().collect();
        let discovered = dedup_discovered(&names, discovered);
        let elements = collect(method, &discovered);
        debug!(
            "Collected {} code element(s) for {}",
            elements.len(),
            method.signature()
        );

        let boolean_methods = if method.is_static {
            Vec::new()
        } else {
            method
                .declaring_type
                .methods
                .iter()
                .filter(|m| !m.is_static && m.params.is_empty() && m.returns_boolean())
                .cloned()
                .collect()
        };

        Self {
            signature: method.signature(),
            elements,
            boolean_methods,
            hints,
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn hints(&self) -> &ParseHints {
        &self.hints
    }

    /// Every collected element, the return value included
    pub fn elements(&self) -> &[CodeElement] {
        &self.elements
    }

    /// Elements a subject of a `kind` tag may refer to
    ///
    /// The return value is only visible to `@return` tags.
    pub fn candidates(&self, kind: TagKind) -> Vec<&CodeElement> {
        self.elements
            .iter()
            .filter(|e| kind == TagKind::Return || e.kind() != ElementKind::ReturnValue)
            .collect()
    }

    /// Zero-argument boolean instance methods of the declaring type
    pub fn boolean_methods(&self) -> &[MemberMethod] {
        &self.boolean_methods
    }

    pub fn return_value(&self) -> Option<&CodeElement> {
        self.elements
            .iter()
            .find(|e| e.kind() == ElementKind::ReturnValue)
    }
}

/// Words the parser must treat as nouns while reading this method's comments
fn method_hints(method: &MethodContext, tags: &[DocumentationTag]) -> ParseHints {
    let mut hints = ParseHints::new(method.param_names());
    hints.extend(tags.iter().flat_map(|tag| tag.comment.code_words.iter()));
    hints.insert(notation::RESULT);
    hints
}

/// Root word of every sentence of a `@param` comment
///
/// When the root is not a noun the first noun of the sentence stands in.
fn discover_identifiers(
    comment: &str,
    method: &str,
    hints: &ParseHints,
    extractor: &PropositionExtractor,
) -> Vec<String> {
    let mut text = comment.trim().to_string();
    if text.is_empty() {
        return Vec::new();
    }
    if !text.ends_with('.') {
        text.push('.');
    }

    match extractor.parse(&text, method, hints) {
        Ok(parsed) => parsed.graphs.iter().filter_map(sentence_head).collect(),
        Err(e) => {
            warn!("Could not parse parameter comment \"{}\": {}", comment, e);
            Vec::new()
        }
    }
}

fn sentence_head(graph: &DependencyGraph) -> Option<String> {
    graph
        .root()
        .filter(|w| w.is_noun())
        .or_else(|| graph.first_noun())
        .map(|w| w.text.clone())
}

/// Drops identifiers that do not single out one parameter
///
/// An identifier discovered for more than one parameter, or equal to another
/// parameter's name, is removed from every parameter that discovered it.
pub fn dedup_discovered(names: &[&str], discovered: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let mut owners: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, identifiers) in discovered.iter().enumerate() {
        for identifier in identifiers {
            let entry = owners.entry(identifier.as_str()).or_default();
            if !entry.contains(&index) {
                entry.push(index);
            }
        }
    }

    let ambiguous: Vec<String> = owners
        .iter()
        .filter(|(identifier, params)| {
            params.len() > 1
                || names
                    .iter()
                    .enumerate()
                    .any(|(i, name)| name == *identifier && !params.contains(&i))
        })
        .map(|(identifier, _)| identifier.to_string())
        .collect();

    discovered
        .into_iter()
        .map(|identifiers| {
            identifiers
                .into_iter()
                .filter(|identifier| !ambiguous.contains(identifier))
                .collect()
        })
        .collect()
}

/// Every element reachable from `method`
pub fn collect(method: &MethodContext, discovered: &[Vec<String>]) -> Vec<CodeElement> {
    let mut elements = Vec::new();

    for (index, param) in method.params.iter().enumerate() {
        let simple_type = param.ty.simple_name();
        let mut element = CodeElement::new(
            ElementKind::Parameter,
            notation::arg(index),
            param.ty.clone(),
        )
        .with_identifiers([
            param.name.clone(),
            format!("{simple_type} {}", param.name),
            format!("{} {simple_type}", param.name),
            "parameter".to_string(),
        ]);
        if param.ty.is_array() {
            element.add_identifier("array");
            if let Some(component) = param.ty.component() {
                element.add_identifier(format!("{} array", component.simple_name()));
            }
        } else if param.ty.is_collection() {
            element.add_identifier("collection");
        }
        for identifier in discovered.get(index).into_iter().flatten() {
            element.add_identifier(identifier.clone());
        }
        elements.push(element);
    }

    let declaring = &method.declaring_type;
    if !method.is_static {
        elements.push(receiver(method));
    }

    for field in &declaring.fields {
        if method.is_static && !field.is_static {
            continue;
        }
        let expression = if field.is_static {
            format!("{}.{}", declaring.qualified_name, field.name)
        } else {
            format!("{}.{}", notation::RECEIVER, field.name)
        };
        elements.push(
            CodeElement::new(ElementKind::Field, expression, field.ty.clone())
                .with_identifiers([field.name.clone()]),
        );
    }

    for member in &declaring.methods {
        if let Some(element) = member_element(method, member) {
            elements.push(element);
        }
    }

    if method.returns_value() {
        if let Some(return_type) = &method.return_type {
            elements.push(
                CodeElement::new(ElementKind::ReturnValue, notation::RESULT, return_type.clone())
                    .with_identifiers(RETURN_VALUE_IDENTIFIERS.iter().copied()),
            );
        }
    }

    elements
}

fn receiver(method: &MethodContext) -> CodeElement {
    let declaring = &method.declaring_type;
    let name = declaring.simple_name();
    let mut element = CodeElement::new(
        ElementKind::Receiver,
        notation::RECEIVER,
        declaring.as_type_ref(),
    )
    .with_identifiers([
        name.to_string(),
        "this".to_string(),
        format!("this {name}"),
    ]);

    // "HashMap" is also "the map"
    if let Some((position, _)) = name
        .char_indices()
        .skip(1)
        .filter(|(_, c)| c.is_uppercase())
        .last()
    {
        element.add_identifier(&name[position..]);
    }

    for interface in &declaring.interfaces {
        element.add_identifier(TypeRef::new(interface.as_str()).simple_name());
    }
    element
}

/// A sibling method callable with the expressions in scope
fn member_element(method: &MethodContext, member: &MemberMethod) -> Option<CodeElement> {
    if method.is_same_as(member) {
        return None;
    }
    let return_type = member.return_type.as_ref().filter(|t| !t.is_void())?;
    if !member.is_static && (method.is_constructor || method.is_static) {
        return None;
    }

    let arguments = member
        .params
        .iter()
        .map(|ty| argument_for(method, ty))
        .collect::<Option<Vec<String>>>()?;

    let (kind, expression) = if member.is_static {
        (
            ElementKind::StaticMethod,
            format!(
                "{}.{}({})",
                method.declaring_type.qualified_name,
                member.name,
                arguments.join(", ")
            ),
        )
    } else {
        (
            ElementKind::InstanceMethod,
            format!("{}.{}({})", notation::RECEIVER, member.name, arguments.join(", ")),
        )
    };

    let mut element = CodeElement::new(kind, expression, return_type.clone());
    if let Some(stripped) = member.name.strip_prefix("get").filter(|s| !s.is_empty()) {
        element.add_identifier(stripped);
    }
    element.add_identifier(member.name.clone());
    Some(element)
}

/// Expression in scope whose type is `ty`
///
/// Parameters come first, then the receiver, then the fields of the declaring
/// type in declaration order.
fn argument_for(method: &MethodContext, ty: &TypeRef) -> Option<String> {
    let erasure = ty.erasure();
    if let Some(index) = method.params.iter().position(|p| p.ty.erasure() == erasure) {
        return Some(notation::arg(index));
    }
    let declaring = &method.declaring_type;
    let is_declaring = erasure == declaring.as_type_ref().erasure()
        || erasure == TypeRef::new(declaring.simple_name()).erasure();
    if is_declaring && !method.is_static {
        return Some(notation::RECEIVER.to_string());
    }
    declaring
        .fields
        .iter()
        .filter(|field| field.is_static || !method.is_static)
        .find(|field| field.ty.erasure() == erasure)
        .map(|field| {
            if field.is_static {
                format!("{}.{}", declaring.qualified_name, field.name)
            } else {
                format!("{}.{}", notation::RECEIVER, field.name)
            }
        })
}
