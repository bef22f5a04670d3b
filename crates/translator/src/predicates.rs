//! Predicate phrases to condition fragments
//!
//! A predicate ("is null", "is >= 3", "is empty") becomes a [`PredicateForm`]
//! that is later rendered against the expression of the matched subject.
//! Operands naming other program elements stay unresolved until the matcher
//! looks them up.

use crate::distance::edit_distance;
use docguard_core::entities::{MemberMethod, TypeRef};
use docguard_core::notation;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+(\.[0-9]+)?[lLfFdD]?$").ok());

static IDENTIFIER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*(\(\))?)?$").ok()
});

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

const VERBS: &[&str] = &["is ", "are ", ""];

/// Longer symbols first so `<=` is not read as `<`
const SYMBOLS: &[&str] = &["<=", ">=", "==", "!=", "=", "<", ">", ""];

/// Predicate that tests membership of `null` in a container
const CONTAINS_NULL: &[&str] = &[
    "contains null",
    "contain null",
    "contains null elements",
    "contains a null element",
    "contains null values",
    "has null elements",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    /// Operator for a symbol; `=` is read as `==`
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "==" | "=" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// The operator holding exactly when this one does not
    pub fn negate(&self) -> Self {
        match self {
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Lt => Self::Ge,
            Self::Ge => Self::Lt,
            Self::Gt => Self::Le,
            Self::Le => Self::Gt,
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A number, `null`, `true`, `false` or `receiver`
    Literal(String),

    /// Prose naming another program element, still to be matched
    Reference(String),

    /// Expression of the program element a reference was matched to
    Resolved(String),
}

impl Operand {
    pub fn text(&self) -> &str {
        match self {
            Self::Literal(text) | Self::Reference(text) | Self::Resolved(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredicateForm {
    /// `<subject><accessor><operator><operand>` (`args[0]>=3`, `args[0].length==0`)
    Comparison {
        accessor: String,
        operator: Operator,
        operand: Operand,
    },

    /// A boolean call on the subject (`.isEmpty()`)
    Call(String),

    /// A boolean expression with `{}` standing for the subject
    Template(String),
}

impl PredicateForm {
    fn comparison(operator: Operator, operand: Operand) -> Self {
        Self::Comparison {
            accessor: String::new(),
            operator,
            operand,
        }
    }

    /// Name of the program element the operand refers to, if still unresolved
    pub fn unresolved_reference(&self) -> Option<&str> {
        match self {
            Self::Comparison {
                operand: Operand::Reference(name),
                ..
            } => Some(name),
            _ => None,
        }
    }

    /// Replaces an unresolved operand by the expression it was matched to
    pub fn resolve(self, expression: impl Into<String>) -> Self {
        match self {
            Self::Comparison {
                accessor,
                operator,
                operand: Operand::Reference(_),
            } => Self::Comparison {
                accessor,
                operator,
                operand: Operand::Resolved(expression.into()),
            },
            other => other,
        }
    }

    /// Condition for a subject denoted by `subject` of type `ty`
    ///
    /// Negation inverts comparison operators and prefixes calls with `!`.
    /// Equality between a reference-typed subject and another element uses
    /// `equals`.
    pub fn render(&self, subject: &str, ty: &TypeRef, negative: bool) -> String {
        match self {
            Self::Comparison {
                accessor,
                operator,
                operand,
            } => {
                if let Operand::Resolved(other) = operand {
                    if operator.is_equality() && accessor.is_empty() && !ty.is_primitive() {
                        let positive = (*operator == Operator::Eq) != negative;
                        let not = if positive { "" } else { "!" };
                        return format!("{not}{subject}.equals({other})");
                    }
                }
                let operator = if negative {
                    operator.negate()
                } else {
                    *operator
                };
                format!("{subject}{accessor}{operator}{}", operand.text())
            }
            Self::Call(call) => {
                let not = if negative { "!" } else { "" };
                format!("{not}{subject}{call}")
            }
            Self::Template(template) => {
                let condition = template.replace("{}", subject);
                if negative {
                    format!("!({condition})")
                } else {
                    condition
                }
            }
        }
    }
}

/// Reads a predicate phrase on a subject of type `ty`
///
/// Tries, in order: canned phrases, `instanceof` and `this` placeholders,
/// predicates whose meaning depends on the subject's type and finally an
/// optional verb followed by an optional relational symbol and an operand.
pub fn parse_predicate(predicate: &str, ty: &TypeRef) -> Option<PredicateForm> {
    let phrase = canonical(predicate);
    let lower = phrase.to_lowercase();

    match lower.as_str() {
        "is negative" | "are negative" => {
            return Some(PredicateForm::comparison(Operator::Lt, literal("0")))
        }
        "is positive" | "are positive" => {
            return Some(PredicateForm::comparison(Operator::Gt, literal("0")))
        }
        "is nonnegative" | "is non-negative" | "are nonnegative" | "are non-negative" => {
            return Some(PredicateForm::comparison(Operator::Ge, literal("0")))
        }
        "is nonpositive" | "is non-positive" | "are nonpositive" | "are non-positive" => {
            return Some(PredicateForm::comparison(Operator::Le, literal("0")))
        }
        "is this" | "is this object" => {
            return Some(PredicateForm::comparison(
                Operator::Eq,
                literal(notation::RECEIVER),
            ))
        }
        _ => {}
    }

    let unverbed = strip_verb(&phrase);
    if let Some(target) = unverbed.strip_prefix("instanceof ") {
        let target = target.trim();
        if !target.is_empty() {
            return Some(PredicateForm::Template(format!("{{}} instanceof {target}")));
        }
    }

    if let Some(form) = typed_predicate(&lower, ty) {
        return Some(form);
    }

    comparison(&phrase)
}

/// Predicates whose meaning depends on the subject's type
fn typed_predicate(lower: &str, ty: &TypeRef) -> Option<PredicateForm> {
    let empty = matches!(lower, "is empty" | "are empty");
    if empty {
        if ty.is_string() {
            return Some(PredicateForm::Call(".equals(\"\")".to_string()));
        }
        if ty.is_collection() || ty.is_map() {
            return Some(PredicateForm::Call(".isEmpty()".to_string()));
        }
        if ty.is_array() {
            return Some(PredicateForm::Comparison {
                accessor: ".length".to_string(),
                operator: Operator::Eq,
                operand: literal("0"),
            });
        }
        return None;
    }

    if CONTAINS_NULL.contains(&lower) {
        if ty.is_array() && !ty.component().is_some_and(|c| c.is_primitive()) {
            return Some(PredicateForm::Template(
                "java.util.Arrays.asList({}).contains(null)".to_string(),
            ));
        }
        if ty.is_collection() {
            return Some(PredicateForm::Template("{}.contains(null)".to_string()));
        }
    }
    None
}

/// Verb, relational symbol and operand, the symbol defaulting to `==`
fn comparison(phrase: &str) -> Option<PredicateForm> {
    for verb in VERBS {
        let Some(after_verb) = phrase.strip_prefix(verb) else {
            continue;
        };
        for symbol in SYMBOLS {
            if verb.is_empty() && symbol.is_empty() {
                continue;
            }
            let Some(rest) = after_verb.strip_prefix(symbol) else {
                continue;
            };
            let operator = Operator::parse(symbol).unwrap_or(Operator::Eq);
            let operand = operand(rest.trim(), operator, !symbol.is_empty())?;
            return Some(PredicateForm::comparison(operator, operand));
        }
    }
    None
}

fn operand(text: &str, operator: Operator, explicit_symbol: bool) -> Option<Operand> {
    if text.is_empty() {
        return None;
    }
    let lower = text.to_lowercase();
    if matches!(lower.as_str(), "null" | "true" | "false") {
        return operator.is_equality().then(|| literal(&lower));
    }
    if let Some(value) = NUMBER_WORDS.iter().position(|w| *w == lower) {
        return Some(literal(&value.to_string()));
    }
    if NUMBER.as_ref().is_some_and(|p| p.is_match(text)) {
        return Some(literal(text.trim_start_matches('+')));
    }
    if explicit_symbol && IDENTIFIER.as_ref().is_some_and(|p| p.is_match(text)) {
        return Some(Operand::Reference(text.to_string()));
    }
    None
}

/// Zero-argument boolean method of the receiver that a predicate names
/// ("is empty" -> `.isEmpty()`)
pub fn method_predicate(
    predicate: &str,
    methods: &[MemberMethod],
    distance_threshold: usize,
    word_removal_cost: usize,
) -> Option<PredicateForm> {
    let phrase = canonical(predicate);
    let unverbed = strip_verb(&phrase);
    methods
        .iter()
        .filter_map(|method| {
            let name = method.name.as_str();
            let bare = ["is", "has", "can"]
                .iter()
                .find_map(|prefix| name.strip_prefix(prefix))
                .filter(|rest| rest.starts_with(char::is_uppercase))
                .unwrap_or(name);
            let distance = edit_distance(name, &phrase, word_removal_cost)
                .min(edit_distance(bare, unverbed, word_removal_cost));
            (distance <= distance_threshold).then_some((distance, method))
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, method)| PredicateForm::Call(format!(".{}()", method.name)))
}

/// Predicate with articles dropped and whitespace collapsed
fn canonical(predicate: &str) -> String {
    predicate
        .split_whitespace()
        .filter(|w| !matches!(w.to_lowercase().as_str(), "a" | "an" | "the"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_verb(phrase: &str) -> &str {
    phrase
        .strip_prefix("is ")
        .or_else(|| phrase.strip_prefix("are "))
        .unwrap_or(phrase)
        .trim()
}

fn literal(text: &str) -> Operand {
    Operand::Literal(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(predicate: &str, ty: &str, negative: bool) -> Option<String> {
        let ty = TypeRef::new(ty);
        parse_predicate(predicate, &ty).map(|form| form.render("args[0]", &ty, negative))
    }

    #[test]
    fn test_canned_phrases() {
        assert_eq!(render("is null", "Object", false).as_deref(), Some("args[0]==null"));
        assert_eq!(render("is null", "Object", true).as_deref(), Some("args[0]!=null"));
        assert_eq!(render("is negative", "int", false).as_deref(), Some("args[0]<0"));
        assert_eq!(render("is positive", "int", true).as_deref(), Some("args[0]<=0"));
        assert_eq!(render("is true", "boolean", false).as_deref(), Some("args[0]==true"));
        assert_eq!(render("is this", "Object", false).as_deref(), Some("args[0]==receiver"));
    }

    #[test]
    fn test_restored_comparisons() {
        assert_eq!(render("is >= 3", "int", false).as_deref(), Some("args[0]>=3"));
        assert_eq!(render("is < zero", "int", false).as_deref(), Some("args[0]<0"));
        assert_eq!(render("is <0", "int", true).as_deref(), Some("args[0]>=0"));
        assert_eq!(render("is !=null", "Object", false).as_deref(), Some("args[0]!=null"));
        assert_eq!(render("is = 1.5", "double", false).as_deref(), Some("args[0]==1.5"));
        assert_eq!(render("is 2", "int", false).as_deref(), Some("args[0]==2"));
        // relational symbols are not applicable to literals such as null
        assert_eq!(render("is < null", "Object", false), None);
        assert_eq!(render("is valid", "Object", false), None);
    }

    #[test]
    fn test_instanceof_placeholder() {
        assert_eq!(
            render("is instanceof Comparable", "Object", false).as_deref(),
            Some("args[0] instanceof Comparable")
        );
        assert_eq!(
            render("is instanceof Comparable", "Object", true).as_deref(),
            Some("!(args[0] instanceof Comparable)")
        );
    }

    #[test]
    fn test_empty_depends_on_type() {
        assert_eq!(
            render("is empty", "java.lang.String", true).as_deref(),
            Some("!args[0].equals(\"\")")
        );
        assert_eq!(
            render("is empty", "java.util.List<E>", false).as_deref(),
            Some("args[0].isEmpty()")
        );
        assert_eq!(render("is empty", "int[]", false).as_deref(), Some("args[0].length==0"));
        assert_eq!(render("is empty", "int", false), None);
        assert_eq!(
            render("contains null", "java.lang.Object[]", false).as_deref(),
            Some("java.util.Arrays.asList(args[0]).contains(null)")
        );
    }

    #[test]
    fn test_references_are_resolved() {
        let ty = TypeRef::new("int");
        let form = parse_predicate("is > max", &ty).unwrap();
        assert_eq!(form.unresolved_reference(), Some("max"));
        assert_eq!(form.resolve("args[1]").render("args[0]", &ty, false), "args[0]>args[1]");

        let ty = TypeRef::new("java.lang.String");
        let form = parse_predicate("is == other", &ty).unwrap().resolve("args[1]");
        assert_eq!(form.render("args[0]", &ty, false), "args[0].equals(args[1])");
        assert_eq!(form.render("args[0]", &ty, true), "!args[0].equals(args[1])");
    }

    #[test]
    fn test_receiver_boolean_methods() {
        let methods = vec![
            MemberMethod {
                name: "isEmpty".to_string(),
                params: Vec::new(),
                return_type: Some(TypeRef::new("boolean")),
                is_static: false,
            },
            MemberMethod {
                name: "isClosed".to_string(),
                params: Vec::new(),
                return_type: Some(TypeRef::new("boolean")),
                is_static: false,
            },
        ];
        let form = method_predicate("is empty", &methods, 2, 1).unwrap();
        assert_eq!(form.render("receiver", &TypeRef::new("Stack"), true), "!receiver.isEmpty()");
        assert_eq!(
            method_predicate("is closed", &methods, 2, 1),
            Some(PredicateForm::Call(".isClosed()".to_string()))
        );
        assert_eq!(method_predicate("is sorted", &methods, 2, 1), None);
    }

    #[test]
    fn test_operator_negation_is_an_involution() {
        for op in [
            Operator::Eq,
            Operator::Ne,
            Operator::Lt,
            Operator::Le,
            Operator::Gt,
            Operator::Ge,
        ] {
            assert_eq!(op.negate().negate(), op);
        }
    }
}
