//! Built-in type checker
//!
//! Parses a condition into an expression tree and checks it against the
//! declared types of the method. Types the checker cannot know (library calls,
//! lambda variables) are accepted; only provable errors become diagnostics.

use super::{SourceSnippet, TypeCheck, TypeChecker};
use docguard_core::entities::{DeclaringType, MethodContext, TypeRef};
use docguard_core::error::Result;
use docguard_core::notation;
use std::fmt;

const BOOLEAN_METHODS: &[&str] = &[
    "equals",
    "contains",
    "containsKey",
    "containsValue",
    "containsAll",
    "isEmpty",
    "startsWith",
    "endsWith",
    "matches",
    "anyMatch",
    "allMatch",
    "noneMatch",
    "equalsIgnoreCase",
];

const INT_METHODS: &[&str] = &["length", "size", "hashCode", "compareTo", "indexOf"];

/// Methods every reference type inherits
const OBJECT_METHODS: &[&str] = &["equals", "hashCode", "toString", "getClass"];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(String),
    Decimal(String),
    Str(String),
    Char(String),
    Symbol(&'static str),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) | Token::Int(s) | Token::Decimal(s) => f.write_str(s),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Char(s) => write!(f, "'{s}'"),
            Token::Symbol(s) => f.write_str(s),
        }
    }
}

/// Longest symbols first
const SYMBOLS: &[&str] = &[
    "->", "==", "!=", "<=", ">=", "&&", "||", "!", "<", ">", "+", "-", "*", "/", "%", "&", "|",
    "^", "(", ")", "[", "]", ".", ",",
];

fn tokenize(source: &str) -> std::result::Result<Vec<Token>, String> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
        } else if c.is_ascii_digit() {
            let start = i;
            let mut decimal = false;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '_') {
                if chars[i] == '.' {
                    // `1.equals` never occurs; a dot followed by a digit is a fraction
                    if !chars.get(i + 1).is_some_and(|d| d.is_ascii_digit()) {
                        break;
                    }
                    decimal = true;
                }
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let lower = text.to_lowercase();
            if decimal || lower.ends_with('d') || lower.ends_with('f') {
                tokens.push(Token::Decimal(text));
            } else {
                tokens.push(Token::Int(text));
            }
        } else if c == '"' || c == '\'' {
            let start = i + 1;
            i += 1;
            while i < chars.len() && chars[i] != c {
                if chars[i] == '\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= chars.len() {
                return Err(format!("unclosed literal at column {start}"));
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(if c == '"' { Token::Str(text) } else { Token::Char(text) });
            i += 1;
        } else {
            let rest: String = chars[i..chars.len().min(i + 2)].iter().collect();
            let symbol = SYMBOLS
                .iter()
                .copied()
                .find(|s| rest.starts_with(*s))
                .ok_or_else(|| format!("illegal character '{c}'"))?;
            tokens.push(Token::Symbol(symbol));
            i += symbol.chars().count();
        }
    }
    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Int,
    Long,
    Double,
    Str,
    Char,
    Boolean,
    Null,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Literal(Literal),
    Name(String),
    Index(Box<Expr>, Box<Expr>),
    Field(Box<Expr>, String),
    Call {
        target: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
    },
    Not(Box<Expr>),
    Negate(Box<Expr>),
    Binary(&'static str, Box<Expr>, Box<Expr>),
    InstanceOf(Box<Expr>, String),
    Lambda(String, Box<Expr>),
}

/// Binary operators by increasing precedence
const PRECEDENCE: &[&[&str]] = &[
    &["||"],
    &["&&"],
    &["|"],
    &["^"],
    &["&"],
    &["==", "!="],
    &["<", ">", "<=", ">="],
    &["+", "-"],
    &["*", "/", "%"],
];

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn parse(source: &str) -> std::result::Result<Expr, String> {
        let mut parser = Parser {
            tokens: tokenize(source)?,
            position: 0,
        };
        let expr = parser.expression()?;
        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(format!("unexpected '{token}'")),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_symbol(&self, symbol: &str) -> bool {
        matches!(self.peek(), Some(Token::Symbol(s)) if *s == symbol)
    }

    fn eat_symbol(&mut self, symbol: &str) -> bool {
        if self.peek_symbol(symbol) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect_symbol(&mut self, symbol: &str) -> std::result::Result<(), String> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            Err(match self.peek() {
                Some(token) => format!("'{symbol}' expected before '{token}'"),
                None => format!("'{symbol}' expected"),
            })
        }
    }

    fn identifier(&mut self) -> std::result::Result<String, String> {
        match self.tokens.get(self.position).cloned() {
            Some(Token::Ident(name)) => {
                self.position += 1;
                Ok(name)
            }
            Some(token) => Err(format!("<identifier> expected before '{token}'")),
            None => Err("<identifier> expected".to_string()),
        }
    }

    fn expression(&mut self) -> std::result::Result<Expr, String> {
        self.binary(0)
    }

    fn binary(&mut self, level: usize) -> std::result::Result<Expr, String> {
        if level == PRECEDENCE.len() {
            return self.unary();
        }
        let mut left = self.binary(level + 1)?;
        loop {
            let operator = PRECEDENCE[level]
                .iter()
                .copied()
                .find(|op| self.peek_symbol(op));
            if let Some(operator) = operator {
                self.position += 1;
                let right = self.binary(level + 1)?;
                left = Expr::Binary(operator, Box::new(left), Box::new(right));
            } else if level == 6 && matches!(self.peek(), Some(Token::Ident(s)) if s == "instanceof") {
                self.position += 1;
                let target = self.type_name()?;
                left = Expr::InstanceOf(Box::new(left), target);
            } else {
                return Ok(left);
            }
        }
    }

    fn type_name(&mut self) -> std::result::Result<String, String> {
        let mut name = self.identifier()?;
        while self.eat_symbol(".") {
            name.push('.');
            name.push_str(&self.identifier()?);
        }
        while self.peek_symbol("[") {
            self.position += 1;
            self.expect_symbol("]")?;
            name.push_str("[]");
        }
        Ok(name)
    }

    fn unary(&mut self) -> std::result::Result<Expr, String> {
        if self.eat_symbol("!") {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        if self.eat_symbol("-") {
            return Ok(Expr::Negate(Box::new(self.unary()?)));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> std::result::Result<Expr, String> {
        let mut expr = self.primary()?;
        loop {
            if self.eat_symbol(".") {
                let name = self.identifier()?;
                if self.eat_symbol("(") {
                    let args = self.arguments()?;
                    expr = Expr::Call {
                        target: Some(Box::new(expr)),
                        name,
                        args,
                    };
                } else {
                    expr = Expr::Field(Box::new(expr), name);
                }
            } else if self.eat_symbol("[") {
                let index = self.expression()?;
                self.expect_symbol("]")?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else {
                return Ok(expr);
            }
        }
    }

    /// Arguments after an opening parenthesis, closing parenthesis included
    fn arguments(&mut self) -> std::result::Result<Vec<Expr>, String> {
        let mut args = Vec::new();
        if self.eat_symbol(")") {
            return Ok(args);
        }
        loop {
            let lambda = matches!(self.peek(), Some(Token::Ident(_)))
                && matches!(self.tokens.get(self.position + 1), Some(Token::Symbol("->")));
            if lambda {
                let variable = self.identifier()?;
                self.expect_symbol("->")?;
                args.push(Expr::Lambda(variable, Box::new(self.expression()?)));
            } else {
                args.push(self.expression()?);
            }
            if self.eat_symbol(")") {
                return Ok(args);
            }
            self.expect_symbol(",")?;
        }
    }

    fn primary(&mut self) -> std::result::Result<Expr, String> {
        let Some(token) = self.tokens.get(self.position).cloned() else {
            return Err("illegal start of expression".to_string());
        };
        self.position += 1;
        match token {
            Token::Int(text) => Ok(Expr::Literal(if text.to_lowercase().ends_with('l') {
                Literal::Long
            } else {
                Literal::Int
            })),
            Token::Decimal(_) => Ok(Expr::Literal(Literal::Double)),
            Token::Str(_) => Ok(Expr::Literal(Literal::Str)),
            Token::Char(_) => Ok(Expr::Literal(Literal::Char)),
            Token::Ident(name) => match name.as_str() {
                "true" | "false" => Ok(Expr::Literal(Literal::Boolean)),
                "null" => Ok(Expr::Literal(Literal::Null)),
                _ if self.eat_symbol("(") => Ok(Expr::Call {
                    target: None,
                    name,
                    args: self.arguments()?,
                }),
                _ => Ok(Expr::Name(name)),
            },
            Token::Symbol("(") => {
                let expr = self.expression()?;
                self.expect_symbol(")")?;
                Ok(expr)
            }
            Token::Symbol(symbol) => Err(format!("illegal start of expression '{symbol}'")),
        }
    }
}

/// Static type of a subexpression
#[derive(Debug, Clone, PartialEq)]
enum Ty {
    Known(TypeRef),
    Null,
    /// A name that denotes a type or package, not a value
    Path(String),
    Unknown,
}

impl Ty {
    fn known(name: &str) -> Self {
        Ty::Known(TypeRef::new(name))
    }

    fn is_non_numeric(&self) -> bool {
        match self {
            Ty::Known(t) => !t.is_numeric(),
            Ty::Null => true,
            _ => false,
        }
    }

    fn is_non_boolean(&self) -> bool {
        match self {
            Ty::Known(t) => !t.is_boolean(),
            Ty::Null => true,
            _ => false,
        }
    }

    fn is_primitive(&self) -> bool {
        matches!(self, Ty::Known(t) if t.is_primitive())
    }

    fn describe(&self) -> String {
        match self {
            Ty::Known(t) => t.name().to_string(),
            Ty::Null => "<null>".to_string(),
            Ty::Path(p) => p.clone(),
            Ty::Unknown => "?".to_string(),
        }
    }
}

/// Type environment of one condition
struct Scope<'a> {
    method: &'a MethodContext,
    postcondition: bool,
    lambda_variables: Vec<String>,
    diagnostics: Vec<String>,
}

impl Scope<'_> {
    fn declaring(&self) -> &DeclaringType {
        &self.method.declaring_type
    }

    fn report(&mut self, diagnostic: String) {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    fn is_declaring_type(&self, ty: &TypeRef) -> bool {
        let declaring = self.declaring();
        let erasure = ty.erasure();
        erasure == declaring.qualified_name || erasure == declaring.simple_name()
    }

    fn check(&mut self, expr: &Expr) -> Ty {
        match expr {
            Expr::Literal(literal) => match literal {
                Literal::Int => Ty::known("int"),
                Literal::Long => Ty::known("long"),
                Literal::Double => Ty::known("double"),
                Literal::Str => Ty::known("java.lang.String"),
                Literal::Char => Ty::known("char"),
                Literal::Boolean => Ty::known("boolean"),
                Literal::Null => Ty::Null,
            },
            Expr::Name(name) => self.name(name),
            Expr::Index(target, index) => self.index(target, index),
            Expr::Field(target, name) => self.field(target, name),
            Expr::Call { target, name, args } => self.call(target.as_deref(), name, args),
            Expr::Not(operand) => {
                let ty = self.check(operand);
                if ty.is_non_boolean() {
                    self.report(format!(
                        "bad operand type {} for unary operator '!'",
                        ty.describe()
                    ));
                }
                Ty::known("boolean")
            }
            Expr::Negate(operand) => {
                let ty = self.check(operand);
                if ty.is_non_numeric() {
                    self.report(format!(
                        "bad operand type {} for unary operator '-'",
                        ty.describe()
                    ));
                }
                ty
            }
            Expr::Binary(operator, left, right) => self.binary(operator, left, right),
            Expr::InstanceOf(operand, target) => {
                let ty = self.check(operand);
                if ty.is_primitive() {
                    self.report(format!(
                        "unexpected type {} for instanceof {}",
                        ty.describe(),
                        target
                    ));
                }
                Ty::known("boolean")
            }
            Expr::Lambda(variable, body) => {
                self.lambda_variables.push(variable.clone());
                self.check(body);
                self.lambda_variables.pop();
                Ty::Unknown
            }
        }
    }

    fn name(&mut self, name: &str) -> Ty {
        if self.lambda_variables.iter().any(|v| v == name) {
            return Ty::Unknown;
        }
        if let Some(index) = name.strip_prefix(ARGUMENT_PREFIX) {
            return index
                .parse::<usize>()
                .ok()
                .and_then(|i| self.method.params.get(i))
                .map_or(Ty::Unknown, |p| Ty::Known(p.ty.clone()));
        }
        match name {
            notation::RECEIVER => {
                if self.method.is_static {
                    self.report("receiver is not available in a static method".to_string());
                }
                Ty::Known(self.declaring().as_type_ref())
            }
            notation::RESULT => {
                if !self.postcondition {
                    self.report("result is only visible in postconditions".to_string());
                    return Ty::Unknown;
                }
                match self.method.return_type.as_ref().filter(|_| self.method.returns_value()) {
                    Some(ty) => Ty::Known(ty.clone()),
                    None => {
                        self.report(format!("{} returns no value", self.method.name));
                        Ty::Unknown
                    }
                }
            }
            _ if name.starts_with(|c: char| c.is_uppercase())
                || matches!(name, "java" | "javax")
                || self.declaring().package().split('.').next() == Some(name) =>
            {
                Ty::Path(name.to_string())
            }
            _ => {
                self.report(format!("cannot find symbol: variable {name}"));
                Ty::Unknown
            }
        }
    }

    fn index(&mut self, target: &Expr, index: &Expr) -> Ty {
        let ty = self.check(target);
        let index_ty = self.check(index);
        if matches!(&index_ty, Ty::Known(t) if !t.is_integral()) {
            self.report(format!("incompatible types: {} cannot be an index", index_ty.describe()));
        }
        match ty {
            Ty::Known(t) => match t.component() {
                Some(component) => Ty::Known(component),
                None => {
                    self.report(format!("array required, but {} found", t.name()));
                    Ty::Unknown
                }
            },
            _ => Ty::Unknown,
        }
    }

    fn field(&mut self, target: &Expr, name: &str) -> Ty {
        match self.check(target) {
            Ty::Path(path) => {
                let qualified = format!("{path}.{name}");
                let declaring = self.declaring();
                if path == declaring.qualified_name || path == declaring.simple_name() {
                    match declaring.field(name).map(|f| f.ty.clone()) {
                        Some(ty) => Ty::Known(ty),
                        None => {
                            self.report(format!("cannot find symbol: variable {qualified}"));
                            Ty::Unknown
                        }
                    }
                } else {
                    Ty::Path(qualified)
                }
            }
            Ty::Known(ty) if ty.is_primitive() => {
                self.report(format!("{} cannot be dereferenced", ty.name()));
                Ty::Unknown
            }
            Ty::Known(ty) if ty.is_array() => {
                if name == "length" {
                    Ty::known("int")
                } else {
                    self.report(format!("cannot find symbol: variable {name} in {}", ty.name()));
                    Ty::Unknown
                }
            }
            Ty::Known(ty) if self.is_declaring_type(&ty) => {
                match self.declaring().field(name).map(|f| f.ty.clone()) {
                    Some(field) => Ty::Known(field),
                    None => {
                        let diagnostic = format!(
                            "cannot find symbol: variable {name} in {}",
                            self.declaring().simple_name()
                        );
                        self.report(diagnostic);
                        Ty::Unknown
                    }
                }
            }
            Ty::Null => {
                self.report("<null> cannot be dereferenced".to_string());
                Ty::Unknown
            }
            _ => Ty::Unknown,
        }
    }

    fn call(&mut self, target: Option<&Expr>, name: &str, args: &[Expr]) -> Ty {
        for arg in args {
            self.check(arg);
        }

        let target_ty = match target {
            Some(target) => self.check(target),
            None if self.method.is_static => Ty::Path(self.declaring().qualified_name.clone()),
            None => Ty::Known(self.declaring().as_type_ref()),
        };

        match target_ty {
            Ty::Known(ty) if ty.is_primitive() => {
                self.report(format!("{} cannot be dereferenced", ty.name()));
                Ty::Unknown
            }
            Ty::Null => {
                self.report("<null> cannot be dereferenced".to_string());
                Ty::Unknown
            }
            Ty::Known(ty) if self.is_declaring_type(&ty) => self.member_call(name, args.len(), false),
            Ty::Path(path) => {
                let declaring = self.declaring();
                if path == declaring.qualified_name || path == declaring.simple_name() {
                    self.member_call(name, args.len(), true)
                } else {
                    library_result(name)
                }
            }
            _ => library_result(name),
        }
    }

    /// A method of the declaring type, looked up by name and arity
    fn member_call(&mut self, name: &str, arity: usize, static_only: bool) -> Ty {
        let declaring = self.declaring();
        let member = declaring
            .methods_named(name)
            .find(|m| m.params.len() == arity && (!static_only || m.is_static));
        if let Some(member) = member {
            return match &member.return_type {
                Some(ty) => Ty::Known(ty.clone()),
                None => Ty::known("void"),
            };
        }

        let inherited = !static_only
            && (OBJECT_METHODS.contains(&name) || !declaring.interfaces.is_empty());
        if inherited {
            return library_result(name);
        }
        let diagnostic = format!(
            "cannot find symbol: method {name} in {}",
            declaring.simple_name()
        );
        self.report(diagnostic);
        Ty::Unknown
    }

    fn binary(&mut self, operator: &str, left: &Expr, right: &Expr) -> Ty {
        let left_ty = self.check(left);
        let right_ty = self.check(right);
        let bad_operands = |scope: &mut Self| {
            scope.report(format!(
                "bad operand types for binary operator '{operator}': {} and {}",
                left_ty.describe(),
                right_ty.describe()
            ));
        };

        match operator {
            "&&" | "||" => {
                if left_ty.is_non_boolean() || right_ty.is_non_boolean() {
                    bad_operands(self);
                }
                Ty::known("boolean")
            }
            "<" | ">" | "<=" | ">=" => {
                if left_ty.is_non_numeric() || right_ty.is_non_numeric() {
                    bad_operands(self);
                }
                Ty::known("boolean")
            }
            "==" | "!=" => {
                let null_vs_primitive = (left_ty == Ty::Null && right_ty.is_primitive())
                    || (right_ty == Ty::Null && left_ty.is_primitive());
                let mismatched = match (&left_ty, &right_ty) {
                    (Ty::Known(l), Ty::Known(r)) if l.is_primitive() && r.is_primitive() => {
                        l.is_boolean() != r.is_boolean()
                    }
                    _ => false,
                };
                if null_vs_primitive || mismatched {
                    self.report(format!(
                        "incomparable types: {} and {}",
                        left_ty.describe(),
                        right_ty.describe()
                    ));
                }
                Ty::known("boolean")
            }
            "&" | "|" | "^" => match (&left_ty, &right_ty) {
                (Ty::Known(l), Ty::Known(r)) if l.is_boolean() && r.is_boolean() => {
                    Ty::known("boolean")
                }
                (Ty::Known(l), Ty::Known(r)) if l.is_integral() && r.is_integral() => {
                    left_ty.clone()
                }
                (Ty::Known(_), Ty::Known(_)) | (Ty::Null, _) | (_, Ty::Null) => {
                    bad_operands(self);
                    Ty::Unknown
                }
                _ => Ty::Unknown,
            },
            "+" if matches!(&left_ty, Ty::Known(t) if t.is_string())
                || matches!(&right_ty, Ty::Known(t) if t.is_string()) =>
            {
                Ty::known("java.lang.String")
            }
            _ => {
                if left_ty.is_non_numeric() || right_ty.is_non_numeric() {
                    bad_operands(self);
                    return Ty::Unknown;
                }
                match (&left_ty, &right_ty) {
                    (Ty::Known(l), Ty::Known(r)) if !l.is_integral() || !r.is_integral() => {
                        Ty::known("double")
                    }
                    (Ty::Known(_), Ty::Known(_)) => left_ty.clone(),
                    _ => Ty::Unknown,
                }
            }
        }
    }
}

fn library_result(name: &str) -> Ty {
    if BOOLEAN_METHODS.contains(&name) {
        Ty::known("boolean")
    } else if INT_METHODS.contains(&name) {
        Ty::known("int")
    } else {
        Ty::Unknown
    }
}

/// Placeholder name of `args[i]` in the parsed tree
const ARGUMENT_PREFIX: &str = "__arg";

/// Replaces `args[i]` with placeholder names, reporting indexes out of range
fn bind_arguments(method: &MethodContext, condition: &str, diagnostics: &mut Vec<String>) -> String {
    let mut bound = String::with_capacity(condition.len());
    let mut rest = condition;
    while let Some(start) = rest.find("args[") {
        let preceded_by_word = rest[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.');
        let after = &rest[start + "args[".len()..];
        let digits: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
        let closes = after[digits.len()..].starts_with(']');
        if preceded_by_word || digits.is_empty() || !closes {
            bound.push_str(&rest[..start + "args[".len()]);
            rest = after;
            continue;
        }
        let index: usize = digits.parse().unwrap_or(usize::MAX);
        if index >= method.params.len() {
            diagnostics.push(format!(
                "args[{index}] is out of range for {} parameter(s)",
                method.params.len()
            ));
        }
        bound.push_str(&rest[..start]);
        bound.push_str(&format!("{ARGUMENT_PREFIX}{index}"));
        rest = &after[digits.len() + 1..];
    }
    bound.push_str(rest);
    bound
}

/// Checks conditions against declared types without a compiler
#[derive(Debug, Default, Clone, Copy)]
pub struct ScopeChecker;

impl ScopeChecker {
    pub fn new() -> Self {
        Self
    }

    /// Diagnostics for one condition of `method`, empty when it type checks
    pub fn diagnostics(&self, method: &MethodContext, condition: &str, postcondition: bool) -> Vec<String> {
        let mut diagnostics = Vec::new();
        let bound = bind_arguments(method, condition, &mut diagnostics);

        let expr = match Parser::parse(&bound) {
            Ok(expr) => expr,
            Err(message) => {
                diagnostics.push(message.replace(ARGUMENT_PREFIX, "args"));
                return diagnostics;
            }
        };

        let mut scope = Scope {
            method,
            postcondition,
            lambda_variables: Vec::new(),
            diagnostics,
        };
        let ty = scope.check(&expr);
        if let Ty::Known(t) = &ty {
            if !t.is_boolean() {
                scope.report(format!(
                    "incompatible types: {} cannot be converted to boolean",
                    t.name()
                ));
            }
        } else if ty == Ty::Null {
            scope.report("incompatible types: <null> cannot be converted to boolean".to_string());
        }
        scope.diagnostics
    }
}

impl TypeChecker for ScopeChecker {
    fn name(&self) -> &str {
        "scope"
    }

    fn typecheck(&self, snippet: &SourceSnippet<'_>) -> Result<TypeCheck> {
        let diagnostics = self.diagnostics(
            snippet.method(),
            snippet.condition(),
            snippet.is_postcondition(),
        );
        if diagnostics.is_empty() {
            Ok(TypeCheck::Ok)
        } else {
            Ok(TypeCheck::Diagnostics(diagnostics))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docguard_core::entities::{DeclaringType, Field, MemberMethod, Parameter};
    use pretty_assertions::assert_eq;

    fn method(is_static: bool) -> MethodContext {
        let mut declaring = DeclaringType::new("org.example.Box");
        declaring.fields = vec![
            Field::new("count", "int"),
            Field {
                name: "MAX".to_string(),
                ty: TypeRef::new("int"),
                is_static: true,
            },
        ];
        declaring.methods = vec![MemberMethod {
            name: "size".to_string(),
            params: Vec::new(),
            return_type: Some(TypeRef::new("int")),
            is_static: false,
        }];
        MethodContext::builder()
            .name("put")
            .params(vec![
                Parameter::new("count", "int"),
                Parameter::new("name", "java.lang.String"),
                Parameter::new("values", "Object[]"),
            ])
            .return_type(Some(TypeRef::new("boolean")))
            .is_static(is_static)
            .declaring_type(declaring)
            .build()
            .unwrap()
    }

    fn check(condition: &str, postcondition: bool) -> Vec<String> {
        ScopeChecker::new().diagnostics(&method(false), condition, postcondition)
    }

    #[test]
    fn test_well_typed_conditions() {
        for condition in [
            "args[1]==null",
            "args[0]>=0 && args[0]<receiver.size()",
            "args[0]<=receiver.count || args[0]>org.example.Box.MAX",
            "!args[1].equals(\"\")",
            "java.util.Arrays.stream(args[2]).anyMatch(e -> e==null)",
            "java.util.Arrays.asList(args[2]).contains(null)",
            "args[2].length==0",
            "args[1] instanceof String",
            "(args[0]>0) || (args[1]!=null)",
        ] {
            assert_eq!(check(condition, false), Vec::<String>::new(), "{condition}");
        }
        assert!(check("result==true", true).is_empty());
        assert!(check("result==args[0]+receiver.count", false).len() == 1);
    }

    #[test]
    fn test_unknown_identifiers() {
        assert_eq!(check("args[3]==null", false), vec!["args[3] is out of range for 3 parameter(s)"]);
        assert_eq!(check("nmae==null", false), vec!["cannot find symbol: variable nmae"]);
        assert_eq!(
            check("receiver.sise()==0", false),
            vec!["cannot find symbol: method sise in Box"]
        );
        assert_eq!(
            check("receiver.cuont>0", false),
            vec!["cannot find symbol: variable cuont in Box"]
        );
        assert_eq!(
            check("org.example.Box.MIN>0", false),
            vec!["cannot find symbol: variable org.example.Box.MIN"]
        );
    }

    #[test]
    fn test_result_scope() {
        assert_eq!(
            check("result==true", false),
            vec!["result is only visible in postconditions"]
        );
    }

    #[test]
    fn test_type_errors() {
        assert_eq!(
            check("args[1]<0", false),
            vec!["bad operand types for binary operator '<': java.lang.String and int"]
        );
        assert_eq!(check("args[0]==null", false), vec!["incomparable types: int and <null>"]);
        assert_eq!(check("args[0].equals(1)", false), vec!["int cannot be dereferenced"]);
        assert_eq!(
            check("!args[0]", false),
            vec!["bad operand type int for unary operator '!'"]
        );
        assert_eq!(
            check("args[1]", false),
            vec!["incompatible types: java.lang.String cannot be converted to boolean"]
        );
        assert_eq!(
            check("args[0] && args[0]>1", false),
            vec!["bad operand types for binary operator '&&': int and boolean"]
        );
    }

    #[test]
    fn test_receiver_in_static_method() {
        let diagnostics = ScopeChecker::new().diagnostics(&method(true), "receiver.count>0", false);
        assert_eq!(diagnostics, vec!["receiver is not available in a static method"]);
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(check("args[0]==", false), vec!["illegal start of expression"]);
        assert_eq!(check("(args[0]>1", false), vec!["')' expected"]);
        assert_eq!(check("args[0] # 1", false), vec!["illegal character '#'"]);
    }
}
