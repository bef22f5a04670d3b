//! Host-language source wrapping one condition

use docguard_core::entities::MethodContext;
use docguard_core::notation;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;

/// Name of the generated class, and of the file it is written to
pub const CLASS_NAME: &str = "GeneratedSpecs";

static ARG_REFERENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bargs\[(\d+)\]").ok());

static INSTANCEOF_TARGET: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\binstanceof\s+([A-Z][\w$]*)").ok());

/// Simple names resolved without an import
const IMPLICIT_TYPES: &[&str] = &[
    "Object",
    "String",
    "CharSequence",
    "Number",
    "Integer",
    "Long",
    "Short",
    "Byte",
    "Double",
    "Float",
    "Character",
    "Boolean",
    "Comparable",
    "Iterable",
    "Class",
    "Enum",
    "Runnable",
    "Throwable",
    "Exception",
    "RuntimeException",
];

/// One condition placed in a compilable method body
///
/// The rendered source declares a `check` method whose parameters are the
/// receiver, the method's own parameters under their real names and, for
/// postconditions, the result. The condition only compiles if every name it
/// uses is one of those, with the declared types.
#[derive(Debug, Clone)]
pub struct SourceSnippet<'a> {
    method: &'a MethodContext,
    condition: String,
    postcondition: bool,
}

impl<'a> SourceSnippet<'a> {
    pub fn new(method: &'a MethodContext, condition: impl Into<String>, postcondition: bool) -> Self {
        Self {
            method,
            condition: condition.into(),
            postcondition,
        }
    }

    pub fn method(&self) -> &MethodContext {
        self.method
    }

    /// The condition in `args[i]` notation
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// True when `result` is in scope
    pub fn is_postcondition(&self) -> bool {
        self.postcondition
    }

    /// The condition with `args[i]` replaced by parameter names
    ///
    /// References past the last parameter are left untouched so that they
    /// fail to compile.
    pub fn host_condition(&self) -> String {
        let Some(pattern) = ARG_REFERENCE.as_ref() else {
            return self.condition.clone();
        };
        pattern
            .replace_all(&self.condition, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.method.params.get(index))
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Import lines for the declaring type and same-package `instanceof` targets
    pub fn imports(&self) -> Vec<String> {
        let declaring = &self.method.declaring_type;
        let package = declaring.package();
        if package.is_empty() {
            return Vec::new();
        }

        let mut imports = vec![format!("import {};", declaring.qualified_name)];
        if let Some(pattern) = INSTANCEOF_TARGET.as_ref() {
            for caps in pattern.captures_iter(&self.condition) {
                let target = &caps[1];
                if IMPLICIT_TYPES.contains(&target) || target == declaring.simple_name() {
                    continue;
                }
                let import = format!("import {package}.{target};");
                if !imports.contains(&import) {
                    imports.push(import);
                }
            }
        }
        imports
    }

    /// Complete compilation unit
    pub fn render(&self) -> String {
        let declaring = &self.method.declaring_type;

        let mut formals = vec![format!(
            "{} {}",
            declaring.as_type_ref().name(),
            notation::RECEIVER
        )];
        formals.extend(
            self.method
                .params
                .iter()
                .map(|p| format!("{} {}", p.ty.name(), p.name)),
        );
        if self.postcondition {
            if let Some(return_type) = self.method.return_type.as_ref().filter(|_| self.method.returns_value()) {
                formals.push(format!("{} {}", return_type.name(), notation::RESULT));
            }
        }

        let class_params = generic_parameters(&declaring.type_params);
        let method_params = match generic_parameters(&self.method.type_params) {
            params if params.is_empty() => String::new(),
            params => format!("{params} "),
        };

        let mut source = String::new();
        for import in self.imports() {
            source.push_str(&import);
            source.push('\n');
        }
        source.push_str(&format!("public class {CLASS_NAME}{class_params} {{\n"));
        source.push_str(&format!(
            "    public {method_params}void check({}) {{\n",
            formals.join(", ")
        ));
        source.push_str(&format!("        if ({}) {{\n", self.host_condition()));
        source.push_str("            return;\n");
        source.push_str("        }\n");
        source.push_str("    }\n");
        source.push_str("}\n");
        source
    }
}

impl fmt::Display for SourceSnippet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn generic_parameters(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}
