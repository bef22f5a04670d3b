use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

const BOXED_NUMERIC: &[&str] = &[
    "Byte",
    "Character",
    "Short",
    "Integer",
    "Long",
    "Float",
    "Double",
];

const COLLECTIONS: &[&str] = &[
    "Collection",
    "List",
    "Set",
    "SortedSet",
    "NavigableSet",
    "Queue",
    "Deque",
    "ArrayList",
    "LinkedList",
    "HashSet",
    "LinkedHashSet",
    "TreeSet",
    "ArrayDeque",
    "PriorityQueue",
    "Vector",
    "Stack",
];

const MAPS: &[&str] = &[
    "Map",
    "HashMap",
    "TreeMap",
    "LinkedHashMap",
    "SortedMap",
    "NavigableMap",
    "ConcurrentMap",
    "ConcurrentHashMap",
];

/// A declared type as written in the host language (`int`, `java.util.List<T>`, `byte[]`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    /// The type as declared
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The type with generic arguments removed (`java.util.List<T>[]` -> `java.util.List[]`)
    pub fn erasure(&self) -> String {
        let mut depth = 0usize;
        let mut erased = String::with_capacity(self.0.len());
        for c in self.0.chars() {
            match c {
                '<' => depth += 1,
                '>' => depth = depth.saturating_sub(1),
                _ if depth == 0 => erased.push(c),
                _ => {}
            }
        }
        erased.trim().to_string()
    }

    /// Unqualified erasure (`java.lang.String[]` -> `String[]`)
    pub fn simple_name(&self) -> String {
        let erased = self.erasure();
        match erased.rfind('.') {
            Some(pos) => erased[pos + 1..].to_string(),
            None => erased,
        }
    }

    /// Simple name without array dimensions
    fn base_name(&self) -> String {
        self.simple_name().trim_end_matches("[]").to_string()
    }

    pub fn is_void(&self) -> bool {
        self.0 == "void"
    }

    pub fn is_primitive(&self) -> bool {
        PRIMITIVES.contains(&self.0.as_str())
    }

    pub fn is_array(&self) -> bool {
        self.0.ends_with("[]")
    }

    /// Component type of an array type
    pub fn component(&self) -> Option<TypeRef> {
        self.0
            .strip_suffix("[]")
            .map(TypeRef::new)
    }

    /// Top-level generic arguments (`Map<K, List<V>>` -> `K`, `List<V>`)
    pub fn type_arguments(&self) -> Vec<TypeRef> {
        let (Some(open), Some(close)) = (self.0.find('<'), self.0.rfind('>')) else {
            return Vec::new();
        };
        if close <= open {
            return Vec::new();
        }

        let mut arguments = Vec::new();
        let mut depth = 0usize;
        let mut current = String::new();
        for c in self.0[open + 1..close].chars() {
            match c {
                '<' => {
                    depth += 1;
                    current.push(c);
                }
                '>' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                }
                ',' if depth == 0 => {
                    arguments.push(TypeRef::new(current.as_str()));
                    current.clear();
                }
                _ => current.push(c),
            }
        }
        if !current.trim().is_empty() {
            arguments.push(TypeRef::new(current.as_str()));
        }
        arguments
    }

    /// Type of the elements of an array or collection
    pub fn element_type(&self) -> Option<TypeRef> {
        if self.is_array() {
            return self.component();
        }
        if self.is_collection() {
            return Some(
                self.type_arguments()
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| TypeRef::new("java.lang.Object")),
            );
        }
        None
    }

    pub fn is_boolean(&self) -> bool {
        !self.is_array() && matches!(self.base_name().as_str(), "boolean" | "Boolean")
    }

    pub fn is_numeric(&self) -> bool {
        if self.is_array() {
            return false;
        }
        let base = self.base_name();
        (self.is_primitive() && base != "boolean") || BOXED_NUMERIC.contains(&base.as_str())
    }

    pub fn is_integral(&self) -> bool {
        self.is_numeric() && !matches!(self.base_name().as_str(), "float" | "double" | "Float" | "Double")
    }

    pub fn is_string(&self) -> bool {
        !self.is_array() && matches!(self.base_name().as_str(), "String" | "CharSequence")
    }

    pub fn is_collection(&self) -> bool {
        !self.is_array() && COLLECTIONS.contains(&self.base_name().as_str())
    }

    pub fn is_map(&self) -> bool {
        !self.is_array() && MAPS.contains(&self.base_name().as_str())
    }

    /// True for arrays and collection types, whose elements can be quantified over
    pub fn is_container(&self) -> bool {
        self.is_array() || self.is_collection()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::new(name)
    }
}

/// Visibility modifiers for declaring types
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

/// A formal parameter of the method under analysis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeRef,

    /// Nullability hint from annotations, when known
    #[serde(default)]
    pub nullable: Option<bool>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            nullable: None,
        }
    }
}

/// A field visible in the declaring type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeRef,

    #[serde(default)]
    pub is_static: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            is_static: false,
        }
    }
}

/// A method visible in the declaring type, other than the one under analysis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberMethod {
    pub name: String,

    #[serde(default)]
    pub params: Vec<TypeRef>,

    /// Absent for `void` methods
    #[serde(default)]
    pub return_type: Option<TypeRef>,

    #[serde(default)]
    pub is_static: bool,
}

impl MemberMethod {
    /// Signature used to tell overloads apart (`size()`, `get(int)`)
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(TypeRef::name).collect();
        format!("{}({})", self.name, params.join(", "))
    }

    pub fn returns_boolean(&self) -> bool {
        self.return_type.as_ref().is_some_and(TypeRef::is_boolean)
    }
}

/// The type declaring the method under analysis, with its visible members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaringType {
    pub qualified_name: String,

    #[serde(default)]
    pub type_params: Vec<String>,

    /// Directly implemented interfaces (simple or qualified names)
    #[serde(default)]
    pub interfaces: Vec<String>,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default)]
    pub fields: Vec<Field>,

    #[serde(default)]
    pub methods: Vec<MemberMethod>,
}

impl DeclaringType {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            type_params: Vec::new(),
            interfaces: Vec::new(),
            visibility: Visibility::Public,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// Package of the type, empty for the default package
    pub fn package(&self) -> &str {
        self.qualified_name
            .rfind('.')
            .map(|pos| &self.qualified_name[..pos])
            .unwrap_or("")
    }

    /// The declaring type used as a parameter type (`Box<T>` for generic types)
    pub fn as_type_ref(&self) -> TypeRef {
        if self.type_params.is_empty() {
            TypeRef::new(self.qualified_name.clone())
        } else {
            TypeRef::new(format!(
                "{}<{}>",
                self.qualified_name,
                self.type_params.join(", ")
            ))
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MemberMethod> {
        self.methods.iter().filter(move |m| m.name == name)
    }
}

/// The method whose documentation is being translated
///
/// Built once per method before translation starts and shared by every tag
/// of that method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct MethodContext {
    /// Simple name of the method (the type's simple name for constructors)
    pub name: String,

    /// Formal parameters in declaration order
    #[builder(default = "Vec::new()")]
    #[serde(default)]
    pub params: Vec<Parameter>,

    /// Declared return type, absent for constructors and `void` methods
    #[builder(default = "None")]
    #[serde(default)]
    pub return_type: Option<TypeRef>,

    #[builder(default = "false")]
    #[serde(default)]
    pub is_constructor: bool,

    #[builder(default = "false")]
    #[serde(default)]
    pub is_static: bool,

    /// Type parameters declared by the method itself
    #[builder(default = "Vec::new()")]
    #[serde(default)]
    pub type_params: Vec<String>,

    pub declaring_type: DeclaringType,
}

impl MethodContext {
    pub fn builder() -> MethodContextBuilder {
        MethodContextBuilder::default()
    }

    /// Human-readable signature, also used as the method's identity in caches
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(|p| p.ty.name()).collect();
        format!(
            "{}.{}({})",
            self.declaring_type.qualified_name,
            self.name,
            params.join(", ")
        )
    }

    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    /// True when a postcondition can refer to the return value
    pub fn returns_value(&self) -> bool {
        !self.is_constructor && self.return_type.as_ref().is_some_and(|t| !t.is_void())
    }

    /// True when the method under analysis is the given sibling member
    pub fn is_same_as(&self, member: &MemberMethod) -> bool {
        member.name == self.name
            && member.params.len() == self.params.len()
            && member
                .params
                .iter()
                .zip(&self.params)
                .all(|(a, b)| a.erasure() == b.ty.erasure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_queries() {
        let list = TypeRef::new("java.util.List<java.lang.String>");
        assert_eq!(list.erasure(), "java.util.List");
        assert_eq!(list.simple_name(), "List");
        assert!(list.is_collection());
        assert!(list.is_container());
        assert!(!list.is_primitive());

        let array = TypeRef::new("java.lang.String[]");
        assert!(array.is_array());
        assert_eq!(array.simple_name(), "String[]");
        assert_eq!(array.component(), Some(TypeRef::new("java.lang.String")));
        assert!(!array.is_string());

        assert!(TypeRef::new("int").is_integral());
        assert!(TypeRef::new("java.lang.Double").is_numeric());
        assert!(!TypeRef::new("double").is_integral());
        assert!(TypeRef::new("boolean").is_boolean());
        assert!(!TypeRef::new("boolean").is_numeric());
        assert!(TypeRef::new("java.util.HashMap<K, V>").is_map());

        let nested = TypeRef::new("java.util.Map<K, java.util.List<V>>");
        assert_eq!(
            nested.type_arguments(),
            vec![TypeRef::new("K"), TypeRef::new("java.util.List<V>")]
        );
        assert_eq!(list.element_type(), Some(TypeRef::new("java.lang.String")));
        assert_eq!(array.element_type(), Some(TypeRef::new("java.lang.String")));
        assert_eq!(TypeRef::new("int").element_type(), None);
    }

    #[test]
    fn test_method_context_builder_defaults() {
        let method = MethodContext::builder()
            .name("put")
            .params(vec![Parameter::new("key", "K"), Parameter::new("value", "V")])
            .declaring_type(DeclaringType::new("com.example.Cache"))
            .build()
            .unwrap();

        assert_eq!(method.signature(), "com.example.Cache.put(K, V)");
        assert_eq!(method.param_index("value"), Some(1));
        assert!(!method.returns_value());
        assert_eq!(method.declaring_type.simple_name(), "Cache");
        assert_eq!(method.declaring_type.package(), "com.example");
    }

    #[test]
    fn test_is_same_as_ignores_generic_arguments() {
        let method = MethodContext::builder()
            .name("addAll")
            .params(vec![Parameter::new("items", "java.util.List<E>")])
            .declaring_type(DeclaringType::new("Bag"))
            .build()
            .unwrap();
        let member = MemberMethod {
            name: "addAll".to_string(),
            params: vec![TypeRef::new("java.util.List")],
            return_type: None,
            is_static: false,
        };
        assert!(method.is_same_as(&member));
    }
}
