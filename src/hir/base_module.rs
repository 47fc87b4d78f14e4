//! The builtin `pkl:base` module.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

use super::types::Type;
use crate::ast::{Class, Document, Module, Node, NodeKind, TypeAlias};
use crate::base::FileId;
use crate::error::{Error, Result};

/// Uri under which the base module is imported.
pub const BASE_URI: &str = "pkl:base";

const BASE_SOURCE: &str = include_str!("base.pkl");

/// Classes the type system refers to directly.
const REQUIRED_CLASSES: &[&str] = &[
    "Any",
    "Null",
    "Boolean",
    "Number",
    "Int",
    "Float",
    "String",
    "Annotation",
    "Object",
    "Dynamic",
    "Typed",
    "Module",
    "Listing",
    "Mapping",
    "List",
    "Set",
    "Map",
    "Function",
    "Class",
    "TypeAlias",
    "Resource",
];

/// Parsed base module with its builtin classes indexed by name.
///
/// Created once per project and shared read-only by every query through
/// [`Context`](super::Context).
pub struct BaseModule {
    document: Arc<Document>,
    classes: FxHashMap<SmolStr, Class>,
    type_aliases: FxHashMap<SmolStr, TypeAlias>,
}

impl BaseModule {
    /// Load the bundled base module.
    pub fn new() -> Result<Self> {
        Self::from_source(BASE_SOURCE)
    }

    /// Load a base module from custom source, e.g. a reduced one in tests.
    pub fn from_source(source: &str) -> Result<Self> {
        let document = Document::new(FileId::BASE, BASE_URI, 0, source);
        if !document.errors().is_empty() {
            debug!(errors = document.errors().len(), "base module parsed with errors");
        }
        let module = Module::cast(document.root()).ok_or(Error::MissingBuiltin("module"))?;

        let classes: FxHashMap<_, _> = module
            .classes()
            .into_iter()
            .filter_map(|c| Some((c.name().ok()?, c)))
            .collect();
        let type_aliases = module
            .type_aliases()
            .into_iter()
            .filter_map(|t| Some((t.name().ok()?, t)))
            .collect();

        if let Some(missing) = REQUIRED_CLASSES.iter().find(|name| !classes.contains_key(**name)) {
            return Err(Error::MissingBuiltin(*missing));
        }

        Ok(Self {
            document,
            classes,
            type_aliases,
        })
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn module(&self) -> Node {
        self.document.root()
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    pub fn type_alias(&self, name: &str) -> Option<&TypeAlias> {
        self.type_aliases.get(name)
    }

    /// Whether `node` belongs to the base module
    pub fn contains(&self, node: &Node) -> bool {
        node.file() == FileId::BASE && Arc::ptr_eq(node.document(), &self.document)
    }

    /// Whether `node` is the builtin class named `name`
    pub fn is_class(&self, node: &Node, name: &str) -> bool {
        node.kind() == NodeKind::Class && self.class(name).is_some_and(|c| c.node() == node)
    }

    /// Non-generic type of builtin class `name`; unknown if absent.
    pub fn class_type(&self, name: &str) -> Type {
        self.class(name)
            .map(|c| Type::class(c.node().clone(), Vec::new()))
            .unwrap_or(Type::Unknown)
    }

    /// Builtin class `name` applied to `args`.
    pub fn generic_type(&self, name: &str, args: Vec<Type>) -> Type {
        self.class(name)
            .map(|c| Type::class(c.node().clone(), args))
            .unwrap_or(Type::Unknown)
    }

    pub fn any_type(&self) -> Type {
        self.class_type("Any")
    }

    pub fn null_type(&self) -> Type {
        self.class_type("Null")
    }

    pub fn boolean_type(&self) -> Type {
        self.class_type("Boolean")
    }

    pub fn int_type(&self) -> Type {
        self.class_type("Int")
    }

    pub fn float_type(&self) -> Type {
        self.class_type("Float")
    }

    pub fn string_type(&self) -> Type {
        self.class_type("String")
    }

    pub fn annotation_type(&self) -> Type {
        self.class_type("Annotation")
    }

    pub fn dynamic_type(&self) -> Type {
        self.class_type("Dynamic")
    }

    pub fn typed_type(&self) -> Type {
        self.class_type("Typed")
    }

    pub fn module_type(&self) -> Type {
        self.class_type("Module")
    }

    pub fn resource_type(&self) -> Type {
        self.class_type("Resource")
    }
}

impl std::fmt::Debug for BaseModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseModule")
            .field("classes", &self.classes.len())
            .field("type_aliases", &self.type_aliases.len())
            .finish()
    }
}
