//! Error taxonomy for the generation pipeline.
//!
//! Every variant is fatal for the run: the pipeline either produces a
//! complete set of files or aborts with one of these, naming the offending
//! model, field or action.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodegenError>;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// The annotation text is not valid type syntax at all
    #[error("{context}: invalid type annotation `{annotation}`: {source}")]
    InvalidAnnotation {
        context: String,
        annotation: String,
        #[source]
        source: syn::Error,
    },

    /// The annotation parses but uses a form the type parser cannot classify
    #[error("{context}: unsupported type `{annotation}`: {reason}")]
    UnsupportedType {
        context: String,
        annotation: String,
        reason: String,
    },

    /// A dictionary key does not serialize to a string
    #[error("{context}: dictionary key type `{key}` is not string-compatible")]
    NonStringDictKey { context: String, key: String },

    /// A reference resolved to the wrong kind of declaration
    #[error("{context}: `{name}` is a {found}, expected a {expected}")]
    WrongKind {
        context: String,
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{context}: unknown {kind} `{name}`")]
    UnknownDeclaration {
        context: String,
        kind: &'static str,
        name: String,
    },

    #[error("{context}: ambiguous reference `{name}`, candidates: {}", .candidates.join(", "))]
    AmbiguousReference {
        context: String,
        name: String,
        candidates: Vec<String>,
    },

    #[error("{context}: `{name}` expects {expected} generic argument(s), found {found}")]
    GenericArity {
        context: String,
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("inheritance cycle: {}", .0.join(" -> "))]
    InheritanceCycle(Vec<String>),

    #[error("duplicate declaration `{0}`")]
    DuplicateDeclaration(String),

    #[error("unresolved name collision: `{name}` is claimed by {}", .owners.join(", "))]
    UnresolvedNameCollision { name: String, owners: Vec<String> },

    /// The wrapper-level graph must be acyclic; hitting this means a
    /// structural cycle was not broken by a self-reference.
    #[error("dependency cycle: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    /// Two controllers map to the same output directory
    #[error("controllers {} would both be written to `{directory}`", .owners.join(" and "))]
    OutputCollision {
        directory: String,
        owners: Vec<String>,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl CodegenError {
    pub fn internal(message: impl Into<String>) -> Self {
        CodegenError::Internal(message.into())
    }
}
