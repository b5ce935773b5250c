//! Declarations read from schema files.
//!
//! A schema file describes one backend module: its data models, enums,
//! error payloads and controllers. Type annotations are kept as text and
//! handed to the type parser later.

use serde::{Deserialize, Serialize};

use super::{ActionType, LiteralValue};

/// Contents of one schema file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Module path override (`users::models`); derived from the file path otherwise
    #[serde(default)]
    pub module: Option<String>,
    /// Names brought into scope: `auth::models::Status` or `shared::*`
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub models: Vec<ModelDecl>,
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    #[serde(default)]
    pub exceptions: Vec<ExceptionDecl>,
    #[serde(default)]
    pub controllers: Vec<ControllerDecl>,
}

impl SchemaFile {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default = "default_true")]
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDecl {
    pub name: String,
    /// Generic parameter names (`T`, `K`)
    #[serde(default)]
    pub generics: Vec<String>,
    /// Superclass annotations, in declared order
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumMemberDecl {
    pub name: String,
    /// Missing means `null`
    #[serde(default)]
    pub value: Option<LiteralValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    #[serde(default)]
    pub members: Vec<EnumMemberDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionDecl {
    pub name: String,
    pub status_code: u16,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderDecl {
    /// Model annotation returned by the render function
    #[serde(default)]
    pub returns: Option<String>,
    /// Path and query parameters of the page route
    #[serde(default)]
    pub params: Vec<FieldDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDecl {
    pub name: String,
    #[serde(default)]
    pub kind: ActionType,
    #[serde(default)]
    pub params: Vec<FieldDecl>,
    #[serde(default)]
    pub headers: Vec<FieldDecl>,
    #[serde(default)]
    pub request_body: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub raw_response: bool,
    #[serde(default)]
    pub streaming: bool,
    /// Exception names this action may raise
    #[serde(default)]
    pub exceptions: Vec<String>,
    /// Defaults to `/internal/api/{controller}/{action}`
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_method")]
    pub method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerDecl {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub render: Option<RenderDecl>,
    #[serde(default)]
    pub actions: Vec<ActionDecl>,
}

fn default_true() -> bool {
    true
}

fn default_method() -> String {
    "POST".to_string()
}
