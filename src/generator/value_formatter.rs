//! TypeScript value literals: enum members, request options, error maps.

use crate::models::LiteralValue;
use crate::utils::{escape_js_string, quote_if_needed};

const INDENT: &str = "  ";

/// A JavaScript value expression
#[derive(Debug, Clone, PartialEq)]
pub enum TsValue {
    Literal(LiteralValue),
    /// An expression emitted verbatim (`args.user_id`)
    Raw(String),
    Array(Vec<TsValue>),
    /// Properties in insertion order
    Object(Vec<(String, TsValue)>),
}

impl TsValue {
    pub fn string(s: impl Into<String>) -> Self {
        TsValue::Literal(LiteralValue::Str(s.into()))
    }

    pub fn raw(expr: impl Into<String>) -> Self {
        TsValue::Raw(expr.into())
    }

    /// Render on a single line
    pub fn to_ts(&self) -> String {
        match self {
            TsValue::Literal(value) => format_literal(value),
            TsValue::Raw(expr) => expr.clone(),
            TsValue::Array(items) => {
                let items: Vec<String> = items.iter().map(TsValue::to_ts).collect();
                format!("[{}]", items.join(", "))
            }
            TsValue::Object(props) if props.is_empty() => "{}".to_string(),
            TsValue::Object(props) => {
                let props: Vec<String> = props
                    .iter()
                    .map(|(key, value)| format!("{}: {}", quote_if_needed(key), value.to_ts()))
                    .collect();
                format!("{{ {} }}", props.join(", "))
            }
        }
    }

    /// Render the outermost object one property per line, nested values inline
    pub fn to_ts_block(&self, depth: usize) -> String {
        match self {
            TsValue::Object(props) if !props.is_empty() => {
                let inner = INDENT.repeat(depth + 1);
                let mut output = String::from("{\n");
                for (key, value) in props {
                    output.push_str(&format!(
                        "{inner}{}: {},\n",
                        quote_if_needed(key),
                        value.to_ts()
                    ));
                }
                output.push_str(&INDENT.repeat(depth));
                output.push('}');
                output
            }
            other => other.to_ts(),
        }
    }
}

/// Render a literal the way it is written in TypeScript source
pub fn format_literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Str(s) => format!("\"{}\"", escape_js_string(s)),
        LiteralValue::Int(i) => i.to_string(),
        LiteralValue::Float(f) if f.is_nan() => "NaN".to_string(),
        LiteralValue::Float(f) if f.is_infinite() && *f > 0.0 => "Infinity".to_string(),
        LiteralValue::Float(f) if f.is_infinite() => "-Infinity".to_string(),
        LiteralValue::Float(f) => f.to_string(),
        LiteralValue::Bool(b) => b.to_string(),
        LiteralValue::Null => "null".to_string(),
    }
}
