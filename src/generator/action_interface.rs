use std::collections::BTreeMap;

use super::type_mapper::format_field;
use super::value_formatter::TsValue;
use super::{GeneratorContext, Interface};
use crate::error::Result;
use crate::models::{ActionWrapper, ControllerId, FieldWrapper, ModelId, WrapperRef};
use crate::utils::needs_quoting;

/// Name of the request body property in an action's arguments
const REQUEST_BODY: &str = "requestBody";

/// A callable action.
///
/// With a controller the response type is that controller's envelope;
/// without one it is the union of every mounting controller's envelope.
pub struct ActionInterface<'a> {
    ctx: GeneratorContext<'a>,
    action: &'a ActionWrapper,
    controller: Option<ControllerId>,
}

impl<'a> ActionInterface<'a> {
    pub fn new(
        ctx: GeneratorContext<'a>,
        action: &'a ActionWrapper,
        controller: Option<ControllerId>,
    ) -> Self {
        Self {
            ctx,
            action,
            controller,
        }
    }

    pub fn function_name(&self) -> String {
        self.ctx.format_function_name(&self.action.name)
    }

    /// Parameters, headers, request body and the trailing abort signal
    fn arguments(&self) -> Result<Vec<String>> {
        let mut arguments = Vec::new();
        for field in self.action.params.iter().chain(&self.action.headers) {
            arguments.push(format_field(field, &self.ctx)?);
        }
        if let Some(body) = self.action.request_body {
            arguments.push(format!(
                "{}: {}",
                REQUEST_BODY,
                self.ctx.type_name(WrapperRef::Model(body))
            ));
        }
        arguments.push("signal?: AbortSignal".to_string());
        Ok(arguments)
    }

    /// Whether the whole argument object may be omitted
    fn arguments_optional(&self) -> bool {
        self.action.request_body.is_none()
            && self
                .action
                .params
                .iter()
                .chain(&self.action.headers)
                .all(|f| !f.required)
    }

    /// Resolved payload type, before the promise wrapper
    pub fn response_type(&self) -> Result<String> {
        if self.action.is_raw_response {
            return Ok("Response".to_string());
        }

        let body = match self.controller {
            Some(controller) if self.action.response_bodies.contains_key(&controller) => {
                self.body_name(self.action.response_bodies[&controller])
            }
            _ => {
                let mut members: Vec<String> = Vec::new();
                for &body in self.action.response_bodies.values() {
                    let name = self.body_name(body);
                    if !members.contains(&name) {
                        members.push(name);
                    }
                }
                if members.is_empty() {
                    "void".to_string()
                } else {
                    members.join(" | ")
                }
            }
        };

        if self.action.is_streaming_response {
            Ok(format!("AsyncGenerator<{}, void, unknown>", body))
        } else {
            Ok(body)
        }
    }

    fn body_name(&self, body: Option<ModelId>) -> String {
        body.map_or_else(
            || "void".to_string(),
            |id| self.ctx.type_name(WrapperRef::Model(id)).to_string(),
        )
    }

    /// `name(args: {...}): Promise<R>`, as declared on a controller interface
    pub fn to_signature(&self) -> Result<String> {
        let marker = if self.arguments_optional() { "?" } else { "" };
        Ok(format!(
            "{}(args{}: {{ {} }}): Promise<{}>",
            self.function_name(),
            marker,
            self.arguments()?.join("; "),
            self.response_type()?
        ))
    }

    fn request_options(&self) -> TsValue {
        let mut options = vec![
            ("method".to_string(), TsValue::string(&self.action.method)),
            ("url".to_string(), TsValue::string(&self.action.url)),
        ];

        let path = self.action.path_params();
        if !path.is_empty() {
            options.push(("path".to_string(), forward_fields(path)));
        }
        let query = self.action.query_params();
        if !query.is_empty() {
            options.push(("query".to_string(), forward_fields(query)));
        }
        if !self.action.headers.is_empty() {
            options.push((
                "headers".to_string(),
                forward_fields(self.action.headers.iter().collect()),
            ));
        }
        if self.action.request_body.is_some() {
            options.push(("body".to_string(), TsValue::raw(accessor(REQUEST_BODY))));
        }
        options.push(("errors".to_string(), self.error_map()));
        options.push(("signal".to_string(), TsValue::raw(accessor("signal"))));
        if self.action.is_raw_response {
            options.push(("raw".to_string(), TsValue::raw("true")));
        }
        if self.action.is_streaming_response {
            options.push(("stream".to_string(), TsValue::raw("true")));
        }
        TsValue::Object(options)
    }

    /// Status code to the exception names the runtime may decode for it
    fn error_map(&self) -> TsValue {
        let mut by_status: BTreeMap<u16, Vec<TsValue>> = BTreeMap::new();
        for &id in &self.action.exceptions {
            let exception = self.ctx.arena.exception(id);
            by_status
                .entry(exception.status_code)
                .or_default()
                .push(TsValue::string(&exception.raw_name));
        }
        TsValue::Object(
            by_status
                .into_iter()
                .map(|(status, names)| (status.to_string(), TsValue::Array(names)))
                .collect(),
        )
    }
}

impl Interface for ActionInterface<'_> {
    fn to_ts(&self) -> Result<String> {
        let default = if self.arguments_optional() { " = {}" } else { "" };
        Ok(format!(
            "export async function {}(args: {{ {} }}{}): Promise<{}> {{\n  return __request({});\n}}\n",
            self.function_name(),
            self.arguments()?.join("; "),
            default,
            self.response_type()?,
            self.request_options().to_ts_block(1)
        ))
    }
}

/// `args.name`, or `args["X-Name"]` for names that are not identifiers
pub(super) fn accessor(name: &str) -> String {
    if needs_quoting(name) {
        format!("args[{}]", TsValue::string(name).to_ts())
    } else {
        format!("args.{}", name)
    }
}

fn forward_fields(fields: Vec<&FieldWrapper>) -> TsValue {
    TsValue::Object(
        fields
            .into_iter()
            .map(|f| (f.name.clone(), TsValue::raw(accessor(&f.name))))
            .collect(),
    )
}
