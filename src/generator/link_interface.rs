use super::action_interface::accessor;
use super::type_mapper::format_field;
use super::{GeneratorContext, Interface};
use crate::error::Result;
use crate::models::{ControllerWrapper, FieldWrapper};
use crate::utils::{escape_js_string, route_placeholders};

const QUERY_HELPER: &str = "\
function appendQuery(query: URLSearchParams, key: string, value: unknown): void {
  if (value === undefined || value === null) return;
  if (Array.isArray(value)) {
    for (const item of value) query.append(key, String(item));
    return;
  }
  query.append(key, String(value));
}
";

/// `getLink` for a controller's page route
pub struct LinkInterface<'a> {
    ctx: GeneratorContext<'a>,
    controller: &'a ControllerWrapper,
}

impl<'a> LinkInterface<'a> {
    pub fn new(ctx: GeneratorContext<'a>, controller: &'a ControllerWrapper) -> Self {
        Self { ctx, controller }
    }

    fn split_params(&self) -> (Vec<&'a FieldWrapper>, Vec<&'a FieldWrapper>) {
        let placeholders = route_placeholders(&self.controller.url);
        self.controller
            .render_params
            .iter()
            .partition(|p| placeholders.contains(&p.name))
    }
}

impl Interface for LinkInterface<'_> {
    fn to_ts(&self) -> Result<String> {
        let (path, query) = self.split_params();

        let mut arguments = Vec::new();
        for field in &self.controller.render_params {
            arguments.push(format_field(field, &self.ctx)?);
        }
        let signature = if arguments.is_empty() {
            "args: Record<string, never> = {}".to_string()
        } else if self.controller.render_params.iter().all(|f| !f.required) {
            format!("args: {{ {} }} = {{}}", arguments.join("; "))
        } else {
            format!("args: {{ {} }}", arguments.join("; "))
        };

        let mut output = String::new();
        if !query.is_empty() {
            output.push_str(QUERY_HELPER);
            output.push('\n');
        }
        output.push_str(&format!("export function getLink({}): string {{\n", signature));
        output.push_str(&format!(
            "  const url = {};\n",
            url_expression(&self.controller.url, &path)
        ));

        if query.is_empty() {
            output.push_str("  return url;\n");
        } else {
            output.push_str("  const query = new URLSearchParams();\n");
            for field in &query {
                output.push_str(&format!(
                    "  appendQuery(query, \"{}\", {});\n",
                    escape_js_string(&field.name),
                    accessor(&field.name)
                ));
            }
            output.push_str("  const search = query.toString();\n");
            output.push_str("  return search ? `${url}?${search}` : url;\n");
        }
        output.push_str("}\n");
        Ok(output)
    }
}

/// The route as a JavaScript expression, with path parameters substituted
fn url_expression(url: &str, path: &[&FieldWrapper]) -> String {
    if path.is_empty() {
        return format!("\"{}\"", escape_js_string(url));
    }

    let mut template = String::from("`");
    let mut rest = url;
    while let Some(start) = rest.find('{') {
        let Some(end) = rest[start..].find('}').map(|e| start + e) else {
            break;
        };
        template.push_str(&escape_template(&rest[..start]));

        let placeholder = &rest[start + 1..end];
        let name = placeholder.split(':').next().unwrap_or_default().trim();
        if path.iter().any(|p| p.name == name) {
            template.push_str(&format!(
                "${{encodeURIComponent(String({}))}}",
                accessor(name)
            ));
        } else {
            template.push_str(&escape_template(&rest[start..=end]));
        }
        rest = &rest[end + 1..];
    }
    template.push_str(&escape_template(rest));
    template.push('`');
    template
}

fn escape_template(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace('$', "\\$")
}
