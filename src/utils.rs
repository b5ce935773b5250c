use convert_case::{Case, Casing};
use std::path::{Component, Path};

/// Convert snake_case to camelCase
pub fn to_camel_case(s: &str) -> String {
    s.to_case(Case::Camel)
}

/// Convert any casing to PascalCase
pub fn to_pascal_case(s: &str) -> String {
    s.to_case(Case::Pascal)
}

/// Convert any casing to snake_case
pub fn to_snake_case(s: &str) -> String {
    s.to_case(Case::Snake)
}

/// Split a `a::b::c` module path into segments
pub fn split_module_path(path: &str) -> Vec<String> {
    path.split("::")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Qualified key of a declaration: `a::b::Name`, or `Name` at the root
pub fn qualified_key(module: &[String], name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{}::{}", module.join("::"), name)
    }
}

/// Names of `{placeholder}` segments in a route
pub fn route_placeholders(url: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = url;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = after[..end].split(':').next().unwrap_or_default().trim();
                if !name.is_empty() {
                    names.push(name.to_string());
                }
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

/// Whether a property key must be quoted in TypeScript
pub fn needs_quoting(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => true,
    }
}

/// Escape a string for use inside a double-quoted JavaScript literal
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Quote a property key only when it is not a plain identifier
pub fn quote_if_needed(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

const TS_RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "let", "static", "yield", "await",
];

/// Turn an arbitrary name into a usable binding identifier
pub fn sanitize_identifier(name: &str) -> String {
    let mut result: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if result.is_empty() {
        return "_empty".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if TS_RESERVED_WORDS.contains(&result.as_str()) {
        result.insert(0, '_');
    }
    result
}

/// Module specifier for importing `to` from a file at `from`.
/// Both paths are relative to the same output root.
pub fn relative_import(from: &Path, to: &Path) -> String {
    let from_dir: Vec<Component> = from
        .parent()
        .map(|p| p.components().collect())
        .unwrap_or_default();
    let target = to.with_extension("");
    let to_parts: Vec<Component> = target.components().collect();

    let common = from_dir
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..from_dir.len() {
        segments.push("..".to_string());
    }
    for part in &to_parts[common..] {
        segments.push(part.as_os_str().to_string_lossy().into_owned());
    }

    let joined = segments.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{}", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("get_user"), "getUser");
        assert_eq!(to_camel_case("get_user_by_id"), "getUserById");
        assert_eq!(to_camel_case("hello"), "hello");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("users"), "Users");
        assert_eq!(to_pascal_case("update_name"), "UpdateName");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("UserDetail"), "user_detail");
    }

    #[test]
    fn test_split_module_path() {
        assert_eq!(split_module_path("users::models"), vec!["users", "models"]);
        assert!(split_module_path("").is_empty());
    }

    #[test]
    fn test_qualified_key() {
        let module = vec!["users".to_string(), "models".to_string()];
        assert_eq!(qualified_key(&module, "User"), "users::models::User");
        assert_eq!(qualified_key(&[], "User"), "User");
    }

    #[test]
    fn test_route_placeholders() {
        assert_eq!(
            route_placeholders("/users/{user_id}/posts/{post_id:int}"),
            vec!["user_id", "post_id"]
        );
        assert!(route_placeholders("/").is_empty());
        assert!(route_placeholders("/broken/{oops").is_empty());
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("name"), "name");
        assert_eq!(quote_if_needed("X-Token"), "\"X-Token\"");
        assert_eq!(quote_if_needed("1st"), "\"1st\"");
        assert_eq!(quote_if_needed(""), "\"\"");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("x-token"), "x_token");
        assert_eq!(sanitize_identifier("2fa"), "_2fa");
        assert_eq!(sanitize_identifier("default"), "_default");
        assert_eq!(sanitize_identifier("user_id"), "user_id");
    }

    #[test]
    fn test_relative_import_sibling_dir() {
        let from = PathBuf::from("user_detail/actions.ts");
        let to = PathBuf::from("models.ts");
        assert_eq!(relative_import(&from, &to), "../models");
    }

    #[test]
    fn test_relative_import_same_dir() {
        let from = PathBuf::from("user_detail/actions.ts");
        let to = PathBuf::from("user_detail/models.ts");
        assert_eq!(relative_import(&from, &to), "./models");
    }

    #[test]
    fn test_relative_import_from_root() {
        let from = PathBuf::from("links.ts");
        let to = PathBuf::from("home/links.ts");
        assert_eq!(relative_import(&from, &to), "./home/links");
    }

    #[test]
    fn test_relative_import_nested_target() {
        let from = PathBuf::from("a/b/actions.ts");
        let to = PathBuf::from("shared/models.ts");
        assert_eq!(relative_import(&from, &to), "../../shared/models");
    }
}
