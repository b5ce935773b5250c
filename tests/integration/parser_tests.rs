//! Integration tests for loading and parsing schema fixtures

use std::fs;
use std::path::{Path, PathBuf};
use ts_client_codegen::alias_manager::AliasManager;
use ts_client_codegen::config::NamingConfig;
use ts_client_codegen::error::CodegenError;
use ts_client_codegen::models::{ActionType, FieldValue, WrapperArena, WrapperRef};
use ts_client_codegen::parser::parse_all;
use ts_client_codegen::resolver::ModuleResolver;
use ts_client_codegen::scanner::Scanner;
use ts_client_codegen::validation::validate_dict_keys;

/// Get path to a fixture schema directory
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load every schema file of a fixture directory
fn load_fixture(name: &str) -> ModuleResolver {
    let base = fixture_path(name);
    let mut resolver = ModuleResolver::new();
    for path in Scanner::new(base.clone(), vec![]).scan().unwrap() {
        let content = fs::read_to_string(&path).expect("Failed to read fixture");
        resolver
            .parse_file(&path, &content, &base)
            .expect("Failed to load fixture");
    }
    resolver
}

fn parse_fixture(name: &str) -> WrapperArena {
    parse_all(&load_fixture(name)).expect("Failed to parse fixture")
}

fn model_key_exists(arena: &WrapperArena, key: &str) -> bool {
    arena.models().iter().any(|m| m.key == key)
}

#[test]
fn test_fixture_modules_follow_file_paths() {
    let resolver = load_fixture("app");

    assert!(resolver.get("users::models::User").is_some());
    assert!(resolver.get("auth::models::Status").is_some());
    assert!(resolver.get("shared::Node").is_some());
    assert_eq!(resolver.controller_keys(), vec!["home::HomeController"]);
}

#[test]
fn test_only_reachable_declarations_are_parsed() {
    let arena = parse_fixture("app");

    assert!(model_key_exists(&arena, "home::HomePage"));
    assert!(model_key_exists(&arena, "auth::models::Session"));
    assert!(!model_key_exists(&arena, "shared::Orphan"));
    assert_eq!(arena.enums().len(), 3);
    assert_eq!(arena.exceptions().len(), 1);
}

#[test]
fn test_controller_structure() {
    let arena = parse_fixture("app");
    assert_eq!(arena.controllers().len(), 1);

    let home = &arena.controllers()[0];
    assert_eq!(home.url, "/home/{section}");
    assert!(home.superclasses.is_empty(), "framework bases are skipped");
    assert_eq!(home.render_params.len(), 2);

    let names: Vec<&str> = home.actions.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["save_form", "get_tree", "rename"]);

    let save_form = arena.action(home.actions["save_form"]);
    assert_eq!(save_form.url, "/internal/api/home/save_form");
    assert_eq!(save_form.method, "POST");
    assert!(save_form.request_body.is_some());
    assert_eq!(save_form.response_bodies.get(&home.id), Some(&None));

    let get_tree = arena.action(home.actions["get_tree"]);
    assert_eq!(get_tree.method, "GET");
    let envelope = get_tree.response_bodies[&home.id].expect("passthrough envelope");
    assert_eq!(arena.model(envelope).raw_name, "HomeGetTreeResponse");

    let rename = arena.action(home.actions["rename"]);
    assert_eq!(rename.action_type, ActionType::Sideeffect);
    let envelope = arena.model(rename.response_bodies[&home.id].expect("sideeffect envelope"));
    assert_eq!(envelope.raw_name, "HomeRenameResponse");
    assert_eq!(envelope.value_models[0].name, "sideeffect");
    assert_eq!(envelope.value_models[0].value, FieldValue::Model(home.render.unwrap()));
}

#[test]
fn test_generic_specialization_is_named_after_argument() {
    let arena = parse_fixture("app");
    let naming = NamingConfig::default();
    let names = AliasManager::new(&arena, &naming).assign().unwrap();

    let page = arena
        .models()
        .iter()
        .find(|m| m.is_specialization())
        .expect("Page<User> specialization");
    assert_eq!(names.model(page.id), "PageUser");
}

#[test]
fn test_same_named_enums_are_module_prefixed() {
    let arena = parse_fixture("app");
    let naming = NamingConfig::default();
    let names = AliasManager::new(&arena, &naming).assign().unwrap();

    let mut status_names: Vec<&str> = arena
        .enums()
        .iter()
        .filter(|e| e.raw_name == "Status")
        .map(|e| names.global(WrapperRef::Enum(e.id)))
        .collect();
    status_names.sort();
    assert_eq!(status_names, vec!["AuthModels_Status", "UsersModels_Status"]);
}

#[test]
fn test_integer_dict_key_is_rejected() {
    let arena = parse_fixture("invalid_dict_key");
    let err = validate_dict_keys(&arena).unwrap_err();

    assert!(matches!(err, CodegenError::NonStringDictKey { .. }));
    let message = err.to_string();
    assert!(message.contains("Report"), "message names the model: {message}");
    assert!(message.contains("not string-compatible"));
}

#[test]
fn test_malformed_schema_file_is_reported_with_path() {
    let mut resolver = ModuleResolver::new();
    let err = resolver
        .parse_file(
            Path::new("schemas/broken.toml"),
            "[[models]]\nname = 3\n",
            Path::new("schemas"),
        )
        .unwrap_err();
    assert!(format!("{err:#}").contains("schemas/broken.toml"));
}
