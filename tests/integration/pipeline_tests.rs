//! Integration tests for the full pipeline

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use ts_client_codegen::config::{Config, InputConfig, NamingConfig, OutputConfig};
use ts_client_codegen::pipeline::Pipeline;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Create a test config reading a fixture and writing to `output_dir`
fn create_test_config(fixture: &str, output_dir: PathBuf) -> Config {
    Config {
        input: InputConfig {
            schema_dir: fixture_path(fixture),
            exclude: vec!["drafts".to_string()],
        },
        output: OutputConfig::new(output_dir),
        naming: NamingConfig::default(),
    }
}

fn read(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).unwrap_or_else(|e| panic!("{file}: {e}"))
}

fn run_app_fixture() -> (tempfile::TempDir, PathBuf) {
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("generated");
    let config = create_test_config("app", output_dir.clone());

    let result = Pipeline::new(false).run(&config);
    assert!(result.is_ok(), "Pipeline should succeed: {:?}", result.err());
    (temp, output_dir)
}

#[test]
fn test_full_pipeline_writes_layout() {
    let (_temp, output_dir) = run_app_fixture();

    for file in [
        "models.ts",
        "links.ts",
        "home_controller/models.ts",
        "home_controller/actions.ts",
        "home_controller/links.ts",
        "home_controller/controller.ts",
    ] {
        assert!(output_dir.join(file).is_file(), "{file} should exist");
    }
}

#[test]
fn test_global_models_content() {
    let (_temp, output_dir) = run_app_fixture();
    let models = read(&output_dir, "models.ts");

    assert!(models.starts_with("// This file is auto-generated by ts-client-codegen."));

    // Same-named enums from different modules
    assert!(models.contains("export enum UsersModels_Status {"));
    assert!(models.contains("export enum AuthModels_Status {"));
    assert!(models.contains("  status: UsersModels_Status;\n"));
    assert!(models.contains("  status: AuthModels_Status;\n"));

    // Self reference
    assert!(models.contains("  parent?: Node;\n"));
    assert!(models.contains("  children: Node[];\n"));

    // Multiple inheritance keeps only own fields
    assert!(models.contains("export interface Child extends ParentA, ParentB {\n  c: boolean;\n}\n"));

    // Dictionary of lists
    assert!(models.contains("  scores: Record<string, number[]>;\n"));

    // Duplicate enum values are kept
    assert!(models.contains(
        "export enum Mode {\n  A = \"value\",\n  B = \"value\",\n  C = \"value\",\n}\n"
    ));

    // Specialization
    assert!(models.contains("export interface PageUser {\n  items: User[];\n  cursor?: string;\n}\n"));

    // Response envelopes
    assert!(models.contains("export interface HomeGetTreeResponse {\n  passthrough: Node;\n}\n"));
    assert!(models.contains("export interface HomeRenameResponse {\n  sideeffect: HomePage;\n}\n"));

    // Unreachable declarations are not emitted
    assert!(!models.contains("Orphan"));
}

#[test]
fn test_global_models_are_dependency_ordered() {
    let (_temp, output_dir) = run_app_fixture();
    let models = read(&output_dir, "models.ts");
    let position = |needle: &str| {
        models
            .find(needle)
            .unwrap_or_else(|| panic!("missing {needle}"))
    };

    assert!(position("export enum UsersModels_Status") < position("export interface User "));
    assert!(position("export interface User ") < position("export interface PageUser"));
    assert!(position("export interface ParentA") < position("export interface Child"));
    assert!(position("export interface ParentB") < position("export interface Child"));
    assert!(position("export interface HomePage") < position("export interface HomeRenameResponse"));
    assert!(position("export interface HomeRenameResponse") < position("export interface HomeController"));
}

#[test]
fn test_controller_interface_signature() {
    let (_temp, output_dir) = run_app_fixture();
    let models = read(&output_dir, "models.ts");

    assert!(models.contains(
        "  saveForm(args: { required_param: string; optional_param?: number; \
         requestBody: FormData; signal?: AbortSignal }): Promise<void>;\n"
    ));
    assert!(models.contains(
        "  getTree(args?: { signal?: AbortSignal }): Promise<HomeGetTreeResponse>;\n"
    ));
    assert!(models.contains(
        "  rename(args: { name: string; signal?: AbortSignal }): Promise<HomeRenameResponse>;\n"
    ));
}

#[test]
fn test_controller_files_content() {
    let (_temp, output_dir) = run_app_fixture();

    let local_models = read(&output_dir, "home_controller/models.ts");
    assert!(local_models.contains("from \"../models\";"));
    assert!(local_models.contains("export type { "));
    assert!(local_models.contains("AuthModels_Status"));
    assert!(local_models.contains("UsersModels_Status"));

    let actions = read(&output_dir, "home_controller/actions.ts");
    assert!(actions.contains("import { __request } from \"@/lib/runtime\";\n"));
    assert!(actions.contains("from \"./models\";\n"));
    assert!(actions.contains(
        "export async function saveForm(args: { required_param: string; optional_param?: number; \
         requestBody: FormData; signal?: AbortSignal }): Promise<void> {\n"
    ));
    assert!(actions.contains("    url: \"/internal/api/home/save_form\",\n"));
    assert!(actions.contains(
        "    query: { required_param: args.required_param, optional_param: args.optional_param },\n"
    ));
    assert!(actions.contains("    body: args.requestBody,\n"));
    assert!(actions.contains("    errors: { \"404\": [\"NotFound\"] },\n"));
    assert!(actions.contains("export async function getTree(args: { signal?: AbortSignal } = {})"));

    let links = read(&output_dir, "home_controller/links.ts");
    assert!(links.contains(
        "export function getLink(args: { section: string; tab?: number }): string {\n"
    ));
    assert!(links.contains("`/home/${encodeURIComponent(String(args.section))}`"));
    assert!(links.contains("appendQuery(query, \"tab\", args.tab);"));

    let controller = read(&output_dir, "home_controller/controller.ts");
    assert!(controller.contains("import type { HomeController, HomePage } from \"../models\";\n"));
    assert!(controller.contains("export type ServerState = HomePage & HomeController;\n"));

    assert!(read(&output_dir, "links.ts").contains(
        "export { getLink as homeControllerGetLink } from \"./home_controller/links\";\n"
    ));
}

#[test]
fn test_type_prefix_applies_to_names() {
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("generated");
    let mut config = create_test_config("app", output_dir.clone());
    config.naming.type_prefix = "I".to_string();
    config.naming.function_suffix = "Action".to_string();

    Pipeline::new(false).run(&config).unwrap();

    let models = read(&output_dir, "models.ts");
    assert!(models.contains("export interface INode {"));
    assert!(models.contains("export enum IUsersModels_Status {"));
    assert!(models.contains("  saveFormAction(args: {"));
}

#[test]
fn test_failed_run_writes_nothing() {
    let temp = tempdir().unwrap();
    let output_dir = temp.path().join("generated");
    fs::create_dir_all(&output_dir).unwrap();
    let config = create_test_config("invalid_dict_key", output_dir.clone());

    let err = Pipeline::new(false).run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("not string-compatible"));
    assert_eq!(fs::read_dir(&output_dir).unwrap().count(), 0);
}

#[test]
fn test_config_round_trip() {
    let temp = tempdir().unwrap();
    let schema_dir = temp.path().join("schemas");
    fs::create_dir_all(&schema_dir).unwrap();

    let mut config = Config::default_config();
    config.input.schema_dir = schema_dir;
    config.output.output_dir = temp.path().join("out");
    let path = temp.path().join("ts-codegen.toml");
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.output.runtime_module, "@/lib/runtime");
    assert!(loaded.output.output_dir.is_dir());

    // An empty schema directory still produces the index files
    Pipeline::new(false).run(&loaded).unwrap();
    assert!(loaded.output.output_dir.join("models.ts").is_file());
    assert!(loaded.output.output_dir.join("links.ts").is_file());
}
