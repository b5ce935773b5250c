//! # ts-client-codegen
//!
//! A CLI tool and library for generating a typed TypeScript client from
//! backend controller schemas.
//!
//! Controllers, their actions and the models they exchange are described in
//! TOML schema files. The generator resolves that graph and emits:
//! - **Interfaces** for every reachable model, enum and exception.
//! - **Action functions** that call the runtime's `__request`.
//! - **Link builders** for every controller route.
//! - **Controller interfaces** and a `ServerState` type per controller.
//!
//! ## Pipeline
//!
//! 1. [`scanner`] finds schema files and [`resolver`] indexes their declarations.
//! 2. [`parser`] turns controllers into a [`models::WrapperArena`], parsing
//!    type annotations with `syn`.
//! 3. [`validation`] rejects dictionaries with non-string keys.
//! 4. [`alias_manager`] assigns collision-free global and per-controller names.
//! 5. [`dependency`] orders declarations so dependencies come first.
//! 6. [`generator`] renders the TypeScript files.
//!
//! Nothing is written unless every step succeeds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ts_client_codegen::config::Config;
//! use ts_client_codegen::pipeline::Pipeline;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default_config();
//!     let pipeline = Pipeline::new(false);
//!     pipeline.run(&config)?;
//!     Ok(())
//! }
//! ```

pub mod alias_manager;
pub mod cli;
pub mod config;
pub mod dependency;
pub mod error;
pub mod generator;
pub mod known_types;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod resolver;
pub mod scanner;
pub mod utils;
pub mod validation;
