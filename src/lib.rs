//! # trek-core
//!
//! Skill registry and invocation engine for a travel-planning assistant: named,
//! schema-described skills that can be discovered, validated, invoked one at a
//! time, invoked concurrently, or chained in a pipeline where each step's output
//! feeds the next step's input.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trek_core::dispatch::Dispatcher;
//! use trek_core::template::TemplatePlanner;
//! use trek_core::request::RequestParser;
//! use trek_core::Params;
//!
//! # async fn demo() -> trek_core::error::TrekResult<()> {
//! let dispatcher = Dispatcher::with_builtin_skills();
//!
//! // Parse a free-text request
//! let request = RequestParser::default()
//!     .parse("I want to go to Paris for 7 days with $3,000", &Params::new());
//!
//! // Fill a template and run it as a pipeline
//! let calls = TemplatePlanner::default().fill_named("comprehensive", &request.to_parameters())?;
//! let batch = dispatcher.invoke_pipeline(calls).await;
//! assert_eq!(batch.total, 5);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Core types: `SkillDefinition`, `SkillCategory`, `SkillCall`, `Params` |
//! | [`skill`] | Async skill trait, the five built-in travel skills, and the registry |
//! | [`dispatch`] | Validated invocation with call history; parallel, sequential and pipeline batches |
//! | [`request`] | Lexical request parser producing a `TripRequest` |
//! | [`template`] | Named skill sequences with `$placeholder` substitution |
//! | [`agent`] | Parse, gather in parallel, create a plan, fall back on failure |
//! | [`workflow`] | collect → search → recommend → book stages over a shared state |
//! | [`collab`] | Completion service, travel backend REST client, store health probe |
//! | [`service`] | `TravelAssistant`: health report and planning entry point |
//! | [`config`] | Typed settings with JSON files and environment overrides |
//! | [`telemetry`] | `tracing` subscriber setup |
//! | [`error`] | Error types with thiserror |

pub mod agent;
pub mod collab;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod service;
pub mod skill;
pub mod telemetry;
pub mod template;
pub mod types;
pub mod workflow;

pub use error::{TrekError, TrekResult};
pub use types::*;
