// dwgbatch - Batch view export to DWG
// Copyright (c) 2025 dwgbatch Contributors
// Licensed under the MIT License

//! # dwgbatch - batch export of document views to DWG
//!
//! dwgbatch exports a selection of views from a CAD document, one output file
//! per view, while resolving the validation failures the document raises when
//! it is modified for export.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Selecting** views by explicit ids, a named view set, or every printable view
//! - **Merging** sparse user overrides into named or default export settings
//! - **Resolving** validation failures with a bounded, per-failure retry ceiling
//! - **Rolling back** every document change made for the export, while keeping
//!   the files already written
//!
//! ## Architecture
//!
//! dwgbatch follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (failure resolution, option merging, export)
//! - [`adapters`] - Host document, failure reporting and export codec
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and the job trace
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dwgbatch::adapters::codec::ManifestCodec;
//! use dwgbatch::adapters::snapshot::SnapshotDocument;
//! use dwgbatch::config::{load_config, load_params};
//! use dwgbatch::core::export::{ExportOrchestrator, ExportRequest};
//! use dwgbatch::logging::TracingSink;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("dwgbatch.toml")?;
//!     let params = load_params(&config.export.params_file)?;
//!     let request = ExportRequest::from_params(&params, &config.export)?;
//!
//!     let mut document = SnapshotDocument::from_file("tower.json")?;
//!     let summary = ExportOrchestrator::new(&mut document, &ManifestCodec::new(), &TracingSink)
//!         .run(&request);
//!
//!     println!("Exported {} views", summary.exported.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Failure Resolution
//!
//! Every nested transaction is committed through the
//! [`core::failures::ResolutionEngine`]. Per validation pass it deletes the
//! elements of detachable errors, dismisses warnings, and rolls the pass back
//! once a failure has seen three distinct resolution strategies:
//!
//! ```rust
//! use dwgbatch::core::failures::{ReportedHistory, ResolutionEngine};
//! use dwgbatch::domain::{FailureKindId, FailureRecord, ResolutionVerdict};
//! use dwgbatch::logging::MemorySink;
//!
//! let sink = MemorySink::new();
//! let engine = ResolutionEngine::new(&sink);
//! let warning = FailureRecord::warning(FailureKindId::new("LinesOverlap").unwrap(), "Lines overlap");
//!
//! let decision = engine.decide(&[warning], &ReportedHistory);
//! assert_eq!(decision.verdict, ResolutionVerdict::ProceedWithCommit);
//! ```
//!
//! ## Error Handling
//!
//! dwgbatch uses the [`domain::DwgBatchError`] type for all errors:
//!
//! ```rust,no_run
//! use dwgbatch::domain::DwgBatchError;
//!
//! fn example() -> Result<(), DwgBatchError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = dwgbatch::config::load_config("dwgbatch.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! dwgbatch uses structured logging with the `tracing` crate. Job decisions go
//! to an injected [`logging::TraceSink`] instead.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
