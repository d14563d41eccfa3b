//! bizgen - Resilient Structured Generation for Idea Validation
//!
//! Turns a founder's free-text answers into structured artifacts (Leap of
//! Faith assumptions, testable hypotheses, Mom-Test interview sheets and
//! concept images) by asking a prioritized list of LLM providers in turn.
//! When every provider fails, a deterministic offline backup answers instead,
//! so callers always receive a well-formed result.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bizgen::{ConfigLoader, Generator};
//! use bizgen::types::LeapOfFaithInputs;
//!
//! let config = ConfigLoader::load()?;
//! let generator = Generator::from_config(&config)?;
//! let result = generator
//!     .leap_of_faith(&LeapOfFaithInputs {
//!         customer: "freelance designers".into(),
//!         problem: "late invoices".into(),
//!         solution: "auto-reminder tool".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: prompt building, providers, fallback chain, parsing, offline backup
//! - [`server`]: axum HTTP endpoints
//! - [`config`]: layered configuration
//! - [`types`]: request/response shapes and errors

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod server;
pub mod types;

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{BizError, ErrorCategory, LlmError, Result};

// Generation
pub use ai::{Generator, ProviderChain, ProviderChainBuilder, TimeoutConfig, with_timeout};
pub use types::{Generated, ImageInputs, LeapOfFaithInputs, MomTestInputs};
