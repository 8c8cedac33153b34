//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep outer layers (CLI, HTTP) decoupled from storage details.

pub mod catalog_service;
pub mod request;
