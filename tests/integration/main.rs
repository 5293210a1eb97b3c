//! Integration tests for the node processing pipeline

mod cli_context;
mod scenarios;
mod support;
