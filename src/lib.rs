//! Filer — an agentic bookmark filing and organizing core.
//!
//! This crate provides the execution core of an AI bookmark assistant for
//! any OpenAI API-compatible endpoint: a streaming tool-calling agent loop
//! for conversational bookmark organizing, and a single-shot classifier
//! that picks (or invents) a folder path for the current page. The
//! surrounding UI — notifications, dialogs, settings storage — is a host
//! concern; the core only consumes a [`tree::BookmarkTreeProvider`] and a
//! [`api::ChatTransport`].
//!
//! # Quick start
//!
//! ```no_run
//! use filer::agent::Agent;
//! use filer::config::load_config;
//! use filer::tools::ToolRegistry;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! // register the bookmark tool set over your tree provider with
//! // ToolRegistry::bookmark_tools(provider, None)
//! let tools = ToolRegistry::new();
//! let mut agent = Agent::new(config, tools);
//! let response = agent.send("find my duplicate bookmarks").await.unwrap();
//! println!("{response}");
//! # }
//! ```

pub mod agent;
pub mod api;
pub mod classify;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod paths;
pub mod prompt;
#[cfg(test)]
pub mod testsupport;
pub mod tools;
pub mod tree;
pub mod types;
