//! Session-scoped thought journal for AI agents, served over MCP.
//!
//! Thoughts are verbatim reasoning records grouped into named sessions such as
//! `thesis:NVDA:ai_dominance`. A thought may link to an earlier thought in the same
//! session (`builds_on`, `supports`, `contradicts`, ...), and sessions can be searched
//! by keyword, one at a time or all at once.
//!
//! # Architecture
//!
//! - **Storage**: one JSON file per session, named by an encoded form of the session
//!   name, replaced whole on every write
//! - **Relationships**: edges recorded on both endpoints; `builds_on` edges are walked
//!   to rebuild reasoning chains
//! - **Search**: linear scan with an additive keyword score
//! - **Transport**: MCP over stdio
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`error`]: Failure taxonomy and the structured error payload
//! - [`session`]: Core engine: naming, store, relations, search, maintenance, manager

pub mod config;
pub mod error;
pub mod session;
