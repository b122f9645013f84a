//! Chat-completion client plumbing.
//!
//! Role-tagged message types and the client for the Copilot
//! OpenAI-compatible endpoint.

/// Copilot chat-completions client.
pub mod copilot;
/// Message, role and error types shared by request code.
pub mod provider;
