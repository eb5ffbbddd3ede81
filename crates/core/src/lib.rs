//! # Dossier Core
//!
//! Domain types, traits, and error definitions for the Dossier persona agent.
//! This crate has **no framework dependencies**; it defines the domain model
//! that all other crates implement against.
//!
//! Every boundary of the conversation loop is a trait here:
//! - [`Provider`]: the hosted language model
//! - [`Tool`]: a side-effecting capability the model may invoke
//! - [`Notifier`]: the push-notification endpoint tools report to
//!
//! Implementations live in their respective crates, so the loop can be
//! driven by fakes in tests.

pub mod error;
pub mod event;
pub mod message;
pub mod notifier;
pub mod persona;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use event::{DomainEvent, EventBus};
pub use message::{Message, MessageToolCall, Role, Transcript};
pub use notifier::{Notification, Notifier};
pub use persona::{KnowledgeBase, Persona, framing_instructions};
pub use provider::{FinishReason, Provider, ProviderRequest, ProviderResponse, ToolDefinition};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, UnknownToolPolicy};
