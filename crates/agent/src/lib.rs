//! The conversation loop: the heart of Dossier.
//!
//! A turn follows a **Call → Act → Observe** cycle:
//!
//! 1. **Receive** a user message plus the prior visible history
//! 2. **Frame** it behind the persona's system message
//! 3. **Call** the model with the tool definitions
//! 4. **If tool calls**: execute them, append results, loop back to step 3
//! 5. **If text**: return it to the caller
//!
//! The loop continues until the model answers with text only or the
//! round limit is reached.

pub mod loop_runner;

#[cfg(test)]
mod test_helpers;

pub use loop_runner::{ConversationLoop, ROUND_LIMIT_REPLY, TurnOutcome};
