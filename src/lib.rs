//! Single-slot question store: `ask` a question, `.await` the user's answer.

pub mod ask;

pub use ask::{create_ask, Answer, AskError, AskStore, LocalAsk, OverlapPolicy, Prompt};
