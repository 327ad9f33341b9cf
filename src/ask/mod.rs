//! Await the user's answer to a question.
//!
//! An [`AskStore`] holds at most one outstanding question. Calling code asks
//! and awaits:
//!
//! ```no_run
//! # async fn demo() {
//! use askbox::ask::{Answer, AskStore};
//!
//! let store: AskStore<String, bool> = AskStore::new();
//! let answer = store.safe_ask("Delete repository?".to_string());
//! // ... a prompt renderer reads `store.snapshot()` and calls `store.ok(true)`.
//! match answer.await {
//!     Answer::Ok(confirmed) => println!("confirmed: {confirmed}"),
//!     Answer::Cancelled(_) => println!("kept"),
//! }
//! # }
//! ```
//!
//! Views attach through a [`Binding`], which turns store transitions into
//! redraw requests and gives each render pass one consistent [`Prompt`].
//! Widgets that keep their question to themselves use [`LocalAsk`].

mod answer;
mod binding;
mod local;
mod question;
mod store;
mod subscribers;

pub use answer::{Answer, AskError, AskMode, Asked, SafeAsked};
pub use binding::{create_ask, Binder, Binding, Prompt, RenderPass};
pub use local::LocalAsk;
pub use question::Question;
pub use store::{AskStore, OverlapPolicy};
pub use subscribers::{Subscription, SubscriptionId};
