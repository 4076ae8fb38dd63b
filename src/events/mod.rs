//! # Events Module
//!
//! Progress reporting for organizing runs.
//!
//! The pipeline never prints. It sends [`Event`]s over a crossbeam channel
//! and a front end decides what to show; the CLI drives its progress bar
//! from `PhotoRouted`. Sending never blocks and never fails, so a run
//! behaves the same with or without a listener.
//!
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//! let listener = std::thread::spawn(move || {
//!     receiver
//!         .iter()
//!         .filter(|e| matches!(e, Event::Route(RouteEvent::CopyFailed { .. })))
//!         .count()
//! });
//! let result = pipeline.run_with_events(&sender)?;
//! drop(sender);
//! let copy_failures = listener.join().unwrap();
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
