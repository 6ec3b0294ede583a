//! # Signals
//!
//! A typed in-process bus the dispatch pipeline uses to tell the outside world
//! what happened: one terminal outcome per run on an event channel, and the
//! stage currently executing on a state channel.
//!
//! ## Features
//!
//! * **Type-Safe**: channels are keyed by the Rust type of the signal.
//! * **Two kinds**: events (broadcast fan-out) and state (latest value).
//! * **Lock-light**: `FxHashMap` behind a `parking_lot::RwLock`; sends never hold the write lock.
//!
//! # Example
//!
//! ```rust
//! use sos_signals::{SignalBus, SignalError, SignalReceiverExt};
//!
//! #[derive(Debug, PartialEq)]
//! struct RunFinished { delivered: usize }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), SignalError> {
//!     let bus = SignalBus::new();
//!     let mut rx = bus.subscribe::<RunFinished>()?;
//!     bus.emit(RunFinished { delivered: 2 })?;
//!
//!     let finished = rx.next_signal().await.expect("open channel");
//!     assert_eq!(finished.delivered, 2);
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{Signal, SignalBus};
pub use error::{SignalError, SignalErrorExt};
pub use receiver::SignalReceiverExt;
