use crate::error::SignalError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::trace;

/// Outcomes are rare (one per dispatch run); a small buffer is plenty.
const DEFAULT_CAPACITY: usize = 32;

/// Marker for anything that can travel on the [`SignalBus`].
pub trait Signal: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Signal for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChannelKind {
    /// Every subscriber sees every emitted value.
    Event,
    /// Subscribers see the latest value only.
    State,
}

#[derive(Debug)]
struct Channel {
    kind: ChannelKind,
    sender: Box<dyn Any + Send + Sync>,
}

impl Channel {
    fn events<T: Signal>(&self) -> Result<&broadcast::Sender<Arc<T>>, SignalError> {
        self.expect_kind::<T>(ChannelKind::Event)?;
        self.sender.downcast_ref().ok_or_else(mismatch::<T>)
    }

    fn state<T: Signal>(&self) -> Result<&watch::Sender<Arc<T>>, SignalError> {
        self.expect_kind::<T>(ChannelKind::State)?;
        self.sender.downcast_ref().ok_or_else(mismatch::<T>)
    }

    fn expect_kind<T>(&self, kind: ChannelKind) -> Result<(), SignalError> {
        if self.kind == kind {
            return Ok(());
        }
        Err(SignalError::KindMismatch {
            message: type_name::<T>().into(),
            context: Some(format!("registered as {:?}, requested {kind:?}", self.kind).into()),
        })
    }
}

fn mismatch<T>() -> SignalError {
    SignalError::TypeMismatch {
        message: type_name::<T>().into(),
        context: Some("Unexpected signal type".into()),
    }
}

/// Type-indexed hub connecting the dispatch pipeline to whoever presents its results.
///
/// Each Rust type owns one channel, either an event channel (broadcast) or a
/// state channel (watch). Cloning the bus shares the channels.
#[derive(Debug, Clone, Default)]
pub struct SignalBus {
    channels: Arc<RwLock<FxHashMap<TypeId, Channel>>>,
}

impl SignalBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to every future `T` event.
    ///
    /// # Errors
    /// [`SignalError::KindMismatch`] if `T` is already used as state.
    pub fn subscribe<T: Signal>(&self) -> Result<broadcast::Receiver<Arc<T>>, SignalError> {
        self.subscribe_with_capacity(DEFAULT_CAPACITY)
    }

    /// Like [`SignalBus::subscribe`], sizing the buffer if the channel is new.
    ///
    /// # Errors
    /// [`SignalError::InvalidCapacity`] for zero, [`SignalError::KindMismatch`] as above.
    pub fn subscribe_with_capacity<T: Signal>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, SignalError> {
        if capacity == 0 {
            return Err(SignalError::InvalidCapacity {
                message: "capacity must be greater than zero".into(),
                context: Some(type_name::<T>().into()),
            });
        }
        if let Some(channel) = self.channels.read().get(&TypeId::of::<T>()) {
            return Ok(channel.events::<T>()?.subscribe());
        }

        let mut channels = self.channels.write();
        let channel = channels.entry(TypeId::of::<T>()).or_insert_with(|| {
            trace!(signal = type_name::<T>(), capacity, "Registered event channel");
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            Channel { kind: ChannelKind::Event, sender: Box::new(tx) }
        });
        Ok(channel.events::<T>()?.subscribe())
    }

    /// Emits an event; returns how many subscribers received it (zero is not an error).
    ///
    /// # Errors
    /// [`SignalError::KindMismatch`] if `T` is registered as state.
    pub fn emit<T: Signal>(&self, event: T) -> Result<usize, SignalError> {
        let channels = self.channels.read();
        let Some(channel) = channels.get(&TypeId::of::<T>()) else {
            trace!(signal = type_name::<T>(), "No subscribers, event dropped");
            return Ok(0);
        };
        Ok(channel.events::<T>()?.send(Arc::new(event)).unwrap_or(0))
    }

    /// Watches state `T`, registering it with `initial` when absent.
    ///
    /// # Errors
    /// [`SignalError::KindMismatch`] if `T` is already used for events.
    pub fn watch<T: Signal>(&self, initial: T) -> Result<watch::Receiver<Arc<T>>, SignalError> {
        if let Some(channel) = self.channels.read().get(&TypeId::of::<T>()) {
            return Ok(channel.state::<T>()?.subscribe());
        }

        let mut channels = self.channels.write();
        let channel = channels.entry(TypeId::of::<T>()).or_insert_with(|| {
            let (tx, _) = watch::channel(Arc::new(initial));
            Channel { kind: ChannelKind::State, sender: Box::new(tx) }
        });
        Ok(channel.state::<T>()?.subscribe())
    }

    /// Replaces state `T`. The value is retained even with no watchers.
    ///
    /// # Errors
    /// [`SignalError::KindMismatch`] if `T` is registered for events.
    pub fn set_state<T: Signal>(&self, value: T) -> Result<(), SignalError> {
        let value = Arc::new(value);
        if let Some(channel) = self.channels.read().get(&TypeId::of::<T>()) {
            channel.state::<T>()?.send_replace(value);
            return Ok(());
        }

        let mut channels = self.channels.write();
        match channels.get(&TypeId::of::<T>()) {
            Some(channel) => {
                channel.state::<T>()?.send_replace(value);
            },
            None => {
                let (tx, _) = watch::channel(value);
                channels.insert(
                    TypeId::of::<T>(),
                    Channel { kind: ChannelKind::State, sender: Box::new(tx) },
                );
            },
        }
        Ok(())
    }

    /// Drops every channel; subscribers observe closure.
    pub fn shutdown(&self) {
        self.channels.write().clear();
    }
}
