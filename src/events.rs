//! Synchronous publish/subscribe channels.
//!
//! State machines own one [`EventChannel`] per event they can raise.  The
//! composition root subscribes observers once at startup; after that every
//! [`fire`](EventChannel::fire) runs the handlers inline, on the caller's
//! stack, in the order they were subscribed.
//!
//! ```text
//! ┌──────────────────┐  fire(sender, &payload)  ┌────────────┐
//! │ PresenceMachine  │─────────────────────────▶│ handler #0 │
//! │ MotionDetector   │                          │ handler #1 │
//! └──────────────────┘                          │    ...     │
//!                                               └────────────┘
//! ```
//!
//! There is no queue and no thread hop: when `fire` returns, every handler
//! has run (or one has failed and the rest were skipped).

use core::fmt;

use crate::error::{Error, ObserverError, Result};

/// Which state machine raised an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Presence,
    Motion,
}

/// Handler signature: the sender and a borrowed payload.
pub type Handler<P> = Box<dyn FnMut(Source, &P) -> core::result::Result<(), ObserverError>>;

/// An ordered list of handlers for one kind of event.
pub struct EventChannel<P> {
    name: &'static str,
    handlers: Vec<Handler<P>>,
}

impl<P> EventChannel<P> {
    /// An empty channel.  `name` shows up in logs and in [`Error::Observer`].
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: Vec::new(),
        }
    }

    /// Append a handler.  Subscribing the same logic twice delivers twice.
    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(Source, &P) -> core::result::Result<(), ObserverError> + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Invoke every handler in subscription order.
    ///
    /// The first handler error stops delivery; later handlers do not run
    /// and the error is returned tagged with this channel's name.
    pub fn fire(&mut self, sender: Source, payload: &P) -> Result<()> {
        let channel = self.name;
        for handler in &mut self.handlers {
            handler(sender, payload).map_err(|error| Error::Observer { channel, error })?;
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<P> fmt::Debug for EventChannel<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("name", &self.name)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
