// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Synchronous publish/subscribe dispatch.
//!
//! Handlers are registered per [`Topic`] and invoked in subscription order on
//! the publishing thread. A handler that fails, by returning an error or by
//! panicking, is logged and skipped; the remaining handlers still run and the
//! publisher never sees the failure.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use anyhow::Result;
use tracing::error;

use crate::events::{AppEvent, Topic};

type Handler = Rc<dyn Fn(&AppEvent) -> Result<()>>;

/// Token returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Subscription {
    topic: Topic,
    id: u64,
}

#[derive(Default)]
pub(crate) struct EventBus {
    handlers: RefCell<HashMap<Topic, Vec<(u64, Handler)>>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(
        &self,
        topic: Topic,
        handler: impl Fn(&AppEvent) -> Result<()> + 'static,
    ) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        self.handlers
            .borrow_mut()
            .entry(topic)
            .or_default()
            .push((id, Rc::new(handler)));

        Subscription { topic, id }
    }

    /// Removes one handler, returning false if it was already gone.
    pub(crate) fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let Some(list) = handlers.get_mut(&subscription.topic) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != subscription.id);
        list.len() != before
    }

    pub(crate) fn unsubscribe_all(&self, topic: Topic) {
        self.handlers.borrow_mut().remove(&topic);
    }

    pub(crate) fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }

    #[cfg(test)]
    pub(crate) fn handler_count(&self, topic: Topic) -> usize {
        self.handlers.borrow().get(&topic).map_or(0, Vec::len)
    }

    /// Delivers `event` to every handler of its topic, returning how many
    /// completed successfully.
    pub(crate) fn publish(&self, event: &AppEvent) -> usize {
        let topic = event.topic();

        // Snapshot, so handlers may (un)subscribe while being called.
        let handlers: Vec<Handler> = self
            .handlers
            .borrow()
            .get(&topic)
            .map(|list| list.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();

        let mut delivered = 0;
        for handler in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => error!(?topic, error = %e, "event handler failed"),
                Err(_) => error!(?topic, "event handler panicked"),
            }
        }
        delivered
    }
}
