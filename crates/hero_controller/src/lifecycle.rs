use crate::host::{EventKind, Host, ListenerId, TickerId};

/// Every registration made on the host, so teardown can undo all of them.
#[derive(Debug, Default)]
pub struct Disposers {
    ticker: Option<TickerId>,
    listeners: Vec<(EventKind, ListenerId)>,
    released: bool,
}

impl Disposers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_ticker(&mut self, host: &mut impl Host) {
        if self.ticker.is_none() {
            self.ticker = Some(host.add_ticker());
        }
    }

    pub fn listen(&mut self, host: &mut impl Host, kind: EventKind) {
        if self.is_listening(kind) {
            return;
        }
        let id = host.subscribe(kind);
        self.listeners.push((kind, id));
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.iter().any(|(k, _)| *k == kind)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    /// Remove the ticker and every listener. Safe to call more than once.
    pub fn dispose(&mut self, host: &mut impl Host) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(id) = self.ticker.take() {
            host.remove_ticker(id);
        }
        for (_, id) in self.listeners.drain(..) {
            host.unsubscribe(id);
        }
    }
}
