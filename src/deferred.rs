//! Cancellable delayed actions keyed by wall-clock due time

/// Actions waiting for their due time (ms)
#[derive(Debug, Clone)]
pub struct DeferredQueue<A> {
    pending: Vec<(f64, A)>,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<A> DeferredQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, action: A) {
        self.pending.push((due_ms, action));
    }

    pub fn schedule_after(&mut self, now_ms: f64, delay_ms: f64, action: A) {
        self.schedule(now_ms + delay_ms, action);
    }

    /// Remove and return every action due at or before `now_ms`, earliest first
    pub fn take_due(&mut self, now_ms: f64) -> Vec<A> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(at, _)| *at <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, action)| action).collect()
    }

    /// Push every due time back (time spent paused)
    pub fn postpone(&mut self, delta_ms: f64) {
        for (at, _) in &mut self.pending {
            *at += delta_ms;
        }
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
