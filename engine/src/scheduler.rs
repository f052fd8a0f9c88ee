use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskTicket(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    ticket: TaskTicket,
    deadline: Duration,
}

/// A single deferred job that runs at the next idle moment, or once its
/// deadline passes if the host never goes idle.
///
/// At most one run is outstanding: scheduling again replaces the pending
/// ticket. Times are host-supplied monotonic offsets.
#[derive(Debug, Default)]
pub struct DeferredTask {
    pending: Option<Pending>,
    issued: u64,
}

impl DeferredTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Duration, timeout: Duration) -> TaskTicket {
        self.issued += 1;
        let ticket = TaskTicket(self.issued);
        if let Some(old) = self.pending.replace(Pending {
            ticket,
            deadline: now + timeout,
        }) {
            tracing::debug!(superseded = old.ticket.0, ticket = ticket.0, "deferred task rescheduled");
        }
        ticket
    }

    pub fn cancel(&mut self) -> Option<TaskTicket> {
        self.pending.take().map(|p| p.ticket)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.map(|p| p.deadline)
    }

    pub fn poll_idle(&mut self) -> Option<TaskTicket> {
        self.cancel()
    }

    pub fn poll_deadline(&mut self, now: Duration) -> Option<TaskTicket> {
        match self.pending {
            Some(p) if now >= p.deadline => self.cancel(),
            _ => None,
        }
    }
}
