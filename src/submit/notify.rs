use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message.as_str(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Toast/alert sink. The form only emits messages; rendering and lifetime
/// belong to the sink.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<F> Notifier for F
where
    F: Fn(Notification),
{
    fn notify(&self, notification: Notification) {
        self(notification)
    }
}

/// Writes notifications to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success(message) => info!(%message, "form notification"),
            Notification::Error(message) => error!(%message, "form notification"),
        }
    }
}

/// Keeps notifications in memory; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    log: Rc<RefCell<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.log.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter(|n| n.is_error())
            .map(|n| n.message().to_string())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.log.borrow_mut().push(notification);
    }
}
