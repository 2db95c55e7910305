//! Workspace change notifications

use crate::base::Uri;
use crate::semantic::workspace::Workspace;

/// What changed in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    /// A document was added, rebuilt or removed.
    DocumentChanged { uri: Uri },
    /// Workspace-wide analysis settings were replaced.
    ConfigurationChanged,
}

type Handler = Box<dyn Fn(&WorkspaceEvent, &Workspace) + Send + Sync>;

/// Registered event handlers, dispatched in subscription order.
///
/// The workspace releases its own lock before dispatch, so a handler may call
/// back into the workspace freely, including subscribing further handlers.
#[derive(Default)]
pub struct EventEmitter {
    handlers: Vec<Handler>,
}

impl EventEmitter {
    pub fn subscribe(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: &WorkspaceEvent, workspace: &Workspace) {
        for handler in &self.handlers {
            handler(event, workspace);
        }
    }

    /// Append the handlers of `other`, keeping subscription order.
    pub fn absorb(&mut self, other: EventEmitter) {
        self.handlers.extend(other.handlers);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
