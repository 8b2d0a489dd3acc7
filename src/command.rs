//! Deferred navigation.
//!
//! A [`NavigationCommand`] captures one navigator call as a value. Presenters
//! push commands onto a shared [`NavigationQueue`] from their view-event
//! handlers; the navigator drains the queue in [`Navigator::process_pending`],
//! so a navigation never starts while another is still running.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::identity::ScreenId;
use crate::navigator::Navigator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationCommand {
    NavigateTo {
        target: ScreenId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parameters: Option<Value>,
        #[serde(default = "default_hide_others")]
        hide_others: bool,
    },
    GoBack,
    Close {
        target: ScreenId,
    },
}

fn default_hide_others() -> bool {
    true
}

/// What running a command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Navigated,
    WentBack(bool),
    Closed(bool),
}

impl NavigationCommand {
    pub fn navigate_to(target: impl Into<ScreenId>) -> Self {
        Self::NavigateTo {
            target: target.into(),
            parameters: None,
            hide_others: true,
        }
    }

    pub fn navigate_with(target: impl Into<ScreenId>, parameters: Value) -> Self {
        Self::NavigateTo {
            target: target.into(),
            parameters: Some(parameters),
            hide_others: true,
        }
    }

    pub fn overlay(target: impl Into<ScreenId>, parameters: Option<Value>) -> Self {
        Self::NavigateTo {
            target: target.into(),
            parameters,
            hide_others: false,
        }
    }

    pub fn go_back() -> Self {
        Self::GoBack
    }

    pub fn close(target: impl Into<ScreenId>) -> Self {
        Self::Close {
            target: target.into(),
        }
    }

    pub fn target(&self) -> Option<&ScreenId> {
        match self {
            Self::NavigateTo { target, .. } | Self::Close { target } => Some(target),
            Self::GoBack => None,
        }
    }

    /// Replay the command against `navigator`. Commands are not consumed, so
    /// the same value may be executed again.
    pub fn execute(&self, navigator: &mut Navigator) -> Result<CommandOutcome> {
        match self {
            Self::NavigateTo {
                target,
                parameters,
                hide_others,
            } => {
                navigator.navigate_to(target, parameters.clone(), *hide_others)?;
                Ok(CommandOutcome::Navigated)
            }
            Self::GoBack => Ok(CommandOutcome::WentBack(navigator.go_back())),
            Self::Close { target } => Ok(CommandOutcome::Closed(navigator.close_screen(target))),
        }
    }
}

/// FIFO of pending commands shared between presenters and the navigator.
#[derive(Clone, Default)]
pub struct NavigationQueue {
    pending: Rc<RefCell<VecDeque<NavigationCommand>>>,
}

impl NavigationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: NavigationCommand) {
        self.pending.borrow_mut().push_back(command);
    }

    pub fn pop(&self) -> Option<NavigationCommand> {
        self.pending.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.pending.borrow_mut().clear();
    }

    pub fn snapshot(&self) -> Vec<NavigationCommand> {
        self.pending.borrow().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn queue_is_fifo_and_shared() {
        let queue = NavigationQueue::new();
        let other = queue.clone();
        queue.push(NavigationCommand::navigate_to("menu"));
        other.push(NavigationCommand::go_back());

        assert_eq!(queue.len(), 2);
        assert_eq!(other.pop(), Some(NavigationCommand::navigate_to("menu")));
        assert_eq!(queue.pop(), Some(NavigationCommand::GoBack));
        assert!(queue.is_empty());
    }

    #[test]
    fn commands_decode_with_defaults() {
        let command: NavigationCommand =
            serde_json::from_value(json!({"kind": "navigate_to", "target": "profile"})).unwrap();
        assert_eq!(command, NavigationCommand::navigate_to("profile"));
        assert_eq!(command.target().map(ScreenId::as_str), Some("profile"));
    }

    #[test]
    fn overlay_keeps_other_screens() {
        let command = NavigationCommand::overlay("toast", None);
        assert!(matches!(
            command,
            NavigationCommand::NavigateTo {
                hide_others: false,
                ..
            }
        ));
    }
}
