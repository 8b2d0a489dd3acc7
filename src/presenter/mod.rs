//! Presenter contract and the lifecycle guard shared by implementations.
//!
//! A presenter goes through `Constructed → Bound → Initialized → Disposed`.
//! [`PresenterCore`] tracks that progression, owns the bound view handle and
//! the event subscriptions, and turns out-of-order calls into errors.

use std::any::{Any, type_name};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{NavigationError, Result};
use crate::signal::Subscription;
use crate::view::{View, ViewHandle};

mod catalog;

pub use catalog::{PresenterCatalog, PresenterContext, PresenterFactory};

/// Optional navigation payload. `None` and JSON `null` are both "absent".
pub type Parameters = Option<Value>;

/// Lifecycle notifications delivered around show/hide transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenLifecycleEvent {
    WillAppear,
    DidAppear,
    WillDisappear,
    DidDisappear,
}

pub trait Presenter: Any {
    /// Bind the view. Called exactly once, before `initialize`.
    fn set_view(&mut self, view: ViewHandle) -> Result<()>;

    /// First render and event subscription. Presenters without a model must
    /// reject present parameters with [`NavigationError::InvalidArgument`].
    fn initialize(&mut self, parameters: Parameters) -> Result<()>;

    /// Deliver parameters to a presenter that is already live.
    fn refresh(&mut self, parameters: Parameters) -> Result<()> {
        reject_parameters(self.name(), parameters)
    }

    /// Release subscriptions, the view and the model. Repeated calls are
    /// no-ops.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;

    /// Errors are reported by the navigator but never undo the transition.
    fn on_lifecycle(&mut self, _event: ScreenLifecycleEvent) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Presenter {
    pub fn downcast_ref<T: Presenter>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Presenter>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

pub fn is_absent(parameters: &Parameters) -> bool {
    matches!(parameters, None | Some(Value::Null))
}

pub fn reject_parameters(presenter: &str, parameters: Parameters) -> Result<()> {
    if is_absent(&parameters) {
        Ok(())
    } else {
        Err(NavigationError::InvalidArgument(format!(
            "presenter `{presenter}` does not accept parameters"
        )))
    }
}

/// Decode a model from parameters; absent parameters yield `None`.
pub fn decode_model<M>(parameters: Parameters) -> Result<Option<M>>
where
    M: DeserializeOwned,
{
    match parameters {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterState {
    Constructed,
    Bound,
    Initialized,
    Disposed,
}

#[derive(Debug)]
pub struct PresenterCore {
    name: String,
    view: Option<ViewHandle>,
    state: PresenterState,
    subscriptions: Vec<Subscription>,
}

impl PresenterCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view: None,
            state: PresenterState::Constructed,
            subscriptions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> PresenterState {
        self.state
    }

    pub fn bind(&mut self, view: ViewHandle) -> Result<()> {
        match self.state {
            PresenterState::Disposed => Err(NavigationError::DisposedAccess(self.name.clone())),
            PresenterState::Constructed => {
                self.view = Some(view);
                self.state = PresenterState::Bound;
                Ok(())
            }
            PresenterState::Bound | PresenterState::Initialized => {
                Err(NavigationError::AlreadyBound(self.name.clone()))
            }
        }
    }

    /// Check that initialization may start: bound, not yet initialized.
    pub fn begin_initialize(&self) -> Result<()> {
        match self.state {
            PresenterState::Bound => Ok(()),
            PresenterState::Constructed => Err(NavigationError::InvalidArgument(format!(
                "presenter `{}` has no bound view",
                self.name
            ))),
            PresenterState::Initialized => {
                Err(NavigationError::AlreadyInitialized(self.name.clone()))
            }
            PresenterState::Disposed => Err(NavigationError::DisposedAccess(self.name.clone())),
        }
    }

    pub fn finish_initialize(&mut self) {
        if self.state == PresenterState::Bound {
            self.state = PresenterState::Initialized;
        }
    }

    /// Guard for screen-specific operations.
    pub fn ensure_live(&self) -> Result<()> {
        match self.state {
            PresenterState::Initialized => Ok(()),
            PresenterState::Disposed => Err(NavigationError::DisposedAccess(self.name.clone())),
            PresenterState::Constructed | PresenterState::Bound => {
                Err(NavigationError::NotInitialized(self.name.clone()))
            }
        }
    }

    pub fn view(&self) -> Result<&ViewHandle> {
        if self.state == PresenterState::Disposed {
            return Err(NavigationError::DisposedAccess(self.name.clone()));
        }
        self.view
            .as_ref()
            .ok_or_else(|| NavigationError::NotInitialized(self.name.clone()))
    }

    /// Run `f` against the bound view's concrete type. Usable from
    /// `initialize` onwards.
    pub fn with_view<V, R>(&self, f: impl FnOnce(&mut V) -> R) -> Result<R>
    where
        V: View,
    {
        self.view()?.with(f)
    }

    pub fn track(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns false when already disposed.
    pub fn dispose(&mut self) -> bool {
        if self.state == PresenterState::Disposed {
            return false;
        }
        for subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
        self.view = None;
        self.state = PresenterState::Disposed;
        true
    }

    pub fn is_disposed(&self) -> bool {
        self.state == PresenterState::Disposed
    }

    pub fn is_initialized(&self) -> bool {
        self.state == PresenterState::Initialized
    }
}
