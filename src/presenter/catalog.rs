use std::collections::HashMap;
use std::fmt;

use crate::command::{NavigationCommand, NavigationQueue};
use crate::error::{NavigationError, Result};
use crate::identity::ScreenId;
use crate::logging::{LogLevel, Logger, event_with_fields, json_str};

use super::Presenter;

/// Builds a fresh presenter for one screen.
pub type PresenterFactory = Box<dyn Fn(&PresenterContext) -> Box<dyn Presenter>>;

/// Services handed to presenter factories at construction time.
///
/// This is the only way a presenter reaches the rest of the application; it
/// issues navigation by queueing commands instead of holding the navigator.
#[derive(Clone, Default)]
pub struct PresenterContext {
    navigation: NavigationQueue,
    logger: Option<Logger>,
}

impl PresenterContext {
    pub fn new(navigation: NavigationQueue, logger: Option<Logger>) -> Self {
        Self { navigation, logger }
    }

    pub fn navigation(&self) -> &NavigationQueue {
        &self.navigation
    }

    pub fn navigate(&self, command: NavigationCommand) {
        self.navigation.push(command);
    }

    pub fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }

    /// Log on behalf of a presenter under the `screenflow::presenter` target.
    pub fn log(&self, level: LogLevel, presenter: &str, message: &str) {
        if let Some(logger) = self.logger.as_ref() {
            let event = event_with_fields(
                level,
                "screenflow::presenter",
                message,
                [json_str("presenter", presenter)],
            );
            let _ = logger.log_event(event);
        }
    }
}

impl fmt::Debug for PresenterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenterContext")
            .field("pending", &self.navigation.len())
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

/// Registration table of presenter factories keyed by screen.
#[derive(Default)]
pub struct PresenterCatalog {
    factories: HashMap<ScreenId, PresenterFactory>,
}

impl PresenterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, id: impl Into<ScreenId>, factory: F)
    where
        F: Fn(&PresenterContext) -> Box<dyn Presenter> + 'static,
    {
        self.factories.insert(id.into(), Box::new(factory));
    }

    pub fn with<F>(mut self, id: impl Into<ScreenId>, factory: F) -> Self
    where
        F: Fn(&PresenterContext) -> Box<dyn Presenter> + 'static,
    {
        self.register(id, factory);
        self
    }

    pub fn contains(&self, id: &ScreenId) -> bool {
        self.factories.contains_key(id)
    }

    pub fn create(&self, id: &ScreenId, ctx: &PresenterContext) -> Result<Box<dyn Presenter>> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| NavigationError::PresenterNotRegistered(id.clone()))?;
        Ok(factory(ctx))
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for PresenterCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.factories.keys().collect();
        ids.sort();
        f.debug_struct("PresenterCatalog")
            .field("factories", &ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::MenuPresenter;

    #[test]
    fn create_builds_fresh_presenters() {
        let catalog = PresenterCatalog::new()
            .with("menu", |ctx| Box::new(MenuPresenter::new(ctx.clone())));
        let ctx = PresenterContext::default();
        let first = catalog.create(&"menu".into(), &ctx).expect("first");
        let second = catalog.create(&"menu".into(), &ctx).expect("second");
        assert!(first.as_any().is::<MenuPresenter>());
        assert!(second.as_any().is::<MenuPresenter>());
        assert!(!first.is_disposed());
    }

    #[test]
    fn unknown_screen_is_reported() {
        let catalog = PresenterCatalog::new();
        let err = catalog
            .create(&"ghost".into(), &PresenterContext::default())
            .err()
            .expect("not registered");
        assert!(matches!(err, NavigationError::PresenterNotRegistered(_)));
    }

    #[test]
    fn context_queues_navigation() {
        let ctx = PresenterContext::default();
        ctx.navigate(NavigationCommand::go_back());
        assert_eq!(ctx.navigation().len(), 1);
    }
}
