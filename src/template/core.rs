use std::collections::HashMap;
use std::fmt;

use crate::error::{NavigationError, Result};
use crate::identity::ScreenId;
use crate::view::{Container, View};

/// Blueprint producing a fresh, uninitialized view for one screen.
pub type ViewTemplate = Box<dyn Fn(&Container) -> Box<dyn View>>;

/// Instantiation host consulted by the view registry on first use of a screen.
pub trait TemplateHost {
    fn instantiate(&self, id: &ScreenId, container: &Container) -> Result<Box<dyn View>>;

    fn has_template(&self, id: &ScreenId) -> bool;
}

/// Registration table of view templates keyed by screen.
#[derive(Default)]
pub struct TemplateLibrary {
    templates: HashMap<ScreenId, ViewTemplate>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any earlier one for the same screen.
    pub fn register<F>(&mut self, id: impl Into<ScreenId>, template: F)
    where
        F: Fn(&Container) -> Box<dyn View> + 'static,
    {
        self.templates.insert(id.into(), Box::new(template));
    }

    pub fn with<F>(mut self, id: impl Into<ScreenId>, template: F) -> Self
    where
        F: Fn(&Container) -> Box<dyn View> + 'static,
    {
        self.register(id, template);
        self
    }

    pub fn unregister(&mut self, id: &ScreenId) -> bool {
        self.templates.remove(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ScreenId> {
        self.templates.keys()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateHost for TemplateLibrary {
    fn instantiate(&self, id: &ScreenId, container: &Container) -> Result<Box<dyn View>> {
        let template = self
            .templates
            .get(id)
            .ok_or_else(|| NavigationError::TemplateNotFound(id.clone()))?;
        Ok(template(container))
    }

    fn has_template(&self, id: &ScreenId) -> bool {
        self.templates.contains_key(id)
    }
}

impl fmt::Debug for TemplateLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.templates.keys().collect();
        ids.sort();
        f.debug_struct("TemplateLibrary").field("templates", &ids).finish()
    }
}
