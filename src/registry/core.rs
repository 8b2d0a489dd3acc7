use std::collections::HashMap;

use crate::error::{NavigationError, Result};
use crate::identity::ScreenId;
use crate::template::{TemplateHost, TemplateLibrary};
use crate::view::{Container, View, ViewHandle};

/// Cache of instantiated views, one per screen.
///
/// Views are created from the template host on first request and kept until
/// the registry itself is dropped.
pub struct ViewRegistry {
    container: Container,
    templates: Box<dyn TemplateHost>,
    views: HashMap<ScreenId, ViewHandle>,
    order: Vec<ScreenId>,
}

impl ViewRegistry {
    pub fn new<T>(container: Container, templates: T) -> Self
    where
        T: TemplateHost + 'static,
    {
        Self {
            container,
            templates: Box::new(templates),
            views: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn builder() -> ViewRegistryBuilder {
        ViewRegistryBuilder::default()
    }

    pub fn get_or_create_view(&mut self, id: &ScreenId) -> Result<ViewHandle> {
        if let Some(existing) = self.views.get(id) {
            return Ok(existing.clone());
        }

        let mut view = self.templates.instantiate(id, &self.container)?;
        view.surface_mut().fill(self.container.bounds());
        view.initialize(&self.container);
        view.hide();

        let handle = ViewHandle::new(id.clone(), view);
        self.views.insert(id.clone(), handle.clone());
        self.order.push(id.clone());
        Ok(handle)
    }

    /// Register a view built outside the template host. It takes precedence
    /// over any template for `id` and keeps its own frame; it is initialized
    /// against the container and starts hidden like a created view.
    pub fn adopt(&mut self, id: impl Into<ScreenId>, mut view: Box<dyn View>) -> Result<ViewHandle> {
        let id = id.into();
        if self.views.contains_key(&id) {
            return Err(NavigationError::InvalidArgument(format!(
                "screen `{id}` already has a view"
            )));
        }

        view.initialize(&self.container);
        view.hide();

        let handle = ViewHandle::new(id.clone(), view);
        self.views.insert(id.clone(), handle.clone());
        self.order.push(id);
        Ok(handle)
    }

    pub fn view(&self, id: &ScreenId) -> Option<&ViewHandle> {
        self.views.get(id)
    }

    pub fn contains(&self, id: &ScreenId) -> bool {
        self.views.contains_key(id)
    }

    pub fn has_template(&self, id: &ScreenId) -> bool {
        self.templates.has_template(id)
    }

    pub fn hide_all_views(&self) {
        for handle in self.handles() {
            handle.hide();
        }
    }

    /// Hide every cached view except `keep`, which is left as it is.
    pub fn hide_all_except(&self, keep: &ScreenId) {
        for handle in self.handles().filter(|handle| handle.id() != keep) {
            handle.hide();
        }
    }

    /// Visible views in creation order.
    pub fn visible_ids(&self) -> Vec<ScreenId> {
        self.handles()
            .filter(|handle| handle.is_visible())
            .map(|handle| handle.id().clone())
            .collect()
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn handles(&self) -> impl Iterator<Item = &ViewHandle> {
        self.order.iter().filter_map(|id| self.views.get(id))
    }
}

/// Startup wiring for a [`ViewRegistry`]; a container is mandatory.
#[derive(Default)]
pub struct ViewRegistryBuilder {
    container: Option<Container>,
    templates: Option<Box<dyn TemplateHost>>,
    placed: Vec<(ScreenId, Box<dyn View>)>,
}

impl ViewRegistryBuilder {
    pub fn container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    pub fn templates<T>(mut self, templates: T) -> Self
    where
        T: TemplateHost + 'static,
    {
        self.templates = Some(Box::new(templates));
        self
    }

    /// A view that already exists, adopted on build.
    pub fn view(mut self, id: impl Into<ScreenId>, view: Box<dyn View>) -> Self {
        self.placed.push((id.into(), view));
        self
    }

    pub fn build(self) -> Result<ViewRegistry> {
        let container = self.container.ok_or(NavigationError::MissingContainer)?;
        let templates = self
            .templates
            .unwrap_or_else(|| Box::new(TemplateLibrary::new()));
        let mut registry = ViewRegistry {
            container,
            templates,
            views: HashMap::new(),
            order: Vec::new(),
        };
        for (id, view) in self.placed {
            registry.adopt(id, view)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};
    use crate::view::{BlankView, Surface};

    fn registry() -> ViewRegistry {
        let templates = TemplateLibrary::new()
            .with("menu", |_| Box::new(BlankView::new(Surface::with_fade())))
            .with("profile", |_| Box::new(BlankView::default()));
        ViewRegistry::builder()
            .container(Container::new("root", Size::new(40, 12)))
            .templates(templates)
            .build()
            .expect("registry")
    }

    #[test]
    fn creates_view_once_and_reuses_it() {
        let mut registry = registry();
        let menu = ScreenId::from("menu");
        let first = registry.get_or_create_view(&menu).expect("first");
        let second = registry.get_or_create_view(&menu).expect("second");
        assert!(first.ptr_eq(&second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn created_view_fills_container_and_starts_hidden() {
        let mut registry = registry();
        let view = registry
            .get_or_create_view(&ScreenId::from("profile"))
            .expect("view");
        let surface = view.surface();
        assert!(!surface.is_visible());
        assert!(!surface.is_active());
        assert_eq!(surface.frame(), Some(Rect::new(0, 0, 40, 12)));
    }

    #[test]
    fn missing_template_fails_without_caching() {
        let mut registry = registry();
        let err = registry
            .get_or_create_view(&ScreenId::from("settings"))
            .unwrap_err();
        assert!(matches!(err, NavigationError::TemplateNotFound(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn hide_all_views_hides_everything() {
        let mut registry = registry();
        let menu = registry.get_or_create_view(&"menu".into()).unwrap();
        let profile = registry.get_or_create_view(&"profile".into()).unwrap();
        menu.show();
        profile.show();

        registry.hide_all_views();
        assert!(registry.visible_ids().is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn hide_all_except_keeps_one() {
        let mut registry = registry();
        let menu = registry.get_or_create_view(&"menu".into()).unwrap();
        let profile = registry.get_or_create_view(&"profile".into()).unwrap();
        menu.show();
        profile.show();

        registry.hide_all_except(&"profile".into());
        assert_eq!(registry.visible_ids(), vec![ScreenId::from("profile")]);
    }

    #[test]
    fn adopted_view_wins_over_template() {
        let mut registry = registry();
        let placed = registry
            .adopt("menu", Box::new(BlankView::new(Surface::new())))
            .expect("adopt");
        assert!(!placed.is_visible());
        assert_eq!(placed.surface().frame(), None);

        let resolved = registry.get_or_create_view(&"menu".into()).expect("menu");
        assert!(resolved.ptr_eq(&placed));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn adopting_twice_is_rejected() {
        let mut registry = registry();
        registry.get_or_create_view(&"profile".into()).expect("profile");
        let err = registry
            .adopt("profile", Box::new(BlankView::default()))
            .unwrap_err();
        assert!(matches!(err, NavigationError::InvalidArgument(_)));
    }

    #[test]
    fn builder_adopts_placed_views_without_templates() {
        let mut registry = ViewRegistry::builder()
            .container(Container::new("root", Size::new(10, 10)))
            .view("hud", Box::new(BlankView::default()))
            .build()
            .expect("registry");
        assert!(!registry.has_template(&"hud".into()));
        let hud = registry.get_or_create_view(&"hud".into()).expect("hud");
        assert!(!hud.is_visible());
        assert_eq!(registry.visible_ids(), Vec::<ScreenId>::new());
    }

    #[test]
    fn builder_requires_container() {
        let err = ViewRegistry::builder()
            .templates(TemplateLibrary::new())
            .build()
            .err()
            .expect("missing container");
        assert!(matches!(err, NavigationError::MissingContainer));
    }
}
