//! View contract consumed by the registry and presenters.
//!
//! A view owns display state only: its [`Surface`] and whatever widgets the
//! concrete screen carries. The registry creates it once, then presenters and
//! the navigator show and hide it through a shared [`ViewHandle`].

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{NavigationError, Result};
use crate::identity::ScreenId;
use crate::signal::Signal;

mod label;
mod surface;

pub use label::Label;
pub use surface::{Container, FadeGroup, Surface};

pub trait View: Any {
    fn surface(&self) -> &Surface;
    fn surface_mut(&mut self) -> &mut Surface;

    fn initialize(&mut self, container: &Container) {
        self.on_initialize(container);
    }

    fn show(&mut self) {
        if self.surface_mut().show() {
            self.on_show();
        }
    }

    fn hide(&mut self) {
        if self.surface_mut().hide() {
            self.on_hide();
        }
    }

    /// Hide and deactivate. `show` brings the view back.
    fn close(&mut self) {
        if self.surface_mut().close() {
            self.on_hide();
        }
    }

    fn is_visible(&self) -> bool {
        self.surface().is_visible()
    }

    fn on_initialize(&mut self, _container: &Container) {}
    fn on_show(&mut self) {}
    fn on_hide(&mut self) {}

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Shared reference to a view cached by the registry.
#[derive(Clone)]
pub struct ViewHandle {
    id: ScreenId,
    inner: Rc<RefCell<Box<dyn View>>>,
}

impl ViewHandle {
    pub fn new(id: ScreenId, view: Box<dyn View>) -> Self {
        Self {
            id,
            inner: Rc::new(RefCell::new(view)),
        }
    }

    pub fn id(&self) -> &ScreenId {
        &self.id
    }

    pub fn show(&self) {
        self.inner.borrow_mut().show();
    }

    pub fn hide(&self) {
        self.inner.borrow_mut().hide();
    }

    pub fn close(&self) {
        self.inner.borrow_mut().close();
    }

    pub fn is_visible(&self) -> bool {
        self.inner.borrow().is_visible()
    }

    pub fn surface(&self) -> Surface {
        self.inner.borrow().surface().clone()
    }

    /// Run `f` against the concrete view type. Fails with
    /// [`NavigationError::ViewBusy`] when called from inside another `with`
    /// on the same view.
    pub fn with<V, R>(&self, f: impl FnOnce(&mut V) -> R) -> Result<R>
    where
        V: View,
    {
        let mut guard = self
            .inner
            .try_borrow_mut()
            .map_err(|_| NavigationError::ViewBusy(self.id.clone()))?;
        let view = guard
            .as_any_mut()
            .downcast_mut::<V>()
            .ok_or_else(|| NavigationError::ViewTypeMismatch {
                screen: self.id.clone(),
                expected: type_name::<V>(),
            })?;
        Ok(f(view))
    }

    /// Fire one of the view's signals. The signal is cloned out first, so
    /// handlers run with the view released and may call back into it.
    pub fn emit<V, T>(&self, select: impl FnOnce(&V) -> &Signal<T>, value: &T) -> Result<()>
    where
        V: View,
        T: 'static,
    {
        let signal = self.with(|view: &mut V| select(view).clone())?;
        signal.emit(value);
        Ok(())
    }

    pub fn is<V: View>(&self) -> bool {
        self.inner.borrow().as_any().is::<V>()
    }

    pub fn ptr_eq(&self, other: &ViewHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHandle")
            .field("id", &self.id)
            .field("visible", &self.is_visible())
            .finish()
    }
}

/// View with no content beyond its surface.
#[derive(Debug, Default)]
pub struct BlankView {
    surface: Surface,
}

impl BlankView {
    pub fn new(surface: Surface) -> Self {
        Self { surface }
    }
}

impl View for BlankView {
    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingView {
        surface: Surface,
        shows: usize,
        hides: usize,
    }

    impl View for CountingView {
        fn surface(&self) -> &Surface {
            &self.surface
        }

        fn surface_mut(&mut self) -> &mut Surface {
            &mut self.surface
        }

        fn on_show(&mut self) {
            self.shows += 1;
        }

        fn on_hide(&mut self) {
            self.hides += 1;
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn hooks_fire_once_per_transition() {
        let handle = ViewHandle::new("counting".into(), Box::new(CountingView::default()));
        handle.show();
        handle.show();
        handle.hide();
        handle.hide();
        let (shows, hides) = handle.with(|v: &mut CountingView| (v.shows, v.hides)).unwrap();
        assert_eq!((shows, hides), (1, 1));
        assert!(!handle.is_visible());
    }

    #[test]
    fn close_fires_hide_hook_once() {
        let handle = ViewHandle::new("counting".into(), Box::new(CountingView::default()));
        handle.show();
        handle.close();
        handle.close();
        assert!(!handle.surface().is_active());
        let hides = handle.with(|v: &mut CountingView| v.hides).unwrap();
        assert_eq!(hides, 1);
    }

    #[test]
    fn downcast_to_wrong_type_fails() {
        let handle = ViewHandle::new("blank".into(), Box::new(BlankView::default()));
        assert!(handle.is::<BlankView>());
        let err = handle.with(|_: &mut CountingView| ()).unwrap_err();
        assert!(matches!(err, NavigationError::ViewTypeMismatch { .. }));
    }

    #[derive(Default)]
    struct CounterView {
        surface: Surface,
        clicks: Label,
        pressed: Signal<()>,
    }

    impl View for CounterView {
        fn surface(&self) -> &Surface {
            &self.surface
        }

        fn surface_mut(&mut self) -> &mut Surface {
            &mut self.surface
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn handlers_can_update_their_own_view() {
        let handle = ViewHandle::new("counter".into(), Box::new(CounterView::default()));
        let target = handle.clone();
        let count = Rc::new(RefCell::new(0));
        let subscription = handle
            .with(|v: &mut CounterView| {
                let count = Rc::clone(&count);
                v.pressed.subscribe(move |_| {
                    *count.borrow_mut() += 1;
                    let text = format!("clicked {}", count.borrow());
                    target
                        .with(|v: &mut CounterView| v.clicks.set_text(text))
                        .expect("view released during emit");
                })
            })
            .unwrap();

        handle.emit(|v: &CounterView| &v.pressed, &()).unwrap();
        handle.emit(|v: &CounterView| &v.pressed, &()).unwrap();
        let text = handle
            .with(|v: &mut CounterView| v.clicks.text().to_string())
            .unwrap();
        assert_eq!(text, "clicked 2");
        subscription.cancel();
    }

    #[test]
    fn nested_access_reports_busy_view() {
        let handle = ViewHandle::new("counter".into(), Box::new(CounterView::default()));
        let inner = handle.clone();
        let nested = handle
            .with(|_: &mut CounterView| inner.with(|_: &mut CounterView| ()))
            .unwrap();
        assert!(matches!(nested, Err(NavigationError::ViewBusy(_))));
    }

    #[test]
    fn clones_share_the_view() {
        let handle = ViewHandle::new("blank".into(), Box::new(BlankView::default()));
        let other = handle.clone();
        other.show();
        assert!(handle.is_visible());
        assert!(handle.ptr_eq(&other));
    }
}
