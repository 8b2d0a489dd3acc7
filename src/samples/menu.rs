use std::any::Any;

use crate::command::NavigationCommand;
use crate::error::Result;
use crate::logging::LogLevel;
use crate::presenter::{
    Parameters, Presenter, PresenterContext, PresenterCore, ScreenLifecycleEvent,
    reject_parameters,
};
use crate::signal::Signal;
use crate::view::{Container, Label, Surface, View, ViewHandle};

use super::PROFILE;

/// Main menu: a title and a button leading to the profile screen.
#[derive(Debug)]
pub struct MenuView {
    surface: Surface,
    pub title: Label,
    pub profile_clicked: Signal<()>,
}

impl MenuView {
    pub fn new() -> Self {
        Self {
            surface: Surface::new(),
            title: Label::new(),
            profile_clicked: Signal::new(),
        }
    }

    /// Press the profile button on the view behind `handle`.
    pub fn click_profile(handle: &ViewHandle) -> Result<()> {
        handle.emit(|view: &MenuView| &view.profile_clicked, &())
    }
}

impl Default for MenuView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for MenuView {
    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    fn on_initialize(&mut self, container: &Container) {
        self.title.set_text(format!("Menu · {}", container.name()));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub struct MenuPresenter {
    core: PresenterCore,
    ctx: PresenterContext,
    initializations: usize,
    appearances: usize,
}

impl MenuPresenter {
    pub fn new(ctx: PresenterContext) -> Self {
        Self {
            core: PresenterCore::new("menu"),
            ctx,
            initializations: 0,
            appearances: 0,
        }
    }

    pub fn initializations(&self) -> usize {
        self.initializations
    }

    pub fn appearances(&self) -> usize {
        self.appearances
    }

    pub fn subscriptions(&self) -> usize {
        self.core.subscription_count()
    }

    /// Change the menu heading.
    pub fn set_title(&mut self, title: &str) -> Result<bool> {
        self.core.ensure_live()?;
        self.core
            .with_view(|view: &mut MenuView| view.title.set_text(title))
    }
}

impl Presenter for MenuPresenter {
    fn set_view(&mut self, view: ViewHandle) -> Result<()> {
        self.core.bind(view)
    }

    fn initialize(&mut self, parameters: Parameters) -> Result<()> {
        self.core.begin_initialize()?;
        reject_parameters(self.core.name(), parameters)?;

        let queue = self.ctx.navigation().clone();
        let handle = self.core.view()?.clone();
        let subscription = self.core.with_view(|view: &mut MenuView| {
            view.profile_clicked.subscribe(move |_| {
                let _ = handle.with(|view: &mut MenuView| view.title.set_text("Opening profile"));
                queue.push(NavigationCommand::navigate_to(PROFILE));
            })
        })?;
        self.core.track(subscription);

        self.initializations += 1;
        self.core.finish_initialize();
        self.ctx.log(LogLevel::Debug, self.core.name(), "initialized");
        Ok(())
    }

    fn dispose(&mut self) {
        if self.core.dispose() {
            self.ctx.log(LogLevel::Debug, self.core.name(), "disposed");
        }
    }

    fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }

    fn on_lifecycle(&mut self, event: ScreenLifecycleEvent) -> Result<()> {
        if event == ScreenLifecycleEvent::DidAppear {
            self.appearances += 1;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
