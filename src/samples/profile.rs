use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::command::NavigationCommand;
use crate::error::Result;
use crate::presenter::{Parameters, Presenter, PresenterContext, PresenterCore, decode_model};
use crate::signal::Signal;
use crate::view::{Label, Surface, View, ViewHandle};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileModel {
    pub name: String,
    pub level: u32,
    pub experience: u32,
    pub avatar_url: Option<String>,
}

impl ProfileModel {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Profile card with a back button. Fades instead of deactivating.
#[derive(Debug)]
pub struct ProfileView {
    surface: Surface,
    pub name: Label,
    pub level: Label,
    pub back_clicked: Signal<()>,
}

impl ProfileView {
    pub fn new() -> Self {
        Self {
            surface: Surface::with_fade(),
            name: Label::new(),
            level: Label::new(),
            back_clicked: Signal::new(),
        }
    }

    pub fn render(&mut self, model: Option<&ProfileModel>) {
        match model {
            Some(model) => {
                self.name.set_text(model.name.as_str());
                self.level.set_text(format!("Level {}", model.level));
            }
            None => {
                self.name.set_text("Guest");
                self.level.set_text("");
            }
        }
    }

    pub fn click_back(handle: &ViewHandle) -> Result<()> {
        handle.emit(|view: &ProfileView| &view.back_clicked, &())
    }
}

impl Default for ProfileView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ProfileView {
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

pub struct ProfilePresenter {
    core: PresenterCore,
    ctx: PresenterContext,
    model: Option<ProfileModel>,
}

impl ProfilePresenter {
    pub fn new(ctx: PresenterContext) -> Self {
        Self {
            core: PresenterCore::new("profile"),
            ctx,
            model: None,
        }
    }

    pub fn model(&self) -> Result<Option<&ProfileModel>> {
        self.core.ensure_live()?;
        Ok(self.model.as_ref())
    }

    pub fn rendered_name(&self) -> Result<String> {
        self.core.ensure_live()?;
        self.core
            .with_view(|view: &mut ProfileView| view.name.text().to_string())
    }

    pub fn rename(&mut self, name: &str) -> Result<()> {
        self.core.ensure_live()?;
        let model = self.model.get_or_insert_with(ProfileModel::default);
        model.name = name.to_string();
        let model = model.clone();
        self.core
            .with_view(|view: &mut ProfileView| view.render(Some(&model)))
    }

    fn render(&self) -> Result<()> {
        let model = self.model.as_ref();
        self.core
            .with_view(|view: &mut ProfileView| view.render(model))
    }
}

impl Presenter for ProfilePresenter {
    fn set_view(&mut self, view: ViewHandle) -> Result<()> {
        self.core.bind(view)
    }

    fn initialize(&mut self, parameters: Parameters) -> Result<()> {
        self.core.begin_initialize()?;
        self.model = decode_model(parameters)?;
        self.render()?;

        let queue = self.ctx.navigation().clone();
        let subscription = self.core.with_view(|view: &mut ProfileView| {
            view.back_clicked
                .subscribe(move |_| queue.push(NavigationCommand::go_back()))
        })?;
        self.core.track(subscription);
        self.core.finish_initialize();
        Ok(())
    }

    fn refresh(&mut self, parameters: Parameters) -> Result<()> {
        self.core.ensure_live()?;
        if let Some(model) = decode_model(parameters)? {
            self.model = Some(model);
            self.render()?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        if self.core.dispose() {
            self.model = None;
        }
    }

    fn is_disposed(&self) -> bool {
        self.core.is_disposed()
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
