//! Two reference screens wired end to end: a menu that opens a profile, and
//! a profile that renders a model and navigates back.

mod menu;
mod profile;

pub use menu::{MenuPresenter, MenuView};
pub use profile::{ProfileModel, ProfilePresenter, ProfileView};

use crate::error::Result;
use crate::geometry::Size;
use crate::navigator::{Navigator, NavigatorConfig};
use crate::presenter::PresenterCatalog;
use crate::registry::ViewRegistry;
use crate::template::TemplateLibrary;
use crate::view::Container;

pub const MENU: &str = "menu";
pub const PROFILE: &str = "profile";

pub fn templates() -> TemplateLibrary {
    TemplateLibrary::new()
        .with(MENU, |_| Box::new(MenuView::new()))
        .with(PROFILE, |_| Box::new(ProfileView::new()))
}

pub fn catalog() -> PresenterCatalog {
    PresenterCatalog::new()
        .with(MENU, |ctx| Box::new(MenuPresenter::new(ctx.clone())))
        .with(PROFILE, |ctx| Box::new(ProfilePresenter::new(ctx.clone())))
}

pub fn container() -> Container {
    Container::new("root", Size::new(80, 24))
}

/// Navigator over the sample screens.
pub fn navigator(config: NavigatorConfig) -> Result<Navigator> {
    let views = ViewRegistry::builder()
        .container(container())
        .templates(templates())
        .build()?;
    Ok(Navigator::with_config(views, catalog(), config))
}
