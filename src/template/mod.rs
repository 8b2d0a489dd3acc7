mod core;

pub use self::core::{TemplateHost, TemplateLibrary, ViewTemplate};
