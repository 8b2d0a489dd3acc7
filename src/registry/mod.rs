mod core;

pub use self::core::{ViewRegistry, ViewRegistryBuilder};
