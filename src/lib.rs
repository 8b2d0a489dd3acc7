//! Screen registry and navigation engine for model-view-presenter UIs.
//!
//! Views are instantiated once per screen from templates and cached by the
//! [`ViewRegistry`]. Presenters are built on demand from a
//! [`PresenterCatalog`], bound to their view and initialized with optional
//! JSON parameters. The [`Navigator`] keeps at most one live presenter per
//! screen, a duplicate-free back-stack and the visibility of every view.

pub mod command;
pub mod error;
pub mod geometry;
pub mod identity;
pub mod logging;
pub mod metrics;
pub mod navigator;
pub mod presenter;
pub mod registry;
pub mod samples;
pub mod signal;
pub mod template;
pub mod view;

pub use command::{CommandOutcome, NavigationCommand, NavigationQueue};
pub use error::{NavigationError, Result};
pub use geometry::{Rect, Size};
pub use identity::ScreenId;
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, NavigationMetrics};
pub use navigator::audit::{
    NavigationAudit, NavigationAuditEvent, NavigationAuditEventBuilder, NavigationAuditStage,
    NullNavigationAudit, RecordingAudit,
};
pub use navigator::{NavigationHistory, Navigator, NavigatorConfig};
pub use presenter::{
    Parameters, Presenter, PresenterCatalog, PresenterContext, PresenterCore, PresenterFactory,
    PresenterState, ScreenLifecycleEvent,
};
pub use registry::{ViewRegistry, ViewRegistryBuilder};
pub use signal::{Signal, Subscription};
pub use template::{TemplateHost, TemplateLibrary, ViewTemplate};
pub use view::{BlankView, Container, FadeGroup, Label, Surface, View, ViewHandle};
