//! Screen registry and navigation engine.
//!
//! The [`Navigator`] owns the active presenters (at most one per screen), the
//! back-stack and the view registry. Every navigation first does the fallible
//! work (resolve the view, build, bind and initialize the presenter) and only
//! then touches visibility and history, so a failure leaves the previously
//! visible screen and the history exactly as they were.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::command::NavigationQueue;
use crate::error::{NavigationError, Result};
use crate::identity::ScreenId;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, NavigationMetrics};
use crate::presenter::{
    Parameters, Presenter, PresenterCatalog, PresenterContext, ScreenLifecycleEvent,
};
use crate::registry::ViewRegistry;

pub mod audit;
mod history;

use audit::{
    NavigationAudit, NavigationAuditEventBuilder, NavigationAuditStage, NullNavigationAudit,
};
pub use history::NavigationHistory;

const LOG_TARGET: &str = "screenflow::navigator";

/// Configuration knobs for the navigator.
#[derive(Clone)]
pub struct NavigatorConfig {
    /// Used by [`Navigator::navigate`] when the caller does not say.
    pub hide_others_by_default: bool,
    /// Optional structured logger used by the navigator and handed to
    /// presenters through their context.
    pub logger: Option<Logger>,
    /// Shared counters. `None` disables metrics.
    pub metrics: Option<Arc<Mutex<NavigationMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    /// Receives every state transition.
    pub audit: Arc<dyn NavigationAudit>,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            hide_others_by_default: true,
            logger: None,
            metrics: None,
            metrics_target: "screenflow::navigator.metrics".to_string(),
            audit: Arc::new(NullNavigationAudit),
        }
    }
}

impl NavigatorConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn NavigationAudit>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_hide_others_by_default(mut self, hide_others: bool) -> Self {
        self.hide_others_by_default = hide_others;
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(NavigationMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<NavigationMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

struct ActiveScreen {
    id: ScreenId,
    presenter: Box<dyn Presenter>,
}

pub struct Navigator {
    views: ViewRegistry,
    presenters: PresenterCatalog,
    active: Vec<ActiveScreen>,
    history: NavigationHistory,
    queue: NavigationQueue,
    context: PresenterContext,
    config: NavigatorConfig,
}

impl Navigator {
    pub fn new(views: ViewRegistry, presenters: PresenterCatalog) -> Self {
        Self::with_config(views, presenters, NavigatorConfig::default())
    }

    pub fn with_config(
        views: ViewRegistry,
        presenters: PresenterCatalog,
        config: NavigatorConfig,
    ) -> Self {
        let queue = NavigationQueue::new();
        let context = PresenterContext::new(queue.clone(), config.logger.clone());
        Self {
            views,
            presenters,
            active: Vec::new(),
            history: NavigationHistory::new(),
            queue,
            context,
            config,
        }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Navigate using the configured `hide_others` default.
    pub fn navigate(
        &mut self,
        id: impl Into<ScreenId>,
        parameters: Parameters,
    ) -> Result<&mut dyn Presenter> {
        let hide_others = self.config.hide_others_by_default;
        self.navigate_to(id, parameters, hide_others)
    }

    /// Show `id`, creating its presenter on first use, and record it on top
    /// of the history.
    ///
    /// With `hide_others` every other visible screen is hidden (its presenter
    /// stays cached); without it the screen is shown as an overlay.
    pub fn navigate_to(
        &mut self,
        id: impl Into<ScreenId>,
        parameters: Parameters,
        hide_others: bool,
    ) -> Result<&mut dyn Presenter> {
        let id = id.into();
        let fresh = match self.stage(&id, parameters) {
            Ok(fresh) => fresh,
            Err(err) => {
                self.report_failure(&id, &err);
                return Err(err);
            }
        };

        let created = fresh.is_some();
        if let Some(presenter) = fresh {
            self.active.push(ActiveScreen {
                id: id.clone(),
                presenter,
            });
        }

        if hide_others {
            self.hide_others(&id);
        }
        self.show_screen(&id);
        self.history.record(id.clone());

        self.record_metric(|metrics| metrics.record_navigation(created));
        self.audit(
            NavigationAuditEventBuilder::new(NavigationAuditStage::HistoryRecorded)
                .detail("screen", id.as_str())
                .detail("depth", self.history.len()),
        );
        self.log(
            LogLevel::Debug,
            "navigated",
            [
                json_kv("screen", id.as_str()),
                json_kv("created", created),
                json_kv("hide_others", hide_others),
                json_kv("history", self.history_json()),
            ],
        );

        self.live_presenter(&id)
    }

    /// Return to the previous screen still holding a live presenter.
    ///
    /// The current top is popped together with any closed screens between it
    /// and the target. When no live screen remains below the top, nothing
    /// changes and `false` is returned. Presenters are never created or
    /// re-initialized here.
    pub fn go_back(&mut self) -> bool {
        let active = &self.active;
        let target_index = self
            .history
            .find_below_top(|id| active.iter().any(|screen| screen.id == *id));

        let Some(target_index) = target_index else {
            self.audit(
                NavigationAuditEventBuilder::new(NavigationAuditStage::BackRejected)
                    .detail("depth", self.history.len()),
            );
            self.log(
                LogLevel::Debug,
                "back_rejected",
                [json_kv("history", self.history_json())],
            );
            return false;
        };

        let from = self.history.top().cloned();
        let skipped = self.history.len() - target_index - 2;
        let target = self.history.as_slice()[target_index].clone();
        self.history.truncate_to(target_index);

        self.hide_others(&target);
        self.show_screen(&target);

        self.record_metric(NavigationMetrics::record_back);
        let from = from.map(|id| id.to_string());
        self.audit(
            NavigationAuditEventBuilder::new(NavigationAuditStage::BackNavigated)
                .detail("from", from.clone())
                .detail("to", target.as_str())
                .detail("skipped", skipped),
        );
        self.log(
            LogLevel::Debug,
            "went_back",
            [
                json_kv("from", from),
                json_kv("to", target.as_str()),
                json_kv("skipped_stale", skipped),
            ],
        );
        true
    }

    /// Hide and dispose the presenter for `id`. History entries are left in
    /// place; [`Navigator::go_back`] skips them. Returns whether a presenter
    /// was closed.
    pub fn close_screen(&mut self, id: impl Into<ScreenId>) -> bool {
        let id = id.into();
        let Some(index) = self.position(&id) else {
            return false;
        };

        self.hide_screen(&id);
        let mut closed = self.active.remove(index);
        closed.presenter.dispose();

        self.record_metric(NavigationMetrics::record_close);
        self.audit(
            NavigationAuditEventBuilder::new(NavigationAuditStage::ScreenClosed)
                .detail("screen", id.as_str()),
        );
        self.log(
            LogLevel::Debug,
            "screen_closed",
            [json_kv("screen", id.as_str())],
        );
        true
    }

    /// Hide every view and dispose every presenter. History is kept, but any
    /// later navigation builds presenters from scratch.
    pub fn hide_all_screens(&mut self) {
        self.views.hide_all_views();
        let disposed = self.active.len();
        for mut screen in self.active.drain(..) {
            screen.presenter.dispose();
        }

        self.record_metric(|metrics| metrics.record_teardown(disposed));
        self.audit(
            NavigationAuditEventBuilder::new(NavigationAuditStage::TornDown)
                .detail("disposed", disposed),
        );
        self.log(
            LogLevel::Info,
            "screens_torn_down",
            [json_kv("disposed", disposed)],
        );
    }

    /// First active presenter of type `T`, in creation order.
    pub fn active_presenter<T>(&self) -> Option<&T>
    where
        T: Presenter,
    {
        self.active
            .iter()
            .find_map(|screen| screen.presenter.as_any().downcast_ref::<T>())
    }

    pub fn active_presenter_mut<T>(&mut self) -> Option<&mut T>
    where
        T: Presenter,
    {
        self.active
            .iter_mut()
            .find_map(|screen| screen.presenter.as_any_mut().downcast_mut::<T>())
    }

    pub fn presenter(&self, id: impl AsRef<str>) -> Option<&dyn Presenter> {
        let id = id.as_ref();
        self.active
            .iter()
            .find(|screen| screen.id.as_str() == id)
            .map(|screen| &*screen.presenter)
    }

    pub fn presenter_mut(&mut self, id: impl AsRef<str>) -> Option<&mut dyn Presenter> {
        let id = id.as_ref();
        self.active
            .iter_mut()
            .find(|screen| screen.id.as_str() == id)
            .map(|screen| &mut *screen.presenter)
    }

    /// Drain queued commands in FIFO order. Stops at the first failing
    /// command; commands behind it stay queued.
    pub fn process_pending(&mut self) -> Result<usize> {
        let mut executed = 0;
        while let Some(command) = self.queue.pop() {
            let outcome = command.execute(self)?;
            executed += 1;
            self.audit(
                NavigationAuditEventBuilder::new(NavigationAuditStage::CommandExecuted)
                    .detail("command", serde_json::to_value(&command).unwrap_or(Value::Null))
                    .detail("outcome", format!("{outcome:?}")),
            );
        }
        Ok(executed)
    }

    pub fn queue(&self) -> &NavigationQueue {
        &self.queue
    }

    pub fn context(&self) -> &PresenterContext {
        &self.context
    }

    pub fn current(&self) -> Option<&ScreenId> {
        self.history.top()
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn can_go_back(&self) -> bool {
        let active = &self.active;
        self.history
            .find_below_top(|id| active.iter().any(|screen| screen.id == *id))
            .is_some()
    }

    pub fn is_active(&self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        self.active.iter().any(|screen| screen.id.as_str() == id)
    }

    /// Active screens in creation order.
    pub fn active_ids(&self) -> Vec<ScreenId> {
        self.active.iter().map(|screen| screen.id.clone()).collect()
    }

    pub fn visible_ids(&self) -> Vec<ScreenId> {
        self.views.visible_ids()
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        metrics.lock().ok().map(|guard| guard.snapshot())
    }

    /// Log the current metrics snapshot, if both metrics and a logger are set.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) =
            (self.config.logger.as_ref(), self.metrics_snapshot())
        {
            let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
        }
    }

    /// Everything that can fail, without touching visibility or history.
    /// Returns the new presenter when one had to be built.
    fn stage(
        &mut self,
        id: &ScreenId,
        parameters: Parameters,
    ) -> Result<Option<Box<dyn Presenter>>> {
        if let Some(index) = self.position(id) {
            self.active[index].presenter.refresh(parameters)?;
            self.audit(
                NavigationAuditEventBuilder::new(NavigationAuditStage::ScreenReused)
                    .detail("screen", id.as_str()),
            );
            return Ok(None);
        }

        let view = self.views.get_or_create_view(id)?;
        let mut presenter = self.presenters.create(id, &self.context)?;
        let prepared = presenter
            .set_view(view)
            .and_then(|()| presenter.initialize(parameters));
        if let Err(err) = prepared {
            presenter.dispose();
            return Err(err);
        }

        self.audit(
            NavigationAuditEventBuilder::new(NavigationAuditStage::ScreenCreated)
                .detail("screen", id.as_str())
                .detail("presenter", presenter.name()),
        );
        Ok(Some(presenter))
    }

    fn hide_others(&mut self, keep: &ScreenId) {
        let visible: Vec<ScreenId> = self
            .views
            .visible_ids()
            .into_iter()
            .filter(|id| id != keep)
            .collect();
        for id in visible {
            self.hide_screen(&id);
        }
    }

    fn hide_screen(&mut self, id: &ScreenId) {
        let Some(view) = self.views.view(id).cloned() else {
            return;
        };
        let was_visible = view.is_visible();
        if was_visible {
            self.notify(id, ScreenLifecycleEvent::WillDisappear);
        }
        view.hide();
        if was_visible {
            self.notify(id, ScreenLifecycleEvent::DidDisappear);
            self.audit(
                NavigationAuditEventBuilder::new(NavigationAuditStage::ScreenHidden)
                    .detail("screen", id.as_str()),
            );
        }
    }

    fn show_screen(&mut self, id: &ScreenId) {
        let Some(view) = self.views.view(id).cloned() else {
            return;
        };
        let was_visible = view.is_visible();
        if !was_visible {
            self.notify(id, ScreenLifecycleEvent::WillAppear);
        }
        view.show();
        if !was_visible {
            self.notify(id, ScreenLifecycleEvent::DidAppear);
            self.audit(
                NavigationAuditEventBuilder::new(NavigationAuditStage::ScreenShown)
                    .detail("screen", id.as_str()),
            );
        }
    }

    fn notify(&mut self, id: &ScreenId, event: ScreenLifecycleEvent) {
        let Some(index) = self.position(id) else {
            return;
        };
        if let Err(err) = self.active[index].presenter.on_lifecycle(event) {
            let event = format!("{event:?}");
            self.audit(
                NavigationAuditEventBuilder::new(NavigationAuditStage::LifecycleFailed)
                    .detail("screen", id.as_str())
                    .detail("event", event.as_str())
                    .detail("error", err.kind()),
            );
            self.log(
                LogLevel::Warn,
                "lifecycle_failed",
                [
                    json_kv("screen", id.as_str()),
                    json_kv("event", event),
                    json_kv("error", err.to_string()),
                ],
            );
        }
    }

    fn position(&self, id: &ScreenId) -> Option<usize> {
        self.active.iter().position(|screen| screen.id == *id)
    }

    fn live_presenter(&mut self, id: &ScreenId) -> Result<&mut dyn Presenter> {
        self.active
            .iter_mut()
            .find(|screen| screen.id == *id)
            .map(|screen| &mut *screen.presenter)
            .ok_or_else(|| NavigationError::Presenter(format!("no live presenter for `{id}`")))
    }

    fn report_failure(&self, id: &ScreenId, err: &NavigationError) {
        self.record_metric(NavigationMetrics::record_failure);
        self.audit(
            NavigationAuditEventBuilder::new(NavigationAuditStage::NavigationFailed)
                .detail("screen", id.as_str())
                .detail("error", err.kind()),
        );
        let level = if err.is_configuration() {
            LogLevel::Error
        } else {
            LogLevel::Warn
        };
        self.log(
            level,
            "navigation_failed",
            [
                json_kv("screen", id.as_str()),
                json_kv("error", err.to_string()),
                json_kv("kind", err.kind()),
            ],
        );
    }

    fn history_json(&self) -> Value {
        json!(
            self.history
                .iter()
                .map(ScreenId::as_str)
                .collect::<Vec<_>>()
        )
    }

    fn audit(&self, builder: NavigationAuditEventBuilder) {
        self.config.audit.record(builder.finish());
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, LOG_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_metric(&self, record: impl FnOnce(&mut NavigationMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }
}

impl Drop for Navigator {
    fn drop(&mut self) {
        if !self.active.is_empty() {
            self.hide_all_screens();
        }
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("active", &self.active_ids())
            .field("history", &self.history)
            .field("pending", &self.queue.len())
            .finish()
    }
}
