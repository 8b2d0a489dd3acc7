use std::sync::Arc;

use screenflow::samples::{self, MENU, MenuPresenter, MenuView, PROFILE, ProfilePresenter, ProfileView};
use screenflow::{
    Logger, MemorySink, NavigationAuditStage, NavigationCommand, NavigationError, NavigatorConfig,
    RecordingAudit, ScreenId,
};
use serde_json::json;

fn history(nav: &screenflow::Navigator) -> Vec<String> {
    nav.history().iter().map(ScreenId::to_string).collect()
}

#[test]
fn menu_to_profile_and_back() {
    let sink = MemorySink::new();
    let audit = Arc::new(RecordingAudit::new());
    let mut config = NavigatorConfig::default()
        .with_logger(Logger::new(sink.clone()))
        .with_audit(audit.clone());
    config.enable_metrics();
    let mut nav = samples::navigator(config).expect("navigator");

    nav.navigate(MENU, None).expect("menu");
    nav.navigate(PROFILE, Some(json!({"name": "Ann", "level": 7})))
        .expect("profile");

    assert_eq!(history(&nav), vec![MENU, PROFILE]);
    assert_eq!(nav.visible_ids(), vec![ScreenId::from(PROFILE)]);
    let profile = nav
        .active_presenter::<ProfilePresenter>()
        .expect("profile presenter");
    assert_eq!(profile.rendered_name().expect("name"), "Ann");

    let view = nav.views().view(&PROFILE.into()).cloned().expect("view");
    ProfileView::click_back(&view).expect("click");
    assert_eq!(nav.process_pending().expect("drain"), 1);

    assert_eq!(history(&nav), vec![MENU]);
    assert_eq!(nav.visible_ids(), vec![ScreenId::from(MENU)]);
    let menu = nav.active_presenter::<MenuPresenter>().expect("menu presenter");
    assert_eq!(menu.initializations(), 1);
    assert_eq!(menu.appearances(), 2);

    let snapshot = nav.metrics_snapshot().expect("metrics");
    assert_eq!(snapshot.creations, 2);
    assert_eq!(snapshot.back_navigations, 1);
    assert!(audit.stages().contains(&NavigationAuditStage::CommandExecuted));
    assert!(sink.messages().iter().any(|m| m == "went_back"));
}

#[test]
fn menu_click_opens_profile_through_queue() {
    let mut nav = samples::navigator(NavigatorConfig::default()).expect("navigator");
    nav.navigate(MENU, None).expect("menu");

    let view = nav.views().view(&MENU.into()).cloned().expect("view");
    MenuView::click_profile(&view).expect("click");
    nav.process_pending().expect("drain");

    assert_eq!(nav.current().map(ScreenId::as_str), Some(PROFILE));
    let profile = nav
        .active_presenter::<ProfilePresenter>()
        .expect("profile presenter");
    assert_eq!(profile.rendered_name().expect("name"), "Guest");
}

#[test]
fn unsubscribed_handlers_stop_after_close() {
    let mut nav = samples::navigator(NavigatorConfig::default()).expect("navigator");
    nav.navigate(MENU, None).expect("menu");
    let view = nav.views().view(&MENU.into()).cloned().expect("view");
    let handlers = view
        .with(|v: &mut MenuView| v.profile_clicked.handler_count())
        .expect("count");
    assert_eq!(handlers, 1);

    assert!(nav.close_screen(MENU));
    MenuView::click_profile(&view).expect("click");
    assert!(nav.queue().is_empty());

    nav.navigate(MENU, None).expect("menu again");
    let handlers = view
        .with(|v: &mut MenuView| v.profile_clicked.handler_count())
        .expect("count");
    assert_eq!(handlers, 1);
}

#[test]
fn bad_profile_model_is_rejected() {
    let mut nav = samples::navigator(NavigatorConfig::default()).expect("navigator");
    nav.navigate(MENU, None).expect("menu");
    let err = nav
        .navigate(PROFILE, Some(json!({"level": "high"})))
        .err()
        .expect("decode error");
    assert!(matches!(err, NavigationError::Model(_)));
    assert!(!nav.is_active(PROFILE));
    assert_eq!(nav.visible_ids(), vec![ScreenId::from(MENU)]);
}

#[test]
fn commands_serialize_for_replay() {
    let command = NavigationCommand::navigate_with(PROFILE, json!({"name": "Ann"}));
    let encoded = serde_json::to_value(&command).expect("encode");
    assert_eq!(encoded["kind"], json!("navigate_to"));
    let decoded: NavigationCommand = serde_json::from_value(encoded).expect("decode");
    assert_eq!(decoded, command);
}
