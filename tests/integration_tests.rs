//! Integration tests for screen-navigator
//!
//! These tests drive complete navigator workflows: startup, forward and
//! backward navigation, stacked views, vetoes, hooks, web routing and
//! history limits.

use parking_lot::Mutex;
use screen_navigator::*;
use serde_json::{json, Value};
use std::sync::Arc;

type Log = Arc<Mutex<Vec<String>>>;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Test Doubles
// ============================================================================

/// View that records every callback into a shared log
struct Screen {
    name: String,
    log: Log,
    veto: bool,
    payload: Option<Value>,
}

impl Screen {
    fn record(&self, event: &str) {
        self.log.lock().push(format!("{}:{}", self.name, event));
    }
}

impl Layout for Screen {
    fn markup(&self) -> Option<String> {
        Some(format!("<{}>", self.name))
    }
}

impl View for Screen {
    fn before<'a>(&'a mut self, _args: &'a RouteArgs) -> CallbackFuture<'a> {
        self.record("before");
        done()
    }

    fn next<'a>(&'a mut self, _args: &'a RouteArgs) -> CallbackFuture<'a> {
        self.record("next");
        done()
    }

    fn back<'a>(&'a mut self, _args: &'a RouteArgs) -> CallbackFuture<'a> {
        self.record("back");
        done()
    }

    fn handle<'a>(&'a mut self, args: &'a RouteArgs) -> CallbackFuture<'a> {
        let args: Vec<&str> = args.iter().collect();
        self.record(&format!("handle{:?}", args));
        if let Some(payload) = &self.payload {
            self.record(&format!("payload={}", payload));
        }
        done()
    }

    fn leave(&mut self) -> CallbackFuture<'_, LeaveDecision> {
        self.record("leave");
        let decision = LeaveDecision::from(!self.veto);
        Box::pin(async move { Ok(decision) })
    }

    fn stack_closed(&mut self) -> CallbackFuture<'_, Option<Value>> {
        Box::pin(async { Ok(Some(json!("dismissed"))) })
    }
}

struct Account {
    log: Log,
    begin: bool,
}

impl Layout for Account {
    fn header(&self) -> Option<&str> {
        Some("account-header")
    }
}

impl Controller for Account {
    fn action<'a>(&'a mut self, action: &'a str, args: &'a RouteArgs) -> CallbackFuture<'a> {
        self.log.lock().push(format!(
            "account:{}:{}:begin={}",
            action,
            args.get(0).unwrap_or("-"),
            self.begin
        ));
        done()
    }
}

/// Content swapper that records what it was asked to do
#[derive(Clone, Default)]
struct RecordingSwap {
    log: Log,
}

impl ContentSwap for RecordingSwap {
    fn toggle_animation(&mut self, phase: AnimationPhase, classes: &AnimationClasses) {
        let (add, remove) = classes.toggles(phase);
        self.log.lock().push(format!(
            "{:?}+{}-{}",
            phase,
            add.unwrap_or(""),
            remove.unwrap_or("")
        ));
    }

    fn swap(&mut self, request: RenderRequest) -> Result<SwapReport, BoxError> {
        self.log.lock().push(format!("swap {}", request.markup));
        NullSwap.swap(request)
    }

    fn push_layer(&mut self, view: &str, markup: &str) -> Result<(), BoxError> {
        self.log.lock().push(format!("push {} {}", view, markup));
        Ok(())
    }

    fn pop_layer(&mut self) -> Result<(), BoxError> {
        self.log.lock().push("pop".to_string());
        Ok(())
    }
}

struct Harness {
    navigator: Navigator,
    log: Log,
    swaps: Log,
    platform: Arc<HeadlessPlatform>,
}

fn registry(log: &Log, vetoing: &'static [&'static str]) -> ScreenRegistry {
    let mut registry = ScreenRegistry::new();
    for name in ["home", "about", "user", "list", "plain", "optional", "dialog", "lost"] {
        let log = log.clone();
        registry.register_view(name, move |ctx: &ScreenContext| Screen {
            name: name.to_string(),
            log: log.clone(),
            veto: vetoing.contains(&name),
            payload: ctx.payload.clone(),
        });
    }
    let log = log.clone();
    registry.register_controller("account", move |ctx: &ScreenContext| Account {
        log: log.clone(),
        begin: ctx.begin,
    });
    registry
}

fn routes() -> RouteConfig {
    RouteConfig::new()
        .route("/", "home")
        .route("/about", "about")
        .route("/u/{id}", "user")
        .route("/a", "plain")
        .route("/a/{x?}", "optional")
        .route("/account/{id}", "c:account, a:profile")
        .route("/account/{id}/orders", "c:account, a:orders")
        .route("/ghost", "unregistered")
}

fn harness_with(config: NavigatorConfig, vetoing: &'static [&'static str]) -> Harness {
    init_logging();
    let log = Log::default();
    let swap = RecordingSwap::default();
    let swaps = swap.log.clone();
    let platform = Arc::new(HeadlessPlatform::new());

    let navigator = Navigator::builder()
        .config(config.delay_ms(0))
        .routes(routes())
        .registry(registry(&log, vetoing))
        .content_swap(swap)
        .platform(platform.clone())
        .build();

    Harness {
        navigator,
        log,
        swaps,
        platform,
    }
}

fn app_harness() -> Harness {
    harness_with(NavigatorConfig::new().route_type(RouteType::Application), &[])
}

// ============================================================================
// Route Resolution Tests
// ============================================================================

#[test]
fn test_resolution_is_deterministic() {
    let harness = app_harness();
    let table = harness.navigator.table();

    let first = table.resolve("/u/7");
    assert_eq!(first, table.resolve("/u/7"));
    assert_eq!(first.view.as_deref(), Some("user"));
    assert_eq!(first.args.get(0), Some("7"));
}

#[test]
fn test_trailing_slash_last_match_wins() {
    let harness = app_harness();
    let decision = harness.navigator.table().resolve("/a/");

    assert_eq!(decision.address, "/a");
    assert_eq!(decision.view.as_deref(), Some("optional"));
}

// ============================================================================
// Application Routing Tests
// ============================================================================

#[tokio::test]
async fn test_back_on_fresh_navigator_is_refused() {
    let harness = app_harness();
    let nav = &harness.navigator;

    assert!(!nav.back(1).await.unwrap());
    nav.start().await.unwrap();
    assert!(!nav.back(1).await.unwrap());
    assert_eq!(nav.now().as_deref(), Some("/"));
    assert!(!nav.is_back());
}

#[tokio::test]
async fn test_next_then_back_restores_previous_top() {
    let harness = app_harness();
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    nav.next("/about", Some(json!({ "from": "home" })))
        .await
        .unwrap();
    assert_eq!(nav.history().len(), 2);
    assert!(harness
        .log
        .lock()
        .contains(&r#"about:payload={"from":"home"}"#.to_string()));

    assert!(nav.back(1).await.unwrap());
    assert_eq!(nav.now().as_deref(), Some("/"));
    assert_eq!(nav.active_view_id().as_deref(), Some("home"));
    assert_eq!(nav.history().len(), 1);
    assert!(harness.log.lock().contains(&"home:back".to_string()));
    assert!(nav.is_next());
}

#[tokio::test]
async fn test_back_more_than_history_is_refused() {
    let harness = app_harness();
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    nav.next("/about", None).await.unwrap();
    assert!(!nav.back(2).await.unwrap());
    assert_eq!(nav.now().as_deref(), Some("/about"));
    assert_eq!(nav.history().len(), 2);
}

#[tokio::test]
async fn test_back_two_steps_lands_on_first_screen() {
    let harness = app_harness();
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    nav.next("/about", None).await.unwrap();
    nav.next("/u/1", None).await.unwrap();

    assert!(nav.back(2).await.unwrap());
    assert_eq!(nav.now().as_deref(), Some("/"));
    assert_eq!(nav.active_view_id().as_deref(), Some("home"));
    assert_eq!(nav.history().len(), 1);
    assert!(!nav.is_back());
}

#[tokio::test]
async fn test_move_to_expands_route_map() {
    let harness = app_harness();
    let nav = &harness.navigator;
    let user = RouteMap::new("/u/{id}", "user");

    let outcome = nav.move_to(&user, [7], None).await.unwrap();
    assert_eq!(
        outcome,
        NavigationOutcome::Completed {
            address: "/u/7".into()
        }
    );
    assert!(harness.log.lock().contains(&r#"user:handle["7"]"#.to_string()));
    assert_eq!(nav.history()[0].address, "/u/7");
}

#[tokio::test]
async fn test_map_outside_route_table_uses_its_view() {
    let harness = app_harness();
    let nav = &harness.navigator;
    let list = RouteMap::new("/lists/{name}", "list");

    let outcome = nav
        .next(Target::map(list, ["groceries"]), None)
        .await
        .unwrap();
    assert!(outcome.is_success());
    assert_eq!(nav.active_view_id().as_deref(), Some("list"));
    assert!(harness
        .log
        .lock()
        .contains(&r#"list:handle["groceries"]"#.to_string()));
}

#[tokio::test]
async fn test_replace_swaps_top_entry() {
    let harness = app_harness();
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    nav.next("/about", None).await.unwrap();
    nav.replace("/u/3", None).await.unwrap();

    let addresses: Vec<String> = nav.history().into_iter().map(|e| e.address).collect();
    assert_eq!(addresses, vec!["/", "/u/3"]);
    assert!(nav.back(1).await.unwrap());
    assert_eq!(nav.now().as_deref(), Some("/"));
}

#[tokio::test]
async fn test_controller_routes_detect_begin() {
    let harness = app_harness();
    let nav = &harness.navigator;

    nav.next("/account/5", None).await.unwrap();
    nav.next("/account/5/orders", None).await.unwrap();
    nav.next("/about", None).await.unwrap();
    nav.next("/account/6", None).await.unwrap();

    let events: Vec<String> = harness
        .log
        .lock()
        .iter()
        .filter(|e| e.starts_with("account:"))
        .cloned()
        .collect();
    assert_eq!(
        events,
        vec![
            "account:profile:5:begin=true",
            "account:orders:5:begin=false",
            "account:profile:6:begin=true",
        ]
    );
}

#[tokio::test]
async fn test_missing_screen_keeps_previous() {
    let harness = app_harness();
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    let err = nav.next("/ghost", None).await.unwrap_err();
    assert!(matches!(
        err,
        NavigationError::MissingScreen {
            kind: ScreenKind::View,
            ..
        }
    ));
    assert_eq!(nav.active_view_id().as_deref(), Some("home"));
    assert_eq!(nav.history().len(), 1);
    assert!(nav.next("/about", None).await.unwrap().is_success());
}

#[tokio::test]
async fn test_not_found_fallback_view() {
    let harness = harness_with(
        NavigatorConfig::new()
            .route_type(RouteType::Application)
            .not_found_view("lost"),
        &[],
    );
    let nav = &harness.navigator;

    let outcome = nav.next("/nowhere", None).await.unwrap();
    assert_eq!(
        outcome,
        NavigationOutcome::NotFound {
            address: "/nowhere".into(),
            fallback: true
        }
    );
    assert_eq!(nav.active_view_id().as_deref(), Some("lost"));
    assert_eq!(nav.now().as_deref(), Some("/nowhere"));
}

#[tokio::test]
async fn test_history_limit_drops_oldest() {
    let harness = harness_with(
        NavigatorConfig::new()
            .route_type(RouteType::Application)
            .history_limit(2),
        &[],
    );
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    nav.next("/about", None).await.unwrap();
    nav.next("/u/1", None).await.unwrap();

    let addresses: Vec<String> = nav.history().into_iter().map(|e| e.address).collect();
    assert_eq!(addresses, vec!["/about", "/u/1"]);
}

#[tokio::test]
async fn test_history_manipulation_does_not_render() {
    let harness = app_harness();
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    harness.log.lock().clear();

    assert!(nav.history_add("/about", None));
    assert_eq!(nav.history().len(), 2);
    assert_eq!(nav.history_pop().map(|e| e.address).as_deref(), Some("/about"));
    assert!(nav.history_clear());
    assert!(nav.history().is_empty());
    assert!(harness.log.lock().is_empty());
    assert_eq!(nav.active_view_id().as_deref(), Some("home"));
}

// ============================================================================
// Veto and Lock Tests
// ============================================================================

#[tokio::test]
async fn test_veto_skips_rendering_and_resets_flags() {
    let rendered = Arc::new(Mutex::new(Vec::new()));
    let harness = harness_with(
        NavigatorConfig::new().route_type(RouteType::Application),
        &["home"],
    );
    let nav = &harness.navigator;
    nav.hooks().register(
        Interceptor::new("render-watch")
            .observe(HookEvent::RenderingBefore, {
                let rendered = rendered.clone();
                move |_: Option<&Value>| rendered.lock().push("before")
            })
            .observe(HookEvent::RenderingAfter, {
                let rendered = rendered.clone();
                move |_: Option<&Value>| rendered.lock().push("after")
            }),
    );

    nav.start().await.unwrap();
    assert_eq!(*rendered.lock(), vec!["before", "after"]);
    rendered.lock().clear();

    let outcome = nav.next("/about", None).await.unwrap();
    assert!(outcome.is_vetoed());
    assert!(rendered.lock().is_empty());
    assert!(!nav.is_back());
    assert_eq!(nav.now().as_deref(), Some("/"));
    assert_eq!(nav.history().len(), 1);

    // Nothing is left in flight: later transitions are not refused as busy.
    assert!(!nav.back(1).await.unwrap());
    let outcome = nav.next("/about", None).await.unwrap();
    assert!(outcome.is_vetoed());
}

#[tokio::test]
async fn test_veto_during_back_restores_history_order() {
    let harness = harness_with(
        NavigatorConfig::new().route_type(RouteType::Application),
        &["user"],
    );
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    nav.next("/about", None).await.unwrap();
    nav.next("/u/1", None).await.unwrap();

    assert!(!nav.back(2).await.unwrap());
    let addresses: Vec<String> = nav.history().into_iter().map(|e| e.address).collect();
    assert_eq!(addresses, vec!["/", "/about", "/u/1"]);
    assert_eq!(nav.now().as_deref(), Some("/u/1"));
    assert_eq!(nav.active_view_id().as_deref(), Some("user"));
    assert!(!nav.is_back());
}

#[tokio::test]
async fn test_veto_with_history_limit_keeps_trimmed_entry() {
    let harness = harness_with(
        NavigatorConfig::new()
            .route_type(RouteType::Application)
            .history_limit(2),
        &["about"],
    );
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    nav.next("/about", None).await.unwrap();
    let outcome = nav.next("/u/1", None).await.unwrap();

    assert!(outcome.is_vetoed());
    let addresses: Vec<String> = nav.history().into_iter().map(|e| e.address).collect();
    assert_eq!(addresses, vec!["/", "/about"]);
    assert_eq!(nav.now().as_deref(), Some("/about"));
    assert_eq!(nav.active_view_id().as_deref(), Some("about"));
}

#[tokio::test]
async fn test_lock_refuses_every_entry_point() {
    let harness = app_harness();
    let nav = &harness.navigator;
    nav.start().await.unwrap();

    nav.set_lock(true);
    assert_eq!(
        nav.next("/about", None).await.unwrap(),
        NavigationOutcome::Refused(RefusalReason::Locked)
    );
    assert!(!nav.back(1).await.unwrap());
    assert_eq!(nav.stack(Target::view("dialog"), None).await.unwrap(), None);
    assert!(!nav.history_add("/about", None));
    assert!(nav.history_pop().is_none());

    nav.set_lock(false);
    assert!(nav.next("/about", None).await.unwrap().is_success());
}

// ============================================================================
// Stack Tests
// ============================================================================

#[tokio::test]
async fn test_stack_resolves_with_close_value() {
    let harness = app_harness();
    let nav = &harness.navigator;
    nav.start().await.unwrap();

    let closer = async {
        while !nav.stack_pending() {
            tokio::task::yield_now().await;
        }
        nav.stack_close(Some(json!(42))).await.unwrap()
    };
    let (result, closed) = tokio::join!(nav.stack(Target::view("dialog"), None), closer);

    assert!(closed);
    assert_eq!(result.unwrap(), Some(json!(42)));
    assert!(!nav.stack_pending());
    assert_eq!(nav.active_view_id().as_deref(), Some("home"));
    assert_eq!(nav.history().len(), 1);

    let swaps = harness.swaps.lock().clone();
    assert!(swaps.contains(&"push dialog <dialog>".to_string()));
    assert!(swaps.contains(&"pop".to_string()));
}

#[tokio::test]
async fn test_back_closes_stack_with_view_value() {
    let harness = app_harness();
    let nav = &harness.navigator;
    nav.start().await.unwrap();

    let closer = async {
        while !nav.stack_pending() {
            tokio::task::yield_now().await;
        }
        nav.back(1).await.unwrap()
    };
    let (result, went_back) = tokio::join!(nav.stack(Target::view("dialog"), None), closer);

    assert!(went_back);
    assert_eq!(result.unwrap(), Some(json!("dismissed")));
    assert_eq!(nav.now().as_deref(), Some("/"));
    assert!(!nav.is_back());
}

#[tokio::test]
async fn test_every_stack_close_is_announced() {
    let closes = Arc::new(Mutex::new(Vec::new()));
    let harness = app_harness();
    harness.navigator.hooks().register(
        Interceptor::new("close-watch").observe(HookEvent::TransitionStackClose, {
            let closes = closes.clone();
            move |value: Option<&Value>| closes.lock().push(value.cloned())
        }),
    );
    let nav = &harness.navigator;
    nav.start().await.unwrap();

    let by_back = async {
        while !nav.stack_pending() {
            tokio::task::yield_now().await;
        }
        nav.back(1).await.unwrap()
    };
    let (result, went_back) = tokio::join!(nav.stack(Target::view("dialog"), None), by_back);
    assert!(went_back);
    assert_eq!(result.unwrap(), Some(json!("dismissed")));

    let by_close = async {
        while !nav.stack_pending() {
            tokio::task::yield_now().await;
        }
        nav.stack_close(Some(json!(7))).await.unwrap()
    };
    let (result, closed) = tokio::join!(nav.stack(Target::view("dialog"), None), by_close);
    assert!(closed);
    assert_eq!(result.unwrap(), Some(json!(7)));

    assert_eq!(*closes.lock(), vec![None, Some(json!(7))]);
}

#[tokio::test]
async fn test_stacking_controller_route_is_missing_view() {
    let harness = app_harness();
    let nav = &harness.navigator;
    nav.start().await.unwrap();

    let err = nav.stack("/account/5", None).await.unwrap_err();
    assert!(matches!(
        err,
        NavigationError::MissingScreen {
            kind: ScreenKind::View,
            ..
        }
    ));
    assert!(!err.is_not_found());
    assert!(!nav.stack_pending());
    assert!(harness.swaps.lock().iter().all(|s| !s.starts_with("push")));

    let err = nav.stack("/nowhere", None).await.unwrap_err();
    assert!(err.is_not_found());

    let closer = async {
        while !nav.stack_pending() {
            tokio::task::yield_now().await;
        }
        nav.stack_close(None).await.unwrap()
    };
    let (result, closed) = tokio::join!(nav.stack(Target::view("dialog"), None), closer);
    assert!(closed);
    assert_eq!(result.unwrap(), Some(json!("dismissed")));
}

#[tokio::test]
async fn test_stack_close_without_stack() {
    let harness = app_harness();
    assert!(!harness.navigator.stack_close(None).await.unwrap());
}

// ============================================================================
// Hook Tests
// ============================================================================

#[tokio::test]
async fn test_hooks_thread_values_in_registration_order() {
    let harness = app_harness();
    let hooks = harness.navigator.hooks();
    hooks.register(
        Interceptor::new("first").on(HookEvent::SetRenderContent, |markup| {
            Some(Value::String(format!("{}A", markup?.as_str()?)))
        }),
    );
    hooks.register(
        Interceptor::new("silent").observe(HookEvent::SetRenderContent, |_: Option<&Value>| {}),
    );
    hooks.register(
        Interceptor::new("second").on_named("onSetRenderContent", |markup| {
            Some(Value::String(format!("{}B", markup?.as_str()?)))
        }),
    );

    harness.navigator.start().await.unwrap();
    assert!(harness.swaps.lock().contains(&"swap <home>AB".to_string()));
}

#[tokio::test]
async fn test_transition_hooks_see_targets() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let harness = app_harness();
    harness.navigator.hooks().register(
        Interceptor::new("audit")
            .observe(HookEvent::TransitionNext, {
                let seen = seen.clone();
                move |value: Option<&Value>| seen.lock().push(("next", value.cloned()))
            })
            .observe(HookEvent::TransitionBack, {
                let seen = seen.clone();
                move |value: Option<&Value>| seen.lock().push(("back", value.cloned()))
            }),
    );

    let nav = &harness.navigator;
    nav.next("/about", None).await.unwrap();
    nav.next("/u/2", None).await.unwrap();
    nav.back(1).await.unwrap();

    assert_eq!(
        *seen.lock(),
        vec![
            ("next", Some(json!({ "address": "/about" }))),
            ("next", Some(json!({ "address": "/u/2" }))),
            ("back", Some(json!({ "count": 1 }))),
        ]
    );
}

// ============================================================================
// Animation Tests
// ============================================================================

#[tokio::test]
async fn test_animation_classes_follow_direction() {
    let harness = harness_with(
        NavigatorConfig::new()
            .route_type(RouteType::Application)
            .animation(
                AnimationSelector::default()
                    .next(AnimationClasses::new("slide-in", "slide-out"))
                    .back(AnimationClasses::new("back-in", "back-out")),
            ),
        &[],
    );
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    nav.next("/about", None).await.unwrap();
    harness.swaps.lock().clear();
    nav.back(1).await.unwrap();

    let toggles: Vec<String> = harness
        .swaps
        .lock()
        .iter()
        .filter(|entry| !entry.starts_with("swap"))
        .cloned()
        .collect();
    assert_eq!(toggles, vec!["Close+back-out-back-in", "Open+back-in-back-out"]);
}

// ============================================================================
// Web Routing Tests
// ============================================================================

#[tokio::test]
async fn test_web_next_defers_to_address_change() {
    let harness = harness_with(NavigatorConfig::new(), &[]);
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    assert_eq!(nav.now().as_deref(), Some("/"));

    let outcome = nav.next("/about", None).await.unwrap();
    assert_eq!(
        outcome,
        NavigationOutcome::Deferred {
            address: "/about".into()
        }
    );
    assert_eq!(harness.platform.fragments(), vec!["/about"]);
    assert_eq!(nav.now().as_deref(), Some("/"));

    let outcome = nav.address_changed("#/about").await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(nav.active_view_id().as_deref(), Some("about"));
    assert_eq!(nav.history().len(), 2);
}

#[tokio::test]
async fn test_web_back_uses_native_history() {
    let harness = harness_with(NavigatorConfig::new(), &[]);
    let nav = &harness.navigator;

    nav.start().await.unwrap();
    nav.next("/about", None).await.unwrap();
    nav.address_changed("/about").await.unwrap();

    assert!(nav.back(1).await.unwrap());
    assert_eq!(harness.platform.back_count(), 1);
    assert!(nav.is_back());
    assert_eq!(nav.history().len(), 1);

    nav.address_changed("").await.unwrap();
    assert_eq!(nav.now().as_deref(), Some("/"));
    assert!(harness.log.lock().contains(&"home:back".to_string()));
    assert!(!nav.is_back());
}

#[tokio::test]
async fn test_web_start_uses_current_fragment() {
    init_logging();
    let log = Log::default();
    let platform = Arc::new(HeadlessPlatform::with_fragment("/u/9"));
    let nav = Navigator::builder()
        .config(NavigatorConfig::new().delay_ms(0))
        .routes(routes())
        .registry(registry(&log, &[]))
        .platform(platform)
        .build();

    nav.start().await.unwrap();
    assert_eq!(nav.now().as_deref(), Some("/u/9"));
    assert_eq!(nav.history()[0].args.get(0), Some("9"));
}

#[tokio::test]
async fn test_locked_address_change_restores_fragment() {
    let harness = harness_with(NavigatorConfig::new(), &[]);
    let nav = &harness.navigator;
    nav.start().await.unwrap();
    nav.next("/about", None).await.unwrap();
    nav.address_changed("/about").await.unwrap();

    nav.set_lock(true);
    let outcome = nav.address_changed("/u/1").await.unwrap();
    assert_eq!(outcome, NavigationOutcome::Refused(RefusalReason::Locked));
    assert_eq!(harness.platform.fragments().last().map(String::as_str), Some("/about"));
    assert_eq!(nav.now().as_deref(), Some("/about"));
}

#[tokio::test]
async fn test_web_view_target_renders_directly() {
    let harness = harness_with(NavigatorConfig::new(), &[]);
    let nav = &harness.navigator;

    let outcome = nav.next(Target::view("dialog"), None).await.unwrap();
    assert!(matches!(outcome, NavigationOutcome::Completed { .. }));
    assert_eq!(nav.active_view_id().as_deref(), Some("dialog"));
    assert!(harness.platform.fragments().is_empty());
    assert_eq!(nav.history()[0].source, EntrySource::View);
}
