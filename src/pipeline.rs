//! Render sequence
//!
//! One transition runs these steps in order:
//!
//! 1. the outgoing screen's leave callbacks (any may veto)
//! 2. the close animation, then the configured delay
//! 3. not-found handling
//! 4. the incoming screen's `before` callbacks and the `RenderingBefore` hook
//! 5. the content swap, region callbacks and the `RenderingAfter` hook
//! 6. the open animation and the enter callbacks
//!
//! Up to the content swap the outgoing screen stays active: a veto or an
//! error puts it back and undoes the history change. After the swap the
//! incoming screen is installed even when one of its callbacks fails.

use crate::error::{BoxError, NavigationError, ScreenKind};
use crate::hooks::HookEvent;
use crate::lifecycle::{Layout, LeaveDecision, ScreenContext, View};
use crate::navigator::{Navigator, Rendered, Rollback};
use crate::render::{Region, RenderRequest, SwapReport};
use crate::state::ActiveScreen;
use crate::table::{DecisionRoute, RouteMode};
use crate::transition::{AnimationPhase, AnimationSelector};
use crate::{debug_log, error_log, info_log, trace_log, warn_log, NavigationDirection};
use serde_json::{json, Value};

const DEFAULT_ACTION: &str = "index";

/// The incoming screen together with its markup key
struct Prepared {
    screen: ActiveScreen,
    markup_key: String,
}

impl Navigator {
    /// Leave the active screen and show the one `decision` designates
    pub(crate) async fn render(
        &self,
        decision: DecisionRoute,
        payload: Option<Value>,
        rollback: Rollback,
    ) -> Result<Rendered, NavigationError> {
        let (direction, mut previous) = {
            let mut shared = self.shared();
            (shared.flags.direction(), shared.context.active.take())
        };

        if let Some(screen) = previous.as_mut() {
            let verdict = match leave(screen, direction).await {
                Ok(verdict) => verdict,
                Err(err) => {
                    self.restore(previous, rollback);
                    return Err(err);
                }
            };
            if verdict.is_veto() {
                info_log!("Leaving '{}' was vetoed", screen.view_id());
                self.restore(previous, rollback);
                return Ok(Rendered::Vetoed);
            }
        }

        let classes = AnimationSelector::resolve(
            &self.inner.config.animation,
            previous.as_ref().and_then(ActiveScreen::animation),
            direction,
        );
        self.inner
            .swap
            .lock()
            .toggle_animation(AnimationPhase::Close, &classes);
        self.pause().await;

        let mut decision = decision;
        let mut fallback = false;
        if !decision.is_success() {
            match &self.inner.config.not_found_view {
                Some(view) => {
                    error_log!(
                        "No route for '{}', showing '{}'",
                        decision.address,
                        view
                    );
                    decision = DecisionRoute {
                        mode: RouteMode::Success,
                        controller: None,
                        action: None,
                        view: Some(view.clone()),
                        ..decision
                    };
                    fallback = true;
                }
                None => {
                    error_log!("No route for '{}'", decision.address);
                    self.restore(previous, rollback);
                    return Err(NavigationError::RouteNotFound {
                        address: decision.address,
                    });
                }
            }
        }

        let Prepared {
            mut screen,
            markup_key,
        } = match self.prepare(&decision, payload).await {
            Ok(prepared) => prepared,
            Err(err) => {
                self.restore(previous, rollback);
                return Err(err);
            }
        };

        self.inner
            .hooks
            .dispatch(HookEvent::RenderingBefore, Some(decision.to_value()));
        drop(previous);

        let shown = self
            .show(&mut screen, &markup_key, &decision, direction)
            .await;

        {
            let mut shared = self.shared();
            shared.context.previous_controller = screen.controller_name().map(str::to_string);
            shared.context.active = Some(screen);
            shared.context.address = Some(decision.address.clone());
        }
        shown?;

        debug_log!("Rendered '{}' ({})", decision.address, markup_key);
        Ok(if fallback {
            Rendered::Fallback
        } else {
            Rendered::Shown
        })
    }

    /// Build the incoming screen and run its `before` callbacks
    async fn prepare(
        &self,
        decision: &DecisionRoute,
        payload: Option<Value>,
    ) -> Result<Prepared, NavigationError> {
        let registry = &self.inner.registry;
        let mut ctx = ScreenContext::new(decision.address.clone(), decision.args.clone(), payload);

        if let Some(name) = &decision.controller {
            let action = decision
                .action
                .clone()
                .unwrap_or_else(|| DEFAULT_ACTION.to_string());
            ctx.begin = self.shared().context.begins(name);

            let mut controller = registry.build_controller(name, &ctx)?;
            let view_name = decision
                .view
                .clone()
                .unwrap_or_else(|| format!("{}/{}", name, action));
            let view = registry.try_build_view(&view_name, &ctx);
            trace_log!(
                "Entering controller '{}' action '{}' (begin: {})",
                name,
                action,
                ctx.begin
            );

            controller
                .before_action(&action, &decision.args)
                .await
                .map_err(|err| NavigationError::callback("before_action", err))?;

            let markup_key = controller.view_id().map_or(view_name, str::to_string);
            return Ok(Prepared {
                screen: ActiveScreen::Controller {
                    name: name.clone(),
                    action,
                    controller,
                    view,
                },
                markup_key,
            });
        }

        let Some(name) = &decision.view else {
            return Err(NavigationError::missing(ScreenKind::View, &decision.address));
        };
        let mut view = registry.build_view(name, &ctx)?;
        view.before(&decision.args)
            .await
            .map_err(|err| NavigationError::callback("before", err))?;

        let screen = ActiveScreen::View {
            name: name.clone(),
            view,
        };
        let markup_key = screen.view_id();
        Ok(Prepared { screen, markup_key })
    }

    /// Swap the content in and run the enter callbacks
    async fn show(
        &self,
        screen: &mut ActiveScreen,
        markup_key: &str,
        decision: &DecisionRoute,
        direction: NavigationDirection,
    ) -> Result<(), NavigationError> {
        let markup = self.markup_for(screen, markup_key);
        // Slots are committed only once the host took the content.
        let mut slots = self.shared().context.regions.clone();
        let regions = match &*screen {
            ActiveScreen::View { view, .. } => slots.update(&**view),
            ActiveScreen::Controller { controller, .. } => slots.update(&**controller),
        };

        let request = RenderRequest {
            view: markup_key.to_string(),
            markup,
            regions,
        };
        let report = self
            .inner
            .swap
            .lock()
            .swap(request)
            .map_err(|err| NavigationError::callback("swap", err))?;
        self.shared().context.regions = slots;

        for (region, handle) in &report.bound {
            self.inner.hooks.dispatch(
                HookEvent::UIBind,
                Some(json!({ "region": region, "handle": handle })),
            );
        }
        match screen {
            ActiveScreen::View { view, .. } => notify_regions(&mut **view, report).await?,
            ActiveScreen::Controller { controller, .. } => {
                notify_regions(&mut **controller, report).await?
            }
        }
        self.inner
            .hooks
            .dispatch(HookEvent::RenderingAfter, Some(decision.to_value()));

        let classes = AnimationSelector::resolve(
            &self.inner.config.animation,
            screen.animation(),
            direction,
        );
        self.inner
            .swap
            .lock()
            .toggle_animation(AnimationPhase::Open, &classes);

        let args = &decision.args;
        match screen {
            ActiveScreen::View { view, .. } => {
                enter_view(&mut **view, args, direction).await?;
            }
            ActiveScreen::Controller {
                action,
                controller,
                view,
                ..
            } => {
                controller
                    .action(action, args)
                    .await
                    .map_err(|err| NavigationError::callback("action", err))?;
                if let Some(view) = view {
                    view.handle(args)
                        .await
                        .map_err(|err| NavigationError::callback("handle", err))?;
                }
            }
        }
        Ok(())
    }

    /// Markup for a screen, passed through the `SetRenderContent` hook
    fn markup_for(&self, screen: &ActiveScreen, markup_key: &str) -> String {
        let markup = self
            .inner
            .registry
            .markup_for(markup_key)
            .map(str::to_string)
            .or_else(|| match screen {
                ActiveScreen::View { view, .. } => view.markup(),
                ActiveScreen::Controller {
                    controller, view, ..
                } => controller
                    .markup()
                    .or_else(|| view.as_ref().and_then(|view| view.markup())),
            })
            .unwrap_or_default();
        self.filter_markup(markup)
    }

    fn filter_markup(&self, markup: String) -> String {
        match self
            .inner
            .hooks
            .dispatch(HookEvent::SetRenderContent, Some(Value::String(markup.clone())))
        {
            Some(Value::String(filtered)) => filtered,
            _ => markup,
        }
    }

    /// Put the outgoing screen back and undo the history change
    fn restore(&self, previous: Option<ActiveScreen>, rollback: Rollback) {
        let mut shared = self.shared();
        shared.context.active = previous;
        rollback.apply(&mut shared.history);
    }

    async fn pause(&self) {
        let delay = self.inner.config.delay();
        if !delay.is_zero() {
            self.inner.platform.sleep(delay).await;
        }
    }

    // ========================================================================
    // Stacked views
    // ========================================================================

    /// Show a view as a layer over the current content
    pub(crate) async fn open_layer(
        &self,
        view_name: &str,
        decision: &DecisionRoute,
        payload: Option<Value>,
    ) -> Result<Box<dyn View>, NavigationError> {
        let ctx = ScreenContext::new(decision.address.clone(), decision.args.clone(), payload);
        let mut view = self.inner.registry.build_view(view_name, &ctx)?;

        self.layer_animation(AnimationPhase::Close, NavigationDirection::Forward);
        self.pause().await;

        let markup = self
            .inner
            .registry
            .markup_for(view_name)
            .map(str::to_string)
            .or_else(|| view.markup())
            .unwrap_or_default();
        let markup = self.filter_markup(markup);
        self.inner
            .swap
            .lock()
            .push_layer(view_name, &markup)
            .map_err(|err| NavigationError::callback("push_layer", err))?;
        self.inner
            .hooks
            .dispatch(HookEvent::UIAppend, Some(json!({ "view": view_name })));

        self.layer_animation(AnimationPhase::Open, NavigationDirection::Forward);
        if let Err(err) = view.handle(&decision.args).await {
            if let Err(pop_err) = self.inner.swap.lock().pop_layer() {
                warn_log!("Failed to remove stacked layer '{}': {}", view_name, pop_err);
            }
            return Err(NavigationError::callback("handle", err));
        }
        Ok(view)
    }

    /// Remove the stacked layer and resolve the waiting `stack` call
    pub(crate) async fn close_stack(&self, result: Option<Value>) -> Result<(), NavigationError> {
        let Some(mut pending) = self.shared().pending.take() else {
            return Ok(());
        };
        self.inner
            .hooks
            .dispatch(HookEvent::TransitionStackClose, result.clone());

        self.layer_animation(AnimationPhase::Close, NavigationDirection::Back);
        self.pause().await;
        self.inner
            .swap
            .lock()
            .pop_layer()
            .map_err(|err| NavigationError::callback("pop_layer", err))?;
        self.layer_animation(AnimationPhase::Open, NavigationDirection::Back);

        let value = match result {
            Some(value) => Some(value),
            None => pending
                .view
                .stack_closed()
                .await
                .map_err(|err| NavigationError::callback("stack_closed", err))?,
        };
        debug_log!("Closed stacked view");
        // The stacking call may have been dropped already.
        let _ = pending.sender.send(value);
        Ok(())
    }

    fn layer_animation(&self, phase: AnimationPhase, direction: NavigationDirection) {
        let classes = AnimationSelector::resolve(&self.inner.config.animation, None, direction);
        self.inner.swap.lock().toggle_animation(phase, &classes);
    }
}

async fn leave(
    screen: &mut ActiveScreen,
    direction: NavigationDirection,
) -> Result<LeaveDecision, NavigationError> {
    let back = direction == NavigationDirection::Back;
    let decision = match screen {
        ActiveScreen::View { view, .. } => {
            let first = view.leave().await;
            match first {
                Ok(LeaveDecision::Continue) if back => view.leave_back().await,
                Ok(LeaveDecision::Continue) => view.leave_next().await,
                other => other,
            }
        }
        ActiveScreen::Controller {
            action, controller, ..
        } => {
            let first = controller.leave(action).await;
            match first {
                Ok(LeaveDecision::Continue) if back => controller.leave_back(action).await,
                Ok(LeaveDecision::Continue) => controller.leave_next(action).await,
                other => other,
            }
        }
    };
    decision.map_err(|err| NavigationError::callback("leave", err))
}

async fn enter_view(
    view: &mut dyn View,
    args: &crate::params::RouteArgs,
    direction: NavigationDirection,
) -> Result<(), NavigationError> {
    let wrap = |phase: &'static str| move |err: BoxError| NavigationError::callback(phase, err);

    view.render_before(args).await.map_err(wrap("render_before"))?;
    if direction == NavigationDirection::Back {
        view.back(args).await.map_err(wrap("back"))?;
    } else {
        view.next(args).await.map_err(wrap("next"))?;
    }
    view.handle(args).await.map_err(wrap("handle"))?;
    view.render_after(args).await.map_err(wrap("render_after"))?;
    Ok(())
}

async fn notify_regions<L: Layout + ?Sized>(
    layout: &mut L,
    report: SwapReport,
) -> Result<(), NavigationError> {
    for (region, bound) in report.bound {
        trace_log!("Region {} bound", region);
        let changed = match region {
            Region::Template => layout.template_changed(bound).await,
            Region::Head => layout.head_changed(bound).await,
            Region::Header => layout.header_changed(bound).await,
            Region::Footer => layout.footer_changed(bound).await,
        };
        changed.map_err(|err| NavigationError::callback("region", err))?;
    }
    Ok(())
}
