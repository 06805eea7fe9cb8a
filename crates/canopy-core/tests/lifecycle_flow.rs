//! Integration tests for the application lifecycle context.

use std::sync::Arc;

use canopy_core::{
    ActivationState, AppLifecycle, ApplicationState, BackgroundReason, CloseAuthorization,
    SystemNavigation,
};
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Activated(ActivationState),
    Suspending,
    EnteredBackground(BackgroundReason),
    LeavingBackground,
    Continuation,
}

fn record(app: &AppLifecycle) -> Arc<Mutex<Vec<Seen>>> {
    let log = Arc::new(Mutex::new(Vec::new()));

    let l = log.clone();
    app.activated().connect(move |state| l.lock().push(Seen::Activated(*state)));
    let l = log.clone();
    app.suspending().connect(move |_| l.lock().push(Seen::Suspending));
    let l = log.clone();
    app.entered_background()
        .connect(move |args| l.lock().push(Seen::EnteredBackground(args.reason)));
    let l = log.clone();
    app.leaving_background()
        .connect(move |_| l.lock().push(Seen::LeavingBackground));

    log
}

#[test]
fn test_full_background_round_trip_order() {
    let app = AppLifecycle::new();
    let log = record(&app);

    app.raise_activated(ActivationState::PointerActivated);
    app.raise_entered_background(BackgroundReason::Minimized);
    assert_eq!(app.state(), ApplicationState::Background);

    let l = log.clone();
    app.raise_leaving_background(Box::new(move || l.lock().push(Seen::Continuation)));
    assert_eq!(app.state(), ApplicationState::Foreground);

    assert_eq!(
        *log.lock(),
        vec![
            Seen::Activated(ActivationState::PointerActivated),
            Seen::EnteredBackground(BackgroundReason::Minimized),
            Seen::LeavingBackground,
            Seen::Continuation,
        ]
    );
}

#[test]
fn test_close_negotiation_then_suspend() {
    let app = AppLifecycle::new();
    let log = record(&app);
    let navigation = SystemNavigation::new();

    let veto = navigation.close_requested().connect(|args| args.set_handled(true));
    if navigation.has_confirmed_close() || navigation.request_app_close() {
        app.raise_suspending();
    }
    assert!(log.lock().is_empty());

    navigation.close_requested().disconnect(veto);
    if navigation.has_confirmed_close() || navigation.request_app_close() {
        app.raise_suspending();
    }
    assert_eq!(*log.lock(), vec![Seen::Suspending]);
    assert_eq!(app.state(), ApplicationState::Suspending);
}
