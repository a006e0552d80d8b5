use super::*;

const LOADING: SessionSnapshot = SessionSnapshot {
    is_loading: true,
    is_authenticated: false,
};

const ANONYMOUS: SessionSnapshot = SessionSnapshot {
    is_loading: false,
    is_authenticated: false,
};

const SIGNED_IN: SessionSnapshot = SessionSnapshot {
    is_loading: false,
    is_authenticated: true,
};

// =========================================================
// Flag off
// =========================================================

#[test]
fn flag_off_renders_children_for_any_session_state() {
    let mut guard = RouteGuard::new();

    for session in [LOADING, ANONYMOUS, SIGNED_IN] {
        assert_eq!(
            guard.evaluate(false, session, "/dashboard"),
            GuardOutcome::RenderChildren
        );
        assert_eq!(guard.state(), GuardState::AuthNotRequired);
    }
}

#[test]
fn flag_off_never_redirects_across_re_renders() {
    let mut guard = RouteGuard::new();

    for _ in 0..10 {
        assert_eq!(
            guard.evaluate(false, ANONYMOUS, "/tasks"),
            GuardOutcome::RenderChildren
        );
    }
}

// =========================================================
// Loading
// =========================================================

#[test]
fn loading_session_defers_the_redirect_decision() {
    let mut guard = RouteGuard::new();

    assert_eq!(
        guard.evaluate(true, LOADING, "/dashboard"),
        GuardOutcome::Placeholder
    );
    assert_eq!(guard.state(), GuardState::Loading);
}

#[test]
fn load_complete_authenticated_renders_children() {
    let mut guard = RouteGuard::new();

    guard.evaluate(true, LOADING, "/dashboard");
    assert_eq!(
        guard.evaluate(true, SIGNED_IN, "/dashboard"),
        GuardOutcome::RenderChildren
    );
    assert_eq!(guard.state(), GuardState::Authenticated);
}

// =========================================================
// Redirect-once-per-location
// =========================================================

#[test]
fn unauthenticated_redirects_exactly_once_per_location() {
    let mut guard = RouteGuard::new();

    assert_eq!(
        guard.evaluate(true, ANONYMOUS, "/properties/42"),
        GuardOutcome::Navigate {
            from: "/properties/42".to_string()
        }
    );
    assert_eq!(guard.state(), GuardState::Redirecting);

    // Any number of re-renders at the same location: no further navigation
    for _ in 0..10 {
        assert_eq!(
            guard.evaluate(true, ANONYMOUS, "/properties/42"),
            GuardOutcome::Placeholder
        );
    }
}

#[test]
fn location_change_resets_redirect_suppression() {
    let mut guard = RouteGuard::new();

    guard.evaluate(true, ANONYMOUS, "/tasks");
    assert_eq!(
        guard.evaluate(true, ANONYMOUS, "/tasks"),
        GuardOutcome::Placeholder
    );

    assert_eq!(
        guard.evaluate(true, ANONYMOUS, "/viewings"),
        GuardOutcome::Navigate {
            from: "/viewings".to_string()
        }
    );
}

#[test]
fn loading_auth_flap_emits_at_most_one_navigation() {
    let mut guard = RouteGuard::new();
    let mut navigations = 0;

    // Loading flaps interleaved with resolved-anonymous evaluations
    for round in 0..6 {
        let session = if round % 2 == 0 { LOADING } else { ANONYMOUS };
        if let GuardOutcome::Navigate { .. } = guard.evaluate(true, session, "/dashboard") {
            navigations += 1;
        }
    }

    assert_eq!(navigations, 1);
}

#[test]
fn successful_login_clears_suppression_for_later_logout() {
    let mut guard = RouteGuard::new();

    guard.evaluate(true, ANONYMOUS, "/tasks");
    assert_eq!(
        guard.evaluate(true, SIGNED_IN, "/tasks"),
        GuardOutcome::RenderChildren
    );

    // Session expires again at the same location: a fresh redirect is due
    assert_eq!(
        guard.evaluate(true, ANONYMOUS, "/tasks"),
        GuardOutcome::Navigate {
            from: "/tasks".to_string()
        }
    );
}

// =========================================================
// Flag change
// =========================================================

#[test]
fn flag_change_recomputes_from_loading() {
    let mut guard = RouteGuard::new();

    guard.evaluate(true, ANONYMOUS, "/tasks");
    assert_eq!(guard.state(), GuardState::Redirecting);

    guard.on_flag_changed();
    assert_eq!(guard.state(), GuardState::Loading);

    // Suppression was cleared: turning the flag back on redirects anew
    assert_eq!(
        guard.evaluate(true, ANONYMOUS, "/tasks"),
        GuardOutcome::Navigate {
            from: "/tasks".to_string()
        }
    );
}

#[test]
fn flag_turned_off_mid_flight_renders_children() {
    let mut guard = RouteGuard::new();

    guard.evaluate(true, ANONYMOUS, "/tasks");
    guard.on_flag_changed();
    assert_eq!(
        guard.evaluate(false, ANONYMOUS, "/tasks"),
        GuardOutcome::RenderChildren
    );
    assert_eq!(guard.state(), GuardState::AuthNotRequired);
}
