use crate::domain::SessionStatus;
use crate::use_cases::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Signup,
    ForgotPassword,
    EmailGen,
    EmailRegen,
    History,
}

impl Route {
    /// Unknown paths land on the home page.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" => Route::Home,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            "/forgot-password" => Route::ForgotPassword,
            "/email-gen" => Route::EmailGen,
            "/email-regen" => Route::EmailRegen,
            "/history" => Route::History,
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::ForgotPassword => "/forgot-password",
            Route::EmailGen => "/email-gen",
            Route::EmailRegen => "/email-regen",
            Route::History => "/history",
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::EmailGen | Route::EmailRegen | Route::History)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render(Route),
    // The stored token has not been read yet; redirecting now would bounce a
    // logged-in user to the login page.
    Loading,
    Redirect(Route),
}

pub fn guard(route: Route, session: &SessionContext) -> GuardDecision {
    if !route.requires_auth() {
        return GuardDecision::Render(route);
    }
    if session.status() == SessionStatus::Initializing {
        return GuardDecision::Loading;
    }
    if session.is_logged_in() {
        GuardDecision::Render(route)
    } else {
        tracing::debug!(path = route.path(), "unauthenticated; redirecting to login.");
        GuardDecision::Redirect(Route::Login)
    }
}

pub fn navigate(path: &str, session: &SessionContext) -> GuardDecision {
    let route = Route::from_path(path);
    if route == Route::Home && !path.trim_end_matches('/').is_empty() {
        return GuardDecision::Redirect(Route::Home);
    }
    guard(route, session)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeCardOutcome {
    Navigate(Route),
    PromptLogin,
}

/// Home page service cards: logged-in users go straight to the service,
/// everyone else is asked to log in first.
pub fn home_card(target: Route, session: &SessionContext) -> HomeCardOutcome {
    if session.is_logged_in() {
        HomeCardOutcome::Navigate(target)
    } else {
        HomeCardOutcome::PromptLogin
    }
}
