//! Routes and the navigation guard
//!
//! Every user-initiated page change goes through [`NavigationGuard::navigate`].
//! While a game is active the change is held back until the player confirms
//! they want to leave.

use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::storage::KeyValueStore;

/// Named pages of the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Route {
    #[default]
    Home,
    BrickBreaker,
    Memory,
    SignIn,
    SignUp,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::BrickBreaker,
        Route::Memory,
        Route::SignIn,
        Route::SignUp,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::BrickBreaker => "/brick-breaker",
            Route::Memory => "/memory",
            Route::SignIn => "/signin",
            Route::SignUp => "/signup",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    pub fn is_game(&self) -> bool {
        matches!(self, Route::BrickBreaker | Route::Memory)
    }
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The route changed immediately
    Navigated(Route),
    /// A game is running; the target waits for confirmation
    Deferred(Route),
}

/// Holds the current route and the leave-game prompt
#[derive(Debug, Clone, Default)]
pub struct NavigationGuard {
    current: Route,
    prompt_visible: bool,
}

impl NavigationGuard {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            prompt_visible: false,
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn is_prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    /// Route change that bypasses the guard (redirects after sign-in etc.)
    pub fn replace(&mut self, route: Route) {
        self.current = route;
    }

    /// Request a route change
    pub fn navigate<S: KeyValueStore>(
        &mut self,
        session: &mut Session<S>,
        target: Route,
    ) -> NavOutcome {
        if !session.is_game_active() {
            // A prompt left over from an earlier interception no longer applies
            self.prompt_visible = false;
            session.set_pending_navigation(None);
            self.current = target;
            return NavOutcome::Navigated(target);
        }

        log::debug!("Navigation to {} deferred: game in progress", target.path());
        session.set_pending_navigation(Some(target));
        self.prompt_visible = true;
        NavOutcome::Deferred(target)
    }

    /// Leave the game: clear the active flag and go to the deferred target
    pub fn confirm<S: KeyValueStore>(&mut self, session: &mut Session<S>) -> Option<Route> {
        self.prompt_visible = false;
        session.set_game_active(false);
        let target = session.take_pending_navigation()?;
        self.current = target;
        Some(target)
    }

    /// Stay in the game; the deferred target is dropped
    pub fn cancel<S: KeyValueStore>(&mut self, session: &mut Session<S>) {
        self.prompt_visible = false;
        session.set_pending_navigation(None);
    }
}
