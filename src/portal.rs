//! Application context
//!
//! `Portal` owns the session, the navigation guard and whichever game is
//! mounted on the current route. Every engine mutation goes through
//! [`Portal::update_game`] or [`Portal::advance`] so the session's
//! game-active flag is re-synced in the same call that changed the engine.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{MusicController, MusicPlayer, NullPlayer, Track};
use crate::auth::{self, AuthError, SignUpForm, SignUpRedirect};
use crate::memory::{MemoryMatch, Resolution};
use crate::nav::{NavOutcome, NavigationGuard, Route};
use crate::session::Session;
use crate::settings::SettingsUpdate;
use crate::sim::{BreakerEvent, BrickBreaker};
use crate::storage::KeyValueStore;

/// The engine mounted on a game route
#[derive(Debug, Clone)]
pub enum ActiveGame {
    Breaker(BrickBreaker),
    Memory(MemoryMatch),
}

impl ActiveGame {
    pub fn route(&self) -> Route {
        match self {
            ActiveGame::Breaker(_) => Route::BrickBreaker,
            ActiveGame::Memory(_) => Route::Memory,
        }
    }

    pub fn track(&self) -> Track {
        match self {
            ActiveGame::Breaker(_) => Track::BrickBreaker,
            ActiveGame::Memory(_) => Track::Memory,
        }
    }

    /// Mounted and not finished
    pub fn is_active(&self) -> bool {
        match self {
            ActiveGame::Breaker(g) => g.is_active(),
            ActiveGame::Memory(g) => g.is_active(),
        }
    }

    pub fn is_paused(&self) -> bool {
        match self {
            ActiveGame::Breaker(g) => g.is_paused(),
            ActiveGame::Memory(g) => g.is_paused(),
        }
    }

    pub fn toggle_pause(&mut self) {
        match self {
            ActiveGame::Breaker(g) => g.toggle_pause(),
            ActiveGame::Memory(g) => g.toggle_pause(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            ActiveGame::Breaker(g) => g.reset(),
            ActiveGame::Memory(g) => g.reset(),
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            ActiveGame::Breaker(g) => g.score(),
            ActiveGame::Memory(g) => g.score(),
        }
    }

    pub fn elapsed_secs(&self) -> u32 {
        match self {
            ActiveGame::Breaker(g) => g.elapsed_secs(),
            ActiveGame::Memory(g) => g.elapsed_secs(),
        }
    }

    fn stop(&mut self) {
        match self {
            ActiveGame::Breaker(g) => g.stop(),
            ActiveGame::Memory(g) => g.stop(),
        }
    }

    fn suspend(&mut self) {
        match self {
            ActiveGame::Breaker(g) => g.suspend(),
            ActiveGame::Memory(g) => g.suspend(),
        }
    }

    fn unsuspend(&mut self) {
        match self {
            ActiveGame::Breaker(g) => g.unsuspend(),
            ActiveGame::Memory(g) => g.unsuspend(),
        }
    }
}

/// What happened during one host frame
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FrameEvents {
    /// No game mounted
    #[default]
    Idle,
    Breaker(Vec<BreakerEvent>),
    Memory(Option<Resolution>),
}

struct Mounted {
    game: ActiveGame,
    music: MusicController,
}

type PlayerFactory = Box<dyn FnMut() -> Box<dyn MusicPlayer>>;

pub struct Portal<S: KeyValueStore> {
    session: Session<S>,
    guard: NavigationGuard,
    mounted: Option<Mounted>,
    new_player: PlayerFactory,
    rng: Pcg32,
    hidden: bool,
    /// Next frame only re-establishes the host's time baseline
    rebase_frame: bool,
}

impl<S: KeyValueStore> std::fmt::Debug for Portal<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portal")
            .field("route", &self.guard.current())
            .field("game", &self.mounted.as_ref().map(|m| m.game.route()))
            .field("hidden", &self.hidden)
            .finish()
    }
}

impl<S: KeyValueStore> Portal<S> {
    /// Silent portal on the home page
    pub fn new(store: S, seed: u64) -> Self {
        Self::with_player(
            store,
            seed,
            Box::new(|| Box::new(NullPlayer) as Box<dyn MusicPlayer>),
        )
    }

    /// `new_player` is called once per mounted game
    pub fn with_player(store: S, seed: u64, new_player: PlayerFactory) -> Self {
        Self {
            session: Session::load(store),
            guard: NavigationGuard::new(Route::Home),
            mounted: None,
            new_player,
            rng: Pcg32::seed_from_u64(seed),
            hidden: false,
            rebase_frame: false,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn route(&self) -> Route {
        self.guard.current()
    }

    pub fn is_prompt_visible(&self) -> bool {
        self.guard.is_prompt_visible()
    }

    pub fn game(&self) -> Option<&ActiveGame> {
        self.mounted.as_ref().map(|m| &m.game)
    }

    pub fn is_music_playing(&self) -> bool {
        self.mounted.as_ref().is_some_and(|m| m.music.is_playing())
    }

    /// User-initiated navigation, subject to the guard
    pub fn navigate(&mut self, target: Route) -> NavOutcome {
        let outcome = self.guard.navigate(&mut self.session, target);
        if let NavOutcome::Navigated(route) = outcome {
            self.enter(route);
        }
        outcome
    }

    /// Leave the running game for the deferred target
    pub fn confirm_leave(&mut self) -> Option<Route> {
        let Some(target) = self.guard.confirm(&mut self.session) else {
            // Nothing was deferred; the mounted game keeps its flag
            self.sync_game_flag();
            return None;
        };
        self.enter(target);
        Some(target)
    }

    /// Stay in the game
    pub fn cancel_leave(&mut self) {
        self.guard.cancel(&mut self.session);
    }

    /// Feed a host frame into the mounted engine
    pub fn advance(&mut self, elapsed_ms: u32) -> FrameEvents {
        // The first frame after the page returns spans the whole hidden interval
        let elapsed_ms = if std::mem::take(&mut self.rebase_frame) {
            0
        } else {
            elapsed_ms
        };
        let Some(mounted) = self.mounted.as_mut() else {
            return FrameEvents::Idle;
        };
        let events = match &mut mounted.game {
            ActiveGame::Breaker(g) => FrameEvents::Breaker(g.advance(elapsed_ms)),
            ActiveGame::Memory(g) => FrameEvents::Memory(g.advance(elapsed_ms)),
        };
        self.sync_game_flag();
        events
    }

    /// Run a player action against the mounted engine, then re-sync the
    /// game-active flag and the music. `None` when no game is mounted.
    pub fn update_game<R>(&mut self, f: impl FnOnce(&mut ActiveGame) -> R) -> Option<R> {
        let mounted = self.mounted.as_mut()?;
        let result = f(&mut mounted.game);
        mounted
            .music
            .sync(self.session.settings(), mounted.game.is_paused());
        self.sync_game_flag();
        Some(result)
    }

    pub fn update_settings(&mut self, update: &SettingsUpdate) {
        self.session.update_settings(update);
        self.sync_music();
    }

    pub fn toggle_theme(&mut self) {
        self.session.toggle_theme();
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.session.set_nickname(nickname);
    }

    /// Tab hidden: suspend the engine's clocks and silence the music
    pub fn set_visibility(&mut self, hidden: bool) {
        if self.hidden == hidden {
            return;
        }
        self.hidden = hidden;
        self.rebase_frame = !hidden;
        let settings = self.session.settings();
        if let Some(mounted) = self.mounted.as_mut() {
            if hidden {
                mounted.game.suspend();
            } else {
                mounted.game.unsuspend();
            }
            mounted
                .music
                .set_hidden(hidden, settings, mounted.game.is_paused());
        }
        log::debug!("Page {}", if hidden { "hidden" } else { "visible" });
    }

    pub fn sign_up(
        &mut self,
        form: &SignUpForm,
        from: Option<Route>,
    ) -> Result<SignUpRedirect, AuthError> {
        let redirect = auth::sign_up(self.session.store_mut(), form, from)?;
        self.redirect(redirect.to);
        Ok(redirect)
    }

    pub fn sign_in(
        &mut self,
        email: &str,
        password: &str,
        from: Option<Route>,
    ) -> Result<Route, AuthError> {
        let landing = auth::sign_in(&mut self.session, email, password, from)?;
        self.redirect(landing);
        Ok(landing)
    }

    pub fn logout(&mut self) {
        self.unmount();
        self.session.logout();
        self.redirect(Route::Home);
    }

    /// Programmatic navigation that skips the guard
    fn redirect(&mut self, route: Route) {
        self.guard.replace(route);
        self.enter(route);
    }

    fn enter(&mut self, route: Route) {
        self.unmount();
        let mut game = match route {
            Route::BrickBreaker => ActiveGame::Breaker(BrickBreaker::new()),
            Route::Memory => ActiveGame::Memory(MemoryMatch::new(self.rng.random())),
            _ => return,
        };

        let player = (self.new_player)();
        let mut music = MusicController::mount(player, game.track(), self.session.settings());
        if self.hidden {
            game.suspend();
            music.set_hidden(true, self.session.settings(), false);
        }

        log::info!("Mounted {}", route.path());
        self.mounted = Some(Mounted { game, music });
        self.sync_game_flag();
    }

    fn unmount(&mut self) {
        if let Some(mut mounted) = self.mounted.take() {
            mounted.game.stop();
            mounted.music.teardown();
            log::info!("Unmounted {}", mounted.game.route().path());
        }
        self.session.set_game_active(false);
    }

    fn sync_game_flag(&mut self) {
        let active = self.mounted.as_ref().is_some_and(|m| m.game.is_active());
        self.session.set_game_active(active);
    }

    fn sync_music(&mut self) {
        let settings = self.session.settings();
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.music.sync(settings, mounted.game.is_paused());
        }
    }
}
