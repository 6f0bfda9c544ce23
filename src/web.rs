//! Browser bindings
//!
//! `WebPortal` is what the page script talks to. It owns a [`Portal`]
//! backed by `localStorage` and `<audio>` elements, drives it from
//! `requestAnimationFrame`, and forwards arrow keys and tab visibility.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::audio::{HtmlAudioPlayer, MusicPlayer};
use crate::auth::SignUpForm;
use crate::nav::{NavOutcome, Route};
use crate::portal::{ActiveGame, Portal};
use crate::settings::{SettingsUpdate, Theme};
use crate::sim::PaddleMove;
use crate::storage::LocalStorage;

type Shared = Rc<RefCell<Portal<LocalStorage>>>;

/// Logging and panic hook; safe to call more than once
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialised");
    }
}

#[wasm_bindgen]
pub struct WebPortal {
    inner: Shared,
}

#[wasm_bindgen]
impl WebPortal {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebPortal {
        init();
        let seed = js_sys::Date::now() as u64;
        let portal = Portal::with_player(
            LocalStorage::new(),
            seed,
            Box::new(|| Box::new(HtmlAudioPlayer::new()) as Box<dyn MusicPlayer>),
        );
        apply_theme(portal.session().settings().theme);
        log::info!("Game portal starting (seed {})", seed);

        let inner = Rc::new(RefCell::new(portal));
        install_listeners(&inner);
        request_animation_frame(inner.clone(), None);
        WebPortal { inner }
    }

    /// Current path
    pub fn route(&self) -> String {
        self.inner.borrow().route().path().to_string()
    }

    /// Returns true if the page changed, false if it was deferred or unknown
    pub fn navigate(&self, path: &str) -> bool {
        let Some(route) = Route::from_path(path) else {
            log::warn!("Unknown route {}", path);
            return false;
        };
        matches!(
            self.inner.borrow_mut().navigate(route),
            NavOutcome::Navigated(_)
        )
    }

    #[wasm_bindgen(js_name = isPromptVisible)]
    pub fn is_prompt_visible(&self) -> bool {
        self.inner.borrow().is_prompt_visible()
    }

    #[wasm_bindgen(js_name = confirmLeave)]
    pub fn confirm_leave(&self) -> Option<String> {
        self.inner
            .borrow_mut()
            .confirm_leave()
            .map(|r| r.path().to_string())
    }

    #[wasm_bindgen(js_name = cancelLeave)]
    pub fn cancel_leave(&self) {
        self.inner.borrow_mut().cancel_leave();
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&self) {
        self.inner.borrow_mut().update_game(ActiveGame::toggle_pause);
    }

    pub fn reset(&self) {
        self.inner.borrow_mut().update_game(ActiveGame::reset);
    }

    /// Brick Breaker speed; returns the value actually applied
    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&self, multiplier: f32) -> Option<f32> {
        self.inner
            .borrow_mut()
            .update_game(|g| match g {
                ActiveGame::Breaker(b) => Some(b.set_speed(multiplier)),
                ActiveGame::Memory(_) => None,
            })
            .flatten()
    }

    #[wasm_bindgen(js_name = pickCard)]
    pub fn pick_card(&self, position: usize) {
        self.inner.borrow_mut().update_game(|g| {
            if let ActiveGame::Memory(m) = g {
                m.pick_card(position);
            }
        });
    }

    /// JSON snapshot of the mounted game, or null on non-game pages
    pub fn snapshot(&self) -> Option<String> {
        let portal = self.inner.borrow();
        let json = match portal.game()? {
            ActiveGame::Breaker(b) => serde_json::to_string(&b.snapshot()),
            ActiveGame::Memory(m) => serde_json::to_string(&m.snapshot()),
        };
        json.map_err(|e| log::warn!("Failed to encode snapshot: {}", e))
            .ok()
    }

    /// Finished-game message, if any
    #[wasm_bindgen(js_name = resultText)]
    pub fn result_text(&self) -> Option<String> {
        match self.inner.borrow().game()? {
            ActiveGame::Breaker(b) => b.outcome().map(|o| o.message().to_string()),
            ActiveGame::Memory(m) => m.is_finished().then(|| m.result_text()),
        }
    }

    #[wasm_bindgen(js_name = displayName)]
    pub fn display_name(&self) -> String {
        self.inner.borrow().session().display_name().to_string()
    }

    #[wasm_bindgen(js_name = isAuthenticated)]
    pub fn is_authenticated(&self) -> bool {
        self.inner.borrow().session().is_authenticated()
    }

    #[wasm_bindgen(js_name = setNickname)]
    pub fn set_nickname(&self, nickname: String) {
        self.inner.borrow_mut().set_nickname(nickname);
    }

    /// Returns the landing path; the error is the message to show
    #[wasm_bindgen(js_name = signIn)]
    pub fn sign_in(
        &self,
        email: &str,
        password: &str,
        from: Option<String>,
    ) -> Result<String, JsValue> {
        let from = from.as_deref().and_then(Route::from_path);
        self.inner
            .borrow_mut()
            .sign_in(email, password, from)
            .map(|r| r.path().to_string())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Returns the email to prefill on the sign-in page
    #[wasm_bindgen(js_name = signUp)]
    pub fn sign_up(
        &self,
        username: String,
        email: String,
        password: String,
        from: Option<String>,
    ) -> Result<String, JsValue> {
        let form = SignUpForm {
            username,
            email,
            password,
        };
        let from = from.as_deref().and_then(Route::from_path);
        self.inner
            .borrow_mut()
            .sign_up(&form, from)
            .map(|r| r.prefill_email)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn logout(&self) {
        self.inner.borrow_mut().logout();
    }

    /// Settings as stored JSON
    pub fn settings(&self) -> String {
        serde_json::to_string(self.inner.borrow().session().settings()).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = setSoundEnabled)]
    pub fn set_sound_enabled(&self, enabled: bool) {
        self.inner.borrow_mut().update_settings(&SettingsUpdate {
            sound_enabled: Some(enabled),
            ..Default::default()
        });
    }

    /// Music volume as a whole percentage for the settings slider
    #[wasm_bindgen(js_name = volumePercent)]
    pub fn volume_percent(&self) -> u32 {
        self.inner.borrow().session().settings().volume_percent()
    }

    #[wasm_bindgen(js_name = setMusicVolume)]
    pub fn set_music_volume(&self, volume: f32) {
        self.inner.borrow_mut().update_settings(&SettingsUpdate {
            music_volume: Some(volume),
            ..Default::default()
        });
    }

    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) {
        let mut portal = self.inner.borrow_mut();
        portal.toggle_theme();
        apply_theme(portal.session().settings().theme);
    }
}

impl Default for WebPortal {
    fn default() -> Self {
        Self::new()
    }
}

/// Swap the theme class on `<body>`
fn apply_theme(theme: Theme) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    let classes = body.class_list();
    let _ = classes.remove_2(Theme::Light.body_class(), Theme::Dark.body_class());
    let _ = classes.add_1(theme.body_class());
}

fn install_listeners(portal: &Shared) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("No document; input and visibility are not wired");
        return;
    };

    // Arrow keys steer the paddle
    {
        let portal = portal.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mv = match event.key().as_str() {
                "ArrowLeft" => PaddleMove::Left,
                "ArrowRight" => PaddleMove::Right,
                _ => return,
            };
            portal.borrow_mut().update_game(|g| {
                if let ActiveGame::Breaker(b) = g {
                    b.move_paddle(mv);
                }
            });
        });
        let _ = document
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Hidden tab suspends the mounted game and its music
    {
        let portal = portal.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = doc.visibility_state() == web_sys::VisibilityState::Hidden;
            portal.borrow_mut().set_visibility(hidden);
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }
}

fn request_animation_frame(portal: Shared, last_time: Option<f64>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        // Whole-millisecond timestamps so no fraction is lost between frames
        let time = time.floor();
        let elapsed_ms = last_time.map_or(0.0, |last| (time - last).max(0.0));
        portal.borrow_mut().advance(elapsed_ms as u32);
        request_animation_frame(portal, Some(time));
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}
