//! Background music
//!
//! Each mounted game owns one looping track. The controller decides when
//! it should be audible from the settings, the game's pause state and tab
//! visibility; the player only does what it is told.

use crate::settings::Settings;

/// Background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    BrickBreaker,
    Memory,
}

impl Track {
    /// Asset path of the track
    pub fn asset(&self) -> &'static str {
        match self {
            Track::BrickBreaker => "assets/audio/brick-bg.mp3",
            Track::Memory => "assets/audio/memory-bg.mp3",
        }
    }
}

/// Something that can play a single track
pub trait MusicPlayer {
    fn load(&mut self, track: Track);
    fn set_looping(&mut self, looping: bool);
    /// Volume 0.0 - 1.0
    fn set_volume(&mut self, volume: f32);
    fn play(&mut self);
    fn pause(&mut self);
}

/// Player that makes no sound (native builds)
#[derive(Debug, Default)]
pub struct NullPlayer;

impl MusicPlayer for NullPlayer {
    fn load(&mut self, _track: Track) {}
    fn set_looping(&mut self, _looping: bool) {}
    fn set_volume(&mut self, _volume: f32) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
}

/// Drives one game's music
pub struct MusicController {
    player: Box<dyn MusicPlayer>,
    playing: bool,
    hidden: bool,
}

impl std::fmt::Debug for MusicController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicController")
            .field("playing", &self.playing)
            .field("hidden", &self.hidden)
            .finish()
    }
}

impl MusicController {
    /// Load the track looping and start it if sound is on
    pub fn mount(mut player: Box<dyn MusicPlayer>, track: Track, settings: &Settings) -> Self {
        player.load(track);
        player.set_looping(true);
        player.set_volume(settings.effective_volume());

        let mut controller = Self {
            player,
            playing: false,
            hidden: false,
        };
        if settings.sound_enabled {
            controller.start();
        }
        controller
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Re-apply settings and game pause state
    pub fn sync(&mut self, settings: &Settings, game_paused: bool) {
        self.player.set_volume(settings.effective_volume());
        if settings.sound_enabled && !game_paused && !self.hidden {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Tab visibility changed. Hidden always pauses; becoming visible only
    /// resumes when sound is on and the game isn't paused.
    pub fn set_hidden(&mut self, hidden: bool, settings: &Settings, game_paused: bool) {
        self.hidden = hidden;
        if hidden {
            self.stop();
        } else if settings.sound_enabled && !game_paused {
            self.start();
        }
    }

    /// Silence on unmount
    pub fn teardown(&mut self) {
        self.stop();
    }

    fn start(&mut self) {
        if !self.playing {
            self.player.play();
            self.playing = true;
        }
    }

    fn stop(&mut self) {
        // Pausing an already paused element is harmless; always forward it
        self.player.pause();
        self.playing = false;
    }
}

/// `<audio>` element backed player
#[cfg(target_arch = "wasm32")]
pub struct HtmlAudioPlayer {
    element: Option<web_sys::HtmlAudioElement>,
}

#[cfg(target_arch = "wasm32")]
impl HtmlAudioPlayer {
    pub fn new() -> Self {
        Self { element: None }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for HtmlAudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl MusicPlayer for HtmlAudioPlayer {
    fn load(&mut self, track: Track) {
        match web_sys::HtmlAudioElement::new_with_src(track.asset()) {
            Ok(element) => self.element = Some(element),
            Err(e) => log::warn!("Failed to create audio element: {:?}", e),
        }
    }

    fn set_looping(&mut self, looping: bool) {
        if let Some(el) = &self.element {
            el.set_loop(looping);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        if let Some(el) = &self.element {
            el.set_volume(f64::from(volume.clamp(0.0, 1.0)));
        }
    }

    fn play(&mut self) {
        if let Some(el) = &self.element {
            // Autoplay may be refused until the first user gesture
            if let Err(e) = el.play() {
                log::debug!("Music play refused: {:?}", e);
            }
        }
    }

    fn pause(&mut self) {
        if let Some(el) = &self.element {
            let _ = el.pause();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        Load(Track),
        Looping(bool),
        Volume(f32),
        Play,
        Pause,
    }

    /// Player that records every call into a shared log
    #[derive(Debug, Default, Clone)]
    pub(crate) struct RecordingPlayer {
        pub(crate) calls: Rc<RefCell<Vec<Call>>>,
    }

    impl RecordingPlayer {
        pub(crate) fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.borrow_mut())
        }
    }

    impl MusicPlayer for RecordingPlayer {
        fn load(&mut self, track: Track) {
            self.calls.borrow_mut().push(Call::Load(track));
        }
        fn set_looping(&mut self, looping: bool) {
            self.calls.borrow_mut().push(Call::Looping(looping));
        }
        fn set_volume(&mut self, volume: f32) {
            self.calls.borrow_mut().push(Call::Volume(volume));
        }
        fn play(&mut self) {
            self.calls.borrow_mut().push(Call::Play);
        }
        fn pause(&mut self) {
            self.calls.borrow_mut().push(Call::Pause);
        }
    }

    #[test]
    fn test_mount_starts_looping_track() {
        let player = RecordingPlayer::default();
        let controller =
            MusicController::mount(Box::new(player.clone()), Track::Memory, &Settings::default());
        assert!(controller.is_playing());
        assert_eq!(
            player.take(),
            vec![
                Call::Load(Track::Memory),
                Call::Looping(true),
                Call::Volume(0.7),
                Call::Play
            ]
        );
    }

    #[test]
    fn test_mount_silent_when_sound_disabled() {
        let player = RecordingPlayer::default();
        let settings = Settings {
            sound_enabled: false,
            ..Settings::default()
        };
        let controller =
            MusicController::mount(Box::new(player.clone()), Track::BrickBreaker, &settings);
        assert!(!controller.is_playing());
        assert!(!player.take().contains(&Call::Play));
    }

    #[test]
    fn test_game_pause_silences() {
        let player = RecordingPlayer::default();
        let settings = Settings::default();
        let mut controller =
            MusicController::mount(Box::new(player.clone()), Track::BrickBreaker, &settings);
        player.take();

        controller.sync(&settings, true);
        assert!(!controller.is_playing());
        assert_eq!(player.take(), vec![Call::Volume(0.7), Call::Pause]);

        controller.sync(&settings, false);
        assert!(controller.is_playing());
        assert_eq!(player.take(), vec![Call::Volume(0.7), Call::Play]);
    }

    #[test]
    fn test_visibility() {
        let player = RecordingPlayer::default();
        let settings = Settings::default();
        let mut controller =
            MusicController::mount(Box::new(player.clone()), Track::Memory, &settings);
        player.take();

        controller.set_hidden(true, &settings, false);
        assert!(!controller.is_playing());

        // Visible again but the game is paused: stay quiet
        controller.set_hidden(false, &settings, true);
        assert!(!controller.is_playing());

        controller.set_hidden(true, &settings, false);
        controller.set_hidden(false, &settings, false);
        assert!(controller.is_playing());
        assert_eq!(player.take().last(), Some(&Call::Play));

        // Settings sync while hidden never starts playback
        controller.set_hidden(true, &settings, false);
        controller.sync(&settings, false);
        assert!(!controller.is_playing());
    }

    #[test]
    fn test_teardown_pauses() {
        let player = RecordingPlayer::default();
        let mut controller =
            MusicController::mount(Box::new(player.clone()), Track::Memory, &Settings::default());
        player.take();
        controller.teardown();
        assert_eq!(player.take(), vec![Call::Pause]);
        assert!(!controller.is_playing());
    }
}
