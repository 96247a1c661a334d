//! Visual-novel style dialogue screen
//!
//! The active dialogue file is revealed one character at a time. Any of the
//! three choice keys moves the story on; on a middle level the key picked
//! chooses the branch detour.

use crate::assets::AssetPaths;
use crate::config::PlayConfig;
use crate::dialogue::{Branch, DialogueSession};
use crate::foundation::math::UVec2;
use crate::input::{Button, InputEvent, KeyCode};
use crate::render::TextBackend;
use crate::text::{FontBackend, FontFace, PenPosition, TextOverlay};

use super::{report_overflow, Frame, Mode, ModeError};

/// Typewriter dialogue mode
pub struct DialogueMode<F: FontBackend = FontFace> {
    text: TextOverlay<F>,
    session: DialogueSession,
    choice_keys: [KeyCode; 3],
    choices: [Button; 3],
    origin: PenPosition,
    indent: i32,
    clear_color: [f32; 4],
    overflow_reported: bool,
}

impl DialogueMode<FontFace> {
    /// Build the mode from config, loading the font through the asset resolver
    pub fn from_config(config: &PlayConfig, backend: &mut dyn TextBackend) -> Result<Self, ModeError> {
        let assets = AssetPaths::new(&config.assets.root);
        let face = FontFace::load(assets.resolve(&config.font.path)?, config.font.size_px)?;
        Self::new(face, config, assets, backend)
    }
}

impl<F: FontBackend> DialogueMode<F> {
    /// Build the mode around an already loaded face
    ///
    /// Loads the first level, then creates the text pipeline.
    pub fn new(face: F, config: &PlayConfig, assets: AssetPaths, backend: &mut dyn TextBackend) -> Result<Self, ModeError> {
        let dialogue = &config.dialogue;
        let session = DialogueSession::start(assets, dialogue.levels.clone(), dialogue.reveal_interval)?;
        let text = TextOverlay::new(face, config.font.baseline, config.text.color, backend)?;

        Ok(Self {
            text,
            session,
            choice_keys: dialogue.choice_keys,
            choices: [Button::default(); 3],
            origin: PenPosition::from_array(dialogue.origin),
            indent: dialogue.indent,
            clear_color: config.text.clear_color,
            overflow_reported: false,
        })
    }

    /// Dialogue state
    pub fn session(&self) -> &DialogueSession {
        &self.session
    }

    /// Latched choice buttons, in branch order
    pub fn choices(&self) -> &[Button; 3] {
        &self.choices
    }

    /// First choice pressed since the last update, `A` taking priority
    fn pending_choice(&self) -> Option<Branch> {
        Branch::ALL
            .into_iter()
            .zip(&self.choices)
            .find(|(_, button)| button.was_pressed())
            .map(|(branch, _)| branch)
    }

    fn choice_index(&self, key: KeyCode) -> Option<usize> {
        self.choice_keys.iter().position(|&k| k == key)
    }
}

impl<F: FontBackend> Mode for DialogueMode<F> {
    fn handle_event(&mut self, event: &InputEvent, _window_size: UVec2) -> bool {
        match *event {
            InputEvent::KeyDown(key) => match self.choice_index(key) {
                Some(index) => {
                    self.choices[index].press();
                    true
                }
                None => false,
            },
            InputEvent::KeyUp(key) => match self.choice_index(key) {
                Some(index) => {
                    self.choices[index].release();
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Tick the reveal, take a pending choice, clear the latches
    ///
    /// A choice whose dialogue fails to load is returned as an error; the
    /// screen stays as it was and the latches are still cleared.
    fn update(&mut self, elapsed: f32) -> Result<(), ModeError> {
        let choice = self.pending_choice();
        let result = self.session.update(elapsed, choice);
        for button in &mut self.choices {
            button.clear_downs();
        }

        if let Some(transition) = result? {
            log::debug!("Took {:?}", transition);
            self.overflow_reported = false;
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<(), ModeError> {
        let viewport = frame.drawable_size;
        let backend = frame.backend();
        backend.clear(self.clear_color)?;

        let drawn = self
            .text
            .draw_revealed(
                backend,
                viewport,
                self.session.buffer().lines(),
                self.session.reveal().revealed(),
                self.origin,
                self.indent,
            )
            .map(|stats| log::trace!("Dialogue frame: {:?}", stats));
        report_overflow(drawn, &mut self.overflow_reported)?;
        Ok(())
    }

    fn cleanup(&mut self, backend: &mut dyn TextBackend) {
        self.text.release(backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::Phase;
    use crate::render::SoftwareBackend;
    use crate::text::testing::FakeFont;
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        backend: SoftwareBackend,
        mode: DialogueMode<FakeFont>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let scenes = dir.path().join("scenes");
        fs::create_dir(&scenes).unwrap();
        fs::write(scenes.join("intro"), "abc\nde\n").unwrap();
        fs::write(scenes.join("level_1"), "Pick one.\n").unwrap();
        fs::write(scenes.join("level_1_b"), "You picked B.\n").unwrap();
        fs::write(scenes.join("finish"), "Fin.\n").unwrap();

        let mut config = PlayConfig::default();
        config.assets.root = dir.path().to_path_buf();
        config.dialogue.reveal_interval = 0.03;

        let mut backend = SoftwareBackend::new(640, 480);
        let assets = AssetPaths::new(&config.assets.root);
        let mode = DialogueMode::new(FakeFont::new(), &config, assets, &mut backend).unwrap();
        Fixture {
            _dir: dir,
            backend,
            mode,
        }
    }

    fn press(mode: &mut DialogueMode<FakeFont>, key: KeyCode) {
        let size = UVec2::new(640, 480);
        assert!(mode.handle_event(&InputEvent::KeyDown(key), size));
        assert!(mode.handle_event(&InputEvent::KeyUp(key), size));
    }

    fn draw_calls(f: &mut Fixture) -> u32 {
        f.backend.reset_stats();
        let mut frame = Frame::new(UVec2::new(640, 480), &mut f.backend);
        f.mode.draw(&mut frame).unwrap();
        f.backend.stats().draw_calls
    }

    #[test]
    fn test_reveal_drives_draw_calls() {
        let mut f = fixture();
        assert_eq!(draw_calls(&mut f), 0);

        for _ in 0..4 {
            f.mode.update(0.05).unwrap();
        }
        assert_eq!(f.mode.session().reveal().revealed(), 4);
        assert_eq!(draw_calls(&mut f), 4);

        for _ in 0..10 {
            f.mode.update(0.05).unwrap();
        }
        assert_eq!(draw_calls(&mut f), 5);
    }

    #[test]
    fn test_choice_b_branches_on_middle_level() {
        let mut f = fixture();
        press(&mut f.mode, KeyCode::A);
        f.mode.update(0.01).unwrap();
        assert_eq!(f.mode.session().progression().current_id(), "scenes/level_1");

        f.mode.update(0.05).unwrap();
        press(&mut f.mode, KeyCode::B);
        f.mode.update(0.01).unwrap();

        assert_eq!(f.mode.session().buffer().lines(), &["You picked B."]);
        assert_eq!(f.mode.session().reveal().revealed(), 0);
        assert_eq!(f.mode.session().phase(), Phase::Intermezzo);
    }

    #[test]
    fn test_failed_transition_keeps_screen_and_clears_latches() {
        let mut f = fixture();
        press(&mut f.mode, KeyCode::A);
        f.mode.update(0.0).unwrap();

        press(&mut f.mode, KeyCode::C);
        assert!(matches!(f.mode.update(0.0), Err(ModeError::Dialogue(_))));

        assert_eq!(f.mode.session().buffer().lines(), &["Pick one."]);
        assert!(f.mode.choices().iter().all(|b| b.downs == 0));
        f.mode.update(0.0).unwrap();
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut f = fixture();
        assert!(!f.mode.handle_event(&InputEvent::KeyDown(KeyCode::Z), UVec2::new(640, 480)));
        assert!(!f.mode.handle_event(&InputEvent::MouseMotion { xrel: 1.0, yrel: 0.0 }, UVec2::new(640, 480)));
    }

    #[test]
    fn test_first_choice_wins_when_several_pressed() {
        let mut f = fixture();
        press(&mut f.mode, KeyCode::A);
        f.mode.update(0.0).unwrap();

        press(&mut f.mode, KeyCode::C);
        press(&mut f.mode, KeyCode::B);
        f.mode.update(0.0).unwrap();
        assert_eq!(f.mode.session().buffer().lines(), &["You picked B."]);
    }

    #[test]
    fn test_cleanup_releases_pipeline() {
        let mut f = fixture();
        assert_eq!(f.backend.live_resources(), 4);
        f.mode.cleanup(&mut f.backend);
        assert_eq!(f.backend.live_resources(), 0);
    }
}
