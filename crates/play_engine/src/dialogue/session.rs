//! Dialogue screen state: active buffer, reveal timer and progression

use crate::assets::AssetPaths;

use super::buffer::DialogueBuffer;
use super::progression::{Branch, Phase, Progression, Transition};
use super::reveal::RevealState;
use super::DialogueResult;

/// Everything the dialogue mode updates each tick
///
/// A transition only takes effect once its dialogue file has loaded; if the
/// load fails the level and buffer are left as they were.
#[derive(Debug, Clone)]
pub struct DialogueSession {
    assets: AssetPaths,
    progression: Progression,
    reveal: RevealState,
    buffer: DialogueBuffer,
}

impl DialogueSession {
    /// Load the first level and start revealing it
    pub fn start(assets: AssetPaths, levels: Vec<String>, reveal_interval: f32) -> DialogueResult<Self> {
        let progression = Progression::new(levels)?;
        let buffer = load(&assets, progression.current_id())?;
        log::info!("Dialogue started at {} under {}", progression.current_id(), assets.root().display());
        Ok(Self {
            assets,
            progression,
            reveal: RevealState::new(reveal_interval),
            buffer,
        })
    }

    /// Advance the reveal timer, then act on `choice` if there was one
    ///
    /// Returns the transition taken, if any. On a failed load the error is
    /// returned and the level, buffer and reveal count stay as they were
    /// after the tick.
    pub fn update(&mut self, elapsed: f32, choice: Option<Branch>) -> DialogueResult<Option<Transition>> {
        self.reveal.tick(elapsed);

        let planned = choice.and_then(|branch| self.progression.plan(branch));
        let Some(transition) = planned else {
            return Ok(None);
        };

        let id = self.progression.dialogue_id(&transition);
        let buffer = match load(&self.assets, &id) {
            Ok(buffer) => buffer,
            Err(e) => {
                log::warn!("Refusing transition to {}: {}", id, e);
                return Err(e);
            }
        };

        self.progression.commit(transition);
        self.buffer = buffer;
        self.reveal.reset();
        log::info!("Dialogue moved to {} ({:?})", id, self.progression.phase());
        Ok(Some(transition))
    }

    /// Lines of the active screen
    pub fn buffer(&self) -> &DialogueBuffer {
        &self.buffer
    }

    /// Reveal timer
    pub fn reveal(&self) -> &RevealState {
        &self.reveal
    }

    /// Level state
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.progression.phase()
    }
}

fn load(assets: &AssetPaths, id: &str) -> DialogueResult<DialogueBuffer> {
    let path = assets.resolve(id)?;
    DialogueBuffer::load(path)
}
