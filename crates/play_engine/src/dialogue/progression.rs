//! Level progression with one-shot choice detours
//!
//! Levels are played in order. On any level strictly between the first and
//! the last, the first choice the player makes detours into a branch screen
//! (`<level>_a`, `<level>_b` or `<level>_c`); the next choice leaves the
//! detour for the following level. The last level is terminal.
//!
//! Transitions are two-step: [`Progression::plan`] says where a choice leads
//! without changing anything, and [`Progression::commit`] applies it once the
//! destination's dialogue has been loaded.

use super::{DialogueError, DialogueResult};

/// One of the three choice buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// First choice
    A,
    /// Second choice
    B,
    /// Third choice
    C,
}

impl Branch {
    /// All branches, in priority order
    pub const ALL: [Branch; 3] = [Branch::A, Branch::B, Branch::C];

    /// Suffix appended to the level id to name the branch's dialogue
    pub fn suffix(self) -> &'static str {
        match self {
            Branch::A => "_a",
            Branch::B => "_b",
            Branch::C => "_c",
        }
    }
}

/// Where a choice leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Detour into a branch of the current level
    Branch {
        /// Level being detoured from
        level: usize,
        /// Chosen branch
        branch: Branch,
    },
    /// Move on to another level
    Advance {
        /// Destination level index
        to: usize,
    },
}

/// Coarse state of the progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Revealing a regular level
    Revealing,
    /// Revealing a branch detour
    Intermezzo,
    /// On the last level; choices do nothing
    Complete,
}

/// Level index and detour flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    levels: Vec<String>,
    current: usize,
    intermezzo: bool,
}

impl Progression {
    /// Start at the first of `levels`
    pub fn new(levels: Vec<String>) -> DialogueResult<Self> {
        if levels.is_empty() {
            return Err(DialogueError::NoLevels);
        }
        Ok(Self {
            levels,
            current: 0,
            intermezzo: false,
        })
    }

    /// Index of the current level
    pub fn current_level(&self) -> usize {
        self.current
    }

    /// Id of the current level
    pub fn current_id(&self) -> &str {
        &self.levels[self.current]
    }

    /// True while in a branch detour
    pub fn is_intermezzo(&self) -> bool {
        self.intermezzo
    }

    /// True on the last level
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.levels.len()
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        if self.is_last() {
            Phase::Complete
        } else if self.is_intermezzo() {
            Phase::Intermezzo
        } else {
            Phase::Revealing
        }
    }

    /// Where choosing `branch` would lead, if anywhere
    pub fn plan(&self, branch: Branch) -> Option<Transition> {
        if self.is_last() {
            return None;
        }
        if self.current > 0 && !self.intermezzo {
            return Some(Transition::Branch {
                level: self.current,
                branch,
            });
        }
        Some(Transition::Advance { to: self.current + 1 })
    }

    /// Dialogue id of a transition's destination
    pub fn dialogue_id(&self, transition: &Transition) -> String {
        match *transition {
            Transition::Branch { level, branch } => format!("{}{}", self.levels[level], branch.suffix()),
            Transition::Advance { to } => self.levels[to].clone(),
        }
    }

    /// Apply a transition returned by [`Progression::plan`]
    pub fn commit(&mut self, transition: Transition) {
        match transition {
            Transition::Branch { level, .. } => {
                self.current = level;
                self.intermezzo = true;
            }
            Transition::Advance { to } => {
                self.current = to.min(self.levels.len() - 1);
                self.intermezzo = false;
            }
        }
    }
}
