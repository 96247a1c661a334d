//! Typewriter reveal timer

/// Characters revealed so far on the active screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealState {
    revealed: usize,
    since_last_reveal: f32,
    interval: f32,
}

impl RevealState {
    /// Start with nothing revealed, revealing one character per `interval` seconds
    pub fn new(interval: f32) -> Self {
        Self {
            revealed: 0,
            since_last_reveal: 0.0,
            interval,
        }
    }

    /// Characters revealed
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Advance the timer by `elapsed` seconds
    ///
    /// Reveals at most one character per call, however long the tick was.
    /// Returns true if a character was revealed.
    pub fn tick(&mut self, elapsed: f32) -> bool {
        self.since_last_reveal += elapsed;
        if self.since_last_reveal < self.interval {
            return false;
        }
        self.revealed = self.revealed.saturating_add(1);
        self.since_last_reveal = 0.0;
        true
    }

    /// Back to nothing revealed
    pub fn reset(&mut self) {
        self.revealed = 0;
        self.since_last_reveal = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_reveals_on_third_tick() {
        let mut reveal = RevealState::new(0.03);

        assert!(!reveal.tick(0.01));
        assert!(!reveal.tick(0.01));
        assert_eq!(reveal.revealed(), 0);
        assert!(reveal.tick(0.01));
        assert_eq!(reveal.revealed(), 1);
    }

    #[test]
    fn test_one_reveal_per_tick() {
        let mut reveal = RevealState::new(0.03);
        reveal.tick(1.0);
        assert_eq!(reveal.revealed(), 1);
        reveal.tick(1.0);
        assert_eq!(reveal.revealed(), 2);
    }

    #[test]
    fn test_reveal_never_decreases_until_reset() {
        let mut reveal = RevealState::new(0.02);
        let mut previous = 0;
        for _ in 0..50 {
            reveal.tick(0.013);
            assert!(reveal.revealed() >= previous);
            previous = reveal.revealed();
        }
        assert!(previous > 0);

        reveal.reset();
        assert_eq!(reveal.revealed(), 0);
        assert!(!reveal.tick(0.01));
    }
}
