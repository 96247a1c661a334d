//! Line and paragraph layout
//!
//! Lines are laid out one below (or above) the other, one face line height
//! apart. The typewriter variant clips the paragraph to a global budget of
//! revealed characters with [`reveal_prefixes`].

/// Direction the pen moves between lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFlow {
    /// Each line sits one line height above the previous one
    Up,
    /// Each line sits one line height below the previous one
    Down,
}

impl LineFlow {
    /// Sign applied to the line advance
    pub fn sign(self) -> f32 {
        match self {
            LineFlow::Up => 1.0,
            LineFlow::Down => -1.0,
        }
    }
}

/// How a paragraph is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphStyle {
    /// Direction between lines
    pub flow: LineFlow,
    /// Added to every glyph's x offset, 1/64 px
    pub indent: i32,
}

impl ParagraphStyle {
    /// Subtitle-style overlay: whole lines stacked upward, no indent
    pub const FULL_LINES: Self = Self {
        flow: LineFlow::Up,
        indent: 0,
    };

    /// Typewriter screen: lines flow downward with an indent bias
    pub const fn typewriter(indent: i32) -> Self {
        Self {
            flow: LineFlow::Down,
            indent,
        }
    }
}

/// Clip `lines` to the first `revealed` characters of their concatenation
///
/// Lines inside the budget come back whole. The line the budget runs out in
/// comes back as a prefix, and nothing after it is returned. Budgets count
/// characters, not bytes, so prefixes always end on a character boundary.
///
/// ```
/// use play_engine::text::reveal_prefixes;
///
/// assert_eq!(reveal_prefixes(&["abc", "de"], 4), vec!["abc", "d"]);
/// assert!(reveal_prefixes(&["abc", "de"], 0).is_empty());
/// ```
pub fn reveal_prefixes<S: AsRef<str>>(lines: &[S], revealed: usize) -> Vec<&str> {
    let mut budget = revealed;
    let mut visible = Vec::new();

    for line in lines {
        let line = line.as_ref();
        let chars = line.chars().count();
        if chars <= budget {
            visible.push(line);
            budget -= chars;
            continue;
        }
        if budget > 0 {
            let end = line.char_indices().nth(budget).map_or(line.len(), |(index, _)| index);
            visible.push(&line[..end]);
        }
        break;
    }
    visible
}

/// Total characters across `lines`
pub fn character_count<S: AsRef<str>>(lines: &[S]) -> usize {
    lines.iter().map(|line| line.as_ref().chars().count()).sum()
}
