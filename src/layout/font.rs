//! Seven-row bitmap font.
//!
//! Each row string uses `X` for ink. Letters advance by their width in weeks
//! plus one blank week.

use crate::error::{PaintError, Result};

pub const GLYPH_HEIGHT: usize = 7;
pub const INK: char = 'X';
pub const DEFAULT_MESSAGE: &str = "GAME OVER";

const SPACE_ADVANCE: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Letter {
        ch: char,
        rows: [&'static str; GLYPH_HEIGHT],
        /// Days to move after drawing this glyph.
        advance: u32,
    },
    Space {
        advance: u32,
    },
}

impl Glyph {
    pub fn label(&self) -> Option<char> {
        match self {
            Glyph::Letter { ch, .. } => Some(*ch),
            Glyph::Space { .. } => None,
        }
    }

    pub fn advance(&self) -> u32 {
        match self {
            Glyph::Letter { advance, .. } | Glyph::Space { advance } => *advance,
        }
    }

    /// Width in grid columns (weeks).
    pub fn width(&self) -> usize {
        match self {
            Glyph::Letter { rows, .. } => rows[0].chars().count(),
            Glyph::Space { .. } => 0,
        }
    }

    pub fn rows(&self) -> &[&'static str] {
        match self {
            Glyph::Letter { rows, .. } => rows,
            Glyph::Space { .. } => &[],
        }
    }

    pub fn ink_count(&self) -> usize {
        self.rows()
            .iter()
            .map(|row| row.chars().filter(|&c| c == INK).count())
            .sum()
    }
}

const G: Glyph = Glyph::Letter {
    ch: 'G',
    rows: [" XX ", "X  X", "X   ", "X XX", "X  X", "X  X", " XX "],
    advance: 35,
};

const A: Glyph = Glyph::Letter {
    ch: 'A',
    rows: [" XX ", "X  X", "X  X", "XXXX", "X  X", "X  X", "X  X"],
    advance: 35,
};

const M: Glyph = Glyph::Letter {
    ch: 'M',
    rows: ["X   X", "XX XX", "X X X", "X X X", "X   X", "X   X", "X   X"],
    advance: 42,
};

const E: Glyph = Glyph::Letter {
    ch: 'E',
    rows: ["XXXX", "X   ", "X   ", "XXX ", "X   ", "X   ", "XXXX"],
    advance: 35,
};

const O: Glyph = Glyph::Letter {
    ch: 'O',
    rows: [" XX ", "X  X", "X  X", "X  X", "X  X", "X  X", " XX "],
    advance: 35,
};

const V: Glyph = Glyph::Letter {
    ch: 'V',
    rows: ["X   X", "X   X", "X   X", "X   X", "X   X", " X X ", "  X  "],
    advance: 42,
};

const R: Glyph = Glyph::Letter {
    ch: 'R',
    rows: ["XXX ", "X  X", "X  X", "XXX ", "X X ", "X  X", "X  X"],
    advance: 35,
};

pub const FONT: &[Glyph] = &[G, A, M, E, O, V, R];

pub fn glyph(ch: char) -> Option<Glyph> {
    if ch == ' ' {
        return Some(Glyph::Space {
            advance: SPACE_ADVANCE,
        });
    }
    let upper = ch.to_ascii_uppercase();
    FONT.iter().copied().find(|g| g.label() == Some(upper))
}

/// Ordered glyphs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    glyphs: Vec<Glyph>,
}

impl Message {
    pub fn parse(text: &str) -> Result<Self> {
        let glyphs = text
            .chars()
            .map(|ch| glyph(ch).ok_or(PaintError::UnsupportedGlyph(ch)))
            .collect::<Result<Vec<_>>>()?;
        if glyphs.iter().all(|g| g.ink_count() == 0) {
            return Err(PaintError::InvalidConfig(format!(
                "message {text:?} has no ink to draw"
            )));
        }
        Ok(Self { glyphs })
    }

    pub fn game_over() -> Self {
        Self {
            glyphs: vec![G, A, M, E, Glyph::Space { advance: SPACE_ADVANCE }, O, V, E, R],
        }
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn ink_count(&self) -> usize {
        self.glyphs.iter().map(Glyph::ink_count).sum()
    }

    /// Days from the first glyph's Sunday to the last day of the last
    /// letter's box. Trailing spaces and the gap after the last letter do not count.
    pub fn span_days(&self) -> u32 {
        let Some(last) = self.glyphs.iter().rposition(|g| matches!(g, Glyph::Letter { .. })) else {
            return 0;
        };
        let leading: u32 = self.glyphs[..last].iter().map(Glyph::advance).sum();
        leading + self.glyphs[last].width() as u32 * 7
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::game_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_have_equal_length() {
        for g in FONT {
            let width = g.width();
            assert!(g.rows().iter().all(|r| r.chars().count() == width), "{g:?}");
            assert_eq!(g.rows().len(), GLYPH_HEIGHT);
        }
    }

    #[test]
    fn letter_advance_is_width_plus_one_week() {
        for g in FONT {
            assert_eq!(g.advance() as usize, (g.width() + 1) * 7, "{g:?}");
        }
    }

    #[test]
    fn ink_counts_per_letter() {
        let counts: Vec<(char, usize)> = Message::game_over()
            .glyphs()
            .iter()
            .filter_map(|g| g.label().map(|c| (c, g.ink_count())))
            .collect();
        assert_eq!(
            counts,
            vec![
                ('G', 14),
                ('A', 16),
                ('M', 18),
                ('E', 15),
                ('O', 14),
                ('V', 13),
                ('E', 15),
                ('R', 16),
            ]
        );
        assert_eq!(Message::game_over().ink_count(), 121);
    }

    #[test]
    fn parse_matches_builtin_message() {
        assert_eq!(Message::parse("GAME OVER").unwrap(), Message::game_over());
        assert_eq!(Message::parse("game over").unwrap(), Message::game_over());
    }

    #[test]
    fn space_has_no_ink_but_advances() {
        let space = glyph(' ').unwrap();
        assert_eq!(space.ink_count(), 0);
        assert_eq!(space.advance(), 7);
        assert_eq!(space.label(), None);
    }

    #[test]
    fn span_ends_with_the_last_letter() {
        // 266 days of advances before R, then R's four weeks.
        assert_eq!(Message::game_over().span_days(), 294);
        assert_eq!(Message::parse("E").unwrap().span_days(), 28);
        assert_eq!(Message::parse("E  ").unwrap().span_days(), 28);
        assert_eq!(Message::parse(" E").unwrap().span_days(), 35);
    }

    #[test]
    fn unknown_characters_are_rejected() {
        assert!(matches!(Message::parse("GAME ON!"), Err(PaintError::UnsupportedGlyph('N'))));
        assert!(matches!(Message::parse("   "), Err(PaintError::InvalidConfig(_))));
    }
}
