//! Binary cell states shared by the grid and the automaton.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cell {
    #[default]
    Open,
    Wall,
}

impl Cell {
    pub const WALL_GLYPH: char = '#';
    pub const OPEN_GLYPH: char = '.';

    /// Numeric state summed by the neighbor count: `0` for open, `1` for wall.
    pub const fn state(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Wall => 1,
        }
    }

    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    pub const fn glyph(self) -> char {
        match self {
            Self::Open => Self::OPEN_GLYPH,
            Self::Wall => Self::WALL_GLYPH,
        }
    }

    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            Self::OPEN_GLYPH => Some(Self::Open),
            Self::WALL_GLYPH => Some(Self::Wall),
            _ => None,
        }
    }
}

impl From<bool> for Cell {
    fn from(is_wall: bool) -> Self {
        if is_wall { Self::Wall } else { Self::Open }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_matches_binary_encoding() {
        assert_eq!(Cell::Open.state(), 0);
        assert_eq!(Cell::Wall.state(), 1);
        assert_eq!(Cell::default(), Cell::Open);
    }

    #[test]
    fn glyphs_parse_back_to_the_same_cell() {
        for cell in [Cell::Open, Cell::Wall] {
            assert_eq!(Cell::from_glyph(cell.glyph()), Some(cell));
        }
        assert_eq!(Cell::from_glyph('x'), None);
    }
}
