pub mod font;
pub mod grid;

pub use font::{glyph, Glyph, Message, DEFAULT_MESSAGE, GLYPH_HEIGHT, INK};
pub use grid::{
    cell_date, day_index, grid_columns, grid_position, grid_start_offset, legacy_start_offset, year_days,
    CalendarAnchor, GridAlignment,
};

use crate::error::{PaintError, Result};
use crate::model::InkCell;
use chrono::Datelike;

/// Maps every ink cell of `message` to its calendar date.
///
/// Cells come out glyph by glyph, each glyph scanned row by row, left to right.
/// Fails when the message's box would run past December 31 of the anchor's
/// target year.
pub fn render(message: &Message, anchor: &CalendarAnchor) -> Result<Vec<InkCell>> {
    let target_year = anchor.date.year() + 1;
    let span = i64::from(message.span_days());
    if span > 0 {
        let last_day = anchor.date_at(anchor.start_offset + span - 1)?;
        if last_day.year() != target_year {
            return Err(PaintError::InvalidConfig(format!(
                "message runs past the end of {target_year} (last column ends {last_day})"
            )));
        }
    }

    let mut cells = Vec::with_capacity(message.ink_count());
    let mut offset = anchor.start_offset;

    for (glyph_index, glyph) in message.glyphs().iter().enumerate() {
        if let Glyph::Letter { ch, rows, .. } = glyph {
            for (row, line) in rows.iter().enumerate() {
                for (column, cell) in line.chars().enumerate() {
                    if cell != INK {
                        continue;
                    }
                    cells.push(InkCell {
                        date: cell_date(anchor.date, offset, column, row)?,
                        glyph: *ch,
                        glyph_index,
                        row,
                        column,
                    });
                }
            }
        }
        offset += i64::from(glyph.advance());
    }

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn game_over(year: i32) -> Vec<InkCell> {
        let anchor = CalendarAnchor::for_year(year, GridAlignment::Computed).unwrap();
        render(&Message::game_over(), &anchor).unwrap()
    }

    #[test]
    fn renders_one_cell_per_ink_mark() {
        assert_eq!(game_over(2023).len(), 121);
    }

    #[test]
    fn first_cells_follow_row_major_scan() {
        let cells = game_over(2023);
        // G starts with " XX " on the Sunday row.
        let first: Vec<(char, usize, usize, String)> = cells
            .iter()
            .take(3)
            .map(|c| (c.glyph, c.row, c.column, c.date.to_string()))
            .collect();
        assert_eq!(
            first,
            vec![
                ('G', 0, 1, "2023-02-12".to_string()),
                ('G', 0, 2, "2023-02-19".to_string()),
                ('G', 1, 0, "2023-02-06".to_string()),
            ]
        );
    }

    #[test]
    fn space_shifts_following_glyphs() {
        let anchor = CalendarAnchor::for_year(2023, GridAlignment::Computed).unwrap();
        let with_space = render(&Message::parse("E E").unwrap(), &anchor).unwrap();
        let without = render(&Message::parse("EE").unwrap(), &anchor).unwrap();
        assert_eq!(with_space.len(), without.len());
        let second_with = with_space.iter().find(|c| c.glyph_index == 2).unwrap();
        let second_without = without.iter().find(|c| c.glyph_index == 1).unwrap();
        assert_eq!((second_with.date - second_without.date).num_days(), 7);
    }

    #[test]
    fn rows_land_on_matching_weekdays() {
        for year in 2019..=2030 {
            for cell in game_over(year) {
                let (_, row) = grid_position(year, cell.date).unwrap();
                assert_eq!(row, cell.row, "year {year} cell {cell:?}");
            }
        }
    }

    #[test]
    fn message_fits_inside_target_year() {
        for year in 2000..2100 {
            assert!(game_over(year).iter().all(|c| c.date.year() == year), "year {year}");
        }
    }

    #[test]
    fn message_running_into_next_year_is_rejected() {
        let anchor = CalendarAnchor::for_year(2023, GridAlignment::Computed).unwrap();
        // The trailing G would reach 2024-01-06.
        let long = Message::parse("GAME OVER GAME").unwrap();
        assert!(matches!(render(&long, &anchor), Err(PaintError::InvalidConfig(_))));

        // Trailing spaces carry no ink and do not count.
        let padded = Message::parse("GAME OVER       ").unwrap();
        assert_eq!(render(&padded, &anchor).unwrap().len(), 121);
    }

    #[test]
    fn rendering_is_repeatable() {
        assert_eq!(game_over(2024), game_over(2024));
    }
}
