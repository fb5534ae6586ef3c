//! 勝ちライン（縦横斜めの8本）と、それに基づく局面評価。

use crate::engine::types::Cell;

/// 3マスのマスクを作る。
const fn line(a: Cell, b: Cell, c: Cell) -> u16 {
    a.bit() | b.bit() | c.bit()
}

/// 勝ちライン（横3本、縦3本、斜め2本）。
pub const WIN_LINES: [u16; 8] = [
    line(Cell::NorthWest, Cell::North, Cell::NorthEast),
    line(Cell::West, Cell::Center, Cell::East),
    line(Cell::SouthWest, Cell::South, Cell::SouthEast),
    line(Cell::NorthWest, Cell::West, Cell::SouthWest),
    line(Cell::North, Cell::Center, Cell::South),
    line(Cell::NorthEast, Cell::East, Cell::SouthEast),
    line(Cell::NorthWest, Cell::Center, Cell::SouthEast),
    line(Cell::NorthEast, Cell::Center, Cell::SouthWest),
];

/// 盤面全体のマスク。
pub const FULL_MASK: u16 = 0x01FF;

/// 生きているライン1本あたりの重み。
const LINE_WEIGHT: i32 = 10;

/// `occupancy` がいずれかの勝ちラインを完成させているかを返す。
#[inline]
#[must_use]
pub fn completes_line(occupancy: u16) -> bool {
    WIN_LINES
        .iter()
        .any(|&mask| occupancy & mask == mask)
}

/// まだ相手に塞がれていないラインの本数。
#[inline]
#[must_use]
pub fn live_lines(blocker: u16) -> i32 {
    let count = WIN_LINES
        .iter()
        .filter(|&&mask| blocker & mask == u16::MIN)
        .count();
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// 非終局の評価関数（`mover` 視点）。
///
/// `10 * (mover の生きライン数 - opponent の生きライン数)`。
#[inline]
#[must_use]
pub fn heuristic(mover: u16, opponent: u16) -> i32 {
    live_lines(opponent)
        .wrapping_sub(live_lines(mover))
        .wrapping_mul(LINE_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::{FULL_MASK, WIN_LINES, completes_line, heuristic, live_lines};
    use crate::engine::types::Cell;

    #[test]
    fn every_line_has_three_cells_inside_the_board() {
        for mask in WIN_LINES {
            assert_eq!(mask.count_ones(), 3);
            assert_eq!(mask & !FULL_MASK, 0);
        }
    }

    #[test]
    fn completes_line_needs_all_three_bits() {
        let two = Cell::NorthWest.bit() | Cell::Center.bit();
        assert!(!completes_line(two));
        assert!(completes_line(two | Cell::SouthEast.bit()));
    }

    #[test]
    fn empty_board_is_balanced() {
        assert_eq!(live_lines(0), 8);
        assert_eq!(heuristic(0, 0), 0);
    }

    #[test]
    fn center_keeps_four_lines_open_for_mover() {
        // 中央は4本のラインに属するので、相手の生きラインが4本減る。
        assert_eq!(heuristic(Cell::Center.bit(), 0), 40);
        assert_eq!(heuristic(Cell::NorthWest.bit(), 0), 30);
        assert_eq!(heuristic(Cell::North.bit(), 0), 20);
    }

    #[test]
    fn swapping_perspective_negates_the_score() {
        let xs = Cell::Center.bit() | Cell::NorthEast.bit();
        let os = Cell::NorthWest.bit() | Cell::South.bit();
        assert_eq!(heuristic(xs, os), heuristic(os, xs).wrapping_neg());
    }
}
