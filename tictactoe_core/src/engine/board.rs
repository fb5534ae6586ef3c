use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::ai::types::{GameState, Outcome};
use crate::engine::game::{ContractViolation, TurnState, fatal};
use crate::engine::lines::{FULL_MASK, completes_line, heuristic};
use crate::engine::types::{
    BoardId, Cell, IdGenerator, OriginId, Player, PlayerId, Seat, cells_in,
};

/// 全マスが埋まったときの手数。
pub const MAX_PLY: u8 = 9;

/// 盤面（席ごとのビットボード＋手番状態）。
///
/// 不変条件:
/// - `occupancy[0] & occupancy[1] == 0`
/// - `ply == popcount(occupancy[0]) + popcount(occupancy[1])`
#[derive(Debug)]
pub struct Board {
    /// このインスタンスの識別子（複製ごとに新しく払い出す）。
    board_id: BoardId,
    /// 識別子の払い出し元。
    ids: Arc<IdGenerator>,
    /// 席ごとの占有ビットボード。
    occupancy: [u16; 2],
    /// 同じ対局から派生した盤面が共有する識別子。
    origin: OriginId,
    /// 着手済みの手数。
    ply: u8,
    /// 席順のプレイヤー。
    players: [Player; 2],
    /// 手番状態。
    state: TurnState,
}

impl Board {
    /// このインスタンスの識別子を返す。
    #[inline]
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// 手番のプレイヤーを返す（終局後は `None`）。
    #[inline]
    #[must_use]
    pub const fn current_player(&self) -> Option<Player> {
        self.state.current_player()
    }

    /// 終局しているかを返す。
    #[inline]
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.state.is_terminal()
    }

    /// 指定マスが空いているかを返す。
    #[inline]
    #[must_use]
    pub const fn is_open(&self, cell: Cell) -> bool {
        self.occupied() & cell.bit() == u16::MIN
    }

    /// 2人のプレイヤーを着席させ、先手の手番から対局を始める。
    ///
    /// # Errors
    ///
    /// 2人が同じ記号を使っている場合、`ContractViolation::DuplicateMark` を返す。
    #[inline]
    pub fn new(
        ids: &Arc<IdGenerator>,
        first: Player,
        second: Player,
    ) -> Result<Self, ContractViolation> {
        if first.mark() == second.mark() {
            return Err(ContractViolation::DuplicateMark(first.mark()));
        }

        let board = Self {
            board_id: ids.next_board_id(),
            ids: Arc::clone(ids),
            occupancy: [u16::MIN; 2],
            origin: ids.next_origin_id(),
            ply: u8::MIN,
            players: [first, second],
            state: TurnState::PlayerTurn(first),
        };
        tracing::debug!(
            board = %board.board_id,
            origin = %board.origin,
            first = %first,
            second = %second,
            "players seated"
        );
        Ok(board)
    }

    /// 盤面の占有ビットボードを返す。
    #[inline]
    #[must_use]
    pub const fn occupied(&self) -> u16 {
        self.occupancy[0] | self.occupancy[1]
    }

    /// 指定マスを占有している席を返す。
    #[inline]
    #[must_use]
    pub const fn occupant(&self, cell: Cell) -> Option<Seat> {
        let mask = cell.bit();
        if self.occupancy[0] & mask != u16::MIN {
            Some(Seat::First)
        } else if self.occupancy[1] & mask != u16::MIN {
            Some(Seat::Second)
        } else {
            None
        }
    }

    /// 指定席の占有ビットボードを返す。
    #[inline]
    #[must_use]
    pub const fn occupancy(&self, seat: Seat) -> u16 {
        self.occupancy[seat.index()]
    }

    /// 空きマスのビットボードを返す。
    #[inline]
    #[must_use]
    pub const fn open_cells(&self) -> u16 {
        !self.occupied() & FULL_MASK
    }

    /// 対局の識別子を返す。
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> OriginId {
        self.origin
    }

    /// 着手を適用する。契約違反は即座に中断する。
    ///
    /// # Panics
    ///
    /// `try_play` がエラーを返す条件では panic する。
    #[inline]
    #[track_caller]
    pub fn play(&mut self, cell: Cell, player: Player) -> Outcome {
        self.try_play(cell, player).unwrap_or_else(|violation| fatal(violation))
    }

    /// 指定席のプレイヤーを返す。
    #[inline]
    #[must_use]
    pub const fn player_at(&self, seat: Seat) -> Player {
        self.players[seat.index()]
    }

    /// 席順のプレイヤーを返す。
    #[inline]
    #[must_use]
    pub const fn players(&self) -> [Player; 2] {
        self.players
    }

    /// 着手済みの手数を返す。
    #[inline]
    #[must_use]
    pub const fn ply(&self) -> u8 {
        self.ply
    }

    /// 初期局面（空の盤面、先手の手番）に戻す。プレイヤーと origin は維持する。
    #[inline]
    pub fn restart(&mut self) {
        self.occupancy = [u16::MIN; 2];
        self.ply = u8::MIN;
        self.state = TurnState::PlayerTurn(self.players[0]);
    }

    /// プレイヤーの席を返す。
    ///
    /// # Errors
    ///
    /// 着席していないプレイヤーの場合、`ContractViolation::UnknownPlayer` を返す。
    #[inline]
    pub fn seat_of(&self, player: PlayerId) -> Result<Seat, ContractViolation> {
        [Seat::First, Seat::Second]
            .into_iter()
            .find(|seat| self.player_at(*seat).id() == player)
            .ok_or(ContractViolation::UnknownPlayer(player))
    }

    /// 手番状態を返す。
    #[inline]
    #[must_use]
    pub const fn state(&self) -> TurnState {
        self.state
    }

    /// 着手を適用し、着手した側から見た評価値を返す。
    ///
    /// - 勝ち: `(true, MAX_SCORE)`
    /// - 引き分け: `(true, 0)`
    /// - 継続: `(false, 10 * (自分の生きライン数 - 相手の生きライン数))`
    ///
    /// # Errors
    ///
    /// 次の場合は盤面を変更せずにエラーを返す：
    /// - `ContractViolation::WrongMover`: `player` が手番でない、または手番が存在しない
    ///   （着席していないプレイヤーも手番ではないのでこちらになる）
    /// - `ContractViolation::IllegalMoveTarget`: 指定マスがすでに埋まっている
    #[inline]
    pub fn try_play(&mut self, cell: Cell, player: Player) -> Result<Outcome, ContractViolation> {
        let mover = match self.state {
            TurnState::PlayerTurn(mover) => mover,
            TurnState::PreGame | TurnState::Winner(_) | TurnState::TieGame => {
                return Err(ContractViolation::WrongMover {
                    player: Some(player.id()),
                    state: self.state,
                });
            }
        };
        if mover != player {
            return Err(ContractViolation::WrongMover {
                player: Some(player.id()),
                state: self.state,
            });
        }

        let seat = self.seat_of(player.id())?;
        if !self.is_open(cell) {
            return Err(ContractViolation::IllegalMoveTarget(cell));
        }

        let mine = self.occupancy[seat.index()] | cell.bit();
        self.occupancy[seat.index()] = mine;
        self.ply = self.ply.saturating_add(1);

        let outcome = if completes_line(mine) {
            self.state = TurnState::Winner(player);
            Outcome::win()
        } else if self.ply >= MAX_PLY {
            self.state = TurnState::TieGame;
            Outcome::tie()
        } else {
            let other = seat.other();
            self.state = TurnState::PlayerTurn(self.player_at(other));
            Outcome::ongoing(heuristic(mine, self.occupancy(other)))
        };

        tracing::trace!(
            board = %self.board_id,
            cell = %cell,
            seat = seat.index(),
            ply = self.ply,
            terminal = outcome.terminal(),
            value = outcome.value(),
            "move applied"
        );
        Ok(outcome)
    }

    /// 同じ対局から派生した `other` の局面（占有・手番・手数）に合わせる。
    ///
    /// # Errors
    ///
    /// 払い出し元または origin が異なる場合、盤面を変更せずに
    /// `ContractViolation::OriginMismatch` を返す。
    #[inline]
    pub fn try_reset_to(&mut self, other: &Self) -> Result<(), ContractViolation> {
        if !Arc::ptr_eq(&self.ids, &other.ids) || self.origin != other.origin {
            return Err(ContractViolation::OriginMismatch {
                expected: self.origin,
                found: other.origin,
            });
        }

        self.occupancy = other.occupancy;
        self.ply = other.ply;
        self.state = other.state;
        Ok(())
    }
}

impl Clone for Board {
    /// 新しい識別子を持ち、origin・プレイヤー・局面を共有する独立した盤面を返す。
    #[inline]
    fn clone(&self) -> Self {
        Self {
            board_id: self.ids.next_board_id(),
            ids: Arc::clone(&self.ids),
            ..*self
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in Cell::ALL.chunks(usize::from(Cell::BOARD_LEN)) {
            let symbols: Vec<char> = row
                .iter()
                .map(|&cell| {
                    self.occupant(cell)
                        .map_or('.', |seat| self.player_at(seat).mark().symbol())
                })
                .collect();
            if let [a, b, c] = symbols.as_slice() {
                writeln!(f, " {a} | {b} | {c}")?;
            }
        }
        Ok(())
    }
}

impl GameState for Board {
    type Move = Cell;
    type Player = Player;

    #[inline]
    fn apply(&mut self, mv: Cell) -> Outcome {
        match self.state {
            TurnState::PlayerTurn(mover) => self.play(mv, mover),
            TurnState::PreGame | TurnState::Winner(_) | TurnState::TieGame => {
                fatal(ContractViolation::WrongMover {
                    player: None,
                    state: self.state,
                })
            }
        }
    }

    #[inline]
    fn available_moves(&self) -> Option<Vec<Cell>> {
        match self.state {
            TurnState::PlayerTurn(_) => {
                let open = self.open_cells();
                if open == u16::MIN {
                    fatal(ContractViolation::NoLegalMoves);
                }
                Some(cells_in(open).collect())
            }
            TurnState::PreGame | TurnState::Winner(_) | TurnState::TieGame => None,
        }
    }

    #[inline]
    fn current_player(&self) -> Option<Player> {
        self.state.current_player()
    }

    #[inline]
    fn reset_to(&mut self, other: &Self) {
        if let Err(violation) = self.try_reset_to(other) {
            fatal(violation);
        }
    }
}
