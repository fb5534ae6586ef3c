use crate::engine::types::{Cell, Mark, OriginId, Player, PlayerId};

/// 対局の状態。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum TurnState {
    /// 対局開始前（プレイヤー未着席）。
    #[default]
    PreGame,
    /// 指定プレイヤーの手番。
    PlayerTurn(Player),
    /// 指定プレイヤーの勝ちで終局。
    Winner(Player),
    /// 引き分けで終局。
    TieGame,
}

impl TurnState {
    /// 手番のプレイヤーを返す（開始前・終局後は `None`）。
    #[inline]
    #[must_use]
    pub const fn current_player(self) -> Option<Player> {
        match self {
            Self::PlayerTurn(player) => Some(player),
            Self::PreGame | Self::Winner(_) | Self::TieGame => None,
        }
    }

    /// 終局しているかを返す。
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        match self {
            Self::Winner(_) | Self::TieGame => true,
            Self::PreGame | Self::PlayerTurn(_) => false,
        }
    }
}

/// 呼び出し側との契約違反。
///
/// いずれもユーザー入力ではなく、呼び出し側と盤面の同期ずれを示すバグである。
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ContractViolation {
    /// 同じ記号のプレイヤーを着席させようとした。
    #[error("both players use mark {0}")]
    DuplicateMark(Mark),
    /// すでに埋まっているマスへの着手。
    #[error("cell {0} is already occupied")]
    IllegalMoveTarget(Cell),
    /// 手番が存在しないのに合法手が空になった。
    #[error("no legal moves while the game is still in progress")]
    NoLegalMoves,
    /// 別の対局から派生した盤面同士の操作。
    #[error("{found} does not derive from {expected}")]
    OriginMismatch {
        /// 操作対象の origin。
        expected: OriginId,
        /// 渡された盤面の origin。
        found: OriginId,
    },
    /// 対局に着席していないプレイヤー。
    #[error("{0} is not seated at this board")]
    UnknownPlayer(PlayerId),
    /// 手番ではないプレイヤー、または手番が存在しない状態での着手。
    #[error("{player:?} may not move in state {state:?}")]
    WrongMover {
        /// 着手しようとしたプレイヤー（手番の自動解決に失敗した場合は `None`）。
        player: Option<PlayerId>,
        /// その時点の状態。
        state: TurnState,
    },
}

/// 契約違反を記録して即座に中断する。
#[cold]
#[track_caller]
#[expect(clippy::panic, reason = "contract violations are process-fatal")]
pub(crate) fn fatal(violation: ContractViolation) -> ! {
    tracing::error!(%violation, "game state contract violated");
    panic!("contract violation: {violation}");
}

#[cfg(test)]
mod tests {
    use super::{ContractViolation, TurnState};
    use crate::engine::types::{Cell, IdGenerator, Mark, PlayerKind};

    #[test]
    fn only_player_turn_has_a_current_player() {
        let ids = IdGenerator::new();
        let player = ids.player(Mark::X, PlayerKind::Human);

        assert_eq!(TurnState::PreGame.current_player(), None);
        assert_eq!(TurnState::PlayerTurn(player).current_player(), Some(player));
        assert_eq!(TurnState::Winner(player).current_player(), None);
        assert_eq!(TurnState::TieGame.current_player(), None);
    }

    #[test]
    fn winner_and_tie_are_terminal() {
        let ids = IdGenerator::new();
        let player = ids.player(Mark::O, PlayerKind::Engine);

        assert!(!TurnState::PreGame.is_terminal());
        assert!(!TurnState::PlayerTurn(player).is_terminal());
        assert!(TurnState::Winner(player).is_terminal());
        assert!(TurnState::TieGame.is_terminal());
    }

    #[test]
    #[should_panic(expected = "cell center is already occupied")]
    fn fatal_panics_with_the_violation() {
        super::fatal(ContractViolation::IllegalMoveTarget(Cell::Center));
    }
}
