use alloc::sync::Arc;
use std::sync::mpsc;
use std::thread;

use crate::ai::negamax::{self, SearchConfig};
use crate::ai::types::{Ai, GameState as _, Outcome};
use crate::engine::board::Board;
use crate::engine::game::{ContractViolation, TurnState};
use crate::engine::types::{Cell, IdGenerator, Mark, OriginId, Player, PlayerId, PlayerKind};

/// 盤面の変化を受け取るフロントエンド側のフック。
pub trait MatchObserver {
    /// 終局したときに呼ばれる。
    #[inline]
    fn on_game_over(&mut self, state: TurnState) {
        let _: TurnState = state;
    }

    /// 盤面が変化したとき（開始・着手）に呼ばれる。
    #[inline]
    fn on_refresh(&mut self, board: &Board) {
        let _: &Board = board;
    }
}

/// 何もしないオブザーバ。
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}

/// 対局の設定。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchConfig {
    /// 先手の記号。後手はもう一方の記号を使う。
    pub first_mark: Mark,
    /// 先手の操作主体。
    pub first: PlayerKind,
    /// AI の探索設定。
    pub search: SearchConfig,
    /// 後手の操作主体。
    pub second: PlayerKind,
}

impl Default for MatchConfig {
    #[inline]
    fn default() -> Self {
        Self {
            first_mark: Mark::X,
            first: PlayerKind::Human,
            search: SearchConfig::default(),
            second: PlayerKind::Engine,
        }
    }
}

/// 対局操作の失敗理由（フロントエンドの入力ミスなど、回復可能なもの）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum MatchError {
    /// 指定マスがすでに埋まっている。
    #[error("cell {0} is already taken")]
    CellTaken(Cell),
    /// AI の思考スレッドが結果を返さずに終了した。
    #[error("engine worker stopped without answering")]
    EngineGone,
    /// すでに終局している。
    #[error("the game is over")]
    GameOver,
    /// 手番のプレイヤーが人間ではない。
    #[error("{0} is not a human player")]
    NotHuman(PlayerId),
    /// 手番のプレイヤーが人間である。
    #[error("{0} is a human player")]
    NotEngine(PlayerId),
    /// 手番のプレイヤーがリモートなので、ローカルの探索AIでは打たない。
    #[error("{0} is a remote player; its move must come through request_move_with")]
    RemoteTurn(PlayerId),
    /// まだ対局が始まっていない。
    #[error("the game has not started")]
    NotStarted,
    /// 盤面が契約違反として拒否した。
    #[error(transparent)]
    Rejected(#[from] ContractViolation),
    /// 思考中に盤面が進んだため、AI の手が古くなった。
    #[error("engine move was computed for a different position")]
    Stale,
}

/// AI が選んだ手と、それを計算した局面。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EngineMove {
    /// 選ばれたマス（合法手が無ければ `None`）。
    cell: Option<Cell>,
    /// 計算した盤面の origin。
    origin: OriginId,
    /// 計算した時点の手数。
    ply: u8,
}

impl EngineMove {
    /// 選ばれたマスを返す。
    #[inline]
    #[must_use]
    pub const fn cell(self) -> Option<Cell> {
        self.cell
    }
}

/// バックグラウンドで思考中の AI の手。
#[derive(Debug)]
pub struct PendingMove {
    /// 思考スレッドからの結果。
    receiver: mpsc::Receiver<EngineMove>,
}

impl PendingMove {
    /// 結果が出ていれば取り出す（思考中なら `Ok(None)`）。
    ///
    /// # Errors
    ///
    /// 思考スレッドが結果を返さずに終了した場合、`MatchError::EngineGone` を返す。
    #[inline]
    pub fn try_take(&self) -> Result<Option<EngineMove>, MatchError> {
        match self.receiver.try_recv() {
            Ok(mv) => Ok(Some(mv)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(MatchError::EngineGone),
        }
    }

    /// 結果が出るまで待つ。
    ///
    /// # Errors
    ///
    /// 思考スレッドが結果を返さずに終了した場合、`MatchError::EngineGone` を返す。
    #[inline]
    pub fn wait(self) -> Result<EngineMove, MatchError> {
        self.receiver.recv().map_err(|_disconnected| MatchError::EngineGone)
    }
}

/// 1対局（と再戦）の進行を管理する。
#[derive(Debug)]
pub struct Match<O: MatchObserver> {
    /// 対局中の盤面（開始前は `None`）。
    board: Option<Board>,
    /// 対局の設定。
    config: MatchConfig,
    /// 識別子の払い出し元。
    ids: Arc<IdGenerator>,
    /// フロントエンドへのフック。
    observer: O,
    /// 席順のプレイヤー（再戦のたびに入れ替わる）。
    players: [Player; 2],
}

impl<O: MatchObserver> Match<O> {
    /// 人間でないプレイヤーの手を `apply` する（UI スレッド側で呼ぶ）。
    ///
    /// # Errors
    ///
    /// 手番が人間の場合、終局後、または計算後に盤面が進んでいた場合にエラーを返す。
    #[inline]
    pub fn apply_engine_move(&mut self, mv: EngineMove) -> Result<Outcome, MatchError> {
        let board = self.board.as_ref().ok_or(MatchError::NotStarted)?;
        let player = Self::mover(board)?;
        if player.is_human() {
            return Err(MatchError::NotEngine(player.id()));
        }
        if mv.origin != board.origin() || mv.ply != board.ply() {
            return Err(MatchError::Stale);
        }
        let cell = mv.cell.ok_or(MatchError::GameOver)?;
        self.commit(cell, player)
    }

    /// 対局中の盤面を返す。
    #[inline]
    #[must_use]
    pub const fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// 盤面へ着手を反映し、フックを呼ぶ。
    fn commit(&mut self, cell: Cell, player: Player) -> Result<Outcome, MatchError> {
        let board = self.board.as_mut().ok_or(MatchError::NotStarted)?;
        if !board.is_open(cell) {
            return Err(MatchError::CellTaken(cell));
        }

        let outcome = board.try_play(cell, player)?;
        self.observer.on_refresh(board);

        let state = board.state();
        match state {
            TurnState::Winner(winner) => {
                tracing::info!(origin = %board.origin(), winner = %winner, "game won");
                self.observer.on_game_over(state);
            }
            TurnState::TieGame => {
                tracing::info!(origin = %board.origin(), "game tied");
                self.observer.on_game_over(state);
            }
            TurnState::PreGame | TurnState::PlayerTurn(_) => {}
        }
        Ok(outcome)
    }

    /// 対局の設定を返す。
    #[inline]
    #[must_use]
    pub const fn config(&self) -> MatchConfig {
        self.config
    }

    /// 手番のプレイヤーを返す。
    fn mover(board: &Board) -> Result<Player, MatchError> {
        match board.state() {
            TurnState::PlayerTurn(player) => Ok(player),
            TurnState::Winner(_) | TurnState::TieGame => Err(MatchError::GameOver),
            TurnState::PreGame => Err(MatchError::NotStarted),
        }
    }

    /// 設定に従ってプレイヤーを生成する（まだ着席はしない）。
    #[inline]
    pub fn new(config: MatchConfig, observer: O) -> Self {
        let ids = Arc::new(IdGenerator::new());
        let first = ids.player(config.first_mark, config.first);
        let second = ids.player(config.first_mark.other(), config.second);
        Self {
            board: None,
            config,
            ids,
            observer,
            players: [first, second],
        }
    }

    /// オブザーバを返す。
    #[inline]
    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// 人間の手番で着手する。
    ///
    /// # Errors
    ///
    /// 対局開始前・終局後、手番が人間でない場合、指定マスが埋まっている場合にエラーを返す。
    #[inline]
    pub fn play(&mut self, cell: Cell) -> Result<Outcome, MatchError> {
        let board = self.board.as_ref().ok_or(MatchError::NotStarted)?;
        let player = Self::mover(board)?;
        if !player.is_human() {
            return Err(MatchError::NotHuman(player.id()));
        }
        self.commit(cell, player)
    }

    /// 席順のプレイヤーを返す。
    #[inline]
    #[must_use]
    pub const fn players(&self) -> [Player; 2] {
        self.players
    }

    /// 席順を入れ替えて新しい盤面で再戦する。
    ///
    /// # Errors
    ///
    /// プレイヤーの着席に失敗した場合にエラーを返す。
    #[inline]
    pub fn replay(&mut self) -> Result<TurnState, MatchError> {
        self.players.swap(0, 1);
        tracing::info!(first = %self.players[0], "replaying with seats swapped");
        self.start()
    }

    /// 設定済みの探索AIで、手番の手を別スレッドで考え始める。
    ///
    /// リモートのプレイヤーの手は `request_move_with` に手の供給元を渡して受け取る。
    ///
    /// # Errors
    ///
    /// 手番がリモートのプレイヤーなら `MatchError::RemoteTurn`。
    /// それ以外は `request_move_with` と同じ。
    #[inline]
    pub fn request_engine_move(&self) -> Result<PendingMove, MatchError> {
        let board = self.board.as_ref().ok_or(MatchError::NotStarted)?;
        let player = Self::mover(board)?;
        if matches!(player.kind(), PlayerKind::Remote) {
            return Err(MatchError::RemoteTurn(player.id()));
        }
        self.request_move_with(negamax::Agent::with_config(self.config.search))
    }

    /// `agent` で、手番の手を別スレッドで考え始める。
    ///
    /// 思考スレッドは盤面の複製だけを触る。結果は `PendingMove` で受け取り、
    /// 盤面を所有するスレッドで `apply_engine_move` する。
    ///
    /// # Errors
    ///
    /// 対局開始前・終局後、または手番が人間の場合にエラーを返す。
    #[inline]
    pub fn request_move_with<A>(&self, mut agent: A) -> Result<PendingMove, MatchError>
    where
        A: Ai<Board> + Send + 'static,
    {
        let board = self.board.as_ref().ok_or(MatchError::NotStarted)?;
        let player = Self::mover(board)?;
        if player.is_human() {
            return Err(MatchError::NotEngine(player.id()));
        }

        let snapshot = board.fork();
        let (sender, receiver) = mpsc::channel();
        tracing::debug!(player = %player, ply = board.ply(), "engine move requested");
        thread::spawn(move || {
            let cell = agent.select_move(&*snapshot);
            // 受信側が先に破棄された場合は結果を捨てる。
            let _ = sender.send(EngineMove {
                cell,
                origin: snapshot.origin(),
                ply: snapshot.ply(),
            });
        });

        Ok(PendingMove { receiver })
    }

    /// 新しい盤面にプレイヤーを着席させて対局を始める。
    ///
    /// # Errors
    ///
    /// プレイヤーの着席に失敗した場合にエラーを返す。
    #[inline]
    pub fn start(&mut self) -> Result<TurnState, MatchError> {
        let [first, second] = self.players;
        let board = Board::new(&self.ids, first, second)?;
        tracing::info!(origin = %board.origin(), first = %first, second = %second, "game started");
        self.observer.on_refresh(&board);
        let state = board.state();
        self.board = Some(board);
        Ok(state)
    }

    /// 対局状態を返す（開始前は `PreGame`）。
    #[inline]
    #[must_use]
    pub fn state(&self) -> TurnState {
        self.board.as_ref().map_or(TurnState::PreGame, Board::state)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{Match, MatchConfig, MatchError, MatchObserver, NoopObserver};
    use crate::ai::negamax::SearchConfig;
    use crate::ai::random;
    use crate::engine::board::Board;
    use crate::engine::game::{ContractViolation, TurnState};
    use crate::engine::types::{Cell, Mark, PlayerKind};

    /// フックの呼び出しを記録する。
    #[derive(Debug, Default)]
    struct Recorder {
        finished: Vec<TurnState>,
        refreshes: usize,
    }

    impl MatchObserver for Recorder {
        fn on_game_over(&mut self, state: TurnState) {
            self.finished.push(state);
        }

        fn on_refresh(&mut self, _board: &Board) {
            self.refreshes += 1;
        }
    }

    fn human_vs_engine() -> Match<Recorder> {
        let config = MatchConfig {
            search: SearchConfig::exhaustive().without_single_move_shortcut(),
            ..MatchConfig::default()
        };
        Match::new(config, Recorder::default())
    }

    #[test]
    fn match_is_pregame_until_started() {
        let mut game = human_vs_engine();
        assert_eq!(game.state(), TurnState::PreGame);
        assert_eq!(game.play(Cell::Center), Err(MatchError::NotStarted));

        let state = game.start().unwrap_or(TurnState::PreGame);
        assert_eq!(state, TurnState::PlayerTurn(game.players()[0]));
        assert_eq!(game.observer().refreshes, 1);
    }

    #[test]
    fn human_moves_are_checked_not_fatal() {
        let mut game = human_vs_engine();
        let _ = game.start();

        assert!(game.play(Cell::Center).is_ok());
        // 後手は AI なので人間として打てない。
        assert!(matches!(game.play(Cell::North), Err(MatchError::NotHuman(_))));
        assert!(matches!(
            game.request_engine_move().and_then(|pending| pending.wait()),
            Ok(mv) if mv.cell().is_some()
        ));
    }

    #[test]
    fn engine_move_is_computed_off_thread_and_applied() {
        let mut game = human_vs_engine();
        let _ = game.start();
        let _ = game.play(Cell::NorthWest);

        let pending = game.request_engine_move();
        let mv = pending.and_then(|pending| pending.wait());
        let Ok(mv) = mv else {
            panic!("engine did not answer: {mv:?}");
        };

        // 思考結果を受け取る前後で盤面は変わっていない。
        assert_eq!(game.board().map(Board::ply), Some(1));
        let applied = game.apply_engine_move(mv);
        assert!(applied.is_ok(), "got={applied:?}");
        assert_eq!(game.board().map(Board::ply), Some(2));
        assert_eq!(game.observer().refreshes, 3);

        // 同じ結果をもう一度適用しようとすると拒否される。
        assert!(matches!(
            game.apply_engine_move(mv),
            Err(MatchError::NotEngine(_) | MatchError::Stale)
        ));
    }

    #[test]
    fn occupied_cell_is_reported_to_the_human() {
        let config = MatchConfig {
            second: PlayerKind::Human,
            ..MatchConfig::default()
        };
        let mut game = Match::new(config, NoopObserver);
        let _ = game.start();
        let _ = game.play(Cell::Center);
        assert_eq!(game.play(Cell::Center), Err(MatchError::CellTaken(Cell::Center)));
    }

    #[test]
    fn game_over_hook_fires_once_and_replay_swaps_seats() {
        let config = MatchConfig {
            first: PlayerKind::Engine,
            second: PlayerKind::Engine,
            first_mark: Mark::O,
            search: SearchConfig::new(2),
        };
        let mut game = Match::new(config, Recorder::default());
        let _ = game.start();
        let [first, second] = game.players();
        assert_eq!(first.mark(), Mark::O);
        assert_eq!(second.mark(), Mark::X);

        let mut seed = 0_u64;
        while !game.state().is_terminal() {
            seed = seed.wrapping_add(1);
            let pending = game.request_move_with(random::Agent::new(seed));
            let applied = pending
                .and_then(|pending| pending.wait())
                .and_then(|mv| game.apply_engine_move(mv));
            assert!(applied.is_ok(), "got={applied:?}");
        }
        assert_eq!(game.observer().finished.len(), 1);
        assert!(matches!(game.request_engine_move(), Err(MatchError::GameOver)));

        let state = game.replay().unwrap_or(TurnState::PreGame);
        assert_eq!(state, TurnState::PlayerTurn(second));
        assert_eq!(game.players(), [second, first]);
        assert_eq!(game.board().map(Board::ply), Some(0));
    }

    #[test]
    fn boards_of_separate_matches_cannot_be_reset_into_each_other() {
        let config = MatchConfig {
            second: PlayerKind::Human,
            ..MatchConfig::default()
        };
        let mut a = Match::new(config, NoopObserver);
        let mut b = Match::new(config, NoopObserver);
        let _ = a.start();
        let _ = b.start();
        let _ = b.play(Cell::Center);

        let (Some(board_a), Some(board_b)) = (a.board(), b.board()) else {
            panic!("both matches must be started");
        };
        assert_ne!(board_a.origin(), board_b.origin());
        assert_ne!(a.players()[0], b.players()[0]);

        let mut scratch = board_a.clone();
        assert!(matches!(
            scratch.try_reset_to(board_b),
            Err(ContractViolation::OriginMismatch { .. })
        ));
        assert_eq!(scratch.ply(), 0);
    }

    #[test]
    fn remote_turns_are_not_searched_locally() {
        let config = MatchConfig {
            first: PlayerKind::Remote,
            ..MatchConfig::default()
        };
        let mut game = Match::new(config, NoopObserver);
        let _ = game.start();
        let remote = game.players()[0];

        assert!(matches!(
            game.request_engine_move(),
            Err(MatchError::RemoteTurn(id)) if id == remote.id()
        ));
        assert!(matches!(game.play(Cell::Center), Err(MatchError::NotHuman(_))));

        // リモートの手は供給元を渡して受け取る。
        let applied = game
            .request_move_with(random::Agent::new(5))
            .and_then(|pending| pending.wait())
            .and_then(|mv| game.apply_engine_move(mv));
        assert!(applied.is_ok(), "got={applied:?}");
        assert_eq!(game.board().map(Board::ply), Some(1));
    }
}
