/// 盤面（席ごとのビットボード）と着手・勝敗判定の実装。
pub mod board;
/// 対局状態と契約違反の定義。
pub mod game;
/// 勝ちラインと局面評価。
pub mod lines;
pub mod types;

pub type Board = board::Board;
pub type Cell = types::Cell;
pub type ContractViolation = game::ContractViolation;
pub type IdGenerator = types::IdGenerator;
pub type Mark = types::Mark;
pub type Player = types::Player;
pub type PlayerId = types::PlayerId;
pub type PlayerKind = types::PlayerKind;
pub type Seat = types::Seat;
pub type TurnState = game::TurnState;
