use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// 勝ちの評価値。ヒューリスティックが返すどの値よりも大きい。
///
/// `i32::MIN` ではなく `-MAX_SCORE` を負けとするので、符号反転しても溢れない。
pub const MAX_SCORE: i32 = i32::MAX;

/// 着手の結果（着手した側から見た値）。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Outcome {
    /// 終局したか。
    terminal: bool,
    /// 着手した側から見た評価値。
    value: i32,
}

impl Outcome {
    /// 継続局面（ヒューリスティック値付き）。
    #[inline]
    #[must_use]
    pub const fn ongoing(value: i32) -> Self {
        Self {
            terminal: false,
            value,
        }
    }

    /// 終局したかを返す。
    #[inline]
    #[must_use]
    pub const fn terminal(self) -> bool {
        self.terminal
    }

    /// 引き分けで終局。
    #[inline]
    #[must_use]
    pub const fn tie() -> Self {
        Self {
            terminal: true,
            value: 0,
        }
    }

    /// 着手した側から見た評価値を返す。
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        self.value
    }

    /// 着手した側の勝ちで終局。
    #[inline]
    #[must_use]
    pub const fn win() -> Self {
        Self {
            terminal: true,
            value: MAX_SCORE,
        }
    }
}

/// 探索エンジンが要求する局面の契約。
///
/// 二人零和・完全情報ゲームであれば何でも実装できる。
/// 契約違反（終局後の `apply`、異なる対局間の `reset_to` など）は
/// 呼び出し側のバグとして即座に中断すること。
pub trait GameState: Clone {
    /// 着手。
    type Move: Copy + Eq + fmt::Debug + fmt::Display;
    /// プレイヤー。
    type Player: Copy + Eq + fmt::Debug;

    /// 手番のプレイヤーに着手を適用し、その着手をしたプレイヤー視点の結果を返す。
    fn apply(&mut self, mv: Self::Move) -> Outcome;

    /// 手番のプレイヤーの合法手を列挙順で返す（終局後・開始前は `None`）。
    fn available_moves(&self) -> Option<Vec<Self::Move>>;

    /// 手番のプレイヤー（開始前・終局後は `None`）。
    fn current_player(&self) -> Option<Self::Player>;

    /// 同じ origin を持つ独立した複製をヒープ上に作る。
    #[inline]
    fn fork(&self) -> Box<Self> {
        Box::new(self.clone())
    }

    /// 同じ origin の `other` に動的状態を合わせる。
    fn reset_to(&mut self, other: &Self);
}

/// 手を選択するAI。
pub trait Ai<G: GameState> {
    /// 現在局面から次の手を選択する（合法手が無ければ `None`）。
    fn select_move(&mut self, state: &G) -> Option<G::Move>;
}
