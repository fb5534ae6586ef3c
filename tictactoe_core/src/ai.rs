/// ネガマックス探索AI。
pub mod negamax;
/// 合法手からランダムに1手選ぶAI。
pub mod random;
pub mod types;

pub type Outcome = types::Outcome;
pub use types::{Ai, GameState, MAX_SCORE};
