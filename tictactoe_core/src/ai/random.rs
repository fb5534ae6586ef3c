use crate::ai::types::{Ai, GameState};

/// 64-bit 線形合同法 (LCG) の簡易 RNG。
/// - rand クレート不使用
/// - `seed` で決定的に再現可能
#[derive(Debug, Clone, Copy)]
struct Lcg64 {
    /// 内部状態。
    state: u64,
}

impl Lcg64 {
    /// LCG の内部状態を `seed` から初期化する。
    #[inline]
    const fn new(seed: u64) -> Self {
        // seed が 0 でも動くように軽く攪拌
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    /// 次の u32 を生成する（上位 32bit を返す）。
    #[inline]
    fn next_u32(&mut self) -> u32 {
        // PCG 系で採用される LCG 定数
        const LCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
        const LCG_INCREMENT: u64 = 1_442_695_040_888_963_407;

        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);

        u32::try_from(self.state >> 32).unwrap_or(u32::MAX)
    }
}

/// 合法手からランダムに1手を選択するAI。
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Agent {
    /// 乱数生成器。
    rng: Lcg64,
}

impl Agent {
    /// `seed` を用いて初期化する。
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: Lcg64::new(seed),
        }
    }
}

impl<G: GameState> Ai<G> for Agent {
    #[inline]
    fn select_move(&mut self, state: &G) -> Option<G::Move> {
        let moves = state.available_moves()?;
        let index = choose_index(moves.len(), self.rng.next_u32());
        moves.get(index).copied()
    }
}

/// `0..len` から `random` に基づき一様に1つ選択して返す。
fn choose_index(len: usize, random: u32) -> usize {
    let len_u64 = u64::try_from(len).unwrap_or(u64::MAX);
    let product = u64::from(random).wrapping_mul(len_u64);
    usize::try_from(product.wrapping_shr(32)).unwrap_or(usize::MIN)
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::{Agent, choose_index};
    use crate::ai::types::{Ai as _, GameState as _};
    use crate::engine::board::Board;
    use crate::engine::types::{IdGenerator, Mark, PlayerKind};

    #[test]
    fn choose_index_stays_in_range() {
        for len in 1..=9 {
            assert_eq!(choose_index(len, 0), 0);
            assert_eq!(choose_index(len, u32::MAX), len - 1);
        }
    }

    #[test]
    fn random_agent_only_picks_available_moves() {
        let ids = Arc::new(IdGenerator::new());
        let x = ids.player(Mark::X, PlayerKind::Engine);
        let o = ids.player(Mark::O, PlayerKind::Engine);

        for seed in 0_u64..16 {
            let mut board = Board::new(&ids, x, o).unwrap_or_else(|err| panic!("{err}"));
            let mut agent = Agent::new(seed);
            while let Some(moves) = board.available_moves() {
                let chosen = agent.select_move(&board);
                assert!(chosen.is_some_and(|cell| moves.contains(&cell)));
                let Some(cell) = chosen else { break };
                let _ = board.apply(cell);
            }
            assert!(board.is_done());
        }
    }

    #[test]
    fn same_seed_same_game() {
        let ids = Arc::new(IdGenerator::new());
        let x = ids.player(Mark::X, PlayerKind::Engine);
        let o = ids.player(Mark::O, PlayerKind::Engine);
        let board = Board::new(&ids, x, o).unwrap_or_else(|err| panic!("{err}"));

        let mut a = Agent::new(7);
        let mut b = Agent::new(7);
        for _ in 0..5 {
            assert_eq!(a.select_move(&board), b.select_move(&board));
        }
    }
}
