//! ネガマックス探索AI。
//!
//! 枝刈りは行わない。3x3 盤なら終局まで読み切っても高々数十万ノードで済む。
//! より大きな盤に一般化する場合は `search` にαβの窓を追加するのが自然な拡張点になる。

/// 探索の設定と統計。
mod limits;
/// 再帰探索の本体。
mod search;

use alloc::vec::Vec;

use crate::ai::types::{Ai, GameState};

pub use limits::{DEFAULT_MAX_SEARCH_DEPTH, EXHAUSTIVE_SEARCH_DEPTH, SearchConfig, SearchStats};

use limits::SearchContext;
use search::ROOT_DEPTH;

/// 1回の探索の結果。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchReport<M> {
    /// 最善手とその評価値。
    best: Option<(M, i32)>,
    /// ルートの候補手ごとの評価値（列挙順）。
    root_scores: Vec<(M, i32)>,
    /// 探索統計。
    stats: SearchStats,
}

impl<M: Copy + Eq> SearchReport<M> {
    /// 最善手を返す。
    #[inline]
    #[must_use]
    pub fn best_move(&self) -> Option<M> {
        self.best.map(|(mv, _)| mv)
    }

    /// 最善手の評価値を返す。
    #[inline]
    #[must_use]
    pub fn best_score(&self) -> Option<i32> {
        self.best.map(|(_, score)| score)
    }

    /// ルートの候補手ごとの評価値を返す。
    #[inline]
    #[must_use]
    pub fn root_scores(&self) -> &[(M, i32)] {
        &self.root_scores
    }

    /// 指定したルート候補手の評価値を返す。
    #[inline]
    #[must_use]
    pub fn score_of(&self, mv: M) -> Option<i32> {
        self.root_scores
            .iter()
            .find(|&&(candidate, _)| candidate == mv)
            .map(|&(_, score)| score)
    }

    /// 探索統計を返す。
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }
}

/// ネガマックス探索を行うAI。
#[derive(Clone, Copy, Debug, Default)]
#[non_exhaustive]
pub struct Agent {
    /// 探索の設定。
    config: SearchConfig,
}

impl Agent {
    /// 現局面を探索し、最善手とルート候補手ごとの評価値を返す。
    #[inline]
    pub fn analyze<G: GameState>(&self, state: &G) -> SearchReport<G::Move> {
        let mut ctx = SearchContext::new(self.config);
        let best = search::search(state, ROOT_DEPTH, &mut ctx);
        let (root_scores, stats) = ctx.into_parts();

        match best {
            Some((mv, score)) => tracing::debug!(
                chosen = %mv,
                score,
                nodes = stats.nodes(),
                depth = self.config.max_search_depth(),
                "search finished"
            ),
            None => tracing::debug!(nodes = stats.nodes(), "search found no legal moves"),
        }

        SearchReport {
            best,
            root_scores,
            stats,
        }
    }

    /// 探索の設定を返す。
    #[inline]
    #[must_use]
    pub const fn config(self) -> SearchConfig {
        self.config
    }

    /// 探索深さ `max_search_depth` で初期化する。
    #[inline]
    #[must_use]
    pub const fn new(max_search_depth: u8) -> Self {
        Self::with_config(SearchConfig::new(max_search_depth))
    }

    /// `state` を深さ `depth`（ルート = 1）の局面として探索する。
    ///
    /// 手番側から見た最善手と評価値を返す。合法手が無ければ `None`。
    #[inline]
    pub fn search<G: GameState>(&self, state: &G, depth: u8) -> Option<(G::Move, i32)> {
        let mut ctx = SearchContext::new(self.config);
        search::search(state, depth.max(ROOT_DEPTH), &mut ctx)
    }

    /// 設定を指定して初期化する。
    #[inline]
    #[must_use]
    pub const fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl<G: GameState> Ai<G> for Agent {
    #[inline]
    fn select_move(&mut self, state: &G) -> Option<G::Move> {
        self.analyze(state).best_move()
    }
}
