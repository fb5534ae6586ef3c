use alloc::vec::Vec;

/// 探索深さの既定値（現局面から何手先まで読むか）。
pub const DEFAULT_MAX_SEARCH_DEPTH: u8 = 4;

/// 3x3 盤の最大手数。これ以上深く読んでも意味がない。
pub const EXHAUSTIVE_SEARCH_DEPTH: u8 = 9;

/// 探索の設定。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchConfig {
    /// 探索の最大深さ（ply）。
    max_search_depth: u8,
    /// 合法手が1つしか無い局面で、評価せずに評価値 0 として返すか。
    single_move_shortcut: bool,
}

impl SearchConfig {
    /// 終局まで読み切る設定。
    #[inline]
    #[must_use]
    pub const fn exhaustive() -> Self {
        Self::new(EXHAUSTIVE_SEARCH_DEPTH)
    }

    /// 探索の最大深さ（ply）を返す。
    #[inline]
    #[must_use]
    pub const fn max_search_depth(self) -> u8 {
        self.max_search_depth
    }

    /// `max_search_depth` を指定して生成する（0 は 1 に正規化する）。
    #[inline]
    #[must_use]
    pub const fn new(max_search_depth: u8) -> Self {
        Self {
            max_search_depth: normalize_depth(max_search_depth),
            single_move_shortcut: true,
        }
    }

    /// 合法手が1つの局面を評価せずに返すかを返す。
    #[inline]
    #[must_use]
    pub const fn single_move_shortcut(self) -> bool {
        self.single_move_shortcut
    }

    /// 合法手が1つの局面でも着手を評価する設定を返す。
    ///
    /// 既定の近道は、その唯一の手が負けにつながる場合でも評価値 0 を報告する。
    #[inline]
    #[must_use]
    pub const fn without_single_move_shortcut(self) -> Self {
        Self {
            max_search_depth: self.max_search_depth,
            single_move_shortcut: false,
        }
    }
}

impl Default for SearchConfig {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SEARCH_DEPTH)
    }
}

/// 探索深さを正規化する（0の場合は1にする）。
#[inline]
const fn normalize_depth(depth: u8) -> u8 {
    if depth == u8::MIN {
        u8::MIN.wrapping_add(1)
    } else {
        depth
    }
}

/// 探索統計。
#[derive(Default, Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchStats {
    /// 探索の地平線で静的評価を採用した回数。
    horizon_evaluations: u64,
    /// 着手を適用した回数。
    nodes: u64,
    /// 終局に到達した回数。
    terminals: u64,
}

impl SearchStats {
    /// 地平線での静的評価の回数を返す。
    #[inline]
    #[must_use]
    pub const fn horizon_evaluations(&self) -> u64 {
        self.horizon_evaluations
    }

    /// 地平線での静的評価の回数を加算する。
    pub(super) const fn inc_horizon_evaluations(&mut self) {
        self.horizon_evaluations = self.horizon_evaluations.wrapping_add(1);
    }

    /// 着手の適用回数を加算する。
    pub(super) const fn inc_nodes(&mut self) {
        self.nodes = self.nodes.wrapping_add(1);
    }

    /// 終局への到達回数を加算する。
    pub(super) const fn inc_terminals(&mut self) {
        self.terminals = self.terminals.wrapping_add(1);
    }

    /// 着手の適用回数を返す。
    #[inline]
    #[must_use]
    pub const fn nodes(&self) -> u64 {
        self.nodes
    }

    /// 終局への到達回数を返す。
    #[inline]
    #[must_use]
    pub const fn terminals(&self) -> u64 {
        self.terminals
    }
}

/// 1回の探索で共有するコンテキスト。
#[derive(Debug)]
pub(super) struct SearchContext<M> {
    /// 探索の設定。
    config: SearchConfig,
    /// ルートの候補手ごとの評価値（列挙順）。
    root_scores: Vec<(M, i32)>,
    /// 探索統計。
    stats: SearchStats,
}

impl<M> SearchContext<M> {
    /// 探索の設定を返す。
    pub(super) const fn config(&self) -> SearchConfig {
        self.config
    }

    /// ルートの候補手の評価値を保存する。
    pub(super) fn record_root(&mut self, mv: M, score: i32) {
        self.root_scores.push((mv, score));
    }

    /// 探索コンテキストを生成する。
    pub(super) const fn new(config: SearchConfig) -> Self {
        Self {
            config,
            root_scores: Vec::new(),
            stats: SearchStats {
                horizon_evaluations: 0,
                nodes: 0,
                terminals: 0,
            },
        }
    }

    /// 探索統計への可変参照を返す。
    pub(super) const fn stats_mut(&mut self) -> &mut SearchStats {
        &mut self.stats
    }

    /// ルートの評価値と探索統計を取り出す。
    pub(super) fn into_parts(self) -> (Vec<(M, i32)>, SearchStats) {
        (self.root_scores, self.stats)
    }
}
