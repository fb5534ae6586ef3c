use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::ai::types::GameState;

use super::limits::SearchContext;

/// ルートの探索深さ。
pub(super) const ROOT_DEPTH: u8 = 1;

/// ネガマックス（枝刈りなし）。
///
/// `state` の手番側から見た最善手とその評価値を返す。合法手が無ければ `None`。
/// 同点の手は列挙順で最初のものを選ぶ。`state` 自体は変更しない。
pub(super) fn search<G: GameState>(
    state: &G,
    depth: u8,
    ctx: &mut SearchContext<G::Move>,
) -> Option<(G::Move, i32)> {
    let moves = state.available_moves()?;
    let (&first, rest) = moves.split_first()?;

    let config = ctx.config();
    if rest.is_empty() && config.single_move_shortcut() {
        if depth == ROOT_DEPTH {
            ctx.record_root(first, 0);
        }
        return Some((first, 0));
    }

    let mut best_score = i32::MIN;
    let mut best_moves: Vec<G::Move> = Vec::with_capacity(moves.len());

    // 兄弟ノードの探索には同じ作業用盤面を使い回す。
    let mut trial = state.fork();

    for &mv in &moves {
        trial.reset_to(state);
        ctx.stats_mut().inc_nodes();
        let outcome = trial.apply(mv);

        let score = if outcome.terminal() {
            ctx.stats_mut().inc_terminals();
            outcome.value()
        } else if depth < config.max_search_depth() {
            match search(&*trial, depth.saturating_add(1), ctx) {
                Some((_, child_score)) => child_score.wrapping_neg(),
                None => outcome.value(),
            }
        } else {
            ctx.stats_mut().inc_horizon_evaluations();
            outcome.value()
        };

        if depth == ROOT_DEPTH {
            tracing::debug!(candidate = %mv, score, "root move evaluated");
            ctx.record_root(mv, score);
        }

        match score.cmp(&best_score) {
            Ordering::Greater => {
                best_moves.clear();
                best_moves.push(mv);
                best_score = score;
            }
            Ordering::Equal => best_moves.push(mv),
            Ordering::Less => {}
        }
    }

    best_moves.first().map(|&mv| (mv, best_score))
}
