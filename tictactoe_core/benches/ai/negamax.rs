//! `ai::negamax` の性能計測（深さ別の1手選択）。

use core::hint::black_box;
use criterion::BenchmarkId;
use criterion::Criterion;
use std::sync::Arc;
use tictactoe_core::ai::negamax::{DEFAULT_MAX_SEARCH_DEPTH, EXHAUSTIVE_SEARCH_DEPTH};
use tictactoe_core::ai::types::{Ai as _, GameState as _};
use tictactoe_core::{ai, engine};

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    let base = Criterion::default();
    base.configure_from_args()
}

/// 空の盤面と、中央・隅を打った後の盤面を返す。
fn board_samples() -> Vec<engine::Board> {
    let ids = Arc::new(engine::IdGenerator::new());
    let x = ids.player(engine::Mark::X, engine::PlayerKind::Engine);
    let o = ids.player(engine::Mark::O, engine::PlayerKind::Engine);
    let Ok(empty) = engine::Board::new(&ids, x, o) else {
        return Vec::new();
    };

    let mut opened = empty.clone();
    let _ = opened.apply(engine::Cell::Center);
    let _ = opened.apply(engine::Cell::NorthWest);
    vec![empty, opened]
}

/// `negamax::Agent::select_move` を計測する。
fn bench_select_move(criterion: &mut Criterion) {
    let samples = board_samples();
    let mut group = criterion.benchmark_group("ai/negamax/select_move");
    group.sample_size(10);

    for depth in [1, 2, DEFAULT_MAX_SEARCH_DEPTH, EXHAUSTIVE_SEARCH_DEPTH] {
        for board in &samples {
            let bench_id = BenchmarkId::new(format!("depth{depth}"), board.ply());
            group.bench_with_input(bench_id, board, |bench, input| {
                let mut agent = ai::negamax::Agent::new(depth);
                bench.iter(|| black_box(agent.select_move(input)));
            });
        }
    }

    group.finish();
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();
    bench_select_move(&mut criterion);
    criterion.final_summary();
}
