//! `ai::random` の性能計測（1手選択）。

use core::hint::black_box;
use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::Criterion;
use std::sync::Arc;
use tictactoe_core::ai::types::{Ai as _, GameState as _};
use tictactoe_core::{ai, engine};

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    let base = Criterion::default();
    base.configure_from_args()
}

/// 指定手数だけランダムに進めた盤面を返す（途中で終局した場合はその時点で止める）。
fn board_after_plies(plies: u8) -> Option<engine::Board> {
    let ids = Arc::new(engine::IdGenerator::new());
    let x = ids.player(engine::Mark::X, engine::PlayerKind::Engine);
    let o = ids.player(engine::Mark::O, engine::PlayerKind::Engine);
    let mut board = engine::Board::new(&ids, x, o).ok()?;
    let mut agent = ai::random::Agent::new(u64::MIN);

    for _ply in u8::MIN..plies {
        let Some(cell) = agent.select_move(&board) else {
            break;
        };
        if board.apply(cell).terminal() {
            break;
        }
    }
    Some(board)
}

/// `random::Agent::select_move` を計測する。
fn bench_select_move(criterion: &mut Criterion) {
    let samples: Vec<engine::Board> = [0, 2, 4].into_iter().filter_map(board_after_plies).collect();
    let mut group = criterion.benchmark_group("ai/random/select_move");

    for (index, board) in samples.iter().enumerate() {
        let bench_id = BenchmarkId::new("pos", index);
        group.bench_with_input(bench_id, board, |bench, input| {
            bench.iter_batched(
                || ai::random::Agent::new(u64::MIN),
                |mut agent| black_box(agent.select_move(input)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();
    bench_select_move(&mut criterion);
    criterion.final_summary();
}
