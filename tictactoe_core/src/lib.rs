//! Tic-tac-toe core logic.
//!
//! このクレートは盤面と対局の規則を管理する `engine`、手を選択する `ai`、
//! UI から対局を進行させるための `session` を提供します。
//! 描画や入力処理は持たず、`tictactoe_cli` などのフロントエンドから利用されることを想定しています。

#![forbid(unsafe_code)]

extern crate alloc;

/// ゲームルール・盤面・進行を提供するモジュール。
pub mod engine;

/// AI（手選択アルゴリズム）を提供するモジュール。
pub mod ai;

/// 対局の進行（着席、人間の着手、AI の非同期思考、再戦）を提供するモジュール。
pub mod session;
