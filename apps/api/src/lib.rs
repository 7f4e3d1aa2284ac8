//! # PlugGate API サーバーライブラリ
//!
//! プラグインルーターをホストする HTTP サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `config`: 環境変数からの設定読み込み
//! - `cors`: CORS ポリシー
//! - `error`: エラー定義と HTTP レスポンスへの変換
//! - `lifecycle`: 起動・終了フックの登録と実行
//! - `app_builder`: ルーター構築（ミドルウェア適用とプラグインのマウント）
//! - `server`: リスナーのバインドと graceful shutdown

pub mod app_builder;
pub mod config;
pub mod cors;
pub mod error;
pub mod lifecycle;
pub mod server;
