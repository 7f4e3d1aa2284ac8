//! # PlugGate API サーバー
//!
//! プラグインルーターをホストする HTTP API サーバー。
//!
//! ## 役割
//!
//! このバイナリはサーバーの「外殻」のみを担当する:
//!
//! - **CORS**: 全ルートへの静的な CORS ポリシーの適用
//! - **ライフサイクル**: 起動・終了フックの実行（リクエスト処理の外側）
//! - **マウント**: プラグインルーターのプレフィックス配下への接続
//! - **エラー整形**: 全ルート共通の `{"detail": ...}` レスポンス
//!
//! リクエスト処理の実体はプラグインルーター（`pluggate-plugin`）が持ち、
//! この外殻はその内部構成に関知しない。
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────────────────┐
//! │   Client     │────▶│  PlugGate API                │
//! └──────────────┘     │  ┌────────────────────────┐  │
//!                      │  │ CORS / Trace / ReqID   │  │
//!                      │  │  ┌──────────────────┐  │  │
//!                      │  │  │ {API_PREFIX}/... │  │  │
//!                      │  │  │ plugin router    │  │  │
//!                      │  │  └──────────────────┘  │  │
//!                      │  └────────────────────────┘  │
//!                      └──────────────────────────────┘
//! ```
//!
//! ## 環境変数
//!
//! すべて任意（デフォルトあり）。`.env` ファイルがあれば読み込む。
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|------------|------|
//! | `SERVER_HOST` | `0.0.0.0` | バインドアドレス |
//! | `APP_PORT` | `8000` | ポート番号 |
//! | `API_PREFIX` | `/api/v1` | プラグインルーターのマウントプレフィックス |
//! | `LOG_FORMAT` | `pretty` | ログ出力形式（`json` / `pretty`） |
//! | `RUST_LOG` | `info,pluggate_api=debug` | ログレベル |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p pluggate-api
//!
//! # 本番環境
//! APP_PORT=8000 LOG_FORMAT=json cargo run -p pluggate-api --release
//! ```

use anyhow::Context as _;
use pluggate_api::{app_builder::build_app, config::ApiConfig, lifecycle::Lifecycle, server};
use pluggate_shared::observability::{self, TracingConfig};

/// API サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み（不正な値は起動を中断）
/// 4. ライフサイクルフックの登録
/// 5. ルーターの構築と HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("api");
    observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "api").entered();

    // 設定読み込み
    // 不正なホスト・ポートはここで致命的エラーになり、バインドまで進まない
    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "API サーバーを起動します: {}:{} (prefix: {})",
        config.host,
        config.port,
        config.api_prefix
    );

    // ライフサイクルフック登録
    // 起動フックは最初のリクエスト受付前に、終了フックはドレイン完了後に実行される
    let mut lifecycle = Lifecycle::new();
    lifecycle.on_startup("warm-up", || async {
        tracing::info!("ウォームアップを実行します");
        Ok(())
    });
    lifecycle.on_shutdown("release-resources", || async {
        // プラグインが起動時に確保したリソースはこの時点で解放される
        tracing::info!("リソースを解放します");
        Ok(())
    });

    // ルーター構築
    let app = build_app(&config, pluggate_plugin::router());

    // サーバー起動（終了シグナルまで戻らない）
    server::run(&config, app, lifecycle).await
}
