//! # アプリケーション構築
//!
//! ミドルウェアの適用とプラグインルーターのマウントを担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use axum::Router;
use pluggate_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{config::ApiConfig, cors::cors_layer};

/// プラグインルーターを設定のプレフィックス配下にマウントし、
/// 横断的なミドルウェアを適用したルーターを構築する
///
/// このモジュール自身はルートを一切定義しない。HTTP サーフェスは
/// すべてプラグインルーターのもので、ここではプレフィックスの適用と
/// ミドルウェアの積み上げだけを保証する。
pub fn build_app(config: &ApiConfig, plugin_router: Router) -> Router {
    // レイヤー順序が重要: 下に書いたものが外側
    // 1. SetRequestIdLayer（最外）: リクエスト受信時に UUID v7 を生成
    // 2. TraceLayer: スパンに request_id を含め、全ログに自動注入
    // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
    // 4. CorsLayer: プリフライト応答と CORS ヘッダー付与（エラー応答にも適用）
    Router::new()
        .nest(&config.api_prefix, plugin_router)
        .layer(cors_layer())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
