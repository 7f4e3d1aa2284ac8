//! # CORS ポリシー
//!
//! 全ルートに適用する静的な CORS ポリシーを定義する。
//! ポリシーはプロセス起動時に固定され、実行中に変化しない。
//! プリフライト（OPTIONS）リクエストはこのレイヤーが応答し、
//! プラグインルーターには到達しない。

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// 許可するオリジンの一覧
///
/// FIXME: リストに `"*"` が含まれるため、実質すべてのオリジンを許可した上で
///        credentials を有効にしている。ブラウザ仕様ではワイルドカードと
///        credentials の併用は認められない組み合わせであり、許可するオリジンを
///        明示的な列挙に絞るか credentials を無効にするか、どちらかに寄せる
///        必要がある。互換性維持のため現時点では既存の許可内容を変えていない。
const ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost",
    "http://localhost:3000",
    "http://localhost:8000",
    "*",
];

/// 静的な CORS レイヤーを構築する
///
/// - オリジン: [`ALLOWED_ORIGINS`] に一致するもの（`"*"` を含むため全許可、
///   レスポンスにはリクエストのオリジンをそのまま返す）
/// - credentials: 許可
/// - メソッド: 全メソッド
/// - ヘッダー: プリフライトで要求されたヘッダーをそのまま許可
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            ALLOWED_ORIGINS
                .iter()
                .any(|allowed| *allowed == "*" || origin.as_bytes() == allowed.as_bytes())
        }))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}
