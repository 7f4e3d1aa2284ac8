//! # プラグインルーター
//!
//! ブートストラップ（`pluggate-api`）にマウントされるルート群を提供する。
//!
//! ## 役割
//!
//! ブートストラップ側はこのクレートの [`router`] を API プレフィックス配下に
//! ネストするだけで、内部のルート構成・ハンドラ実装には関知しない。
//! プラグインのエンドポイントを追加する場合は、このクレートにハンドラを
//! 実装して [`router`] に登録する。
//!
//! ## 現在のルート
//!
//! | パス | メソッド | 説明 |
//! |------|----------|------|
//! | `/ping` | GET | プラグインの疎通確認 |

use axum::{Json, Router, routing::get};
use serde::Serialize;

/// プラグインの全ルートを束ねたルーターを返す
///
/// 返されるルーターはプレフィックスを持たない。マウント先のプレフィックスは
/// ブートストラップ側の設定（`API_PREFIX`）で決まる。
pub fn router() -> Router {
    Router::new().route("/ping", get(ping))
}

/// 疎通確認レスポンス
#[derive(Debug, Serialize)]
struct PingResponse {
    status:  &'static str,
    version: &'static str,
}

/// プラグインの疎通確認エンドポイント
async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status:  "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
