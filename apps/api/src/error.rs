//! # API エラーハンドリング
//!
//! ルート横断で使う唯一のエラー型と、HTTP レスポンスへの変換を定義する。
//!
//! ## 設計
//!
//! - ステータスコードと詳細メッセージを持つエラーはすべて [`ApiError`] で表現し、
//!   レスポンスへの整形はこのモジュールに集約する。個々のルートが独自の
//!   エラー整形を持つことはない。
//! - ボディは常に `{"detail": "<メッセージ>"}`（[`ErrorResponse`]）。
//! - ステータスコードを持たないエラー（`anyhow::Error`）は 500 に変換し、
//!   詳細はログにのみ残す（内部情報をレスポンスに漏らさない）。

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use pluggate_shared::ErrorResponse;
use thiserror::Error;

/// シリアライズに失敗した場合のフォールバックボディ
///
/// [`ErrorResponse`] は文字列フィールドのみでシリアライズは失敗しないが、
/// エラー変換器自身は決して失敗してはならないため、固定ボディを用意しておく。
const FALLBACK_BODY: &str = r#"{"detail":"内部エラーが発生しました"}"#;

/// API 全体で使うエラー
///
/// ステータスコードと人間が読める詳細メッセージを運ぶ。
/// `IntoResponse` を実装しているため、ハンドラが `Err(ApiError)` を返すと
/// axum が自動的に HTTP レスポンスへ変換する。
#[derive(Debug, Error)]
#[error("{status}: {detail}")]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    /// 任意のステータスコードと詳細メッセージからエラーを作成する
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    /// 401 Unauthorized
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    /// 403 Forbidden
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    /// 404 Not Found
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    /// 409 Conflict
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, detail)
    }

    /// 503 Service Unavailable
    pub fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, detail)
    }

    /// 500 Internal Server Error
    ///
    /// detail は固定値（内部情報を漏らさないため）。
    pub fn internal_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "内部エラーが発生しました",
        )
    }

    /// このエラーのステータスコード
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// このエラーの詳細メッセージ
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::to_string(&ErrorResponse::new(self.detail))
            .unwrap_or_else(|_| FALLBACK_BODY.to_string());

        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // 内部エラーの詳細はログのみに残す
        tracing::error!("内部エラー: {:?}", err);
        Self::internal_error()
    }
}
