//! # エラー変換のテスト
//!
//! ハンドラが返したエラーが、中央のエラー変換器によって
//! 「元のステータスコード + `{"detail": ...}` ボディ」へ
//! 整形されることを検証する。

use axum::{Json, Router, body::Body, response::Response, routing::get};
use http::{Request, StatusCode, header};
use pluggate_api::{app_builder::build_app, config::ApiConfig, error::ApiError};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

/// テスト用の設定（デフォルトと同じ値）
fn test_config() -> ApiConfig {
    ApiConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 8000,
        api_prefix: "/api/v1".to_string(),
    }
}

/// 404 を返すハンドラ
async fn missing() -> Result<Json<serde_json::Value>, ApiError> {
    Err(ApiError::not_found("not found"))
}

/// 独自ステータスコードを返すハンドラ
async fn teapot() -> Result<Json<serde_json::Value>, ApiError> {
    Err(ApiError::new(StatusCode::IM_A_TEAPOT, "お茶は淹れられません"))
}

/// ステータスコードを持たない内部エラーを返すハンドラ
async fn broken() -> Result<Json<serde_json::Value>, ApiError> {
    Err(anyhow::anyhow!("接続プールが初期化されていない").into())
}

/// テスト対象のアプリケーションを構築する
fn test_app() -> Router {
    let plugin = Router::new()
        .route("/missing", get(missing))
        .route("/teapot", get(teapot))
        .route("/broken", get(broken));
    build_app(&test_config(), plugin)
}

/// レスポンスボディを JSON として取り出す
async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_404エラーがステータスとdetailボディに変換される() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"detail": "not found"})
    );
}

#[tokio::test]
async fn test_任意のステータスコードが維持される() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/teapot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"detail": "お茶は淹れられません"})
    );
}

#[tokio::test]
async fn test_ステータスを持たないエラーは500と固定detailになる() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/broken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    // 内部情報がレスポンスに漏れないこと
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"detail": "内部エラーが発生しました"})
    );
}

#[tokio::test]
async fn test_エラー応答にもcorsヘッダーが付与される() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/missing")
                .header(header::ORIGIN, "https://app.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://app.example.com"
    );
}
