//! # ライフサイクル境界のテスト
//!
//! 実際のリスナーを使い、フックがリクエスト処理の並行ウィンドウの
//! 外側で実行されることを検証する。
//!
//! - 起動フックは最初のリクエスト受付前に完了する
//! - 終了シグナル時点で処理中のリクエストはレスポンスを受け取る
//! - 終了フックはドレイン完了後に実行される
//! - 起動フックの失敗でサーバーは受付を開始しない

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use axum::{Router, routing::get};
use http::StatusCode;
use pluggate_api::{app_builder::build_app, config::ApiConfig, lifecycle::Lifecycle, server};
use tokio::{net::TcpListener, sync::oneshot, time::sleep};

/// テスト用の設定（ポートは実際には使わず、リスナーは別途バインドする）
fn test_config() -> ApiConfig {
    ApiConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 8000,
        api_prefix: "/api/v1".to_string(),
    }
}

#[tokio::test]
async fn test_起動フック完了前のリクエストはウォームアップ後の状態を観測する() {
    let warmed = Arc::new(AtomicBool::new(false));

    let flag = warmed.clone();
    let mut lifecycle = Lifecycle::new();
    lifecycle.on_startup("warm-up", move || async move {
        sleep(Duration::from_millis(200)).await;
        flag.store(true, Ordering::SeqCst);
        Ok(())
    });

    let flag = warmed.clone();
    let plugin = Router::new().route(
        "/ready",
        get(move || {
            let flag = flag.clone();
            async move {
                if flag.load(Ordering::SeqCst) {
                    "warm"
                } else {
                    "cold"
                }
            }
        }),
    );

    let app = build_app(&test_config(), plugin);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server_task = tokio::spawn(server::serve(listener, app, lifecycle, async move {
        let _ = stop_rx.await;
    }));

    // 起動フック実行中に接続する。accept は起動フック完了後に始まるため、
    // このリクエストがウォームアップ前の状態を観測することはない。
    let body = reqwest::get(format!("http://{addr}/api/v1/ready"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "warm");

    let _ = stop_tx.send(());
    server_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_処理中のリクエストが完了してから終了フックが実行される() {
    let events = Arc::new(Mutex::new(Vec::<&'static str>::new()));

    let log = events.clone();
    let plugin = Router::new().route(
        "/slow",
        get(move || {
            let log = log.clone();
            async move {
                sleep(Duration::from_millis(300)).await;
                log.lock().unwrap().push("handler-done");
                "done"
            }
        }),
    );

    let log = events.clone();
    let mut lifecycle = Lifecycle::new();
    lifecycle.on_shutdown("release-resources", move || async move {
        log.lock().unwrap().push("shutdown-hook");
        Ok(())
    });

    let app = build_app(&test_config(), plugin);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server_task = tokio::spawn(server::serve(listener, app, lifecycle, async move {
        let _ = stop_rx.await;
    }));

    // リクエストが処理中になったタイミングで終了シグナルを送る
    let request_task =
        tokio::spawn(
            async move { reqwest::get(format!("http://{addr}/api/v1/slow")).await.unwrap() },
        );
    sleep(Duration::from_millis(100)).await;
    let _ = stop_tx.send(());

    // 処理中だったリクエストはレスポンスを受け取る
    let response = request_task.await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    server_task.await.unwrap().unwrap();

    // ハンドラ完了 → 終了フックの順で実行されたこと
    assert_eq!(
        *events.lock().unwrap(),
        vec!["handler-done", "shutdown-hook"]
    );
}

#[tokio::test]
async fn test_起動フックの失敗でサーバーは受付を開始しない() {
    let shutdown_ran = Arc::new(AtomicBool::new(false));

    let mut lifecycle = Lifecycle::new();
    lifecycle.on_startup("failing", || async { anyhow::bail!("初期化に失敗") });
    let flag = shutdown_ran.clone();
    lifecycle.on_shutdown("release-resources", move || async move {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    });

    let plugin = Router::new().route("/ping", get(|| async { "pong" }));
    let app = build_app(&test_config(), plugin);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

    let result = server::serve(listener, app, lifecycle, std::future::pending()).await;

    let error = result.unwrap_err();
    assert!(error.to_string().contains("failing"));
    // 受付を開始していないため、終了フックも実行されない
    assert!(!shutdown_ran.load(Ordering::SeqCst));
}
