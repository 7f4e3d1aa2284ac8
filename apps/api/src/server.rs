//! # サーバー起動と graceful shutdown
//!
//! リスナーのバインド、起動フックの実行、終了シグナルの受信、
//! 処理中リクエストのドレインを担当する。
//!
//! ## 終了シーケンス
//!
//! 1. SIGINT / SIGTERM を受信する
//! 2. リスナーが新規接続の受付を停止する
//! 3. 処理中のリクエストの完了を猶予時間まで待つ（超過分は中断）
//! 4. 終了フックを実行する

use std::{future::Future, net::SocketAddr, time::Duration};

use anyhow::Context as _;
use axum::Router;
use tokio::net::TcpListener;

use crate::{config::ApiConfig, lifecycle::Lifecycle};

/// 終了シグナル受信後、処理中のリクエストの完了を待つ猶予時間
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// 設定のアドレスにバインドし、終了シグナルまでサーバーを実行する
///
/// プロセスのエントリーポイントから呼ばれ、終了シグナル受信と
/// ドレイン完了まで戻らない。
pub async fn run(config: &ApiConfig, app: Router, lifecycle: Lifecycle) -> anyhow::Result<()> {
    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} へのバインドに失敗しました"))?;

    serve(listener, app, lifecycle, shutdown_signal()).await
}

/// バインド済みリスナーでサーバーを実行する
///
/// `shutdown` が完了すると終了シーケンスに入る。テストからは
/// 任意のトリガーを渡して終了を制御できる。
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mut lifecycle: Lifecycle,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    // 起動フックは最初の accept より前に完了させる。
    // 失敗した場合はリクエストを一件も受け付けずに終了する。
    lifecycle.startup().await?;

    let addr = listener.local_addr()?;
    tracing::info!("サーバーが起動しました: {}", addr);

    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .await
    });

    let served: anyhow::Result<()> = tokio::select! {
        _ = shutdown => {
            tracing::info!("終了シグナルを受信しました。新規接続の受付を停止します");
            let _ = drain_tx.send(());

            match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
                Ok(joined) => joined
                    .context("サーバータスクが異常終了しました")?
                    .map_err(anyhow::Error::from),
                Err(_) => {
                    tracing::warn!(
                        "猶予時間 {:?} を超過したため、処理中のリクエストを中断します",
                        SHUTDOWN_GRACE
                    );
                    server.abort();
                    Ok(())
                }
            }
        }
        // 終了シグナルより前にサーバータスクが終了した場合（accept エラー等）
        joined = &mut server => {
            joined
                .context("サーバータスクが異常終了しました")?
                .map_err(anyhow::Error::from)
        }
    };

    lifecycle.shutdown().await;
    tracing::info!("サーバーを停止しました");
    served
}

/// SIGINT（Ctrl+C）または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("SIGINT ハンドラの登録に失敗しました");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM ハンドラの登録に失敗しました")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
