//! # ライフサイクルフック
//!
//! サーバープロセスの起動・終了時に一度だけ実行されるフックの
//! 登録と実行を提供する。
//!
//! ## フェーズ
//!
//! プロセスは以下のフェーズを厳密にこの順で遷移する。遷移のトリガーは
//! プロセスレベルのイベント（起動・終了シグナル）のみで、リクエスト処理が
//! フェーズを動かすことはない。
//!
//! ```text
//! Uninitialized → Starting → Serving → Draining → Stopped
//!                （起動フック）        （終了フック）
//! ```
//!
//! ## 実行規則
//!
//! - フックは登録順に実行され、各フックの完了を待ってから次に進む
//! - 起動フックの失敗は致命的で、サーバーはリクエストの受付を開始しない
//! - 終了フックの失敗はログに残すのみで、残りのフックは実行を続ける
//!   （プロセスはすでに終了中のため）

use std::{future::Future, pin::Pin};

use anyhow::Context as _;

/// フックが返す Future
type HookFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// 登録済みフック（名前つき）
type Hook = Box<dyn FnOnce() -> HookFuture + Send>;

/// プロセスのライフサイクルフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// 起動前
    #[default]
    Uninitialized,
    /// 起動フック実行中
    Starting,
    /// リクエスト受付中
    Serving,
    /// 終了フック実行中（新規接続の受付は停止済み）
    Draining,
    /// 停止済み
    Stopped,
}

/// 起動・終了フックのレジストリ
///
/// フックはリクエスト処理の並行ウィンドウの外で実行される:
/// 起動フックは最初のリクエスト受付前に完了し、終了フックは
/// リスナーが受付を停止し処理中のリクエストが捌けた後に実行される。
#[derive(Default)]
pub struct Lifecycle {
    startup_hooks:  Vec<(String, Hook)>,
    shutdown_hooks: Vec<(String, Hook)>,
    phase: Phase,
}

impl Lifecycle {
    /// 空のレジストリを作成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 起動フックを登録する
    ///
    /// 名前はログとエラーメッセージに使われる。
    pub fn on_startup<F, Fut>(&mut self, name: impl Into<String>, hook: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.startup_hooks
            .push((name.into(), Box::new(move || Box::pin(hook()))));
    }

    /// 終了フックを登録する
    pub fn on_shutdown<F, Fut>(&mut self, name: impl Into<String>, hook: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.shutdown_hooks
            .push((name.into(), Box::new(move || Box::pin(hook()))));
    }

    /// 起動フックを登録順に実行する
    ///
    /// 最初に失敗したフックで中断し、エラーを返す。呼び出し側は
    /// このエラーを致命的として扱い、リクエストの受付を開始してはならない。
    pub async fn startup(&mut self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.phase == Phase::Uninitialized,
            "起動フックは一度しか実行できません（現在のフェーズ: {:?}）",
            self.phase
        );
        self.phase = Phase::Starting;

        for (name, hook) in self.startup_hooks.drain(..) {
            hook()
                .await
                .with_context(|| format!("起動フック {name:?} が失敗しました"))?;
            tracing::debug!(hook = %name, "起動フックが完了しました");
        }

        self.phase = Phase::Serving;
        Ok(())
    }

    /// 終了フックを登録順に実行する
    ///
    /// フックの失敗は warn ログに残すのみで、残りのフックは実行を続ける。
    pub async fn shutdown(&mut self) {
        self.phase = Phase::Draining;

        for (name, hook) in self.shutdown_hooks.drain(..) {
            match hook().await {
                Ok(()) => tracing::debug!(hook = %name, "終了フックが完了しました"),
                Err(e) => {
                    tracing::warn!(hook = %name, error = %e, "終了フックが失敗しました");
                }
            }
        }

        self.phase = Phase::Stopped;
    }

    /// 現在のフェーズ
    pub fn phase(&self) -> Phase {
        self.phase
    }
}
