//! # メール送信コマンド
//!
//! 環境変数の接続設定と引数の送信内容から、メールを 1 通送信する。
//!
//! ## 環境変数
//!
//! 接続設定は [`config`](mailgate_dispatch::config) を参照。
//! ログ出力は `LOG_FORMAT`（`json` / `pretty`）と `RUST_LOG` で制御する。
//!
//! ## 実行方法
//!
//! ```bash
//! MAIL_HOST=smtp.example.com MAIL_USERNAME=u MAIL_PASSWORD=p \
//!   cargo run -p mailgate-dispatch -- \
//!     --from cedric@prof.dev --from-name "Cédric Prof" \
//!     --to cda@3wa.dev --subject "Envoi de mail" --body "<strong>HTML</strong>"
//! ```

use anyhow::Context as _;
use clap::Parser;
use mailgate_dispatch::{cli::Args, config::DispatchConfig, usecase::DispatchService};
use mailgate_infra::TransportFactory;
use mailgate_shared::observability::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env();
    init_tracing(&tracing_config).context("トレーシングの初期化に失敗しました")?;
    if let Some(rejected) = &tracing_config.rejected_format {
        tracing::warn!("LOG_FORMAT の値 {rejected:?} は無効です。pretty を使用します");
    }

    let args = Args::parse();

    let mut config = DispatchConfig::from_env().context("設定の読み込みに失敗しました")?;
    if let Some(kind) = args
        .transport_override()
        .context("--transport の値が不正です")?
    {
        config.transport_kind = kind;
    }

    let (from, to) = args.addresses().context("メールアドレスが不正です")?;
    let content = args.content();

    let transport = TransportFactory::create(&config.transport, config.transport_kind)
        .context("送信バックエンドの生成に失敗しました")?;
    let service = DispatchService::new(transport);

    service
        .send(&from, &to, &content)
        .await
        .with_context(|| format!("{} への送信に失敗しました", to.email()))?;

    tracing::info!(
        backend = %config.transport_kind,
        to = %to.email(),
        "送信が完了しました"
    );

    Ok(())
}
