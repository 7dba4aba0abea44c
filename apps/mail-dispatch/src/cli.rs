//! # コマンドライン引数
//!
//! 1 通分の送信内容を引数から受け取る。

use clap::Parser;
use mailgate_domain::{
    InvalidAddress,
    UnknownTransportType,
    mail::{EmailAddress, EmailContent},
    transport::TransportKind,
};

/// メールを 1 通送信する
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "mailgate-dispatch", version, about)]
pub struct Args {
    /// 差出人のメールアドレス
    #[arg(long)]
    pub from: String,

    /// 差出人の表示名
    #[arg(long, default_value = "")]
    pub from_name: String,

    /// 宛先のメールアドレス
    #[arg(long)]
    pub to: String,

    /// 宛先の表示名
    #[arg(long, default_value = "")]
    pub to_name: String,

    /// 件名
    #[arg(long)]
    pub subject: String,

    /// 本文
    #[arg(long)]
    pub body: String,

    /// 本文をプレーンテキストとして送る（省略時は HTML）
    #[arg(long)]
    pub plain_text: bool,

    /// 送信バックエンド種別（`MAIL_TRANSPORT` より優先）
    #[arg(long)]
    pub transport: Option<String>,
}

impl Args {
    /// 差出人と宛先を検証済みのアドレスに変換する
    pub fn addresses(&self) -> Result<(EmailAddress, EmailAddress), InvalidAddress> {
        let from = EmailAddress::new(&self.from, &self.from_name)?;
        let to = EmailAddress::new(&self.to, &self.to_name)?;
        Ok((from, to))
    }

    pub fn content(&self) -> EmailContent {
        EmailContent::with_format(&self.subject, &self.body, !self.plain_text)
    }

    /// 引数で指定された送信バックエンド種別
    ///
    /// 指定がなければ `None` を返し、環境変数の値を使わせる。
    pub fn transport_override(&self) -> Result<Option<TransportKind>, UnknownTransportType> {
        self.transport
            .as_deref()
            .map(TransportKind::parse)
            .transpose()
    }
}
