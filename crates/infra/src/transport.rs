//! # メール送信
//!
//! 1 通のメールを送信バックエンドに引き渡すトレイトと、その実装群。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `Transport` trait で送信方法を抽象化
//! - **2 つの実装**: どちらも SMTP サーバーへの送信で、使う送信ライブラリだけが異なる
//!   - [`LettreTransport`]: lettre の `AsyncSmtpTransport`
//!   - [`MailSendTransport`]: mail-builder でメッセージを組み立て、mail-send の `SmtpClient` で送信
//! - **一様なエラー**: 送信ライブラリのエラーは必ず [`DeliveryError`] に変換して返す
//! - **期限**: [`DeadlineTransport`] で任意の実装に送信期限を付けられる

mod deadline;
mod lettre_smtp;
mod mail_send_smtp;

use std::error::Error;

use async_trait::async_trait;
pub use deadline::DeadlineTransport;
pub use lettre_smtp::{LettreTransport, SmtpErrorCode};
pub use mail_send_smtp::{MailSendClient, MailSendTransport, SmtpSubmitter, SubmitError};
use mailgate_domain::{
    DeliveryError,
    mail::{EmailAddress, EmailContent},
};

/// メール送信トレイト
///
/// 送信基盤の中核。送信元・宛先・内容を受け取り、1 通のメールを送信する。
///
/// 成功は「送信ライブラリが受け付けた」ことを意味し、相手への到達は保証しない。
/// アドレスは生成時に検証済みのため、実装側で再検証しない。
#[async_trait]
pub trait Transport: Send + Sync {
    /// メールを送信する
    async fn send(
        &self,
        from: &EmailAddress,
        to: &EmailAddress,
        content: &EmailContent,
    ) -> Result<(), DeliveryError>;
}

/// エラーとその原因（`source()`）をつなげたメッセージを作る
///
/// 接続失敗などは原因側にしか詳細がないため、最後までたどる。
/// 上位の表示に既に含まれている原因は繰り返さない。
pub(crate) fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
