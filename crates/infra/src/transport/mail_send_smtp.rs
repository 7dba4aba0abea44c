//! mail-send による SMTP 送信実装
//!
//! 送信処理は 2 段階に分かれる:
//!
//! 1. [`MailSendTransport`] が mail-builder の `MessageBuilder` でメッセージを組み立てる
//! 2. [`SmtpSubmitter`] がそれを SMTP サーバーに送信する
//!
//! `SmtpSubmitter` はテスト時にフェイクへ差し替え可能。

use async_trait::async_trait;
use mail_send::{
    SmtpClientBuilder,
    mail_builder::{MessageBuilder, headers::address::Address},
};
use mailgate_domain::{
    DeliveryError,
    TransportInitError,
    mail::{EmailAddress, EmailContent},
    transport::{TlsMode, TransportConfig},
};
use thiserror::Error;

use super::{Transport, error_chain};

/// SMTP 送信のエラー
///
/// 送信ライブラリのエラー型を外に出さないための中間表現。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmitError {
    /// SMTP 応答コード（例: `"550"`）。サーバー応答由来でないエラーは `None`
    pub code:    Option<String>,
    pub message: String,
}

impl From<mail_send::Error> for SubmitError {
    fn from(error: mail_send::Error) -> Self {
        let code = match &error {
            mail_send::Error::UnexpectedReply(reply)
            | mail_send::Error::AuthenticationFailed(reply) => Some(reply.code.to_string()),
            _ => None,
        };
        Self {
            code,
            message: error_chain(&error),
        }
    }
}

/// 組み立て済みメッセージを SMTP サーバーに送信するクライアント
#[async_trait]
pub trait SmtpSubmitter: Send + Sync {
    /// メッセージを 1 通送信する
    ///
    /// エンベロープの送信元・宛先はメッセージの `From` / `To` ヘッダーから決まる。
    async fn submit(&self, message: MessageBuilder<'_>) -> Result<(), SubmitError>;
}

/// `mail_send::SmtpClientBuilder` による [`SmtpSubmitter`] 実装
///
/// 送信のたびに接続し、送信後に切断する。
pub struct MailSendClient {
    builder: SmtpClientBuilder<String>,
    tls:     TlsMode,
}

impl MailSendClient {
    /// 接続設定から SMTP クライアントを作成する
    ///
    /// ユーザー名が空の場合は認証を行わない。
    /// 接続は送信時に確立されるため、生成時にネットワークへはアクセスしない。
    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportInitError> {
        config.validate()?;

        let builder = SmtpClientBuilder::new(config.host().to_string(), config.port())
            .implicit_tls(config.tls() == TlsMode::Implicit);
        let builder = if config.username().is_empty() {
            builder
        } else {
            builder.credentials((config.username().to_string(), config.password().to_string()))
        };

        tracing::debug!(
            host = %config.host(),
            port = config.port(),
            tls = %config.tls(),
            "mail-send クライアントを初期化"
        );

        Ok(Self {
            builder,
            tls: config.tls(),
        })
    }
}

#[async_trait]
impl SmtpSubmitter for MailSendClient {
    async fn submit(&self, message: MessageBuilder<'_>) -> Result<(), SubmitError> {
        match self.tls {
            TlsMode::Disabled => {
                let mut client = self.builder.connect_plain().await?;
                client.send(message).await?;
            }
            TlsMode::StartTls | TlsMode::Implicit => {
                let mut client = self.builder.connect().await?;
                client.send(message).await?;
            }
        }
        Ok(())
    }
}

/// mail-send による SMTP 送信
///
/// [`SmtpSubmitter`] をラップし、ドメインの値を `MessageBuilder` に変換して送信する。
pub struct MailSendTransport<C = MailSendClient> {
    client: C,
}

impl MailSendTransport {
    /// 接続設定から SMTP 送信インスタンスを作成する
    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportInitError> {
        MailSendClient::from_config(config).map(Self::with_client)
    }
}

impl<C: SmtpSubmitter> MailSendTransport<C> {
    /// 任意の [`SmtpSubmitter`] をラップする
    pub fn with_client(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: SmtpSubmitter> Transport for MailSendTransport<C> {
    #[tracing::instrument(skip_all, level = "debug", fields(backend = "mail_send"))]
    async fn send(
        &self,
        from: &EmailAddress,
        to: &EmailAddress,
        content: &EmailContent,
    ) -> Result<(), DeliveryError> {
        let message = build_message(from, to, content);

        self.client.submit(message).await.map_err(|e| {
            let error = DeliveryError::submission(format!("SMTP 送信失敗: {}", e.message), e.code);
            tracing::warn!(error = %error, to = %to.email(), "mail-send: メール送信失敗");
            error
        })?;

        tracing::info!(
            to = %to.email(),
            subject = %content.subject(),
            "mail-send: メール送信を受け付けた"
        );
        Ok(())
    }
}

/// ヘッダーのエンコード（RFC 2047）と折り返しは mail-builder に任せる
fn build_message<'a>(
    from: &'a EmailAddress,
    to: &'a EmailAddress,
    content: &'a EmailContent,
) -> MessageBuilder<'a> {
    let builder = MessageBuilder::new()
        .from(to_address(from))
        .to(to_address(to))
        .subject(content.subject());

    if content.is_html() {
        builder.html_body(content.body())
    } else {
        builder.text_body(content.body())
    }
}

fn to_address(address: &EmailAddress) -> Address<'_> {
    if address.name().is_empty() {
        address.email().into()
    } else {
        (address.name(), address.email()).into()
    }
}
