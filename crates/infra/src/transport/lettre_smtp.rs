//! lettre による SMTP 送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! テストでは lettre の `AsyncStubTransport` など任意の `AsyncTransport` に差し替えられる。

use async_trait::async_trait;
use lettre::{
    Address,
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::{smtp, smtp::authentication::Credentials, stub},
};
use mailgate_domain::{
    DeliveryError,
    TransportInitError,
    mail::{EmailAddress, EmailContent},
    transport::{TlsMode, TransportConfig},
};

use super::{Transport, error_chain};

/// 送信ライブラリのエラーから SMTP 応答コードを取り出す
pub trait SmtpErrorCode {
    /// 応答コード（例: `"550"`）。サーバー応答由来でないエラーは `None`
    fn smtp_code(&self) -> Option<String>;
}

impl SmtpErrorCode for smtp::Error {
    fn smtp_code(&self) -> Option<String> {
        self.status().map(|code| code.to_string())
    }
}

impl SmtpErrorCode for stub::Error {
    fn smtp_code(&self) -> Option<String> {
        None
    }
}

/// lettre による SMTP 送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
/// 接続は送信時に確立されるため、生成時にネットワークへはアクセスしない。
pub struct LettreTransport<T = AsyncSmtpTransport<Tokio1Executor>> {
    client: T,
}

impl LettreTransport {
    /// 接続設定から SMTP 送信インスタンスを作成する
    ///
    /// # 引数
    ///
    /// - `config`: 接続設定。`tls()` で接続方式を切り替える
    ///   - `StartTls`: submission ポート（587）向け
    ///   - `Implicit`: SMTPS ポート（465）向け
    ///   - `Disabled`: TLS なし（Mailpit 等のローカル SMTP 向け）
    ///
    /// # エラー
    ///
    /// 設定が構造的に不正な場合、または TLS パラメータを構築できない場合は
    /// [`TransportInitError`] を返す。
    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportInitError> {
        config.validate()?;

        let builder = match config.tls() {
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(config.host()),
            TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(config.host()),
            // builder_dangerous: TLS なしで接続
            TlsMode::Disabled => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                config.host(),
            )),
        }
        .map_err(|e| TransportInitError::Backend(format!("SMTP の TLS 設定に失敗: {e}")))?;

        let builder = builder.port(config.port());

        // 認証なしのローカル SMTP では AUTH を送らない
        let builder = if config.username().is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                config.username().to_string(),
                config.password().to_string(),
            ))
        };

        tracing::debug!(
            host = %config.host(),
            port = config.port(),
            tls = %config.tls(),
            "SMTP 送信を初期化"
        );

        Ok(Self::with_client(builder.build()))
    }
}

impl<T> LettreTransport<T> {
    /// 生成済みの lettre トランスポートをラップする
    pub fn with_client(client: T) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T> Transport for LettreTransport<T>
where
    T: AsyncTransport + Send + Sync,
    T::Ok: Send,
    T::Error: std::error::Error + SmtpErrorCode + Send,
{
    #[tracing::instrument(skip_all, level = "debug", fields(backend = "lettre"))]
    async fn send(
        &self,
        from: &EmailAddress,
        to: &EmailAddress,
        content: &EmailContent,
    ) -> Result<(), DeliveryError> {
        let message = build_message(from, to, content)?;

        self.client.send(message).await.map_err(|e| {
            let error = DeliveryError::submission(
                format!("SMTP 送信失敗: {}", error_chain(&e)),
                e.smtp_code(),
            );
            tracing::warn!(error = %error, to = %to.email(), "lettre: メール送信失敗");
            error
        })?;

        tracing::info!(
            to = %to.email(),
            subject = %content.subject(),
            "lettre: メール送信を受け付けた"
        );
        Ok(())
    }
}

fn build_message(
    from: &EmailAddress,
    to: &EmailAddress,
    content: &EmailContent,
) -> Result<Message, DeliveryError> {
    let content_type = if content.is_html() {
        ContentType::TEXT_HTML
    } else {
        ContentType::TEXT_PLAIN
    };

    Message::builder()
        .from(to_mailbox(from)?)
        .to(to_mailbox(to)?)
        .subject(content.subject())
        .header(content_type)
        .body(content.body().to_string())
        .map_err(|e| DeliveryError::message_build(format!("メッセージ構築失敗: {e}")))
}

fn to_mailbox(address: &EmailAddress) -> Result<Mailbox, DeliveryError> {
    let email: Address = address
        .email()
        .parse()
        .map_err(|e| DeliveryError::message_build(format!("アドレス変換失敗: {e}")))?;
    let name = (!address.name().is_empty()).then(|| address.name().to_string());

    Ok(Mailbox::new(name, email))
}

#[cfg(test)]
mod tests {
    use lettre::transport::stub::AsyncStubTransport;
    use mailgate_domain::DeliveryErrorKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn from() -> EmailAddress {
        EmailAddress::new("cedric@prof.dev", "Cédric Prof").unwrap()
    }

    fn to() -> EmailAddress {
        EmailAddress::new("cda@3wa.dev", "CDA 33").unwrap()
    }

    fn content() -> EmailContent {
        EmailContent::new(
            "Envoi de mail",
            "Ceci est un email au <strong>format HTML</strong> !",
        )
    }

    #[test]
    fn lettre送信はスレッド間で共有できる() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LettreTransport>();
    }

    #[rstest]
    #[case(TlsMode::StartTls)]
    #[case(TlsMode::Implicit)]
    #[case(TlsMode::Disabled)]
    fn 正しい設定から生成できる(#[case] tls: TlsMode) {
        let config = TransportConfig::new("smtp.example.com", 587, "u", "p").with_tls(tls);

        assert!(LettreTransport::from_config(&config).is_ok());
    }

    #[test]
    fn ポート0では生成に失敗する() {
        let config = TransportConfig::new("smtp.example.com", 0, "u", "p");

        let result = LettreTransport::from_config(&config);

        assert!(matches!(result, Err(TransportInitError::InvalidPort(0))));
    }

    #[test]
    fn 空のホスト名では生成に失敗する() {
        let config = TransportConfig::new("", 587, "u", "p");

        let result = LettreTransport::from_config(&config);

        assert!(matches!(result, Err(TransportInitError::EmptyHost)));
    }

    #[tokio::test]
    async fn 受け付けるクライアントでは送信に成功する() {
        let sut = LettreTransport::with_client(AsyncStubTransport::new_ok());

        let result = sut.send(&from(), &to(), &content()).await;

        assert_eq!(result, Ok(()));
        let messages = sut.client.messages().await;
        assert_eq!(messages.len(), 1);

        let (envelope, raw) = &messages[0];
        assert_eq!(
            envelope.from().map(ToString::to_string),
            Some("cedric@prof.dev".to_string())
        );
        assert_eq!(
            envelope
                .to()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec!["cda@3wa.dev".to_string()]
        );
        assert!(raw.contains("Subject: Envoi de mail"));
        assert!(raw.contains("Content-Type: text/html; charset=utf-8"));
        assert!(raw.contains("CDA 33"));
        assert!(raw.contains("<cda@3wa.dev>"));
    }

    #[tokio::test]
    async fn プレーンテキストの本文はtext_plainで送信する() {
        let sut = LettreTransport::with_client(AsyncStubTransport::new_ok());
        let content = EmailContent::plain_text("Hello", "plain body");

        sut.send(&from(), &to(), &content).await.unwrap();

        let messages = sut.client.messages().await;
        assert!(messages[0].1.contains("Content-Type: text/plain; charset=utf-8"));
    }

    #[tokio::test]
    async fn 表示名の改行はヘッダーに現れない() {
        let sut = LettreTransport::with_client(AsyncStubTransport::new_ok());
        let from = EmailAddress::new("cedric@prof.dev", "Evil\r\nBcc: victim@example.com").unwrap();

        sut.send(&from, &to(), &content()).await.unwrap();

        let messages = sut.client.messages().await;
        assert!(!messages[0].1.contains("\r\nBcc:"));
    }

    #[tokio::test]
    async fn 拒否するクライアントのエラーをdelivery_errorに変換する() {
        let sut = LettreTransport::with_client(AsyncStubTransport::new_error());

        let error = sut.send(&from(), &to(), &content()).await.unwrap_err();

        assert_eq!(error.kind(), DeliveryErrorKind::Submission);
        assert!(error.message().contains("stub error"));
        assert_eq!(error.code(), None);
    }
}
