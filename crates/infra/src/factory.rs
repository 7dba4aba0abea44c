//! # 送信バックエンドファクトリ
//!
//! 接続設定と種別から、すぐに使える [`Transport`] を生成する。
//!
//! 生成のたびに独立したインスタンスを返し、呼び出し間で状態を共有しない。
//! 設定に送信期限があれば [`DeadlineTransport`] で包んで返す。

use std::{sync::Arc, time::Duration};

use mailgate_domain::{
    MailError,
    TransportInitError,
    transport::{TransportConfig, TransportKind},
};

use crate::transport::{DeadlineTransport, LettreTransport, MailSendTransport, Transport};

/// 送信バックエンドファクトリ
pub struct TransportFactory;

impl TransportFactory {
    /// 指定した種別の送信バックエンドを生成する
    ///
    /// # エラー
    ///
    /// 設定が構造的に不正な場合は [`TransportInitError`] を返す。
    pub fn create(
        config: &TransportConfig,
        kind: TransportKind,
    ) -> Result<Arc<dyn Transport>, TransportInitError> {
        let transport = match kind {
            TransportKind::Lettre => {
                with_deadline(LettreTransport::from_config(config)?, config.timeout())
            }
            TransportKind::MailSend => {
                with_deadline(MailSendTransport::from_config(config)?, config.timeout())
            }
        };

        tracing::info!(transport = %kind, host = %config.host(), "送信バックエンドを生成");
        Ok(transport)
    }

    /// 文字列タグで種別を指定して送信バックエンドを生成する
    ///
    /// # エラー
    ///
    /// - 未知のタグの場合は [`MailError::UnknownTransportType`]
    /// - 設定が構造的に不正な場合は [`MailError::TransportInit`]
    pub fn create_from_tag(
        config: &TransportConfig,
        tag: &str,
    ) -> Result<Arc<dyn Transport>, MailError> {
        let kind = TransportKind::parse(tag)?;
        Ok(Self::create(config, kind)?)
    }
}

fn with_deadline<T>(transport: T, timeout: Option<Duration>) -> Arc<dyn Transport>
where
    T: Transport + 'static,
{
    match timeout {
        Some(timeout) => Arc::new(DeadlineTransport::new(transport, timeout)),
        None => Arc::new(transport),
    }
}

#[cfg(test)]
mod tests {
    use mailgate_domain::UnknownTransportType;
    use rstest::rstest;

    use super::*;

    fn config() -> TransportConfig {
        TransportConfig::new("smtp.example.com", 587, "u", "p")
    }

    #[rstest]
    #[case(TransportKind::Lettre)]
    #[case(TransportKind::MailSend)]
    #[tokio::test]
    async fn 全種別の送信バックエンドを生成できる(#[case] kind: TransportKind) {
        assert!(TransportFactory::create(&config(), kind).is_ok());
    }

    #[rstest]
    #[case(TransportKind::Lettre)]
    #[case(TransportKind::MailSend)]
    #[tokio::test]
    async fn 送信期限付きの設定でも生成できる(#[case] kind: TransportKind) {
        let config = config().with_timeout(Duration::from_secs(10));

        assert!(TransportFactory::create(&config, kind).is_ok());
    }

    #[rstest]
    #[case(TransportKind::Lettre)]
    #[case(TransportKind::MailSend)]
    #[tokio::test]
    async fn 生成のたびに独立したインスタンスを返す(#[case] kind: TransportKind) {
        let first = TransportFactory::create(&config(), kind).unwrap();
        let second = TransportFactory::create(&config(), kind).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[rstest]
    #[case(TransportKind::Lettre)]
    #[case(TransportKind::MailSend)]
    fn 不正な設定では生成に失敗する(#[case] kind: TransportKind) {
        let config = TransportConfig::new("smtp.example.com", 0, "u", "p");

        let result = TransportFactory::create(&config, kind);

        assert!(matches!(result, Err(TransportInitError::InvalidPort(0))));
    }

    #[rstest]
    #[case("lettre")]
    #[case("mail_send")]
    #[tokio::test]
    async fn 既知のタグから生成できる(#[case] tag: &str) {
        assert!(TransportFactory::create_from_tag(&config(), tag).is_ok());
    }

    #[test]
    fn 未知のタグでは生成に失敗する() {
        let result = TransportFactory::create_from_tag(&config(), "swiftmailer");

        match result {
            Err(MailError::UnknownTransportType(UnknownTransportType(tag))) => {
                assert_eq!(tag, "swiftmailer");
            }
            Err(other) => panic!("想定外のエラー: {other}"),
            Ok(_) => panic!("未知のタグで生成に成功した"),
        }
    }
}
