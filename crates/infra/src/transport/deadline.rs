//! 送信期限付きラッパー
//!
//! 任意の [`Transport`] の送信に期限を設ける。期限切れは
//! [`DeliveryErrorKind::Timeout`](mailgate_domain::DeliveryErrorKind::Timeout) の
//! [`DeliveryError`] として返す。

use std::time::Duration;

use async_trait::async_trait;
use mailgate_domain::{
    DeliveryError,
    mail::{EmailAddress, EmailContent},
};

use super::Transport;

/// 送信期限付き送信
///
/// 期限内に完了した送信の結果はそのまま返す。
pub struct DeadlineTransport<T> {
    inner:   T,
    timeout: Duration,
}

impl<T: Transport> DeadlineTransport<T> {
    pub fn new(inner: T, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<T: Transport> Transport for DeadlineTransport<T> {
    async fn send(
        &self,
        from: &EmailAddress,
        to: &EmailAddress,
        content: &EmailContent,
    ) -> Result<(), DeliveryError> {
        tokio::time::timeout(self.timeout, self.inner.send(from, to, content))
            .await
            .unwrap_or_else(|_| {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis(),
                    to = %to.email(),
                    "送信が期限内に完了しなかった"
                );
                Err(DeliveryError::timeout(format!(
                    "{} ミリ秒以内に送信が完了しませんでした",
                    self.timeout.as_millis()
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    use mailgate_domain::DeliveryErrorKind;
    use pretty_assertions::assert_eq;

    use super::*;

    /// 指定時間待ってから結果を返す送信
    struct SlowTransport {
        delay:  Duration,
        result: Result<(), DeliveryError>,
    }

    #[async_trait]
    impl Transport for SlowTransport {
        async fn send(
            &self,
            _from: &EmailAddress,
            _to: &EmailAddress,
            _content: &EmailContent,
        ) -> Result<(), DeliveryError> {
            tokio::time::sleep(self.delay).await;
            self.result.clone()
        }
    }

    fn addresses() -> (EmailAddress, EmailAddress) {
        (
            EmailAddress::new("cedric@prof.dev", "Cédric Prof").unwrap(),
            EmailAddress::new("cda@3wa.dev", "CDA 33").unwrap(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn 期限を過ぎるとtimeoutエラーを返す() {
        let sut = DeadlineTransport::new(
            SlowTransport {
                delay:  Duration::from_secs(30),
                result: Ok(()),
            },
            Duration::from_secs(5),
        );
        let (from, to) = addresses();

        let error = sut
            .send(&from, &to, &EmailContent::new("s", "b"))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), DeliveryErrorKind::Timeout);
        assert!(error.message().contains("5000"));
    }

    #[tokio::test(start_paused = true)]
    async fn 期限内の成功はそのまま返す() {
        let sut = DeadlineTransport::new(
            SlowTransport {
                delay:  Duration::from_millis(10),
                result: Ok(()),
            },
            Duration::from_secs(5),
        );
        let (from, to) = addresses();

        let result = sut.send(&from, &to, &EmailContent::new("s", "b")).await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn 期限内の失敗はそのまま返す() {
        let expected = DeliveryError::submission("rejected", Some("550".to_string()));
        let sut = DeadlineTransport::new(
            SlowTransport {
                delay:  Duration::from_millis(10),
                result: Err(expected.clone()),
            },
            Duration::from_secs(5),
        );
        let (from, to) = addresses();

        let result = sut.send(&from, &to, &EmailContent::new("s", "b")).await;

        assert_eq!(result, Err(expected));
    }
}
