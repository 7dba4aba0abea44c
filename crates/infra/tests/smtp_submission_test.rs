//! SMTP 送信の結合テスト
//!
//! ファクトリが生成した本物の送信ライブラリのクライアントを、
//! ローカルに立てた最小限の SMTP サーバーに接続して検証する。
//! 外部ネットワーク接続不要。
//!
//! 実行方法:
//! ```bash
//! cargo test -p mailgate-infra --test smtp_submission_test
//! ```

use mailgate_domain::{
    DeliveryErrorKind,
    mail::{EmailAddress, EmailContent},
    transport::{TlsMode, TransportConfig, TransportKind},
};
use mailgate_infra::TransportFactory;
use rstest::rstest;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpListener,
    task::JoinHandle,
};

const ACCEPT: &str = "250 2.1.5 ok\r\n";
const MAILBOX_UNAVAILABLE: &str = "550 5.1.1 mailbox unavailable\r\n";

/// 1 接続だけ受け付ける SMTP サーバーを起動する
///
/// `RCPT` には `rcpt_reply` を返し、それ以外のコマンドは受け付ける。
/// 戻り値のハンドルは受信したコマンド行（`DATA` の中身を除く）を返す。
async fn spawn_smtp_server(rcpt_reply: &'static str) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();
        let mut commands = Vec::new();
        let mut in_data = false;

        writer.write_all(b"220 fake.test ESMTP\r\n").await.unwrap();

        while let Ok(Some(line)) = lines.next_line().await {
            if in_data {
                if line == "." {
                    in_data = false;
                    writer.write_all(b"250 2.0.0 queued\r\n").await.unwrap();
                }
                continue;
            }

            let verb = line
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_ascii_uppercase();
            commands.push(line);

            let reply: &[u8] = match verb.as_str() {
                "EHLO" | "HELO" => b"250 fake.test\r\n",
                "RCPT" => rcpt_reply.as_bytes(),
                "DATA" => {
                    in_data = true;
                    b"354 end with <CRLF>.<CRLF>\r\n"
                }
                "QUIT" => {
                    let _ = writer.write_all(b"221 2.0.0 bye\r\n").await;
                    break;
                }
                _ => b"250 2.0.0 ok\r\n",
            };
            if writer.write_all(reply).await.is_err() {
                break;
            }
        }
        commands
    });

    (port, handle)
}

/// 認証なし・TLS なしでローカルサーバーに接続する設定
fn local_config(port: u16) -> TransportConfig {
    TransportConfig::new("127.0.0.1", port, "", "").with_tls(TlsMode::Disabled)
}

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

#[rstest]
#[case(TransportKind::Lettre)]
#[case(TransportKind::MailSend)]
#[tokio::test]
async fn test_どちらのバックエンドもsmtpで送信する(#[case] kind: TransportKind) {
    let (port, server) = spawn_smtp_server(ACCEPT).await;
    let sut = TransportFactory::create(&local_config(port), kind).unwrap();

    let result = sut.send(&from(), &to(), &content()).await;

    assert!(result.is_ok(), "{kind}: {result:?}");
    let commands = server.await.unwrap();
    assert!(commands[0].starts_with("EHLO"), "{kind}: {commands:?}");
    assert!(
        commands
            .iter()
            .any(|c| c.starts_with("MAIL FROM:<cedric@prof.dev>")),
        "{kind}: {commands:?}"
    );
    assert!(
        commands.iter().any(|c| c.starts_with("RCPT TO:<cda@3wa.dev>")),
        "{kind}: {commands:?}"
    );
    assert!(commands.iter().any(|c| c == "DATA"), "{kind}: {commands:?}");
    assert!(
        !commands.iter().any(|c| c.starts_with("AUTH")),
        "{kind}: {commands:?}"
    );
}

#[rstest]
#[case(TransportKind::Lettre)]
#[case(TransportKind::MailSend)]
#[tokio::test]
async fn test_サーバーの拒否は応答コード付きで返る(#[case] kind: TransportKind) {
    let (port, _server) = spawn_smtp_server(MAILBOX_UNAVAILABLE).await;
    let sut = TransportFactory::create(&local_config(port), kind).unwrap();

    let error = sut.send(&from(), &to(), &content()).await.unwrap_err();

    assert_eq!(error.kind(), DeliveryErrorKind::Submission);
    assert_eq!(error.code(), Some("550"), "{kind}: {error:?}");
    assert!(
        error.message().contains("mailbox unavailable"),
        "{kind}: {}",
        error.message()
    );
}

#[rstest]
#[case(TransportKind::Lettre)]
#[case(TransportKind::MailSend)]
#[tokio::test]
async fn test_接続失敗は原因を含めて返る(#[case] kind: TransportKind) {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let sut = TransportFactory::create(&local_config(port), kind).unwrap();

    let error = sut.send(&from(), &to(), &content()).await.unwrap_err();

    assert_eq!(error.kind(), DeliveryErrorKind::Submission);
    assert_eq!(error.code(), None);
    assert!(
        error.message().to_ascii_lowercase().contains("refused"),
        "{kind}: {}",
        error.message()
    );
}
