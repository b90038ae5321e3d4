//! Timeout behaviour of the token channel.
//!
//! These tests run on a paused clock, so the ten second default wait elapses
//! instantly while `Instant` still reports the simulated duration.

use std::time::Duration;

use rstest::rstest;
use tokenframe::{FrameConfig, FrameError, Stage, Token, TokenChannel, config::DEFAULT_RECV_TIMEOUT};
use tokenframe_testing::{ReadEnd, RecordingSink, ScriptedStream, WriteEnd, frame_bytes};
use tokio::time::{Instant, timeout};

fn stalled_after(input: Vec<u8>) -> ScriptedStream {
    ScriptedStream::builder()
        .input(input)
        .read_end(ReadEnd::Stall)
        .build()
}

#[tokio::test(start_paused = true)]
async fn silent_peer_fails_after_default_wait() {
    let mut rx = TokenChannel::new(stalled_after(Vec::new())).with_sink(RecordingSink::new().handle());
    let started = Instant::now();
    let err = rx.recv_token().await.expect_err("nothing arrives");
    let waited = started.elapsed();
    assert!(matches!(
        err,
        FrameError::ShortTransfer { stage, got: 0, expected: 1 } if stage == Stage::RECV_FLAGS
    ));
    assert!(waited >= DEFAULT_RECV_TIMEOUT, "returned too early: {waited:?}");
    assert!(
        waited < DEFAULT_RECV_TIMEOUT + Duration::from_secs(1),
        "waited too long: {waited:?}"
    );
}

#[rstest]
#[case::in_length(vec![0x05, 0x00], Stage::RECV_LENGTH, 1, 4)]
#[case::in_payload(vec![0x00, 0x00, 0x00, 0x08, 1, 2, 3], Stage::RECV_DATA, 3, 8)]
#[tokio::test(start_paused = true)]
async fn stall_mid_frame_reports_bytes_so_far(
    #[case] input: Vec<u8>,
    #[case] stage: Stage,
    #[case] got: usize,
    #[case] expected: usize,
) {
    let config = FrameConfig::default().with_recv_timeout(Duration::from_millis(500));
    let mut rx = TokenChannel::with_config(stalled_after(input), config)
        .with_sink(RecordingSink::new().handle());
    let started = Instant::now();
    let err = rx.recv_token().await.expect_err("peer stalls");
    assert!(
        matches!(
            err,
            FrameError::ShortTransfer { stage: s, got: g, expected: e }
                if s == stage && g == got && e == expected
        ),
        "unexpected error: {err:?}"
    );
    // A timeout is a short transfer, never a transport error.
    assert_eq!(err.code(), None);
    assert_eq!(rx.last_error(), None);
    assert!(started.elapsed() >= Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn wait_applies_to_each_attempt_not_the_whole_frame() {
    let config = FrameConfig::default().with_recv_timeout(Duration::from_secs(2));
    let (client, server) = tokio::io::duplex(64);
    let mut rx = TokenChannel::with_config(server, config).with_sink(RecordingSink::new().handle());
    let wire = frame_bytes(0x01, b"slow");
    let writer = tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        let mut client = client;
        for byte in wire {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            client.write_all(&[byte]).await.expect("write");
        }
        client
    });
    let (flags, token) = rx.recv_token().await.expect("every byte beats the wait");
    assert_eq!(flags.bits(), 0x01);
    assert_eq!(token.as_bytes(), b"slow");
    drop(writer.await.expect("writer task"));
}

#[tokio::test(start_paused = true)]
async fn sends_have_no_timeout_by_default() {
    let stream = ScriptedStream::builder()
        .write_end(WriteEnd::StallAfter(2))
        .build();
    let mut tx = TokenChannel::new(stream).with_sink(RecordingSink::new().handle());
    let token = Token::from(&b"stuck"[..]);
    let outcome = timeout(Duration::from_secs(3600), tx.send_token(0x01u8, &token)).await;
    assert!(outcome.is_err(), "send should still be blocked");
}

#[tokio::test(start_paused = true)]
async fn configured_send_timeout_bounds_each_attempt() {
    let stream = ScriptedStream::builder()
        .write_end(WriteEnd::StallAfter(2))
        .build();
    let config = FrameConfig::default().with_send_timeout(Some(Duration::from_secs(5)));
    let mut tx = TokenChannel::with_config(stream, config).with_sink(RecordingSink::new().handle());
    let started = Instant::now();
    let err = tx
        .send_token(0x01u8, &Token::from(&b"stuck"[..]))
        .await
        .expect_err("peer stalls");
    assert!(matches!(
        err,
        FrameError::ShortTransfer { stage, got: 1, expected: 4 } if stage == Stage::SEND_LENGTH
    ));
    assert!(started.elapsed() >= Duration::from_secs(5));
}
