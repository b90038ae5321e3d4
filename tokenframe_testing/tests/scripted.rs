//! Behaviour of the scripted transport used throughout the channel tests.

use std::time::Duration;

use rstest::rstest;
use tokenframe_testing::{ReadEnd, ScriptedStream, TestResult, WriteEnd, frame_bytes, tcp_pair};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    time::timeout,
};

#[tokio::test]
async fn reads_are_served_in_chunks() -> TestResult {
    let mut stream = ScriptedStream::builder()
        .input(b"abcdefg".to_vec())
        .chunk(3)
        .build();
    let mut buf = [0u8; 16];
    assert_eq!(stream.read(&mut buf).await?, 3);
    assert_eq!(stream.read(&mut buf).await?, 3);
    assert_eq!(stream.read(&mut buf).await?, 1);
    assert_eq!(stream.read(&mut buf).await?, 0, "closed after input");
    assert_eq!(stream.read_calls(), 3);
    assert!(stream.remaining_input().is_empty());
    Ok(())
}

#[tokio::test]
async fn read_failure_carries_os_code() {
    let mut stream = ScriptedStream::builder()
        .input(vec![1])
        .read_end(ReadEnd::Fail(104))
        .build();
    let mut buf = [0u8; 4];
    assert_eq!(stream.read(&mut buf).await.expect("first byte"), 1);
    let err = stream.read(&mut buf).await.expect_err("scripted failure");
    assert_eq!(err.raw_os_error(), Some(104));
}

#[tokio::test(start_paused = true)]
async fn stalled_read_never_completes() {
    let mut stream = ScriptedStream::builder().read_end(ReadEnd::Stall).build();
    let mut buf = [0u8; 1];
    let outcome = timeout(Duration::from_secs(60), stream.read(&mut buf)).await;
    assert!(outcome.is_err());
}

#[rstest]
#[case::close(WriteEnd::CloseAfter(2))]
#[case::fail(WriteEnd::FailAfter(2, 32))]
#[tokio::test]
async fn writes_stop_at_the_scripted_limit(#[case] end: WriteEnd) {
    let mut stream = ScriptedStream::builder().write_end(end).build();
    assert_eq!(stream.write(b"hello").await.expect("first write"), 2);
    match stream.write(b"llo").await {
        Ok(n) => assert_eq!(n, 0),
        Err(err) => assert_eq!(err.raw_os_error(), Some(32)),
    }
    assert_eq!(stream.written(), b"he");
}

#[test]
fn frame_bytes_omits_zero_flag() {
    assert_eq!(frame_bytes(0, b"ab"), [0, 0, 0, 2, b'a', b'b']);
    assert_eq!(frame_bytes(9, b""), [9, 0, 0, 0, 0]);
}

#[tokio::test]
async fn tcp_pair_is_connected() -> TestResult {
    let (mut client, mut server) = tcp_pair().await?;
    client.write_all(b"ping").await?;
    let mut buf = [0u8; 4];
    server.read_exact(&mut buf).await?;
    assert_eq!(&buf, b"ping");
    Ok(())
}
