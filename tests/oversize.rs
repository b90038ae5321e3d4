//! Tokens that do not fit the 32-bit length field.
//!
//! This test allocates a 4 GiB token, so it is ignored by default. Run it
//! with `cargo test --test oversize -- --ignored`. The default abort policy is
//! covered without a large buffer by the channel unit tests.
#![cfg(target_pointer_width = "64")]

use tokenframe::{FrameConfig, FrameError, OversizePolicy, Token, TokenChannel};
use tokenframe_testing::{RecordingSink, ScriptedStream, TestResult};

fn oversized() -> Token { Token::new(vec![0; 1 << 32]) }

#[tokio::test]
#[ignore = "allocates 4 GiB"]
async fn error_policy_rejects_before_writing() -> TestResult {
    let config = FrameConfig::default().with_oversize_policy(OversizePolicy::Error);
    let sink = RecordingSink::new();
    let mut tx = TokenChannel::with_config(ScriptedStream::builder().build(), config)
        .with_sink(sink.handle());
    let err = tx
        .send_token(0x01u8, &oversized())
        .await
        .expect_err("length does not fit");
    assert!(matches!(err, FrameError::OversizedToken { len } if len == 1 << 32));
    assert!(err.is_unrecoverable());
    assert!(tx.get_ref().written().is_empty());
    Ok(())
}
