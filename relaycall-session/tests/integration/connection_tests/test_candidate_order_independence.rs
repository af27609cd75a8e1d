use relaycall_core::{CallState, Role, SdpKind};
use serde_json::json;

use crate::integration::{SIGNAL_TIMEOUT_MS, init_tracing, spawn_session, wait_until};
use crate::utils::TransportCall;

/// Remote candidates may outrun the answer. As long as the transport handle
/// exists they are applied immediately, before the remote description lands.
#[tokio::test]
async fn test_candidate_applied_before_answer() {
    init_tracing();

    let mut session = spawn_session(Role::Initiator);

    session.handle.call().await;
    let _offer = session.next_signal().await;
    session
        .wait_for_status(|s| s.state == CallState::InProgress)
        .await;

    let early = json!({ "candidate": "candidate:early", "sdpMid": "0" });
    session.deliver(json!({ "candidate": early }).to_string()).await;
    session
        .deliver(r#"{"sdp":{"type":"answer","sdp":"v=0..."}}"#)
        .await;

    let log = session.factory.log(0);
    assert!(
        wait_until(SIGNAL_TIMEOUT_MS, || {
            log.calls().contains(&TransportCall::SetRemote(SdpKind::Answer))
        })
        .await
    );

    let calls = log.calls();
    let candidate_at = calls
        .iter()
        .position(|c| *c == TransportCall::AddCandidate(early.clone()))
        .expect("early candidate never applied");
    let answer_at = calls
        .iter()
        .position(|c| *c == TransportCall::SetRemote(SdpKind::Answer))
        .unwrap();
    assert!(
        candidate_at < answer_at,
        "candidate should be applied as it arrives, not buffered behind the answer"
    );
}
