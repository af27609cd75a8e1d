use relaycall_core::{CallState, Role, SdpKind};

use crate::integration::{init_tracing, spawn_session};
use crate::utils::TransportCall;

#[tokio::test]
async fn test_initiator_starts_call() {
    init_tracing();

    let mut session = spawn_session(Role::Initiator);

    session
        .deliver(r#"{"request_participation":true,"broadcaster_id":"b1"}"#)
        .await;

    let offer = session.next_signal().await;
    assert_eq!(offer["sdp"]["type"], "offer");

    let status = session
        .wait_for_status(|s| s.state == CallState::InProgress)
        .await;
    assert!(status.in_progress, "negotiation should be admitted");

    assert_eq!(session.capture.acquired(), 1);
    assert_eq!(session.factory.created(), 1);
    assert_eq!(
        session.factory.log(0).calls(),
        vec![
            TransportCall::AttachTracks(0),
            TransportCall::CreateOffer,
            TransportCall::SetLocal(SdpKind::Offer),
        ]
    );
}
