//! IPC integration tests: real Unix socket, length-delimited MessagePack frames.

use std::time::Duration;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::net::UnixStream;
use tokio::sync::broadcast;
use tokio_util::codec::Framed;
use tutorconnect_core::ipc::{TutorConnectRequest, TutorConnectResponse};
use tutorconnect_core::models::ConnectKind;
use tutorconnect_core::TutorConnectConfig;
use tutorconnect_server::server::{frame_codec, run_unix_server};
use tutorconnect_server::state::AppState;

async fn connect_with_retry(path: &std::path::Path) -> UnixStream {
    for _ in 0..50 {
        if let Ok(stream) = UnixStream::connect(path).await {
            return stream;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("IPC server did not come up at {}", path.display());
}

async fn roundtrip(
    framed: &mut Framed<UnixStream, tokio_util::codec::LengthDelimitedCodec>,
    payload: Vec<u8>,
) -> TutorConnectResponse {
    framed.send(Bytes::from(payload)).await.unwrap();
    let frame = framed.next().await.unwrap().unwrap();
    rmp_serde::from_slice(&frame).unwrap()
}

async fn request(
    framed: &mut Framed<UnixStream, tokio_util::codec::LengthDelimitedCodec>,
    req: TutorConnectRequest,
) -> TutorConnectResponse {
    roundtrip(framed, rmp_serde::to_vec_named(&req).unwrap()).await
}

#[tokio::test]
async fn test_ipc_session_over_socket() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("tutorconnect.sock");
    let (state, _billing_tx) = AppState::new(TutorConnectConfig::default());
    let (tx, rx) = broadcast::channel(1);

    let socket_str = socket.to_str().unwrap().to_string();
    let server = tokio::spawn(async move { run_unix_server(&socket_str, state, rx).await });

    let stream = connect_with_retry(&socket).await;
    let mut framed = Framed::new(stream, frame_codec());

    let pong = request(&mut framed, TutorConnectRequest::Ping).await;
    assert!(pong.is_ok());

    let tutors = request(
        &mut framed,
        TutorConnectRequest::ListTutors {
            query: Some("chen".to_string()),
            subject: None,
        },
    )
    .await;
    assert_eq!(tutors.data.unwrap()["count"], 1);

    let connected = request(
        &mut framed,
        TutorConnectRequest::Connect {
            tutor_id: "5".to_string(),
            kind: ConnectKind::Chat,
        },
    )
    .await;
    assert!(connected.is_ok(), "connect failed: {:?}", connected.error);

    let rejected = request(
        &mut framed,
        TutorConnectRequest::SendMessage {
            content: "   ".to_string(),
        },
    )
    .await;
    assert_eq!(rejected.code.as_deref(), Some("empty_message"));

    let ended = request(&mut framed, TutorConnectRequest::EndSession).await;
    assert_eq!(ended.data.unwrap()["summary"]["tutor_name"], "Prof. Lisa Thompson");

    tx.send(()).unwrap();
    server.await.unwrap().unwrap();
    assert!(!socket.exists(), "socket file removed on shutdown");
}

#[tokio::test]
async fn test_ipc_bad_frame_gets_error_response() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("bad.sock");
    let (state, _billing_tx) = AppState::new(TutorConnectConfig::default());
    let (tx, rx) = broadcast::channel(1);

    let socket_str = socket.to_str().unwrap().to_string();
    let server = tokio::spawn(async move { run_unix_server(&socket_str, state, rx).await });

    let stream = connect_with_retry(&socket).await;
    let mut framed = Framed::new(stream, frame_codec());

    let resp = roundtrip(&mut framed, vec![0xc1]).await;
    assert!(!resp.is_ok());
    assert!(resp.error.unwrap().contains("Deserialization error"));

    // Connection survives a bad frame
    assert!(request(&mut framed, TutorConnectRequest::Ping).await.is_ok());

    tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
