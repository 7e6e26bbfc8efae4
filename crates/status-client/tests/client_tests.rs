//! End-to-end tests for the status client against a real server on loopback.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use common::error::RpcError;
use common::secret::SecretString;
use proto_gen::{Empty, TestMsg};
use status_client::{CallContext, ClientConfig, Operation, Reply, RpcChannel, StatusClient};
use status_test_utils::{SlowStatusSource, TestStatusServer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tonic::Code;

async fn client_for(server: &TestStatusServer) -> (StatusClient, SecretString) {
    let token = SecretString::from("abc123");
    let config = ClientConfig::new(server.url(), token.clone());
    (StatusClient::connect(&config).await.unwrap(), token)
}

#[tokio::test]
async fn test_bearer_abc123_get_status_succeeds() {
    let server = TestStatusServer::spawn().await.unwrap();
    let (client, token) = client_for(&server).await;

    let reply = client.invoke(Operation::GetStatus, &token).await.unwrap();
    assert_eq!(
        reply,
        Reply::Status(TestMsg {
            msg: "ok".to_string(),
            status: 200
        })
    );
}

#[tokio::test]
async fn test_every_operation_round_trips() {
    let server = TestStatusServer::spawn().await.unwrap();
    let (client, token) = client_for(&server).await;

    let status_a = client.get_status_a(&token).await.unwrap();
    assert_eq!(status_a.msg, "service A is ok from:127.0.0.1");

    assert_eq!(client.health(&token).await.unwrap(), Empty {});
    assert_eq!(
        client.invoke(Operation::Health, &token).await.unwrap(),
        Reply::Health(Empty {})
    );
}

#[tokio::test]
async fn test_token_without_scheme_is_unauthenticated() {
    let (server, calls) = TestStatusServer::spawn_counting().await.unwrap();
    let channel = RpcChannel::from_channel(server.channel().await.unwrap());

    let ctx = CallContext::new(Operation::GetStatus.method()).with_metadata("authorization", "abc123");
    let err = channel
        .call::<Empty, TestMsg>(&ctx, Empty {})
        .await
        .unwrap_err();

    assert!(matches!(err, RpcError::Unauthenticated(_)));
    assert!(!err.is_transport_failure());

    let ctx = CallContext::new(Operation::Health.method()).with_metadata("authorization", "abc123");
    let err = channel.call::<Empty, Empty>(&ctx, Empty {}).await.unwrap_err();
    assert_eq!(err.code(), Code::Unauthenticated);

    assert_eq!(calls.total(), 0);
}

#[tokio::test]
async fn test_uppercase_metadata_key_is_normalized() {
    let server = TestStatusServer::spawn().await.unwrap();
    let channel = RpcChannel::from_channel(server.channel().await.unwrap());

    let ctx = CallContext::new(Operation::GetStatus.method())
        .with_metadata("Authorization", "Bearer abc123");
    let reply: TestMsg = channel.call(&ctx, Empty {}).await.unwrap();
    assert_eq!(reply.status, 200);
}

#[tokio::test]
async fn test_unknown_method_is_not_found() {
    let server = TestStatusServer::spawn().await.unwrap();
    let channel = RpcChannel::from_channel(server.channel().await.unwrap());

    let ctx = CallContext::new("pb.checkStatus/getStatusB")
        .with_metadata("authorization", "Bearer abc123");
    let err = channel
        .call::<Empty, TestMsg>(&ctx, Empty {})
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
}

#[tokio::test]
async fn test_no_server_is_unavailable() {
    // Reserve a port, then free it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(format!("http://{addr}"), SecretString::from("abc123"))
        .with_connect_timeout(Duration::from_secs(1));

    let err = StatusClient::connect(&config).await.unwrap_err();
    assert!(matches!(err, RpcError::Unavailable(_)));
    assert!(err.is_transport_failure());
}

#[tokio::test]
async fn test_timeout_surfaces_deadline_exceeded() {
    let source = Arc::new(SlowStatusSource::new(Duration::from_millis(800)));
    let server = TestStatusServer::spawn_with_source(source.clone())
        .await
        .unwrap();
    let (client, token) = client_for(&server).await;

    let ctx = client
        .context(Operation::GetStatus, &token)
        .with_timeout(Duration::from_millis(50));

    let started = Instant::now();
    let err = client.execute(Operation::GetStatus, &ctx).await.unwrap_err();

    assert!(matches!(err, RpcError::DeadlineExceeded(_)), "got {err:?}");
    assert!(started.elapsed() < Duration::from_millis(700));
}

#[tokio::test]
async fn test_channel_default_timeout_applies() {
    let source = Arc::new(SlowStatusSource::new(Duration::from_millis(800)));
    let server = TestStatusServer::spawn_with_source(source)
        .await
        .unwrap();

    let config = ClientConfig::new(server.url(), SecretString::from("abc123"))
        .with_rpc_timeout(Duration::from_millis(50));
    let client = StatusClient::connect(&config).await.unwrap();

    let err = client.get_status_a(config.token()).await.unwrap_err();
    assert_eq!(err.code(), Code::DeadlineExceeded);

    // health never touches the slow source
    client.health(config.token()).await.unwrap();
}

#[tokio::test]
async fn test_cancellation_abandons_call() {
    let source = Arc::new(SlowStatusSource::new(Duration::from_millis(800)));
    let server = TestStatusServer::spawn_with_source(source.clone())
        .await
        .unwrap();
    let (client, token) = client_for(&server).await;

    let cancel = CancellationToken::new();
    let ctx = client
        .context(Operation::GetStatus, &token)
        .with_cancellation(cancel.clone());

    let trigger = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let started = Instant::now();
    let err = client.execute(Operation::GetStatus, &ctx).await.unwrap_err();
    trigger.await.unwrap();

    assert!(matches!(err, RpcError::Cancelled(_)));
    assert!(started.elapsed() < Duration::from_millis(700));
}

#[tokio::test]
async fn test_fifty_concurrent_invocations() {
    let (server, calls) = TestStatusServer::spawn_counting().await.unwrap();
    let (client, token) = client_for(&server).await;

    // Every fourth call sends the token without the Bearer scheme
    let malformed = |i: usize| i % 4 == 3;

    let invocations = (0..50).map(|i| {
        let client = client.clone();
        let operation = match i % 3 {
            0 => Operation::GetStatus,
            1 => Operation::GetStatusA,
            _ => Operation::Health,
        };
        let ctx = if malformed(i) {
            CallContext::new(operation.method()).with_metadata("authorization", "abc123")
        } else {
            client.context(operation, &token)
        };
        async move { (i, operation, client.execute(operation, &ctx).await) }
    });

    for (i, operation, result) in futures::future::join_all(invocations).await {
        if malformed(i) {
            assert!(
                matches!(result, Err(RpcError::Unauthenticated(_))),
                "call {i} ({operation}) got {result:?}"
            );
            continue;
        }

        match (operation, result.unwrap()) {
            (Operation::GetStatus, Reply::Status(msg)) => assert_eq!(msg.msg, "ok"),
            (Operation::GetStatusA, Reply::Status(msg)) => {
                assert_eq!(msg.msg, "service A is ok from:127.0.0.1");
            }
            (Operation::Health, Reply::Health(_)) => {}
            (operation, reply) => unreachable!("{operation} returned {reply:?}"),
        }
    }

    assert_eq!(calls.total(), 38);
    assert_eq!(calls.health(), (0..50).filter(|i| i % 3 == 2 && !malformed(*i)).count());
}
