//! # Correlation Flow Tests
//!
//! Drives the full path a deployment exercises: caller → send path →
//! loopback wire → scripted responder → listener loop → dispatcher →
//! caller, for all three call modes.

#[cfg(test)]
mod tests {
    use crate::fixtures::{spawn_responder, wire_client};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::sync::oneshot;
    use wirerpc_client::{
        ClientConfig, ClientError, RpcErrorObject, RpcParams, RpcResponse,
    };

    // =========================================================================
    // SYNCHRONOUS CALLS
    // =========================================================================

    #[tokio::test]
    async fn test_call_round_trip_returns_result() {
        let harness = wire_client(ClientConfig::default());
        spawn_responder(harness.outbound, harness.inject.clone(), |request| {
            assert_eq!(request.method, "ping");
            Some(RpcResponse::success(request.id.unwrap(), json!("pong")))
        });

        let response = harness
            .client
            .call_with_timeout("ping", RpcParams::none(), Duration::from_millis(500))
            .await
            .expect("call should resolve");

        assert_eq!(response.result, Some(json!("pong")));
        assert_eq!(harness.client.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_call_times_out_when_responder_is_silent() {
        let harness = wire_client(ClientConfig::default());
        // No responder: outbound traffic is held unread so nothing answers

        let started = Instant::now();
        let err = harness
            .client
            .call_with_timeout("ping", RpcParams::none(), Duration::from_millis(100))
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(err.is_timeout());
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(1000), "timed out far too late: {elapsed:?}");
        assert_eq!(harness.client.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_error_response_reaches_the_caller() {
        let harness = wire_client(ClientConfig::default());
        spawn_responder(harness.outbound, harness.inject.clone(), |request| {
            Some(RpcResponse::failure(
                request.id,
                RpcErrorObject::new(-32601, "Method not found"),
            ))
        });

        let response = harness
            .client
            .call_with_timeout("no_such_method", RpcParams::none(), Duration::from_millis(500))
            .await
            .expect("error responses resolve the call, they do not time it out");

        let err = response.into_result().unwrap_err();
        assert_eq!(err.code, -32601);
    }

    #[tokio::test]
    async fn test_out_of_order_responses_reach_their_own_callers() {
        let mut harness = wire_client(ClientConfig::default());

        let first = tokio::spawn({
            let client = harness.client.clone();
            async move {
                client
                    .call_with_timeout("first", RpcParams::none(), Duration::from_secs(2))
                    .await
            }
        });
        let second = tokio::spawn({
            let client = harness.client.clone();
            async move {
                client
                    .call_with_timeout("second", RpcParams::none(), Duration::from_secs(2))
                    .await
            }
        });

        // Collect both requests, then answer them in reverse order
        let mut requests = Vec::new();
        while requests.len() < 2 {
            let text = harness.outbound.recv().await.expect("two requests sent");
            let request: wirerpc_client::RpcRequest = serde_json::from_str(&text).unwrap();
            requests.push(request);
        }
        for request in requests.iter().rev() {
            let reply = RpcResponse::success(request.id.unwrap(), json!(request.method.clone()));
            harness.inject.send(reply.to_json().unwrap()).unwrap();
        }

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(first.result, Some(json!("first")));
        assert_eq!(second.result, Some(json!("second")));
    }

    // =========================================================================
    // NOTIFICATIONS
    // =========================================================================

    #[tokio::test]
    async fn test_notify_sends_without_id_and_without_waiting() {
        let mut harness = wire_client(ClientConfig::default());

        harness
            .client
            .notify("log_line", RpcParams::positional(vec![json!("hello")]))
            .await
            .unwrap();

        let text = harness.outbound.recv().await.unwrap();
        assert!(!text.contains("\"id\""));
        assert!(text.contains("\"log_line\""));
        assert_eq!(harness.client.pending_count(), 0);
    }

    // =========================================================================
    // ASYNCHRONOUS CALLS
    // =========================================================================

    #[tokio::test]
    async fn test_call_async_completes_through_callback() {
        let harness = wire_client(ClientConfig::default());
        spawn_responder(harness.outbound, harness.inject.clone(), |request| {
            Some(RpcResponse::success(request.id.unwrap(), json!(3)))
        });

        let (done_tx, done_rx) = oneshot::channel();
        let mut params = serde_json::Map::new();
        params.insert("a".into(), json!(1));
        params.insert("b".into(), json!(2));

        harness
            .client
            .call_async("sum", RpcParams::named(params), move |response| {
                let _ = done_tx.send(response.into_result());
            })
            .await
            .unwrap();

        let outcome = tokio::time::timeout(Duration::from_millis(500), done_rx)
            .await
            .expect("callback should fire")
            .unwrap();
        assert_eq!(outcome.unwrap(), json!(3));
        assert_eq!(harness.client.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_delivery_fires_callback_once() {
        let harness = wire_client(ClientConfig::default());
        let invocations = Arc::new(AtomicUsize::new(0));

        // Answer every request twice with the same correlated response
        spawn_responder(harness.outbound, harness.inject.clone(), {
            let inject = harness.inject.clone();
            move |request| {
                let reply = RpcResponse::success(request.id.unwrap(), json!("once"));
                inject.send(reply.to_json().unwrap()).unwrap();
                Some(reply)
            }
        });

        let counter = invocations.clone();
        harness
            .client
            .call_async("fragile", RpcParams::none(), move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
    }

    // =========================================================================
    // SHUTDOWN
    // =========================================================================

    #[tokio::test]
    async fn test_close_releases_transport_and_wakes_waiters() {
        let harness = wire_client(ClientConfig::default());

        let waiter = tokio::spawn({
            let client = harness.client.clone();
            async move {
                client
                    .call_with_timeout("stuck", RpcParams::none(), Duration::from_secs(10))
                    .await
            }
        });

        // Let the request reach the wire before closing
        tokio::time::sleep(Duration::from_millis(20)).await;
        harness.client.close().await;

        let err = waiter.await.unwrap().unwrap_err();
        assert!(matches!(err, ClientError::Closed));
        assert!(harness.transport.is_closed());

        let err = harness
            .client
            .notify("after_close", RpcParams::none())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Closed));
    }
}
