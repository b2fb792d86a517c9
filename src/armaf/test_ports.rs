use super::ports::{ActorPort, ActorRequestError, Handle, Request};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

#[tokio::test]
async fn test_request_response() {
    let (request, receiver): (Request<&str, usize, ()>, _) = Request::new("dim");
    assert_eq!(request.payload, "dim");
    let (payload, responder) = request.into_parts();
    responder
        .send(Ok(payload.len()))
        .expect("Channel failure when sending response");
    assert_eq!(receiver.await.expect("Response channel closed"), Ok(3));
}

#[tokio::test]
async fn test_response_to_departed_requester() {
    let (request, receiver): (Request<(), u32, ()>, _) = Request::new(());
    drop(receiver);
    let (_, responder) = request.into_parts();
    assert_eq!(responder.send(Ok(1)), Err(Ok(1)));
}

#[tokio::test]
async fn test_requests_are_answered_in_order() {
    let stopped = make_flag();
    let port = spawn_bounded_accumulator(10, stopped.clone());
    assert_eq!(port.request(Op::Add(4)).await.unwrap(), 4);
    assert_eq!(port.request(Op::Add(5)).await.unwrap(), 9);
    let error = port
        .request(Op::Add(2))
        .await
        .expect_err("Accumulator should refuse to overflow");
    match error {
        ActorRequestError::Actor(e) => {
            assert_eq!(e.to_string(), "would exceed 10");
            assert_eq!(e.kind(), std::io::ErrorKind::InvalidInput);
        }
        _ => panic!("Actor error not translated correctly"),
    }
    // A refused request leaves the state alone
    assert_eq!(port.request(Op::Add(1)).await.unwrap(), 10);

    let other_port = port.clone();
    assert!(!stopped.load(Ordering::Acquire));
    drop(port);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!stopped.load(Ordering::Acquire));
    other_port.await_shutdown().await;
    assert!(stopped.load(Ordering::Acquire));
}

#[tokio::test]
async fn test_transport_errors() {
    let port = spawn_bounded_accumulator(10, make_flag());
    match port.request(Op::Vanish).await {
        Err(ActorRequestError::Recv) => {}
        _ => panic!("Dropped request not reported as Recv"),
    }
    match port.request(Op::Add(1)).await {
        Err(ActorRequestError::Send) => {}
        _ => panic!("Request to a stopped actor not reported as Send"),
    }
    // Must not hang when the actor is already gone
    port.await_shutdown().await;
}

#[tokio::test]
async fn test_handle_drop() {
    let stopped = make_flag();
    let handle = spawn_child(stopped.clone());
    assert!(!stopped.load(Ordering::Acquire));
    drop(handle);
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(stopped.load(Ordering::Acquire));
}

#[tokio::test]
async fn test_handle_await() {
    let stopped = make_flag();
    let handle = spawn_child(stopped.clone());
    handle.await_shutdown().await;
    assert!(stopped.load(Ordering::Acquire));
}

enum Op {
    Add(u32),
    // Ends the actor without answering, real actors must never do this.
    Vanish,
}

fn spawn_bounded_accumulator(
    limit: u32,
    stopped: Arc<AtomicBool>,
) -> ActorPort<Op, u32, std::io::Error> {
    let (port, mut rx) = ActorPort::make();
    tokio::spawn(async move {
        let mut total = 0;
        while let Some(req) = rx.recv().await {
            let (op, responder) = req.into_parts();
            let response = match op {
                Op::Add(n) if total + n <= limit => {
                    total += n;
                    Ok(total)
                }
                Op::Add(_) => Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("would exceed {}", limit),
                )),
                Op::Vanish => return,
            };
            responder.send(response).unwrap();
        }
        stopped.store(true, Ordering::Release);
    });
    port
}

fn spawn_child(stopped: Arc<AtomicBool>) -> Handle {
    let (handle, mut child) = Handle::new();
    tokio::spawn(async move {
        child.should_terminate().await;
        stopped.store(true, Ordering::Release);
    });
    handle
}

fn make_flag() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}
