//! Request/response ports and lifecycle handles for actors running as Tokio tasks.

use std::fmt::Debug;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

/// How many requests may wait in an actor's queue before senders block.
const QUEUE_DEPTH: usize = 8;

/// The channel an actor answers a [Request] on.
pub type Responder<R, E> = oneshot::Sender<Result<R, E>>;
type ResponseReceiver<R, E> = oneshot::Receiver<Result<R, E>>;

/// A single request queued for an actor, carrying the channel its result is
/// sent back on.
pub struct Request<P, R, E> {
    pub payload: P,
    responder: Responder<R, E>,
}

impl<P, R, E> Request<P, R, E> {
    /// Builds a request around `payload`, returning it together with the
    /// receiver the requester awaits.
    pub fn new(payload: P) -> (Request<P, R, E>, ResponseReceiver<R, E>) {
        let (responder, receiver) = oneshot::channel();
        (Request { payload, responder }, receiver)
    }

    /// Separates the payload from the channel used to answer it. Sending on
    /// the channel fails, handing the result back, if the requester stopped
    /// waiting.
    pub fn into_parts(self) -> (P, Responder<R, E>) {
        (self.payload, self.responder)
    }
}

/// Ways a request to an actor can fail.
#[derive(Debug, Error, Clone)]
pub enum ActorRequestError<E: Debug> {
    #[error("actor is no longer accepting requests")]
    Send,

    #[error("actor dropped the request without responding")]
    Recv,

    #[error("actor failed to handle the request: {0:?}")]
    Actor(E),
}

/// The sending side of an actor's request queue.
///
/// Ports can be cloned freely and every clone feeds the same queue, so an
/// actor handles requests from all of them one at a time, in arrival order.
/// An actor shuts down once every port is gone, which is why there is no
/// dedicated stop message.
#[derive(Debug)]
pub struct ActorPort<P, R, E: Debug> {
    sender: mpsc::Sender<Request<P, R, E>>,
    stopped: watch::Receiver<()>,
}

// Derived Clone would require E: Clone, which anyhow::Error is not.
impl<P, R, E: Debug> Clone for ActorPort<P, R, E> {
    fn clone(&self) -> Self {
        ActorPort {
            sender: self.sender.clone(),
            stopped: self.stopped.clone(),
        }
    }
}

impl<P, R, E: Debug> ActorPort<P, R, E> {
    /// Creates a connected port and receiver. The receiver belongs in the
    /// actor's task, the port is handed to whoever talks to it.
    pub fn make() -> (ActorPort<P, R, E>, ActorReceiver<P, R, E>) {
        let (sender, requests) = mpsc::channel(QUEUE_DEPTH);
        let (stop_notifier, stopped) = watch::channel(());
        (
            ActorPort { sender, stopped },
            ActorReceiver {
                requests,
                _stop_notifier: stop_notifier,
            },
        )
    }

    /// Queues `payload` for the actor and waits for its answer.
    pub async fn request(&self, payload: P) -> Result<R, ActorRequestError<E>> {
        let (request, response) = Request::new(payload);
        if self.sender.send(request).await.is_err() {
            return Err(ActorRequestError::Send);
        }
        match response.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ActorRequestError::Actor(e)),
            Err(_) => Err(ActorRequestError::Recv),
        }
    }

    /// Gives up this port and waits until the actor has stopped.
    ///
    /// Returns once all other clones are gone too and the actor has dropped
    /// its [ActorReceiver].
    pub async fn await_shutdown(self) {
        // The actor only notices shutdown after the last sender closes, ours included.
        drop(self.sender);
        let mut stopped = self.stopped;
        while stopped.changed().await.is_ok() {}
    }
}

/// The actor's end of an [ActorPort].
///
/// Dropping it tells waiting ports the actor is done, so it has to outlive
/// any clean up the actor performs.
#[derive(Debug)]
pub struct ActorReceiver<P, R, E: Debug> {
    requests: mpsc::Receiver<Request<P, R, E>>,
    _stop_notifier: watch::Sender<()>,
}

impl<P, R, E: Debug> ActorReceiver<P, R, E> {
    /// Waits for the next request. `None` means every port is gone and the
    /// actor should clean up and stop.
    pub async fn recv(&mut self) -> Option<Request<P, R, E>> {
        self.requests.recv().await
    }
}

/// A parent's grip on a child task that takes no requests.
///
/// Dropping the handle, or calling [Handle::await_shutdown], asks the child to
/// stop.
pub struct Handle(ActorPort<(), (), ()>);

impl Handle {
    /// Creates a handle for the parent and its counterpart for the child task.
    pub fn new() -> (Handle, HandleChild) {
        let (port, receiver) = ActorPort::make();
        (Handle(port), HandleChild(receiver))
    }

    /// Asks the child to stop and waits until it has.
    pub async fn await_shutdown(self) {
        self.0.await_shutdown().await
    }
}

/// The child's side of a [Handle]. Must be kept until the child's clean up is
/// finished.
pub struct HandleChild(ActorReceiver<(), (), ()>);

impl HandleChild {
    /// Resolves once the parent asked for termination. Meant for a
    /// [tokio::select!] branch next to the child's real work.
    pub async fn should_terminate(&mut self) {
        while self.0.recv().await.is_some() {}
    }
}
