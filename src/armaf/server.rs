//! Request-serving actors built on [super::ports].

use super::ActorPort;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::oneshot;

/// An actor which does nothing but answer requests sent to its [ActorPort].
///
/// A server goes through three phases:
///
/// 1. [Server::initialize] runs before [spawn_server] returns. If it fails,
///    the server never starts and the error is returned instead of a port.
/// 2. [Server::handle_message] is called for each request, strictly one after
///    another. Its result becomes the requester's response.
/// 3. Once every port is dropped, [Server::tear_down] runs and the task ends.
///    Synchronous clean up belongs in a [Drop] impl instead.
#[async_trait]
pub trait Server<P, R>: Send + 'static {
    /// Name used in log messages
    fn get_name(&self) -> String;

    async fn handle_message(&mut self, payload: P) -> Result<R>;

    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Errors returned here are only logged, nobody is left to receive them.
    async fn tear_down(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Runs `server` in its own task and returns the port to reach it, once its
/// initialization succeeded.
pub async fn spawn_server<P, R>(
    mut server: impl Server<P, R>,
) -> Result<ActorPort<P, R, anyhow::Error>>
where
    P: Send + 'static,
    R: Send + 'static,
{
    let name = server.get_name();
    log::debug!("{} spawning", name);
    let (port, mut rx) = ActorPort::make();
    let (init_sender, init_receiver) = oneshot::channel::<Result<()>>();
    tokio::spawn(async move {
        let name = server.get_name();
        if let Err(e) = server.initialize().await {
            // spawn_server is still waiting on the other end
            let _ = init_sender.send(Err(e));
            return;
        }
        if init_sender.send(Ok(())).is_err() {
            log::error!("{} initialized, but nobody is waiting for it", name);
            return;
        }
        log::info!("{} initialized successfully", name);
        while let Some(request) = rx.recv().await {
            let (payload, responder) = request.into_parts();
            let result = server.handle_message(payload).await;
            if let Err(e) = &result {
                log::error!("{} message handler returned error: {:#}", name, e);
            }
            if responder.send(result).is_err() {
                log::error!("{} couldn't respond, requester went away", name);
            }
        }
        log::debug!("{} stopping", name);
        if let Err(e) = server.tear_down().await {
            log::error!("{} failed to tear down: {:#}", name, e);
        }
        // Dropping the server before the receiver lets await_shutdown observe
        // its Drop side effects.
        drop(server);
        log::debug!("{} stopped", name);
        drop(rx);
    });

    match init_receiver.await {
        Ok(Ok(())) => Ok(port),
        Ok(Err(e)) => {
            log::error!("Error initializing {}: {:#}", name, e);
            Err(e)
        }
        Err(e) => Err(anyhow!(e)),
    }
}
