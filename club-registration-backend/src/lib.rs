//! Club registration: the registration service, capacity administration, the dashboard
//! views and a JSON API over them.

pub mod capacity;
pub mod error;
pub mod examples;
pub mod registration;
pub mod roster;
pub mod routes;
pub mod views;

use std::future::Future;
use std::sync::Arc;

use club_registration_config::Config;
use error::AppError;
use axum::http::Request;
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo};
use roster::Roster;
use tokio::net::TcpListener;
use tokio::select;
use tokio::sync::watch;
use tower::ServiceExt as _;
use tracing::{error, info, warn};

pub async fn run_server(
    config: &Config,
    roster: Arc<Roster>,
) -> Result<impl Future<Output = ()>, AppError> {
    let listener = TcpListener::bind(config.listen_address).await?;
    info!(address = %listener.local_addr()?, "started up server...");
    Ok(serve(listener, roster, shutdown_signal()))
}

/// Accepts connections until `shutdown` completes, then lets open connections finish.
#[allow(clippy::redundant_pub_crate)]
pub async fn serve(listener: TcpListener, roster: Arc<Roster>, shutdown: impl Future<Output = ()>) {
    let app = routes::router(roster);

    // tell the connections to shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let shutdown_tx = Arc::new(shutdown_tx);

    // wait for the connections to finish shutdown
    let (closed_tx, closed_rx) = watch::channel(());

    tokio::pin!(shutdown);

    loop {
        select! {
            accept = listener.accept() => {
                let (socket, remote_addr) = match accept {
                    Ok(accept) => accept,
                    Err(err) => {
                        warn!("failed to accept connection: {err}");
                        continue;
                    }
                };

                let app = app.clone();
                let shutdown_tx = Arc::clone(&shutdown_tx);
                let closed_rx = closed_rx.clone();

                tokio::spawn(async move {
                    let socket = TokioIo::new(socket);
                    let service = hyper::service::service_fn(move |request: Request<Incoming>| {
                        app.clone().oneshot(request)
                    });

                    let builder = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new());
                    let connection = builder.serve_connection(socket, service);
                    tokio::pin!(connection);

                    let mut shutting_down = false;
                    loop {
                        select! {
                            connection_result = connection.as_mut() => {
                                if let Err(err) = connection_result {
                                    error!("failed to serve connection {remote_addr}: {err:#}");
                                }
                                break; // (gracefully) finished connection
                            }
                            () = shutdown_tx.closed(), if !shutting_down => {
                                shutting_down = true;
                                connection.as_mut().graceful_shutdown();
                            }
                        }
                    }

                    drop(closed_rx);
                });
            }
            () = &mut shutdown => {
                warn!("shutting down");
                drop(shutdown_rx); // initiate shutdown
                drop(closed_rx);
                closed_tx.closed().await;
                break;
            }
        }
    }
    info!("server stopped");
}

/// Completes on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
