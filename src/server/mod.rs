/*-------------------------------------------------------------------------------------------------
  HTTP Server Modules
-------------------------------------------------------------------------------------------------*/

pub mod handler;

use crate::core::allowlist::AllowlistLookup;
use crate::core::check::Checker;
use crate::core::client::RequiredRangeSource;
use crate::core::config::Credentials;
use crate::core::errors::{Error, Result};
use handler::{authorize, MissingCidrsBody, Rejection, CHECK_FAILED, MISSING_CREDENTIALS};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Largest request body read; a larger body is answered as missing credentials.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/*-------------------------------------------------------------------------------------------------
  Server State
-------------------------------------------------------------------------------------------------*/

/// Shared, read-only state of the check service.
#[derive(Debug)]
pub struct ServerState<R, L> {
    checker: Checker<R, L>,

    /// Credentials used for `GET` requests; `None` when the server was started without them.
    credentials: Option<Credentials>,
}

impl<R, L> ServerState<R, L> {
    pub fn new(checker: Checker<R, L>, credentials: Option<Credentials>) -> Self {
        Self {
            checker,
            credentials,
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Serve
-------------------------------------------------------------------------------------------------*/

/// Bind `addr` and serve the check endpoint until the listener fails.
pub async fn serve<R, L>(addr: SocketAddr, state: ServerState<R, L>) -> Result<()>
where
    R: RequiredRangeSource + Send + Sync + 'static,
    L: AllowlistLookup + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}{}", listener.local_addr()?, handler::ROUTE);

    serve_listener(listener, Arc::new(state)).await
}

/// Serve the check endpoint on an already bound listener. Each connection is handled on its
/// own task; each check runs on the blocking thread pool.
pub async fn serve_listener<R, L>(
    listener: TcpListener,
    state: Arc<ServerState<R, L>>,
) -> Result<()>
where
    R: RequiredRangeSource + Send + Sync + 'static,
    L: AllowlistLookup + Send + Sync + 'static,
{
    if state.credentials.is_none() {
        warn!("Server started without credentials; GET requests will be rejected");
    }

    loop {
        let (stream, peer) = listener.accept().await?;
        debug!("Connection from {peer}");

        let io = TokioIo::new(stream);
        let state = Arc::clone(&state);

        tokio::spawn(async move {
            let service = service_fn(move |request| handle_request(request, Arc::clone(&state)));
            if let Err(error) = http1::Builder::new().serve_connection(io, service).await {
                warn!("Connection from {peer} failed: {error}");
            }
        });
    }
}

/*-------------------------------------------------------------------------------------------------
  Request Handler
-------------------------------------------------------------------------------------------------*/

/// Answer one request: resolve credentials, run the check, and serialize the result.
pub async fn handle_request<B, R, L>(
    request: Request<B>,
    state: Arc<ServerState<R, L>>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Error>,
    R: RequiredRangeSource + Send + Sync + 'static,
    L: AllowlistLookup + Send + Sync + 'static,
{
    let (parts, body) = request.into_parts();
    info!("{} {}", parts.method, parts.uri.path());

    let body = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(error) => {
            warn!("Failed to read request body: {error}");
            return Ok(rejection_response(&MISSING_CREDENTIALS));
        }
    };

    let credentials = match authorize(
        &parts.method,
        parts.uri.path(),
        &body,
        state.credentials.as_ref(),
    ) {
        Ok(credentials) => credentials,
        Err(rejection) => {
            warn!("Rejected {} {}: {}", parts.method, parts.uri.path(), rejection.message);
            return Ok(rejection_response(&rejection));
        }
    };

    let check_state = Arc::clone(&state);
    let missing =
        tokio::task::spawn_blocking(move || check_state.checker.run_check(&credentials)).await;

    Ok(match missing {
        Ok(missing_cidrs) => json_response(StatusCode::OK, &MissingCidrsBody { missing_cidrs }),
        Err(join_error) => {
            error!("Check task failed: {join_error}");
            rejection_response(&CHECK_FAILED)
        }
    })
}

/*-------------------------------------------------------------------------------------------------
  Responses
-------------------------------------------------------------------------------------------------*/

fn rejection_response(rejection: &Rejection) -> Response<Full<Bytes>> {
    json_response(rejection.status, &rejection.body())
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let (status, body) = match serde_json::to_vec(body) {
        Ok(body) => (status, body),
        Err(error) => {
            error!("Failed to serialize response: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                br#"{"error":"Check failed"}"#.to_vec(),
            )
        }
    };

    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
