use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;
use trellis_core::{Dispatcher, Outcome, RequestView, SERVER_ERROR_BODY};

/// Shared per-request state: the dispatcher and the context path to strip.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub dispatcher: Arc<Dispatcher>,
    pub context_path: Arc<str>,
}

/// Every GET or POST falls through to the dispatcher; axum does no path routing of its own.
/// Other methods are answered with `405 Method Not Allowed`.
#[allow(unreachable_pub)]
pub fn init(state: ServerState) -> Router {
    let handler: MethodRouter = get(dispatch).post(dispatch).with_state(state);
    Router::new().fallback_service(handler).layer(TraceLayer::new_for_http())
}

async fn dispatch(State(state): State<ServerState>, uri: Uri) -> Response {
    let target = uri.path_and_query().map_or_else(|| uri.path().to_owned(), ToString::to_string);

    // Handlers are synchronous and may block.
    let task = tokio::task::spawn_blocking(move || {
        let request = RequestView::from_target(&target).with_context_path(state.context_path.as_ref());
        let mut body = String::new();
        let outcome = state.dispatcher.dispatch(&request, &mut body);
        (outcome, body)
    });

    match task.await {
        Ok((outcome, body)) => (status(outcome), body).into_response(),
        Err(e) => {
            error!(error = %e, "Dispatch task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_BODY).into_response()
        },
    }
}

fn status(outcome: Outcome) -> StatusCode {
    StatusCode::from_u16(outcome.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
