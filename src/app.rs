use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, tasks};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(tasks::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::extract::{FromRequestParts, State};
    use axum::http::{header::AUTHORIZATION, Request, StatusCode};
    use axum::Json;

    use crate::auth::dto::CredentialsRequest;
    use crate::auth::handlers::{sign_in, sign_up};
    use crate::auth::jwt::AuthUser;
    use crate::state::AppState;
    use crate::tasks::dto::CreateTaskRequest;
    use crate::tasks::handlers::{create_task, list_tasks};

    // Sign up, sign in, create a task with the issued token, list it back.
    #[tokio::test]
    async fn full_sign_up_to_task_list_flow() {
        let state = AppState::fake();

        let (status, Json(alice)) = sign_up(
            State(state.clone()),
            Ok(Json(CredentialsRequest {
                username: "alice".into(),
                password: "pw1".into(),
            })),
        )
        .await
        .expect("sign-up");
        assert_eq!(status, StatusCode::CREATED);

        let Json(signed_in) = sign_in(
            State(state.clone()),
            Ok(Json(CredentialsRequest {
                username: "alice".into(),
                password: "pw1".into(),
            })),
        )
        .await
        .expect("sign-in");
        assert!(!signed_in.token.is_empty());

        // Run the issued token through the authorization gate.
        let (mut parts, _) = Request::builder()
            .uri("/tasks")
            .header(AUTHORIZATION, &signed_in.token)
            .body(())
            .expect("request")
            .into_parts();
        let auth = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("gate accepts the token");
        assert_eq!(auth.0, alice.id);

        let (status, Json(task)) = create_task(
            State(state.clone()),
            AuthUser(auth.0),
            Ok(Json(CreateTaskRequest {
                title: "T".into(),
                description: "D".into(),
                allotted_to: "alice".into(),
                done_by: String::new(),
                end_time: None,
            })),
        )
        .await
        .expect("create task");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(task.status, "Pending");
        assert_eq!(task.owner_id, alice.id);

        let Json(tasks) = list_tasks(State(state), AuthUser(alice.id))
            .await
            .expect("list tasks");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, task.id);
    }
}
