//! Helpers shared by tests that talk to in-process HTTP stubs.

use axum::Router;

/// Serve `router` on an ephemeral local port and return its base URL.
#[allow(clippy::expect_used)]
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}
