//! Local HTTP server for adapter tests.

use axum::Router;
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}")
}
