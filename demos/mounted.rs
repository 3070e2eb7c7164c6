//! Mounted sub-router with wrap-around middleware.
//!
//! Run with:
//!   RUST_LOG=corso=trace cargo run --example mounted
//!
//! Try:
//!   curl 'http://localhost:3000/m/sub/42?verbose=1'

use std::time::Instant;

use corso::{Next, Request, Res, Router, Server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let api = Router::new().get("/sub/:id", get_item);

    let app = Router::new()
        .wrap(timing)
        .mount("/m", &api)
        .trace_matching(true);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// Runs ahead of every route; the code after `next.run` executes once the
// rest of the chain — including the terminal handler — has finished.
async fn timing(req: Request, res: Res, next: Next) {
    let started = Instant::now();
    let path = req.path().to_owned();

    next.run(req, res).await;

    tracing::info!(%path, elapsed = ?started.elapsed(), "request served");
}

// GET /m/sub/:id
async fn get_item(req: Request, res: Res) {
    res.json(&serde_json::json!({
        "params": req.params(),
        "query": req.query(),
    }));
}
