//! Minimal corso example — CRUD-style JSON endpoints and health checks.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"alice"}'
//!   curl -X DELETE http://localhost:3000/users/42
//!   curl http://localhost:3000/healthz

use corso::{Request, Res, Router, Server, StatusCode, health};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .get("/users/:id", get_user)
        .post("/users", create_user)
        .delete("/users/:id", delete_user)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// GET /users/:id
async fn get_user(req: Request, res: Res) {
    let id = req.param("id").unwrap_or("unknown");
    res.json(&serde_json::json!({ "id": id, "name": "alice" }));
}

// POST /users
//
// req.body() is &[u8] — parse with serde_json::from_slice or whatever you
// like. corso does not touch the bytes.
async fn create_user(req: Request, res: Res) {
    if req.body().is_empty() {
        res.send_status(StatusCode::BAD_REQUEST);
        return;
    }

    res.status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(&serde_json::json!({ "id": "99", "name": "new_user" }));
}

// DELETE /users/:id → 204 No Content
async fn delete_user(_req: Request, res: Res) {
    res.status(StatusCode::NO_CONTENT);
    res.end();
}
