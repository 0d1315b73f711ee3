/// Liveness and readiness probe. Always answers 200 once the router is up.
pub async fn ok() -> &'static str {
    "OK"
}
