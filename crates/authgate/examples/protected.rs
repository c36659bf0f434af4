//! Serves `/me` behind the gate and `/health` outside it.
//!
//! ```sh
//! JWT_SECRET=s3cr3t AUTHGATE_SECRET_KEY_NAME=JWT_SECRET AUTHGATE_DEMO_UID=42 \
//!     cargo run -p authgate --example protected
//! curl -H "Authorization: Bearer <printed token>" localhost:3000/me
//! ```

use authgate::{jwt, resolve_secret, AuthGate, AuthGateExt, GateConfig, SecretStore, Uid};
use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

async fn me(Extension(uid): Extension<Uid>) -> Result<Json<Value>, StatusCode> {
    // The gate lets tokens without the claim through; this route needs one.
    let uid = uid.into_value().ok_or(StatusCode::FORBIDDEN)?;
    Ok(Json(json!({ "uid": uid })))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config: GateConfig = GateConfig::builder()
        .with_dotenv()
        .with_logging_from_env()
        .with_env_prefix("AUTHGATE")
        .build()?;

    let secrets = SecretStore::from_env();
    let gate = AuthGate::hs256(config, secrets.clone());
    gate.check_configuration()?;
    let config = gate.config();

    if let Ok(uid) = std::env::var("AUTHGATE_DEMO_UID") {
        let secret = resolve_secret(&secrets, &config.secret_key_name)?;
        let mut claims = serde_json::Map::new();
        claims.insert(config.claim_key_name.clone(), Value::String(uid));
        let token = jwt::sign(secret, &claims)?;
        println!("demo token: {token}");
    }

    tracing::info!(
        secret_key = %config.secret_key_name,
        claim = %config.claim_key_name,
        "starting protected demo"
    );

    let app = Router::new()
        .route("/me", get(me))
        .with_auth_gate(gate)
        .route("/health", get(|| async { StatusCode::OK }))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    axum::serve(listener, app).await?;
    Ok(())
}
