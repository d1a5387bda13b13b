use crate::generator;
use crate::server::{error_response, run_blocking, AppState};
use actix_web::{web, HttpResponse, Responder};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub seed: Option<u64>,
}

/// POST /routes/generate  {"seed": 42}
/// Replaces the whole routes table. Body is optional.
pub async fn generate_routes_handler(
    state: web::Data<AppState>,
    body: Option<web::Json<GenerateRequest>>,
) -> impl Responder {
    let seed = body.and_then(|b| b.into_inner().seed).or(state.settings.seed);
    let res = run_blocking(state, move |conn, _| {
        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        generator::regenerate(conn, &mut rng)
    })
    .await;
    match res {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(&e),
    }
}
