use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingResponse {
    pub company_name: String,
    pub bot_name: String,
    pub logo: String,
}

pub async fn branding_handler(State(state): State<AppState>) -> Json<BrandingResponse> {
    Json(BrandingResponse {
        company_name: state.branding.company_name.clone(),
        bot_name: state.branding.bot_name.clone(),
        logo: state.branding.logo.clone(),
    })
}
