use std::str::FromStr;

use actix_web::{get, web, Responder};
use serde::Deserialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::wallet,
    model::WalletAnalyticsResult,
    types::ChainId,
};

#[get("/analytics")]
async fn index(
    state: web::Data<AppState<State>>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let chain = data.chain.as_deref().unwrap_or("base");

    // chain and pipeline failures share the success:false body shape
    let result = match ChainId::from_str(chain) {
        Ok(chain) => {
            wallet::get_wallet_analytics(&state, &data.address, chain).await
        }
        Err(err) => WalletAnalyticsResult::failure(&data.address, err),
    };

    Ok(web::Json(result))
}

#[derive(Debug, Deserialize)]
pub struct Query {
    address: String,
    chain: Option<String>,
}
