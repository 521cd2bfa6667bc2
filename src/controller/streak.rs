use std::str::FromStr;

use actix_web::{get, web, Responder};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::{activity, history, identity},
    model::{DailyActivityMap, StreakStats},
    types::ChainId,
};

#[get("/streak")]
async fn index(
    state: web::Data<AppState<State>>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let chain = ChainId::from_str(data.chain.as_deref().unwrap_or("base"))?;
    let spec = state.config.chain_spec(chain)?;

    let identity = identity::resolve(&state, spec, &data.address).await?;
    let records =
        history::fetch_history(&state.http, spec, &identity.address).await;

    let range = match (&data.start, &data.end) {
        (Some(start), Some(end)) => Some((
            parse_date(start).context("could not parse start date")?,
            parse_date(end).context("could not parse end date")?,
        )),
        _ => None,
    };

    let daily_activity = activity::bucket_by_day(&records, range);
    let streaks =
        activity::compute_streaks(&daily_activity, Utc::now().date_naive());

    Ok(web::Json(Response {
        success: true,
        daily_activity,
        streaks,
    }))
}

fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
}

#[derive(Debug, Deserialize)]
pub struct Query {
    address: String,
    chain: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    pub daily_activity: DailyActivityMap,
    #[serde(flatten)]
    pub streaks: StreakStats,
}
