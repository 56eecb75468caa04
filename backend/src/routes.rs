use std::sync::Arc;

use rocket::{State, get, post, form::Form, response::content::RawHtml};
use shared::{parse_vote, VoteForm};
use tracing::{debug, instrument};

use crate::{
    config::AppConfig,
    error::ApiError,
    processor::VoteProcessor,
    render::render_page,
    store::CounterStore,
    telemetry::TelemetrySink,
};

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn CounterStore>,
    pub telemetry: Arc<dyn TelemetrySink>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn CounterStore>, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self { config, store, telemetry }
    }
}

#[instrument(skip(state))]
#[get("/")]
pub async fn index(state: &State<AppState>) -> Result<RawHtml<String>, ApiError> {
    let ctx = VoteProcessor::current(state).await?;
    Ok(RawHtml(render_page(&ctx)?))
}

/// A body that is not a form at all is treated like a form without `vote`.
#[instrument(skip(state, form))]
#[post("/", data = "<form>")]
pub async fn cast_vote(state: &State<AppState>, form: Option<Form<VoteForm>>) -> Result<RawHtml<String>, ApiError> {
    let vote = form.as_ref().and_then(|f| f.vote.as_deref());
    let action = parse_vote(vote, &state.config.options)?;
    debug!(?action, "Applying vote");
    let ctx = VoteProcessor::apply(state, action).await?;
    Ok(RawHtml(render_page(&ctx)?))
}
