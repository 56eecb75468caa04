use shared::{PageContext, Result, Tally, VoteAction, VoteOptions};
use tracing::{debug, info};

use crate::routes::AppState;
use crate::store::CounterStore;

pub struct VoteProcessor;

impl VoteProcessor {
    /// Creates missing counters. Existing counts are left alone so restarts
    /// and additional instances never wipe votes.
    pub async fn initialize(store: &dyn CounterStore, options: &VoteOptions) -> Result<()> {
        for option in options.iter() {
            if store.ensure_initialized(option.key()).await? {
                info!(option = %option, "Initialized counter");
            }
        }
        Ok(())
    }

    async fn read_tallies(state: &AppState) -> Result<(Tally, Tally)> {
        let options = &state.config.options;
        let (first, second) = tokio::try_join!(
            state.store.get(options.first.key()),
            state.store.get(options.second.key()),
        )?;
        Ok((
            Tally::new(options.first.clone(), first),
            Tally::new(options.second.clone(), second),
        ))
    }

    pub async fn current(state: &AppState) -> Result<PageContext> {
        let (first, second) = Self::read_tallies(state).await?;
        for tally in [&first, &second] {
            state.telemetry.counter_retrieved(&tally.option, tally.count);
        }
        Ok(PageContext::new(state.config.title.clone(), first, second))
    }

    pub async fn apply(state: &AppState, action: VoteAction) -> Result<PageContext> {
        let options = &state.config.options;
        match action {
            VoteAction::Reset => {
                state.store.reset_all(&options.keys()).await?;
                let ctx = PageContext::zeroed(state.config.title.clone(), options);
                for tally in ctx.tallies() {
                    state.telemetry.counter_reset(&tally.option, tally.count);
                }
                debug!("Counters reset");
                Ok(ctx)
            }
            VoteAction::Increment(option) => {
                let count = state.store.increment(option.key(), 1).await?;
                debug!(option = %option, count, "Vote recorded");
                let (first, second) = Self::read_tallies(state).await?;
                Ok(PageContext::new(state.config.title.clone(), first, second))
            }
        }
    }
}
