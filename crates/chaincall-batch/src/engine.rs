//! `MulticallClient` — shards a request into batches, runs them as worker
//! tasks under a concurrency bound and merges the results in input order.

use std::num::NonZeroUsize;
use std::sync::Arc;

use chaincall_core::{
    partition, Address, BatchRange, Call, CallCodec, CallExecutor, CallOptions, Concurrency,
    ExecuteError, MulticallConfig, MulticallError,
};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::request::BatchRequest;

/// Batched read-call engine bound to one executor and one configuration.
#[derive(Clone)]
pub struct MulticallClient {
    executor: Arc<dyn CallExecutor>,
    config: MulticallConfig,
}

/// Everything a batch worker shares with its siblings.
struct BatchContext<C, F> {
    executor: Arc<dyn CallExecutor>,
    aggregator: Address,
    target: Address,
    options: CallOptions,
    codec: C,
    interpret: F,
}

impl MulticallClient {
    pub fn new(executor: Arc<dyn CallExecutor>) -> Self {
        Self::with_config(executor, MulticallConfig::default())
    }

    pub fn with_config(executor: Arc<dyn CallExecutor>, config: MulticallConfig) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &MulticallConfig {
        &self.config
    }

    /// The aggregator contract this client sends batches to.
    pub fn aggregator(&self) -> Address {
        self.config.aggregator()
    }

    /// Execute `request`, one aggregate call per batch, and return one
    /// interpreted value per input.
    ///
    /// Every batch runs on its own tokio task, so decoding and `interpret`
    /// of different batches proceed in parallel on a multi-threaded runtime.
    /// At most `max_concurrency` batches hold a slot at once.
    ///
    /// `interpret` receives the decoded fields of one sub-result. A sub-result
    /// that fails to decode (e.g. empty return data from an address with no
    /// code) is passed as an empty `Vec`; whether that is an error is up to
    /// `interpret`.
    ///
    /// # Errors
    /// - [`MulticallError::Config`] for a zero target or zero batch size
    /// - [`MulticallError::Encode`] if an input cannot be packed
    /// - [`MulticallError::Batch`] if an aggregate call fails
    /// - [`MulticallError::Worker`] if a batch task is cancelled
    ///
    /// All batches run to completion before returning. When several fail,
    /// the first failure observed is returned and the rest are logged.
    /// No partial results are returned.
    ///
    /// # Panics
    /// A panic inside `interpret` or the codec is resumed on the caller.
    pub async fn call<C, F, U>(
        &self,
        request: BatchRequest<'_, C::Input>,
        codec: C,
        interpret: F,
    ) -> Result<Vec<U>, MulticallError>
    where
        C: CallCodec + Send + Sync + 'static,
        C::Input: Clone + Send + Sync + 'static,
        F: Fn(Vec<C::Value>) -> U + Send + Sync + 'static,
        U: Send + 'static,
    {
        let BatchRequest {
            target,
            inputs,
            max_batch_size,
            max_concurrency,
            options,
        } = request;

        if target.is_zero() {
            return Err(MulticallError::config("target contract address is zero"));
        }
        let batch_size = NonZeroUsize::new(max_batch_size)
            .ok_or_else(|| MulticallError::config("max_batch_size must be at least 1"))?;

        let aggregator = self.config.aggregator();
        let concurrency = Concurrency::from_setting(max_concurrency)
            .unwrap_or_else(|| self.config.concurrency());
        let ranges = partition(inputs.len(), batch_size);
        if ranges.is_empty() {
            debug!(%target, "multicall: no inputs, nothing to dispatch");
            return Ok(Vec::new());
        }

        let slots = concurrency.slots(ranges.len());
        info!(
            inputs = inputs.len(),
            batches = ranges.len(),
            batch_size = batch_size.get(),
            slots,
            %target,
            %aggregator,
            "multicall: dispatching batches"
        );

        let ctx = Arc::new(BatchContext {
            executor: self.executor.clone(),
            aggregator,
            target,
            options,
            codec,
            interpret,
        });
        let permits = Arc::new(Semaphore::new(slots));

        let mut workers = JoinSet::new();
        for range in ranges {
            let ctx = ctx.clone();
            let permits = permits.clone();
            let batch_inputs = inputs[range.start..range.end].to_vec();
            workers.spawn(async move {
                let _permit = permits.acquire_owned().await.map_err(|e| {
                    MulticallError::Worker {
                        reason: format!("batch {}: {e}", range.index),
                    }
                })?;
                let values = execute_batch(&ctx, range, &batch_inputs).await?;
                Ok::<_, MulticallError>((range, values))
            });
        }

        // Ranges from `partition` are disjoint, so each slot is written once.
        let mut outputs: Vec<Option<U>> = std::iter::repeat_with(|| None)
            .take(inputs.len())
            .collect();
        let mut first_error = None;
        while let Some(joined) = workers.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(err) => Err(MulticallError::Worker {
                    reason: err.to_string(),
                }),
            };
            match result {
                Ok((range, values)) => {
                    for (slot, value) in outputs[range.start..range.end].iter_mut().zip(values) {
                        *slot = Some(value);
                    }
                }
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(err) => warn!(error = %err, "multicall: discarding additional batch failure"),
            }
        }

        if let Some(err) = first_error {
            warn!(error = %err, %target, "multicall: invocation failed");
            return Err(err);
        }

        outputs
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(MulticallError::MissingResult { index }))
            .collect()
    }
}

/// Encode, execute and interpret one batch.
async fn execute_batch<C, F, U>(
    ctx: &BatchContext<C, F>,
    range: BatchRange,
    inputs: &[C::Input],
) -> Result<Vec<U>, MulticallError>
where
    C: CallCodec,
    F: Fn(Vec<C::Value>) -> U,
{
    let target = ctx.target;
    let calls = inputs
        .iter()
        .enumerate()
        .map(|(offset, input)| {
            ctx.codec
                .encode(input)
                .map(|call_data| Call { target, call_data })
                .map_err(|source| MulticallError::Encode {
                    index: range.start + offset,
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        batch = range.index,
        start = range.start,
        end = range.end,
        "multicall: executing batch"
    );

    let batch_error = |source: ExecuteError| MulticallError::Batch {
        batch: range.index,
        start: range.start,
        end: range.end,
        source,
    };

    let result = ctx
        .executor
        .aggregate(ctx.aggregator, &ctx.options, calls)
        .await
        .map_err(&batch_error)?;

    if result.return_data.len() != range.len() {
        return Err(batch_error(ExecuteError::MalformedResponse {
            reason: format!(
                "expected {} results, got {}",
                range.len(),
                result.return_data.len()
            ),
        }));
    }

    let block = result.block_number;
    let values = result
        .return_data
        .iter()
        .enumerate()
        .map(|(offset, raw)| {
            let fields = ctx.codec.decode(raw).unwrap_or_else(|err| {
                warn!(
                    index = range.start + offset,
                    block,
                    error = %err,
                    "multicall: sub-result returned no data"
                );
                Vec::new()
            });
            (ctx.interpret)(fields)
        })
        .collect();

    debug!(batch = range.index, block, "multicall: batch complete");
    Ok(values)
}

impl std::fmt::Debug for MulticallClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MulticallClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
