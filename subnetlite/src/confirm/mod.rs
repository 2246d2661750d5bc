//! Fleet-wide confirmation engine.
//!
//! Every stage of the workflow submits its transaction exactly once and then
//! calls into this module to *observe* the result. Observation is
//! side-effect free, so it can be cancelled or abandoned at any point.
//!
//! ## Fan-out
//!
//! ```text
//!                 ┌─ worker(node-0): sleep → probe → ... → Ok
//! wait_for_fleet ─┼─ worker(node-1): sleep → probe → ... → Ok
//!                 └─ worker(node-2): sleep → probe → Err ──┐
//!                                                          └→ cancel siblings, return Err
//! ```
//!
//! One worker per node, all driven by `try_join_all` inside the caller's
//! task. The wait succeeds only when every worker succeeds. The first error
//! wins and the remaining workers are cancelled and dropped. When several
//! workers fail in the same poll round, which error is reported depends on
//! the order the join happens to poll them and is not guaranteed.

mod pacing;
mod probe;

pub use pacing::Pacing;
pub use probe::{ChainBootstrapped, ChainValidating, StatusProbe, TxCommitted};

use crate::cancel::Cancellation;
use crate::network::{Fleet, Node};
use futures::future::try_join_all;
use std::time::Duration;
use subnetlite_shared::{Id, SubnetliteResult};

/// What a worker does when a probe returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrors {
    /// Abort the worker, and with it the whole wait.
    Fail,
    /// Treat the error as "not yet" and poll again.
    Retry,
}

/// Wait until `probe` holds on every node of `fleet`.
pub async fn wait_for_fleet<P>(
    cx: &Cancellation,
    fleet: &Fleet,
    probe: &P,
    pacing: &Pacing,
    errors: QueryErrors,
) -> SubnetliteResult<()>
where
    P: StatusProbe + ?Sized,
{
    let group = cx.child();

    let workers = fleet.values().map(|node| {
        let group = &group;
        async move {
            let result = wait_for_node(group, node.as_ref(), probe, pacing, errors).await;
            if result.is_err() {
                group.cancel();
            }
            result
        }
    });

    let result = try_join_all(workers).await.map(|_| ());
    group.cancel();
    result
}

/// Wait until `tx_id` is committed on every node of `fleet`.
pub async fn wait_for_tx_on_fleet(
    cx: &Cancellation,
    fleet: &Fleet,
    label: &'static str,
    tx_id: Id,
    interval: Duration,
) -> SubnetliteResult<()> {
    wait_for_fleet(
        cx,
        fleet,
        &TxCommitted::new(label, tx_id),
        &Pacing::fixed(interval),
        QueryErrors::Fail,
    )
    .await
}

/// Poll a single node until `probe` holds.
///
/// Each iteration sleeps first, then probes. Cancellation is checked during
/// both, and a cancelled worker never issues another probe.
pub async fn wait_for_node<P>(
    cx: &Cancellation,
    node: &dyn Node,
    probe: &P,
    pacing: &Pacing,
    errors: QueryErrors,
) -> SubnetliteResult<()>
where
    P: StatusProbe + ?Sized,
{
    loop {
        cx.sleep(pacing.current()).await?;

        match cx.run(probe.probe(node)).await? {
            Ok(true) => {
                pacing.settle();
                tracing::debug!(node = %node.name(), "{} confirmed", probe.describe());
                return Ok(());
            }
            Ok(false) => {
                tracing::debug!(node = %node.name(), "waiting for {}", probe.describe());
            }
            Err(e) => match errors {
                QueryErrors::Fail => {
                    tracing::debug!(
                        node = %node.name(),
                        error = %e,
                        "query failed while waiting for {}",
                        probe.describe()
                    );
                    return Err(e);
                }
                QueryErrors::Retry => {
                    tracing::debug!(
                        node = %node.name(),
                        error = %e,
                        "query failed while waiting for {}, retrying",
                        probe.describe()
                    );
                }
            },
        }
    }
}
