use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use indicatif::ProgressBar;
use tokio::sync::mpsc;

use crate::core::aggregate::AggregateState;
use crate::core::request_executor::RequestExecutor;
use crate::core::ticket_counter::TicketCounter;
use crate::models::report::Report;

/// Run the whole load test: dispatch `total_requests` GETs across
/// `concurrency` workers and build the final report.
///
/// Each worker loops claiming a ticket, executing one request, and sending
/// the outcome into the fan-in channel; a single consumer merges outcomes
/// into the shared aggregate. The snapshot is only taken after the two-phase
/// join (all workers, then the consumer), so it can never miss an in-flight
/// outcome. Transport failures are data in the aggregate, never errors: once
/// dispatching starts the run always completes with a report.
pub async fn run(
    url: &str,
    total_requests: u64,
    concurrency: u64,
    timeout_secs: u64,
    verbose: bool,
) -> anyhow::Result<Report> {
    let started = Instant::now();

    let tickets = Arc::new(TicketCounter::new(total_requests));
    let executor = Arc::new(RequestExecutor::new(url, timeout_secs)?);
    let aggregate = Arc::new(AggregateState::new()?);

    // One slot per worker, like the original's buffered result channel.
    let (tx, mut rx) = mpsc::channel(concurrency.max(1) as usize);

    let mut handles = Vec::with_capacity(concurrency as usize);
    for _ in 0..concurrency {
        let tickets = Arc::clone(&tickets);
        let executor = Arc::clone(&executor);
        let tx = tx.clone();
        handles.push(tokio::spawn(async move {
            while let Some(ticket) = tickets.claim() {
                let outcome = executor.execute().await;
                if verbose {
                    println!(
                        "request {ticket}: status {} in {:?}",
                        outcome.status, outcome.duration
                    );
                }
                // The consumer only hangs up after every sender is gone, so
                // delivery cannot fail while tickets are still being worked.
                if tx.send(outcome).await.is_err() {
                    break;
                }
            }
        }));
    }
    drop(tx);

    let consumer = {
        let aggregate = Arc::clone(&aggregate);
        let progress = if verbose {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total_requests)
        };
        tokio::spawn(async move {
            while let Some(outcome) = rx.recv().await {
                aggregate.merge(&outcome);
                progress.inc(1);
            }
            progress.finish_and_clear();
        })
    };

    // Two-phase join: workers first; their exit drops the last sender and
    // closes the channel, then the consumer drains whatever is still queued.
    for handle in handles {
        handle.await.context("worker task failed")?;
    }
    consumer.await.context("aggregation task failed")?;

    let snapshot = aggregate.snapshot();
    Ok(Report::build(&snapshot, started.elapsed(), total_requests))
}
