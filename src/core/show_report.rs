use std::time::Duration;

use crate::models::outcome::Outcome;
use crate::models::report::Report;

pub fn show_report(report: &Report) {
    println!("\n========== LOAD TEST REPORT ==========");
    println!("Total Time:        {:?}", report.total_time);
    println!("Total Requests:    {}", report.total_requests);
    println!("Successful (200):  {}", report.success_requests);
    println!("Min Duration:      {:?}", report.min_duration);
    println!("Max Duration:      {:?}", report.max_duration);
    println!("Avg Duration:      {:?}", report.avg_duration);
    println!(
        "Median/p95/p99:    {} ms / {} ms / {} ms",
        report.median_response_ms, report.response_time_95_ms, report.response_time_99_ms
    );
    if report.total_time > Duration::ZERO {
        println!("Requests/second:   {:.2}", report.requests_per_second);
    }

    println!("\nStatus Code Distribution:");
    let mut statuses: Vec<_> = report.status_distribution.iter().collect();
    statuses.sort_by_key(|(status, _)| **status);
    for (status, count) in statuses {
        if *status == Outcome::ERROR_STATUS {
            println!("  Error (timeout/failed): {count}");
        } else {
            println!("  HTTP {status}: {count}");
        }
    }
    println!("=======================================");
}

pub fn show_report_json(report: &Report) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
