use crate::cli::{build_manager, WarmupArgs, WarmupSubset};
use crate::config::AppConfig;
use crate::sync::warmup::{DomainOutcome, WarmupReport};
use anyhow::Result;

pub async fn execute(config: AppConfig, args: &WarmupArgs) -> Result<()> {
    let manager = build_manager(config, args.fixture.as_deref()).await?;
    println!("Starting {:?} warmup...", args.subset);

    let report = match args.subset {
        WarmupSubset::All => match manager.config().warmup_deadline() {
            Some(deadline) => manager.warm_all_within(deadline).await?,
            None => manager.warmer().warm_all().await?,
        },
        WarmupSubset::Dashboard => manager.refresh_dashboard().await?,
        WarmupSubset::Basic => manager.refresh_basic_stats().await?,
    };

    display_report(&report);
    if !report.is_success() {
        anyhow::bail!("warmup failed for {:?}", report.failed_domains());
    }
    Ok(())
}

fn display_report(report: &WarmupReport) {
    println!("=== Warmup Report ===\n");
    println!("Started:   {}", report.started_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Finished:  {}", report.finished_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Duration:  {} ms\n", report.duration.as_millis());

    for (domain, outcome) in &report.outcomes {
        match outcome {
            DomainOutcome::Completed { entries } => {
                println!("{:<12} ✅ COMPLETED ({} entries)", domain.name(), entries);
            }
            DomainOutcome::Failed { error } => {
                println!("{:<12} ❌ FAILED: {}", domain.name(), error);
            }
        }
    }
    println!("\nTotal entries: {}", report.total_entries());
}
