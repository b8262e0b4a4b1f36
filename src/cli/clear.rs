use crate::cli::{build_manager, warn_if_process_local, ClearArgs};
use crate::config::AppConfig;
use anyhow::Result;

pub async fn execute(config: AppConfig, args: &ClearArgs) -> Result<()> {
    warn_if_process_local(&config);
    let manager = build_manager(config, None).await?;
    let invalidator = manager.invalidator();

    if let Some(ref pattern) = args.pattern {
        println!("Clearing keys matching '{}'...", pattern);
        let removed = invalidator.clear_by_pattern(pattern).await?;
        println!("✅ Removed {} keys.", removed);
        return Ok(());
    }

    println!("Clearing all managed keys...");
    let report = invalidator.clear_all().await;
    for (pattern, removed) in &report.removed {
        println!("  {:<14} {} removed", pattern, removed);
    }
    for (pattern, error) in &report.failures {
        println!("  {:<14} ❌ {}", pattern, error);
    }

    if report.is_success() {
        println!("\n✅ Cleared {} keys.", report.total_removed());
        Ok(())
    } else {
        anyhow::bail!("{} patterns could not be cleared", report.failures.len())
    }
}
