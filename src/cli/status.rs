use crate::cli::{build_manager, warn_if_process_local, StatusArgs};
use crate::config::AppConfig;
use crate::sync::invalidation::CacheStatus;
use anyhow::Result;

pub async fn execute(config: AppConfig, args: &StatusArgs) -> Result<()> {
    warn_if_process_local(&config);
    let manager = build_manager(config, None).await?;
    let stats = manager.log_statistics().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let status = match stats.status {
        CacheStatus::WarmedUp => "✅ WARMED UP",
        CacheStatus::NotWarmed => "⏳ NOT WARMED",
        CacheStatus::Failed => "❌ FAILED",
    };

    println!("=== Cache Status ===\n");
    println!("Store:       {}", manager.store().name());
    println!("Status:      {}", status);
    println!("Total Keys:  {}", stats.total_keys);
    Ok(())
}
