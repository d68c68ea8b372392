//! Terminal dashboard report.
//!
//! Fetches the unfiltered incident window, the upstream damage
//! breakdown, and the per-village counts concurrently, then prints the
//! same aggregates the dashboard panels render: summary cards, monthly
//! timeline, and region intensity tiers.

use wildguard_analytics::{build_timeline, summarize};
use wildguard_analytics_models::PeriodFilter;
use wildguard_api::{AppConfig, Client, ConflictFilter};
use wildguard_cli_utils::{IndicatifProgress, MultiProgress};
use wildguard_conflict_models::DamageClass;
use wildguard_geography::IncidentTier;

/// Widest bar drawn for the busiest timeline month.
const TIMELINE_BAR_WIDTH: u64 = 40;

/// Fetches everything and prints the report.
///
/// # Errors
///
/// Returns an error if configuration loading or any of the three panel
/// fetches fail after retries.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let client = Client::new(&config)?;
    let filter = ConflictFilter::default();

    let progress = IndicatifProgress::steps_bar(multi, "Fetching dashboard data", 3);

    let (events, breakdown, villages) = tokio::try_join!(
        async {
            let events = client.filtered_events(&filter, &[]).await;
            progress.inc(1);
            events
        },
        async {
            let breakdown = client.damage_breakdown(&filter, &[]).await;
            progress.inc(1);
            breakdown
        },
        async {
            let villages = client.village_counts(&filter, &[]).await;
            progress.inc(1);
            villages
        },
    )?;
    progress.finish("All panels fetched".to_string());

    println!();
    println!("=== Summary ===");
    let summary = summarize(&events);
    println!("Incidents:      {}", summary.incident_count);
    for class in DamageClass::all() {
        println!("{:<15} {}", format!("{class}:"), summary.damage_counts.get(*class));
    }
    println!("Total loss:     {:.2}", summary.total_loss);
    match &summary.primary_species {
        Some(primary) => println!(
            "Primary species: {} ({} incidents, {:.2}% of all)",
            primary.name, primary.count, primary.percent_of_incidents
        ),
        None => println!("Primary species: none recorded"),
    }

    println!();
    println!("=== Upstream damage breakdown ===");
    if breakdown.is_empty() {
        println!("(no data)");
    }
    for (label, count) in &breakdown {
        println!("{label:<25} {count}");
    }

    println!();
    println!("=== Monthly timeline ===");
    let timeline = build_timeline(&events, PeriodFilter::All);
    let max_count = timeline.buckets.iter().map(|b| b.count).max().unwrap_or(0);
    for bucket in &timeline.buckets {
        let width = if max_count == 0 {
            0
        } else {
            (bucket.count * TIMELINE_BAR_WIDTH).div_ceil(max_count)
        };
        println!(
            "{:<10} {:<4} {}",
            bucket.label,
            bucket.count,
            "#".repeat(usize::try_from(width).unwrap_or(0))
        );
    }
    println!(
        "{} incidents across {} months (avg {}/month)",
        timeline.stats.total, timeline.stats.months_with_data, timeline.stats.monthly_average
    );
    if let Some(peak) = &timeline.stats.peak {
        println!("Peak month: {} ({})", peak.label, peak.count);
    }

    println!();
    println!("=== Villages by incident tier ===");
    let mut ranked: Vec<(&String, &u64)> = villages.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (village, count) in ranked.iter().take(15) {
        println!(
            "{village:<30} {count:>6}  {:?}",
            IncidentTier::for_count(**count)
        );
    }
    if ranked.len() > 15 {
        println!("... and {} more villages", ranked.len() - 15);
    }

    Ok(())
}
