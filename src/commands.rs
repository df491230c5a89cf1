use crate::config::Config;
use crate::datasources::OpenMeteoClient;
use crate::logic::forecast_service::{Clock, SystemClock};
use crate::logic::{accuracy, export, Acquired, AccuracyOutcome, ForecastService, WeeklyPlan};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;

/// Validate config and probe the forecast provider.
pub async fn check(config: &Config) -> Result<()> {
    config.validate().context("Configuration is invalid")?;
    println!("Config OK");
    println!(
        "  Location: {} ({:.4}, {:.4}, {})",
        config.location.name,
        config.location.latitude,
        config.location.longitude,
        config.location.timezone
    );
    let block = config.block.to_block();
    println!(
        "  Block:    {} / {} (Kc {:.2}) / {} soil, {:.2} ha at {:.0}% efficiency",
        block.crop,
        block.stage,
        block.kc(),
        block.soil,
        block.area_ha,
        block.efficiency * 100.0
    );

    let client = OpenMeteoClient::new(&config.forecast).context("Failed to build HTTP client")?;
    match client.test_connection(&config.forecast_request()).await {
        Ok(true) => println!("  Open-Meteo: OK"),
        Ok(false) => println!("  Open-Meteo: responded with an error status (demo data will be used)"),
        Err(e) => println!("  Open-Meteo: OFFLINE ({}) (demo data will be used)", e),
    }

    for (label, path) in [
        ("Historical CSV", config.data.historical_csv.as_deref()),
        ("Accuracy CSV", config.data.accuracy_csv.as_deref()),
    ] {
        if let Some(path) = path {
            let state = if path.exists() { "found" } else { "missing" };
            println!("  {}: {} ({})", label, path.display(), state);
        }
    }

    Ok(())
}

/// Print demand, band, outlook and events for this week.
pub async fn schedule(config: &Config) -> Result<()> {
    let today = SystemClock.today();
    let (acquired, plan) = plan_for_week(config, today).await?;
    print!("{}", render_plan(config, &acquired, &plan));
    Ok(())
}

pub async fn export(config: &Config, output: &Path) -> Result<()> {
    let today = SystemClock.today();
    let (acquired, plan) = plan_for_week(config, today).await?;
    if let Some(reason) = &acquired.degraded {
        eprintln!("Warning: live forecast unavailable ({}); schedule uses demo data", reason);
    }

    let written = export::export_schedule(&plan.events, output, plan.outlook.week_start)
        .with_context(|| format!("Failed to write schedule to {}", output.display()))?;
    println!("Wrote {} events to {}", plan.events.len(), written.display());
    Ok(())
}

pub fn accuracy(file: &Path) -> Result<()> {
    let outcome = accuracy::report_from_path(file);
    print!("{}", render_accuracy(&outcome));
    Ok(())
}

async fn plan_for_week(config: &Config, today: NaiveDate) -> Result<(Acquired, WeeklyPlan)> {
    let client = OpenMeteoClient::new(&config.forecast).context("Failed to build HTTP client")?;
    let mut service = ForecastService::new(client, config.forecast.cache_ttl());
    let acquired = service.fetch(&config.forecast_request()).await;

    let block = config.block.to_block();
    let plan = WeeklyPlan::build(&acquired.series, &block, &config.uncertainty, today);
    Ok((acquired, plan))
}

fn render_plan(config: &Config, acquired: &Acquired, plan: &WeeklyPlan) -> String {
    let mut out = String::new();
    let block = config.block.to_block();
    let demand = &plan.demand;
    let outlook = &plan.outlook;

    let _ = writeln!(out, "{} - week ending {}", config.location.name, outlook.week_ending);
    let _ = writeln!(out, "Data: {}", acquired.series.origin);
    if let Some(reason) = &acquired.degraded {
        let _ = writeln!(out, "Warning: live forecast unavailable ({})", reason);
    }
    let _ = writeln!(
        out,
        "Block: {} ({}), {} soil, {:.2} ha, efficiency {:.2}, Kc {:.2}",
        block.crop, block.stage, block.soil, block.area_ha, block.efficiency, demand.kc_used
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "ETc            {:>8.1} mm", demand.weekly_etc_mm);
    let _ = writeln!(out, "Effective rain {:>8.1} mm", demand.weekly_eff_rain_mm);
    let _ = writeln!(out, "Net demand     {:>8.1} mm", demand.weekly_net_mm);
    let _ = writeln!(out, "Gross demand   {:>8.1} mm", demand.weekly_gross_mm);
    let _ = writeln!(
        out,
        "Range          {:>8.1} - {:.1} mm",
        plan.band.low_mm, plan.band.high_mm
    );
    let _ = writeln!(
        out,
        "Outlook        {} ({:.1} mm/day)",
        outlook.class, outlook.daily_avg_mm
    );
    let _ = writeln!(out);

    if plan.events.is_empty() {
        let _ = writeln!(out, "No irrigation needed this week.");
        return out;
    }

    let _ = writeln!(out, "{:>5} {:>10} {:>12} {:>10}", "Event", "Depth mm", "Volume m³", "Hours");
    for e in &plan.events {
        let hours = e
            .duration_hr
            .map(|h| format!("{:.2}", h))
            .unwrap_or_else(|| "-".into());
        let _ = writeln!(
            out,
            "{:>5} {:>10.2} {:>12.1} {:>10}",
            e.event, e.depth_mm, e.volume_m3, hours
        );
    }
    let _ = writeln!(out, "Total volume {:.1} m³", plan.total_volume_m3());
    if let Some(hours) = plan.total_pump_hours() {
        let _ = writeln!(out, "Total pumping {:.2} h", hours);
    }

    out
}

fn render_accuracy(outcome: &AccuracyOutcome) -> String {
    let mut out = String::new();
    if let AccuracyOutcome::Scored { report, .. } = outcome {
        let _ = writeln!(out, "MAE  {:.3} mm", report.mae);
        let _ = writeln!(out, "RMSE {:.3} mm", report.rmse);
    }
    let _ = writeln!(out, "R²   {:.2}", outcome.display_r2());
    let _ = writeln!(out, "{}", outcome.message());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::uncertainty::Perturbation;
    use crate::models::ForecastSeries;
    use chrono::Utc;

    fn demo_plan(pump_rate_m3h: f64) -> (Config, Acquired, WeeklyPlan) {
        let mut config = Config::default();
        config.block.pump_rate_m3h = pump_rate_m3h;
        let today = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
        let acquired = Acquired {
            series: ForecastSeries::demo(today, Utc::now()),
            degraded: Some("timed out".into()),
        };
        let plan = WeeklyPlan::build(
            &acquired.series,
            &config.block.to_block(),
            &Perturbation::default(),
            today,
        );
        (config, acquired, plan)
    }

    #[test]
    fn plan_report_mentions_fallback_and_events() {
        let (config, acquired, plan) = demo_plan(40.0);
        let text = render_plan(&config, &acquired, &plan);

        assert!(text.contains("week ending 2025-11-23"));
        assert!(text.contains("Built-in demo data"));
        assert!(text.contains("timed out"));
        assert!(text.contains("Gross demand"));
        assert!(text.contains("Total pumping"));
    }

    #[test]
    fn plan_report_without_pump_omits_hours_total() {
        let (config, acquired, plan) = demo_plan(0.0);
        let text = render_plan(&config, &acquired, &plan);
        assert!(!text.contains("Total pumping"));
    }

    #[test]
    fn accuracy_report_falls_back() {
        let text = render_accuracy(&AccuracyOutcome::NotProvided);
        assert!(text.contains("R²   0.82"));
        assert!(!text.contains("MAE"));
    }
}
