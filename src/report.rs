use crate::config::RunConfig;
use crate::pipeline::RunOutcome;

/// Print the run summary to stdout
pub fn print_report(config: &RunConfig, outcome: &RunOutcome) {
    print!("{}", format_report(config, outcome));
}

pub fn format_report(config: &RunConfig, outcome: &RunOutcome) -> String {
    let sim = &config.simulation;
    let result = &outcome.result;
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "=".repeat(60)));
    out.push_str(&format!(
        "{} MONTE CARLO ({} → {}, {} points)\n",
        config.coin_id.to_uppercase(),
        config.start_date,
        config.end_date,
        outcome.series_len
    ));
    out.push_str(&format!("{}\n", "=".repeat(60)));

    out.push_str(&format!("Mean daily change: {:.2}%\n", outcome.statistics.mean));
    out.push_str(&format!("Daily change std dev: {:.2}%\n", outcome.statistics.std_dev));
    out.push('\n');

    out.push_str(&format!(
        "SIMULATION ({} runs, {} days, {}, seed {}):\n",
        sim.simulation_count, sim.horizon_days, sim.compounding, sim.seed
    ));
    out.push_str(&format!("{}\n", "-".repeat(40)));
    out.push_str(&format!(
        "  Current price:      {:.2} {} ({})\n",
        outcome.current_price,
        config.vs_currency.to_uppercase(),
        outcome.price_source
    ));
    out.push_str(&format!(
        "  Probability of profit after {} days: {:.2}%\n",
        sim.horizon_days,
        result.probability_of_profit() * 100.0
    ));
    out.push_str(&format!(
        "  Probability of loss after {} days:   {:.2}%\n",
        sim.horizon_days,
        result.probability_of_loss() * 100.0
    ));
    out.push('\n');
    out.push_str(&format!("  Mean final price:   {:.2}\n", result.mean()));
    out.push_str(&format!("  Median final price: {:.2}\n", result.percentile(50.0)));
    out.push_str(&format!("  5th percentile:     {:.2}\n", result.percentile(5.0)));
    out.push_str(&format!("  95th percentile:    {:.2}\n", result.percentile(95.0)));
    out.push_str(&format!("  Range:              {:.2} .. {:.2}\n", result.min(), result.max()));

    out
}
