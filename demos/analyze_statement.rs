use statement_analyzer::{analyze, AnalysisConfig, MetricValue, StatementTable};
use std::env;

fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/data/balance_sheet.csv".to_string());

    let config = match env::var("STATEMENT_CONFIG") {
        Ok(config_path) => AnalysisConfig::load_from_path(config_path)?,
        Err(_) => AnalysisConfig::default(),
    };

    let table = StatementTable::from_csv_path(&path)?;
    println!("📄 Loaded {} line items from {}\n", table.len(), path);

    let report = match analyze(&table.items, &config) {
        Ok(report) => report,
        Err(e) if e.is_structural() => {
            eprintln!("❌ Statement structure error: {}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    println!("📊 Growth & asset composition\n");
    println!("{}", report.table.to_markdown());

    println!("💧 Current ratio");
    println!(
        "   Prior year:   {}",
        report.ratios.prior_ratio.format_with("x", &config.placeholder)
    );
    println!(
        "   Current year: {}",
        report.ratios.current_ratio.format_with("x", &config.placeholder)
    );
    if let MetricValue::Available(delta) = report.ratios.delta() {
        println!("   Change:       {:+.2}", delta);
    }
    for warning in &report.ratios.warnings {
        println!("   ⚠️  {}", warning);
    }

    println!("\n🤖 Context for the narrative assistant:\n");
    println!("{}", report.summary.to_text());

    Ok(())
}
