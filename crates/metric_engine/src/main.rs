use anyhow::Context;
use contracts::shared::widgets::WidgetRequest;

use metric_engine::shared::indicators::metadata;
use metric_engine::shared::{config, widget};
use metric_engine::system;

const USAGE: &str = "usage: metric_engine <widget-request.json> | metric_engine catalog";

fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = config::load_config()?;

    let arg = std::env::args().nth(1).context(USAGE)?;
    if arg == "catalog" {
        tracing::info!("Printing indicator catalogue");
        println!("{}", serde_json::to_string_pretty(&metadata::build_catalog())?);
        return Ok(());
    }

    let path = arg;
    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("Cannot read {}", path))?;
    let request: WidgetRequest =
        serde_json::from_str(&contents).with_context(|| format!("Invalid widget request in {}", path))?;

    tracing::info!("Building widget from {}", path);
    let response = widget::build_widget(&request, &config);

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
