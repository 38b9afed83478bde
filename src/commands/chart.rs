use crate::args::ChartArgs;
use crate::chart::BarChart;
use crate::commands::{open_store, resolve_range, today, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};

/// Draws a bar chart of spending per category for the date range. When nothing falls inside the
/// range the message says so and there is no structured output.
pub fn chart(config: Config, args: ChartArgs) -> Result<Out<BarChart>> {
    let store = open_store(&config)?;
    let range = resolve_range(args.range(), today());
    let breakdown = store
        .ledger()
        .category_breakdown(&range)
        .pub_result(ErrorType::Request)?;
    let chart = BarChart::new(range, &breakdown);
    let message = chart.render(args.width(), config.currency());
    if chart.is_empty() {
        return Ok(Out::new_message(message));
    }
    Ok(Out::new(message, chart))
}
