//! A horizontal bar chart of spending per category, drawn with text so it can be printed to a
//! terminal.

use crate::model::money;
use crate::summary::DateRange;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

const BAR: char = '█';
const DEFAULT_WIDTH: usize = 40;

/// One bar of the chart.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: Decimal,
}

/// The data and title of a category bar chart.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct BarChart {
    title: String,
    range: DateRange,
    bars: Vec<Bar>,
}

impl BarChart {
    pub fn new(range: DateRange, breakdown: &BTreeMap<String, Decimal>) -> Self {
        Self {
            title: format!("Total Expenses by Category from {range}"),
            range,
            bars: breakdown
                .iter()
                .map(|(label, value)| Bar {
                    label: label.clone(),
                    value: *value,
                })
                .collect(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Draws the chart with the longest bar `width` characters long. Bars are scaled against the
    /// largest value; values at or below zero get no bar. An empty chart renders as a notice.
    pub fn render(&self, width: usize, currency: &str) -> String {
        if self.is_empty() {
            return format!(
                "No expenses found between {} and {}.",
                self.range.start(),
                self.range.end()
            );
        }
        let width = if width == 0 { DEFAULT_WIDTH } else { width };
        let max = self
            .bars
            .iter()
            .map(|b| b.value)
            .max()
            .unwrap_or_default();
        let label_width = self
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or_default();

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        for bar in &self.bars {
            let len = bar_length(bar.value, max, width);
            let _ = writeln!(
                out,
                "{:<label_width$} | {:<width$} {}",
                bar.label,
                BAR.to_string().repeat(len),
                money(bar.value, currency),
            );
        }
        out.trim_end().to_string()
    }
}

fn bar_length(value: Decimal, max: Decimal, width: usize) -> usize {
    if value <= Decimal::ZERO || max <= Decimal::ZERO {
        return 0;
    }
    let len = (value / max * Decimal::from(width))
        .round_dp(0)
        .to_usize()
        .unwrap_or_default();
    // Anything above zero is visible
    len.max(1).min(width)
}
