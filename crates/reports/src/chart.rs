//! Balance chart data
//!
//! Series for plotting the credit saldo over time: one line through every
//! transaction, plus one marker series per transaction kind present.

use chrono::NaiveDate;
use discobase_core::{Transaction, TrxKind};
use serde::Serialize;

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesMode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub mode: SeriesMode,
    pub color: String,
    pub show_legend: bool,
    pub points: Vec<ChartPoint>,
}

/// Saldo movement chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub legend_title: String,
    pub series: Vec<ChartSeries>,
}

/// Marker color for a kind
pub fn kind_color(kind: TrxKind) -> &'static str {
    match kind {
        TrxKind::Addition => "green",
        TrxKind::Removal => "red",
        TrxKind::Purchase => "blue",
        TrxKind::InitialLoad => "gray",
    }
}

impl BalanceChart {
    /// Build the chart; points are ordered by (date, id)
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut ordered: Vec<&Transaction> = transactions.iter().collect();
        ordered.sort_by_key(|t| (t.date, t.id));

        let title = match (ordered.first(), ordered.last()) {
            (Some(first), Some(last)) => {
                format!("Credit Saldo Movement, {} to {}", first.date, last.date)
            }
            _ => "Credit Saldo Movement".to_string(),
        };

        let point = |t: &&Transaction| ChartPoint {
            date: t.date,
            balance: t.balance,
        };

        let mut series = vec![ChartSeries {
            name: "Credit Saldo".to_string(),
            mode: SeriesMode::Lines,
            color: "lightgray".to_string(),
            show_legend: false,
            points: ordered.iter().map(point).collect(),
        }];

        for kind in TrxKind::all() {
            let points: Vec<ChartPoint> = ordered
                .iter()
                .filter(|t| t.kind == kind)
                .map(point)
                .collect();
            if points.is_empty() {
                continue;
            }
            series.push(ChartSeries {
                name: kind.to_string(),
                mode: SeriesMode::Markers,
                color: kind_color(kind).to_string(),
                show_legend: true,
                points,
            });
        }

        Self {
            title,
            x_title: "Date".to_string(),
            y_title: "Credit Saldo".to_string(),
            legend_title: "Trx Types".to_string(),
            series,
        }
    }

    /// Marker series for a kind, if any transaction of that kind is present
    pub fn markers(&self, kind: TrxKind) -> Option<&ChartSeries> {
        self.series
            .iter()
            .find(|s| s.mode == SeriesMode::Markers && s.name == kind.as_str())
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
