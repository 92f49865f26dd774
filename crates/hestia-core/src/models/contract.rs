//! Signed contracts and the dashboard figures derived from them.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Number of monthly points in the revenue trend, current month included.
pub const TREND_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Rental,
    Sale,
}

impl ContractType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractType::Rental => "rental",
            ContractType::Sale => "sale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Draft,
    Signed,
    Cancelled,
}

/// The columns of a contract the metrics need.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct ContractRevenue {
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub contract_type: ContractType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendPoint {
    pub label: String,
    pub value: Decimal,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LabeledValue {
    pub label: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_income_month: Decimal,
    /// No expense ledger exists yet; always zero.
    pub total_expenses_month: Decimal,
    pub net_balance: Decimal,
    pub revenue_trend: Vec<TrendPoint>,
    pub revenue_by_type: Vec<LabeledValue>,
}

fn month_start(now: DateTime<Utc>) -> NaiveDate {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1).unwrap_or_else(|| now.date_naive())
}

fn month_key(date: NaiveDate) -> String {
    format!("{}-{:02}", date.year(), date.month())
}

/// First instant of the oldest month covered by the trend.
pub fn trend_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let start = month_start(now);
    let oldest = start
        .checked_sub_months(Months::new(TREND_MONTHS - 1))
        .unwrap_or(start);
    oldest.and_time(NaiveTime::default()).and_utc()
}

/// Aggregate signed contracts into the dashboard figures for the month containing `now`.
///
/// Contracts outside the trend window still count towards `revenue_by_type`; callers are
/// expected to pass only contracts created since [`trend_window_start`].
pub fn compute_dashboard_metrics(
    contracts: &[ContractRevenue],
    now: DateTime<Utc>,
) -> DashboardMetrics {
    let this_month = month_start(now);
    let oldest = this_month
        .checked_sub_months(Months::new(TREND_MONTHS - 1))
        .unwrap_or(this_month);

    let mut trend: Vec<TrendPoint> = (0..TREND_MONTHS)
        .filter_map(|i| oldest.checked_add_months(Months::new(i)))
        .enumerate()
        .map(|(index, month)| TrendPoint {
            label: month_key(month),
            value: Decimal::ZERO,
            index,
        })
        .collect();

    let current_key = month_key(this_month);
    let mut total_income_month = Decimal::ZERO;
    let mut by_type: Vec<LabeledValue> = Vec::new();

    for contract in contracts {
        let key = month_key(contract.created_at.date_naive());
        if key == current_key {
            total_income_month += contract.price;
        }
        if let Some(point) = trend.iter_mut().find(|p| p.label == key) {
            point.value += contract.price;
        }

        let label = contract.contract_type.as_str();
        match by_type.iter_mut().find(|entry| entry.label == label) {
            Some(entry) => entry.value += contract.price,
            None => by_type.push(LabeledValue {
                label: label.to_string(),
                value: contract.price,
            }),
        }
    }

    let total_expenses_month = Decimal::ZERO;
    DashboardMetrics {
        total_income_month,
        total_expenses_month,
        net_balance: total_income_month - total_expenses_month,
        revenue_trend: trend,
        revenue_by_type: by_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::prelude::FromPrimitive;

    fn contract(price: i64, y: i32, m: u32, d: u32, contract_type: ContractType) -> ContractRevenue {
        ContractRevenue {
            price: Decimal::from_i64(price).unwrap(),
            created_at: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            contract_type,
        }
    }

    #[test]
    fn test_trend_spans_six_months_across_year_boundary() {
        let now = Utc.with_ymd_and_hms(2025, 2, 14, 9, 0, 0).unwrap();
        let metrics = compute_dashboard_metrics(&[], now);
        let labels: Vec<&str> = metrics
            .revenue_trend
            .iter()
            .map(|p| p.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["2024-09", "2024-10", "2024-11", "2024-12", "2025-01", "2025-02"]
        );
        assert_eq!(metrics.revenue_trend[5].index, 5);
        assert_eq!(
            trend_window_start(now),
            Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_metrics_totals() {
        let now = Utc.with_ymd_and_hms(2025, 6, 20, 0, 0, 0).unwrap();
        let contracts = vec![
            contract(1000, 2025, 6, 2, ContractType::Rental),
            contract(250000, 2025, 6, 10, ContractType::Sale),
            contract(900, 2025, 4, 1, ContractType::Rental),
        ];
        let metrics = compute_dashboard_metrics(&contracts, now);

        assert_eq!(metrics.total_income_month, Decimal::from(251000));
        assert_eq!(metrics.total_expenses_month, Decimal::ZERO);
        assert_eq!(metrics.net_balance, Decimal::from(251000));
        assert_eq!(metrics.revenue_trend[3].label, "2025-04");
        assert_eq!(metrics.revenue_trend[3].value, Decimal::from(900));
        assert_eq!(metrics.revenue_by_type.len(), 2);
        assert_eq!(metrics.revenue_by_type[0].label, "rental");
        assert_eq!(metrics.revenue_by_type[0].value, Decimal::from(1900));
    }

    #[test]
    fn test_metrics_serialize_as_numbers() {
        let now = Utc.with_ymd_and_hms(2025, 6, 20, 0, 0, 0).unwrap();
        let metrics =
            compute_dashboard_metrics(&[contract(1500, 2025, 6, 1, ContractType::Sale)], now);
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["totalIncomeMonth"], serde_json::json!(1500.0));
        assert_eq!(json["revenueByType"][0]["label"], "sale");
    }
}
