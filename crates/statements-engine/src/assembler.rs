//! Statement assembly.

use chrono::NaiveDate;
use statements_core::{FinancialStatement, FormType, LineItem, StatementKind};
use tracing::{debug, trace};

use crate::index::FactIndex;
use crate::mappings::{is_negated, items_for, label};
use crate::resolver::{DEFAULT_TOLERANCE_DAYS, PeriodQuery, TagResolver};

/// The period a statement is assembled for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementPeriod {
    /// Period end.
    pub period_end: NaiveDate,
    /// Period start; ignored for the balance sheet.
    pub period_start: Option<NaiveDate>,
    /// Fiscal year recorded on the statement.
    pub fiscal_year: i32,
    /// Fiscal period code recorded on the statement.
    pub fiscal_period: String,
    /// Only accept facts disclosed on this form.
    pub form: Option<FormType>,
}

/// Drives the [`TagResolver`] over every row of a statement.
#[derive(Clone, Copy, Debug)]
pub struct StatementAssembler<'a> {
    resolver: TagResolver<'a>,
    tolerance_days: u32,
}

impl<'a> StatementAssembler<'a> {
    /// Create an assembler with the default tolerance.
    #[must_use]
    pub const fn new(index: &'a FactIndex) -> Self {
        Self {
            resolver: TagResolver::new(index),
            tolerance_days: DEFAULT_TOLERANCE_DAYS,
        }
    }

    /// Set the date matching tolerance.
    #[must_use]
    pub const fn with_tolerance_days(mut self, tolerance_days: u32) -> Self {
        self.tolerance_days = tolerance_days;
        self
    }

    /// Assemble one statement.
    ///
    /// Rows are resolved in declared order; rows with no acceptable fact are
    /// left out.
    #[must_use]
    pub fn assemble(&self, kind: StatementKind, period: &StatementPeriod) -> FinancialStatement {
        let period_start = if kind.is_duration() {
            period.period_start
        } else {
            None
        };
        let query = PeriodQuery {
            period_end: period.period_end,
            period_start,
            form: period.form,
            tolerance_days: self.tolerance_days,
        };

        let mut statement = FinancialStatement::new(
            kind,
            period.period_end,
            period_start,
            period.fiscal_year,
            period.fiscal_period.clone(),
        );

        for mapping in items_for(kind) {
            let Some(resolution) = self.resolver.resolve(mapping.tags, &query) else {
                trace!(key = mapping.key, "Unresolved");
                continue;
            };
            trace!(key = mapping.key, concept = resolution.concept, value = resolution.value, "Resolved");

            statement.insert(LineItem {
                key: mapping.key.to_string(),
                label: label(mapping.key).unwrap_or(mapping.key).to_string(),
                concept: resolution.concept.to_string(),
                value: resolution.value,
                period_end: period.period_end,
                period_start,
                negated: is_negated(mapping.key),
                accession: resolution.observation.accession.clone(),
            });
        }

        debug!(
            statement = %kind,
            resolved = statement.len(),
            defined = items_for(kind).len(),
            "Assembled statement"
        );
        statement
    }

    /// Assemble the income statement.
    #[must_use]
    pub fn income_statement(&self, period: &StatementPeriod) -> FinancialStatement {
        self.assemble(StatementKind::IncomeStatement, period)
    }

    /// Assemble the balance sheet.
    #[must_use]
    pub fn balance_sheet(&self, period: &StatementPeriod) -> FinancialStatement {
        self.assemble(StatementKind::BalanceSheet, period)
    }

    /// Assemble the cash flow statement.
    #[must_use]
    pub fn cash_flow(&self, period: &StatementPeriod) -> FinancialStatement {
        self.assemble(StatementKind::CashFlow, period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statements_core::CompanyFacts;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fiscal_2024() -> StatementPeriod {
        StatementPeriod {
            period_end: date(2024, 9, 28),
            period_start: Some(date(2023, 9, 29)),
            fiscal_year: 2024,
            fiscal_period: "FY".to_string(),
            form: Some(FormType::TenK),
        }
    }

    fn index() -> FactIndex {
        let facts: CompanyFacts = serde_json::from_value(json!({
            "entityName": "Example Corp",
            "facts": {"us-gaap": {
                "NetIncomeLoss": {"units": {"USD": [
                    {"start": "2023-10-01", "end": "2024-09-30", "val": 1000, "form": "10-K",
                     "accn": "0000000001-24-000001"},
                    {"start": "2022-10-01", "end": "2023-09-30", "val": 900, "form": "10-K"}
                ]}},
                "Revenues": {"units": {"USD": [
                    {"start": "2023-10-01", "end": "2024-09-28", "val": 5000, "form": "10-K"}
                ]}},
                "CostOfRevenue": {"units": {"USD": [
                    {"start": "2023-10-01", "end": "2024-09-28", "val": 3000, "form": "10-K"}
                ]}},
                "Assets": {"units": {"USD": [
                    {"end": "2024-09-28", "val": 8000, "form": "10-K"}
                ]}},
                "PaymentsToAcquirePropertyPlantAndEquipment": {"units": {"USD": [
                    {"start": "2023-10-01", "end": "2024-09-28", "val": 250, "form": "10-K"}
                ]}},
                "EarningsPerShareBasic": {"units": {"USD/shares": [
                    {"start": "2023-10-01", "end": "2024-09-28", "val": 3.21, "form": "10-Q"}
                ]}}
            }}
        }))
        .unwrap();
        FactIndex::build(&facts)
    }

    #[test]
    fn test_income_statement() {
        let index = index();
        let statement = StatementAssembler::new(&index).income_statement(&fiscal_2024());

        assert_eq!(statement.kind, StatementKind::IncomeStatement);
        assert_eq!(statement.period_start, Some(date(2023, 9, 29)));
        assert_eq!(
            statement.keys().collect::<Vec<_>>(),
            ["revenue", "cost_of_revenue", "net_income"]
        );

        let net_income = statement.get("net_income").unwrap();
        assert_eq!(net_income.value, 1000.0);
        assert_eq!(net_income.concept, "NetIncomeLoss");
        assert_eq!(net_income.label, "Net Income");
        assert_eq!(net_income.accession.as_deref(), Some("0000000001-24-000001"));
        assert!(!net_income.negated);

        let cost = statement.get("cost_of_revenue").unwrap();
        assert_eq!(cost.concept, "CostOfRevenue");
        assert!(cost.negated);
    }

    #[test]
    fn test_unresolved_items_are_absent() {
        let index = index();
        let statement = StatementAssembler::new(&index).income_statement(&fiscal_2024());

        // 10-Q fact filtered out by the 10-K requirement.
        assert!(!statement.contains("eps_basic"));
        assert!(statement.get("gross_profit").is_none());
        assert!(statement.iter().all(|item| !item.concept.is_empty()));
    }

    #[test]
    fn test_balance_sheet_is_instant() {
        let index = index();
        let statement = StatementAssembler::new(&index).balance_sheet(&fiscal_2024());

        assert_eq!(statement.period_start, None);
        assert_eq!(statement.keys().collect::<Vec<_>>(), ["total_assets"]);
        assert_eq!(statement.get("total_assets").unwrap().period_start, None);
    }

    #[test]
    fn test_cash_flow() {
        let index = index();
        let statement = StatementAssembler::new(&index).cash_flow(&fiscal_2024());

        assert_eq!(
            statement.keys().collect::<Vec<_>>(),
            ["net_income_cf", "capital_expenditures"]
        );
        assert!(statement.get("capital_expenditures").unwrap().negated);
    }

    #[test]
    fn test_tolerance_boundary() {
        let index = index();
        let period = StatementPeriod {
            period_end: date(2024, 9, 22),
            period_start: None,
            ..fiscal_2024()
        };
        let statement = StatementAssembler::new(&index).income_statement(&period);
        assert!(!statement.contains("net_income"));

        let widened = StatementAssembler::new(&index)
            .with_tolerance_days(8)
            .income_statement(&period);
        assert_eq!(widened.value("net_income"), Some(1000.0));
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let index = index();
        let assembler = StatementAssembler::new(&index);
        for kind in StatementKind::ALL {
            let first = assembler.assemble(kind, &fiscal_2024());
            let second = assembler.assemble(kind, &fiscal_2024());
            assert_eq!(first, second);
            let bits = |s: &FinancialStatement| -> Vec<u64> {
                s.iter().map(|item| item.value.to_bits()).collect()
            };
            assert_eq!(bits(&first), bits(&second));
        }
    }
}
