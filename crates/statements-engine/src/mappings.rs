//! Static line item tables.
//!
//! Different companies use different XBRL concepts for the same statement
//! row. Each row is identified by a logical item key and carries an ordered
//! list of acceptable concepts, most preferred first. Labels and the set of
//! negated items are keyed by the same logical keys.

use statements_core::StatementKind;

/// One statement row: its logical key and its candidate concepts in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemMapping {
    /// Logical item key.
    pub key: &'static str,
    /// Acceptable concept names, most preferred first.
    pub tags: &'static [&'static str],
}

const fn item(key: &'static str, tags: &'static [&'static str]) -> ItemMapping {
    ItemMapping { key, tags }
}

// =============================================================================
// Income Statement
// =============================================================================

/// Income statement rows in presentation order.
pub const INCOME_STATEMENT_ITEMS: &[ItemMapping] = &[
    item(
        "revenue",
        &[
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "Revenues",
            "SalesRevenueNet",
            "SalesRevenueGoodsNet",
            "RevenueFromContractWithCustomerIncludingAssessedTax",
        ],
    ),
    item(
        "cost_of_revenue",
        &[
            "CostOfGoodsAndServicesSold",
            "CostOfRevenue",
            "CostOfGoodsSold",
            "CostOfServices",
        ],
    ),
    item("gross_profit", &["GrossProfit"]),
    item(
        "research_and_development",
        &[
            "ResearchAndDevelopmentExpense",
            "ResearchAndDevelopmentExpenseExcludingAcquiredInProcessCost",
        ],
    ),
    item(
        "selling_general_admin",
        &[
            "SellingGeneralAndAdministrativeExpense",
            "SellingAndMarketingExpense",
            "GeneralAndAdministrativeExpense",
        ],
    ),
    item("operating_expenses", &["OperatingExpenses", "CostsAndExpenses"]),
    item("operating_income", &["OperatingIncomeLoss"]),
    item("interest_expense", &["InterestExpense", "InterestExpenseDebt"]),
    item(
        "interest_income",
        &[
            "InterestAndDividendIncomeOperating",
            "InvestmentIncomeInterest",
            "InterestIncomeOther",
        ],
    ),
    item(
        "other_income_expense",
        &["OtherNonoperatingIncomeExpense", "NonoperatingIncomeExpense"],
    ),
    item(
        "income_before_tax",
        &[
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
        ],
    ),
    item("income_tax_expense", &["IncomeTaxExpenseBenefit"]),
    item(
        "net_income",
        &[
            "NetIncomeLoss",
            "ProfitLoss",
            "NetIncomeLossAvailableToCommonStockholdersBasic",
        ],
    ),
    item("eps_basic", &["EarningsPerShareBasic"]),
    item("eps_diluted", &["EarningsPerShareDiluted"]),
    item(
        "shares_basic",
        &["WeightedAverageNumberOfSharesOutstandingBasic"],
    ),
    item(
        "shares_diluted",
        &["WeightedAverageNumberOfDilutedSharesOutstanding"],
    ),
];

// =============================================================================
// Balance Sheet
// =============================================================================

/// Balance sheet rows in presentation order.
pub const BALANCE_SHEET_ITEMS: &[ItemMapping] = &[
    // Current assets
    item(
        "cash_and_equivalents",
        &[
            "CashAndCashEquivalentsAtCarryingValue",
            "Cash",
            "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
        ],
    ),
    item(
        "short_term_investments",
        &[
            "ShortTermInvestments",
            "MarketableSecuritiesCurrent",
            "AvailableForSaleSecuritiesDebtSecuritiesCurrent",
        ],
    ),
    item(
        "accounts_receivable",
        &["AccountsReceivableNetCurrent", "ReceivablesNetCurrent"],
    ),
    item(
        "inventory",
        &["InventoryNet", "InventoryFinishedGoodsAndWorkInProcess"],
    ),
    item(
        "prepaid_expenses",
        &["PrepaidExpenseAndOtherAssetsCurrent", "PrepaidExpenseCurrent"],
    ),
    item("total_current_assets", &["AssetsCurrent"]),
    // Non-current assets
    item("property_plant_equipment", &["PropertyPlantAndEquipmentNet"]),
    item("goodwill", &["Goodwill"]),
    item(
        "intangible_assets",
        &[
            "IntangibleAssetsNetExcludingGoodwill",
            "FiniteLivedIntangibleAssetsNet",
        ],
    ),
    item(
        "long_term_investments",
        &["LongTermInvestments", "MarketableSecuritiesNoncurrent"],
    ),
    item("other_assets", &["OtherAssetsNoncurrent"]),
    item("total_assets", &["Assets"]),
    // Current liabilities
    item("accounts_payable", &["AccountsPayableCurrent"]),
    item(
        "accrued_liabilities",
        &[
            "AccruedLiabilitiesCurrent",
            "EmployeeRelatedLiabilitiesCurrent",
        ],
    ),
    item(
        "deferred_revenue_current",
        &[
            "DeferredRevenueCurrent",
            "ContractWithCustomerLiabilityCurrent",
        ],
    ),
    item("short_term_debt", &["ShortTermBorrowings", "DebtCurrent"]),
    item("current_portion_long_term_debt", &["LongTermDebtCurrent"]),
    item("total_current_liabilities", &["LiabilitiesCurrent"]),
    // Non-current liabilities
    item("long_term_debt", &["LongTermDebtNoncurrent", "LongTermDebt"]),
    item("deferred_tax_liabilities", &["DeferredIncomeTaxLiabilitiesNet"]),
    item("other_liabilities", &["OtherLiabilitiesNoncurrent"]),
    item("total_liabilities", &["Liabilities"]),
    // Stockholders' equity
    item(
        "common_stock",
        &[
            "CommonStockValue",
            "CommonStocksIncludingAdditionalPaidInCapital",
        ],
    ),
    item(
        "additional_paid_in_capital",
        &["AdditionalPaidInCapitalCommonStock", "AdditionalPaidInCapital"],
    ),
    item("retained_earnings", &["RetainedEarningsAccumulatedDeficit"]),
    item(
        "accumulated_other_comprehensive_income",
        &["AccumulatedOtherComprehensiveIncomeLossNetOfTax"],
    ),
    item("treasury_stock", &["TreasuryStockValue"]),
    item(
        "total_stockholders_equity",
        &[
            "StockholdersEquity",
            "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
        ],
    ),
    item(
        "total_liabilities_and_equity",
        &["LiabilitiesAndStockholdersEquity"],
    ),
];

// =============================================================================
// Cash Flow Statement
// =============================================================================

/// Cash flow statement rows in presentation order.
pub const CASH_FLOW_ITEMS: &[ItemMapping] = &[
    // Operating activities
    item("net_income_cf", &["NetIncomeLoss", "ProfitLoss"]),
    item(
        "depreciation_amortization",
        &[
            "DepreciationDepletionAndAmortization",
            "DepreciationAndAmortization",
        ],
    ),
    item(
        "stock_based_compensation",
        &[
            "ShareBasedCompensation",
            "AllocatedShareBasedCompensationExpense",
        ],
    ),
    item("deferred_income_taxes", &["DeferredIncomeTaxExpenseBenefit"]),
    item(
        "change_in_receivables",
        &["IncreaseDecreaseInAccountsReceivable"],
    ),
    item("change_in_inventory", &["IncreaseDecreaseInInventories"]),
    item("change_in_payables", &["IncreaseDecreaseInAccountsPayable"]),
    item(
        "other_operating_activities",
        &["OtherOperatingActivitiesCashFlowStatement"],
    ),
    item(
        "net_cash_from_operating",
        &["NetCashProvidedByUsedInOperatingActivities"],
    ),
    // Investing activities
    item(
        "capital_expenditures",
        &[
            "PaymentsToAcquirePropertyPlantAndEquipment",
            "PaymentsToAcquireProductiveAssets",
        ],
    ),
    item(
        "acquisitions",
        &["PaymentsToAcquireBusinessesNetOfCashAcquired"],
    ),
    item(
        "purchases_of_investments",
        &[
            "PaymentsToAcquireInvestments",
            "PaymentsToAcquireAvailableForSaleSecuritiesDebt",
        ],
    ),
    item(
        "sales_of_investments",
        &[
            "ProceedsFromSaleOfAvailableForSaleSecuritiesDebt",
            "ProceedsFromSaleAndMaturityOfMarketableSecurities",
        ],
    ),
    item(
        "net_cash_from_investing",
        &["NetCashProvidedByUsedInInvestingActivities"],
    ),
    // Financing activities
    item(
        "debt_repayment",
        &["RepaymentsOfLongTermDebt", "RepaymentsOfDebt"],
    ),
    item(
        "debt_issuance",
        &[
            "ProceedsFromIssuanceOfLongTermDebt",
            "ProceedsFromDebtNetOfIssuanceCosts",
        ],
    ),
    item(
        "share_repurchases",
        &["PaymentsForRepurchaseOfCommonStock"],
    ),
    item(
        "dividends_paid",
        &["PaymentsOfDividendsCommonStock", "PaymentsOfDividends"],
    ),
    item(
        "stock_issuance",
        &[
            "ProceedsFromIssuanceOfCommonStock",
            "ProceedsFromStockOptionsExercised",
        ],
    ),
    item(
        "net_cash_from_financing",
        &["NetCashProvidedByUsedInFinancingActivities"],
    ),
    // Net change
    item(
        "effect_of_exchange_rate",
        &[
            "EffectOfExchangeRateOnCashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
            "EffectOfExchangeRateOnCashAndCashEquivalents",
        ],
    ),
    item(
        "net_change_in_cash",
        &[
            "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalentsPeriodIncreaseDecreaseIncludingExchangeRateEffect",
            "CashAndCashEquivalentsPeriodIncreaseDecrease",
        ],
    ),
];

/// Items shown as reductions: expenses and outflows disclosed as positive amounts.
pub const NEGATED_ITEMS: &[&str] = &[
    "cost_of_revenue",
    "research_and_development",
    "selling_general_admin",
    "operating_expenses",
    "interest_expense",
    "income_tax_expense",
    "capital_expenditures",
    "acquisitions",
    "purchases_of_investments",
    "debt_repayment",
    "share_repurchases",
    "dividends_paid",
    "treasury_stock",
];

/// Returns the rows of a statement in presentation order.
#[must_use]
pub const fn items_for(kind: StatementKind) -> &'static [ItemMapping] {
    match kind {
        StatementKind::IncomeStatement => INCOME_STATEMENT_ITEMS,
        StatementKind::BalanceSheet => BALANCE_SHEET_ITEMS,
        StatementKind::CashFlow => CASH_FLOW_ITEMS,
    }
}

/// Returns the candidate concepts for a logical item key, searching all statements.
#[must_use]
pub fn tag_candidates(key: &str) -> Option<&'static [&'static str]> {
    StatementKind::ALL
        .into_iter()
        .flat_map(items_for)
        .find(|mapping| mapping.key == key)
        .map(|mapping| mapping.tags)
}

/// Returns true if the item is sign-flipped for display.
#[must_use]
pub fn is_negated(key: &str) -> bool {
    NEGATED_ITEMS.contains(&key)
}

/// Returns the human-readable label for a logical item key.
#[must_use]
pub fn label(key: &str) -> Option<&'static str> {
    let label = match key {
        // Income statement
        "revenue" => "Revenue",
        "cost_of_revenue" => "Cost of Revenue",
        "gross_profit" => "Gross Profit",
        "research_and_development" => "Research & Development",
        "selling_general_admin" => "Selling, General & Administrative",
        "operating_expenses" => "Operating Expenses",
        "operating_income" => "Operating Income",
        "interest_expense" => "Interest Expense",
        "interest_income" => "Interest Income",
        "other_income_expense" => "Other Income (Expense)",
        "income_before_tax" => "Income Before Tax",
        "income_tax_expense" => "Income Tax Expense",
        "net_income" => "Net Income",
        "eps_basic" => "EPS (Basic)",
        "eps_diluted" => "EPS (Diluted)",
        "shares_basic" => "Shares Outstanding (Basic)",
        "shares_diluted" => "Shares Outstanding (Diluted)",

        // Balance sheet
        "cash_and_equivalents" => "Cash & Cash Equivalents",
        "short_term_investments" => "Short-Term Investments",
        "accounts_receivable" => "Accounts Receivable",
        "inventory" => "Inventory",
        "prepaid_expenses" => "Prepaid Expenses",
        "total_current_assets" => "Total Current Assets",
        "property_plant_equipment" => "Property, Plant & Equipment",
        "goodwill" => "Goodwill",
        "intangible_assets" => "Intangible Assets",
        "long_term_investments" => "Long-Term Investments",
        "other_assets" => "Other Assets",
        "total_assets" => "Total Assets",
        "accounts_payable" => "Accounts Payable",
        "accrued_liabilities" => "Accrued Liabilities",
        "deferred_revenue_current" => "Deferred Revenue (Current)",
        "short_term_debt" => "Short-Term Debt",
        "current_portion_long_term_debt" => "Current Portion of Long-Term Debt",
        "total_current_liabilities" => "Total Current Liabilities",
        "long_term_debt" => "Long-Term Debt",
        "deferred_tax_liabilities" => "Deferred Tax Liabilities",
        "other_liabilities" => "Other Liabilities",
        "total_liabilities" => "Total Liabilities",
        "common_stock" => "Common Stock",
        "additional_paid_in_capital" => "Additional Paid-In Capital",
        "retained_earnings" => "Retained Earnings",
        "accumulated_other_comprehensive_income" => "Accumulated Other Comprehensive Income",
        "treasury_stock" => "Treasury Stock",
        "total_stockholders_equity" => "Total Stockholders' Equity",
        "total_liabilities_and_equity" => "Total Liabilities & Equity",

        // Cash flow
        "net_income_cf" => "Net Income",
        "depreciation_amortization" => "Depreciation & Amortization",
        "stock_based_compensation" => "Stock-Based Compensation",
        "deferred_income_taxes" => "Deferred Income Taxes",
        "change_in_receivables" => "Change in Receivables",
        "change_in_inventory" => "Change in Inventory",
        "change_in_payables" => "Change in Payables",
        "other_operating_activities" => "Other Operating Activities",
        "net_cash_from_operating" => "Net Cash from Operating Activities",
        "capital_expenditures" => "Capital Expenditures",
        "acquisitions" => "Acquisitions",
        "purchases_of_investments" => "Purchases of Investments",
        "sales_of_investments" => "Sales of Investments",
        "net_cash_from_investing" => "Net Cash from Investing Activities",
        "debt_repayment" => "Debt Repayment",
        "debt_issuance" => "Debt Issuance",
        "share_repurchases" => "Share Repurchases",
        "dividends_paid" => "Dividends Paid",
        "stock_issuance" => "Stock Issuance",
        "net_cash_from_financing" => "Net Cash from Financing Activities",
        "effect_of_exchange_rate" => "Effect of Exchange Rate",
        "net_change_in_cash" => "Net Change in Cash",

        _ => return None,
    };
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_sizes() {
        assert_eq!(INCOME_STATEMENT_ITEMS.len(), 17);
        assert_eq!(BALANCE_SHEET_ITEMS.len(), 29);
        assert_eq!(CASH_FLOW_ITEMS.len(), 22);
        assert_eq!(NEGATED_ITEMS.len(), 13);
    }

    #[test]
    fn test_keys_unique_with_labels_and_tags() {
        let mut seen = HashSet::new();
        for kind in StatementKind::ALL {
            for mapping in items_for(kind) {
                assert!(seen.insert(mapping.key), "duplicate key {}", mapping.key);
                assert!(!mapping.tags.is_empty(), "{} has no candidates", mapping.key);
                assert!(label(mapping.key).is_some(), "{} has no label", mapping.key);
            }
        }
        for key in NEGATED_ITEMS {
            assert!(seen.contains(key), "negated key {key} is not a statement row");
        }
    }

    #[test]
    fn test_tag_candidates() {
        assert_eq!(
            tag_candidates("net_income"),
            Some(
                &[
                    "NetIncomeLoss",
                    "ProfitLoss",
                    "NetIncomeLossAvailableToCommonStockholdersBasic",
                ][..]
            )
        );
        assert_eq!(tag_candidates("total_assets"), Some(&["Assets"][..]));
        assert!(tag_candidates("nonexistent_item").is_none());
    }

    #[test]
    fn test_negated_and_labels() {
        assert!(is_negated("cost_of_revenue"));
        assert!(is_negated("treasury_stock"));
        assert!(!is_negated("revenue"));
        assert_eq!(label("eps_basic"), Some("EPS (Basic)"));
        assert_eq!(label("net_income_cf"), Some("Net Income"));
        assert_eq!(label("unknown"), None);
    }
}
