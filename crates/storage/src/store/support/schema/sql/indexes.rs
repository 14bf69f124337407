#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE INDEX IF NOT EXISTS idx_accounts_position ON accounts(position);
        CREATE INDEX IF NOT EXISTS idx_categories_position ON categories(position);
        CREATE INDEX IF NOT EXISTS idx_currencies_position ON currencies(position);
        CREATE INDEX IF NOT EXISTS idx_budgets_position ON budgets(position);
        CREATE INDEX IF NOT EXISTS idx_operations_account ON operations(account_id);
        CREATE INDEX IF NOT EXISTS idx_operations_occurred ON operations(occurred_on);
"#;
