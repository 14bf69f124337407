#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        -- Orderable tables. `position` is the display order among live rows;
        -- tombstoned rows keep the sentinel 0. `delete_time` unset = live.

        CREATE TABLE IF NOT EXISTS accounts (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL,
          currency TEXT NOT NULL,
          opening_minor INTEGER NOT NULL DEFAULT 0,
          position INTEGER NOT NULL,
          created_by TEXT,
          create_time TEXT,
          updated_by TEXT,
          update_time TEXT,
          deleted_by TEXT,
          delete_time TEXT
        );

        CREATE TABLE IF NOT EXISTS categories (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL,
          flow TEXT NOT NULL,
          position INTEGER NOT NULL,
          created_by TEXT,
          create_time TEXT,
          updated_by TEXT,
          update_time TEXT,
          deleted_by TEXT,
          delete_time TEXT
        );

        CREATE TABLE IF NOT EXISTS currencies (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          code TEXT NOT NULL,
          symbol TEXT,
          decimal_places INTEGER NOT NULL DEFAULT 2,
          position INTEGER NOT NULL,
          created_by TEXT,
          create_time TEXT,
          updated_by TEXT,
          update_time TEXT,
          deleted_by TEXT,
          delete_time TEXT
        );

        CREATE TABLE IF NOT EXISTS budgets (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL,
          amount_minor INTEGER NOT NULL,
          currency TEXT NOT NULL,
          position INTEGER NOT NULL,
          created_by TEXT,
          create_time TEXT,
          updated_by TEXT,
          update_time TEXT,
          deleted_by TEXT,
          delete_time TEXT
        );

        -- Ledger entries share the soft-delete lifecycle but carry no
        -- display position.
        CREATE TABLE IF NOT EXISTS operations (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          account_id INTEGER NOT NULL REFERENCES accounts(id),
          category_id INTEGER REFERENCES categories(id),
          amount_minor INTEGER NOT NULL,
          note TEXT,
          occurred_on TEXT NOT NULL,
          created_by TEXT,
          create_time TEXT,
          updated_by TEXT,
          update_time TEXT,
          deleted_by TEXT,
          delete_time TEXT
        );
"#;
