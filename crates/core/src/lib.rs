#![forbid(unsafe_code)]

pub mod ids {
    /// Store-assigned row id. Immutable once set, unique per table.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct RecordId(i64);

    impl RecordId {
        pub fn new(value: i64) -> Self {
            Self(value)
        }

        pub fn as_i64(self) -> i64 {
            self.0
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ActorId(String);

    impl ActorId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, ActorIdError> {
            let value = value.into();
            validate_actor_id(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum ActorIdError {
        Empty,
        TooLong,
        InvalidFirstChar,
        InvalidChar { ch: char, index: usize },
    }

    fn validate_actor_id(value: &str) -> Result<(), ActorIdError> {
        if value.is_empty() {
            return Err(ActorIdError::Empty);
        }
        if value.len() > 128 {
            return Err(ActorIdError::TooLong);
        }
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(ActorIdError::Empty);
        };
        if !first.is_ascii_alphanumeric() {
            return Err(ActorIdError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate() {
            if index == 0 {
                continue;
            }
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-' | '@') {
                continue;
            }
            return Err(ActorIdError::InvalidChar { ch, index });
        }
        Ok(())
    }
}

pub mod model {
    /// The orderable entity kinds. Each maps to one table sharing the same
    /// id/position/audit columns; the ordering engine is parametrized by this.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum RecordKind {
        Account,
        Category,
        Currency,
        Budget,
    }

    impl RecordKind {
        pub const ALL: [Self; 4] = [Self::Account, Self::Category, Self::Currency, Self::Budget];

        pub fn as_str(self) -> &'static str {
            match self {
                RecordKind::Account => "account",
                RecordKind::Category => "category",
                RecordKind::Currency => "currency",
                RecordKind::Budget => "budget",
            }
        }

        pub fn table(self) -> &'static str {
            match self {
                RecordKind::Account => "accounts",
                RecordKind::Category => "categories",
                RecordKind::Currency => "currencies",
                RecordKind::Budget => "budgets",
            }
        }
    }

    /// Which rows a read should see. Listings show live rows, the trash view
    /// shows tombstoned rows, maintenance sees everything.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Visibility {
        Live,
        Deleted,
        All,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Flow {
        Income,
        Expense,
    }

    impl Flow {
        pub fn as_str(self) -> &'static str {
            match self {
                Flow::Income => "income",
                Flow::Expense => "expense",
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            match value {
                "income" => Some(Flow::Income),
                "expense" => Some(Flow::Expense),
                _ => None,
            }
        }
    }
}

pub mod order {
    use super::ids::RecordId;

    /// Typed access to the two fields the ordering engine cares about.
    pub trait Ordered {
        fn record_id(&self) -> RecordId;
        fn position(&self) -> i64;
    }

    /// True when the positions form exactly 1..N, each value once.
    ///
    /// This is the target state for the live subset of every orderable
    /// table; the store's normalizer restores it when it drifts.
    pub fn is_dense<T: Ordered>(records: &[T]) -> bool {
        let mut positions: Vec<i64> = records.iter().map(Ordered::position).collect();
        positions.sort_unstable();
        positions
            .iter()
            .enumerate()
            .all(|(index, position)| *position == index as i64 + 1)
    }

    /// Ids in display order. Ties on position are broken by id so the
    /// result is deterministic even for drifted tables.
    pub fn display_order<T: Ordered>(records: &[T]) -> Vec<RecordId> {
        let mut pairs: Vec<(i64, RecordId)> = records
            .iter()
            .map(|record| (record.position(), record.record_id()))
            .collect();
        pairs.sort_unstable();
        pairs.into_iter().map(|(_, id)| id).collect()
    }
}
