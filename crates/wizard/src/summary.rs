//! The six-field idea summary.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Field
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A summary category. Declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Problem,
    Users,
    Competition,
    Differentiation,
    Complexity,
    Recommendation,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Problem,
        Field::Users,
        Field::Competition,
        Field::Differentiation,
        Field::Complexity,
        Field::Recommendation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Problem => "problem",
            Field::Users => "users",
            Field::Competition => "competition",
            Field::Differentiation => "differentiation",
            Field::Complexity => "complexity",
            Field::Recommendation => "recommendation",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown summary field '{s}'"))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Summary
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What happened to a proposed update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The value was stored (new field, or a different value overwrote it).
    Applied(Field),
    /// The field already held exactly this value.
    Unchanged(Field),
    /// Field or value empty after trimming.
    DroppedEmpty,
    /// The field name is not one of the six canonical fields.
    DroppedUnknown(String),
}

/// Field → value mapping. Unset fields are absent; values are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    values: BTreeMap<Field, String>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn is_set(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    /// Set fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge one update, overwriting any previous value for the field.
    ///
    /// Empty fields/values are dropped silently, as are field names outside
    /// the canonical six. The value is stored exactly as given.
    pub fn apply_update(&mut self, field: &str, value: &str) -> UpdateOutcome {
        if field.is_empty() || value.is_empty() {
            return UpdateOutcome::DroppedEmpty;
        }

        let field = match field.parse::<Field>() {
            Ok(f) => f,
            Err(_) => return UpdateOutcome::DroppedUnknown(field.to_string()),
        };

        if self.get(field) == Some(value) {
            return UpdateOutcome::Unchanged(field);
        }
        self.values.insert(field, value.to_string());
        UpdateOutcome::Applied(field)
    }

    pub fn reset(&mut self) {
        self.values.clear();
    }

    /// `FIELD: value` blocks separated by blank lines, unset fields skipped.
    pub fn export(&self) -> String {
        self.iter()
            .map(|(f, v)| format!("{}: {v}", f.as_str().to_uppercase()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let s = Summary::new();
        assert!(s.is_empty());
        assert!(Field::ALL.iter().all(|f| s.get(*f).is_none()));
    }

    #[test]
    fn apply_then_get_leaves_others_untouched() {
        let mut s = Summary::new();
        s.apply_update("users", "freelance designers");

        assert_eq!(s.apply_update("problem", "late invoices"), UpdateOutcome::Applied(Field::Problem));
        assert_eq!(s.get(Field::Problem), Some("late invoices"));
        assert_eq!(s.get(Field::Users), Some("freelance designers"));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn newer_value_overwrites() {
        let mut s = Summary::new();
        s.apply_update("problem", "v1");
        assert_eq!(s.apply_update("problem", "v2"), UpdateOutcome::Applied(Field::Problem));
        assert_eq!(s.get(Field::Problem), Some("v2"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn same_value_is_idempotent() {
        let mut s = Summary::new();
        s.apply_update("competition", "Splitwise");
        let before = s.clone();
        assert_eq!(s.apply_update("competition", "Splitwise"), UpdateOutcome::Unchanged(Field::Competition));
        assert_eq!(s, before);
    }

    #[test]
    fn empty_inputs_are_dropped() {
        let mut s = Summary::new();
        assert_eq!(s.apply_update("problem", ""), UpdateOutcome::DroppedEmpty);
        assert_eq!(s.apply_update("", "something"), UpdateOutcome::DroppedEmpty);
        assert!(s.is_empty());
    }

    #[test]
    fn whitespace_only_value_is_stored() {
        let mut s = Summary::new();
        assert_eq!(s.apply_update("users", "   "), UpdateOutcome::Applied(Field::Users));
        assert_eq!(s.get(Field::Users), Some("   "));
    }

    #[test]
    fn value_padding_is_kept() {
        let mut s = Summary::new();
        s.apply_update("problem", "  padded value ");
        assert_eq!(s.get(Field::Problem), Some("  padded value "));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut s = Summary::new();
        assert_eq!(
            s.apply_update("pricing", "freemium"),
            UpdateOutcome::DroppedUnknown("pricing".into())
        );
        assert!(s.is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = Summary::new();
        s.apply_update("problem", "p");
        s.apply_update("recommendation", "go");
        s.reset();
        assert!(s.is_empty());
    }

    #[test]
    fn export_uses_canonical_order_and_skips_unset() {
        let mut s = Summary::new();
        s.apply_update("recommendation", "Go, but start with a landing page");
        s.apply_update("problem", "no easy expense splitting");
        s.apply_update("competition", "Splitwise, Venmo");

        assert_eq!(
            s.export(),
            "PROBLEM: no easy expense splitting\n\n\
             COMPETITION: Splitwise, Venmo\n\n\
             RECOMMENDATION: Go, but start with a landing page"
        );
    }

    #[test]
    fn export_of_empty_summary_is_empty() {
        assert_eq!(Summary::new().export(), "");
    }

    #[test]
    fn field_round_trips_through_str() {
        for f in Field::ALL {
            assert_eq!(f.as_str().parse::<Field>().unwrap(), f);
        }
        assert!("Problem".parse::<Field>().is_err());
    }
}
