use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-generated primary key for a customer row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub i64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A restaurant customer.
///
/// `id` is `None` until the entity has been persisted; the store assigns the
/// identifier on first insert and the entity adopts it. Once assigned, the
/// identifier never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<CustomerId>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl Customer {
    /// Construct a transient customer that has not been persisted yet.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self { id: None, first_name: first_name.into(), last_name: last_name.into(), phone, notes }
    }

    /// First and last name joined by a single space. Derived on demand, never
    /// stored.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{Customer, CustomerId};

    #[test]
    fn full_name_joins_first_and_last_with_single_space() {
        let customer = Customer::new("Ada", "Lovelace", None, None);
        assert_eq!(customer.full_name(), "Ada Lovelace");
    }

    #[test]
    fn new_customer_is_transient() {
        let customer = Customer::new("Ada", "Lovelace", Some("555-0100".to_string()), None);
        assert_eq!(customer.id, None);
    }

    #[test]
    fn customer_id_displays_inner_value() {
        assert_eq!(CustomerId(42).to_string(), "42");
    }
}
