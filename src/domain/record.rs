//! Record attributes carried by a row's edit trigger and the edit form they fill.
//!
//! The edit dialog is shared by every row. Opening it copies one row's attributes
//! into the form, so the fallback for every field is declared once, in
//! [`EditField`], instead of being scattered through the population code.

use serde::{Deserialize, Serialize};

/// One input of the shared edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    /// Record identifier.
    Id,
    /// Item (product) name.
    Item,
    /// Transaction type, e.g. `sale`.
    Kind,
    /// Quantity.
    Quantity,
}

impl EditField {
    /// Every field, in form order.
    pub const ALL: [Self; 4] = [Self::Id, Self::Item, Self::Kind, Self::Quantity];

    /// Data attribute on the edit trigger that carries this field.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Id => "data-id",
            Self::Item => "data-item",
            Self::Kind => "data-type",
            Self::Quantity => "data-qty",
        }
    }

    /// Value written when the trigger does not carry the attribute.
    #[must_use]
    pub const fn default_value(self) -> &'static str {
        match self {
            Self::Id | Self::Item => "",
            Self::Kind => "sale",
            Self::Quantity => "1",
        }
    }
}

/// Contents of the edit form for exactly one row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditFormState {
    pub id: String,
    pub item: String,
    pub kind: String,
    pub quantity: String,
}

impl EditFormState {
    /// Builds the form state from an attribute lookup on the triggering control.
    ///
    /// Missing and empty attributes both fall back to [`EditField::default_value`],
    /// so no field is ever left holding a previous row's data.
    ///
    /// # Examples
    ///
    /// ```
    /// use livesearch::domain::EditFormState;
    ///
    /// let form = EditFormState::from_attributes(|name| (name == "data-id").then(|| "7".to_string()));
    /// assert_eq!(form.id, "7");
    /// assert_eq!(form.item, "");
    /// assert_eq!(form.kind, "sale");
    /// assert_eq!(form.quantity, "1");
    /// ```
    pub fn from_attributes<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |field: EditField| {
            lookup(field.attribute())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| field.default_value().to_string())
        };

        Self {
            id: read(EditField::Id),
            item: read(EditField::Item),
            kind: read(EditField::Kind),
            quantity: read(EditField::Quantity),
        }
    }

    /// The form populated entirely from defaults.
    #[must_use]
    pub fn defaults() -> Self {
        Self::from_attributes(|_| None)
    }

    /// Value for a single field.
    #[must_use]
    pub fn get(&self, field: EditField) -> &str {
        match field {
            EditField::Id => &self.id,
            EditField::Item => &self.item,
            EditField::Kind => &self.kind,
            EditField::Quantity => &self.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn all_attributes_present() {
        let form = EditFormState::from_attributes(lookup(&[
            ("data-id", "42"),
            ("data-item", "Pen"),
            ("data-type", "sale"),
            ("data-qty", "3"),
        ]));

        assert_eq!(form.id, "42");
        assert_eq!(form.item, "Pen");
        assert_eq!(form.kind, "sale");
        assert_eq!(form.quantity, "3");
    }

    #[test]
    fn only_id_present_uses_defaults() {
        let form = EditFormState::from_attributes(lookup(&[("data-id", "7")]));

        assert_eq!(
            form,
            EditFormState {
                id: "7".into(),
                item: String::new(),
                kind: "sale".into(),
                quantity: "1".into(),
            }
        );
    }

    #[test]
    fn empty_attribute_counts_as_absent() {
        let form = EditFormState::from_attributes(lookup(&[("data-type", ""), ("data-qty", "")]));
        assert_eq!(form.kind, "sale");
        assert_eq!(form.quantity, "1");
    }

    #[test]
    fn non_default_type_is_kept() {
        let form = EditFormState::from_attributes(lookup(&[("data-type", "purchase")]));
        assert_eq!(form.get(EditField::Kind), "purchase");
    }

    #[test]
    fn defaults_table() {
        let form = EditFormState::defaults();
        for field in EditField::ALL {
            assert_eq!(form.get(field), field.default_value());
        }
    }
}
