//! Edit dialog pre-fill.
//!
//! The dialog is shared by every row. Right before it opens, the control that opened
//! it (the event's related target) is read for its record attributes and the four
//! form fields are overwritten, defaults included, so nothing from a previous row
//! survives.

use crate::dom::{Behavior, Dom, EventKind};
use crate::domain::{EditField, EditFormState};
use serde::{Deserialize, Serialize};

/// Element ids of the edit form's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EditFormLayout {
    pub id_field: String,
    pub item_field: String,
    pub type_field: String,
    pub quantity_field: String,
}

impl EditFormLayout {
    #[must_use]
    pub fn element_id(&self, field: EditField) -> &str {
        match field {
            EditField::Id => &self.id_field,
            EditField::Item => &self.item_field,
            EditField::Kind => &self.type_field,
            EditField::Quantity => &self.quantity_field,
        }
    }
}

impl Default for EditFormLayout {
    fn default() -> Self {
        Self {
            id_field: "editTransactionId".to_string(),
            item_field: "editTransactionItem".to_string(),
            type_field: "editTransactionType".to_string(),
            quantity_field: "editTransactionQty".to_string(),
        }
    }
}

/// Writes the trigger's record into the form and returns what was written.
///
/// With no trigger every field gets its default. Form inputs missing from the page
/// are skipped.
pub fn populate<D: Dom + ?Sized>(
    dom: &mut D,
    layout: &EditFormLayout,
    trigger: Option<&D::Node>,
) -> EditFormState {
    let form = match trigger {
        Some(node) => EditFormState::from_attributes(|name| dom.attribute(node, name)),
        None => {
            tracing::debug!("edit dialog opened without a trigger, using defaults");
            EditFormState::defaults()
        }
    };

    for field in EditField::ALL {
        let id = layout.element_id(field);
        match dom.element_by_id(id) {
            Some(input) => dom.set_value(&input, form.get(field)),
            None => tracing::debug!(%id, "edit form field missing"),
        }
    }

    tracing::debug!(id = %form.id, "edit form populated");
    form
}

/// Attaches the pre-fill listener to the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequestBinder {
    modal_id: String,
    form: EditFormLayout,
}

impl EditRequestBinder {
    #[must_use]
    pub fn new(modal_id: impl Into<String>, form: EditFormLayout) -> Self {
        Self {
            modal_id: modal_id.into(),
            form,
        }
    }

    /// Binds the dialog's "about to open" slot. Returns false when the page has no dialog.
    pub fn bind<D: Dom + ?Sized>(&self, dom: &mut D) -> bool {
        let Some(modal) = dom.element_by_id(&self.modal_id) else {
            tracing::debug!(modal = %self.modal_id, "no edit dialog on page");
            return false;
        };

        dom.listen(
            &modal,
            EventKind::ModalShow,
            Behavior::PopulateEditForm(self.form.clone()),
        );
        true
    }
}
