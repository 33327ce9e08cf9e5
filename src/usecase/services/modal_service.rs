use crate::domain::entities::edit::{DeleteDialog, DialogState, EditDialog, EditDraft};
use crate::domain::entities::table::BaseRecord;

/// Edit and delete confirmation dialogs. Both only open while a base row is
/// selected. The commit itself belongs to the editor; this only tracks what
/// is open and what the edit dialog has staged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModalController {
    state: DialogState,
}

impl ModalController {
    pub fn state(&self) -> &DialogState {
        &self.state
    }

    /// Opens the edit dialog staged with the selected row's prices. Returns
    /// `false` (and changes nothing) without a selection.
    pub fn open_edit(&mut self, selected: Option<&BaseRecord>) -> bool {
        let Some(row) = selected else {
            tracing::debug!("edit dialog request ignored, no row selected");
            return false;
        };
        self.state.edit = EditDialog::Open(EditDraft {
            unit_price: Some(row.unit_price),
            unit_count: row.unit_count(),
        });
        true
    }

    pub fn stage_unit_price(&mut self, unit_price: Option<f64>) -> bool {
        match &mut self.state.edit {
            EditDialog::Open(draft) => {
                draft.unit_price = unit_price;
                true
            }
            EditDialog::Closed => false,
        }
    }

    pub fn stage_unit_count(&mut self, unit_count: Option<f64>) -> bool {
        match &mut self.state.edit {
            EditDialog::Open(draft) => {
                draft.unit_count = unit_count;
                true
            }
            EditDialog::Closed => false,
        }
    }

    /// Closes the edit dialog and drops the staged values.
    pub fn close_edit(&mut self) -> bool {
        let was_open = self.state.edit.is_open();
        self.state.edit = EditDialog::Closed;
        was_open
    }

    pub fn open_delete(&mut self, selected: Option<&BaseRecord>) -> bool {
        if selected.is_none() {
            tracing::debug!("delete dialog request ignored, no row selected");
            return false;
        }
        self.state.delete = DeleteDialog::Open;
        true
    }

    pub fn close_delete(&mut self) -> bool {
        let was_open = self.state.delete.is_open();
        self.state.delete = DeleteDialog::Closed;
        was_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(unit_price: f64, box_price: f64) -> BaseRecord {
        BaseRecord {
            establishment_code: "0021870".to_string(),
            product_code: "A1".to_string(),
            unit_price,
            box_price,
            extra: Vec::new(),
        }
    }

    #[test]
    fn open_without_selection_is_ignored() {
        let mut modals = ModalController::default();

        assert!(!modals.open_edit(None));
        assert!(!modals.open_delete(None));
        assert_eq!(modals.state(), &DialogState::default());
    }

    #[test]
    fn open_edit_stages_prices_and_rounded_count() {
        let mut modals = ModalController::default();

        assert!(modals.open_edit(Some(&row(3.0, 10.0))));

        assert_eq!(
            modals.state().edit.draft(),
            Some(EditDraft {
                unit_price: Some(3.0),
                unit_count: Some(3.0),
            })
        );
    }

    #[test]
    fn zero_unit_price_leaves_count_unset() {
        let mut modals = ModalController::default();
        modals.open_edit(Some(&row(0.0, 10.0)));

        let draft = modals.state().edit.draft().expect("dialog should be open");
        assert_eq!(draft.unit_count, None);
    }

    #[test]
    fn closing_edit_drops_staged_values() {
        let mut modals = ModalController::default();
        modals.open_edit(Some(&row(2.0, 4.0)));
        assert!(modals.stage_unit_count(Some(5.0)));

        assert!(modals.close_edit());

        assert_eq!(modals.state().edit.draft(), None);
        assert!(!modals.stage_unit_price(Some(1.0)));
    }

    #[test]
    fn delete_dialog_opens_and_closes() {
        let mut modals = ModalController::default();
        assert!(modals.open_delete(Some(&row(1.0, 1.0))));
        assert!(modals.state().delete.is_open());

        assert!(modals.close_delete());
        assert!(!modals.state().delete.is_open());
        assert!(!modals.close_delete());
    }
}
