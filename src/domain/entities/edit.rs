/// Values typed into the edit dialog, held until the user confirms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EditDraft {
    pub unit_price: Option<f64>,
    pub unit_count: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditDialog {
    #[default]
    Closed,
    Open(EditDraft),
}

impl EditDialog {
    pub fn is_open(&self) -> bool {
        matches!(self, EditDialog::Open(_))
    }

    pub fn draft(&self) -> Option<EditDraft> {
        match self {
            EditDialog::Open(draft) => Some(*draft),
            EditDialog::Closed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteDialog {
    #[default]
    Closed,
    Open,
}

impl DeleteDialog {
    pub fn is_open(&self) -> bool {
        matches!(self, DeleteDialog::Open)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DialogState {
    pub edit: EditDialog,
    pub delete: DeleteDialog,
}
