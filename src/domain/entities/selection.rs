/// Which input surface produced a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionSource {
    Grid,
    Dropdown,
}

/// The chosen product code and what each surface currently shows. The code
/// is a lookup key only; it is re-validated against the tables on each use.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub code: Option<String>,
    pub grid_code: Option<String>,
    pub dropdown_code: Option<String>,
    pub last_source: Option<SelectionSource>,
}

impl Selection {
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn surfaces_agree(&self) -> bool {
        self.grid_code == self.dropdown_code && self.dropdown_code == self.code
    }
}
