/// In-memory table slot with a version counter. The table can only change
/// through `replace` or `patch`; each bumps the version exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStore<T> {
    version: u64,
    table: Option<T>,
}

impl<T> Default for TableStore<T> {
    fn default() -> Self {
        Self {
            version: 0,
            table: None,
        }
    }
}

impl<T: Clone> TableStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self) -> Option<&T> {
        self.table.as_ref()
    }

    pub fn replace(&mut self, table: T) {
        self.table = Some(table);
        self.version += 1;
    }

    /// Applies `edit` to a working copy and swaps it in only on success, so a
    /// failed edit leaves both the table and the version untouched. An absent
    /// table starts from `init()`.
    pub fn patch<R, E>(
        &mut self,
        init: impl FnOnce() -> T,
        edit: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut working = match &self.table {
            Some(table) => table.clone(),
            None => init(),
        };
        let outcome = edit(&mut working)?;
        self.table = Some(working);
        self.version += 1;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_bumps_version() {
        let mut store = TableStore::<Vec<i32>>::new();
        assert_eq!(store.version(), 0);
        assert_eq!(store.get(), None);

        store.replace(vec![1]);

        assert_eq!(store.version(), 1);
        assert_eq!(store.get(), Some(&vec![1]));
    }

    #[test]
    fn failed_patch_leaves_table_untouched() {
        let mut store = TableStore::new();
        store.replace(vec![1, 2]);

        let result: Result<(), &str> = store.patch(Vec::new, |rows| {
            rows.push(3);
            Err("rejected")
        });

        assert_eq!(result, Err("rejected"));
        assert_eq!(store.get(), Some(&vec![1, 2]));
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn patch_on_absent_table_starts_from_init() {
        let mut store = TableStore::new();

        let len: Result<usize, ()> = store.patch(|| vec![9], |rows| {
            rows.push(10);
            Ok(rows.len())
        });

        assert_eq!(len, Ok(2));
        assert_eq!(store.get(), Some(&vec![9, 10]));
    }
}
