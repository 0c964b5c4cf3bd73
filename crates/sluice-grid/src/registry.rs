//! Variable name → column registry.

use indexmap::IndexSet;
use sluice_core::{AssignOnce, FieldError, VarId};

/// Ordered, deduplicated set of variable names.
///
/// Components add the variables they need before the field store is
/// allocated; allocation freezes the registry and its column count.
#[derive(Clone, Debug)]
pub struct VarRegistry {
    names: IndexSet<String>,
    n_vars: AssignOnce<usize>,
}

impl Default for VarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VarRegistry {
    /// Empty, unfrozen registry.
    pub fn new() -> Self {
        Self {
            names: IndexSet::new(),
            n_vars: AssignOnce::new("n_vars"),
        }
    }

    /// Register `name`, returning its column.
    ///
    /// Adding a name twice returns the existing column.
    pub fn add(&mut self, name: &str) -> Result<VarId, FieldError> {
        if let Some(&n_vars) = self.n_vars.try_get() {
            return match self.names.get_index_of(name) {
                Some(idx) => Ok(VarId(idx as u32)),
                None => Err(FieldError::RegistryFrozen {
                    name: name.to_string(),
                    n_vars,
                }),
            };
        }
        let (idx, _) = self.names.insert_full(name.to_string());
        Ok(VarId(idx as u32))
    }

    /// Column registered under `name`.
    pub fn get(&self, name: &str) -> Result<VarId, FieldError> {
        self.names
            .get_index_of(name)
            .map(|idx| VarId(idx as u32))
            .ok_or_else(|| FieldError::UnknownVariable {
                name: name.to_string(),
            })
    }

    /// Name of column `var`, if registered.
    pub fn name(&self, var: VarId) -> Option<&str> {
        self.names.get_index(var.column()).map(String::as_str)
    }

    /// Number of names registered so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in column order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (VarId(i as u32), n.as_str()))
    }

    /// Fix the column count. Further new names are rejected.
    pub fn freeze(&mut self) -> usize {
        if !self.n_vars.is_set() {
            self.n_vars.set(self.names.len());
        }
        *self.n_vars.get()
    }

    /// Whether [`freeze`](Self::freeze) has been called.
    pub fn is_frozen(&self) -> bool {
        self.n_vars.is_set()
    }

    /// Frozen column count.
    ///
    /// # Panics
    ///
    /// If the registry has not been frozen.
    pub fn n_vars(&self) -> usize {
        *self.n_vars.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_assigns_sequential_columns() {
        let mut r = VarRegistry::new();
        assert_eq!(r.add("density").unwrap(), VarId(0));
        assert_eq!(r.add("tracer").unwrap(), VarId(1));
        assert_eq!(r.get("tracer").unwrap(), VarId(1));
        assert_eq!(r.name(VarId(0)), Some("density"));
    }

    #[test]
    fn duplicate_names_share_a_column() {
        let mut r = VarRegistry::new();
        r.add("data").unwrap();
        assert_eq!(r.add("data").unwrap(), VarId(0));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let r = VarRegistry::new();
        assert_eq!(
            r.get("missing"),
            Err(FieldError::UnknownVariable {
                name: "missing".into()
            })
        );
    }

    #[test]
    fn frozen_registry_rejects_new_names() {
        let mut r = VarRegistry::new();
        r.add("a").unwrap();
        assert_eq!(r.freeze(), 1);
        assert_eq!(r.freeze(), 1);
        assert_eq!(r.add("a").unwrap(), VarId(0));
        assert!(matches!(
            r.add("b"),
            Err(FieldError::RegistryFrozen { n_vars: 1, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "'n_vars' read before it was assigned")]
    fn n_vars_before_freeze_panics() {
        VarRegistry::new().n_vars();
    }
}
