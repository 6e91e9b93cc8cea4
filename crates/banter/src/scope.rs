//! Lexical environments.
//!
//! A scope is a shared handle: cloning it yields another handle onto the
//! same variable table, which is how block values keep seeing writes made
//! to their defining scope after capture. Outer links form an acyclic
//! chain; lookups walk outward, writes always land on the scope they were
//! invoked on.

use std::{cell::RefCell, fmt, rc::Rc};

use ahash::AHashMap;

use crate::{object::Object, value::Value};

/// A name→value mapping with an optional outer scope and a dirty flag.
///
/// The dirty flag records that the scope has been written since the vm
/// last acted on it; the vm uses it to decide whether memoized program
/// results are still trustworthy.
#[derive(Clone, Default)]
pub struct Scope {
    inner: Rc<RefCell<ScopeData>>,
}

#[derive(Default)]
struct ScopeData {
    variables: AHashMap<String, Value>,
    outer: Option<Scope>,
    dirty: bool,
}

impl Scope {
    /// Creates an empty scope with no outer link.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty scope whose lookups fall through to `outer`.
    pub(crate) fn child(outer: &Self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ScopeData {
                variables: AHashMap::new(),
                outer: Some(outer.clone()),
                dirty: false,
            })),
        }
    }

    /// Installs a number binding.
    pub fn set_number(&self, name: &str, value: f64) {
        self.set_value(name, Value::Number(value));
    }

    /// Installs a string binding.
    pub fn set_string(&self, name: &str, value: &str) {
        self.set_value(name, Value::Str(Rc::from(value)));
    }

    /// Installs a boolean binding.
    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_value(name, Value::Boolean(value));
    }

    /// Installs a binding from a host value.
    pub fn set(&self, name: &str, value: Object) {
        self.set_value(name, value.to_value());
    }

    /// Reads a binding from this scope only, without walking the chain.
    ///
    /// Block and deferred bindings have no host representation and report
    /// `None` even when present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Object> {
        Object::from_value(&self.find_local(name)?)
    }

    /// Writes `value` under `name` in this scope and marks it dirty.
    pub(crate) fn set_value(&self, name: &str, value: Value) {
        let mut data = self.inner.borrow_mut();
        data.dirty = true;
        data.variables.insert(name.to_owned(), value);
    }

    /// Resolves `name` against this scope, then outward along the chain.
    pub(crate) fn lookup(&self, name: &str) -> Option<Value> {
        let data = self.inner.borrow();
        if let Some(value) = data.variables.get(name) {
            return Some(value.clone());
        }
        data.outer.as_ref().and_then(|outer| outer.lookup(name))
    }

    /// Reads a binding from this scope's own table only.
    pub(crate) fn find_local(&self, name: &str) -> Option<Value> {
        self.inner.borrow().variables.get(name).cloned()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.inner.borrow().dirty
    }

    pub(crate) fn clean(&self) {
        self.inner.borrow_mut().dirty = false;
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("Scope")
            .field("variables", &data.variables.keys().collect::<Vec<_>>())
            .field("dirty", &data.dirty)
            .field("has_outer", &data.outer.is_some())
            .finish()
    }
}
