//! Public interface for running banter programs.

use crate::{
    cache::ProgramCache,
    error::{Error, EvalError},
    eval,
    expressions::Node,
    object::Object,
    parse,
    scope::Scope,
    tracer::{NoopTracer, VmTracer},
    value::{Kind, Value},
};

/// A long-lived interpreter instance.
///
/// The vm owns a global scope the host installs bindings into, and a
/// program cache keyed by source text. Re-running an unchanged source
/// string returns the memoized result as long as no variable the program
/// reads has been written since.
///
/// The vm is single-threaded and fully synchronous; sharing one across
/// threads requires external mutual exclusion.
///
/// # Example
/// ```
/// use banter::{Object, Vm};
///
/// let mut vm = Vm::new();
/// vm.set_number_var("x", 25.0);
/// assert_eq!(vm.run("x + 75").unwrap(), Some(Object::Number(100.0)));
/// vm.set_number_var("x", 50.0);
/// assert_eq!(vm.run("x + 75").unwrap(), Some(Object::Number(125.0)));
/// ```
pub struct Vm {
    global: Scope,
    /// In workspace mode, the local scope reused across runs so top-level
    /// assignments persist between calls.
    workspace: Option<Scope>,
    cache: ProgramCache,
    tracer: Box<dyn VmTracer>,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    /// Creates a vm with a fresh global scope.
    #[must_use]
    pub fn new() -> Self {
        Self::with_global_scope(Scope::new())
    }

    /// Creates a vm over an existing global scope, so several vms (or the
    /// host directly) can share one set of bindings.
    #[must_use]
    pub fn with_global_scope(global: Scope) -> Self {
        Self {
            global,
            workspace: None,
            cache: ProgramCache::default(),
            tracer: Box::new(NoopTracer),
        }
    }

    /// Creates a workspace vm: the per-evaluation local scope is reused
    /// across runs, so `x := 5` in one call is visible to the next.
    #[must_use]
    pub fn workspace() -> Self {
        let global = Scope::new();
        let workspace = Scope::child(&global);
        Self {
            global,
            workspace: Some(workspace),
            cache: ProgramCache::default(),
            tracer: Box::new(NoopTracer),
        }
    }

    /// Replaces the tracer receiving this vm's events.
    pub fn set_tracer(&mut self, tracer: Box<dyn VmTracer>) {
        self.tracer = tracer;
    }

    /// A handle onto the vm's global scope.
    #[must_use]
    pub fn global_scope(&self) -> Scope {
        self.global.clone()
    }

    /// Installs a binding in the global scope, invalidating the memoized
    /// value of every cached program that reads `name`.
    pub fn set_var(&mut self, name: &str, value: Object) {
        self.note_write(name);
        self.global.set(name, value);
    }

    /// Installs a number binding in the global scope.
    pub fn set_number_var(&mut self, name: &str, value: f64) {
        self.set_var(name, Object::Number(value));
    }

    /// Installs a string binding in the global scope.
    pub fn set_string_var(&mut self, name: &str, value: &str) {
        self.set_var(name, Object::String(value.to_owned()));
    }

    /// Installs a boolean binding in the global scope.
    pub fn set_bool_var(&mut self, name: &str, value: bool) {
        self.set_var(name, Object::Boolean(value));
    }

    /// Installs a lazy binding: `source` must evaluate to a block, and the
    /// block's body re-runs every time the variable is read.
    pub fn set_lazy_var(&mut self, name: &str, source: &str) -> Result<(), Error> {
        let root = parse::parse(source)?;
        let local = Scope::child(&self.global);
        match eval::eval_node(&root, &local)? {
            Value::Block(block) => {
                self.note_write(name);
                self.global.set_value(name, Value::Deferred(block));
                Ok(())
            }
            other => Err(EvalError::WrongResultKind {
                expected: Kind::Block,
                found: other.kind(),
            }
            .into()),
        }
    }

    /// Reads a binding from the global scope. Reading never invalidates
    /// the cache. Bindings holding blocks or deferred values have no host
    /// representation and report `None`.
    #[must_use]
    pub fn find_var(&self, name: &str) -> Option<Object> {
        self.global.get(name)
    }

    /// Parses (or recalls) and evaluates a program, returning its
    /// polymorphic result; block, deferred, and undefined results map to
    /// `None`.
    pub fn run(&mut self, source: &str) -> Result<Option<Object>, Error> {
        let value = self.run_value(source)?;
        Ok(Object::from_value(&value))
    }

    /// Runs a program that must produce a number.
    pub fn run_number(&mut self, source: &str) -> Result<f64, Error> {
        match self.run_value(source)? {
            Value::Number(number) => Ok(number),
            other => Err(wrong_result(Kind::Number, &other)),
        }
    }

    /// Runs a program that must produce a number, truncated to an integer.
    pub fn run_integer(&mut self, source: &str) -> Result<i64, Error> {
        Ok(self.run_number(source)? as i64)
    }

    /// Runs a program that must produce a string.
    pub fn run_string(&mut self, source: &str) -> Result<String, Error> {
        match self.run_value(source)? {
            Value::Str(string) => Ok(string.to_string()),
            other => Err(wrong_result(Kind::String, &other)),
        }
    }

    /// Runs a program that must produce a boolean.
    pub fn run_bool(&mut self, source: &str) -> Result<bool, Error> {
        match self.run_value(source)? {
            Value::Boolean(boolean) => Ok(boolean),
            other => Err(wrong_result(Kind::Boolean, &other)),
        }
    }

    /// Evaluates a pre-parsed program node under the vm's scopes.
    ///
    /// Bypasses the source-string cache entirely: nothing is memoized and
    /// no memoized value is served.
    pub fn evaluate(&mut self, node: &Node) -> Result<Option<Object>, Error> {
        let local = self.local_scope();
        let value = eval::eval_node(node, &local)?;
        Ok(Object::from_value(&value))
    }

    /// The memoized-value contract: a cached result is served only while
    /// the global scope is clean and the entry still holds a value; after
    /// a real evaluation the fresh value is recorded and the scope's dirty
    /// flag cleared.
    fn run_value(&mut self, source: &str) -> Result<Value, Error> {
        if self.cache.ensure_parsed(source)? {
            self.tracer.on_parse(source);
        }
        let program = self.cache.get(source).expect("program was just ensured");
        if !self.store_is_dirty() {
            if let Some(value) = &program.last_value {
                self.tracer.on_cache_hit(source);
                return Ok(value.clone());
            }
        }
        let root = std::rc::Rc::clone(&program.root);
        let local = self.local_scope();
        let value = eval::eval_node(&root, &local)?;
        // a workspace run may have assigned names other cached programs
        // read; drop their memoized values before recording this one
        if self.workspace.is_some() {
            let written: Vec<String> = {
                let program = self.cache.get(source).expect("program was just ensured");
                program.writes.iter().cloned().collect()
            };
            for name in &written {
                self.cache.invalidate_reads(name);
            }
        }
        let program = self.cache.get_mut(source).expect("program was just ensured");
        program.last_value = Some(value.clone());
        self.clean_store();
        self.tracer.on_evaluate(source, value.kind());
        Ok(value)
    }

    /// True when a scope that persists across runs (global, or the
    /// workspace in workspace mode) has been written since the last
    /// evaluation acted on it.
    fn store_is_dirty(&self) -> bool {
        self.global.is_dirty() || self.workspace.as_ref().is_some_and(Scope::is_dirty)
    }

    fn clean_store(&self) {
        self.global.clean();
        if let Some(workspace) = &self.workspace {
            workspace.clean();
        }
    }

    fn local_scope(&self) -> Scope {
        self.workspace
            .clone()
            .unwrap_or_else(|| Scope::child(&self.global))
    }

    fn note_write(&mut self, name: &str) {
        self.tracer.on_write(name);
        self.cache.invalidate_reads(name);
    }
}

fn wrong_result(expected: Kind, found: &Value) -> Error {
    EvalError::WrongResultKind {
        expected,
        found: found.kind(),
    }
    .into()
}
