//! Source-string keyed program memoization.

use std::rc::Rc;

use ahash::{AHashMap, AHashSet};

use crate::{error::Error, expressions::Node, parse, value::Value};

/// One cached program: its parse tree, the value it last produced, and the
/// names of the variables it reads.
pub(crate) struct CachedProgram {
    pub root: Rc<Node>,
    /// Present only while no write has touched a name in `reads` since the
    /// program last ran.
    pub last_value: Option<Value>,
    pub reads: AHashSet<String>,
    /// Assignment targets; running this program in a persistent scope may
    /// write these names.
    pub writes: AHashSet<String>,
}

/// Programs keyed by exact source text. Entries are never evicted.
#[derive(Default)]
pub(crate) struct ProgramCache {
    programs: AHashMap<String, CachedProgram>,
}

impl ProgramCache {
    /// Parses and inserts `source` if absent. Returns whether a parse
    /// happened. Sources that fail to parse are not cached.
    pub fn ensure_parsed(&mut self, source: &str) -> Result<bool, Error> {
        if self.programs.contains_key(source) {
            return Ok(false);
        }
        let root = parse::parse(source)?;
        let mut reads = AHashSet::new();
        root.collect_variable_names(&mut reads);
        let mut writes = AHashSet::new();
        root.collect_assigned_names(&mut writes);
        self.programs.insert(
            source.to_owned(),
            CachedProgram {
                root: Rc::new(root),
                last_value: None,
                reads,
                writes,
            },
        );
        Ok(true)
    }

    pub fn get(&self, source: &str) -> Option<&CachedProgram> {
        self.programs.get(source)
    }

    pub fn get_mut(&mut self, source: &str) -> Option<&mut CachedProgram> {
        self.programs.get_mut(source)
    }

    /// Drops the memoized value of every program that reads `name`.
    pub fn invalidate_reads(&mut self, name: &str) {
        for program in self.programs.values_mut() {
            if program.reads.contains(name) {
                program.last_value = None;
            }
        }
    }
}
