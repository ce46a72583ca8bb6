use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use crate::ast::NodeId;
use crate::sol::SourceUnit;

use super::scope::Scope;
use super::types::SolType;

/// Types of already checked nodes, keyed by node identity. The cache only
/// ever grows; re-checking a cached node returns the stored type without
/// recomputation. The single exception to write-once is overload
/// narrowing, which replaces a [`SolType::FunctionSet`] entry with its
/// narrowed form.
#[derive(Debug, Clone, Default)]
pub struct TypeCache {
    entries: HashMap<NodeId, SolType>,
}

impl TypeCache {
    pub fn get(&self, id: NodeId) -> Option<&SolType> {
        self.entries.get(&id)
    }

    pub fn insert(&mut self, id: NodeId, ty: SolType) {
        self.entries.insert(id, ty);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything a checking run needs: the scope stack and the type cache.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub scope: Scope,
    pub cache: TypeCache,
}

impl Context {
    pub fn new(units: Vec<Rc<SourceUnit>>) -> Context {
        Context {
            scope: Scope::new(units),
            cache: TypeCache::default(),
        }
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.scope.fmt(f)
    }
}
