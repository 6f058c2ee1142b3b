//! Process forest over traced executions
//!
//! Processes have a parent process which started them. If every execution were
//! captured this would be a single tree. Executions escape the tracer though
//! (a shell forked before the tracer attached, static executables invisible to
//! the dynamic loader), so the tree falls apart into a forest.
//!
//! The forest exists to filter out executions that are an implementation
//! detail of another one. When a compiler runs itself or another compiler
//! (the CUDA driver calls the C compiler several times), the children would
//! produce duplicate entries. A breadth first walk that stops descending at
//! the first recognized process avoids that.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

pub struct Forest<'a, Id, Entry> {
    entries: HashMap<Id, &'a Entry>,
    nodes: HashMap<Id, Vec<Id>>,
    roots: Vec<Id>,
}

impl<'a, Id, Entry> Forest<'a, Id, Entry>
where
    Id: Copy + Ord + Hash,
{
    /// Builds the forest in a single pass over `input`, then repairs phantom roots.
    ///
    /// A phantom is an id referenced as a parent that never had its own entry.
    /// It is dropped from the forest and its children become roots.
    pub fn new<I, P>(input: &'a [Entry], id_of: I, parent_of: P) -> Self
    where
        I: Fn(&Entry) -> Id,
        P: Fn(&Entry) -> Id,
    {
        let mut entries: HashMap<Id, &'a Entry> = HashMap::new();
        let mut nodes: HashMap<Id, Vec<Id>> = HashMap::new();
        let mut maybe_roots: HashSet<Id> = HashSet::new();
        let mut non_roots: HashSet<Id> = HashSet::new();

        for entry in input {
            let id = id_of(entry);
            let parent = parent_of(entry);

            entries.insert(id, entry);
            nodes.entry(id).or_default();
            nodes.entry(parent).or_default().push(id);

            maybe_roots.remove(&id);
            non_roots.insert(id);
            if !non_roots.contains(&parent) {
                maybe_roots.insert(parent);
            }
        }

        let mut new_roots: HashSet<Id> = HashSet::new();
        for root in maybe_roots {
            if entries.contains_key(&root) {
                new_roots.insert(root);
            } else if let Some(children) = nodes.remove(&root) {
                new_roots.extend(children);
            }
        }

        let mut roots: Vec<Id> = new_roots.into_iter().collect();
        roots.sort_unstable();

        Self {
            entries,
            nodes,
            roots,
        }
    }

    pub fn roots(&self) -> &[Id] {
        &self.roots
    }

    pub fn children(&self, id: &Id) -> Option<&[Id]> {
        self.nodes.get(id).map(Vec::as_slice)
    }

    pub fn entry(&self, id: &Id) -> Option<&'a Entry> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.nodes.contains_key(id)
    }

    /// Breadth first walk from the roots in ascending order.
    ///
    /// When `visit` succeeds its outputs are collected and the children of that
    /// node are not inspected. When it fails, the children are queued in the
    /// order they were traced. Every id is visited at most once.
    pub fn bfs<O, E, F>(&self, mut visit: F) -> Vec<O>
    where
        F: FnMut(&'a Entry) -> Result<Vec<O>, E>,
    {
        let mut result = Vec::new();
        let mut visited: HashSet<Id> = HashSet::new();
        let mut queue: VecDeque<Id> = self.roots.iter().copied().collect();

        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let Some(entry) = self.entry(&id) else {
                continue;
            };
            match visit(entry) {
                Ok(outputs) => result.extend(outputs),
                Err(_) => {
                    if let Some(children) = self.nodes.get(&id) {
                        queue.extend(children.iter().copied());
                    }
                }
            }
        }
        result
    }
}
