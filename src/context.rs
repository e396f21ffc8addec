use std::{collections::HashMap, fmt, rc::Rc};

use tracing::debug;

use crate::{
    ast::Resolve,
    error::{Error, Result},
};

/// Switches that change how a [`Context`] behaves during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    /// Undo an include's property bindings once the include returns.
    ///
    /// Off by default: bindings stay in the context and are visible to
    /// every later include sharing it.
    pub scoped_bindings: bool,

    /// Fail with [`Error::CyclicReference`] when a fragment is re-entered
    /// while still on the resolution stack. With this off a cyclic include
    /// graph recurses without bound.
    pub detect_cycles: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        ContextOptions {
            scoped_bindings: false,
            detect_cycles: true,
        }
    }
}

impl ContextOptions {
    pub fn scoped_bindings(mut self, enabled: bool) -> Self {
        self.scoped_bindings = enabled;
        self
    }

    pub fn detect_cycles(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }
}

/// Qualifies a fragment id with a namespace unless it already carries one.
pub fn qualify(namespace: &str, id: &str) -> String {
    if id.contains('.') {
        id.to_string()
    } else {
        format!("{}.{}", namespace, id)
    }
}

/// Evaluation state shared by every node of one resolution tree.
///
/// Holds the variable bindings, the namespace of the mapper being built,
/// and the registry of fragments keyed by qualified name. Property
/// bindings mutate the variables in place.
pub struct Context {
    /// Namespace captured by nodes built against this context
    pub namespace: String,
    variables: HashMap<String, String>,
    fragments: HashMap<String, Rc<dyn Resolve>>,
    options: ContextOptions,
    /// Qualified names currently being resolved, outermost first
    active: Vec<String>,
    /// Previous values shadowed by scoped bindings, one frame per include
    frames: Vec<Vec<(String, Option<String>)>>,
}

impl Context {
    pub fn new() -> Self {
        Context {
            namespace: String::new(),
            variables: HashMap::new(),
            fragments: HashMap::new(),
            options: ContextOptions::default(),
            active: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Context {
            namespace: namespace.into(),
            ..Context::new()
        }
    }

    pub fn with_options(mut self, options: ContextOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ContextOptions {
        self.options
    }

    pub fn get_variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Binds `name` to `value`, overwriting any previous binding.
    ///
    /// Inside a frame the first overwrite of each name is remembered so
    /// [`Context::pop_frame`] can restore it.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if let Some(frame) = self.frames.last_mut()
            && !frame.iter().any(|(saved, _)| *saved == name)
        {
            frame.push((name.clone(), self.variables.get(&name).cloned()));
        }
        self.variables.insert(name, value.into());
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    pub fn get_sql(&self, qualified: &str) -> Option<Rc<dyn Resolve>> {
        self.fragments.get(qualified).cloned()
    }

    /// Registers a fragment under its qualified name, returning the one it
    /// replaced, if any.
    pub fn register(
        &mut self,
        qualified: impl Into<String>,
        fragment: Rc<dyn Resolve>,
    ) -> Option<Rc<dyn Resolve>> {
        self.fragments.insert(qualified.into(), fragment)
    }

    /// Registered qualified names, sorted.
    pub fn fragment_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fragments.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn push_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Drops the innermost frame and restores every binding it shadowed.
    pub fn pop_frame(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        for (name, previous) in frame.into_iter().rev() {
            match previous {
                Some(value) => {
                    self.variables.insert(name, value);
                }
                None => {
                    self.variables.remove(&name);
                }
            }
        }
    }

    /// Looks up `qualified` and resolves it against this context.
    pub fn resolve_fragment(&mut self, qualified: &str) -> Result<String> {
        let fragment = self
            .get_sql(qualified)
            .ok_or_else(|| Error::FragmentNotFound(qualified.to_string()))?;

        if self.options.detect_cycles && self.active.iter().any(|name| name == qualified) {
            let mut chain = self.active.clone();
            chain.push(qualified.to_string());
            return Err(Error::CyclicReference(chain));
        }

        debug!(fragment = qualified, depth = self.active.len(), "resolving fragment");
        self.active.push(qualified.to_string());
        let result = fragment.resolve(self);
        self.active.pop();
        result
    }

    /// Resolves a top-level statement by id. Unqualified ids are looked up
    /// in this context's namespace.
    pub fn resolve_statement(&mut self, id: &str) -> Result<String> {
        let qualified = qualify(&self.namespace, id);
        self.resolve_fragment(&qualified)
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("namespace", &self.namespace)
            .field("variables", &self.variables)
            .field("fragments", &self.fragment_names())
            .field("options", &self.options)
            .finish()
    }
}
