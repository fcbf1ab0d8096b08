use std::collections::HashSet;

use toml::{Table, Value};
use tracing::trace;

use super::Mode;
use crate::{
    error::{ConfigError, ErrorLog},
    field::Field,
};


/// State of one load or save pass.
///
/// A `Pass` only exists while [`Manager`][super::Manager] is traversing its
/// sections, so field access outside of a pass is impossible by construction.
/// It owns the document tree and the scope stack for the duration of the pass
/// and records every failure into the manager's error log.
pub struct Pass<'log> {
    mode: Mode,
    tree: Table,

    /// Names from the document root down to the current table.
    scope_stack: Vec<String>,

    /// Child scope names already opened at each depth
    /// (always one entry longer than `scope_stack`).
    level_children: Vec<HashSet<String>>,

    /// `end_scope` never pops below this depth.
    floor: usize,

    errors: &'log mut ErrorLog,
}

impl<'log> Pass<'log> {
    pub(crate) fn new(mode: Mode, tree: Table, errors: &'log mut ErrorLog) -> Self {
        Self {
            mode,
            tree,
            scope_stack: Vec::new(),
            level_children: vec![HashSet::new()],
            floor: 0,
            errors,
        }
    }

    /// Direction of this pass.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of currently open scopes.
    pub fn depth(&self) -> usize {
        self.scope_stack.len()
    }

    /// Dotted path of the current scope, e.g. `server.tls`.
    pub fn path(&self) -> String {
        self.scope_stack.join(".")
    }

    fn qualified(&self, name: &str) -> String {
        if self.scope_stack.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path(), name)
        }
    }

    pub(crate) fn record(&mut self, error: ConfigError) {
        self.errors.record(error);
    }

    pub(crate) fn into_tree(self) -> Table {
        self.tree
    }


    /*
     * Scopes
     */

    /// Opens the child scope `name` of the current scope.
    ///
    /// Fails (and records an error) if `name` is empty or was already opened
    /// under the same parent during this pass.
    pub fn begin_scope(&mut self, name: &str) -> bool {
        if name.is_empty() {
            self.record(ConfigError::EmptyScopeName);
            return false;
        }

        // PANIC SAFETY: `level_children` always has one more entry than `scope_stack`.
        let siblings = self.level_children.last_mut().unwrap();
        if !siblings.insert(name.to_string()) {
            self.record(ConfigError::DuplicateScope {
                name: self.qualified(name),
            });
            return false;
        }

        self.scope_stack.push(name.to_string());
        self.level_children.push(HashSet::new());

        trace!(scope = %self.path(), "Opened scope.");
        true
    }

    /// Closes the innermost scope.
    ///
    /// Inside a section body (or a [`Pass::scope`] body), the scope that
    /// body runs in cannot be closed.
    pub fn end_scope(&mut self) -> bool {
        if self.scope_stack.is_empty() {
            self.record(ConfigError::UnbalancedScope);
            return false;
        }

        if self.scope_stack.len() <= self.floor {
            self.record(ConfigError::ScopeClosedEarly { scope: self.path() });
            return false;
        }

        self.scope_stack.pop();
        self.level_children.pop();
        true
    }

    /// Runs `body` inside the child scope `name`, closing it afterwards.
    ///
    /// Returns `None` without running `body` if the scope could not be opened.
    pub fn scope<R, F>(&mut self, name: &str, body: F) -> Option<R>
    where
        F: FnOnce(&mut Self) -> R,
    {
        if !self.begin_scope(name) {
            return None;
        }

        let depth = self.depth();
        let parent_floor = std::mem::replace(&mut self.floor, depth);

        let output = body(&mut *self);
        self.unwind_to(depth);

        self.floor = parent_floor;
        self.end_scope();
        Some(output)
    }

    /// Closes every scope deeper than `depth`, recording an error if there were any.
    fn unwind_to(&mut self, depth: usize) {
        let left_open = self.depth().saturating_sub(depth);
        if left_open == 0 {
            return;
        }

        self.record(ConfigError::ScopeLeftOpen {
            scope: self.scope_stack[..depth].join("."),
            count: left_open,
        });

        self.scope_stack.truncate(depth);
        self.level_children.truncate(depth + 1);
    }

    /// Opens the top-level scope of a section and pins it for the section body.
    pub(crate) fn enter_section(&mut self, name: &str) -> bool {
        if !self.begin_scope(name) {
            return false;
        }

        self.floor = self.depth();
        true
    }

    /// Closes whatever the section body left open, then the section scope itself.
    pub(crate) fn leave_section(&mut self) {
        self.unwind_to(self.floor);

        self.floor = 0;
        self.end_scope();
    }


    /*
     * Tables and fields
     */

    /// Walks the scope stack down from the document root.
    ///
    /// When saving, missing or non-table nodes along the way are replaced with
    /// empty tables. When loading, the tree is never modified and `None` is
    /// returned as soon as a scope has no matching table.
    pub fn resolve_current_table(&mut self) -> Option<&mut Table> {
        let mut table = &mut self.tree;

        for scope in &self.scope_stack {
            let is_table = matches!(table.get(scope), Some(Value::Table(_)));

            if !is_table {
                match self.mode {
                    Mode::Load => return None,
                    Mode::Save => {
                        table.insert(scope.clone(), Value::Table(Table::new()));
                    }
                }
            }

            table = match table.get_mut(scope) {
                Some(Value::Table(child)) => child,
                _ => return None,
            };
        }

        Some(table)
    }

    /// Loads or saves `target` as the field `name` of the current table.
    pub fn field<T: Field>(&mut self, name: &str, target: &mut T) -> bool {
        self.field_with(name, target, None)
    }

    /// Like [`Pass::field`], but a load that finds no usable value
    /// assigns `default` and succeeds.
    pub fn field_or<T: Field>(&mut self, name: &str, target: &mut T, default: T) -> bool {
        self.field_with(name, target, Some(default))
    }

    /// Loads or saves `target` as the field `name` of the current table.
    ///
    /// Every failure is recorded in the error log and reported as `false`;
    /// the pass continues either way.
    pub fn field_with<T: Field>(&mut self, name: &str, target: &mut T, default: Option<T>) -> bool {
        let mode = self.mode;
        let field = self.qualified(name);
        trace!(%field, ?mode, "Processing field.");

        let outcome = match self.resolve_current_table() {
            None => Err(ConfigError::NoTable { field }),
            Some(table) => match mode {
                Mode::Load => match (T::load(table, name), default) {
                    (Ok(value), _) => {
                        *target = value;
                        Ok(())
                    }
                    (Err(_), Some(default)) => {
                        *target = default;
                        Ok(())
                    }
                    (Err(source), None) => Err(ConfigError::FieldLoad { field, source }),
                },
                Mode::Save => target
                    .save(table, name)
                    .map_err(|source| ConfigError::FieldSave { field, source }),
            },
        };

        match outcome {
            Ok(()) => true,
            Err(error) => {
                self.record(error);
                false
            }
        }
    }
}



#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::FieldError;

    fn document(text: &str) -> Table {
        text.parse().unwrap()
    }

    #[test]
    fn begin_scope_rejects_empty_and_duplicate_names() {
        let mut errors = ErrorLog::new();
        let mut pass = Pass::new(Mode::Save, Table::new(), &mut errors);

        assert!(!pass.begin_scope(""));
        assert!(pass.begin_scope("server"));
        assert!(pass.end_scope());
        assert!(!pass.begin_scope("server"));
        assert_eq!(pass.depth(), 0);

        assert!(matches!(errors.history()[0], ConfigError::EmptyScopeName));
        assert!(matches!(
            &errors.history()[1],
            ConfigError::DuplicateScope { name } if name == "server"
        ));
    }

    #[test]
    fn same_name_is_allowed_under_different_parents() {
        let mut errors = ErrorLog::new();
        let mut pass = Pass::new(Mode::Save, Table::new(), &mut errors);

        let mut port = 1u16;
        pass.scope("primary", |pass| pass.scope("tls", |pass| pass.field("port", &mut port)));
        pass.scope("fallback", |pass| pass.scope("tls", |pass| pass.field("port", &mut port)));

        let tree = pass.into_tree();
        assert!(errors.is_empty());
        assert_eq!(tree["primary"]["tls"]["port"].as_integer(), Some(1));
        assert_eq!(tree["fallback"]["tls"]["port"].as_integer(), Some(1));
    }

    #[test]
    fn end_scope_without_open_scope_fails() {
        let mut errors = ErrorLog::new();
        let mut pass = Pass::new(Mode::Load, Table::new(), &mut errors);

        assert!(!pass.end_scope());
        assert!(matches!(errors.history(), [ConfigError::UnbalancedScope]));
    }

    #[test]
    fn save_creates_intermediate_tables() {
        let mut errors = ErrorLog::new();
        let mut pass = Pass::new(Mode::Save, document("server = 5"), &mut errors);

        pass.begin_scope("server");
        pass.begin_scope("tls");
        assert!(pass.resolve_current_table().is_some());
        pass.end_scope();
        pass.end_scope();

        let tree = pass.into_tree();
        assert!(tree["server"]["tls"].is_table());
    }

    #[test]
    fn load_does_not_fabricate_missing_tables() {
        let mut errors = ErrorLog::new();
        let mut pass = Pass::new(Mode::Load, document("[server]\nport = 1"), &mut errors);

        pass.begin_scope("server");
        pass.begin_scope("tls");
        assert!(pass.resolve_current_table().is_none());

        let mut verify = true;
        assert!(!pass.field("verify", &mut verify));
        pass.end_scope();
        pass.end_scope();

        let tree = pass.into_tree();
        assert!(tree["server"].get("tls").is_none());
        assert!(matches!(
            errors.history(),
            [ConfigError::NoTable { field }] if field == "server.tls.verify"
        ));
    }

    #[test]
    fn load_uses_default_for_missing_or_mismatched_values() {
        let mut errors = ErrorLog::new();
        let mut pass = Pass::new(
            Mode::Load,
            document("[client]\nage = \"old\""),
            &mut errors,
        );

        pass.begin_scope("client");
        let mut age = 1.5f64;
        let mut cache = PathBuf::from("untouched");
        assert!(pass.field_or("age", &mut age, 30.0));
        assert!(pass.field_or("cache", &mut cache, PathBuf::from("/tmp/cache")));
        pass.end_scope();

        assert!(errors.is_empty());
        assert_eq!(age, 30.0);
        assert_eq!(cache, PathBuf::from("/tmp/cache"));
    }

    #[test]
    fn load_failure_leaves_target_untouched() {
        let mut errors = ErrorLog::new();
        let mut pass = Pass::new(Mode::Load, document("[server]\nport = \"x\""), &mut errors);

        pass.begin_scope("server");
        let mut port = 8080i64;
        let mut host = String::from("localhost");
        assert!(!pass.field("port", &mut port));
        assert!(!pass.field("host", &mut host));
        pass.end_scope();

        assert_eq!(port, 8080);
        assert_eq!(host, "localhost");

        let history = errors.history();
        assert_eq!(history.len(), 2);
        assert!(matches!(
            &history[0],
            ConfigError::FieldLoad {
                field,
                source: FieldError::TypeMismatch { expected: "integer", found: "string" },
            } if field == "server.port"
        ));
        assert!(matches!(
            &history[1],
            ConfigError::FieldLoad { source: FieldError::Missing, .. }
        ));
    }

    #[test]
    fn scope_unwinds_scopes_left_open_by_its_body() {
        let mut errors = ErrorLog::new();
        let mut pass = Pass::new(Mode::Save, Table::new(), &mut errors);

        pass.scope("outer", |pass| {
            pass.begin_scope("inner");
            pass.begin_scope("innermost");
        });

        assert_eq!(pass.depth(), 0);
        assert_eq!(pass.scope("other", |pass| pass.path()), Some("other".to_string()));

        assert!(matches!(
            errors.history(),
            [ConfigError::ScopeLeftOpen { scope, count: 2 }] if scope == "outer"
        ));
    }

    #[test]
    fn section_scope_cannot_be_closed_from_inside() {
        let mut errors = ErrorLog::new();
        let mut pass = Pass::new(Mode::Save, Table::new(), &mut errors);

        assert!(pass.enter_section("server"));
        assert!(!pass.end_scope());
        assert_eq!(pass.path(), "server");

        pass.begin_scope("dangling");
        pass.leave_section();
        assert_eq!(pass.depth(), 0);

        assert!(matches!(
            errors.history(),
            [
                ConfigError::ScopeClosedEarly { scope },
                ConfigError::ScopeLeftOpen { count: 1, .. },
            ] if scope == "server"
        ));
    }

    #[test]
    fn scope_body_cannot_close_its_own_scope() {
        let mut errors = ErrorLog::new();
        let mut pass = Pass::new(Mode::Save, Table::new(), &mut errors);

        let mut x = 1i64;
        let mut y = 2i64;
        assert!(pass.enter_section("sec"));
        pass.scope("a", |pass| {
            pass.scope("b", |pass| {
                pass.scope("c", |pass| assert!(!pass.end_scope()));
                assert_eq!(pass.path(), "sec.a.b");
                pass.field("x", &mut x);
            });
            assert_eq!(pass.path(), "sec.a");
            pass.field("y", &mut y);
        });
        assert_eq!(pass.path(), "sec");
        pass.leave_section();
        assert_eq!(pass.depth(), 0);

        let tree = pass.into_tree();
        assert_eq!(tree["sec"]["a"]["b"]["x"].as_integer(), Some(1));
        assert_eq!(tree["sec"]["a"]["y"].as_integer(), Some(2));
        assert!(tree["sec"].get("y").is_none());
        assert!(matches!(
            errors.history(),
            [ConfigError::ScopeClosedEarly { scope }] if scope == "sec.a.b.c"
        ));
    }
}
