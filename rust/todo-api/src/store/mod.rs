//! In-memory todo store.
//!
//! The store is a cheap-to-clone handle around a single locked collection.
//! Reads share the lock; every mutation takes it exclusively, so concurrent
//! requests never lose updates. Records are kept in insertion order and looked
//! up with a linear scan.

pub mod seed;

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::domain::{NewTodo, Todo, TodoId, TodoPatch};

pub use seed::{SeedDocument, SeedError, SeedOutcome, SeedReport, SeedTodo};

/// How `create` treats missing or blank content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatePolicy {
    /// Reject content that is missing or blank after trimming.
    #[default]
    Strict,
    /// Store missing content as an empty string.
    Permissive,
}

impl std::fmt::Display for CreatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Permissive => write!(f, "permissive"),
        }
    }
}

/// Store operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A required field was missing or blank.
    #[error("{field} is required")]
    Validation {
        /// Field name as sent by the client.
        field: &'static str,
    },
    /// No todo with this id exists.
    #[error("todo {0} not found")]
    NotFound(TodoId),
    /// Every id up to `u64::MAX` has been handed out.
    #[error("no todo ids left to assign")]
    IdsExhausted,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

struct Inner {
    todos: Vec<Todo>,
    /// `None` once the id space is used up.
    next_id: Option<TodoId>,
}

impl Inner {
    fn position(&self, id: TodoId) -> StoreResult<usize> {
        self.todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn allocate_id(&mut self) -> StoreResult<TodoId> {
        let id = self.next_id.ok_or(StoreError::IdsExhausted)?;
        self.next_id = id.next();
        Ok(id)
    }
}

/// Shared handle to the todo collection.
#[derive(Clone)]
pub struct TodoStore {
    inner: Arc<RwLock<Inner>>,
    policy: CreatePolicy,
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("TodoStore")
            .field("len", &inner.todos.len())
            .field("next_id", &inner.next_id)
            .field("policy", &self.policy)
            .finish()
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new(CreatePolicy::default())
    }
}

impl TodoStore {
    /// Create an empty store. Ids start at 1.
    pub fn new(policy: CreatePolicy) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                todos: Vec::new(),
                next_id: Some(TodoId(1)),
            })),
            policy,
        }
    }

    /// Number of stored todos.
    pub fn len(&self) -> usize {
        self.inner.read().todos.len()
    }

    /// Whether the store holds no todos.
    pub fn is_empty(&self) -> bool {
        self.inner.read().todos.is_empty()
    }

    /// Append a new todo with a fresh id and `done = false`.
    pub fn create(&self, input: NewTodo) -> StoreResult<Todo> {
        let text = match (self.policy, input.content()) {
            (CreatePolicy::Strict, Some(text)) if !text.trim().is_empty() => text.to_string(),
            (CreatePolicy::Strict, _) => {
                return Err(StoreError::Validation {
                    field: input.field_name(),
                });
            }
            (CreatePolicy::Permissive, text) => text.unwrap_or_default().to_string(),
        };

        let mut inner = self.inner.write();
        let id = inner.allocate_id()?;
        let todo = Todo::new(id, text);
        inner.todos.push(todo.clone());
        tracing::debug!(todo_id = %id, "Todo created");
        Ok(todo)
    }

    /// All todos in insertion order.
    pub fn list(&self) -> Vec<Todo> {
        self.inner.read().todos.clone()
    }

    /// Fetch one todo.
    pub fn get(&self, id: TodoId) -> StoreResult<Todo> {
        let inner = self.inner.read();
        let idx = inner.position(id)?;
        Ok(inner.todos[idx].clone())
    }

    /// Merge the provided fields into an existing todo.
    pub fn update(&self, id: TodoId, patch: TodoPatch) -> StoreResult<Todo> {
        let mut inner = self.inner.write();
        let idx = inner.position(id)?;
        let todo = &mut inner.todos[idx];
        todo.apply(patch);
        tracing::debug!(todo_id = %id, "Todo updated");
        Ok(todo.clone())
    }

    /// Flip the completion flag of an existing todo.
    pub fn toggle(&self, id: TodoId) -> StoreResult<Todo> {
        let mut inner = self.inner.write();
        let idx = inner.position(id)?;
        let todo = &mut inner.todos[idx];
        todo.toggle();
        tracing::debug!(todo_id = %id, done = todo.done, "Todo toggled");
        Ok(todo.clone())
    }

    /// Remove a todo permanently, returning it.
    pub fn delete(&self, id: TodoId) -> StoreResult<Todo> {
        let mut inner = self.inner.write();
        let idx = inner.position(id)?;
        let removed = inner.todos.remove(idx);
        tracing::debug!(todo_id = %id, "Todo deleted");
        Ok(removed)
    }

    /// Bulk-insert seed records, preserving their order.
    ///
    /// Records carrying an id keep it unless it is already taken, in which
    /// case they are skipped. Records without an id get one above every seeded
    /// id, so later creates can never collide. `u64::MAX` is never accepted
    /// from a seed file since no id could follow it.
    pub fn seed(&self, records: Vec<SeedTodo>) -> SeedReport {
        let mut inner = self.inner.write();

        let after_max = records.iter().filter_map(|r| r.id?.next()).max();
        if let (Some(after_max), Some(next_id)) = (after_max, inner.next_id) {
            if after_max > next_id {
                inner.next_id = Some(after_max);
            }
        }

        let mut report = SeedReport::default();
        for record in records {
            let id = match record.id {
                Some(id) if id.next().is_none() => {
                    tracing::warn!(todo_id = %id, "Skipping seed record with out-of-range id");
                    report.skipped += 1;
                    continue;
                }
                Some(id) if inner.todos.iter().any(|t| t.id == id) => {
                    tracing::warn!(todo_id = %id, "Skipping seed record with duplicate id");
                    report.skipped += 1;
                    continue;
                }
                Some(id) => id,
                None => match inner.allocate_id() {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping seed record without id");
                        report.skipped += 1;
                        continue;
                    }
                },
            };
            inner.todos.push(Todo {
                id,
                text: record.text,
                done: record.done,
            });
            report.loaded += 1;
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_record(id: Option<u64>, text: &str) -> SeedTodo {
        SeedTodo {
            id: id.map(TodoId),
            text: text.to_string(),
            done: false,
        }
    }

    #[test]
    fn test_create_assigns_unique_increasing_ids() {
        let store = TodoStore::default();
        let a = store.create(NewTodo::text("a")).unwrap();
        let b = store.create(NewTodo::text("b")).unwrap();
        let c = store.create(NewTodo::title("c")).unwrap();
        assert_eq!(a.id, TodoId(1));
        assert_eq!(b.id, TodoId(2));
        assert_eq!(c.id, TodoId(3));
        assert!(!c.done);
        assert_eq!(c.text, "c");
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let store = TodoStore::default();
        let a = store.create(NewTodo::text("a")).unwrap();
        store.delete(a.id).unwrap();
        let b = store.create(NewTodo::text("b")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_strict_policy_rejects_blank_content() {
        let store = TodoStore::new(CreatePolicy::Strict);
        assert_eq!(
            store.create(NewTodo::title("   ")),
            Err(StoreError::Validation { field: "title" })
        );
        assert_eq!(
            store.create(NewTodo::default()),
            Err(StoreError::Validation { field: "text" })
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_permissive_policy_accepts_missing_content() {
        let store = TodoStore::new(CreatePolicy::Permissive);
        let todo = store.create(NewTodo::default()).unwrap();
        assert_eq!(todo.text, "");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let store = TodoStore::default();
        for text in ["first", "second", "third"] {
            store.create(NewTodo::text(text)).unwrap();
        }
        let second = store.list()[1].id;
        store.toggle(second).unwrap();

        let texts: Vec<_> = store.list().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, ["first", "second", "third"]);
        assert_eq!(store.list(), store.list());
    }

    #[test]
    fn test_update_merges_and_keeps_id() {
        let store = TodoStore::default();
        let todo = store.create(NewTodo::text("draft")).unwrap();
        let updated = store
            .update(
                todo.id,
                TodoPatch {
                    text: None,
                    done: Some(true),
                },
            )
            .unwrap();
        assert_eq!(updated.id, todo.id);
        assert_eq!(updated.text, "draft");
        assert!(updated.done);
        assert_eq!(store.get(todo.id).unwrap(), updated);
    }

    #[test]
    fn test_missing_id_is_not_found_everywhere() {
        let store = TodoStore::default();
        let missing = TodoId(404);
        assert_eq!(store.get(missing), Err(StoreError::NotFound(missing)));
        assert_eq!(
            store.update(missing, TodoPatch::default()),
            Err(StoreError::NotFound(missing))
        );
        assert_eq!(store.toggle(missing), Err(StoreError::NotFound(missing)));
        assert_eq!(store.delete(missing), Err(StoreError::NotFound(missing)));
    }

    #[test]
    fn test_delete_is_final() {
        let store = TodoStore::default();
        let todo = store.create(NewTodo::text("gone")).unwrap();
        assert_eq!(store.delete(todo.id).unwrap(), todo);
        assert!(store.get(todo.id).is_err());
        assert_eq!(store.delete(todo.id), Err(StoreError::NotFound(todo.id)));
    }

    #[test]
    fn test_seed_skips_duplicate_ids_and_advances_counter() {
        let store = TodoStore::default();
        let report = store.seed(vec![
            seed_record(None, "no id"),
            seed_record(Some(5), "five"),
            seed_record(Some(5), "dup"),
            seed_record(Some(2), "two"),
        ]);
        assert_eq!(report, SeedReport { loaded: 3, skipped: 1 });

        let ids: Vec<_> = store.list().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, [TodoId(6), TodoId(5), TodoId(2)]);

        let next = store.create(NewTodo::text("after seed")).unwrap();
        assert_eq!(next.id, TodoId(7));
    }

    #[test]
    fn test_seed_rejects_max_id_and_keeps_ids_unique() {
        let store = TodoStore::default();
        let report = store.seed(vec![
            seed_record(Some(1), "one"),
            seed_record(Some(u64::MAX), "overflow"),
        ]);
        assert_eq!(report, SeedReport { loaded: 1, skipped: 1 });

        let a = store.create(NewTodo::text("a")).unwrap();
        let b = store.create(NewTodo::text("b")).unwrap();
        assert_eq!(a.id, TodoId(2));
        assert_eq!(b.id, TodoId(3));

        let mut ids: Vec<_> = store.list().into_iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn test_create_fails_once_ids_run_out() {
        let store = TodoStore::default();
        let report = store.seed(vec![
            seed_record(Some(u64::MAX - 1), "last seeded"),
            seed_record(None, "takes the final id"),
            seed_record(None, "nothing left"),
        ]);
        assert_eq!(report, SeedReport { loaded: 2, skipped: 1 });
        assert_eq!(store.list()[1].id, TodoId(u64::MAX));

        assert_eq!(
            store.create(NewTodo::text("too many")),
            Err(StoreError::IdsExhausted)
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_concurrent_creates_never_share_ids() {
        let store = TodoStore::default();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .map(|i| store.create(NewTodo::text(format!("t{i}"))).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 400);
        assert_eq!(store.len(), 400);
    }
}
