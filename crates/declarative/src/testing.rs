//! In-memory resource used by the planner and executor tests

use crate::diagnostics::Diagnostic;
use crate::diff::AttributeChange;
use crate::resource::{Resource, Response};
use crate::schema::{Attribute, Schema};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub text: String,
    /// Read-only, bumped by the fake remote on every write
    pub revision: u32,
}

/// Notes stored by id; text comparison ignores case so the plan step has
/// something to suppress.
#[derive(Default)]
pub struct NoteResource {
    pub remote: RefCell<BTreeMap<String, Note>>,
    pub next_id: Cell<u32>,
    pub fail_writes: Cell<bool>,
    pub calls: RefCell<Vec<&'static str>>,
}

impl NoteResource {
    pub fn seed(&self, id: &str, text: &str) -> Note {
        let note = Note {
            id: id.to_string(),
            text: text.to_string(),
            revision: 1,
        };
        self.remote.borrow_mut().insert(id.to_string(), note.clone());
        note
    }

    fn write_failed<M>(&self, state: Option<M>) -> Option<Response<M>> {
        self.fail_writes
            .get()
            .then(|| Response::failed(state, Diagnostic::error("Write failed", "remote said no")))
    }
}

impl Resource for NoteResource {
    type Config = String;
    type Model = Note;

    fn type_name(&self) -> &'static str {
        "acme_note"
    }

    fn schema(&self) -> Schema {
        Schema::new("A note")
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("text", Attribute::required_string())
    }

    fn instance_id(&self, model: &Note) -> Option<String> {
        (!model.id.is_empty()).then(|| model.id.clone())
    }

    fn plan(&self, config: &String, prior: Option<&Note>) -> Note {
        match prior {
            Some(prior) if prior.text.eq_ignore_ascii_case(config) => prior.clone(),
            Some(prior) => Note {
                text: config.clone(),
                ..prior.clone()
            },
            None => Note {
                id: String::new(),
                text: config.clone(),
                revision: 0,
            },
        }
    }

    fn changes(&self, before: Option<&Note>, after: Option<&Note>) -> Vec<AttributeChange> {
        let change = AttributeChange::new(
            "text",
            before.map(|n| n.text.clone()),
            after.map(|n| n.text.clone()),
        );
        if change.is_change() { vec![change] } else { vec![] }
    }

    fn create(&self, plan: Note) -> Response<Note> {
        self.calls.borrow_mut().push("create");
        if let Some(failed) = self.write_failed(None) {
            return failed;
        }
        self.next_id.set(self.next_id.get() + 1);
        let note = Note {
            id: self.next_id.get().to_string(),
            revision: 1,
            ..plan
        };
        self.remote.borrow_mut().insert(note.id.clone(), note.clone());
        Response::ok(note)
    }

    fn read(&self, state: Note) -> Response<Note> {
        self.calls.borrow_mut().push("read");
        match self.remote.borrow().get(&state.id) {
            Some(note) => Response::ok(note.clone()),
            None => Response::failed(Some(state), Diagnostic::error("Read failed", "not found")),
        }
    }

    fn update(&self, plan: Note, prior: Note) -> Response<Note> {
        self.calls.borrow_mut().push("update");
        if let Some(failed) = self.write_failed(Some(prior)) {
            return failed;
        }
        let note = Note {
            revision: plan.revision + 1,
            ..plan
        };
        self.remote.borrow_mut().insert(note.id.clone(), note.clone());
        Response::ok(note)
    }

    fn delete(&self, state: Note) -> Response<Note> {
        self.calls.borrow_mut().push("delete");
        if let Some(failed) = self.write_failed(Some(state.clone())) {
            return failed;
        }
        self.remote.borrow_mut().remove(&state.id);
        Response::removed()
    }

    fn import_state(&self, id: &str) -> Response<Note> {
        self.calls.borrow_mut().push("import");
        Response::ok(Note {
            id: id.to_string(),
            text: String::new(),
            revision: 0,
        })
    }
}
