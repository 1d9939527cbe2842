#![forbid(unsafe_code)]

//! Per-entity list/edit controller.
//!
//! A controller is either idle or composing one draft. Saving validates the draft, asks the
//! national-id verifier when the entity has a CPF field, and only then writes the whole
//! collection. The verifier call is the only suspension point: state lives behind a
//! `std::sync::Mutex` that is never held across it, and a second concurrent save is
//! refused instead of queued.

use crate::clinic::Clinic;
use crate::error::ControllerError;
use crate::notice::{Notice, NoticeAction};
use crate::record_store::{CollectionSnapshot, RecordStore};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use time::OffsetDateTime;
use tokio::sync::{oneshot, watch};
use tracing::{debug, warn};
use vc_core::resolve::{GroupMember, ResolveOutcome, apply_reference, dereference_group};
use vc_core::search::{FieldFilter, search};
use vc_core::validate::{
    NationalIdVerdict, ValidationErrors, apply_national_id_verdict, digits_only, mask_input,
    normalize_date_for_edit, validate_draft,
};
use vc_core::{Draft, EntitySchema, FieldKind, FieldSource, Record, RecordId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composition {
    pub draft: Draft,
    /// Id of the record being edited; `None` for a new record.
    pub bound: Option<RecordId>,
    pub errors: ValidationErrors,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ControllerState {
    #[default]
    Idle,
    Composing(Composition),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { id: RecordId, notice: Notice },
    /// Validation failed; the draft stays open with these errors attached.
    Rejected(ValidationErrors),
    /// `cancel()` arrived while the save was waiting on verification.
    Cancelled,
}

pub struct Controller {
    clinic: Arc<Clinic>,
    store: Arc<RecordStore>,
    schema: &'static EntitySchema,
    state: Mutex<ControllerState>,
    saving: AtomicBool,
    /// Bumped whenever a draft is opened or discarded.
    session: AtomicU64,
    cancel_save: Mutex<Option<oneshot::Sender<()>>>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("entity", &self.schema.kind)
            .field("saving", &self.saving.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Clears the in-flight flag even when the save future is dropped mid-verification.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Controller {
    pub fn new(clinic: Arc<Clinic>, store: Arc<RecordStore>) -> Self {
        let schema = store.schema();
        Self {
            clinic,
            store,
            schema,
            state: Mutex::new(ControllerState::Idle),
            saving: AtomicBool::new(false),
            session: AtomicU64::new(0),
            cancel_save: Mutex::new(None),
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn state(&self) -> ControllerState {
        self.lock_state().clone()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn draft(&self) -> Option<Draft> {
        match &*self.lock_state() {
            ControllerState::Composing(composition) => Some(composition.draft.clone()),
            ControllerState::Idle => None,
        }
    }

    pub fn errors(&self) -> ValidationErrors {
        match &*self.lock_state() {
            ControllerState::Composing(composition) => composition.errors.clone(),
            ControllerState::Idle => ValidationErrors::new(),
        }
    }

    pub fn records(&self) -> Arc<Vec<Record>> {
        self.store.records()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionSnapshot> {
        self.store.subscribe()
    }

    pub fn find(&self, id: &RecordId) -> Option<Record> {
        self.store
            .records()
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    pub fn open_create(&self) {
        let now = local_now();
        self.open_create_at(now.date(), now.time());
    }

    /// Create dialog with computed defaults resolved against the given date and time.
    pub fn open_create_at(&self, today: time::Date, now: time::Time) {
        self.session.fetch_add(1, Ordering::AcqRel);
        *self.lock_state() = ControllerState::Composing(Composition {
            draft: self.schema.template(today, now),
            bound: None,
            errors: ValidationErrors::new(),
        });
    }

    pub fn open_edit(&self, id: &RecordId) -> Result<(), ControllerError> {
        let record = self.find(id).ok_or_else(|| self.unknown_record(id))?;
        let mut draft = record.to_draft();
        for field in self.schema.date_fields() {
            if let Some(value) = draft.field_text(field) {
                let normalized = normalize_date_for_edit(value);
                draft.set_text(field, normalized);
            }
        }
        self.session.fetch_add(1, Ordering::AcqRel);
        *self.lock_state() = ControllerState::Composing(Composition {
            draft,
            bound: Some(record.id().clone()),
            errors: ValidationErrors::new(),
        });
        Ok(())
    }

    /// Sets one text field. CPF, phone and postal code values are stored in their masked
    /// form. Changing a reference field also refreshes the fields projected from the
    /// referenced record; an id that resolves to nothing leaves them as they were.
    pub fn update_field(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Option<ResolveOutcome>, ControllerError> {
        let spec = self
            .schema
            .field(name)
            .ok_or_else(|| ControllerError::UnknownField {
                entity: self.schema.singular,
                field: name.to_string(),
            })?;
        if spec.kind == FieldKind::IdSet {
            return Err(ControllerError::GroupField(name.to_string()));
        }
        if self.schema.is_projected(name) {
            return Err(ControllerError::ReadOnlyField(name.to_string()));
        }
        let value: String = value.into();

        let tables = match self.schema.reference_for(name) {
            Some(reference) => {
                let mut kinds = vec![reference.source];
                kinds.extend(reference.follow.map(|follow| follow.source));
                Some((reference, self.clinic.lookup_tables(kinds)?))
            }
            None => None,
        };

        let mut state = self.lock_state();
        let ControllerState::Composing(composition) = &mut *state else {
            return Err(ControllerError::NotComposing);
        };
        composition
            .draft
            .set_text(name, mask_input(spec.kind, &value));
        let outcome = tables.map(|(reference, tables)| {
            let outcome = apply_reference(&mut composition.draft, reference, &tables);
            if outcome == ResolveOutcome::Unresolved {
                debug!(
                    entity = self.schema.kind.as_str(),
                    field = name,
                    "reference did not resolve"
                );
            }
            outcome
        });
        Ok(outcome)
    }

    /// Adds or removes `id` from the draft's member selection. Returns whether it is
    /// selected afterwards.
    pub fn toggle_member(&self, id: RecordId) -> Result<bool, ControllerError> {
        let group = self
            .schema
            .group
            .ok_or(ControllerError::NotAGroup(self.schema.singular))?;
        let mut state = self.lock_state();
        let ControllerState::Composing(composition) = &mut *state else {
            return Err(ControllerError::NotComposing);
        };
        Ok(composition.draft.toggle_member(group.field, id))
    }

    /// Members of a group record, labelled from the current target collection.
    pub fn group_members(&self, record: &Record) -> Result<Vec<GroupMember>, ControllerError> {
        let group = self
            .schema
            .group
            .ok_or(ControllerError::NotAGroup(self.schema.singular))?;
        let targets = self.clinic.store(group.target)?.records();
        Ok(dereference_group(record, &group, &targets))
    }

    pub async fn save(&self) -> Result<SaveOutcome, ControllerError> {
        if self
            .saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ControllerError::SaveInFlight);
        }
        let _guard = SavingGuard(&self.saving);

        let (draft, bound, session) = match &*self.lock_state() {
            ControllerState::Composing(composition) => (
                composition.draft.clone(),
                composition.bound.clone(),
                self.session.load(Ordering::Acquire),
            ),
            ControllerState::Idle => return Err(ControllerError::NotComposing),
        };

        let mut errors = validate_draft(self.schema, &draft);

        if let Some(field) = self.schema.national_id_field() {
            let digits = digits_only(draft.field_text(field).unwrap_or(""));
            if !errors.contains(field) && !digits.is_empty() {
                let Some(verdict) = self.verify_cancellable(&digits).await else {
                    debug!(
                        entity = self.schema.kind.as_str(),
                        "save cancelled during verification"
                    );
                    return Ok(SaveOutcome::Cancelled);
                };
                if verdict != NationalIdVerdict::Valid {
                    warn!(
                        entity = self.schema.kind.as_str(),
                        verdict = ?verdict,
                        policy = self.clinic.policy().as_str(),
                        "national id not confirmed"
                    );
                }
                apply_national_id_verdict(&mut errors, field, verdict, self.clinic.policy());
            }
        }

        let mut state = self.lock_state();
        // The draft was discarded or replaced while verification was pending.
        if self.session.load(Ordering::Acquire) != session {
            return Ok(SaveOutcome::Cancelled);
        }
        let ControllerState::Composing(composition) = &mut *state else {
            return Ok(SaveOutcome::Cancelled);
        };

        if !errors.is_empty() {
            composition.errors = errors.clone();
            return Ok(SaveOutcome::Rejected(errors));
        }

        let label = self.schema.record_label(&draft);
        let mut records = self.store.records().as_ref().clone();
        let (id, action) = match bound {
            Some(id) => {
                let position = records
                    .iter()
                    .position(|record| record.id() == &id)
                    .ok_or_else(|| self.unknown_record(&id))?;
                records[position] = Record::from_draft(id.clone(), draft);
                (id, NoticeAction::Updated)
            }
            None => {
                let id = RecordId::generate();
                records.push(Record::from_draft(id.clone(), draft));
                (id, NoticeAction::Created)
            }
        };

        self.store.save(records)?;
        *state = ControllerState::Idle;
        drop(state);

        let notice = Notice::emit(action, self.schema.singular, label);
        Ok(SaveOutcome::Saved { id, notice })
    }

    pub fn delete(&self, id: &RecordId) -> Result<Notice, ControllerError> {
        let mut records = self.store.records().as_ref().clone();
        let position = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| self.unknown_record(id))?;
        let removed = records.remove(position);
        self.store.save(records)?;
        Ok(Notice::emit(
            NoticeAction::Deleted,
            self.schema.singular,
            self.schema.record_label(&removed),
        ))
    }

    /// Discards the draft. A save waiting on verification is abandoned without writing.
    pub fn cancel(&self) {
        self.session.fetch_add(1, Ordering::AcqRel);
        *self.lock_state() = ControllerState::Idle;
        let pending = self
            .cancel_save
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(signal) = pending {
            let _ = signal.send(());
        }
    }

    pub fn search(&self, term: &str) -> Vec<Record> {
        self.search_filtered(term, None)
    }

    pub fn search_filtered(&self, term: &str, filter: Option<&FieldFilter>) -> Vec<Record> {
        let records = self.store.records();
        search(self.schema, &records, term, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// `None` when `cancel()` fired first.
    async fn verify_cancellable(&self, digits: &str) -> Option<NationalIdVerdict> {
        let (signal, cancelled) = oneshot::channel();
        *self
            .cancel_save
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(signal);

        let verifier = self.clinic.verifier();
        let verdict = tokio::select! {
            verdict = verifier.verify(digits) => Some(verdict),
            _ = cancelled => None,
        };

        self.cancel_save
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        verdict
    }

    fn unknown_record(&self, id: &RecordId) -> ControllerError {
        ControllerError::UnknownRecord {
            entity: self.schema.singular,
            id: id.to_string(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
