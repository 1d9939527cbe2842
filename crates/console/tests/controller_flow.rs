mod support;

use std::sync::Arc;
use support::*;
use time::macros::{date, time};
use vc_console::{ControllerError, ControllerState, NoticeAction, SaveOutcome};
use vc_core::resolve::ResolveOutcome;
use vc_core::search::FieldFilter;
use vc_core::validate::{NATIONAL_ID_INVALID_MESSAGE, NationalIdVerdict, UnavailablePolicy};
use vc_core::{EntityKind, FieldSource, FieldValue, Fields, Record, RecordId};

fn saved_id(outcome: SaveOutcome) -> RecordId {
    match outcome {
        SaveOutcome::Saved { id, .. } => id,
        other => panic!("expected a saved record, got {other:?}"),
    }
}

fn rejected(outcome: SaveOutcome) -> vc_core::validate::ValidationErrors {
    match outcome {
        SaveOutcome::Rejected(errors) => errors,
        other => panic!("expected a rejection, got {other:?}"),
    }
}

async fn create_tutor(clinic: &Arc<vc_console::Clinic>) -> RecordId {
    let tutors = clinic.controller(EntityKind::Tutor).expect("tutors");
    tutors.open_create();
    for (field, value) in TUTOR_FIELDS {
        tutors.update_field(field, *value).expect("tutor field");
    }
    saved_id(tutors.save().await.expect("tutor save"))
}

async fn create_pet(clinic: &Arc<vc_console::Clinic>, tutor: &RecordId, nome: &str) -> RecordId {
    let pets = clinic.controller(EntityKind::Pet).expect("pets");
    pets.open_create();
    pets.update_field("nome", nome).expect("nome");
    pets.update_field("especie", "Dog").expect("especie");
    let outcome = pets.update_field("tutor_id", tutor.as_str()).expect("tutor_id");
    assert!(matches!(outcome, Some(ResolveOutcome::Projected { .. })));
    saved_id(pets.save().await.expect("pet save"))
}

#[tokio::test]
async fn created_record_round_trips_through_storage() {
    let dir = temp_storage_dir("round-trip");
    let clinic = clinic_with(
        &dir,
        Arc::new(FixedVerifier(NationalIdVerdict::Valid)),
        UnavailablePolicy::FailClosed,
    );
    let tutor_id = create_tutor(&clinic).await;
    drop(clinic);

    let reopened = clinic_with(
        &dir,
        Arc::new(FixedVerifier(NationalIdVerdict::Valid)),
        UnavailablePolicy::FailClosed,
    );
    let tutors = reopened.controller(EntityKind::Tutor).expect("tutors");
    let record = tutors.find(&tutor_id).expect("tutor persisted");
    for (field, value) in TUTOR_FIELDS {
        assert_eq!(record.text(field), *value, "{field}");
    }
    assert_eq!(tutors.records().len(), 1);
}

#[tokio::test]
async fn create_reports_notice_and_returns_to_idle() {
    let clinic = valid_clinic("notice");
    let products = clinic.controller(EntityKind::Product).expect("products");
    let mut updates = products.subscribe();

    products.open_create_at(date!(2026 - 10 - 16), time!(9:30));
    assert_eq!(
        products.draft().expect("composing").field_text("data_ultima_reposicao"),
        Some("2026-10-16")
    );
    for (field, value) in [
        ("nome", "Seringa 5ml"),
        ("quantidade", "40"),
        ("validade", "2027-01-31"),
        ("fornecedor", "Acme"),
        ("quantidade_minima", "10"),
    ] {
        products.update_field(field, value).expect("field");
    }
    let SaveOutcome::Saved { notice, .. } = products.save().await.expect("save") else {
        panic!("product should save");
    };
    assert_eq!(notice.action, NoticeAction::Created);
    assert_eq!(notice.to_string(), "Product \"Seringa 5ml\" created.");
    assert_eq!(products.state(), ControllerState::Idle);

    assert!(updates.has_changed().expect("sender alive"));
    assert_eq!(updates.borrow_and_update().records.len(), 1);
}

#[tokio::test]
async fn edit_without_changes_is_idempotent() {
    let clinic = valid_clinic("idempotent");
    let tutor_id = create_tutor(&clinic).await;
    let pet_id = create_pet(&clinic, &tutor_id, "Rex").await;

    let pets = clinic.controller(EntityKind::Pet).expect("pets");
    let before = pets.records();
    pets.open_edit(&pet_id).expect("edit");
    let outcome = pets.save().await.expect("save");
    let SaveOutcome::Saved { id, notice } = outcome else {
        panic!("unchanged edit should save");
    };
    assert_eq!(id, pet_id);
    assert_eq!(notice.action, NoticeAction::Updated);
    assert_eq!(pets.records(), before);
}

#[tokio::test]
async fn edit_replaces_the_record_in_place() {
    let clinic = valid_clinic("edit-in-place");
    let tutor_id = create_tutor(&clinic).await;
    let rex = create_pet(&clinic, &tutor_id, "Rex").await;
    let mia = create_pet(&clinic, &tutor_id, "Mia").await;
    let bolt = create_pet(&clinic, &tutor_id, "Bolt").await;

    let pets = clinic.controller(EntityKind::Pet).expect("pets");
    let before = pets.records();
    pets.open_edit(&mia).expect("edit");
    pets.update_field("raca", "Siamese").expect("raca");
    let id = saved_id(pets.save().await.expect("save"));
    assert_eq!(id, mia);

    let after = pets.records();
    let order = after
        .iter()
        .map(|record| record.id().clone())
        .collect::<Vec<_>>();
    assert_eq!(order, vec![rex, mia.clone(), bolt]);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);

    assert_eq!(after[1].text("raca"), "Siamese");
    let mut expected = before[1].fields().clone();
    expected.insert("raca".to_string(), FieldValue::text("Siamese"));
    assert_eq!(after[1].fields(), &expected);
}

#[tokio::test]
async fn masked_fields_store_their_canonical_form() {
    let clinic = valid_clinic("masks");
    let tutors = clinic.controller(EntityKind::Tutor).expect("tutors");
    tutors.open_create();
    for (field, value) in TUTOR_FIELDS {
        tutors.update_field(field, *value).expect("tutor field");
    }
    tutors.update_field("cpf", "52998224725").expect("cpf");
    tutors.update_field("telefone", "11 3456 7890").expect("telefone");
    tutors.update_field("cep", "13010000").expect("cep");
    tutors.update_field("email", "Ana@Example.com").expect("email");

    let draft = tutors.draft().expect("composing");
    assert_eq!(draft.field_text("cpf"), Some("529.982.247-25"));
    assert_eq!(draft.field_text("telefone"), Some("(11) 3456-7890"));
    assert_eq!(draft.field_text("cep"), Some("13010-000"));
    assert_eq!(draft.field_text("email"), Some("Ana@Example.com"));

    let id = saved_id(tutors.save().await.expect("save"));
    let stored = tutors.find(&id).expect("stored");
    assert_eq!(stored.text("cpf"), "529.982.247-25");
    assert_eq!(
        tutors
            .search("529.982")
            .iter()
            .map(|record| record.id().clone())
            .collect::<Vec<_>>(),
        vec![id]
    );
}

#[tokio::test]
async fn edit_normalizes_stored_timestamps() {
    let clinic = valid_clinic("normalize");
    let store = clinic.store(EntityKind::Transaction).expect("transactions");
    let mut fields = Fields::new();
    for (name, value) in [
        ("descricao", "Consulta"),
        ("valor", "120"),
        ("data", "2026-03-04T15:20:00.000Z"),
        ("tipo", "receita"),
        ("categoria", "Servicos"),
        ("status", "pago"),
    ] {
        fields.insert(name.to_string(), FieldValue::text(value));
    }
    let id = RecordId::try_new("t-1").expect("id");
    store
        .save(vec![Record::new(id.clone(), fields)])
        .expect("seed");

    let transactions = clinic.controller(EntityKind::Transaction).expect("transactions");
    transactions.open_edit(&id).expect("edit");
    assert_eq!(
        transactions.draft().expect("composing").field_text("data"),
        Some("2026-03-04")
    );
    assert!(matches!(
        transactions.open_edit(&RecordId::try_new("nope").expect("id")),
        Err(ControllerError::UnknownRecord { .. })
    ));
}

#[tokio::test]
async fn delete_removes_exactly_one_record() {
    let clinic = valid_clinic("delete");
    let tutor_id = create_tutor(&clinic).await;
    let rex = create_pet(&clinic, &tutor_id, "Rex").await;
    let mia = create_pet(&clinic, &tutor_id, "Mia").await;
    let bolt = create_pet(&clinic, &tutor_id, "Bolt").await;

    let pets = clinic.controller(EntityKind::Pet).expect("pets");
    let notice = pets.delete(&mia).expect("delete");
    assert_eq!(notice.action, NoticeAction::Deleted);
    assert_eq!(notice.record, "Mia");

    let remaining = pets
        .records()
        .iter()
        .map(|record| record.id().clone())
        .collect::<Vec<_>>();
    assert_eq!(remaining, vec![rex, bolt]);
    assert!(matches!(
        pets.delete(&mia),
        Err(ControllerError::UnknownRecord { .. })
    ));
}

#[tokio::test]
async fn search_and_filter_select_matching_records() {
    let clinic = valid_clinic("filter");
    let tutor_id = create_tutor(&clinic).await;
    create_pet(&clinic, &tutor_id, "Rex").await;
    create_pet(&clinic, &tutor_id, "Rexona").await;
    create_pet(&clinic, &tutor_id, "Bolt").await;

    let pets = clinic.controller(EntityKind::Pet).expect("pets");
    let names = |records: Vec<Record>| {
        records
            .iter()
            .map(|record| record.text("nome").to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(pets.search("rEx")), ["Rex", "Rexona"]);
    assert_eq!(names(pets.search("")).len(), 3);
    assert_eq!(names(pets.search("souza")).len(), 3);

    let filter = FieldFilter::new("nome", "Bolt");
    assert_eq!(names(pets.search_filtered("dog", Some(&filter))), ["Bolt"]);
}

#[tokio::test]
async fn invalid_draft_reports_every_failing_field_and_stays_open() {
    let clinic = valid_clinic("validation");
    let tutors = clinic.controller(EntityKind::Tutor).expect("tutors");
    tutors.open_create();
    for (field, value) in TUTOR_FIELDS {
        tutors.update_field(field, *value).expect("field");
    }
    tutors.update_field("email", "not-an-email").expect("email");
    tutors.update_field("cep", "123").expect("cep");
    tutors.update_field("bairro", " ").expect("bairro");

    let errors = rejected(tutors.save().await.expect("save"));
    assert_eq!(errors.len(), 3);
    assert!(errors.contains("email"));
    assert!(errors.contains("cep"));
    assert!(errors.contains("bairro"));
    assert_eq!(tutors.errors(), errors);
    assert!(matches!(tutors.state(), ControllerState::Composing(_)));
    assert!(tutors.records().is_empty());
}

#[tokio::test]
async fn pet_reference_fills_dependent_fields_read_only() {
    let clinic = valid_clinic("rex");
    let tutor_id = create_tutor(&clinic).await;
    let pet_id = create_pet(&clinic, &tutor_id, "Rex").await;

    let surgeries = clinic.controller(EntityKind::Surgery).expect("surgeries");
    surgeries.open_create();
    surgeries
        .update_field("pet_id", pet_id.as_str())
        .expect("select pet");
    let draft = surgeries.draft().expect("composing");
    assert_eq!(draft.field_text("animal"), Some("Rex"));
    assert_eq!(draft.field_text("especie"), Some("Dog"));
    assert_eq!(draft.field_text("tutor"), Some("Ana Souza"));

    for field in ["especie", "tutor"] {
        assert!(matches!(
            surgeries.update_field(field, "Cat"),
            Err(ControllerError::ReadOnlyField(name)) if name == field
        ));
    }
}

#[tokio::test]
async fn pet_seeded_with_plain_tutor_name_projects_it() {
    let clinic = valid_clinic("rex-seeded");
    let mut fields = Fields::new();
    fields.insert("nome".to_string(), FieldValue::text("Rex"));
    fields.insert("especie".to_string(), FieldValue::text("Dog"));
    fields.insert("tutor".to_string(), FieldValue::text("Ana"));
    let pet_id = RecordId::try_new("1715870000000").expect("id");
    clinic
        .store(EntityKind::Pet)
        .expect("pets")
        .save(vec![Record::new(pet_id.clone(), fields)])
        .expect("seed pet");

    let surgeries = clinic.controller(EntityKind::Surgery).expect("surgeries");
    surgeries.open_create();
    surgeries.update_field("pet_id", "1715870000000").expect("select");
    let draft = surgeries.draft().expect("composing");
    assert_eq!(draft.field_text("especie"), Some("Dog"));
    assert_eq!(draft.field_text("tutor"), Some("Ana"));
}

#[tokio::test]
async fn projection_is_a_copy_not_a_live_link() {
    let clinic = valid_clinic("no-retro");
    let tutor_id = create_tutor(&clinic).await;
    let pet_id = create_pet(&clinic, &tutor_id, "Rex").await;

    let exams = clinic.controller(EntityKind::VetExam).expect("exams");
    exams.open_create();
    exams.update_field("pet_id", pet_id.as_str()).expect("pet");
    for (field, value) in [
        ("tipo_exame", "Hemograma"),
        ("veterinario_solicitante", "Dra. Lima"),
        ("resultados", "Normal"),
    ] {
        exams.update_field(field, value).expect("field");
    }
    let exam_id = saved_id(exams.save().await.expect("exam save"));

    let pets = clinic.controller(EntityKind::Pet).expect("pets");
    pets.open_edit(&pet_id).expect("edit pet");
    pets.update_field("nome", "Max").expect("rename");
    saved_id(pets.save().await.expect("pet save"));

    let exam = exams.find(&exam_id).expect("exam");
    assert_eq!(exam.text("animal"), "Rex");
}

#[tokio::test]
async fn unresolved_reference_keeps_dependents() {
    let clinic = valid_clinic("unresolved");
    let surgeries = clinic.controller(EntityKind::Surgery).expect("surgeries");
    surgeries.open_create();
    let outcome = surgeries.update_field("pet_id", "ghost").expect("select");
    assert_eq!(outcome, Some(ResolveOutcome::Unresolved));
    let draft = surgeries.draft().expect("composing");
    assert_eq!(draft.field_text("pet_id"), Some("ghost"));
    assert_eq!(draft.field_text("animal"), Some(""));
}

#[tokio::test]
async fn national_id_network_failure_rejects_by_default() {
    let dir = temp_storage_dir("fail-closed");
    let clinic = clinic_with(&dir, unreachable_verifier(), UnavailablePolicy::FailClosed);
    let tutors = clinic.controller(EntityKind::Tutor).expect("tutors");
    tutors.open_create();
    for (field, value) in TUTOR_FIELDS {
        tutors.update_field(field, *value).expect("field");
    }

    let errors = rejected(tutors.save().await.expect("save"));
    assert_eq!(errors.get("cpf"), Some(NATIONAL_ID_INVALID_MESSAGE));
    assert_eq!(errors.len(), 1);
    assert!(tutors.records().is_empty());
}

#[tokio::test]
async fn fail_open_policy_accepts_unconfirmed_national_id() {
    let dir = temp_storage_dir("fail-open");
    let clinic = clinic_with(
        &dir,
        Arc::new(FixedVerifier(NationalIdVerdict::Unknown)),
        UnavailablePolicy::FailOpen,
    );
    create_tutor(&clinic).await;
    assert_eq!(
        clinic
            .controller(EntityKind::Tutor)
            .expect("tutors")
            .records()
            .len(),
        1
    );

    let strict = clinic_with(
        &temp_storage_dir("fail-open-invalid"),
        Arc::new(FixedVerifier(NationalIdVerdict::Invalid)),
        UnavailablePolicy::FailOpen,
    );
    let tutors = strict.controller(EntityKind::Tutor).expect("tutors");
    tutors.open_create();
    for (field, value) in TUTOR_FIELDS {
        tutors.update_field(field, *value).expect("field");
    }
    let errors = rejected(tutors.save().await.expect("save"));
    assert!(errors.contains("cpf"));
}

#[tokio::test]
async fn group_record_requires_a_member() {
    let clinic = valid_clinic("group-min");
    let stocks = clinic.controller(EntityKind::Stock).expect("stocks");
    stocks.open_create();
    stocks.update_field("nome_estoque", "Farmacia").expect("name");

    let errors = rejected(stocks.save().await.expect("save"));
    assert_eq!(
        errors.get("produtos"),
        Some("Select at least one product for the stock.")
    );
    assert!(stocks.records().is_empty());

    let product = RecordId::try_new("p-1").expect("id");
    assert!(stocks.toggle_member(product.clone()).expect("toggle"));
    assert!(matches!(
        stocks.update_field("produtos_ids", "p-1"),
        Err(ControllerError::GroupField(_))
    ));
    let id = saved_id(stocks.save().await.expect("save"));

    let record = stocks.find(&id).expect("stock");
    let members = stocks.group_members(&record).expect("members");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, product);
    assert_eq!(members[0].label, None);

    let pets = clinic.controller(EntityKind::Pet).expect("pets");
    pets.open_create();
    assert!(matches!(
        pets.toggle_member(product),
        Err(ControllerError::NotAGroup(_))
    ));
}

#[tokio::test]
async fn second_save_while_verifying_is_refused() {
    let dir = temp_storage_dir("in-flight");
    let verifier = Arc::new(GatedVerifier::default());
    let clinic = clinic_with(&dir, verifier.clone(), UnavailablePolicy::FailClosed);
    let tutors = Arc::new(clinic.controller(EntityKind::Tutor).expect("tutors"));
    tutors.open_create();
    for (field, value) in TUTOR_FIELDS {
        tutors.update_field(field, *value).expect("field");
    }

    let first = tokio::spawn({
        let tutors = Arc::clone(&tutors);
        async move { tutors.save().await }
    });
    verifier.started.notified().await;
    assert!(tutors.is_saving());
    assert!(matches!(
        tutors.save().await,
        Err(ControllerError::SaveInFlight)
    ));

    verifier.release.notify_one();
    let outcome = first.await.expect("join").expect("save");
    saved_id(outcome);
    assert!(!tutors.is_saving());
    assert_eq!(tutors.records().len(), 1);
}

#[tokio::test]
async fn cancel_during_verification_persists_nothing() {
    let dir = temp_storage_dir("cancel");
    let verifier = Arc::new(GatedVerifier::default());
    let clinic = clinic_with(&dir, verifier.clone(), UnavailablePolicy::FailClosed);
    let tutors = Arc::new(clinic.controller(EntityKind::Tutor).expect("tutors"));
    tutors.open_create();
    for (field, value) in TUTOR_FIELDS {
        tutors.update_field(field, *value).expect("field");
    }

    let pending = tokio::spawn({
        let tutors = Arc::clone(&tutors);
        async move { tutors.save().await }
    });
    verifier.started.notified().await;
    tutors.cancel();

    let outcome = pending.await.expect("join").expect("save");
    assert_eq!(outcome, SaveOutcome::Cancelled);
    assert_eq!(tutors.state(), ControllerState::Idle);
    assert!(!tutors.is_saving());
    assert!(tutors.records().is_empty());
    assert!(matches!(tutors.save().await, Err(ControllerError::NotComposing)));
}

#[tokio::test]
async fn clear_all_empties_open_collections() {
    let clinic = valid_clinic("clear");
    let tutor_id = create_tutor(&clinic).await;
    create_pet(&clinic, &tutor_id, "Rex").await;

    let pets = clinic.controller(EntityKind::Pet).expect("pets");
    let mut updates = pets.subscribe();
    assert_eq!(clinic.clear_all().expect("clear"), 2);
    assert!(updates.has_changed().expect("sender alive"));
    assert!(pets.records().is_empty());
    assert!(
        clinic
            .controller(EntityKind::Tutor)
            .expect("tutors")
            .records()
            .is_empty()
    );
}

#[tokio::test]
async fn unknown_field_is_rejected() {
    let clinic = valid_clinic("unknown-field");
    let pets = clinic.controller(EntityKind::Pet).expect("pets");
    assert!(matches!(
        pets.update_field("nome", "Rex"),
        Err(ControllerError::NotComposing)
    ));
    pets.open_create();
    assert!(matches!(
        pets.update_field("cor", "preto"),
        Err(ControllerError::UnknownField { .. })
    ));
    pets.cancel();
    assert_eq!(pets.state(), ControllerState::Idle);
}
