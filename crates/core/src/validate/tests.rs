use super::*;
use crate::catalog::{PRODUCTS, STOCKS, TRANSACTIONS, TUTORS};
use crate::ids::RecordId;
use crate::record::Draft;

fn tutor_draft() -> Draft {
    let mut draft = Draft::new();
    for (name, value) in [
        ("nome", "Ana"),
        ("sobrenome", "Souza"),
        ("cpf", "529.982.247-25"),
        ("dataNascimento", "1990-04-12"),
        ("telefone", "(11) 98765-4321"),
        ("rua", "Rua das Flores"),
        ("bairro", "Centro"),
        ("numero", "42"),
        ("complemento", ""),
        ("cidade", "Campinas"),
        ("estado", "SP"),
        ("cep", "13010-000"),
        ("email", "ana@example.com"),
    ] {
        draft.set_text(name, value);
    }
    draft
}

#[test]
fn complete_tutor_passes_sync_checks() {
    let errors = validate_draft(&TUTORS, &tutor_draft());
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn every_blank_required_field_is_reported() {
    let mut draft = tutor_draft();
    draft.set_text("nome", "   ");
    draft.set_text("cidade", "");
    let errors = validate_draft(&TUTORS, &draft);
    assert_eq!(errors.get("nome"), Some(REQUIRED_MESSAGE));
    assert_eq!(errors.get("cidade"), Some(REQUIRED_MESSAGE));
    assert!(!errors.contains("complemento"));
    assert_eq!(errors.len(), 2);
}

#[test]
fn typed_checks_only_fire_on_non_empty_values() {
    let mut draft = tutor_draft();
    draft.set_text("nome", "Ana2");
    draft.set_text("telefone", "12345");
    draft.set_text("cep", "1301-000");
    draft.set_text("email", "ana@example");
    draft.set_text("dataNascimento", "12/04/1990");
    draft.set_text("cpf", "111.111.111-11");
    let errors = validate_draft(&TUTORS, &draft);
    assert_eq!(errors.get("nome"), Some("Must not contain digits."));
    assert_eq!(errors.get("telefone"), Some("Phone number is invalid."));
    assert_eq!(errors.get("cep"), Some("Postal code (CEP) is invalid."));
    assert_eq!(errors.get("email"), Some("Email is invalid."));
    assert_eq!(errors.get("dataNascimento"), Some("Must be a date (YYYY-MM-DD)."));
    assert_eq!(errors.get("cpf"), Some(NATIONAL_ID_INVALID_MESSAGE));
}

#[test]
fn numeric_and_choice_fields() {
    let mut draft = Draft::new();
    draft.set_text("descricao", "Consulta");
    draft.set_text("valor", "12,50");
    draft.set_text("data", "2026-10-16");
    draft.set_text("tipo", "doacao");
    draft.set_text("categoria", "Servicos");
    draft.set_text("status", "pago");
    let errors = validate_draft(&TRANSACTIONS, &draft);
    assert_eq!(errors.get("valor"), Some("Must be a number."));
    assert_eq!(errors.get("tipo"), Some("Must be one of: receita, despesa."));
    assert_eq!(errors.len(), 2);

    let mut product = Draft::new();
    product.set_text("nome", "Seringa");
    product.set_text("quantidade", "3.5");
    product.set_text("validade", "2027-01-01");
    product.set_text("fornecedor", "Acme");
    product.set_text("quantidade_minima", " 10 ");
    let errors = validate_draft(&PRODUCTS, &product);
    assert_eq!(errors.get("quantidade"), Some("Must be a whole number."));
    assert!(!errors.contains("quantidade_minima"));
}

#[test]
fn group_minimum_selection() {
    let mut draft = Draft::new();
    draft.set_text("nome_estoque", "Farmacia");
    let errors = validate_draft(&STOCKS, &draft);
    assert_eq!(
        errors.get("produtos"),
        Some("Select at least one product for the stock.")
    );

    draft.toggle_member("produtos_ids", RecordId::try_new("p1").unwrap());
    assert!(validate_draft(&STOCKS, &draft).is_empty());
}

#[test]
fn national_id_format() {
    assert!(national_id_format_ok("529.982.247-25"));
    assert!(national_id_format_ok("52998224725"));
    assert!(!national_id_format_ok("5299822472"));
    assert!(!national_id_format_ok("000.000.000-00"));
}

#[test]
fn verdict_policy() {
    let mut errors = ValidationErrors::new();
    apply_national_id_verdict(
        &mut errors,
        "cpf",
        NationalIdVerdict::Unknown,
        UnavailablePolicy::FailClosed,
    );
    assert_eq!(errors.get("cpf"), Some(NATIONAL_ID_INVALID_MESSAGE));

    let mut errors = ValidationErrors::new();
    apply_national_id_verdict(
        &mut errors,
        "cpf",
        NationalIdVerdict::Unknown,
        UnavailablePolicy::FailOpen,
    );
    assert!(errors.is_empty());
    assert!(!NationalIdVerdict::Invalid.accepted_under(UnavailablePolicy::FailOpen));
    assert_eq!(UnavailablePolicy::default(), UnavailablePolicy::FailClosed);
    assert_eq!(
        UnavailablePolicy::parse(" Fail-Open "),
        Some(UnavailablePolicy::FailOpen)
    );
    assert_eq!(UnavailablePolicy::parse("maybe"), None);
}

#[test]
fn edit_dates_are_normalized() {
    assert_eq!(normalize_date_for_edit("2026-10-16"), "2026-10-16");
    assert_eq!(
        normalize_date_for_edit("2026-10-16T13:45:00.000Z"),
        "2026-10-16"
    );
    assert_eq!(normalize_date_for_edit("2026-10-16T08:30"), "2026-10-16");
    assert_eq!(normalize_date_for_edit(""), "");
    assert_eq!(normalize_date_for_edit("soon"), "soon");
}

#[test]
fn masks_canonicalize_typed_documents_and_numbers() {
    assert_eq!(mask_national_id("52998224725"), "529.982.247-25");
    assert_eq!(mask_national_id("529.982.247-25"), "529.982.247-25");
    assert_eq!(mask_national_id("5299"), "529.9");
    assert_eq!(mask_national_id("5299822"), "529.982.2");
    assert_eq!(mask_national_id("1234567890123"), "1234567890123");

    assert_eq!(mask_phone("11987654321"), "(11) 98765-4321");
    assert_eq!(mask_phone("1134567890"), "(11) 3456-7890");
    assert_eq!(mask_phone("(11) 98765-4321"), "(11) 98765-4321");
    assert_eq!(mask_phone("12345"), "12345");

    assert_eq!(mask_postal_code("13010000"), "13010-000");
    assert_eq!(mask_postal_code("13010-000"), "13010-000");
    assert_eq!(mask_postal_code("1301"), "1301");

    assert_eq!(mask_input(FieldKind::Email, " Ana@Example.com"), " Ana@Example.com");
    assert_eq!(mask_input(FieldKind::PostalCode, "13010 000"), "13010-000");
}
