#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Notify;
use vc_console::{Clinic, CorruptPolicy, HttpVerifier, NationalIdVerifier};
use vc_core::validate::{NationalIdVerdict, UnavailablePolicy};
use vc_storage::SqliteStore;

pub fn temp_storage_dir(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic enough for tests")
        .as_nanos();
    path.push(format!(
        "vc-console-{label}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&path).expect("temp storage dir must be creatable");
    path
}

/// Answers every lookup with the same verdict.
pub struct FixedVerifier(pub NationalIdVerdict);

#[async_trait]
impl NationalIdVerifier for FixedVerifier {
    async fn verify(&self, _digits: &str) -> NationalIdVerdict {
        self.0
    }
}

/// Blocks each lookup until the test releases it.
#[derive(Default)]
pub struct GatedVerifier {
    pub started: Notify,
    pub release: Notify,
}

#[async_trait]
impl NationalIdVerifier for GatedVerifier {
    async fn verify(&self, _digits: &str) -> NationalIdVerdict {
        self.started.notify_one();
        self.release.notified().await;
        NationalIdVerdict::Valid
    }
}

pub fn clinic_with(
    dir: &Path,
    verifier: Arc<dyn NationalIdVerifier>,
    policy: UnavailablePolicy,
) -> Arc<Clinic> {
    let backend = SqliteStore::open(dir).expect("storage should open");
    Arc::new(Clinic::new(backend, verifier, policy, CorruptPolicy::Fail))
}

pub fn valid_clinic(label: &str) -> Arc<Clinic> {
    let dir = temp_storage_dir(label);
    clinic_with(
        &dir,
        Arc::new(FixedVerifier(NationalIdVerdict::Valid)),
        UnavailablePolicy::FailClosed,
    )
}

/// Verifier pointed at a closed local port: every lookup fails at the network layer.
pub fn unreachable_verifier() -> Arc<dyn NationalIdVerifier> {
    Arc::new(HttpVerifier::new(
        "http://127.0.0.1:9/v1/cpf",
        Duration::from_millis(500),
    ))
}

pub const TUTOR_FIELDS: &[(&str, &str)] = &[
    ("nome", "Ana"),
    ("sobrenome", "Souza"),
    ("cpf", "529.982.247-25"),
    ("dataNascimento", "1990-04-12"),
    ("telefone", "(11) 98765-4321"),
    ("rua", "Rua das Flores"),
    ("bairro", "Centro"),
    ("numero", "42"),
    ("cidade", "Campinas"),
    ("estado", "SP"),
    ("cep", "13010-000"),
    ("email", "ana@example.com"),
];
