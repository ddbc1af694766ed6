#![cfg(test)]
use std::sync::Arc;

use cvm_proxy_common::error::{InvalidInputKind, NotFoundKind, ResolveError, UpstreamError};
use cvm_proxy_common::models::{RegistrationDetail, ResolvedRegulation};
use cvm_proxy_integration_tests::{
    Call, FailAt, FakeRegistry, SAMPLE_CNPJ, SAMPLE_DIGITS, document, service, summary,
};

/// Full run: punctuated identifier in, the active and dated document written
/// under `<download_dir>/<digits>/`.
#[tokio::test]
async fn resolves_active_dated_document() {
    let dir = tempfile::tempdir().unwrap();
    let registry: Arc<FakeRegistry> = Arc::new(FakeRegistry::happy_path());

    let resolved: ResolvedRegulation = service(registry.clone(), dir.path())
        .resolve(Some(SAMPLE_CNPJ))
        .await
        .unwrap();

    assert_eq!(resolved.cnpj.as_str(), SAMPLE_DIGITS);
    assert_eq!(resolved.registration_id, 77);
    assert_eq!(resolved.document_id, 3);
    assert_eq!(resolved.effective_date.as_deref(), Some("2021-01-01"));
    assert_eq!(resolved.stored.file_name, "vigente.pdf");

    let expected = dir.path().join(SAMPLE_DIGITS).join("vigente.pdf");
    assert_eq!(std::fs::read(&expected).unwrap(), b"%PDF-1.7");

    assert_eq!(
        registry.calls(),
        vec![
            Call::Search(SAMPLE_DIGITS.to_string()),
            Call::Registration(10),
            Call::Documents(77),
            Call::Download(77, "vigente.pdf".to_string()),
        ]
    );
}

#[tokio::test]
async fn content_disposition_name_wins_over_document_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut fake = FakeRegistry::happy_path();
    fake.artifact.content_disposition = Some("attachment; filename=\"Regulamento 2021.pdf\"".to_string());
    let registry: Arc<FakeRegistry> = Arc::new(fake);

    let resolved = service(registry.clone(), dir.path())
        .resolve(Some(SAMPLE_CNPJ))
        .await
        .unwrap();

    // the download request still uses the document's name
    assert_eq!(registry.calls()[3], Call::Download(77, "vigente.pdf".to_string()));
    assert_eq!(resolved.stored.file_name, "Regulamento_2021.pdf");
    assert!(dir.path().join(SAMPLE_DIGITS).join("Regulamento_2021.pdf").exists());
}

#[tokio::test]
async fn empty_search_stops_after_first_call() {
    let dir = tempfile::tempdir().unwrap();
    let registry: Arc<FakeRegistry> = Arc::new(FakeRegistry {
        summaries: Vec::new(),
        ..FakeRegistry::happy_path()
    });

    let err = service(registry.clone(), dir.path())
        .resolve(Some(SAMPLE_CNPJ))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::NotFound(NotFoundKind::Summary)));
    assert_eq!(err.code(), "fundo_not_found");
    assert_eq!(registry.calls(), vec![Call::Search(SAMPLE_DIGITS.to_string())]);
}

#[tokio::test]
async fn invalid_identifiers_never_reach_registry() {
    let dir = tempfile::tempdir().unwrap();
    let registry: Arc<FakeRegistry> = Arc::new(FakeRegistry::happy_path());
    let resolver = service(registry.clone(), dir.path());

    let missing = resolver.resolve(None).await.unwrap_err();
    let empty = resolver.resolve(Some("")).await.unwrap_err();
    let short = resolver.resolve(Some("36.498.670/0001")).await.unwrap_err();
    let letters_only = resolver.resolve(Some("abc")).await.unwrap_err();

    assert!(matches!(missing, ResolveError::InvalidInput(InvalidInputKind::Missing)));
    assert!(matches!(empty, ResolveError::InvalidInput(InvalidInputKind::Missing)));
    assert!(matches!(short, ResolveError::InvalidInput(InvalidInputKind::WrongLength)));
    assert!(matches!(letters_only, ResolveError::InvalidInput(InvalidInputKind::WrongLength)));
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn newest_summary_is_followed() {
    let dir = tempfile::tempdir().unwrap();
    let registry: Arc<FakeRegistry> = Arc::new(FakeRegistry {
        summaries: vec![
            summary(10, Some("2019-05-01")),
            summary(11, Some("2022-02-02")),
            summary(12, None),
        ],
        ..FakeRegistry::happy_path()
    });

    service(registry.clone(), dir.path())
        .resolve(Some(SAMPLE_DIGITS))
        .await
        .unwrap();

    assert_eq!(registry.calls()[1], Call::Registration(11));
}

#[tokio::test]
async fn registration_without_id_is_incomplete() {
    let dir = tempfile::tempdir().unwrap();
    let registry: Arc<FakeRegistry> = Arc::new(FakeRegistry {
        registration: RegistrationDetail::default(),
        ..FakeRegistry::happy_path()
    });

    let err = service(registry.clone(), dir.path())
        .resolve(Some(SAMPLE_CNPJ))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "registro_incomplete");
    assert_eq!(registry.calls().len(), 2);
}

#[tokio::test]
async fn missing_documents_are_not_found() {
    let dir = tempfile::tempdir().unwrap();

    let none = Arc::new(FakeRegistry {
        documents: Vec::new(),
        ..FakeRegistry::happy_path()
    });
    let err = service(none.clone(), dir.path())
        .resolve(Some(SAMPLE_CNPJ))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound(NotFoundKind::Document)));
    assert_eq!(none.calls().len(), 3);

    // picked document has no file name to download
    let nameless = Arc::new(FakeRegistry {
        documents: vec![document(4, Some("2023-03-03"), None, Some(true))],
        ..FakeRegistry::happy_path()
    });
    let err = service(nameless.clone(), dir.path())
        .resolve(Some(SAMPLE_CNPJ))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "regulamento_not_found");
    assert_eq!(nameless.calls().len(), 3);
}

#[tokio::test]
async fn upstream_failure_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let failure = UpstreamError::status("http://cvm/fundos/regulamento/obter/todos", 503, "busy".to_string());
    let registry: Arc<FakeRegistry> =
        Arc::new(FakeRegistry::happy_path().failing(FailAt::Documents, failure.clone()));

    let err = service(registry.clone(), dir.path())
        .resolve(Some(SAMPLE_CNPJ))
        .await
        .unwrap_err();

    match err {
        ResolveError::Upstream(upstream) => assert_eq!(upstream, failure),
        other => panic!("expected upstream error, got {other:?}"),
    }
    assert_eq!(registry.calls().len(), 3);
    assert!(!dir.path().join(SAMPLE_DIGITS).exists());
}

#[tokio::test]
async fn download_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let registry: Arc<FakeRegistry> = Arc::new(
        FakeRegistry::happy_path().failing(FailAt::Download, UpstreamError::transport("http://cvm", "timed out")),
    );

    let err = service(registry, dir.path())
        .resolve(Some(SAMPLE_CNPJ))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "cvm_request_failed");
    assert!(!dir.path().join(SAMPLE_DIGITS).exists());
}

#[tokio::test]
async fn unwritable_store_is_unexpected() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocked");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let err = service(Arc::new(FakeRegistry::happy_path()), &blocker)
        .resolve(Some(SAMPLE_CNPJ))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::Unexpected(_)));
    assert_eq!(err.code(), "internal_error");
}
