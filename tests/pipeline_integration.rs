//! End-to-end tests: `EmailProcessor` driving the real chat completion
//! client against a mocked inference API.

use std::sync::Arc;
use std::time::Duration;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use secrecy::SecretString;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use inbox_triage::error::InputError;
use inbox_triage::llm::retry::RetryConfig;
use inbox_triage::llm::{ChatCompletionsProvider, LlmProvider};
use inbox_triage::pipeline::types::FALLBACK_RESPONSE;
use inbox_triage::pipeline::{Classification, EmailProcessor, FileKind, ProcessorConfig};

fn processor_for(server: &MockServer) -> EmailProcessor {
    let llm: Arc<dyn LlmProvider> = Arc::new(
        ChatCompletionsProvider::new(
            &server.uri(),
            SecretString::from("hf_test_key"),
            "test-model",
            Duration::from_secs(5),
            RetryConfig::none(),
        )
        .expect("Failed to create provider"),
    );
    EmailProcessor::new(llm, ProcessorConfig::default())
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}, "finish_reason": "stop"}]
    }))
}

/// Prompt text of the single user message in a captured request.
fn sent_prompt(request: &Request) -> String {
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    messages[0]["content"].as_str().unwrap().to_string()
}

fn one_page_pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[tokio::test]
async fn direct_text_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "max_tokens": 2048
        })))
        .respond_with(completion(
            r#"{"classification": "produtivo", "response": "Ok, obrigado."}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let result = processor_for(&server)
        .process_direct_text(Some("Subj"), "Body")
        .await
        .unwrap();

    assert_eq!(result.classification, Classification::Productive);
    assert_eq!(result.suggested_response, "Ok, obrigado.");
    assert!(result.error.is_none());

    let requests = server.received_requests().await.unwrap();
    let prompt = sent_prompt(&requests[0]);
    assert!(prompt.find("Assunto: Subj").unwrap() < prompt.find("Body").unwrap());
}

#[tokio::test]
async fn txt_upload_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(
            "```json\n{\"classification\": \"improdutivo\", \"response\": \"Obrigado!\"}\n```",
        ))
        .mount(&server)
        .await;

    let result = processor_for(&server)
        .process_upload("Parabéns pelo aniversário!".as_bytes(), FileKind::Txt)
        .await
        .unwrap();
    assert_eq!(result.classification, Classification::Unproductive);
    assert_eq!(result.suggested_response, "Obrigado!");

    let requests = server.received_requests().await.unwrap();
    assert!(sent_prompt(&requests[0]).contains("Parabéns pelo aniversário!"));
}

#[tokio::test]
async fn pdf_upload_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(
            r#"{"classification": "produtivo", "response": "Vou verificar."}"#,
        ))
        .mount(&server)
        .await;

    let pdf = one_page_pdf("Status do chamado 4521");
    let result = processor_for(&server)
        .process_upload(&pdf, FileKind::Pdf)
        .await
        .unwrap();
    assert_eq!(result.classification, Classification::Productive);

    let requests = server.received_requests().await.unwrap();
    assert!(sent_prompt(&requests[0]).contains("Status do chamado 4521"));
}

#[tokio::test]
async fn provider_outage_yields_fallback_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let result = processor_for(&server)
        .process_direct_text(None, "Pode confirmar a reunião?")
        .await
        .unwrap();

    assert_eq!(result.classification, Classification::Unproductive);
    assert_eq!(result.suggested_response, FALLBACK_RESPONSE);
    assert!(result.error.unwrap().contains("503"));
}

#[tokio::test]
async fn evaluable_model_output_yields_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(
            "{'classification': 'produtivo', 'response': __import__('os').getcwd()}",
        ))
        .mount(&server)
        .await;

    let result = processor_for(&server)
        .process_direct_text(None, "Olá")
        .await
        .unwrap();
    assert!(result.is_fallback());
    assert_eq!(result.classification, Classification::Unproductive);
}

#[tokio::test]
async fn input_errors_never_reach_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let processor = processor_for(&server);
    assert!(matches!(
        processor.process_direct_text(Some(""), "").await,
        Err(InputError::MissingContent)
    ));
    assert!(matches!(
        processor.process_upload(b" \n ", FileKind::Txt).await,
        Err(InputError::EmptyContent { .. })
    ));
    assert!(matches!(
        processor.process_upload(b"%PDF-garbage", FileKind::Pdf).await,
        Err(InputError::MalformedDocument(_))
    ));
}
