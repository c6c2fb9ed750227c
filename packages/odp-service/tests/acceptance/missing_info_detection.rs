use std::sync::Arc;

use odp_domain::MessageMetadata;
use odp_service::types::AskPayload;
use odp_testkit::{FakeChatProvider, FakeEmbeddingProvider};

/// §8 scenario 6: the answer call's reply itself signals a gap (§4.C7 `has_missing_info_signal`);
/// the orchestrator follows up with a scoped `needs_info` request rather than returning the gap
/// silently as a finished answer.
#[tokio::test]
#[ignore = "Requires external Postgres. Set ODP_TEST_PG_DSN to run."]
async fn missing_info_in_the_answer_produces_a_scoped_follow_up_request() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping missing_info_in_the_answer_produces_a_scoped_follow_up_request; set ODP_TEST_PG_DSN to run this test."
		);
		return;
	};

	let embedding = Arc::new(FakeEmbeddingProvider::new(3));
	let chat = Arc::new(FakeChatProvider::new(vec![
		"We don't have the lockup period on file for this deal.",
		"1. What is the lockup period for this deal?",
	]));
	let service = super::build_service(test_db.dsn(), 3, embedding, chat)
		.await
		.expect("failed to build service");

	super::insert_deal(service.pool(), "Project H", "PROJH").await;

	let question = "What is the lockup period for Project H?";
	let response = service.ask(question, "frank", None, None).await.expect("ask failed");

	let AskPayload::NeedsInfo { partial_answer, info_request, .. } = &response.payload else {
		panic!("expected needs_info, got {:?}", response.payload);
	};
	assert!(partial_answer.to_lowercase().contains("don't have"));
	assert!(info_request.to_lowercase().contains("lockup"));

	let conversation = service
		.get_conversation(&response.session_id, None)
		.await
		.expect("failed to load conversation");
	let last = conversation.messages.last().expect("expected at least one persisted message");

	match &last.metadata {
		Some(MessageMetadata::NeedsInfo { investor_question, .. }) => {
			assert_eq!(investor_question, question);
		},
		other => panic!("expected needs_info metadata, got {other:?}"),
	}

	test_db.cleanup().await.expect("failed to clean up test database");
}
