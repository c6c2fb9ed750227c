use std::sync::Arc;

use odp_domain::MessageMetadata;
use odp_service::types::AskPayload;
use odp_testkit::{FakeChatProvider, FakeEmbeddingProvider};

/// §8 scenario 1: a deal-specific question with no active deal and two live deals in the system
/// asks which deal is meant, by template, without ever calling the LLM.
#[tokio::test]
#[ignore = "Requires external Postgres. Set ODP_TEST_PG_DSN to run."]
async fn deal_specific_question_without_active_deal_asks_which_deal() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping deal_specific_question_without_active_deal_asks_which_deal; set ODP_TEST_PG_DSN to run this test."
		);
		return;
	};

	let embedding = Arc::new(FakeEmbeddingProvider::new(3));
	let chat = Arc::new(FakeChatProvider::new(vec!["should not be called"]));
	let service = super::build_service(test_db.dsn(), 3, embedding, chat.clone())
		.await
		.expect("failed to build service");

	super::insert_deal(service.pool(), "SpaceX", "SPX").await;
	super::insert_deal(service.pool(), "Anthropic", "ANT").await;

	let response = service
		.ask("What is the minimum ticket?", "alice", None, None)
		.await
		.expect("ask failed");

	let AskPayload::NeedsClarification { clarifying_question } = &response.payload else {
		panic!("expected needs_clarification, got {:?}", response.payload);
	};
	assert!(clarifying_question.contains("SpaceX"));
	assert!(clarifying_question.contains("Anthropic"));
	assert!(chat.calls().is_empty(), "the templated clarifier must not call the LLM");

	let conversation = service
		.get_conversation(&response.session_id, None)
		.await
		.expect("failed to load conversation");
	let last = conversation.messages.last().expect("expected at least one persisted message");

	match &last.metadata {
		Some(MessageMetadata::NeedsClarification { original_question }) => {
			assert_eq!(original_question, "What is the minimum ticket?");
		},
		other => panic!("expected needs_clarification metadata, got {other:?}"),
	}

	test_db.cleanup().await.expect("failed to clean up test database");
}
