use std::sync::Arc;

use odp_service::types::AskPayload;
use odp_testkit::{FakeChatProvider, FakeEmbeddingProvider};
use uuid::Uuid;

/// §8 scenario 2: a team-supplied fact and a document passage disagree on the same figure; the
/// merged prompt must carry the team fact ahead of the document block (invariant 2, §3).
#[tokio::test]
#[ignore = "Requires external Postgres. Set ODP_TEST_PG_DSN to run."]
async fn team_supplied_fact_is_placed_before_the_document_passage_in_the_prompt() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping team_supplied_fact_is_placed_before_the_document_passage_in_the_prompt; set ODP_TEST_PG_DSN to run this test."
		);
		return;
	};

	let embedding = Arc::new(FakeEmbeddingProvider::new(3));
	embedding.pin("What is the minimum ticket for Deal D?", vec![1.0, 0.0, 0.0]);
	let chat = Arc::new(FakeChatProvider::new(vec![
		"The minimum ticket for Deal D is $25,000, as confirmed by the team.",
	]));
	let service = super::build_service(test_db.dsn(), 3, embedding, chat.clone())
		.await
		.expect("failed to build service");

	let deal_id = super::insert_deal(service.pool(), "Deal D", "DEALD").await;

	odp_storage::document_chunks::insert_chunk(
		service.pool(),
		deal_id,
		Uuid::new_v4(),
		"Deck.pdf",
		0,
		Some(3),
		"Minimum ticket: $50,000.",
		&[1.0, 0.0, 0.0],
	)
	.await
	.expect("failed to insert document chunk fixture");

	odp_storage::dynamic_facts::insert_qa_row(
		service.pool(),
		deal_id,
		"What is the minimum ticket for Deal D?",
		"$25,000",
		&[1.0, 0.0, 0.0],
		"alice",
	)
	.await
	.expect("failed to insert dynamic fact fixture");

	let response = service
		.ask("What is the minimum ticket for Deal D?", "bob", None, Some(deal_id))
		.await
		.expect("ask failed");

	assert!(matches!(response.payload, AskPayload::Answer { .. }), "expected answer, got {:?}", response.payload);

	let calls = chat.calls();
	assert_eq!(calls.len(), 1, "exactly one LLM call for the answer step");

	let user_turn = calls[0]
		.iter()
		.rev()
		.find(|turn| turn.role == odp_domain::ChatRole::User)
		.expect("expected a user turn in the prompt");

	let dynamic_pos = user_turn
		.content
		.find(odp_domain::prompt::TEAM_FACTS_HEADER)
		.expect("team facts header missing from the prompt");
	let static_pos = user_turn.content.find("Document 1:").expect("document block missing from the prompt");
	assert!(dynamic_pos < static_pos, "team-supplied fact must precede the document passage");
	assert!(user_turn.content.contains("$25,000"));
	assert!(user_turn.content.contains("$50,000"));

	test_db.cleanup().await.expect("failed to clean up test database");
}
