use std::sync::Arc;

use odp_domain::{Confidence, MessageMetadata, MessageRole};
use odp_service::types::AskPayload;
use odp_testkit::{FakeChatProvider, FakeEmbeddingProvider};

/// §8 scenario 3: the team's multi-part reply to a pending `needs_info` is decomposed into one
/// row per atomic fact (§4.C10), in `FACT_PATTERNS` table order, alongside the full Q&A row.
#[tokio::test]
#[ignore = "Requires external Postgres. Set ODP_TEST_PG_DSN to run."]
async fn multi_part_supplied_answer_is_decomposed_into_atomic_facts() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping multi_part_supplied_answer_is_decomposed_into_atomic_facts; set ODP_TEST_PG_DSN to run this test."
		);
		return;
	};

	let embedding = Arc::new(FakeEmbeddingProvider::new(3));
	let chat = Arc::new(FakeChatProvider::new(vec!["Thanks for the details! Best,"]));
	let service = super::build_service(test_db.dsn(), 3, embedding, chat)
		.await
		.expect("failed to build service");

	let deal_id = super::insert_deal(service.pool(), "Project D", "PROJD").await;

	let session = odp_storage::sessions::get_or_create_session(service.pool(), None, "carol")
		.await
		.expect("failed to create session");

	let investor_question = "Do you have details on structure, payment dates, and minimum ticket?";

	odp_storage::messages::append_message(
		service.pool(),
		&session.session_id,
		MessageRole::User,
		investor_question,
		Some(deal_id),
		None,
	)
	.await
	.expect("failed to seed the investor question");

	odp_storage::messages::append_message(
		service.pool(),
		&session.session_id,
		MessageRole::Assistant,
		"We don't have that on file yet.",
		Some(deal_id),
		Some(&MessageMetadata::NeedsInfo {
			investor_question: investor_question.to_string(),
			sources: Vec::new(),
			confidence: Confidence::Low,
		}),
	)
	.await
	.expect("failed to seed the pending needs_info message");

	let user_answer = "Structure would be SPV. Payment dates would be Next Tuesday and Minimum Ticket would be $25K.";
	let response = service
		.ask(user_answer, "carol", Some(&session.session_id), None)
		.await
		.expect("ask failed");

	assert!(matches!(response.payload, AskPayload::DraftEmail { .. }), "expected draft_email, got {:?}", response.payload);

	let rows: Vec<(Option<String>, Option<String>)> = sqlx::query_as(
		"SELECT question, answer FROM dynamic_facts WHERE deal_id = $1 ORDER BY created_at",
	)
	.bind(deal_id)
	.fetch_all(service.pool())
	.await
	.expect("failed to read dynamic_facts fixture rows");

	assert_eq!(rows.len(), 4, "expected the full Q&A row plus 3 atomic facts");
	assert_eq!(rows[0], (Some(investor_question.to_string()), Some(user_answer.to_string())));
	assert_eq!(
		rows[1],
		(Some("What is the minimum ticket size for Project D?".to_string()), Some("$25K".to_string()))
	);
	assert_eq!(
		rows[2],
		(Some("What are the payment dates for Project D?".to_string()), Some("Next Tuesday".to_string()))
	);
	assert_eq!(
		rows[3],
		(Some("What is the investment structure for Project D?".to_string()), Some("SPV".to_string()))
	);

	test_db.cleanup().await.expect("failed to clean up test database");
}
