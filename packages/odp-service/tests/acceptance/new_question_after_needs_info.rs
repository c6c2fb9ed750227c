use std::sync::Arc;

use odp_domain::{Confidence, MessageMetadata, MessageRole};
use odp_service::types::AskPayload;
use odp_testkit::{FakeChatProvider, FakeEmbeddingProvider};

/// §8 scenario 5: a brand-new question asked while a `needs_info` reply is pending is not
/// mistaken for the team's supplied answer — `is_new_question` routes it through the normal
/// pipeline instead of the answer-supplied subflow.
#[tokio::test]
#[ignore = "Requires external Postgres. Set ODP_TEST_PG_DSN to run."]
async fn a_new_question_is_not_treated_as_the_pending_answer() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping a_new_question_is_not_treated_as_the_pending_answer; set ODP_TEST_PG_DSN to run this test.");
		return;
	};

	let embedding = Arc::new(FakeEmbeddingProvider::new(3));
	let chat = Arc::new(FakeChatProvider::new(vec![
		"The current share price for Project D is $12.50 per share, as last reported.",
	]));
	let service = super::build_service(test_db.dsn(), 3, embedding, chat)
		.await
		.expect("failed to build service");

	let deal_id = super::insert_deal(service.pool(), "Project D", "PROJD").await;

	let session = odp_storage::sessions::get_or_create_session(service.pool(), None, "erin")
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

	let response = service
		.ask("What is the current share price for Project D?", "erin", Some(&session.session_id), None)
		.await
		.expect("ask failed");

	assert!(
		!matches!(response.payload, AskPayload::DraftEmail { .. }),
		"a new question must not be routed through the answer-supplied subflow, got {:?}",
		response.payload
	);

	let fact_count: i64 = sqlx::query_scalar("SELECT count(*) FROM dynamic_facts WHERE deal_id = $1")
		.bind(deal_id)
		.fetch_one(service.pool())
		.await
		.expect("failed to count dynamic_facts");
	assert_eq!(fact_count, 0, "the new question must not have been decomposed and stored as a supplied answer");

	test_db.cleanup().await.expect("failed to clean up test database");
}
