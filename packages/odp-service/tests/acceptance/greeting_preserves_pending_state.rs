use std::sync::Arc;

use odp_domain::{Confidence, MessageMetadata, MessageRole};
use odp_service::types::AskPayload;
use odp_testkit::{FakeChatProvider, FakeEmbeddingProvider};

/// §8 scenario 4 / invariant 3: a greeting exchanged while a `needs_info` reply is pending must
/// not clear that pending state — the next substantive message from the team is still routed
/// through the answer-supplied subflow, not treated as a fresh question.
#[tokio::test]
#[ignore = "Requires external Postgres. Set ODP_TEST_PG_DSN to run."]
async fn greeting_does_not_clear_a_pending_needs_info_state() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping greeting_does_not_clear_a_pending_needs_info_state; set ODP_TEST_PG_DSN to run this test.");
		return;
	};

	let embedding = Arc::new(FakeEmbeddingProvider::new(3));
	let chat = Arc::new(FakeChatProvider::new(vec!["Hi there! How can I help?", "Thanks — drafting that now. Best,"]));
	let service = super::build_service(test_db.dsn(), 3, embedding, chat)
		.await
		.expect("failed to build service");

	let deal_id = super::insert_deal(service.pool(), "Project G", "PROJG").await;

	let session = odp_storage::sessions::get_or_create_session(service.pool(), None, "dave")
		.await
		.expect("failed to create session");

	let investor_question = "What is the lockup period for this deal?";

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

	let greeting_response = service
		.ask("Hello", "dave", Some(&session.session_id), None)
		.await
		.expect("greeting ask failed");

	assert!(
		matches!(greeting_response.payload, AskPayload::Answer { .. }),
		"a greeting must reply as a plain answer, got {:?}",
		greeting_response.payload
	);

	let count_after_greeting: i64 = sqlx::query_scalar("SELECT count(*) FROM dynamic_facts WHERE deal_id = $1")
		.bind(deal_id)
		.fetch_one(service.pool())
		.await
		.expect("failed to count dynamic_facts after the greeting");
	assert_eq!(count_after_greeting, 0, "a greeting must not trigger the answer-supplied subflow");

	let user_answer = "Lockup would be 12 months.";
	let follow_up_response = service
		.ask(user_answer, "dave", Some(&session.session_id), None)
		.await
		.expect("follow-up ask failed");

	assert!(
		matches!(follow_up_response.payload, AskPayload::DraftEmail { .. }),
		"the pending needs_info state must survive the intervening greeting, got {:?}",
		follow_up_response.payload
	);

	let count_after_answer: i64 = sqlx::query_scalar("SELECT count(*) FROM dynamic_facts WHERE deal_id = $1")
		.bind(deal_id)
		.fetch_one(service.pool())
		.await
		.expect("failed to count dynamic_facts after the supplied answer");
	assert!(count_after_answer > 0, "the supplied answer must have been persisted to the dynamic KB");

	test_db.cleanup().await.expect("failed to clean up test database");
}
