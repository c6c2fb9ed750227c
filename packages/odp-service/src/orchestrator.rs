//! §4.C12: the 17-step pipeline orchestrator. This is the only component that knows the full
//! request sequence; every other component is a building block it composes. Per-mode LLM
//! temperature/max_tokens are the fixed deployment constants reproduced in §5.

use std::collections::HashSet;

use odp_config::{Context, Retrieval};
use odp_domain::{
	ChatRole, ChatTurn, DraftTrigger, Message, MessageMetadata, MessageRole, Session,
	clarifier::needs_clarification,
	deal_registry, prompt,
	prompt::PromptMode,
	question_analyzer,
};
use odp_providers::{chat::ChatProvider, embedding::EmbeddingProvider};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
	clarifier::clarifying_question,
	draft,
	dynamic_kb,
	error::{Error, Result},
	query_rewrite,
	static_search,
	types::{AskPayload, AskResponse},
};

const GREETING_TEMPERATURE: f32 = 0.5;
const GREETING_MAX_TOKENS: u32 = 80;
const ANSWER_TEMPERATURE: f32 = 0.2;
const ANSWER_MAX_TOKENS: u32 = 900;
const ASK_TEMPERATURE: f32 = 0.2;
const ASK_MAX_TOKENS: u32 = 400;
const DRAFT_TEMPERATURE: f32 = 0.3;
const DRAFT_MAX_TOKENS: u32 = 1200;

/// A history load cap generous enough that the context-window truncation in `odp_domain::prompt`
/// (6/10 most recent turns) always has the real tail to work from; not itself a prompt-size
/// control, just a bound on what one request pulls out of Postgres.
const HISTORY_LOAD_LIMIT: i64 = 200;

/// Borrows everything one request needs: the pool, the two provider trait objects, and the
/// retrieval/context sections of the deployment config. Built fresh per request by
/// [`crate::OdpService`]; holds no state of its own.
pub struct Orchestrator<'a> {
	pub pool: &'a PgPool,
	pub embedding: &'a dyn EmbeddingProvider,
	pub chat: &'a dyn ChatProvider,
	pub retrieval: &'a Retrieval,
	pub context: &'a Context,
}

impl<'a> Orchestrator<'a> {
	/// §4.C12 steps 1–17.
	pub async fn ask(
		&self,
		question: &str,
		user_id: &str,
		session_id: Option<&str>,
		deal_id_arg: Option<Uuid>,
	) -> Result<AskResponse> {
		// Step 1: session resolve.
		let session = odp_storage::sessions::get_or_create_session(self.pool, session_id, user_id)
			.await
			.map_err(|err| {
				tracing::warn!(error = %err, "session resolve failed");
				Error::QueryFailed
			})?;

		// Step 2: load history, oldest-first.
		let history = odp_storage::messages::history(self.pool, &session.session_id, Some(HISTORY_LOAD_LIMIT))
			.await
			.map_err(|err| {
				tracing::warn!(error = %err, "failed to load conversation history");
				Error::QueryFailed
			})?;

		// Step 3: load active deals.
		let deals = odp_storage::deals::list_active_deals(self.pool).await.map_err(|err| {
			tracing::warn!(error = %err, "failed to load active deals");
			Error::QueryFailed
		})?;

		// Step 4: active-deal detection. explicit arg > substring match > most recent in history.
		let mut active_deal = deal_id_arg.or_else(|| deal_registry::detect_deal(question, &deals));
		if active_deal.is_none() {
			active_deal = history.iter().rev().find_map(|m| m.deal_id);
		}

		// Step 5: persist the user message. The one storage write whose failure is not swallowed.
		odp_storage::messages::append_message(self.pool, &session.session_id, MessageRole::User, question, active_deal, None)
			.await
			.map_err(Error::PersistFailed)?;

		// Step 6: greeting short-circuit. Must run before the pending-needs-info check.
		if question_analyzer::is_greeting(question) {
			return self.handle_greeting(&session, active_deal).await;
		}

		// Step 7: pending-needs-info check, derived from the history already in hand. A greeting
		// exchange (step 6) appends its own assistant reply every time it fires, so the literal
		// newest assistant message is not a stable proxy for "pending" once a greeting has been
		// exchanged in between — skip past greeting replies to the assistant message they
		// followed (invariant 3, §8 scenario 4: "pending needs_info state is preserved").
		let newest_assistant =
			history.iter().rev().find(|m| m.role == MessageRole::Assistant && !matches!(m.metadata, Some(MessageMetadata::Greeting)));

		if let (Some(pending), Some(deal_id)) = (newest_assistant, active_deal)
			&& let Some(MessageMetadata::NeedsInfo { investor_question, .. }) = &pending.metadata
			&& !question_analyzer::is_new_question(question)
		{
			return self
				.answer_supplied_subflow(&session, deal_id, investor_question.clone(), question, user_id)
				.await;
		}

		// Step 8: query rewrite.
		let rewritten = query_rewrite::rewrite(self.chat, question, &history_as_pairs(&history)).await;

		// Step 9: Dynamic KB search.
		let dynamic_block = dynamic_kb::search_dynamic(
			self.pool,
			self.embedding,
			&rewritten,
			active_deal,
			self.retrieval.top_k,
			self.retrieval.similarity_threshold,
		)
		.await;

		// Step 10: Static KB search; adopt a deal if the chunks agree on one and none is set yet.
		let chunks = static_search::search_static(
			self.pool,
			self.embedding,
			&rewritten,
			active_deal,
			self.retrieval.top_k,
			self.retrieval.similarity_threshold,
		)
		.await;

		if active_deal.is_none() {
			let distinct: HashSet<Uuid> = chunks.iter().map(|hit| hit.deal_id).collect();

			if distinct.len() == 1 {
				active_deal = distinct.into_iter().next();
			}
		}

		// Step 11: clarifier.
		if needs_clarification(&rewritten, active_deal.is_some()) {
			let deal_names: Vec<String> = deals.iter().map(|deal| deal.deal_name.clone()).collect();
			let clarifying = clarifying_question(self.chat, &rewritten, &deal_names).await;

			self.persist_assistant_best_effort(
				&session.session_id,
				&clarifying,
				active_deal,
				&MessageMetadata::NeedsClarification { original_question: question.to_string() },
			)
			.await;

			return Ok(AskResponse {
				payload: AskPayload::NeedsClarification { clarifying_question: clarifying },
				session_id: session.session_id,
				active_deal_id: active_deal,
				show_draft_button: false,
			});
		}

		// Step 12: merge contexts, dynamic first.
		let static_block = prompt::build_context(&chunks);
		let kb_context = prompt::merge_kb_contexts(&dynamic_block, &static_block);

		// Step 13: deal identifier line + tone rules.
		let deal = active_deal.and_then(|id| deals.iter().find(|d| d.deal_id == id));
		let deal_line = deal.map(deal_registry::deal_context_line);
		let tone_rows = odp_storage::deals::tone_rules(self.pool, active_deal).await.unwrap_or_else(|err| {
			tracing::warn!(error = %err, "failed to load tone rules, falling back to the default tone");
			Vec::new()
		});
		let tone_block = deal_registry::tone_rules_block(&tone_rows);

		// Step 14: history turns.
		let turns = prompt::build_history_turns(
			&history_as_pairs(&history),
			self.context.history_window_answer,
			self.context.assistant_truncate_answer,
		);

		// Step 15: the LLM answer call.
		let system_prompt = prompt::build_system_prompt(PromptMode::Answer, &tone_block);
		let user_prompt = prompt::build_answer_user_prompt(deal_line.as_deref(), &kb_context, &rewritten);
		let mut messages = vec![ChatTurn { role: ChatRole::System, content: system_prompt }];
		messages.extend(turns);
		messages.push(ChatTurn { role: ChatRole::User, content: user_prompt });

		let answer_text = self.chat.complete(&messages, ANSWER_TEMPERATURE, ANSWER_MAX_TOKENS).await.map_err(|err| {
			tracing::warn!(error = %err, "answer generation failed");
			Error::QueryFailed
		})?;

		let sources = prompt::extract_sources(&chunks);
		let confidence = prompt::calculate_confidence(&chunks);

		// Step 16: missing-info check.
		if question_analyzer::has_missing_info_signal(&answer_text) {
			let investor_question = resolve_investor_question(question, &history);
			let ask_system_prompt = prompt::build_system_prompt(PromptMode::Ask, &tone_block);
			let ask_user_prompt = format!(
				"Partial answer:\n{answer_text}\n\nInvestor Question: {investor_question}\n\nList only the specific items flagged as missing, as a numbered request."
			);
			let mut ask_messages = vec![ChatTurn { role: ChatRole::System, content: ask_system_prompt }];
			ask_messages.extend(prompt::build_history_turns(
				&history_as_pairs(&history),
				self.context.history_window_answer,
				self.context.assistant_truncate_answer,
			));
			ask_messages.push(ChatTurn { role: ChatRole::User, content: ask_user_prompt });

			let info_request = self.chat.complete(&ask_messages, ASK_TEMPERATURE, ASK_MAX_TOKENS).await.map_err(|err| {
				tracing::warn!(error = %err, "follow-up info request generation failed");
				Error::QueryFailed
			})?;

			let combined = format!("{answer_text}\n\n---\n{info_request}");

			self.persist_assistant_best_effort(
				&session.session_id,
				&combined,
				active_deal,
				&MessageMetadata::NeedsInfo {
					investor_question: investor_question.clone(),
					sources: sources.clone(),
					confidence,
				},
			)
			.await;

			return Ok(AskResponse {
				payload: AskPayload::NeedsInfo { partial_answer: answer_text, info_request, sources, confidence },
				session_id: session.session_id,
				active_deal_id: active_deal,
				show_draft_button: false,
			});
		}

		// Step 17: a clean answer.
		self.persist_assistant_best_effort(
			&session.session_id,
			&answer_text,
			active_deal,
			&MessageMetadata::Answer { sources: sources.clone(), confidence },
		)
		.await;

		Ok(AskResponse {
			payload: AskPayload::Answer { answer: answer_text, sources, confidence },
			session_id: session.session_id,
			active_deal_id: active_deal,
			show_draft_button: true,
		})
	}

	/// Step 6: one to two warm sentences, no KB context attached.
	async fn handle_greeting(&self, session: &Session, active_deal: Option<Uuid>) -> Result<AskResponse> {
		let tone_rows = odp_storage::deals::tone_rules(self.pool, active_deal).await.unwrap_or_else(|err| {
			tracing::warn!(error = %err, "failed to load tone rules, falling back to the default tone");
			Vec::new()
		});
		let tone_block = deal_registry::tone_rules_block(&tone_rows);
		let system_prompt = prompt::build_system_prompt(PromptMode::Greeting, &tone_block);
		let messages =
			vec![ChatTurn { role: ChatRole::System, content: system_prompt }, ChatTurn { role: ChatRole::User, content: "Hello.".to_string() }];

		let reply = self.chat.complete(&messages, GREETING_TEMPERATURE, GREETING_MAX_TOKENS).await.map_err(|err| {
			tracing::warn!(error = %err, "greeting reply generation failed");
			Error::QueryFailed
		})?;

		self.persist_assistant_best_effort(&session.session_id, &reply, active_deal, &MessageMetadata::Greeting).await;

		Ok(AskResponse {
			payload: AskPayload::Answer { answer: reply, sources: Vec::new(), confidence: odp_domain::Confidence::Low },
			session_id: session.session_id.clone(),
			active_deal_id: active_deal,
			show_draft_button: false,
		})
	}

	/// The answer-supplied subflow invoked from step 7: the team's reply to a pending
	/// `needs_info` is decomposed, stored, and immediately turned into a draft reply.
	async fn answer_supplied_subflow(
		&self,
		session: &Session,
		deal_id: Uuid,
		pending_investor_question: String,
		user_answer: &str,
		created_by: &str,
	) -> Result<AskResponse> {
		let deal = odp_storage::deals::find_deal(self.pool, deal_id).await.ok().flatten();
		let deal_name = deal.as_ref().map(|d| d.deal_name.clone()).unwrap_or_else(|| "the deal".to_string());

		if let Err(err) = dynamic_kb::store_with_decomposition(
			self.pool,
			self.embedding,
			self.retrieval.vector_dim as usize,
			deal_id,
			&pending_investor_question,
			user_answer,
			&deal_name,
			created_by,
		)
		.await
		{
			tracing::warn!(error = %err, "failed to persist the decomposed supplied answer");
		}

		let draft_email = self
			.compose_draft(session, Some(deal_id), &pending_investor_question, Some(user_answer))
			.await?;

		self.persist_assistant_best_effort(
			&session.session_id,
			&draft_email,
			Some(deal_id),
			&MessageMetadata::DraftEmail { trigger: DraftTrigger::UserSuppliedAnswer },
		)
		.await;

		Ok(AskResponse {
			payload: AskPayload::DraftEmail { draft_email },
			session_id: session.session_id.clone(),
			active_deal_id: Some(deal_id),
			show_draft_button: false,
		})
	}

	/// §6 `generate_draft`: the manual draft entry, resolving the investor question from
	/// history rather than from a freshly-supplied answer.
	pub async fn generate_draft(&self, session_id: &str, user_id: &str) -> Result<AskResponse> {
		let owned_sessions = odp_storage::sessions::list_sessions(self.pool, user_id).await.map_err(|err| {
			tracing::warn!(error = %err, "failed to look up sessions for generate_draft");
			Error::QueryFailed
		})?;
		let session = owned_sessions.into_iter().find(|s| s.session_id == session_id).ok_or(Error::NoConversation)?;

		let history = odp_storage::messages::history(self.pool, session_id, None).await.map_err(|err| {
			tracing::warn!(error = %err, "failed to load conversation history for generate_draft");
			Error::QueryFailed
		})?;

		if history.is_empty() {
			return Err(Error::NoConversation);
		}

		let investor_question = resolve_investor_question_from_history(&history).ok_or(Error::NoQuestion)?;
		let active_deal = history.iter().rev().find_map(|m| m.deal_id);

		let draft_email = self.compose_draft(&session, active_deal, &investor_question, None).await?;

		self.persist_assistant_best_effort(
			session_id,
			&draft_email,
			active_deal,
			&MessageMetadata::DraftEmail { trigger: DraftTrigger::GenerateDraftButton },
		)
		.await;

		Ok(AskResponse {
			payload: AskPayload::DraftEmail { draft_email },
			session_id: session.session_id,
			active_deal_id: active_deal,
			show_draft_button: false,
		})
	}

	/// Shared by both draft paths: re-search both tiers for `investor_question`, flatten the
	/// session, and call C2 in `draft` mode. `supplied_answer`, when present, is folded into the
	/// flattened summary as a trailing line (the answer-supplied subflow's case).
	async fn compose_draft(
		&self,
		session: &Session,
		active_deal: Option<Uuid>,
		investor_question: &str,
		supplied_answer: Option<&str>,
	) -> Result<String> {
		let dynamic_block = dynamic_kb::search_dynamic(
			self.pool,
			self.embedding,
			investor_question,
			active_deal,
			self.retrieval.top_k,
			self.retrieval.similarity_threshold,
		)
		.await;
		let chunks = static_search::search_static(
			self.pool,
			self.embedding,
			investor_question,
			active_deal,
			self.retrieval.top_k,
			self.retrieval.similarity_threshold,
		)
		.await;
		let kb_context = prompt::merge_kb_contexts(&dynamic_block, &prompt::build_context(&chunks));

		let deal = match active_deal {
			Some(id) => odp_storage::deals::find_deal(self.pool, id).await.ok().flatten(),
			None => None,
		};
		let deal_line = deal.as_ref().map(deal_registry::deal_context_line);
		let tone_rows = odp_storage::deals::tone_rules(self.pool, active_deal).await.unwrap_or_else(|err| {
			tracing::warn!(error = %err, "failed to load tone rules, falling back to the default tone");
			Vec::new()
		});
		let tone_block = deal_registry::tone_rules_block(&tone_rows);

		let full_history = odp_storage::messages::history(self.pool, &session.session_id, None).await.unwrap_or_else(|err| {
			tracing::warn!(error = %err, "failed to load full history for draft summary, using an empty summary");
			Vec::new()
		});
		let summary = match supplied_answer {
			Some(answer) => draft::flatten_session_with_supplied_answer(&full_history, answer),
			None => draft::flatten_session(&full_history),
		};

		let system_prompt = prompt::build_system_prompt(PromptMode::Draft, &tone_block);
		let user_prompt = prompt::build_draft_user_prompt(deal_line.as_deref(), &kb_context, &summary, investor_question);
		let mut messages = vec![ChatTurn { role: ChatRole::System, content: system_prompt }];
		messages.extend(prompt::build_history_turns(
			&history_as_pairs(&full_history),
			self.context.history_window_draft,
			self.context.assistant_truncate_draft,
		));
		messages.push(ChatTurn { role: ChatRole::User, content: user_prompt });

		self.chat.complete(&messages, DRAFT_TEMPERATURE, DRAFT_MAX_TOKENS).await.map_err(|err| {
			tracing::warn!(error = %err, "draft generation failed");
			Error::QueryFailed
		})
	}

	/// Assistant-message persistence failures (§7: only the user message's own persist failure is
	/// escalated) are logged and otherwise swallowed — the computed response is still returned.
	async fn persist_assistant_best_effort(
		&self,
		session_id: &str,
		content: &str,
		deal_id: Option<Uuid>,
		metadata: &MessageMetadata,
	) {
		if let Err(err) =
			odp_storage::messages::append_message(self.pool, session_id, MessageRole::Assistant, content, deal_id, Some(metadata)).await
		{
			tracing::warn!(error = %err, "failed to persist assistant message");
		}
	}
}

fn history_as_pairs(history: &[Message]) -> Vec<(ChatRole, String)> {
	history
		.iter()
		.map(|message| {
			let role = match message.role {
				MessageRole::User => ChatRole::User,
				MessageRole::Assistant => ChatRole::Assistant,
			};

			(role, message.content.clone())
		})
		.collect()
}

/// §4.C12 step 16 investor-question resolution, in the order this document adopts as
/// authoritative (DESIGN.md, Open Question (c)): the current question if substantive, else the
/// original question of the most recent `needs_clarification`, else the first substantive user
/// message.
fn resolve_investor_question(question: &str, history: &[Message]) -> String {
	if question.chars().count() > 20 {
		return question.to_string();
	}

	for message in history.iter().rev() {
		if let Some(MessageMetadata::NeedsClarification { original_question }) = &message.metadata {
			return original_question.clone();
		}
	}

	history
		.iter()
		.find(|message| message.role == MessageRole::User)
		.map(|message| message.content.clone())
		.unwrap_or_else(|| question.to_string())
}

/// Investor-question resolution for the manual draft entry, which has no "current question" of
/// its own: the most recent `needs_info`'s or `needs_clarification`'s recorded question, else the
/// first substantive user message.
fn resolve_investor_question_from_history(history: &[Message]) -> Option<String> {
	for message in history.iter().rev() {
		match &message.metadata {
			Some(MessageMetadata::NeedsInfo { investor_question, .. }) => return Some(investor_question.clone()),
			Some(MessageMetadata::NeedsClarification { original_question }) => return Some(original_question.clone()),
			_ => {},
		}
	}

	history.iter().find(|message| message.role == MessageRole::User).map(|message| message.content.clone())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn message(role: MessageRole, content: &str, metadata: Option<MessageMetadata>) -> Message {
		Message {
			message_id: uuid::Uuid::new_v4(),
			session_id: "s1".to_string(),
			role,
			content: content.to_string(),
			deal_id: None,
			metadata,
			created_at: time::OffsetDateTime::UNIX_EPOCH,
		}
	}

	#[test]
	fn resolve_investor_question_prefers_the_current_question_when_substantive() {
		let history = vec![message(MessageRole::User, "irrelevant", None)];
		let resolved = resolve_investor_question("What is the lockup period for this deal?", &history);
		assert_eq!(resolved, "What is the lockup period for this deal?");
	}

	#[test]
	fn resolve_investor_question_falls_back_to_the_clarification_original() {
		let history = vec![message(
			MessageRole::Assistant,
			"Which deal?",
			Some(MessageMetadata::NeedsClarification { original_question: "What is the minimum ticket?".to_string() }),
		)];
		let resolved = resolve_investor_question("Sure", &history);
		assert_eq!(resolved, "What is the minimum ticket?");
	}

	#[test]
	fn resolve_investor_question_from_history_prefers_needs_info() {
		let history = vec![
			message(MessageRole::User, "Tell me about the deal.", None),
			message(
				MessageRole::Assistant,
				"partial answer",
				Some(MessageMetadata::NeedsInfo {
					investor_question: "What is the lockup period?".to_string(),
					sources: Vec::new(),
					confidence: odp_domain::Confidence::Low,
				}),
			),
		];
		let resolved = resolve_investor_question_from_history(&history);
		assert_eq!(resolved, Some("What is the lockup period?".to_string()));
	}

	#[test]
	fn resolve_investor_question_from_history_falls_back_to_first_user_message() {
		let history = vec![message(MessageRole::User, "What is the valuation?", None)];
		let resolved = resolve_investor_question_from_history(&history);
		assert_eq!(resolved, Some("What is the valuation?".to_string()));
	}

	#[test]
	fn resolve_investor_question_from_history_empty_is_none() {
		assert_eq!(resolve_investor_question_from_history(&[]), None);
	}
}
