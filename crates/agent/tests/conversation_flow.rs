//! End-to-end conversation flow tests

use std::collections::HashMap;
use std::sync::Arc;

use sales_agent_agent::{
    agent_reply, initial_agent_state, Conversation, FollowUpPlanner, SalesAgent,
};
use sales_agent_config::GreetingTemplates;
use sales_agent_core::{ConversationContext, ConversationStage, LoanType};

/// Utterances with no opt-out, defer or loan keywords
const NEUTRAL: [&str; 5] = ["हाँ जी", "ठीक है", "yes", "हाँ, बताइए", "जी हाँ"];

fn every_stage() -> impl Iterator<Item = ConversationStage> {
    ConversationStage::ALL.into_iter()
}

#[test]
fn empty_utterance_leaves_context_unchanged() {
    for stage in every_stage() {
        let previous = ConversationContext::at_stage(stage)
            .with_loan_type(LoanType::Business)
            .with_amount("3 लाख");

        for utterance in ["", "   ", "\n\t"] {
            let response = agent_reply(utterance, &previous);
            assert_eq!(response.context, previous, "stage {stage}");
        }
    }
}

#[test]
fn negative_phrase_closes_without_follow_up() {
    for stage in every_stage() {
        let previous = ConversationContext::at_stage(stage);

        for utterance in ["नहीं", "नहीं, मत भेजो", "please stop", "interest nahi hai"] {
            let response = agent_reply(utterance, &previous);
            assert_eq!(response.stage(), ConversationStage::Closing, "{utterance} at {stage}");
            assert_eq!(response.context.follow_up_needed, Some(false));
        }
    }
}

#[test]
fn defer_phrase_closes_with_follow_up() {
    for stage in every_stage() {
        let previous = ConversationContext::at_stage(stage);

        for utterance in ["बाद में", "call me later", "सोचकर बताऊँगा"] {
            let response = agent_reply(utterance, &previous);
            assert_eq!(response.stage(), ConversationStage::Closing, "{utterance} at {stage}");
            assert_eq!(response.context.follow_up_needed, Some(true));
        }
    }
}

#[test]
fn neutral_turns_walk_the_funnel_in_order() {
    let mut context = initial_agent_state().context;
    let mut visited = Vec::new();

    for utterance in NEUTRAL {
        context = agent_reply(utterance, &context).context;
        visited.push(context.stage);
    }

    assert_eq!(
        visited,
        vec![
            ConversationStage::Qualification,
            ConversationStage::NeedAnalysis,
            ConversationStage::Pitch,
            ConversationStage::Documents,
            ConversationStage::Closing,
        ]
    );
    assert_eq!(context.follow_up_needed, Some(true));
}

#[test]
fn funnel_position_never_decreases() {
    let script = ["मुझे business loan चाहिए", "ठीक है", "yes", "हाँ जी", "", "जी हाँ", "yes"];
    let mut context = initial_agent_state().context;

    for utterance in script {
        let next = agent_reply(utterance, &context).context;
        assert!(next.stage.funnel_position() >= context.stage.funnel_position());
        context = next;
    }
    assert_eq!(context.stage, ConversationStage::Closing);
}

#[test]
fn loan_type_and_amount_are_sticky() {
    let mut context = initial_agent_state().context;

    context = agent_reply("मुझे personal loan चाहिए 5 लाख का", &context).context;
    context = agent_reply("घर के लिए 50 लाख भी देख रहा हूँ", &context).context;
    context = agent_reply("business वाला भी", &context).context;

    assert_eq!(context.loan_type, Some(LoanType::Personal));
    assert_eq!(context.amount.as_deref(), Some("5 लाख"));
}

#[test]
fn initial_state_is_introduction_with_fixed_greeting() {
    let first = initial_agent_state();
    let second = initial_agent_state();

    assert_eq!(first, second);
    assert_eq!(first.stage(), ConversationStage::Introduction);
    assert_eq!(
        first.reply,
        GreetingTemplates::default().format("प्रिया", "विशफिन डॉट कॉम", None)
    );
}

#[test]
fn first_answer_captures_loan_and_amount() {
    let initial = initial_agent_state();
    let response = agent_reply("मुझे personal loan चाहिए 5 लाख का", &initial.context);

    assert_eq!(response.stage(), ConversationStage::Qualification);
    assert_eq!(response.context.loan_type, Some(LoanType::Personal));
    assert!(response.context.amount.as_deref().unwrap_or_default().contains("5 लाख"));
}

#[test]
fn home_pitch_leads_with_amount() {
    let previous = ConversationContext::at_stage(ConversationStage::Pitch)
        .with_loan_type(LoanType::Home)
        .with_amount("20 लाख");

    let response = agent_reply("हाँ जी", &previous);

    assert_eq!(response.stage(), ConversationStage::Documents);
    assert!(response.reply.starts_with("आपके बताए हुए 20 लाख के लिए "));
    assert!(response.reply.contains("होम लोन"));
}

#[test]
fn closing_is_idempotent_for_neutral_turns() {
    let closed = ConversationContext::at_stage(ConversationStage::Closing)
        .with_loan_type(LoanType::Home)
        .with_amount("20 लाख");
    let mut context = closed.clone();

    let mut replies = Vec::new();
    for utterance in NEUTRAL {
        let response = agent_reply(utterance, &context);
        replies.push(response.reply);
        context = response.context;
    }

    assert_eq!(context, closed);
    assert!(replies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let agent = SalesAgent::new();
    let previous = ConversationContext::at_stage(ConversationStage::NeedAnalysis)
        .with_loan_type(LoanType::Unknown);

    for utterance in ["हाँ जी", "बाद में", "नहीं", "10 lakh home", ""] {
        assert_eq!(agent.advance(utterance, &previous), agent.advance(utterance, &previous));
        assert_eq!(agent.advance(utterance, &previous), agent_reply(utterance, &previous));
    }
}

#[test]
fn context_round_trips_through_json_between_turns() {
    let mut context = initial_agent_state().context;

    for utterance in ["मुझे home loan चाहिए 25 लाख", "ठीक है", "yes"] {
        let response = agent_reply(utterance, &context);
        let json = serde_json::to_string(&response.context).unwrap();
        context = serde_json::from_str(&json).unwrap();
        assert_eq!(context, response.context);
    }
    assert_eq!(context.stage, ConversationStage::Pitch);
}

#[test]
fn shared_agent_serves_concurrent_conversations() {
    let agent = Arc::new(SalesAgent::new());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let agent = Arc::clone(&agent);
            std::thread::spawn(move || {
                let mut conversation = Conversation::new(agent);
                for utterance in NEUTRAL {
                    conversation.respond(utterance);
                }
                conversation.stage()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), ConversationStage::Closing);
    }
}

#[test]
fn completed_call_plans_document_links() {
    let mut conversation = Conversation::for_customer(Arc::new(SalesAgent::new()), "राहुल");

    for utterance in ["मुझे home loan चाहिए 20 लाख", "ठीक है", "हाँ जी", "yes", "जी हाँ"] {
        conversation.respond(utterance);
    }
    assert!(conversation.is_finished());

    let reason = conversation.follow_up_reason().unwrap();
    let vars = HashMap::from([("link".to_string(), "https://example.org/d/1".to_string())]);
    let messages = FollowUpPlanner::default()
        .plan(conversation.context(), reason, &vars)
        .unwrap();

    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.is_complete()));
    assert!(messages[1].body.contains("20 लाख"));
    assert!(messages[1].body.contains("होम लोन"));
}
