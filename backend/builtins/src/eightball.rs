//! The magic 8-ball.
//!
//! Answers and insults are weighted tables. Questions that are not yes/no
//! questions get an insult instead of an answer.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use sigil_commands::{Command, CommandHandler};
use sigil_core::{InboundMessage, Transport};
use sigil_plugins::{Plugin, PluginHost};
use sigil_sampler::WeightedTable;

const CONFIG_KEY: &str = "8ball";

static WRONG_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i:how|what|when|where|which|who|why)").unwrap());

const DEFAULT_ANSWERS: &[&str] = &[
    "It is certain.",
    "It is decidedly so.",
    "Without a doubt.",
    "Yes definitely.",
    "You may rely on it.",
    "As I see it, yes.",
    "Most likely.",
    "Outlook good.",
    "Yes.",
    "Signs point to yes.",
    "Reply hazy try again.",
    "Ask again later.",
    "Better not tell you now.",
    "Cannot predict now.",
    "Concentrate and ask again.",
    "Don't count on it.",
    "My reply is no.",
    "My sources say no.",
    "Outlook not so good.",
    "Very doubtful.",
];

const DEFAULT_INSULTS: &[&str] = &[
    "How should I know?",
    "What kind of question is that?",
    "I don't think you understand the meaning of \"yes or no\".",
];

/// One possible reply. Each line is sent as its own message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    #[serde(rename = "Text", alias = "text", default)]
    pub text: Vec<String>,
    #[serde(rename = "Weight", alias = "weight", default)]
    pub weight: f64,
}

impl Response {
    fn single(text: &str) -> Self {
        Self { text: vec![text.to_string()], weight: 1.0 }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EightBallConfig {
    #[serde(rename = "Answers", alias = "answers")]
    answers: Vec<Response>,
    #[serde(rename = "Insults", alias = "insults")]
    insults: Vec<Response>,
}

fn or_defaults(responses: Vec<Response>, defaults: &[&str]) -> Vec<Response> {
    if responses.is_empty() {
        defaults.iter().map(|t| Response::single(t)).collect()
    } else {
        responses
    }
}

fn table(responses: Vec<Response>, seed: Option<u64>) -> Result<WeightedTable<Vec<String>>, sigil_sampler::SamplerError> {
    let entries = responses.into_iter().map(|r| (r.text, r.weight));
    match seed {
        Some(seed) => WeightedTable::with_seed(entries, seed),
        None => WeightedTable::new(entries),
    }
}

pub struct EightBall {
    answers: WeightedTable<Vec<String>>,
    insults: WeightedTable<Vec<String>>,
}

impl EightBall {
    /// Build from response lists; an empty list falls back to the classic set.
    pub fn new(answers: Vec<Response>, insults: Vec<Response>) -> Result<Self> {
        Self::build(answers, insults, None)
    }

    /// Deterministic draws, for tests.
    pub fn with_seed(answers: Vec<Response>, insults: Vec<Response>, seed: u64) -> Result<Self> {
        Self::build(answers, insults, Some(seed))
    }

    fn build(answers: Vec<Response>, insults: Vec<Response>, seed: Option<u64>) -> Result<Self> {
        let answers = table(or_defaults(answers, DEFAULT_ANSWERS), seed).context("invalid 8ball answers")?;
        let insults = table(or_defaults(insults, DEFAULT_INSULTS), seed).context("invalid 8ball insults")?;
        Ok(Self { answers, insults })
    }

    /// The lines to send for `question`.
    pub fn reply(&self, question: &str) -> &[String] {
        if WRONG_QUESTION.is_match(question) {
            self.insults.choose()
        } else {
            self.answers.choose()
        }
    }

    pub fn command(self) -> Command {
        Command::new("8ball", Arc::new(self))
            .comment("ask a yes-no question")
            .usage(["8ball [<question>]"])
            .description("Ask the 8ball a yes or no question (question optional).")
    }
}

#[async_trait]
impl CommandHandler for EightBall {
    async fn execute(&self, session: &dyn Transport, msg: &InboundMessage) -> Result<()> {
        for line in self.reply(&msg.content) {
            session.send_message(&msg.channel_id, line).await?;
        }
        Ok(())
    }
}

/// Registers `8ball` and its hidden emoji alias.
pub struct EightBallPlugin;

#[async_trait]
impl Plugin for EightBallPlugin {
    fn name(&self) -> &str {
        CONFIG_KEY
    }

    async fn load(&self, host: &dyn PluginHost) -> Result<()> {
        let cfg: EightBallConfig = host.config().get_or_default(CONFIG_KEY)?;
        let command = EightBall::new(cfg.answers, cfg.insults)?.command();
        host.add_command(command.alias("\u{1F3B1}").hidden()).await;
        host.add_command(command).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bot_with, message};
    use serde_json::json;
    use sigil_core::testing::RecordingTransport;

    fn lines(texts: &[&str]) -> Response {
        Response { text: texts.iter().map(|t| t.to_string()).collect(), weight: 1.0 }
    }

    #[test]
    fn wh_questions_get_insults() {
        let ball = EightBall::with_seed(vec![lines(&["yes"])], vec![lines(&["rude"])], 1).unwrap();
        for q in ["how are you", "What?", "WHY", "whom do I ask", "Who"] {
            assert_eq!(ball.reply(q), ["rude".to_string()], "question {q:?}");
        }
        for q in ["Will it rain?", "", "is it how?", " how"] {
            assert_eq!(ball.reply(q), ["yes".to_string()], "question {q:?}");
        }
    }

    #[test]
    fn empty_lists_use_classic_responses() {
        let ball = EightBall::with_seed(Vec::new(), Vec::new(), 7).unwrap();
        for _ in 0..50 {
            let answer = &ball.reply("Will it work?")[0];
            assert!(DEFAULT_ANSWERS.contains(&answer.as_str()));
            let insult = &ball.reply("why")[0];
            assert!(DEFAULT_INSULTS.contains(&insult.as_str()));
        }
    }

    #[test]
    fn zero_weight_response_is_never_chosen() {
        let never = Response { text: vec!["never".into()], weight: 0.0 };
        let ball = EightBall::with_seed(vec![never, lines(&["always"])], Vec::new(), 3).unwrap();
        for _ in 0..200 {
            assert_eq!(ball.reply("Is it?"), ["always".to_string()]);
        }
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let dud = Response { text: vec!["x".into()], weight: 0.0 };
        let err = EightBall::new(vec![dud], Vec::new()).err().unwrap();
        assert!(format!("{err:#}").contains("invalid 8ball answers"));
    }

    #[tokio::test]
    async fn sends_each_line_separately() {
        let ball = EightBall::with_seed(vec![lines(&["Hmm.", "Yes."])], Vec::new(), 1).unwrap();
        let session = RecordingTransport::new("bot");
        let msg = InboundMessage::new("m", "c", sigil_core::Author::new("u", "u"), "Is it?");

        ball.execute(&session, &msg).await.unwrap();
        assert_eq!(session.sent_texts(), vec!["Hmm.".to_string(), "Yes.".to_string()]);
    }

    #[tokio::test]
    async fn loads_responses_from_config() {
        let bot = bot_with(json!({
            "8ball": {"Answers": [{"Text": ["configured"], "Weight": 2}], "insults": [{"text": ["nope"], "weight": 1}]}
        }))
        .await;
        bot.add_plugin(Arc::new(EightBallPlugin)).await.unwrap();
        let session = RecordingTransport::new("bot");

        bot.handle_event(&session, &message("alice", "!8ball will it?")).await;
        bot.handle_event(&session, &message("alice", "!\u{1F3B1} who knows")).await;
        assert_eq!(session.sent_texts(), vec!["configured".to_string(), "nope".to_string()]);

        let alias = bot.get_command("\u{1F3B1}").await.unwrap();
        assert!(alias.hidden);
        assert_eq!(alias.comment, "ask a yes-no question");
    }

    #[tokio::test]
    async fn malformed_config_fails_load() {
        let bot = bot_with(json!({"8ball": {"Answers": "not a list"}})).await;
        let err = bot.add_plugin(Arc::new(EightBallPlugin)).await.unwrap_err();
        assert_eq!(err.plugin_name(), Some("8ball"));
    }
}
