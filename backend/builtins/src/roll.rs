//! Dice rolling: `[<n>]d<sides>[+|-<modifier>]`.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::Deserialize;
use sigil_commands::{Command, CommandHandler};
use sigil_core::{InboundMessage, Transport};
use sigil_plugins::{Plugin, PluginHost};

const CONFIG_KEY: &str = "roll";

static ROLL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([1-9][0-9]*)?d([1-9][0-9]*)([+-][1-9][0-9]*)?").unwrap());

/// Inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

impl Bounds {
    fn contains(&self, n: i64) -> bool {
        self.min <= n && n <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollLimits {
    pub dice: Bounds,
    pub sides: Bounds,
    pub modifier: Bounds,
}

impl Default for RollLimits {
    fn default() -> Self {
        Self {
            dice: Bounds { min: 1, max: 100 },
            sides: Bounds { min: 2, max: 1000 },
            modifier: Bounds { min: -1_000_000, max: 1_000_000 },
        }
    }
}

/// Config overrides; anything left out keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BoundsPatch {
    #[serde(rename = "Min", alias = "min")]
    min: Option<i64>,
    #[serde(rename = "Max", alias = "max")]
    max: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LimitsPatch {
    #[serde(rename = "Dice", alias = "dice")]
    dice: BoundsPatch,
    #[serde(rename = "Sides", alias = "sides")]
    sides: BoundsPatch,
    #[serde(rename = "Modifier", alias = "modifier")]
    modifier: BoundsPatch,
}

impl BoundsPatch {
    fn apply(&self, to: Bounds) -> Bounds {
        Bounds { min: self.min.unwrap_or(to.min), max: self.max.unwrap_or(to.max) }
    }
}

impl LimitsPatch {
    fn apply(&self, to: RollLimits) -> RollLimits {
        RollLimits {
            dice: self.dice.apply(to.dice),
            sides: self.sides.apply(to.sides),
            modifier: self.modifier.apply(to.modifier),
        }
    }
}

impl RollLimits {
    fn validate(&self) -> Result<()> {
        for (what, b) in [("dice", self.dice), ("sides", self.sides), ("modifier", self.modifier)] {
            if b.min > b.max {
                bail!("invalid roll limits: {what} min {} exceeds max {}", b.min, b.max);
            }
        }
        if self.dice.min < 1 || self.sides.min < 1 {
            bail!("invalid roll limits: dice and sides must be at least 1");
        }
        Ok(())
    }
}

/// A parsed, in-bounds roll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollSpec {
    pub dice: i64,
    pub sides: i64,
    pub modifier: i64,
}

fn parse_number(text: &str, what: &str) -> Result<i64> {
    text.parse().with_context(|| format!("failed to parse {what} ({text:?})"))
}

/// Parse the leading dice expression of `args`. Text that does not start
/// with one yields `Ok(None)`; anything after the expression is ignored.
pub fn parse_roll(args: &str, limits: &RollLimits) -> Result<Option<RollSpec>> {
    let Some(caps) = ROLL_PATTERN.captures(args) else {
        return Ok(None);
    };

    let dice = match caps.get(1) {
        Some(m) => parse_number(m.as_str(), "dice")?,
        None => limits.dice.min,
    };
    let sides = parse_number(&caps[2], "sides")?;
    let modifier = match caps.get(3) {
        Some(m) => parse_number(m.as_str(), "modifier")?,
        None => 0,
    };

    for (what, n, b) in [("dice", dice, limits.dice), ("sides", sides, limits.sides), ("modifier", modifier, limits.modifier)] {
        if !b.contains(n) {
            bail!("roll failed: {what} out of bounds ({n}, min = {}, max = {})", b.min, b.max);
        }
    }
    Ok(Some(RollSpec { dice, sides, modifier }))
}

/// Roll every die, returning the individual results.
pub fn roll_dice<R: Rng>(spec: &RollSpec, rng: &mut R) -> Vec<i64> {
    (0..spec.dice).map(|_| rng.gen_range(1..=spec.sides)).collect()
}

/// `a + b + c - m = total`; the total only when it adds information.
pub fn format_roll(rolls: &[i64], modifier: i64) -> String {
    let mut text = rolls.iter().map(i64::to_string).collect::<Vec<_>>().join(" + ");
    if modifier > 0 {
        text.push_str(&format!(" + {modifier}"));
    } else if modifier < 0 {
        text.push_str(&format!(" - {}", modifier.unsigned_abs()));
    }
    if rolls.len() > 1 || modifier != 0 {
        let total = rolls.iter().sum::<i64>() + modifier;
        text.push_str(&format!(" = {total}"));
    }
    text
}

pub struct Roll {
    limits: RollLimits,
}

impl Roll {
    pub fn new(limits: RollLimits) -> Self {
        Self { limits }
    }

    pub fn command(self) -> Command {
        let l = self.limits;
        let description = format!(
            "Roll {} to {} dice each with {} to {} sides with an optional modifier between {} and {}. \
             If <number of dice> is missing, it will default to the minimum. \
             Additional text may be included after the command.",
            l.dice.min, l.dice.max, l.sides.min, l.sides.max, l.modifier.min, l.modifier.max
        );
        Command::new("roll", Arc::new(self))
            .comment("roll dice")
            .usage(["roll [<number of dice>]d<number of sides>[+|-<modifier>] [<text>]"])
            .description(description)
    }
}

#[async_trait]
impl CommandHandler for Roll {
    async fn execute(&self, session: &dyn Transport, msg: &InboundMessage) -> Result<()> {
        let Some(spec) = parse_roll(&msg.content, &self.limits)? else {
            return Ok(());
        };
        let rolls = roll_dice(&spec, &mut rand::thread_rng());
        session.send_message(&msg.channel_id, &format_roll(&rolls, spec.modifier)).await
    }
}

/// Registers `roll` and its hidden emoji alias.
pub struct RollPlugin;

#[async_trait]
impl Plugin for RollPlugin {
    fn name(&self) -> &str {
        CONFIG_KEY
    }

    async fn load(&self, host: &dyn PluginHost) -> Result<()> {
        let patch: LimitsPatch = host.config().get_or_default(CONFIG_KEY)?;
        let limits = patch.apply(RollLimits::default());
        limits.validate()?;

        let command = Roll::new(limits).command();
        host.add_command(command.alias("\u{1F3B2}").hidden()).await;
        host.add_command(command).await;
        Ok(())
    }
}
