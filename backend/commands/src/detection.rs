/// Split sigil-prefixed text into a command name and its arguments.
use crate::types::Invocation;

/// Parse `content` as a command invocation.
///
/// Returns `None` when `content` does not start with `sigil`. The name is
/// everything up to the first whitespace character; the rest, trimmed, is
/// the argument text. Unknown names are not rejected here.
pub fn parse_invocation(content: &str, sigil: &str) -> Option<Invocation> {
    let rest = content.strip_prefix(sigil)?;

    let (name, args) = rest
        .split_once(char::is_whitespace)
        .map(|(name, args)| (name, args.trim()))
        .unwrap_or((rest, ""));

    Some(Invocation { name: name.to_string(), args: args.to_string() })
}
