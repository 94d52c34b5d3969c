//! Parses the `--agents` flag into the spawn orchestrator's input
//! mapping (spec §4.5: "agent-tag → (command, count)").
//!
//! Grammar, comma-separated entries: `tag`, `tag:count`, or
//! `tag:command:count`. A bare `tag` defaults both `command` and `count`
//! to `tag` and `1`. The literal tag `random` draws its own command from
//! the name generator at spawn time regardless of what's given here
//! (spec §4.5 step 1), so `random:command:n` accepts but ignores the
//! command field.

use swarm_core::AgentSpec;

pub fn parse(raw: &str) -> Result<Vec<AgentSpec>, String> {
    let mut specs = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        specs.push(parse_entry(entry)?);
    }
    if specs.is_empty() {
        return Err("--agents must name at least one agent".to_string());
    }
    Ok(specs)
}

fn parse_entry(entry: &str) -> Result<AgentSpec, String> {
    let parts: Vec<&str> = entry.split(':').collect();
    match parts.as_slice() {
        [tag] => Ok(AgentSpec::new(*tag, *tag, 1)),
        [tag, count] => {
            let count = parse_count(count)?;
            Ok(AgentSpec::new(*tag, *tag, count))
        }
        [tag, command, count] => {
            let count = parse_count(count)?;
            Ok(AgentSpec::new(*tag, *command, count))
        }
        _ => Err(format!("invalid agent spec \"{entry}\": expected tag[:command]:count")),
    }
}

fn parse_count(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid count \"{raw}\": must be a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_tag_defaults_command_and_count() {
        let specs = parse("claude").expect("parse");
        assert_eq!(specs, vec![AgentSpec::new("claude", "claude", 1)]);
    }

    #[test]
    fn tag_with_count_keeps_command_equal_to_tag() {
        let specs = parse("claude:3").expect("parse");
        assert_eq!(specs, vec![AgentSpec::new("claude", "claude", 3)]);
    }

    #[test]
    fn tag_with_explicit_command_and_count() {
        let specs = parse("claude:claude --danger:2").expect("parse");
        assert_eq!(specs, vec![AgentSpec::new("claude", "claude --danger", 2)]);
    }

    #[test]
    fn multiple_entries_are_comma_separated() {
        let specs = parse("claude:2,codex:1").expect("parse");
        assert_eq!(
            specs,
            vec![AgentSpec::new("claude", "claude", 2), AgentSpec::new("codex", "codex", 1)]
        );
    }

    #[test]
    fn empty_string_is_rejected() {
        assert!(parse("").is_err());
    }

    #[test]
    fn non_numeric_count_is_rejected() {
        assert!(parse("claude:many").is_err());
    }
}
