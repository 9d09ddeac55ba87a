//! The recursive matcher walking the token stream against the schema.
//!
//! Tie-break at every token: sub-command name, then named argument, then
//! positional value. Value consumption is greedy but bounded: an argument
//! takes tokens up to its arity maximum, stopping early at any token that
//! itself names a known argument or sub-command of the current command.
//! Declaration order breaks all remaining ties.

use std::collections::HashMap;

use argonaut_core::{ArgId, ArgValue, CommandId, Schema};
use tracing::debug;

use crate::error::{ParseError, ParseErrorKind};
use crate::token::{Token, TokenKind};

/// Raw outcome of one matcher run, before diagnostics are collected.
#[derive(Debug)]
pub(crate) struct ParseRun {
    /// Structural errors, keyed by the command they occurred in.
    pub errors: HashMap<CommandId, Vec<ParseError>>,
    /// The invoked command chain, root first.
    pub invoked: Vec<CommandId>,
    /// Final value per argument of every invoked command.
    pub values: HashMap<ArgId, Option<ArgValue>>,
}

pub(crate) struct Parser<'s, 't> {
    schema: &'s mut Schema,
    tokens: &'t [Token],
    run: ParseRun,
}

impl<'s, 't> Parser<'s, 't> {
    pub fn parse(schema: &'s mut Schema, tokens: &'t [Token]) -> ParseRun {
        let root = schema.root();
        let mut parser = Parser {
            schema,
            tokens,
            run: ParseRun {
                errors: HashMap::new(),
                invoked: Vec::new(),
                values: HashMap::new(),
            },
        };
        parser.parse_command(root, 0);
        parser.run
    }

    fn error(&mut self, command: CommandId, kind: ParseErrorKind, position: Option<usize>) {
        self.run
            .errors
            .entry(command)
            .or_default()
            .push(ParseError::new(kind, position));
    }

    fn parse_command(&mut self, command: CommandId, start: usize) {
        self.run.invoked.push(command);

        let mut descend: Option<(CommandId, usize)> = None;
        let mut cursor = start;
        while cursor < self.tokens.len() {
            let kind = self.tokens[cursor].kind;
            match kind {
                TokenKind::Value => {
                    let text = self.tokens[cursor].text.clone();
                    if let Some(child) = self.schema.find_subcommand(command, &text) {
                        // the boundary is absolute: everything past this
                        // token belongs to the sub-command
                        debug!(command = %self.schema.command(child).name(), "descending into sub-command");
                        descend = Some((child, cursor + 1));
                        break;
                    }
                    cursor = self.claim_positional(command, cursor);
                }
                TokenKind::Literal => {
                    cursor = self.claim_positional(command, cursor);
                }
                TokenKind::ArgName => {
                    let (text, position) = self.token_parts(cursor);
                    if let Some(arg) = self.schema.find_argument(command, &text) {
                        cursor = self.feed(command, arg, position, cursor + 1);
                    } else {
                        self.error(command, ParseErrorKind::UnmatchedArgument(text), Some(position));
                        cursor += 1;
                    }
                }
                TokenKind::ArgNameWithValue => {
                    self.apply_assignment(command, cursor);
                    cursor += 1;
                }
                TokenKind::ArgNameList => {
                    cursor = self.resolve_name_list(command, cursor);
                }
                TokenKind::SubCommandName => {
                    // the tokenizer never emits this kind
                    cursor += 1;
                }
            }
        }

        self.finalize_command(command, descend.map(|(child, _)| child));

        if let Some((child, next)) = descend {
            self.parse_command(child, next);
        }
    }

    fn token_parts(&self, cursor: usize) -> (String, usize) {
        let token = &self.tokens[cursor];
        (token.text.clone(), token.position)
    }

    /// Assigns a loose value token to the next unfilled positional
    /// argument, letting it consume its own arity from the stream.
    fn claim_positional(&mut self, command: CommandId, cursor: usize) -> usize {
        let (text, position) = self.token_parts(cursor);

        let next_positional = self
            .schema
            .command(command)
            .arguments()
            .iter()
            .copied()
            .find(|&arg| {
                let argument = self.schema.argument(arg);
                argument.is_positional() && argument.usage_count() == 0
            });

        match next_positional {
            Some(arg) => self.feed(command, arg, position, cursor),
            None => {
                self.error(command, ParseErrorKind::UnexpectedValue(text), Some(position));
                cursor + 1
            }
        }
    }

    /// Consumes values for `arg` starting at `value_from`, invokes the
    /// coercion unit, and returns the new cursor.
    fn feed(&mut self, command: CommandId, arg: ArgId, name_position: usize, value_from: usize) -> usize {
        let (values, positions, next) = self.gather_values(command, arg, value_from);

        let argument = self.schema.argument(arg);
        let arity = argument.arity();
        if (values.len() as u16) < arity.min {
            let name = argument.name().to_string();
            self.error(
                command,
                ParseErrorKind::IncorrectValueCount {
                    name,
                    expected: arity,
                    received: values.len(),
                },
                Some(name_position),
            );
            self.schema.argument_mut(arg).touch(name_position);
            return next;
        }

        debug!(
            argument = %self.schema.argument(arg).name(),
            values = values.len(),
            "matched argument"
        );
        self.invoke(command, arg, &values, name_position, &positions);
        next
    }

    /// Greedy-but-bounded collection: up to the arity maximum, stopping at
    /// end of input or at any token claimed by another known name.
    fn gather_values(&self, command: CommandId, arg: ArgId, from: usize) -> (Vec<String>, Vec<usize>, usize) {
        let max = self.schema.argument(arg).arity().max;
        let mut values = Vec::new();
        let mut positions = Vec::new();
        let mut cursor = from;

        while cursor < self.tokens.len() {
            if max.is_some_and(|max| values.len() >= max as usize) {
                break;
            }
            let token = &self.tokens[cursor];
            if self.claims(command, token) {
                break;
            }
            values.push(token.text.clone());
            positions.push(token.position);
            cursor += 1;
        }

        (values, positions, cursor)
    }

    /// Whether a token names a known argument or sub-command of
    /// `command`, and would therefore end value consumption.
    fn claims(&self, command: CommandId, token: &Token) -> bool {
        match token.kind {
            TokenKind::ArgName => self.schema.find_argument(command, &token.text).is_some(),
            TokenKind::ArgNameList => {
                self.schema.find_argument(command, &token.text).is_some()
                    || self.cluster_head_matches(command, &token.text)
            }
            TokenKind::ArgNameWithValue => token
                .split_assignment()
                .is_some_and(|(name, _)| self.schema.find_argument(command, name).is_some()),
            TokenKind::Value => self.schema.find_subcommand(command, &token.text).is_some(),
            TokenKind::Literal | TokenKind::SubCommandName => false,
        }
    }

    fn cluster_head_matches(&self, command: CommandId, text: &str) -> bool {
        let mut chars = text.chars();
        let (Some(prefix), Some(head)) = (chars.next(), chars.next()) else {
            return false;
        };
        self.schema.find_argument_char(command, head, prefix).is_some()
    }

    /// Handles a `name=value` token.
    fn apply_assignment(&mut self, command: CommandId, cursor: usize) {
        let token = &self.tokens[cursor];
        let Some((name, value)) = token.split_assignment() else {
            return;
        };
        let (name, value) = (name.to_string(), value.to_string());
        let position = self.tokens[cursor].position;
        let value_position = position + name.len() + 1;

        let Some(arg) = self.schema.find_argument(command, &name) else {
            self.error(command, ParseErrorKind::UnmatchedArgument(name), Some(position));
            return;
        };

        // an assignment carries exactly one value, so it can only satisfy
        // an arity admitting one
        let arity = self.schema.argument(arg).arity();
        if arity.is_none() || arity.min > 1 {
            let name = self.schema.argument(arg).name().to_string();
            self.error(
                command,
                ParseErrorKind::IncorrectValueCount {
                    name,
                    expected: arity,
                    received: 1,
                },
                Some(position),
            );
            self.schema.argument_mut(arg).touch(position);
        } else {
            self.invoke(command, arg, &[value], position, &[value_position]);
        }
    }

    /// Resolves a single-prefix multi-character token.
    ///
    /// An exact multi-character name match wins; only when no argument
    /// matches the whole spelling is the token expanded left to right as a
    /// cluster of single-character names. Within the expansion, the first
    /// value-taking argument claims the remaining characters as its
    /// attached value (`-n5`) and ends the cluster.
    fn resolve_name_list(&mut self, command: CommandId, cursor: usize) -> usize {
        let (text, position) = self.token_parts(cursor);

        if let Some(arg) = self.schema.find_argument(command, &text) {
            return self.feed(command, arg, position, cursor + 1);
        }

        let mut chars = text.chars();
        let Some(prefix) = chars.next() else {
            return cursor + 1;
        };
        let body = chars.as_str().to_string();

        for (index, ch) in body.char_indices() {
            let char_position = position + prefix.len_utf8() + index;
            let Some(arg) = self.schema.find_argument_char(command, ch, prefix) else {
                self.error(
                    command,
                    ParseErrorKind::UnmatchedArgument(format!("{prefix}{}", &body[index..])),
                    Some(char_position),
                );
                return cursor + 1;
            };

            let arity = self.schema.argument(arg).arity();
            let remainder = &body[index + ch.len_utf8()..];

            if arity.is_none() {
                self.invoke(command, arg, &[], char_position, &[]);
                continue;
            }

            if remainder.is_empty() {
                // last character of the cluster; values follow as tokens
                return self.feed(command, arg, char_position, cursor + 1);
            }

            // attached value ends the expansion
            let value_position = char_position + ch.len_utf8();
            if arity.min > 1 {
                let name = self.schema.argument(arg).name().to_string();
                self.error(
                    command,
                    ParseErrorKind::IncorrectValueCount {
                        name,
                        expected: arity,
                        received: 1,
                    },
                    Some(char_position),
                );
                self.schema.argument_mut(arg).touch(char_position);
            } else {
                self.invoke(
                    command,
                    arg,
                    &[remainder.to_string()],
                    char_position,
                    &[value_position],
                );
            }
            return cursor + 1;
        }

        cursor + 1
    }

    fn invoke(&mut self, command: CommandId, arg: ArgId, values: &[String], name_position: usize, positions: &[usize]) {
        let accepted = self
            .schema
            .argument_mut(arg)
            .invoke(values, name_position, positions);
        if !accepted {
            let argument = self.schema.argument(arg);
            self.error(
                command,
                ParseErrorKind::IncorrectUsageCount {
                    name: argument.name().to_string(),
                    expected: argument.usage_arity(),
                    actual: argument.usage_count(),
                },
                Some(name_position),
            );
        }
    }

    /// Closes out a command once its token range is exhausted: checks
    /// usage counts, obligatory arguments, and group exclusivity, and
    /// resolves every argument's final value, all in declaration order.
    fn finalize_command(&mut self, command: CommandId, descended: Option<CommandId>) {
        let arg_ids: Vec<ArgId> = self.schema.command(command).arguments().to_vec();

        let unique_used = arg_ids.iter().any(|&arg| {
            let argument = self.schema.argument(arg);
            argument.allows_unique() && argument.usage_count() > 0
        });

        for arg in arg_ids {
            let argument = self.schema.argument(arg);
            let name = argument.name().to_string();
            let usage = argument.usage_count();
            let usage_arity = argument.usage_arity();
            let obligatory = argument.is_obligatory();
            let last_position = argument.last_position();
            let group = argument.group();

            let mut disqualified = false;
            if usage == 0 {
                if obligatory && !unique_used {
                    self.error(
                        command,
                        ParseErrorKind::ObligatoryNotUsed { name: name.clone() },
                        None,
                    );
                }
            } else {
                if usage < usage_arity.min {
                    self.error(
                        command,
                        ParseErrorKind::IncorrectUsageCount {
                            name: name.clone(),
                            expected: usage_arity,
                            actual: usage,
                        },
                        last_position,
                    );
                    disqualified = true;
                }
                if let Some(group) = group {
                    if let Some(violated) = self.schema.mark_group_usage(group) {
                        let group_name = self.schema.group(violated).name().to_string();
                        self.error(
                            command,
                            ParseErrorKind::ExclusivityViolation {
                                name: name.clone(),
                                group: group_name,
                            },
                            last_position,
                        );
                        disqualified = true;
                    }
                }
            }

            let value = self.schema.argument(arg).resolved_value(disqualified);
            self.run.values.insert(arg, value);
        }

        // un-invoked sub-commands are skipped entirely, except the
        // command-level obligatory hook
        let children: Vec<CommandId> = self.schema.command(command).children().to_vec();
        for child in children {
            if self.schema.command(child).is_obligatory() && descended != Some(child) {
                let name = self.schema.command(child).name().to_string();
                self.error(command, ParseErrorKind::ObligatoryCommandNotUsed(name), None);
            }
        }
    }
}
