//! The declarative schema tree: commands, arguments, and groups.
//!
//! All nodes live in arena vectors owned by [`Schema`] and reference each
//! other through plain index handles ([`CommandId`], [`ArgId`],
//! [`GroupId`]); parent links are lookups, never ownership. The tree's
//! structure is immutable after [`build`](crate::CommandSpec::build) — only
//! per-parse state (usage counters, coerced values, error lists) mutates,
//! and [`Schema::reset`] restores it, making the schema re-entrant across
//! sequential parses.

use std::collections::BTreeSet;

use crate::coerce::{Coercer, CoercionSink, Note};
use crate::level::ErrorThresholds;
use crate::range::Range;
use crate::value::ArgValue;

/// Handle to a command in the schema arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub(crate) usize);

/// Handle to an argument in the schema arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgId(pub(crate) usize);

/// Handle to an argument group in the schema arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

/// A command node: names, arguments in declaration order, sub-commands,
/// groups, and reporting thresholds.
#[derive(Debug)]
pub struct Command {
    pub(crate) names: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) arguments: Vec<ArgId>,
    pub(crate) children: Vec<CommandId>,
    pub(crate) groups: Vec<GroupId>,
    pub(crate) thresholds: ErrorThresholds,
    pub(crate) obligatory: bool,
    pub(crate) parent: Option<CommandId>,
    pub(crate) notes: Vec<Note>,
}

impl Command {
    /// The primary (first declared) name.
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Argument handles in declaration order.
    pub fn arguments(&self) -> &[ArgId] {
        &self.arguments
    }

    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    pub fn thresholds(&self) -> ErrorThresholds {
        self.thresholds
    }

    /// Whether this command must be invoked whenever its parent is.
    pub fn is_obligatory(&self) -> bool {
        self.obligatory
    }

    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    /// Custom errors attached by the caller.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// An argument node plus its per-parse runtime state.
#[derive(Debug)]
pub struct Argument {
    pub(crate) names: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) prefix: char,
    pub(crate) obligatory: bool,
    pub(crate) positional: bool,
    pub(crate) allow_unique: bool,
    pub(crate) default: Option<ArgValue>,
    pub(crate) group: Option<GroupId>,
    pub(crate) owner: CommandId,
    pub(crate) coercer: Box<dyn Coercer>,
    // per-parse state
    pub(crate) usage_count: u16,
    pub(crate) last_position: Option<usize>,
    pub(crate) errors: Vec<Note>,
    pub(crate) notes: Vec<Note>,
}

impl Argument {
    /// The primary (first declared) name.
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn is_obligatory(&self) -> bool {
        self.obligatory
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    /// Whether using this argument alone satisfies obligatory siblings.
    pub fn allows_unique(&self) -> bool {
        self.allow_unique
    }

    pub fn default_value(&self) -> Option<&ArgValue> {
        self.default.as_ref()
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn owner(&self) -> CommandId {
        self.owner
    }

    /// Raw values consumed per invocation.
    pub fn arity(&self) -> Range {
        self.coercer.arity()
    }

    /// Times the argument may appear across a parse.
    pub fn usage_arity(&self) -> Range {
        self.coercer.usage_arity()
    }

    pub fn usage_count(&self) -> u16 {
        self.usage_count
    }

    /// Input position of the most recent invocation's name token.
    pub fn last_position(&self) -> Option<usize> {
        self.last_position
    }

    /// Coercion errors recorded so far, already anchored to input
    /// positions.
    pub fn errors(&self) -> &[Note] {
        &self.errors
    }

    /// Custom errors attached by the caller.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn representation(&self) -> &'static str {
        self.coercer.representation()
    }

    /// Checks a full token against this argument's names, accepting both
    /// the single and the doubled prefix form (`-x` and `--x` for a
    /// registered name `x` with prefix `-`).
    pub fn matches(&self, text: &str) -> bool {
        let Some(name) = strip_prefix(text, self.prefix) else {
            return false;
        };
        !name.is_empty() && self.names.iter().any(|n| n == name)
    }

    /// Checks a bare single-character name, as used in cluster expansion.
    pub fn matches_char(&self, name: char) -> bool {
        self.names
            .iter()
            .any(|n| n.chars().count() == 1 && n.starts_with(name))
    }

    /// Feeds one invocation's values to the coercion unit.
    ///
    /// `name_position` is the input offset of the token that named the
    /// argument; `value_positions` gives the offset of each raw value, in
    /// order. Returns `false` when the invocation exceeds the declared
    /// usage arity, in which case coercion is skipped and the caller
    /// records the usage-count error.
    pub fn invoke(&mut self, values: &[String], name_position: usize, value_positions: &[usize]) -> bool {
        debug_assert_eq!(values.len(), value_positions.len());

        self.usage_count += 1;
        if !self.coercer.usage_arity().admits(self.usage_count) {
            return false;
        }

        self.last_position = Some(name_position);
        let mut sink = CoercionSink::new(values.len());
        self.coercer.coerce(values, &mut sink);

        for issue in sink.into_issues() {
            let position = match issue.value_index {
                Some(index) => value_positions.get(index).copied(),
                None => None,
            }
            .or(Some(name_position));
            self.errors.push(Note::new(issue.message, issue.level, position));
        }
        true
    }

    /// Counts an invocation without coercing anything. Used when the
    /// occurrence was malformed (too few values) but the argument was
    /// still named.
    pub fn touch(&mut self, name_position: usize) {
        self.usage_count += 1;
        self.last_position = Some(name_position);
    }

    /// Resolves the final value: the coerced value when the argument was
    /// used and not disqualified, otherwise the declared default, or the
    /// type's initial value.
    pub fn resolved_value(&self, disqualified: bool) -> Option<ArgValue> {
        let fallback = || self.default.clone().or_else(|| self.coercer.initial_value());
        if disqualified || self.usage_count == 0 {
            return fallback();
        }
        self.coercer.value().or_else(fallback)
    }

    fn reset(&mut self) {
        self.usage_count = 0;
        self.last_position = None;
        self.errors.clear();
        self.coercer.reset();
    }
}

/// A named subset of a command's arguments, optionally exclusive, nestable
/// through a parent link. Exclusivity is enforced transitively up the
/// parent chain.
#[derive(Debug)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) exclusive: bool,
    pub(crate) members: Vec<ArgId>,
    pub(crate) parent: Option<GroupId>,
    // per-parse state
    pub(crate) used: bool,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn members(&self) -> &[ArgId] {
        &self.members
    }

    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }
}

/// The built schema tree. Construct through [`CommandSpec::build`].
///
/// [`CommandSpec::build`]: crate::CommandSpec::build
#[derive(Debug)]
pub struct Schema {
    pub(crate) commands: Vec<Command>,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) groups: Vec<Group>,
    pub(crate) root: CommandId,
}

impl Schema {
    pub fn root(&self) -> CommandId {
        self.root
    }

    pub fn command(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    pub fn argument(&self, id: ArgId) -> &Argument {
        &self.arguments[id.0]
    }

    pub fn argument_mut(&mut self, id: ArgId) -> &mut Argument {
        &mut self.arguments[id.0]
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    /// Command handles in pre-order, root first. This is the traversal
    /// order diagnostics are gathered in.
    pub fn preorder(&self) -> Vec<CommandId> {
        let mut order = Vec::with_capacity(self.commands.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            for &child in self.command(id).children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Finds a direct sub-command of `parent` by exact name.
    pub fn find_subcommand(&self, parent: CommandId, name: &str) -> Option<CommandId> {
        self.command(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.command(child).has_name(name))
    }

    /// Finds an argument of `command` matching a full prefixed token.
    pub fn find_argument(&self, command: CommandId, text: &str) -> Option<ArgId> {
        self.command(command)
            .arguments
            .iter()
            .copied()
            .find(|&arg| self.argument(arg).matches(text))
    }

    /// Finds an argument of `command` with the given single-character name
    /// and cluster prefix.
    pub fn find_argument_char(&self, command: CommandId, name: char, prefix: char) -> Option<ArgId> {
        self.command(command).arguments.iter().copied().find(|&arg| {
            let argument = self.argument(arg);
            argument.prefix == prefix && argument.matches_char(name)
        })
    }

    /// Every prefix character declared by any argument. Feeds the
    /// tokenizer so it stays schema-agnostic.
    pub fn prefix_chars(&self) -> Vec<char> {
        let set: BTreeSet<char> = self.arguments.iter().map(|arg| arg.prefix).collect();
        set.into_iter().collect()
    }

    /// Marks the group chain of `group` as used. Returns the first
    /// exclusive group in the chain that already had a different user,
    /// i.e. the group whose exclusivity this usage violates.
    pub fn mark_group_usage(&mut self, group: GroupId) -> Option<GroupId> {
        let mut chain = Vec::new();
        let mut cursor = Some(group);
        while let Some(id) = cursor {
            chain.push(id);
            cursor = self.groups[id.0].parent;
        }

        let violated = chain
            .iter()
            .copied()
            .find(|&id| self.groups[id.0].exclusive && self.groups[id.0].used);

        for id in chain {
            self.groups[id.0].used = true;
        }
        violated
    }

    /// Attaches a custom error to a command; it flows through the
    /// collector with the same ordering rules as built-in errors.
    pub fn attach_command_note(&mut self, command: CommandId, note: Note) {
        self.commands[command.0].notes.push(note);
    }

    /// Attaches a custom error to an argument.
    pub fn attach_argument_note(&mut self, argument: ArgId, note: Note) {
        self.arguments[argument.0].notes.push(note);
    }

    /// Removes all attached custom errors. Separate from [`Schema::reset`]
    /// so notes injected for the upcoming parse survive the reset.
    pub fn clear_notes(&mut self) {
        for command in &mut self.commands {
            command.notes.clear();
        }
        for argument in &mut self.arguments {
            argument.notes.clear();
        }
    }

    /// Clears all per-parse state: usage counters, coerced values, error
    /// lists, and group markers. Must run before every fresh parse; the
    /// engine's entry points do so.
    pub fn reset(&mut self) {
        for argument in &mut self.arguments {
            argument.reset();
        }
        for group in &mut self.groups {
            group.used = false;
        }
    }
}

fn strip_prefix(text: &str, prefix: char) -> Option<&str> {
    let rest = text.strip_prefix(prefix)?;
    Some(rest.strip_prefix(prefix).unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{ArgSpec, CommandSpec};
    use crate::types::{IntCoercer, StringCoercer};

    fn sample() -> Schema {
        CommandSpec::new("app")
            .with_arg(ArgSpec::new("number", IntCoercer::default()).with_name("n"))
            .with_subcommand(CommandSpec::new("run").with_arg(ArgSpec::new("target", StringCoercer::default())))
            .build()
            .expect("valid schema")
    }

    #[test]
    fn test_argument_matches_single_and_doubled_prefix() {
        let schema = sample();
        let root = schema.root();
        assert!(schema.find_argument(root, "-number").is_some());
        assert!(schema.find_argument(root, "--number").is_some());
        assert!(schema.find_argument(root, "-n").is_some());
        assert!(schema.find_argument(root, "number").is_none());
        assert!(schema.find_argument(root, "--missing").is_none());
    }

    #[test]
    fn test_find_subcommand_is_exact() {
        let schema = sample();
        assert!(schema.find_subcommand(schema.root(), "run").is_some());
        assert!(schema.find_subcommand(schema.root(), "ru").is_none());
    }

    #[test]
    fn test_reset_clears_runtime_state() {
        let mut schema = sample();
        let arg = schema.find_argument(schema.root(), "--number").unwrap();
        assert!(schema.argument_mut(arg).invoke(&["5".into()], 0, &[9]));
        assert_eq!(schema.argument(arg).usage_count(), 1);

        schema.reset();
        let argument = schema.argument(arg);
        assert_eq!(argument.usage_count(), 0);
        assert_eq!(argument.last_position(), None);
        assert_eq!(argument.resolved_value(false), None);
    }

    #[test]
    fn test_invoke_anchors_coercion_errors_at_value_position() {
        let mut schema = sample();
        let arg = schema.find_argument(schema.root(), "--number").unwrap();
        assert!(schema.argument_mut(arg).invoke(&["abc".into()], 0, &[9]));

        let errors = schema.argument(arg).errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].position, Some(9));
    }

    #[test]
    fn test_preorder_starts_at_root() {
        let schema = sample();
        let order = schema.preorder();
        assert_eq!(order[0], schema.root());
        assert_eq!(order.len(), 2);
    }
}
