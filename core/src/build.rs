//! Schema construction: chained spec builders and build-time validation.
//!
//! Every schema-contract violation the engine can detect statically is
//! rejected here, before any parse runs: duplicate names, invalid name
//! formats, positional arguments that cannot take a value, dangling group
//! references, group cycles. Parsing itself never fails fatally.
//!
//! # Examples
//!
//! ```
//! use argonaut_core::{ArgSpec, CommandSpec, GroupSpec};
//! use argonaut_core::types::{IntCoercer, StringCoercer};
//!
//! let schema = CommandSpec::new("copy")
//!     .with_arg(ArgSpec::new("input", StringCoercer::default()).positional().obligatory())
//!     .with_arg(ArgSpec::new("retries", IntCoercer::default()).with_name("r"))
//!     .with_group(GroupSpec::new("mode").exclusive())
//!     .with_arg(ArgSpec::flag("fast").in_group("mode"))
//!     .with_arg(ArgSpec::flag("safe").in_group("mode"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.command(schema.root()).name(), "copy");
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::coerce::Coercer;
use crate::level::{ErrorLevel, ErrorThresholds};
use crate::schema::{ArgId, Argument, Command, CommandId, Group, GroupId, Schema};
use crate::types::BoolCoercer;
use crate::value::ArgValue;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("valid name pattern"));

/// Fatal schema-contract violations, detected at build time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A command, argument, or group name is empty or contains characters
    /// outside `[A-Za-z0-9_-]`.
    #[error("invalid name: '{0}'")]
    InvalidName(String),
    /// Two arguments of the same command share a name.
    #[error("duplicate argument name '{0}' in command '{1}'")]
    DuplicateArgument(String, String),
    /// Two sub-commands of the same parent share a name.
    #[error("duplicate command name '{0}' under '{1}'")]
    DuplicateCommand(String, String),
    /// Two groups of the same command share a name.
    #[error("duplicate group name '{0}' in command '{1}'")]
    DuplicateGroup(String, String),
    /// A positional argument's coercer consumes no values.
    #[error("positional argument '{0}' must accept at least one value")]
    PositionalWithoutValues(String),
    /// An argument references a group the command never declared.
    #[error("unknown group '{0}' referenced by argument '{1}'")]
    UnknownGroup(String, String),
    /// A group references a parent group the command never declared.
    #[error("unknown parent group '{0}' for group '{1}'")]
    UnknownParentGroup(String, String),
    /// A group's parent chain loops back on itself.
    #[error("group cycle detected at '{0}'")]
    GroupCycle(String),
}

/// Declarative spec for one argument.
pub struct ArgSpec {
    names: Vec<String>,
    description: Option<String>,
    prefix: char,
    obligatory: bool,
    positional: bool,
    allow_unique: bool,
    default: Option<ArgValue>,
    group: Option<String>,
    coercer: Box<dyn Coercer>,
}

impl ArgSpec {
    pub fn new(name: &str, coercer: impl Coercer + 'static) -> Self {
        Self {
            names: vec![name.to_string()],
            description: None,
            prefix: '-',
            obligatory: false,
            positional: false,
            allow_unique: false,
            default: None,
            group: None,
            coercer: Box::new(coercer),
        }
    }

    /// Creates a presence-only boolean flag.
    pub fn flag(name: &str) -> Self {
        Self::new(name, BoolCoercer::default())
    }

    /// Adds an alias; single-character aliases participate in clustering.
    pub fn with_name(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_prefix(mut self, prefix: char) -> Self {
        self.prefix = prefix;
        self
    }

    /// The argument must be used at least once, unless an `allow_unique`
    /// sibling was used instead.
    pub fn obligatory(mut self) -> Self {
        self.obligatory = true;
        self
    }

    /// The argument is matched by position among unclaimed values, in
    /// declaration order. It can still be used by name.
    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// Using this argument alone waives obligatory siblings.
    pub fn allow_unique(mut self) -> Self {
        self.allow_unique = true;
        self
    }

    pub fn with_default(mut self, default: ArgValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Assigns the argument to a group declared on the same command.
    pub fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }
}

/// Declarative spec for an argument group.
pub struct GroupSpec {
    name: String,
    exclusive: bool,
    parent: Option<String>,
}

impl GroupSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            exclusive: false,
            parent: None,
        }
    }

    /// At most one member (transitively) may be used per parse.
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    /// Nests this group inside another group of the same command.
    pub fn inside(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }
}

/// Declarative spec for a command and its whole subtree.
pub struct CommandSpec {
    names: Vec<String>,
    description: Option<String>,
    obligatory: bool,
    thresholds: ErrorThresholds,
    args: Vec<ArgSpec>,
    groups: Vec<GroupSpec>,
    children: Vec<CommandSpec>,
}

impl CommandSpec {
    pub fn new(name: &str) -> Self {
        Self {
            names: vec![name.to_string()],
            description: None,
            obligatory: false,
            thresholds: ErrorThresholds::default(),
            args: Vec::new(),
            groups: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_alias(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Marks the command itself as required whenever its parent runs.
    pub fn obligatory(mut self) -> Self {
        self.obligatory = true;
        self
    }

    pub fn with_display_level(mut self, level: ErrorLevel) -> Self {
        self.thresholds.display = level;
        self
    }

    pub fn with_exit_level(mut self, level: ErrorLevel) -> Self {
        self.thresholds.exit = level;
        self
    }

    pub fn with_arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_group(mut self, group: GroupSpec) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_subcommand(mut self, child: CommandSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Builds the schema, validating every static contract.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut schema = Schema {
            commands: Vec::new(),
            arguments: Vec::new(),
            groups: Vec::new(),
            root: CommandId(0),
        };
        let root = insert_command(&mut schema, self, None)?;
        schema.root = root;
        Ok(schema)
    }
}

fn check_name(name: &str) -> Result<(), SchemaError> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidName(name.to_string()))
    }
}

fn insert_command(
    schema: &mut Schema,
    spec: CommandSpec,
    parent: Option<CommandId>,
) -> Result<CommandId, SchemaError> {
    for name in &spec.names {
        check_name(name)?;
    }
    let command_name = spec.names[0].clone();

    let id = CommandId(schema.commands.len());
    schema.commands.push(Command {
        names: spec.names,
        description: spec.description,
        arguments: Vec::new(),
        children: Vec::new(),
        groups: Vec::new(),
        thresholds: spec.thresholds,
        obligatory: spec.obligatory,
        parent,
        notes: Vec::new(),
    });

    let group_ids = insert_groups(schema, id, &command_name, spec.groups)?;
    insert_arguments(schema, id, &command_name, spec.args, &group_ids)?;

    let mut seen_child_names: HashSet<String> = HashSet::new();
    for child_spec in spec.children {
        for name in &child_spec.names {
            if !seen_child_names.insert(name.clone()) {
                return Err(SchemaError::DuplicateCommand(name.clone(), command_name));
            }
        }
        let child = insert_command(schema, child_spec, Some(id))?;
        schema.commands[id.0].children.push(child);
    }

    Ok(id)
}

fn insert_groups(
    schema: &mut Schema,
    command: CommandId,
    command_name: &str,
    specs: Vec<GroupSpec>,
) -> Result<HashMap<String, GroupId>, SchemaError> {
    let mut ids: HashMap<String, GroupId> = HashMap::new();
    let mut parents: Vec<(GroupId, Option<String>)> = Vec::new();

    for spec in specs {
        check_name(&spec.name)?;
        if ids.contains_key(&spec.name) {
            return Err(SchemaError::DuplicateGroup(spec.name, command_name.to_string()));
        }
        let id = GroupId(schema.groups.len());
        schema.groups.push(Group {
            name: spec.name.clone(),
            exclusive: spec.exclusive,
            members: Vec::new(),
            parent: None,
            used: false,
        });
        schema.commands[command.0].groups.push(id);
        ids.insert(spec.name, id);
        parents.push((id, spec.parent));
    }

    // resolve parents in a second pass so declaration order does not matter
    for (id, parent_name) in parents {
        if let Some(parent_name) = parent_name {
            let parent = *ids.get(&parent_name).ok_or_else(|| {
                SchemaError::UnknownParentGroup(parent_name.clone(), schema.groups[id.0].name.clone())
            })?;
            schema.groups[id.0].parent = Some(parent);
        }
    }

    // walk each parent chain to reject cycles
    for &id in ids.values() {
        let mut visited = HashSet::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if !visited.insert(current) {
                return Err(SchemaError::GroupCycle(schema.groups[id.0].name.clone()));
            }
            cursor = schema.groups[current.0].parent;
        }
    }

    Ok(ids)
}

fn insert_arguments(
    schema: &mut Schema,
    command: CommandId,
    command_name: &str,
    specs: Vec<ArgSpec>,
    groups: &HashMap<String, GroupId>,
) -> Result<(), SchemaError> {
    let mut seen_names: HashSet<String> = HashSet::new();

    for spec in specs {
        for name in &spec.names {
            check_name(name)?;
            if !seen_names.insert(name.clone()) {
                return Err(SchemaError::DuplicateArgument(name.clone(), command_name.to_string()));
            }
        }

        if spec.positional && spec.coercer.arity().is_none() {
            return Err(SchemaError::PositionalWithoutValues(spec.names[0].clone()));
        }

        let group = match spec.group {
            Some(ref group_name) => Some(*groups.get(group_name).ok_or_else(|| {
                SchemaError::UnknownGroup(group_name.clone(), spec.names[0].clone())
            })?),
            None => None,
        };

        let id = ArgId(schema.arguments.len());
        schema.arguments.push(Argument {
            names: spec.names,
            description: spec.description,
            prefix: spec.prefix,
            obligatory: spec.obligatory,
            positional: spec.positional,
            allow_unique: spec.allow_unique,
            default: spec.default,
            group,
            owner: command,
            coercer: spec.coercer,
            usage_count: 0,
            last_position: None,
            errors: Vec::new(),
            notes: Vec::new(),
        });
        schema.commands[command.0].arguments.push(id);
        if let Some(group) = group {
            schema.groups[group.0].members.push(id);
        }
    }

    Ok(())
}
