//! End-to-end parses against small hand-built schemas.

use argonaut_core::{ArgSpec, ArgValue, CommandSpec, ErrorLevel, GroupSpec, Note, Range, Schema};
use argonaut_core::types::{CounterCoercer, IntCoercer, PairCoercer, StringCoercer};
use argonaut_parsing::{parse_args, parse_line};

fn basic_schema() -> Schema {
    CommandSpec::new("app")
        .with_arg(ArgSpec::new("num", IntCoercer::default()).with_name("n"))
        .with_arg(ArgSpec::flag("verbose").with_name("v"))
        .build()
        .expect("schema should build")
}

// ---- defaults and empty input ----

#[test]
fn test_empty_input_resolves_defaults() {
    let mut schema = basic_schema();
    let result = parse_line(&mut schema, "");

    assert!(!result.failed());
    assert!(result.diagnostics().is_empty());
    assert_eq!(
        result.value(&schema, "verbose").and_then(|v| v.as_bool()),
        Some(false),
    );
    // no default and no initial value, so the int stays unset
    assert!(result.value(&schema, "num").is_none());
}

#[test]
fn test_declared_default_survives_absence() {
    let mut schema = CommandSpec::new("app")
        .with_arg(
            ArgSpec::new("port", IntCoercer::default()).with_default(ArgValue::Int(8080)),
        )
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "");
    assert_eq!(
        result.value(&schema, "port").and_then(|v| v.as_int()),
        Some(8080),
    );
}

// ---- name spellings ----

#[test]
fn test_space_equals_and_attached_spellings_are_equivalent() {
    for input in ["--num 5", "--num=5", "-n5", "-n 5", "-n=5"] {
        let mut schema = basic_schema();
        let result = parse_line(&mut schema, input);

        assert!(!result.failed(), "input {input:?} failed: {:?}", result.diagnostics());
        assert_eq!(
            result.value(&schema, "num").and_then(|v| v.as_int()),
            Some(5),
            "input {input:?}",
        );
    }
}

#[test]
fn test_assignment_cannot_satisfy_multi_value_arity() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::new(
            "coords",
            PairCoercer::new(IntCoercer::default(), StringCoercer::default()),
        ))
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "--coords=3");
    assert!(result.failed());
    assert_eq!(result.diagnostics().len(), 1);
    assert!(result.diagnostics()[0]
        .message
        .contains("expects exactly 2 value(s), got 1"));
    assert_eq!(result.diagnostics()[0].position, Some(0));
    assert!(result.value(&schema, "coords").is_none());
}

#[test]
fn test_unknown_argument_is_reported_and_recovered() {
    let mut schema = basic_schema();
    let result = parse_line(&mut schema, "--bogus --num 7");

    assert!(result.failed());
    assert_eq!(result.diagnostics().len(), 1);
    assert!(result.diagnostics()[0].message.contains("unknown argument '--bogus'"));
    // the parse still completes and later arguments still match
    assert_eq!(result.value(&schema, "num").and_then(|v| v.as_int()), Some(7));
}

// ---- clustering ----

#[test]
fn test_cluster_invokes_each_flag_once() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::flag("a"))
        .with_arg(ArgSpec::flag("b"))
        .with_arg(ArgSpec::flag("c"))
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "-abc");
    assert!(!result.failed());
    for name in ["a", "b", "c"] {
        assert_eq!(
            result.value(&schema, name).and_then(|v| v.as_bool()),
            Some(true),
            "flag {name}",
        );
    }
}

#[test]
fn test_exact_multi_character_name_beats_clustering() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::flag("a"))
        .with_arg(ArgSpec::flag("b"))
        .with_arg(ArgSpec::flag("ab"))
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "-ab");
    assert!(!result.failed());
    assert_eq!(result.value(&schema, "ab").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(result.value(&schema, "a").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(result.value(&schema, "b").and_then(|v| v.as_bool()), Some(false));
}

#[test]
fn test_unknown_cluster_character_reports_remainder() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::flag("a"))
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "-ax");
    assert!(result.failed());
    assert_eq!(result.diagnostics().len(), 1);
    assert!(result.diagnostics()[0].message.contains("unknown argument '-x'"));
    // the known prefix of the cluster still applied
    assert_eq!(result.value(&schema, "a").and_then(|v| v.as_bool()), Some(true));
}

// ---- obligatory arguments ----

#[test]
fn test_obligatory_argument_missing_reports_once() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::new("input", StringCoercer::default()).obligatory())
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "");
    assert!(result.failed());
    let hits: Vec<_> = result
        .diagnostics()
        .iter()
        .filter(|d| d.message.contains("is obligatory"))
        .collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].position, None);
}

#[test]
fn test_obligatory_argument_present_is_clean() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::new("input", StringCoercer::default()).obligatory())
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "--input data.txt");
    assert!(!result.failed());
    assert!(result.diagnostics().is_empty());
}

#[test]
fn test_allow_unique_sibling_suppresses_obligatory_check() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::new("input", StringCoercer::default()).obligatory())
        .with_arg(ArgSpec::flag("version").allow_unique())
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "--version");
    assert!(!result.failed(), "diagnostics: {:?}", result.diagnostics());
    assert_eq!(
        result.value(&schema, "version").and_then(|v| v.as_bool()),
        Some(true),
    );
}

// ---- exclusive groups ----

fn grouped_schema() -> Schema {
    CommandSpec::new("app")
        .with_group(GroupSpec::new("mode").exclusive())
        .with_arg(ArgSpec::flag("fast").in_group("mode"))
        .with_arg(ArgSpec::flag("safe").in_group("mode"))
        .build()
        .unwrap()
}

#[test]
fn test_two_exclusive_members_yield_one_violation() {
    let mut schema = grouped_schema();
    let result = parse_line(&mut schema, "--fast --safe");

    assert!(result.failed());
    let hits: Vec<_> = result
        .diagnostics()
        .iter()
        .filter(|d| d.message.contains("exclusive group 'mode'"))
        .collect();
    assert_eq!(hits.len(), 1);
}

#[test]
fn test_single_exclusive_member_is_clean() {
    let mut schema = grouped_schema();
    let result = parse_line(&mut schema, "--fast");

    assert!(!result.failed());
    assert!(result.diagnostics().is_empty());
    assert_eq!(result.value(&schema, "fast").and_then(|v| v.as_bool()), Some(true));
}

#[test]
fn test_exclusivity_is_transitive_through_nested_groups() {
    let mut schema = CommandSpec::new("app")
        .with_group(GroupSpec::new("outer").exclusive())
        .with_group(GroupSpec::new("inner").inside("outer"))
        .with_arg(ArgSpec::flag("fast").in_group("inner"))
        .with_arg(ArgSpec::flag("safe").in_group("outer"))
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "--fast --safe");
    assert!(result.failed());
    let hits = result
        .diagnostics()
        .iter()
        .filter(|d| d.message.contains("exclusive group"))
        .count();
    assert_eq!(hits, 1);
}

// ---- usage counts ----

#[test]
fn test_counter_within_range_reports_count() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::new(
            "verbose",
            CounterCoercer::new().with_usage_arity(Range::new(0, 3)),
        )
        .with_name("v"))
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "-vvv");
    assert!(!result.failed(), "diagnostics: {:?}", result.diagnostics());
    assert_eq!(
        result.value(&schema, "verbose").and_then(|v| v.as_count()),
        Some(3),
    );
}

#[test]
fn test_counter_beyond_max_reports_usage_error() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::new(
            "verbose",
            CounterCoercer::new().with_usage_arity(Range::new(0, 3)),
        )
        .with_name("v"))
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "-vvvv");
    assert!(result.failed());
    let hits = result
        .diagnostics()
        .iter()
        .filter(|d| d.message.contains("was used 4 time(s)"))
        .count();
    assert_eq!(hits, 1);
    // the three admitted invocations still count
    assert_eq!(
        result.value(&schema, "verbose").and_then(|v| v.as_count()),
        Some(3),
    );
}

#[test]
fn test_usage_below_minimum_reports_at_finalization() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::new(
            "retry",
            CounterCoercer::new().with_usage_arity(Range::new(2, 3)),
        )
        .with_name("r"))
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "-r");
    assert!(result.failed());
    let hits: Vec<_> = result
        .diagnostics()
        .iter()
        .filter(|d| d.message.contains("was used 1 time(s), expected between 2 and 3"))
        .collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].position, Some(0));
    // an under-used argument falls back to its initial value
    assert_eq!(
        result.value(&schema, "retry").and_then(|v| v.as_count()),
        Some(0),
    );
}

// ---- positional and pair coercion ----

fn pair_schema() -> Schema {
    CommandSpec::new("app")
        .with_arg(
            ArgSpec::new(
                "coords",
                PairCoercer::new(IntCoercer::default(), StringCoercer::default()),
            )
            .positional(),
        )
        .build()
        .unwrap()
}

#[test]
fn test_positional_pair_coerces_both_sides() {
    let mut schema = pair_schema();
    let result = parse_line(&mut schema, "3 x");

    assert!(!result.failed(), "diagnostics: {:?}", result.diagnostics());
    let (first, second) = result
        .value(&schema, "coords")
        .and_then(|v| v.as_pair())
        .expect("pair should resolve");
    assert_eq!(first.as_int(), Some(3));
    assert_eq!(second.as_str(), Some("x"));
}

#[test]
fn test_pair_errors_are_independent_per_side() {
    let mut schema = pair_schema();
    let result = parse_line(&mut schema, "abc x");

    assert!(result.failed());
    assert_eq!(result.diagnostics().len(), 1);
    let diagnostic = &result.diagnostics()[0];
    assert!(diagnostic.message.contains("invalid integer value: 'abc'"));
    // anchored at the first raw value of the invocation
    assert_eq!(diagnostic.position, Some(0));
}

#[test]
fn test_positional_with_too_few_values() {
    let mut schema = pair_schema();
    let result = parse_line(&mut schema, "3");

    assert!(result.failed());
    assert!(result.diagnostics()[0]
        .message
        .contains("expects exactly 2 value(s), got 1"));
}

#[test]
fn test_unclaimed_value_is_unexpected() {
    let mut schema = basic_schema();
    let result = parse_line(&mut schema, "stray");

    assert!(result.failed());
    assert!(result.diagnostics()[0].message.contains("unexpected value 'stray'"));
    assert_eq!(result.diagnostics()[0].position, Some(0));
}

// ---- sub-commands ----

fn nested_schema() -> Schema {
    CommandSpec::new("tool")
        .with_arg(ArgSpec::flag("verbose").with_name("v"))
        .with_subcommand(
            CommandSpec::new("build")
                .with_arg(ArgSpec::new("jobs", IntCoercer::default()).with_name("j")),
        )
        .build()
        .unwrap()
}

#[test]
fn test_subcommand_descent_splits_token_ranges() {
    let mut schema = nested_schema();
    let result = parse_line(&mut schema, "-v build --jobs 4");

    assert!(!result.failed(), "diagnostics: {:?}", result.diagnostics());
    assert_eq!(result.invoked().len(), 2);
    let build = result.subcommand().expect("sub-command should be invoked");
    assert_eq!(schema.command(build).name(), "build");
    assert_eq!(result.value(&schema, "jobs").and_then(|v| v.as_int()), Some(4));
    assert_eq!(
        result.value(&schema, "verbose").and_then(|v| v.as_bool()),
        Some(true),
    );
}

#[test]
fn test_parent_argument_after_boundary_is_unknown() {
    let mut schema = nested_schema();
    let result = parse_line(&mut schema, "build --verbose");

    // past the boundary only the sub-command's arguments are in scope
    assert!(result.failed());
    assert!(result.diagnostics()[0]
        .message
        .contains("unknown argument '--verbose'"));
}

#[test]
fn test_obligatory_subcommand_must_be_entered() {
    let mut schema = CommandSpec::new("tool")
        .with_subcommand(CommandSpec::new("run").obligatory())
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "");
    assert!(result.failed());
    assert!(result.diagnostics()[0].message.contains("command 'run' must be used"));

    let result = parse_line(&mut schema, "run");
    assert!(!result.failed());
}

// ---- input forms ----

#[test]
fn test_argv_and_line_inputs_agree() {
    let mut schema = basic_schema();
    let from_line = parse_line(&mut schema, "--num 5 -v");
    let line_value = from_line.value(&schema, "num").and_then(|v| v.as_int());

    let argv: Vec<String> = ["--num", "5", "-v"].iter().map(|s| s.to_string()).collect();
    let from_args = parse_args(&mut schema, &argv);

    assert_eq!(line_value, Some(5));
    assert_eq!(from_args.value(&schema, "num").and_then(|v| v.as_int()), Some(5));
    assert_eq!(
        from_args.value(&schema, "verbose").and_then(|v| v.as_bool()),
        Some(true),
    );
}

#[test]
fn test_quoted_value_keeps_spaces() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::new("msg", StringCoercer::default()))
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "--msg \"hello there\"");
    assert!(!result.failed());
    assert_eq!(
        result.value(&schema, "msg").and_then(|v| v.as_str()),
        Some("hello there"),
    );
}

#[test]
fn test_unterminated_quote_is_reported_and_recovered() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::new("msg", StringCoercer::default()))
        .build()
        .unwrap();

    let result = parse_line(&mut schema, "--msg \"oops");
    assert!(result.failed());
    assert!(result.diagnostics()[0].message.contains("unterminated quote"));
    // the rest of the word still reaches the argument
    assert_eq!(
        result.value(&schema, "msg").and_then(|v| v.as_str()),
        Some("oops"),
    );
}

// ---- diagnostic ordering ----

#[test]
fn test_diagnostics_sorted_by_position_with_positionless_last() {
    let mut schema = CommandSpec::new("app")
        .with_arg(ArgSpec::new("num", IntCoercer::default()).with_name("n"))
        .with_arg(ArgSpec::new("input", StringCoercer::default()).obligatory())
        .build()
        .unwrap();

    // unknown argument at 0, bad integer at 10, missing obligatory (no position)
    let result = parse_line(&mut schema, "--x --num abc");
    assert!(result.failed());

    let positions: Vec<Option<usize>> = result.diagnostics().iter().map(|d| d.position).collect();
    assert!(positions.len() >= 3);

    let mut last = 0usize;
    let mut seen_none = false;
    for position in &positions {
        match position {
            Some(p) => {
                assert!(!seen_none, "positioned diagnostic after a positionless one");
                assert!(*p >= last, "positions out of order: {positions:?}");
                last = *p;
            }
            None => seen_none = true,
        }
    }
    assert!(seen_none, "expected a positionless diagnostic: {positions:?}");
}

// ---- thresholds and injected notes ----

#[test]
fn test_injected_note_flows_through_collector_ordering() {
    let mut schema = basic_schema();
    let root = schema.root();
    schema.attach_command_note(root, Note::new("deprecated invocation", ErrorLevel::Warning, Some(2)));

    let result = parse_line(&mut schema, "--x --num 5");
    assert_eq!(result.diagnostics().len(), 2);
    // unknown argument at 0 comes before the injected note at 2
    assert!(result.diagnostics()[0].message.contains("unknown argument"));
    assert_eq!(result.diagnostics()[1].message, "deprecated invocation");
    assert_eq!(result.diagnostics()[1].position, Some(2));
}

#[test]
fn test_injected_argument_note_sorts_with_coercion_errors() {
    let mut schema = basic_schema();
    let arg = schema
        .find_argument(schema.root(), "--num")
        .expect("argument should exist");
    schema.attach_argument_note(
        arg,
        Note::new("value is deprecated", ErrorLevel::Warning, Some(6)),
    );

    let result = parse_line(&mut schema, "--num abc");
    assert_eq!(result.diagnostics().len(), 2);
    // equal positions keep the source order: coercion error before note
    assert!(result.diagnostics()[0].message.contains("invalid integer value"));
    assert_eq!(result.diagnostics()[0].position, Some(6));
    assert_eq!(result.diagnostics()[1].message, "value is deprecated");
    assert_eq!(result.diagnostics()[1].position, Some(6));
}

#[test]
fn test_display_threshold_hides_but_exit_threshold_still_fails() {
    let mut schema = CommandSpec::new("app")
        .with_display_level(ErrorLevel::Error)
        .with_exit_level(ErrorLevel::Warning)
        .build()
        .unwrap();
    let root = schema.root();
    schema.attach_command_note(root, Note::new("quiet warning", ErrorLevel::Warning, None));

    let result = parse_line(&mut schema, "");
    // below the display threshold, above the exit threshold
    assert!(result.diagnostics().is_empty());
    assert!(result.failed());
}

#[test]
fn test_schema_reuse_after_reset() {
    let mut schema = basic_schema();

    let first = parse_line(&mut schema, "--num 1 -v");
    assert_eq!(first.value(&schema, "num").and_then(|v| v.as_int()), Some(1));

    let second = parse_line(&mut schema, "--num 2");
    assert_eq!(second.value(&schema, "num").and_then(|v| v.as_int()), Some(2));
    // the flag resets back to its initial value
    assert_eq!(
        second.value(&schema, "verbose").and_then(|v| v.as_bool()),
        Some(false),
    );
}
