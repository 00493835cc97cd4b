//! Scenario execution
//!
//! Builds a callback list from the scenario flags, wires up the scripted
//! callbacks and applies each step in order.

use crate::callbacks::Registry;
use crate::config::{FlagsConfig, Operation, ScenarioConfig};
use crate::events::Trace;
use crate::report::Report;
use anyhow::Result;
use callback_list::{CallbackList, FlagCache};
use serde_json::Value;

/// List type driven by scenarios
pub type ScenarioList = CallbackList<String, Vec<Value>>;

/// Apply one operation to the list
pub fn apply(list: &ScenarioList, registry: &Registry, operation: &Operation) -> Result<()> {
    match operation {
        Operation::Add { callbacks } => {
            list.add(registry.get_all(callbacks)?);
        }
        Operation::Remove { callbacks } => {
            list.remove_all(&registry.get_all(callbacks)?);
        }
        Operation::Fire { args } => {
            list.fire(args.clone());
        }
        Operation::FireWith { context, args } => {
            list.fire_with(context.clone(), args.clone());
        }
        Operation::Lock => {
            list.lock();
        }
        Operation::Disable => {
            list.disable();
        }
        Operation::Empty => {
            list.empty();
        }
    }
    Ok(())
}

/// Run a validated scenario and collect the report
///
/// Flag strings are resolved through `cache`, which the caller owns.
pub fn run(config: &ScenarioConfig, cache: &mut FlagCache) -> Result<Report> {
    let flags = config.flags.flags()?;
    let list: ScenarioList = match &config.flags {
        FlagsConfig::Names(names) => cache.build(names),
        FlagsConfig::Table(_) => CallbackList::with_flags(flags),
    };
    log::info!("Running scenario with flags [{}]", flags);

    let trace = Trace::new();
    let registry = Registry::build(&config.callbacks, &list, &trace);

    for (index, step) in config.steps.iter().enumerate() {
        log::debug!("Step {}: {:?}", index, step);
        trace.begin_step(index);
        apply(&list, &registry, step)?;
    }

    Ok(Report {
        flags: flags.to_string(),
        trace: trace.events(),
        fired: list.fired(),
        locked: list.locked(),
        disabled: list.disabled(),
        remaining: list.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_toml(source: &str) -> Report {
        let config: ScenarioConfig = toml::from_str(source).unwrap();
        config.validate().unwrap();
        run(&config, &mut FlagCache::new()).unwrap()
    }

    fn calls(report: &Report) -> Vec<String> {
        report
            .trace
            .iter()
            .map(|e| format!("{}{}", e.callback, Value::from(e.args.clone())))
            .collect()
    }

    #[test]
    fn test_plain_scenario() {
        let report = run_toml(
            r#"
            [[callbacks]]
            name = "f1"
            [[callbacks]]
            name = "f2"

            [[steps]]
            op = "add"
            callbacks = ["f1", "f2"]
            [[steps]]
            op = "fire"
            args = ["x"]
            "#,
        );

        assert_eq!(calls(&report), vec![r#"f1["x"]"#, r#"f2["x"]"#]);
        assert!(report.trace.iter().all(|e| e.step == 1));
        assert!(report.fired);
        assert_eq!(report.remaining, 2);
    }

    #[test]
    fn test_stop_on_false_scenario() {
        let report = run_toml(
            r#"
            flags = "stopOnFalse"
            [[callbacks]]
            name = "f1"
            returns = false
            [[callbacks]]
            name = "f2"

            [[steps]]
            op = "add"
            callbacks = ["f1", "f2"]
            [[steps]]
            op = "fire"
            "#,
        );

        assert_eq!(calls(&report), vec!["f1[]"]);
    }

    #[test]
    fn test_once_memory_scenario() {
        let report = run_toml(
            r#"
            flags = "once memory"
            [[callbacks]]
            name = "f3"

            [[steps]]
            op = "fire"
            args = [1]
            [[steps]]
            op = "add"
            callbacks = ["f3"]
            [[steps]]
            op = "fire"
            args = [2]
            "#,
        );

        assert_eq!(calls(&report), vec!["f3[1]"]);
        assert_eq!(report.trace[0].step, 1);
        assert!(report.fired);
        assert!(!report.disabled);
        assert_eq!(report.remaining, 0);
    }

    #[test]
    fn test_reentrant_scenario() {
        let report = run_toml(
            r#"
            [[callbacks]]
            name = "a"
            actions = [
                { op = "fire_with", context = "again", args = [2] },
                { op = "add", callbacks = ["c"] },
            ]
            [[callbacks]]
            name = "b"
            [[callbacks]]
            name = "c"

            [[steps]]
            op = "add"
            callbacks = ["a", "b"]
            [[steps]]
            op = "fire_with"
            context = "first"
            args = [1]
            "#,
        );

        let seen: Vec<(String, String)> = report
            .trace
            .iter()
            .map(|e| (e.callback.clone(), e.context.clone()))
            .collect();
        let expected = [
            ("a", "first"),
            ("b", "first"),
            ("c", "first"),
            ("a", "again"),
            ("b", "again"),
            ("c", "again"),
        ];
        assert_eq!(
            seen,
            expected
                .iter()
                .map(|(n, c)| (n.to_string(), c.to_string()))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_lock_scenario() {
        let report = run_toml(
            r#"
            flags = { unique = true }
            [[callbacks]]
            name = "f"

            [[steps]]
            op = "add"
            callbacks = ["f", "f"]
            [[steps]]
            op = "lock"
            [[steps]]
            op = "fire"
            "#,
        );

        assert!(report.trace.is_empty());
        assert!(report.locked);
        assert!(report.disabled);
        assert!(!report.fired);
    }

    #[test]
    fn test_bundled_scenarios() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../scenarios");
        let mut cache = FlagCache::new();

        let config = crate::config::load_config(&dir.join("reentrant.toml")).unwrap();
        let report = run(&config, &mut cache).unwrap();
        let seen: Vec<String> = report
            .trace
            .iter()
            .map(|e| format!("{}@{}", e.callback, e.context))
            .collect();
        assert_eq!(
            seen,
            vec![
                "queue_second_fire@direct",
                "remove_self@direct",
                "neighbor@direct",
                "late@direct",
                "queue_second_fire@queued",
                "neighbor@queued",
                "late@queued",
            ]
        );

        let config = crate::config::load_config(&dir.join("memory_catch_up.toml")).unwrap();
        let report = run(&config, &mut cache).unwrap();
        assert_eq!(calls(&report), vec!["f1[1]", "f3[1]"]);
        assert_eq!(cache.len(), 1);
    }
}
