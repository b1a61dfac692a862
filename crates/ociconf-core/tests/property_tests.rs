use ociconf_core::{CRIO_ROOT, ConfigSource, RuntimeRegistry};
use proptest::prelude::*;

/// Render a CRI-O config with an optional default pointer and a set of
/// named runtimes, each carrying one option named after itself.
fn render_config(default: Option<&str>, runtimes: &[&str]) -> String {
    let mut config = String::from("[crio.runtime]\n");
    if let Some(default) = default {
        config.push_str(&format!("default_runtime = \"{default}\"\n"));
    }
    for name in runtimes {
        config.push_str(&format!(
            "[crio.runtime.runtimes.{name}]\nruntime_path = \"/usr/bin/{name}\"\nruntime_type = \"{name}oci\"\n{name}_option = \"option\"\n"
        ));
    }
    config
}

fn load(config: &str) -> RuntimeRegistry {
    RuntimeRegistry::builder(CRIO_ROOT)
        .source(ConfigSource::from_string(config))
        .build()
        .unwrap()
}

fn runtime_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("runc"), Just("crun"), Just("test"), Just("kata")]
}

proptest! {
    #[test]
    fn test_add_runtime_idempotent(
        runtimes in proptest::collection::btree_set(runtime_name(), 0..4),
        default in proptest::option::of(runtime_name()),
        name in runtime_name(),
        set_as_default in any::<bool>(),
    ) {
        let runtimes: Vec<_> = runtimes.into_iter().collect();
        // Demoting the current default switches the next call's source to
        // `runc`, the one case where a repeat is not a no-op.
        prop_assume!(!(
            default == Some(name)
                && !set_as_default
                && name != "runc"
                && runtimes.contains(&name)
                && runtimes.contains(&"runc")
        ));

        let config = render_config(default, &runtimes);
        let mut once = load(&config);
        once.add_runtime(name, "/usr/bin/added", set_as_default).unwrap();
        let mut twice = load(&config);
        twice.add_runtime(name, "/usr/bin/added", set_as_default).unwrap();
        twice.add_runtime(name, "/usr/bin/added", set_as_default).unwrap();

        prop_assert_eq!(once.to_string(), twice.to_string());
    }

    #[test]
    fn test_add_runtime_single_source(
        runtimes in proptest::collection::btree_set(runtime_name(), 0..4),
        default in proptest::option::of(runtime_name()),
        set_as_default in any::<bool>(),
    ) {
        let runtimes: Vec<_> = runtimes.into_iter().collect();
        let config = render_config(default, &runtimes);
        let mut registry = load(&config);
        registry.add_runtime("added", "/usr/bin/added", set_as_default).unwrap();

        let expected_source = default
            .filter(|d| runtimes.contains(d))
            .or_else(|| runtimes.contains(&"runc").then_some("runc"));

        let entry = registry.get_runtime_config("added").unwrap();
        let options: Vec<String> = entry.options().map(|(k, _)| k.to_owned()).collect();
        let expected: Vec<String> = expected_source
            .map(|source| vec![format!("{source}_option")])
            .unwrap_or_default();
        prop_assert_eq!(options, expected);
        prop_assert_eq!(entry.binary_path(), "/usr/bin/added");
        prop_assert_eq!(entry.runtime_type(), Some("oci"));

        if set_as_default {
            prop_assert_eq!(registry.default_runtime(), Some("added"));
        } else {
            prop_assert_eq!(registry.default_runtime(), default);
        }
    }
}
