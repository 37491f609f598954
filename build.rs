const MODE_FEATURES: [&str; 4] = [
    "CARGO_FEATURE_MODE_POLLING",
    "CARGO_FEATURE_MODE_INTERRUPT",
    "CARGO_FEATURE_MODE_TIMER",
    "CARGO_FEATURE_MODE_TASK",
];

fn main() {
    // Only one execution strategy may be compiled into a build.
    let enabled: Vec<&str> = MODE_FEATURES
        .iter()
        .copied()
        .filter(|var| std::env::var_os(var).is_some())
        .collect();
    if enabled.len() > 1 {
        panic!(
            "more than one execution strategy enabled ({}); pick exactly one mode-* feature",
            enabled.join(", ")
        );
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
