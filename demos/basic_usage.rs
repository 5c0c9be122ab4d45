use clump_sim::prelude::*;

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== clump-sim Demo ===\n");

    demo_single_run();
    demo_cmc_vs_ra();
    demo_config_rejection();
}

/// Runs the CMC engine once over its default KVM-shaped workload and
/// prints the resulting statistics record.
fn demo_single_run() {
    println!("1. Single CMC run over a KVM-shaped trace");
    println!("------------------------------------------");

    let config = Config::default();
    let stats = run(&config).expect("default config is always valid");

    println!("  accesses:            {}", stats.accesses);
    println!("  hit rate:            {:.3}", stats.hit_rate);
    println!("  prefetch efficiency: {:.3}", stats.prefetch_efficiency);
    println!("  mc rows allocated:   {}", stats.mc_rows_allocated);
    println!("  memory bytes:        {}", stats.memory_bytes);
    println!();
}

/// Runs both engines over the same seed and workload and compares them,
/// the comparison this crate exists to make.
fn demo_cmc_vs_ra() {
    println!("2. CMC vs read-ahead on the same trace");
    println!("---------------------------------------");

    let base = Config {
        workload_kind: WorkloadKind::Kvm,
        n_events: 20_000,
        seed: 7,
        ..Config::default()
    };

    let cmc = run(&Config {
        engine: EngineKind::Cmc,
        ..base.clone()
    })
    .unwrap();
    let ra = run(&Config {
        engine: EngineKind::Ra,
        ..base
    })
    .unwrap();

    println!("  CMC hit rate: {:.3} (efficiency {:.3})", cmc.hit_rate, cmc.prefetch_efficiency);
    println!("  RA  hit rate: {:.3} (efficiency {:.3})", ra.hit_rate, ra.prefetch_efficiency);
    println!();
}

/// Shows a rejected configuration surfacing as a `ConfigError` before any
/// simulation work starts.
fn demo_config_rejection() {
    println!("3. An invalid configuration is rejected up front");
    println!("---------------------------------------------------");

    let bad = Config {
        prefetch_window_blocks: 9999,
        ..Config::default()
    };

    match run(&bad) {
        Ok(_) => unreachable!("this configuration is deliberately invalid"),
        Err(SimError::Config(e)) => println!("  rejected: {e}"),
        Err(e) => println!("  unexpected error: {e}"),
    }
}
