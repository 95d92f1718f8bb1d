use std::rc::Rc;
use std::time::Instant;

use clap::Parser;
use log::warn;

use cloud_scenario::batch::{read_scenarios, BatchRunner};
use cloud_scenario::core::registry::PolicyRegistry;
use cloud_scenario::engine::BasicEngine;
use cloud_scenario::report::WorkloadReport;

fn init_logger() {
    use env_logger::Builder;
    use std::io::Write;
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to YAML file with simulation scenarios
    scenarios: String,

    /// Directory to save results.json and per-scenario workload tables
    #[clap(short, long)]
    results: Option<String>,

    /// Suppress printing of workload result tables
    #[clap(short, long)]
    suppress_tables: bool,
}

fn main() {
    init_logger();
    let args = Args::parse();
    let start = Instant::now();

    let scenarios = match read_scenarios(&args.scenarios) {
        Ok(scenarios) => scenarios,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    if scenarios.is_empty() {
        warn!("{}: no scenarios found, nothing to build", args.scenarios);
        return;
    }

    let registry = Rc::new(PolicyRegistry::new());
    let mut runner = BatchRunner::new(registry);
    if let Some(dir) = &args.results {
        runner = runner.with_results_dir(dir);
    }
    let results = runner.run(&scenarios, BasicEngine::new);

    for result in &results {
        let report = WorkloadReport::new(result.simulation.scenario());
        if !args.suppress_tables {
            println!("\nResults of {} ({} broker(s)):", result.simulation.label(), result.simulation.brokers().len());
            report.print();
        }
        if let Some(dir) = &args.results {
            let path = format!("{}/{}.csv", dir, result.simulation.label());
            if let Err(e) = report.save_csv(&path) {
                eprintln!("cannot save workload table to {}: {}", path, e);
            }
        }
    }

    println!(
        "\nProcessed {} of {} scenario(s) in {:.2} s",
        results.len(),
        scenarios.len(),
        start.elapsed().as_secs_f64()
    );
}
