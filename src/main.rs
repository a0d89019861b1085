//! pv-yield entry point: CLI wiring, climate import and mode dispatch.

use std::path::Path;
use std::process;

use pv_yield::climate::actual::{actual_series, read_actual_file};
use pv_yield::climate::import::import_climate_file;
use pv_yield::climate::record::ClimateStore;
use pv_yield::config::RunConfig;
use pv_yield::io::export::{Template, export_csv, export_template};
use pv_yield::model::engine::{DayInput, YieldEngine};
use pv_yield::model::performance::PerformanceSummary;
use pv_yield::model::types::CalculationResult;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    climate_path: Option<String>,
    actual_path: Option<String>,
    mode: Option<String>,
    region: Option<String>,
    month: Option<usize>,
    out: Option<String>,
    template: Option<(Template, String)>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("pv-yield: photovoltaic energy yield estimator");
    eprintln!();
    eprintln!("Usage: pv-yield [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load run configuration from TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (residential, utility)");
    eprintln!("  --climate <path>         Import climate CSV into the built-in regions");
    eprintln!("  --actual <path>          Actual production CSV for analysis mode");
    eprintln!("  --mode <name>            hourly, monthly, proportional or analysis");
    eprintln!("  --region <name>          Region to calculate");
    eprintln!("  --month <0-11>           Month for hourly mode");
    eprintln!("  --out <path>             Export the result series to CSV");
    eprintln!("  --template <kind> <path> Write a climate or actual CSV template and exit");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start JSON API server after the calculation");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the residential preset is used.");
    eprintln!("Set RUST_LOG=info or RUST_LOG=debug for diagnostics.");
}

fn require_value<'a>(args: &'a [String], i: usize, flag: &str, what: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v.as_str(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        climate_path: None,
        actual_path: None,
        mode: None,
        region: None,
        month: None,
        out: None,
        template: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                cli.config_path = Some(require_value(&args, i, "--config", "a path argument").into());
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(require_value(&args, i, "--preset", "a name argument").into());
            }
            "--climate" => {
                i += 1;
                cli.climate_path =
                    Some(require_value(&args, i, "--climate", "a path argument").into());
            }
            "--actual" => {
                i += 1;
                cli.actual_path = Some(require_value(&args, i, "--actual", "a path argument").into());
            }
            "--mode" => {
                i += 1;
                cli.mode = Some(require_value(&args, i, "--mode", "a mode name").into());
            }
            "--region" => {
                i += 1;
                cli.region = Some(require_value(&args, i, "--region", "a region name").into());
            }
            "--month" => {
                i += 1;
                let value = require_value(&args, i, "--month", "a month number (0-11)");
                if let Ok(m) = value.parse::<usize>() {
                    cli.month = Some(m);
                } else {
                    eprintln!("error: --month value \"{value}\" is not a valid month number");
                    process::exit(1);
                }
            }
            "--out" => {
                i += 1;
                cli.out = Some(require_value(&args, i, "--out", "a path argument").into());
            }
            "--template" => {
                i += 1;
                let kind = require_value(&args, i, "--template", "a kind (climate or actual)");
                let Some(template) = Template::from_name(kind) else {
                    eprintln!("error: unknown template \"{kind}\", expected climate or actual");
                    process::exit(1);
                };
                i += 1;
                let path = require_value(&args, i, "--template", "a path argument");
                cli.template = Some((template, path.to_string()));
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let value = require_value(&args, i, "--port", "a u16 argument");
                if let Ok(p) = value.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{value}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.config_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --config and --preset are mutually exclusive");
        process::exit(1);
    }

    cli
}

fn load_config(cli: &CliArgs) -> RunConfig {
    // --config takes priority, then --preset, then the residential default
    let loaded = if let Some(ref path) = cli.config_path {
        RunConfig::from_toml_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        RunConfig::from_preset(name)
    } else {
        Ok(RunConfig::residential())
    };
    let mut cfg = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Some(ref mode) = cli.mode {
        cfg.run.mode = mode.clone();
    }
    if let Some(ref region) = cli.region {
        cfg.site.region = region.clone();
    }
    if let Some(month) = cli.month {
        cfg.site.month = month;
        cfg.site.day_of_year = None;
    }

    if cli.actual_path.is_some() && cfg.run.mode != "analysis" {
        eprintln!(
            "error: --actual is only used in analysis mode (mode is \"{}\")",
            cfg.run.mode
        );
        process::exit(1);
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    cfg
}

fn load_store(cli: &CliArgs) -> ClimateStore {
    let store = ClimateStore::defaults();
    let Some(ref path) = cli.climate_path else {
        return store;
    };
    match import_climate_file(&store, Path::new(path)) {
        Ok((merged, report)) => {
            eprintln!(
                "Imported {path}: {} rows accepted, {} rejected, {} regions",
                report.accepted, report.rejected, report.regions
            );
            merged
        }
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn print_summary(result: &CalculationResult, engine: &YieldEngine) {
    let entries = result.entries().unwrap_or_default();
    let summary = PerformanceSummary::from_series(entries, engine.nominal_capacity_kwp());
    println!("\n{summary}");
}

fn print_actual(path: &str, engine: &YieldEngine) {
    let (rows, report) = read_actual_file(Path::new(path)).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });
    eprintln!(
        "Imported {path}: {} rows accepted, {} rejected",
        report.accepted, report.rejected
    );
    let entries = actual_series(&rows, engine.nominal_capacity_kwp());
    println!("\nActual production:");
    for e in &entries {
        println!("{e}");
    }
    let summary = PerformanceSummary::from_series(&entries, engine.nominal_capacity_kwp());
    println!("\n{summary}");
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = parse_args();

    if let Some((template, ref path)) = cli.template {
        if let Err(e) = export_template(template, Path::new(path)) {
            eprintln!("error: failed to write template: {e}");
            process::exit(1);
        }
        eprintln!("Template written to {path}");
        return;
    }

    let cfg = load_config(&cli);
    let store = load_store(&cli);
    let engine = cfg.engine();

    let Some(record) = store.get(&cfg.site.region) else {
        let names: Vec<&str> = store.region_names().collect();
        eprintln!(
            "error: unknown region \"{}\", available: {}",
            cfg.site.region,
            names.join(", ")
        );
        process::exit(1);
    };

    println!(
        "Region: {} (lat {:.2}°)  Mode: {}",
        cfg.site.region, record.latitude, cfg.run.mode
    );

    let result = match cfg.run.mode.as_str() {
        "hourly" => {
            let Some(day) = DayInput::from_record(record, cfg.site.month) else {
                eprintln!("error: month {} is not in 0..=11", cfg.site.month);
                process::exit(1);
            };
            engine.hourly(&DayInput {
                day_of_year: cfg.day_of_year(),
                ..day
            })
        }
        "proportional" => engine.proportional(record),
        // monthly and analysis
        _ => engine.monthly(record),
    };

    println!("{result}");
    if result.entries().is_some() {
        print_summary(&result, &engine);
    }
    if cfg.run.mode == "analysis" {
        if let Some(ref path) = cli.actual_path {
            print_actual(path, &engine);
        }
    }

    if let Some(ref path) = cli.out {
        if let Err(e) = export_csv(&result, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Results written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(pv_yield::api::AppState { engine, store });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(pv_yield::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
