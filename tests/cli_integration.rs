use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pv-yield"))
        .args(args)
        .output()
        .expect("pv-yield process should run")
}

fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pv-yield-{}-{name}", std::process::id()))
}

fn parse_metric(stdout: &str, label: &str, unit: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing line `{label}` in output: {stdout}"));

    let raw = line
        .split_once(':')
        .map(|(_, right)| right.trim())
        .unwrap_or_else(|| panic!("invalid format for line `{line}`"));

    let numeric = raw.strip_suffix(unit).unwrap_or(raw).trim();
    numeric
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("failed parsing `{numeric}` from line `{line}`"))
}

#[test]
fn default_run_is_hourly_hcmc_january() {
    let stdout = run_ok(&[]);
    let total = parse_metric(&stdout, "Total energy (hourly)", "kWh");
    assert!((total - 85.41).abs() < 0.02, "total {total}");
    assert!(stdout.contains("Geometry:"));
}

#[test]
fn monthly_mode_prints_performance_report() {
    let stdout = run_ok(&["--mode", "monthly"]);
    let total = parse_metric(&stdout, "Total energy (monthly)", "kWh");
    assert!((total - 29180.24).abs() < 0.5, "total {total}");
    let pr = parse_metric(&stdout, "Average PR:", "%");
    assert!(pr > 85.0 && pr < 95.0, "PR {pr}");
    assert!(stdout.contains("Performance Report"));
}

#[test]
fn utility_preset_scales_with_area() {
    let residential = parse_metric(
        &run_ok(&["--mode", "monthly"]),
        "Total energy (monthly)",
        "kWh",
    );
    let utility = parse_metric(
        &run_ok(&["--preset", "utility"]),
        "Total energy (monthly)",
        "kWh",
    );
    let ratio = utility / residential;
    assert!((ratio - 2500.0).abs() < 0.01, "ratio {ratio}");
}

#[test]
fn invalid_month_is_rejected() {
    let output = run(&["--month", "12"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("site.month"), "stderr={stderr}");
}

#[test]
fn unknown_region_is_rejected() {
    let output = run(&["--region", "Atlantis"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown region"));
}

#[test]
fn climate_template_round_trips_through_import() {
    let template = temp_path("climate.csv");
    let template_str = template.to_string_lossy().to_string();
    run_ok(&["--template", "climate", &template_str]);

    let content = fs::read_to_string(&template).expect("template written");
    assert!(content.starts_with("region,latitude,month,ghi,temp"));

    let stdout = run_ok(&["--climate", &template_str, "--mode", "monthly"]);
    assert!(stdout.contains("Total energy (monthly)"));
    let _ = fs::remove_file(&template);
}

#[test]
fn imported_region_can_be_selected() {
    let climate = temp_path("danang.csv");
    fs::write(
        &climate,
        "region,latitude,month,ghi,temp\nĐà Nẵng,16.0,1,4.1,22\n",
    )
    .unwrap_or_else(|e| panic!("write failed: {e}"));

    let climate_str = climate.to_string_lossy().to_string();
    let stdout = run_ok(&["--climate", &climate_str, "--region", "Đà Nẵng"]);
    assert!(stdout.contains("Đà Nẵng"));
    assert!(parse_metric(&stdout, "Total energy (hourly)", "kWh") > 0.0);
    let _ = fs::remove_file(&climate);
}

#[test]
fn analysis_with_actual_reports_both_series() {
    let actual = temp_path("actual.csv");
    let actual_str = actual.to_string_lossy().to_string();
    run_ok(&["--template", "actual", &actual_str]);

    let stdout = run_ok(&["--mode", "analysis", "--actual", &actual_str]);
    assert!(stdout.contains("Actual production:"));
    assert_eq!(stdout.matches("Performance Report").count(), 2);
    let _ = fs::remove_file(&actual);
}

#[test]
fn actual_outside_analysis_is_rejected() {
    let output = run(&["--mode", "monthly", "--actual", "unused.csv"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--actual"), "stderr={stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn out_writes_series_csv() {
    let out = temp_path("series.csv");
    let out_str = out.to_string_lossy().to_string();
    run_ok(&["--out", &out_str]);

    let content = fs::read_to_string(&out).expect("csv written");
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("hour,label,irradiance_w_m2,cell_temp_c,energy_kwh")
    );
    assert_eq!(lines.count(), 24);
    let _ = fs::remove_file(&out);
}
