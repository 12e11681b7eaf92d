#![cfg(unix)]

use solver_bench::commands::{execute_bench, execute_summarize, validate_args, BenchArgs};
use solver_bench::output::read_report_json;
use solver_bench::utils::config::BenchConfig;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes `gmon.<pid>` under GMON_OUT_PREFIX like a -pg binary would
const FAKE_SOLVER: &str = "#!/bin/sh
if [ -n \"$GMON_OUT_PREFIX\" ]; then
    echo profile > \"$GMON_OUT_PREFIX.$$\"
fi
exit 0
";

const FAKE_GPROF: &str = "#!/bin/sh
cat <<'EOF'
Flat profile:

Each sample counts as 0.01 seconds.
  %   cumulative   self              self     total
 time   seconds   seconds    calls   s/call   s/call  name
 60.00      0.60     0.60      100     0.01     0.01  kissat_search_propagate
 40.00      1.00     0.40       10     0.04     0.05  kissat_analyze
EOF
";

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

struct Fixture {
    root: TempDir,
    solver: PathBuf,
    gprof: PathBuf,
    corpus: PathBuf,
}

impl Fixture {
    fn new(items: &[&str]) -> Self {
        let root = tempfile::tempdir().unwrap();
        let solver = write_script(root.path(), "solver", FAKE_SOLVER);
        let gprof = write_script(root.path(), "gprof", FAKE_GPROF);

        let corpus = root.path().join("cnf_tiny");
        fs::create_dir(&corpus).unwrap();
        for item in items {
            fs::write(corpus.join(item), "p cnf 1 1\n1 0\n").unwrap();
        }

        Self {
            root,
            solver,
            gprof,
            corpus,
        }
    }

    fn args(&self, config: BenchConfig) -> BenchArgs {
        BenchArgs {
            solver: self.solver.clone(),
            corpus_dir: self.corpus.clone(),
            config,
            output_dir: Some(self.root.path().join("out")),
            output_json: None,
            print_report: false,
        }
    }

    fn profiled_config(&self) -> BenchConfig {
        BenchConfig {
            per_run_isolation: true,
            profiler: self.gprof.clone(),
            ..Default::default()
        }
    }
}

#[test]
fn test_bench_with_isolated_profiles() {
    let fixture = Fixture::new(&["a.cnf", "b.cnf"]);
    let mut args = fixture.args(fixture.profiled_config());
    let json_path = fixture.root.path().join("report.json");
    args.output_json = Some(json_path.clone());

    validate_args(&args).unwrap();
    let outcome = execute_bench(args).unwrap();

    assert_eq!(outcome.report.run_count, 2);
    assert_eq!(outcome.report.profiled_runs, 2);
    assert_eq!(outcome.report.top_functions.len(), 2);
    assert_eq!(outcome.report.top_functions[0].name, "kissat_search_propagate");
    assert_eq!(outcome.report.top_functions[0].avg_calls, Some(100.0));

    let file_name = outcome.report_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("benchmark_tiny_"), "{}", file_name);
    assert!(file_name.ends_with(".txt"));

    let written = fs::read_to_string(&outcome.report_path).unwrap();
    assert_eq!(written, outcome.text);
    assert!(written.starts_with("Average solving time for 2 CNFs: "));
    assert!(written.contains("kissat_analyze"));
    assert!(written.contains("s/call"));

    let exported = read_report_json(&json_path).unwrap();
    assert_eq!(exported.run_count, 2);
    assert_eq!(exported.top_functions.len(), 2);
    assert_eq!(exported.top_functions[1].name, "kissat_analyze");
    assert!((exported.average_solve_time - outcome.report.average_solve_time).abs() < 1e-9);
}

#[test]
fn test_bench_missing_profiler_reports_timing_only() {
    let fixture = Fixture::new(&["a.cnf"]);
    let config = BenchConfig {
        profiler: PathBuf::from("/nonexistent/gprof"),
        ..fixture.profiled_config()
    };

    let outcome = execute_bench(fixture.args(config)).unwrap();

    assert_eq!(outcome.report.run_count, 1);
    assert!(!outcome.report.has_profile_data());
    assert_eq!(outcome.text.lines().count(), 1);
}

#[test]
fn test_bench_without_profiling() {
    let fixture = Fixture::new(&["a.cnf", "b.cnf", "c.cnf"]);
    let config = BenchConfig {
        capture_profile: false,
        ..fixture.profiled_config()
    };

    let outcome = execute_bench(fixture.args(config)).unwrap();

    assert_eq!(outcome.report.run_count, 3);
    assert_eq!(outcome.report.profiled_runs, 0);
    assert!(outcome.text.starts_with("Average solving time for 3 CNFs: "));
}

#[test]
fn test_bench_extension_filter() {
    let fixture = Fixture::new(&["a.cnf", "README.md"]);
    let config = BenchConfig {
        extension: Some("cnf".to_string()),
        capture_profile: false,
        ..Default::default()
    };

    let outcome = execute_bench(fixture.args(config)).unwrap();
    assert_eq!(outcome.report.run_count, 1);
}

#[test]
fn test_bench_empty_corpus_fails() {
    let fixture = Fixture::new(&[]);
    let result = execute_bench(fixture.args(fixture.profiled_config()));

    assert!(result.is_err());
    assert!(!fixture.root.path().join("out").exists());
}

#[test]
fn test_summarize_written_reports() {
    let fixture = Fixture::new(&["a.cnf", "b.cnf"]);
    let config = BenchConfig {
        columns: vec![
            solver_bench::report::Column::PercentTime,
            solver_bench::report::Column::SelfSeconds,
        ],
        ..fixture.profiled_config()
    };

    let outcome = execute_bench(fixture.args(config)).unwrap();
    let report_dir = outcome.report_path.parent().unwrap();

    let summary = execute_summarize(report_dir).unwrap();
    assert_eq!(summary.report_count, 1);
    assert_eq!(summary.hottest(), Some(("kissat_search_propagate", 60.0)));
}

#[test]
fn test_shared_mode_ignores_stale_profile_data() {
    let fixture = Fixture::new(&["a.cnf", "b.cnf"]);
    let gmon = fixture.root.path().join("gmon.out");
    fs::write(&gmon, "left over from an earlier benchmark").unwrap();

    // Only a.cnf produces profile data; b.cnf crashes before writing any
    let solver = write_script(
        fixture.root.path(),
        "crashy-solver",
        &format!(
            "#!/bin/sh\ncase \"$1\" in\n  *a.cnf) echo profile > '{}' ;;\n  *) exit 139 ;;\nesac\nexit 0\n",
            gmon.display()
        ),
    );

    let config = BenchConfig {
        profiler: fixture.gprof.clone(),
        gmon_file: gmon.clone(),
        ..Default::default()
    };
    let args = BenchArgs {
        solver,
        ..fixture.args(config)
    };

    let outcome = execute_bench(args).unwrap();

    assert_eq!(outcome.report.run_count, 2);
    assert_eq!(outcome.report.profiled_runs, 1);
    assert_eq!(outcome.report.top_functions[0].occurrences, 1);
    assert!(!gmon.exists());
}

#[test]
fn test_bench_skips_runs_that_fail_to_start() {
    let fixture = Fixture::new(&["a.cnf", "b.cnf", "c.cnf"]);

    // The solver disappears while handling b.cnf, so c.cnf cannot start
    let solver = write_script(
        fixture.root.path(),
        "vanishing-solver",
        "#!/bin/sh\ncase \"$1\" in\n  *b.cnf) rm -f \"$0\" ;;\nesac\nexit 0\n",
    );
    let config = BenchConfig {
        capture_profile: false,
        ..Default::default()
    };
    let args = BenchArgs {
        solver,
        ..fixture.args(config)
    };

    let outcome = execute_bench(args).unwrap();

    assert_eq!(outcome.report.run_count, 2);
    assert!(outcome.text.starts_with("Average solving time for 2 CNFs: "));
    assert!(outcome.report_path.exists());
}

#[test]
fn test_bench_fails_when_no_run_completes() {
    let fixture = Fixture::new(&["a.cnf"]);
    let config = BenchConfig {
        capture_profile: false,
        ..Default::default()
    };
    let args = BenchArgs {
        solver: PathBuf::from("/nonexistent/solver-binary"),
        ..fixture.args(config)
    };

    assert!(execute_bench(args).is_err());
    assert!(!fixture.root.path().join("out").exists());
}
