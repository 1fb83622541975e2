use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for regdiff")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test, selftest)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        #[arg(long)]
        doc: bool,
        /// Run only spec parser tests
        #[arg(long)]
        parser: bool,
        /// Run only snapshot differ and comparator tests
        #[arg(long)]
        differ: bool,
        /// Run only machine (capture/restore) tests
        #[arg(long)]
        machine: bool,
        /// Run only fixture runner tests
        #[arg(long)]
        fixture: bool,
        /// Run only property tests
        #[arg(long)]
        properties: bool,
    },
    /// Run benchmarks
    Bench,
    /// Run the built-in fixture tables through the regdiff binary
    Selftest {
        /// Extra TOML fixture tables
        #[arg(short = 't', long = "table")]
        tables: Vec<String>,
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Pre-commit hook (fmt, clippy, test)
    PreCommit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy { fix } => run_clippy(fix),
        Commands::Build { release } => run_build(release),
        Commands::Test {
            doc,
            parser,
            differ,
            machine,
            fixture,
            properties,
        } => run_test(doc, TestFilter {
            parser,
            differ,
            machine,
            fixture,
            properties,
        }),
        Commands::Bench => run_bench(),
        Commands::Selftest { tables, release } => run_selftest(&tables, release),
        Commands::PreCommit => run_pre_commit(),
    }
}

#[derive(Default, Clone, Copy)]
struct TestFilter {
    parser: bool,
    differ: bool,
    machine: bool,
    fixture: bool,
    properties: bool,
}

impl TestFilter {
    fn any(&self) -> bool {
        self.parser || self.differ || self.machine || self.fixture || self.properties
    }
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;
    run_task("Build", || run_build(false), verbose)?;
    run_task("Test", || run_test(false, TestFilter::default()), verbose)?;
    run_task("Selftest", || run_selftest(&[], false), verbose)?;

    let elapsed = start.elapsed();
    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_fmt(check: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("fmt").arg("--all");

    if check {
        cmd.arg("--").arg("--check");
    }

    execute_command(&mut cmd)
}

fn run_clippy(fix: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("clippy").arg("--all-targets");

    if fix {
        cmd.arg("--fix");
    } else {
        cmd.arg("--").arg("-D").arg("warnings");
    }

    execute_command(&mut cmd)
}

fn run_build(release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("build");

    if release {
        cmd.arg("--release");
    }

    execute_command(&mut cmd)
}

fn run_test(doc: bool, filter: TestFilter) -> Result<()> {
    if doc {
        let mut cmd = Command::new("cargo");
        cmd.arg("test").arg("--doc");
        return execute_command(&mut cmd);
    }

    if !filter.any() {
        let mut cmd = Command::new("cargo");
        cmd.arg("test");
        return execute_command(&mut cmd);
    }

    // (enabled, cargo test arguments, display name)
    let groups: [(bool, &[&str], &str); 5] = [
        (filter.parser, &["--lib", "core::spec"], "Parser"),
        (filter.differ, &["--lib", "core::snapshot"], "Differ"),
        (filter.differ, &["--lib", "core::verify"], "Comparator"),
        (filter.machine, &["--lib", "core::machine"], "Machine"),
        (filter.fixture, &["--lib", "core::fixture"], "Fixture"),
    ];

    let mut all_success = true;

    let selected = groups
        .iter()
        .filter(|(enabled, _, _)| *enabled)
        .map(|(_, args, name)| (*args, *name))
        .chain(
            filter
                .properties
                .then_some((&["--test", "properties"][..], "Property")),
        );

    for (args, name) in selected {
        println!("{} Running {} tests...", "→".blue(), name.bold());

        let mut cmd = Command::new("cargo");
        cmd.arg("test").args(args);

        match execute_command(&mut cmd) {
            Ok(_) => println!("{} {} tests passed\n", "✓".green(), name),
            Err(_) => {
                println!("{} {} tests failed\n", "✗".red(), name);
                all_success = false;
            }
        }
    }

    if all_success {
        Ok(())
    } else {
        anyhow::bail!("Some test groups failed")
    }
}

fn run_bench() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("bench");

    execute_command(&mut cmd)
}

fn run_selftest(tables: &[String], release: bool) -> Result<()> {
    println!("{}", "=== Fixture Selftest ===".bold().blue());
    println!(
        "{} Build mode: {}",
        "→".blue(),
        if release {
            "release".green().bold()
        } else {
            "debug".yellow().bold()
        }
    );
    for table in tables {
        println!("{} Table: {}", "→".blue(), table.cyan());
    }
    println!();

    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.arg("run");

    if release {
        cmd.arg("--release");
    }

    cmd.arg("--bin").arg("regdiff").arg("--").arg("run");
    for table in tables {
        cmd.arg("--table").arg(table);
    }

    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        println!("\n{} Selftest failed", "✗".red().bold());
        anyhow::bail!("Selftest failed with exit code: {}", status);
    }

    let elapsed = start.elapsed();
    println!(
        "\n{} Selftest completed in {}",
        "✓".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_pre_commit() -> Result<()> {
    println!("{}", "=== Pre-commit Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), false)?;
    run_task("Clippy", || run_clippy(false), false)?;
    run_task("Test", || run_test(false, TestFilter::default()), false)?;

    let elapsed = start.elapsed();
    println!(
        "\n{} {}",
        "✓ Pre-commit checks passed in".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);

    let start = Instant::now();

    match task() {
        Ok(_) => {
            let elapsed = start.elapsed();
            println!(
                "{} {}",
                "✓".green().bold(),
                if verbose {
                    format!("({:.2}s)", elapsed.as_secs_f64())
                } else {
                    String::new()
                }
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
