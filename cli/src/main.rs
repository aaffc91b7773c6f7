use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use payload_schema_core::{SchemaDefinition, generate_reports, merge_schemas};
use payload_schema_reports::{collect_definition_paths, load_definitions, write_reports};

#[derive(Debug, Parser)]
#[command(name = "payload-schema")]
#[command(about = "Merge sub and spec payload schemas into one core schema")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge definition files into a core schema, or list the conflicts.
    Merge(MergeArgs),
    /// Write per-schema diagnostic reports as JSON files.
    Report(ReportArgs),
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// Sub-schema definition files and/or directories (JSON or YAML).
    #[arg(long = "sub", num_args = 1..)]
    subs: Vec<PathBuf>,
    /// Spec-schema definition files and/or directories (JSON or YAML).
    #[arg(long = "spec", num_args = 0..)]
    specs: Vec<PathBuf>,
    /// Name of the resulting core schema.
    #[arg(long, default_value = "CorePayload")]
    core_name: String,
    /// Storage-table identifier recorded on the core schema.
    #[arg(long, default_value = "core_payload")]
    table_name: String,
    /// Write the core schema JSON here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// Sub-schema definition files and/or directories (JSON or YAML).
    #[arg(long = "sub", num_args = 0..)]
    subs: Vec<PathBuf>,
    /// Spec-schema definition files and/or directories (JSON or YAML).
    #[arg(long = "spec", num_args = 0..)]
    specs: Vec<PathBuf>,
    /// Output directory for per-schema report files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Merge(args) => run_merge(args),
        Command::Report(args) => run_report(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_inputs(inputs: &[PathBuf]) -> Result<Vec<SchemaDefinition>, String> {
    let paths = collect_definition_paths(inputs).map_err(|e| e.to_string())?;
    load_definitions(&paths).map_err(|e| e.to_string())
}

fn run_merge(args: MergeArgs) -> Result<(), String> {
    if args.subs.is_empty() && args.specs.is_empty() {
        return Err("Specify at least one definition via --sub or --spec".to_string());
    }

    let subs = load_inputs(&args.subs)?;
    let specs = load_inputs(&args.specs)?;

    let core = merge_schemas(&subs, &specs, &args.core_name, &args.table_name)
        .map_err(|e| e.to_string())?;

    let raw = serde_json::to_string_pretty(&core)
        .map_err(|err| format!("Failed to serialize core schema: {err}"))?;
    match args.output {
        Some(path) => {
            fs::write(&path, raw)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!(
                "Merged {} schema(s) into '{}' ({} field(s)).",
                subs.len() + specs.len(),
                path.display(),
                core.fields.len()
            );
        }
        None => println!("{raw}"),
    }

    Ok(())
}

fn run_report(args: ReportArgs) -> Result<(), String> {
    if args.subs.is_empty() && args.specs.is_empty() {
        return Err("Specify at least one definition via --sub or --spec".to_string());
    }

    let subs = load_inputs(&args.subs)?;
    let specs = load_inputs(&args.specs)?;

    let reports = generate_reports(&subs, &specs).map_err(|e| e.to_string())?;
    let written = write_reports(&reports, &args.out_dir).map_err(|e| e.to_string())?;

    let conflicted = reports
        .values()
        .filter(|report| !report.conflicts.is_empty())
        .count();
    println!(
        "Wrote {} report file(s) to '{}' ({} schema(s) with conflicts).",
        written.len(),
        args.out_dir.display(),
        conflicted
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use payload_schema_core::{FieldDecl, TypeDescriptor};

    use super::*;

    fn write_definition(dir: &std::path::Path, schema: &SchemaDefinition) -> PathBuf {
        let path = dir.join(format!("{}.json", schema.name));
        fs::write(&path, serde_json::to_string_pretty(schema).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_run_merge_writes_core_schema() {
        let dir = tempfile::tempdir().unwrap();
        let sub = SchemaDefinition::new(
            "Sub",
            vec![FieldDecl::required("name", TypeDescriptor::named("string"))],
        );
        let sub_path = write_definition(dir.path(), &sub);
        let out = dir.path().join("core.json");

        run_merge(MergeArgs {
            subs: vec![sub_path],
            specs: vec![],
            core_name: "CorePayload".to_string(),
            table_name: "core_payload".to_string(),
            output: Some(out.clone()),
        })
        .unwrap();

        let raw = fs::read_to_string(&out).unwrap();
        let core: payload_schema_core::CoreSchema = serde_json::from_str(&raw).unwrap();
        assert_eq!(core.name, "CorePayload");
        assert_eq!(core.field_names(), vec!["name"]);
    }

    #[test]
    fn test_run_merge_surfaces_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let sub1 = SchemaDefinition::new(
            "Sub1",
            vec![FieldDecl::required("age", TypeDescriptor::named("integer"))],
        );
        let sub2 = SchemaDefinition::new(
            "Sub2",
            vec![FieldDecl::required("age", TypeDescriptor::named("string"))],
        );
        let paths = vec![
            write_definition(dir.path(), &sub1),
            write_definition(dir.path(), &sub2),
        ];

        let err = run_merge(MergeArgs {
            subs: paths,
            specs: vec![],
            core_name: "Core".to_string(),
            table_name: "core".to_string(),
            output: None,
        })
        .unwrap_err();
        assert!(err.contains("type_mismatch on 'age'"));
    }

    #[test]
    fn test_run_merge_requires_inputs() {
        let err = run_merge(MergeArgs {
            subs: vec![],
            specs: vec![],
            core_name: "Core".to_string(),
            table_name: "core".to_string(),
            output: None,
        })
        .unwrap_err();
        assert!(err.contains("--sub or --spec"));
    }

    #[test]
    fn test_run_report_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let sub = SchemaDefinition::new(
            "Sub",
            vec![FieldDecl::required("name", TypeDescriptor::named("string"))],
        );
        let sub_path = write_definition(dir.path(), &sub);
        let out_dir = dir.path().join("reports");

        run_report(ReportArgs {
            subs: vec![sub_path],
            specs: vec![],
            out_dir: out_dir.clone(),
        })
        .unwrap();

        assert!(out_dir.join("Sub.json").is_file());
    }
}
