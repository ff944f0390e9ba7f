//! Demonstration front-end for the declarg engine.
//!
//! A small task-runner shaped tool whose command line is parsed by the
//! engine itself: subcommands, a flag pair, value options with defaults,
//! a repeatable option, and a field-declared option are all exercised.
//! Besides running its (trivial) tasks it can render its own help and
//! export the engine's schema as JSON, YAML, or Markdown.

use std::process::ExitCode;

use declarg_core::{
    ArgValue, Declared, InvalidValue, Opt, Parser, ParserSchema, Subcommand, named_variant,
};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Command {
    #[default]
    Build,
    Test,
    Clean,
}

impl Subcommand for Command {
    fn variants() -> Vec<Self> {
        vec![Command::Build, Command::Test, Command::Clean]
    }

    fn name(&self) -> &'static str {
        match self {
            Command::Build => "build",
            Command::Test => "test",
            Command::Clean => "clean",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Command::Build => "compile the project",
            Command::Test => "run the test suite",
            Command::Clean => "remove build products",
        }
    }
}

/// Output format for `--schema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaFormat {
    Json,
    Yaml,
    Markdown,
}

impl ArgValue for SchemaFormat {
    fn from_token(token: &str) -> Result<Self, InvalidValue> {
        named_variant(
            token,
            [
                ("json", SchemaFormat::Json),
                ("yaml", SchemaFormat::Yaml),
                ("markdown", SchemaFormat::Markdown),
            ],
        )
    }

    fn to_token(&self) -> String {
        match self {
            SchemaFormat::Json => "json",
            SchemaFormat::Yaml => "yaml",
            SchemaFormat::Markdown => "markdown",
        }
        .to_string()
    }
}

#[derive(Debug)]
struct ToolArgs {
    command: Command,
    command_args: Vec<String>,
    configuration: String,
    jobs: Declared<u32>,
    color: bool,
    output: Option<String>,
    defines: Vec<String>,
    schema: Option<SchemaFormat>,
    help: bool,
}

impl Default for ToolArgs {
    fn default() -> Self {
        Self {
            command: Command::default(),
            command_args: Vec::new(),
            configuration: "debug".to_string(),
            jobs: Declared::new(
                Opt::new("-j", "number of parallel jobs")
                    .with_alias("--jobs")
                    .with_category("Execution")
                    .show_default(),
                1,
            ),
            color: true,
            output: None,
            defines: Vec::new(),
            schema: None,
            help: false,
        }
    }
}

fn build_parser() -> Parser<ToolArgs> {
    let mut parser = Parser::<ToolArgs>::new(
        "declarg",
        "Demonstration task runner built on the declarg parsing engine.",
    );
    parser.add_value_option(
        Opt::new("-c", "build configuration")
            .with_alias("--configuration")
            .show_default(),
        |args| &mut args.configuration,
    );
    parser.add_declared(|args| &mut args.jobs);
    parser.add_flag_option(
        Opt::new("--color", "force colored output").with_category("Output"),
        true,
        |args| &mut args.color,
    );
    parser.add_flag_option(
        Opt::new("--no-color", "disable colored output").with_category("Output"),
        false,
        |args| &mut args.color,
    );
    parser.add_optional_value_option(
        Opt::new("-o", "write a run report to this path")
            .with_alias("--output")
            .with_category("Output"),
        |args| &mut args.output,
    );
    parser.add_array_value_option(
        Opt::new("-D", "define a key=value pair (repeatable)").with_alias("--define"),
        |args| &mut args.defines,
    );
    parser.add_optional_value_option(
        Opt::new("--schema", "print the tool schema (json, yaml, markdown)"),
        |args| &mut args.schema,
    );
    parser.add_flag_option(Opt::new("-h", "show this help").with_alias("--help"), true, |args| {
        &mut args.help
    });
    parser.set_subcommand(|args| &mut args.command, |args| &mut args.command_args);
    parser
}

fn render_schema(schema: &ParserSchema, format: SchemaFormat) -> Result<String, String> {
    match format {
        SchemaFormat::Json => serde_json::to_string_pretty(schema)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        SchemaFormat::Yaml => {
            serde_yaml::to_string(schema).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        SchemaFormat::Markdown => Ok(schema_to_markdown(schema)),
    }
}

fn schema_to_markdown(schema: &ParserSchema) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", schema.tool_name));
    out.push_str(&format!("{}\n\n", schema.overview));

    out.push_str("## Options\n\n");
    out.push_str("| Option | Takes value | Description |\n");
    out.push_str("|--------|-------------|-------------|\n");
    for option in &schema.options {
        let name = match &option.alias {
            Some(alias) => format!("`{}`, `{alias}`", option.name),
            None => format!("`{}`", option.name),
        };
        let description = match &option.default {
            Some(default) => format!("{} (default: {default})", option.description),
            None => option.description.clone(),
        };
        let takes_value = if option.requires_value { "yes" } else { "no" };
        out.push_str(&format!("| {name} | {takes_value} | {description} |\n"));
    }

    if !schema.subcommands.is_empty() {
        out.push_str("\n## Subcommands\n\n");
        for subcommand in &schema.subcommands {
            out.push_str(&format!(
                "- **{}**: {}\n",
                subcommand.name, subcommand.description
            ));
        }
    }

    out
}

fn run(args: &ToolArgs) {
    info!(
        command = args.command.name(),
        configuration = %args.configuration,
        jobs = *args.jobs,
        color = args.color,
        "Dispatching command"
    );

    match args.command {
        Command::Build => println!(
            "building [{}] with {} job(s)",
            args.configuration, *args.jobs
        ),
        Command::Test => println!("testing [{}]", args.configuration),
        Command::Clean => println!("removing build products"),
    }
    if !args.defines.is_empty() {
        println!("defines: {}", args.defines.join(", "));
    }
    if !args.command_args.is_empty() {
        println!("forwarded arguments: {}", args.command_args.join(" "));
    }
    if let Some(output) = &args.output {
        println!("report will be written to {output}");
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let parser = build_parser();
    let args = match parser.parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("run 'declarg --help' for usage");
            return ExitCode::from(2);
        }
    };

    if args.help {
        print!("{}", parser.help_text());
        return ExitCode::SUCCESS;
    }

    if let Some(format) = args.schema {
        return match render_schema(&parser.schema(), format) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("error: {error}");
                ExitCode::FAILURE
            }
        };
    }

    run(&args);
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_builds_without_panicking() {
        let parser = build_parser();
        let schema = parser.schema();
        assert_eq!(schema.tool_name, "declarg");
        assert_eq!(schema.subcommands.len(), 3);
    }

    #[test]
    fn test_schema_format_coercion_is_exact() {
        assert_eq!(SchemaFormat::from_token("yaml"), Ok(SchemaFormat::Yaml));
        assert!(SchemaFormat::from_token("YAML").is_err());
        assert_eq!(SchemaFormat::Markdown.to_token(), "markdown");
    }

    #[test]
    fn test_markdown_export_lists_every_option() {
        let parser = build_parser();
        let markdown = schema_to_markdown(&parser.schema());

        assert!(markdown.starts_with("# declarg\n"));
        assert!(markdown.contains("`-c`, `--configuration`"));
        assert!(markdown.contains("(default: debug)"));
        assert!(markdown.contains("- **build**: compile the project"));
    }
}
