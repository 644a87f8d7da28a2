use contract_lexer::config::RuntimeConfig;
use contract_lexer::{logging, patterns, pipeline};
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;

#[derive(Debug, Default)]
struct CliOptions {
    input: Option<String>,
    json: bool,
    include_trivia: bool,
    stop_on_balance_error: bool,
    config_path: Option<String>,
    lookups: Vec<String>,
}

#[derive(Serialize)]
struct CliOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a pipeline::ScanReport>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    lookups: BTreeMap<String, Option<String>>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("contract-lexer");

    if args.len() < 2 {
        eprintln!("Usage: {} <source-file> [options]", program);
        eprintln!("       {} --help", program);
        std::process::exit(1);
    }

    let options = match parse_options(&args[1..]) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_help(program);
            return Ok(());
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    };

    let mut config = match &options.config_path {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    if options.include_trivia {
        config.scan.include_trivia = true;
    }
    if options.stop_on_balance_error {
        config.scan.stop_on_balance_error = true;
    }

    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;

    let report = match &options.input {
        Some(path) => match pipeline::scan_file(path, &config.scan) {
            Ok(report) => Some(report),
            Err(error) => {
                logging::safe_log_error(error.error_code(), &error.to_string());
                eprintln!("FAILED: {}", error);
                std::process::exit(1);
            }
        },
        None => None,
    };

    let mut lookups = BTreeMap::new();
    if !options.lookups.is_empty() {
        let rules = patterns::load_rules(&config)?;
        for name in &options.lookups {
            let rule = rules.get(name)?.cloned();
            lookups.insert(name.clone(), rule);
        }
    }

    if options.json {
        let output = CliOutput {
            report: report.as_ref(),
            lookups,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if let Some(report) = &report {
            println!("{}", report.format_text());
        }
        for (name, rule) in &lookups {
            match rule {
                Some(rule) => println!("{} => {}", name, rule),
                None => println!("{} => (no rule)", name),
            }
        }
    }

    if report.as_ref().is_some_and(|r| r.has_errors()) {
        std::process::exit(1);
    }

    Ok(())
}

/// Returns `Ok(None)` when help was requested
fn parse_options(args: &[String]) -> Result<Option<CliOptions>, String> {
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(None),
            "--json" => options.json = true,
            "--trivia" => options.include_trivia = true,
            "--stop-on-balance-error" => options.stop_on_balance_error = true,
            "--config" | "--rules" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| format!("{} requires a file path", args[i - 1]))?;
                options.config_path = Some(path.clone());
            }
            "--lookup" => {
                i += 1;
                let name = args
                    .get(i)
                    .ok_or_else(|| "--lookup requires a name".to_string())?;
                options.lookups.push(name.clone());
            }
            other if other.starts_with("--") => {
                return Err(format!("Unknown option '{}'", other));
            }
            path => {
                if options.input.is_some() {
                    return Err(format!("Unexpected argument '{}'", path));
                }
                options.input = Some(path.to_string());
            }
        }
        i += 1;
    }

    if options.input.is_none() && options.lookups.is_empty() {
        return Err("Nothing to do: give a source file or --lookup".to_string());
    }
    Ok(Some(options))
}

fn print_help(program_name: &str) {
    println!("Contract Lexer v{}", env!("CARGO_PKG_VERSION"));
    println!("Tokenize contract-annotated sources and resolve pattern rules");
    println!();
    println!("USAGE:");
    println!("    {} <source-file> [options]", program_name);
    println!("    {} --rules <rules.toml> --lookup <name>...", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help                    Show this help message");
    println!("    --json                    Print the report as JSON");
    println!("    --trivia                  Keep whitespace and comment tokens in the report");
    println!("    --stop-on-balance-error   Stop at the first delimiter imbalance");
    println!("    --config <file.toml>      Load scan, logging and rule settings");
    println!("    --rules <file.toml>       Same as --config");
    println!("    --lookup <name>           Resolve a dotted name against the [rules] table");
    println!();
    println!("ENVIRONMENT:");
    println!("    CONTRACT_LEXER_SCAN_INCLUDE_TRIVIA, CONTRACT_LEXER_LOGGING_MIN_LEVEL, ...");
    println!();
    println!("EXAMPLES:");
    println!("    {} Widget.java", program_name);
    println!("    {} Widget.java --json --trivia", program_name);
    println!(
        "    {} --rules lexer.toml --lookup com.example.Widget",
        program_name
    );
}
