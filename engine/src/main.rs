use anyhow::{Result, bail};
use memsim_engine::{
    alloc::compare::run_all,
    cli::{
        render,
        shell::{print_help, run_shell},
        utils::{parse_list, parse_sizes},
    },
    config::SimConfig,
    replace::policy::ReplacementPolicy,
    telemetry::init_logging,
};

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");

    let mut config = SimConfig::from_env()?;
    init_logging(&config.log)?;

    if args.len() < 2 {
        eprintln!("Usage: {} <shell|fit|replace|help> [args] [--json]", args[0]);
        std::process::exit(1);
    }
    match args[1].as_str() {
        "shell" => run_shell(config)?,
        "fit" => {
            if let Some(blocks) = args.get(2) {
                config.blocks = parse_sizes(blocks);
            }
            if let Some(processes) = args.get(3) {
                config.processes = parse_sizes(processes);
            }
            let cmp = run_all(&config.blocks, &config.processes);
            if json {
                println!("{}", serde_json::to_string_pretty(&cmp)?);
            } else {
                print!("{}", render::comparison(&cmp, &config.blocks, &config.processes));
            }
        }
        "replace" => {
            let policies = match args.get(2).map(String::as_str) {
                None | Some("all") => ReplacementPolicy::ALL.to_vec(),
                Some(p) => vec![p.parse::<ReplacementPolicy>()?],
            };
            if let Some(frames) = args.get(3) {
                config.frame_capacity = frames.parse()?;
            }
            if let Some(pages) = args.get(4) {
                config.reference_string = parse_list(pages);
            }
            if config.frame_capacity == 0 {
                bail!("frame count must be at least 1");
            }
            for policy in policies {
                let result = policy.run(&config.reference_string, config.frame_capacity);
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print!("{}", render::replacement(policy, &result));
                }
            }
        }
        "help" => print_help(),
        other => {
            eprintln!("Unknown command: {}", other);
            std::process::exit(1);
        }
    }
    Ok(())
}
