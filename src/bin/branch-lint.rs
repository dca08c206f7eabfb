use anyhow::Result;
use std::process;

use branch_name_lint::config::Config;
use branch_name_lint::git;
use branch_name_lint::output::Reporter;
use branch_name_lint::rules::loader;
use branch_name_lint::validation::Linter;

fn main() -> Result<()> {
    let config = Config::from_args_and_env()?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let rules = loader::load(config.rule_file.as_deref())?;
    let branch = match &config.branch {
        Some(branch) => branch.clone(),
        None => git::current_branch()?,
    };

    let result = Linter::new(&rules).evaluate(&branch);
    Reporter::new(&config, &rules.indentation).report(&result);
    process::exit(result.code);
}
