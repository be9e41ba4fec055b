use anyhow::{Result, anyhow};
use clap::Parser;
use tripwise_cli::{
    AppConfig, Cli, Commands, api_key_from_env, build_model, build_pipeline, build_runner,
    build_session_service, call_agent, run_console,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tripwise_telemetry::init_telemetry("tripwise").map_err(|e| anyhow!("telemetry: {e}"))?;

    let config = AppConfig::load(cli.config.as_deref())?.with_identity(
        cli.app_name,
        cli.user_id,
        cli.session_id,
    );
    config.validate()?;

    let api_key = api_key_from_env()?;
    let model = build_model(&config, &api_key)?;
    let session_service = build_session_service(&config.session).await?;
    let runner = build_runner(&config.identity, build_pipeline(model), session_service);

    match cli.command {
        Commands::Ask { query } => {
            let answer = call_agent(&runner, &config.identity, &query.join(" ")).await?;
            println!("Agent Response: {answer}");
        }
        Commands::Console => run_console(&runner, &config.identity).await?,
    }

    Ok(())
}
