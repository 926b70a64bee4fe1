use std::io::stdout;

use app::AppBuilder;
use clap::Parser;
use color_eyre::{Result, eyre::eyre};
use storefront::{
    app::StorefrontApp,
    cli::{Cli, Cmd},
    commands,
    config::Config,
    errors,
    services::HttpAddressApi,
};

#[tokio::main]
pub async fn main() -> Result<()> {
    errors::init()?;
    let args = Cli::parse();

    let context = AppBuilder::<StorefrontApp>::new(env!("CARGO_PKG_VERSION"))
        .map_err(|e| eyre!("initialisation failed: {e}"))?
        .build_simple();
    let config = Config::new(context.path_context())?;
    tracing::info!(
        version = context.version(),
        config_dir = %config.config_dir.display(),
        "storefront starting"
    );

    match args.cmd.unwrap_or(Cmd::Run) {
        Cmd::Run => {
            let mut app = StorefrontApp::from_config(config, context.version())?;
            app.run().await?;
        }
        Cmd::List { json } => {
            let api = HttpAddressApi::new(&config.api)?;
            commands::list(&api, json, &mut stdout().lock()).await?;
        }
        Cmd::Check(check) => {
            let code = commands::check(&check, &mut stdout().lock())?;
            if code != 0 {
                // flush the file log before exiting
                drop(context);
                std::process::exit(code);
            }
        }
    }
    Ok(())
}
