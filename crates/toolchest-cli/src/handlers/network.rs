//! Network commands: apply, reset, enable/disable, status, templates.

use anyhow::bail;
use std::sync::Arc;

use toolchest_core::{EntityStore, LogSink, NetworkConfig, NetworkTemplate, validate_config};
use toolchest_runtime::{NetworkConfigurator, ShellExecutor};

use crate::cli::{ApplyArgs, NetCommands, SaveTemplateArgs};
use crate::store::JsonFileStore;

pub async fn handle_net(
    store: &JsonFileStore,
    log: Arc<dyn LogSink>,
    command: NetCommands,
) -> anyhow::Result<()> {
    let configurator = NetworkConfigurator::new(Arc::new(ShellExecutor::new()), log);
    match command {
        NetCommands::Apply(args) => {
            let config = resolve_config(store, args).await?;
            if !configurator.apply(&config).await {
                bail!("apply failed");
            }
        }
        NetCommands::Reset { interface } => {
            if !configurator.reset_to_dhcp(&interface).await {
                bail!("reset failed");
            }
        }
        NetCommands::Enable { interface } => {
            if !configurator.enable(&interface).await {
                bail!("enable failed");
            }
        }
        NetCommands::Disable { interface } => {
            if !configurator.disable(&interface).await {
                bail!("disable failed");
            }
        }
        NetCommands::Status { interface } => {
            println!("{}", configurator.query_status(&interface).await);
        }
        NetCommands::SaveTemplate(args) => {
            handle_save_template(store, args).await?;
        }
    }
    Ok(())
}

async fn resolve_config(store: &JsonFileStore, args: ApplyArgs) -> anyhow::Result<NetworkConfig> {
    if let Some(name) = args.template {
        return match store.get_template(&name).await? {
            Some(config) => Ok(config),
            None => bail!("no template named `{name}`"),
        };
    }
    let (Some(interface), Some(address), Some(netmask)) =
        (args.interface, args.address, args.netmask)
    else {
        bail!("pass --template NAME, or --interface/--address/--netmask");
    };
    let mut config = NetworkConfig::new(interface, address, netmask);
    config.gateway = args.gateway;
    config.dns1 = args.dns1;
    config.dns2 = args.dns2;
    Ok(config)
}

async fn handle_save_template(
    store: &JsonFileStore,
    args: SaveTemplateArgs,
) -> anyhow::Result<()> {
    let mut config = NetworkConfig::new(args.interface, args.address, args.netmask);
    config.gateway = args.gateway;
    config.dns1 = args.dns1;
    config.dns2 = args.dns2;
    // Reject bad templates at save time, not at apply time
    validate_config(&config)?;
    let name = args.name.clone();
    store
        .save_template(NetworkTemplate { name, config })
        .await?;
    println!("saved template {}", args.name);
    Ok(())
}
