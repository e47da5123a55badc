use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gps_map_tools::api::{register_map_commands, CommandTable, ConsoleInput};
use gps_map_tools::{
    Devices, GpsMapTools, JsonMapStore, MapStore, SimulatedGps, SimulatedRobot, ToolsConfig,
};

type ConsoleTools = GpsMapTools<SimulatedGps, SimulatedRobot, JsonMapStore>;

fn print_help(table: &CommandTable<ConsoleTools>) {
    println!("gps <latitude> <longitude> <altitude> [hdop]   move the simulated GPS fix");
    println!("nofix                                          drop the GPS fix");
    println!("help                                           show this list");
    println!("quit                                           leave");
    for command in table.iter() {
        let argument = if command.takes_argument { " <text>" } else { "" };
        println!("{}{}", command.name, argument);
        println!("    {}", command.description);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();

    let config = match args.get(1) {
        Some(path) => ToolsConfig::from_file(Path::new(path))?,
        None => ToolsConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    info!("GPS map tools v{}", env!("CARGO_PKG_VERSION"));

    let mut store = match &config.map_file {
        Some(path) => {
            info!("Loading map from {}", path.display());
            JsonMapStore::open(path)?
        }
        None => {
            warn!("No map file configured, start one with Map:startNewMap <name>");
            JsonMapStore::new()
        }
    };
    store.add_reload_listener(Box::new(|reloaded| {
        info!(
            "Map {} reloaded: {} objects, {} lines, origin {}",
            reloaded.identity.display(),
            reloaded.object_count,
            reloaded.segment_count,
            if reloaded.has_origin { "set" } else { "unset" }
        );
    }));
    if store.is_identified() && !store.has_origin() {
        warn!("Map has no origin, drive to the map center and run Map:setMapOriginHere");
    }

    let devices = Devices::new(Some(SimulatedGps::new()), Some(SimulatedRobot::new()), Some(store));
    let mut tools = GpsMapTools::new(devices, &config);
    let mut table = CommandTable::new();
    register_map_commands(&mut table, &config);

    print_help(&table);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };

        let input = match ConsoleInput::parse(&line?) {
            Ok(input) => input,
            Err(err) => {
                error!("{}", err);
                continue;
            }
        };

        match input {
            ConsoleInput::Empty => {}
            ConsoleInput::Help => print_help(&table),
            ConsoleInput::Quit => break,
            ConsoleInput::NoFix => {
                if let Some(gps) = tools.devices_mut().gps.as_mut() {
                    gps.lose_fix();
                }
                info!("GPS fix dropped");
            }
            ConsoleInput::Gps {
                latitude,
                longitude,
                altitude,
                hdop,
            } => {
                if let Some(gps) = tools.devices_mut().gps.as_mut() {
                    gps.set_fix(latitude, longitude, altitude);
                    gps.set_hdop(hdop);
                }
                match tools.current_position() {
                    Ok(position) => info!("Robot is at {} in the map", position),
                    Err(err) => info!("GPS fix updated ({})", err),
                }
            }
            ConsoleInput::Command { name, argument } => {
                // Failures are already logged by the table
                if table.dispatch(&mut tools, &name, &argument).is_ok() {
                    info!("{} done", name);
                }
            }
        }
    }

    info!("Exiting");
    Ok(())
}
