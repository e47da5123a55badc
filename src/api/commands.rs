//! Named operator commands
//!
//! Commands are registered by name with a description and a handler. Handlers
//! receive the command target and the argument string as given; errors are
//! logged and handed back to the caller.

use tracing::{debug, error};

use crate::hardware::{GpsReceiver, RobotActuator};
use crate::map::MapStore;
use crate::tools::{GpsMapTools, ToolError, ToolResult};
use crate::utils::config::ToolsConfig;

/// Handler invoked with the command target and its argument string
pub type CommandHandler<T> = Box<dyn Fn(&mut T, &str) -> ToolResult<()> + Send>;

/// A registered command
pub struct Command<T> {
    pub name: String,
    pub description: String,
    /// Whether the handler reads its argument string
    pub takes_argument: bool,
    handler: CommandHandler<T>,
}

/// Commands available on a target of type `T`, in registration order
pub struct CommandTable<T> {
    commands: Vec<Command<T>>,
}

impl<T: 'static> Default for CommandTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> CommandTable<T> {
    pub fn new() -> Self {
        Self { commands: Vec::new() }
    }

    /// Register a command that ignores its argument.
    ///
    /// A command registered twice keeps the newer handler.
    pub fn add_command<F>(&mut self, name: &str, description: &str, handler: F)
    where
        F: Fn(&mut T) -> ToolResult<()> + Send + 'static,
    {
        self.insert(Command {
            name: name.to_string(),
            description: description.to_string(),
            takes_argument: false,
            handler: Box::new(move |target: &mut T, _: &str| handler(target)),
        });
    }

    /// Register a command that takes a string argument
    pub fn add_string_command<F>(&mut self, name: &str, description: &str, handler: F)
    where
        F: Fn(&mut T, &str) -> ToolResult<()> + Send + 'static,
    {
        self.insert(Command {
            name: name.to_string(),
            description: description.to_string(),
            takes_argument: true,
            handler: Box::new(handler),
        });
    }

    fn insert(&mut self, command: Command<T>) {
        match self.commands.iter_mut().find(|existing| existing.name == command.name) {
            Some(existing) => *existing = command,
            None => self.commands.push(command),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.iter().any(|command| command.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|command| command.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command<T>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run the command called `name` against `target`
    pub fn dispatch(&self, target: &mut T, name: &str, argument: &str) -> ToolResult<()> {
        let Some(command) = self.commands.iter().find(|command| command.name == name) else {
            error!("Unknown command \"{}\"", name);
            return Err(ToolError::UnknownCommand(name.to_string()));
        };

        debug!("Running command {} with argument \"{}\"", name, argument);
        (command.handler)(target, argument).inspect_err(|err| error!("{}", err))
    }
}

pub const START_NEW_MAP: &str = "Map:startNewMap";
pub const ADD_GOAL_HERE: &str = "Map:addGoalHere";
pub const ADD_HOME_HERE: &str = "Map:addHomeHere";
pub const SET_MAP_ORIGIN_HERE: &str = "Map:setMapOriginHere";
pub const FORBIDDEN_LINE_START: &str = "Map:forbiddenLineStart";
pub const FORBIDDEN_LINE_END: &str = "Map:forbiddenLineEnd";
pub const OBSTACLE_LINE_START: &str = "Map:obstacleLineStart";
pub const OBSTACLE_LINE_END: &str = "Map:obstacleLineEnd";
pub const RELOAD_FILE: &str = "Map:reloadFile";
pub const RESET_ROBOT_POSE: &str = "ResetRobotPose";

/// Register the map tool commands.
///
/// The obstacle line pair is only registered when enabled in `config`.
pub fn register_map_commands<G, R, M>(
    table: &mut CommandTable<GpsMapTools<G, R, M>>,
    config: &ToolsConfig,
) where
    G: GpsReceiver + 'static,
    R: RobotActuator + 'static,
    M: MapStore + 'static,
{
    table.add_string_command(
        START_NEW_MAP,
        "Start a new map using current GPS position as origin. Provide map name (required)",
        |tools, name| tools.start_new_map(name).map(drop),
    );
    table.add_string_command(
        ADD_GOAL_HERE,
        "Modify the map to include a goal at the current GPS location. Provide goal name.",
        |tools, label| tools.add_goal_here(label).map(drop),
    );
    table.add_string_command(
        ADD_HOME_HERE,
        "Modify the map to include a home at the current GPS location.",
        |tools, description| tools.add_home_here(description).map(drop),
    );
    table.add_command(
        SET_MAP_ORIGIN_HERE,
        "Set the georeference point for map center (origin) at the current GPS position to the map. \
         Only use this command if the robot is at the map center point (origin of map). \
         Use this to add a georeference point to a map generated by laser scanning and processing.",
        |tools| tools.set_map_origin_here().map(drop),
    );
    table.add_command(FORBIDDEN_LINE_START, "Begin a new forbidden line", |tools| {
        tools.forbidden_line_start().map(drop)
    });
    table.add_command(
        FORBIDDEN_LINE_END,
        "End a forbidden line that was started with forbiddenLineStart",
        |tools| tools.forbidden_line_end().map(drop),
    );

    if config.enable_obstacle_commands {
        table.add_command(OBSTACLE_LINE_START, "Begin a new obstacle line", |tools| {
            tools.obstacle_line_start().map(drop)
        });
        table.add_command(
            OBSTACLE_LINE_END,
            "End an obstacle line that was started with obstacleLineStart",
            |tools| tools.obstacle_line_end().map(drop),
        );
    }

    table.add_command(RELOAD_FILE, "Reload map from its file on the robot", |tools| {
        tools.reload_map_file()
    });
    table.add_command(RESET_ROBOT_POSE, "Reset robot pose to 0,0,0", |tools| {
        tools.reset_robot_pose()
    });
}
