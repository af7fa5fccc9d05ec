#[derive(Clone, Copy, Debug)]
pub(crate) struct CommandSpec {
    pub command: &'static str,
    pub action: &'static str,
}

pub(crate) const TOOL_VALUE_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "apply",
        action: "apply_tool",
    },
    CommandSpec {
        command: "set",
        action: "apply_tool",
    },
];

pub(crate) const TOOL_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "on",
        action: "enable_tool",
    },
    CommandSpec {
        command: "off",
        action: "disable_tool",
    },
];

pub(crate) const SINGLE_PATH_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "load",
        action: "load_image",
    },
    CommandSpec {
        command: "export",
        action: "export_image",
    },
];

pub(crate) const RAW_ARG_COMMANDS: &[CommandSpec] = &[CommandSpec {
    command: "menu",
    action: "activate_menu",
}];

pub(crate) const NO_ARG_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "accept",
        action: "apply_plan",
    },
    CommandSpec {
        command: "tools",
        action: "list_tools",
    },
    CommandSpec {
        command: "help",
        action: "help",
    },
];

pub(crate) const RESIZE_COMMAND: CommandSpec = CommandSpec {
    command: "resize",
    action: "resize_ui",
};

pub const CHAT_HELP_COMMANDS: &[&str] = &[
    "/apply <tool> <value>",
    "/set <tool> <value>",
    "/on <tool>",
    "/off <tool>",
    "/accept",
    "/load <path>",
    "/export <path>",
    "/resize <width> <height>",
    "/menu <name>",
    "/tools",
    "/help",
];
