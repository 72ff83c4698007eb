// Colors
pub const DARK_GREEN: u32 = 0x1F8B4C;
pub const RED: u32 = 0xE74C3C;

// Error messages
pub const GENERAL_ISSUE: &str = "Something went wrong, blame Jeff";
pub const ONLY_GUILDS: &str = "That command is only available in servers";

// Reactions
pub const THUMBS_DOWN: &str = "\u{1F44E}";
