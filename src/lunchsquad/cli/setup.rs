use clap::{CommandFactory, Parser, Subcommand};
use lunchsquad::export::ExportFormat;
use lunchsquad::model::Kind;
use lunchsquad::presenter::SortKey;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2025-06-02 12:05" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "lunchsquad",
    bin_name = "lunchsquad",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Collect, review and export team lunch orders", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Orders,
    Data,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Orders => "Order Commands:",
            CommandGroup::Data => "Data Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "add" | "list" | "remove" | "vote" | "votes" => Some(CommandGroup::Orders),
            "clear" | "import" | "export" => Some(CommandGroup::Data),
            "status" | "config" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[CommandGroup::Orders, CommandGroup::Data, CommandGroup::Misc]
    }
}

/// Top-level help with subcommands grouped by concern.
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("lunchsquad {version}\n"));
    output.push_str("Collect, review and export team lunch orders\n");
    output.push('\n');
    output.push_str("Usage: lunchsquad [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();
    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<10} {}\n", sc.get_name(), about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("  -v, --verbose    Verbose output\n");
    output.push_str("  -h, --help       Print help\n");
    output.push_str("  -V, --version    Print version\n");
    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add an order
    #[command(display_order = 1)]
    Add {
        #[command(subcommand)]
        meal: AddCommands,
    },

    /// List orders
    #[command(alias = "ls", display_order = 2)]
    List {
        /// Sort by time, name or restaurant (default: order of entry)
        #[arg(short, long, default_value = "input")]
        sort: SortKey,

        /// Only show one restaurant (numbered, kebab, deli)
        #[arg(short, long)]
        kind: Option<Kind>,

        /// Only show submitters whose name contains this
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Remove orders by position (e.g. 1 3 5-7)
    #[command(alias = "rm", display_order = 3)]
    Remove {
        #[arg(required = true, num_args = 1..)]
        positions: Vec<String>,
    },

    /// Vote for today's restaurant
    #[command(display_order = 4)]
    Vote {
        /// numbered, kebab or deli
        kind: Kind,

        /// Who is voting
        #[arg(short, long)]
        name: String,
    },

    /// Show the restaurant vote
    #[command(display_order = 5)]
    Votes,

    /// Remove every order and reset the vote
    #[command(display_order = 10)]
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Replace all orders with the contents of a JSON file
    #[command(display_order = 11)]
    Import { file: PathBuf },

    /// Export orders as json, csv, txt or png
    #[command(display_order = 12)]
    Export {
        format: ExportFormat,

        /// Directory to write into (defaults to the current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Show session, counts and storage locations
    #[command(display_order = 20)]
    Status,

    /// Get or set configuration
    #[command(display_order = 21)]
    Config {
        /// Configuration key (session, font_paths, max_number)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AddCommands {
    /// Order from the numbered menu
    #[command(alias = "a")]
    Numbered {
        /// Who the order is for
        #[arg(short, long)]
        name: String,

        /// Menu item number
        item: String,
    },

    /// Order a kebab
    #[command(alias = "b")]
    Kebab {
        #[arg(short, long)]
        name: String,

        /// Shop code (e.g. bruder, king)
        #[arg(long)]
        venue: String,

        /// Product code (e.g. doner, durum, box)
        #[arg(long)]
        product: String,

        /// Sauce, repeatable
        #[arg(long = "sauce")]
        sauces: Vec<String>,

        /// Extra such as ohne-zwiebel, repeatable
        #[arg(long = "extra")]
        extras: Vec<String>,

        /// Free-text extra, repeatable
        #[arg(long = "custom")]
        custom: Vec<String>,

        /// none, normal or extra
        #[arg(long, default_value = "normal")]
        spice: String,

        /// Box side (pommes, salat), required for boxes
        #[arg(long = "box")]
        box_style: Option<String>,
    },

    /// Order from the deli counter
    #[command(alias = "c")]
    Deli {
        #[arg(short, long)]
        name: String,

        /// Product code
        #[arg(long)]
        product: String,

        /// Salad choice, required for salads
        #[arg(long)]
        salad: Option<String>,

        /// What to get at the bakery
        #[arg(long)]
        bakery: Option<String>,

        #[arg(long)]
        sauce: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },
}
