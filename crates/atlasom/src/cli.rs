//! Clap derive structures for the `atlasom` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Also compiled by `build.rs` for man pages, so it may only depend on
//! clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// atlasom -- operate Atlas 500 edge appliances from the command line
#[derive(Debug, Parser)]
#[command(
    name = "atlasom",
    version,
    about = "Operate Atlas 500 edge appliances from the command line",
    long_about = "A command-line console for the Atlas 500 operation and maintenance\n\
        service. Talks to the appliance Redfish API with the same session,\n\
        validation and error reporting the web console uses.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Appliance profile to use
    #[arg(long, short = 'p', env = "ATLASOM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Appliance URL, e.g. https://192.168.2.111 (overrides profile)
    #[arg(long, short = 'e', env = "ATLASOM_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// User name to log in with (overrides profile)
    #[arg(long, short = 'u', env = "ATLASOM_USER", global = true)]
    pub user: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ATLASOM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Language of appliance messages
    #[arg(long, env = "ATLASOM_LANG", global = true)]
    pub lang: Option<Lang>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ATLASOM_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds, 1 to 86400 (overrides profile)
    #[arg(
        long,
        env = "ATLASOM_TIMEOUT",
        global = true,
        value_parser = clap::value_parser!(u64).range(1..=86_400)
    )]
    pub timeout: Option<u64>,
}

// ── Output, Color & Language Enums ───────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Lang {
    /// English
    En,
    /// Simplified Chinese
    Zh,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and keep the session for later commands
    Login(LoginArgs),

    /// End the current session
    Logout,

    /// Show the current session, device model and capabilities
    Whoami,

    /// System information, time, reboot and factory reset
    #[command(alias = "sys")]
    System(SystemArgs),

    /// Processor, AI processor, memory and extension modules
    #[command(alias = "hw")]
    Hardware(HardwareArgs),

    /// Ethernet, LTE, NTP and network manager settings
    #[command(alias = "net")]
    Network(NetworkArgs),

    /// Disks, partitions and NFS mounts
    Storage(StorageArgs),

    /// Accounts, certificates, login rules and password policy
    #[command(alias = "sec")]
    Security(SecurityArgs),

    /// Upload, apply and activate firmware
    #[command(alias = "fw")]
    Firmware(FirmwareArgs),

    /// List and collect log archives
    Logs(LogsArgs),

    /// Current alarms and alarm shields
    Alarms(AlarmsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ── System ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Model, serial number, versions and sensor readings
    Info,

    /// Refresh the overview until interrupted
    Watch {
        /// Seconds between refreshes
        #[arg(long, short = 'n', default_value = "5")]
        interval: u64,

        /// Stop after this many refreshes
        #[arg(long)]
        count: Option<u64>,
    },

    /// Change host name, asset tag or clock
    Set {
        /// New host name
        #[arg(long)]
        host_name: Option<String>,

        /// New asset tag
        #[arg(long)]
        asset_tag: Option<String>,

        /// Set the clock, "YYYY-MM-DD HH:MM:SS"
        #[arg(long)]
        date_time: Option<String>,

        /// UTC offset of the clock, e.g. "+08:00"
        #[arg(long)]
        time_zone: Option<String>,
    },

    /// Show the appliance clock
    Time,

    /// Restart the appliance
    Reboot {
        /// How to restart
        #[arg(long = "type", value_enum, default_value = "graceful")]
        reset_type: ResetKind,
    },

    /// Restore factory settings (requires the root password)
    RestoreDefaults {
        /// Keep the address of this interface, e.g. GMAC0
        #[arg(long)]
        keep_ethernet: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResetKind {
    /// Stop services, then restart
    Graceful,
    /// Restart immediately
    Force,
    /// Power cycle
    Cold,
}

// ── Hardware ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HardwareArgs {
    #[command(subcommand)]
    pub command: HardwareCommand,
}

#[derive(Debug, Subcommand)]
pub enum HardwareCommand {
    /// CPU details
    Cpu,
    /// AI processor details
    Ai,
    /// Memory details
    Memory,
    /// Extension modules
    Modules {
        /// Show one module, and its device when given
        id: Option<String>,

        /// Device of the module
        #[arg(long, requires = "id")]
        device: Option<String>,
    },
    /// Extended devices
    Devices {
        /// Show one device
        id: Option<String>,
    },
}

// ── Network ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NetworkArgs {
    #[command(subcommand)]
    pub command: NetworkCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworkCommand {
    /// List Ethernet interfaces
    #[command(alias = "ls")]
    List,

    /// Show one Ethernet interface
    Get {
        /// Interface id, e.g. GMAC0
        id: String,
    },

    /// Replace the static IPv4 addresses of an interface
    SetIp {
        /// Interface id, e.g. GMAC0
        id: String,

        /// ADDRESS/MASK[,GATEWAY[,VLAN[,TAG]]], repeat for up to 4
        #[arg(long = "address", short = 'a', required = true)]
        addresses: Vec<String>,
    },

    /// List every address in use on the appliance
    Ips,

    /// LTE modem
    Lte(LteArgs),

    /// NTP client
    Ntp(NtpArgs),

    /// Local or FusionDirector management
    Manager(ManagerArgs),
}

#[derive(Debug, Args)]
pub struct LteArgs {
    #[command(subcommand)]
    pub command: LteCommand,
}

#[derive(Debug, Subcommand)]
pub enum LteCommand {
    /// Modem, SIM and signal status
    Status,

    /// Switch the modem and mobile data
    Enable {
        /// Turn the modem off instead
        #[arg(long, conflicts_with = "data")]
        off: bool,

        /// Also enable mobile data
        #[arg(long)]
        data: bool,
    },

    /// Show or change the APN
    Apn {
        /// APN name; omit to show the current settings
        name: Option<String>,

        /// APN user
        #[arg(long, requires = "name")]
        user: Option<String>,

        /// Prompt for the APN password
        #[arg(long, requires = "name")]
        password: bool,

        /// Authentication type
        #[arg(long, value_enum, default_value = "none")]
        auth: ApnAuth,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ApnAuth {
    None,
    Pap,
    Chap,
    PapOrChap,
}

#[derive(Debug, Args)]
pub struct NtpArgs {
    #[command(subcommand)]
    pub command: NtpCommand,
}

#[derive(Debug, Subcommand)]
pub enum NtpCommand {
    /// Show NTP settings
    Get,

    /// Configure the NTP client
    Set {
        /// Primary server address
        #[arg(long, required_unless_present = "disable")]
        server: Option<String>,

        /// Backup server address
        #[arg(long)]
        backup: Option<String>,

        /// Local server address
        #[arg(long)]
        local: Option<String>,

        /// Turn the NTP client off
        #[arg(long, conflicts_with_all = ["server", "backup", "local"])]
        disable: bool,
    },
}

#[derive(Debug, Args)]
pub struct ManagerArgs {
    #[command(subcommand)]
    pub command: ManagerCommand,
}

#[derive(Debug, Subcommand)]
pub enum ManagerCommand {
    /// Show the management mode, connection state and node id
    Get,

    /// Switch management mode
    Set {
        /// Management mode
        #[arg(long, value_enum)]
        mode: ManagerMode,

        /// FusionDirector address
        #[arg(long, required_if_eq("mode", "fusion-director"))]
        ip: Option<String>,

        /// FusionDirector port
        #[arg(long, default_value = "443")]
        port: u16,

        /// FusionDirector account (prompts for its password)
        #[arg(long)]
        account: Option<String>,

        /// FusionDirector server name
        #[arg(long)]
        server_name: Option<String>,

        /// Node id to register with
        #[arg(long)]
        node_id: Option<String>,

        /// Only test the connection
        #[arg(long)]
        test: bool,
    },

    /// Import the FusionDirector root certificate
    ImportCert {
        /// Certificate file (.crt, .cer, .pem)
        file: PathBuf,
    },

    /// Import the FusionDirector revocation list
    ImportCrl {
        /// CRL file (.crl)
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ManagerMode {
    /// Managed through this console
    Web,
    /// Managed by FusionDirector
    FusionDirector,
}

// ── Storage ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StorageArgs {
    #[command(subcommand)]
    pub command: StorageCommand,
}

#[derive(Debug, Subcommand)]
pub enum StorageCommand {
    /// List disks
    Disks,

    /// Disk partitions
    #[command(alias = "part")]
    Partitions(PartitionArgs),

    /// NFS mounts
    Nfs(NfsArgs),
}

#[derive(Debug, Args)]
pub struct PartitionArgs {
    #[command(subcommand)]
    pub command: PartitionCommand,
}

#[derive(Debug, Subcommand)]
pub enum PartitionCommand {
    /// List partitions
    #[command(alias = "ls")]
    List,

    /// Split a disk into ext4 partitions
    Create {
        /// Disk id as listed by `storage disks`
        #[arg(long)]
        device: String,

        /// Number of partitions (1-16)
        #[arg(long, short = 'n', default_value = "1")]
        number: u8,

        /// Capacity of each partition in GB, a multiple of 0.5
        #[arg(long, short = 'c')]
        capacity: f64,
    },

    /// Delete a partition
    #[command(alias = "rm")]
    Delete {
        /// Partition id
        id: String,
    },

    /// Mount a partition
    Mount {
        /// Partition id
        id: String,
        /// Absolute mount path
        path: String,
    },

    /// Unmount a partition
    Unmount {
        /// Partition id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct NfsArgs {
    #[command(subcommand)]
    pub command: NfsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NfsCommand {
    /// List NFS mounts
    #[command(alias = "ls")]
    List,
    /// Mount an NFS share
    Mount(NfsTarget),
    /// Unmount an NFS share
    Unmount(NfsTarget),
}

#[derive(Debug, Args)]
pub struct NfsTarget {
    /// NFS server address
    pub server: String,
    /// Exported directory on the server
    pub dir: String,
    /// Local mount path
    pub mount_path: String,
}

// ── Security ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SecurityArgs {
    #[command(subcommand)]
    pub command: SecurityCommand,
}

#[derive(Debug, Subcommand)]
pub enum SecurityCommand {
    /// List local accounts
    Accounts,

    /// Change user name and password of an account
    Passwd {
        /// Account id
        #[arg(default_value = "1")]
        id: String,

        /// New user name (default: keep the current one)
        #[arg(long)]
        new_user: Option<String>,
    },

    /// Show or set the session inactivity timeout
    SessionTimeout {
        /// Minutes (5-120)
        minutes: Option<u32>,
    },

    /// Show or set the password validity period
    PasswordExpiry {
        /// Days (0-365, 0 = never)
        days: Option<u32>,
    },

    /// HTTPS server certificate
    Cert(CertArgs),

    /// Login rules (time, IP and MAC restrictions)
    LoginRules(LoginRulesArgs),

    /// Weak password dictionary
    PunyDict(PunyDictArgs),
}

#[derive(Debug, Args)]
pub struct CertArgs {
    #[command(subcommand)]
    pub command: CertCommand,
}

#[derive(Debug, Subcommand)]
pub enum CertCommand {
    /// Show the installed certificate
    Show,

    /// Install a server certificate
    Import {
        /// Certificate file (.crt, .cer)
        file: PathBuf,
    },

    /// Download a certificate signing request
    Csr {
        /// Output file
        #[arg(long, short = 'O', default_value = "atlas500.csr")]
        out: PathBuf,
    },

    /// Days before expiry at which to raise an alarm
    AlarmTime {
        /// Days (7-180)
        days: u32,
    },
}

#[derive(Debug, Args)]
pub struct LoginRulesArgs {
    #[command(subcommand)]
    pub command: LoginRulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum LoginRulesCommand {
    /// Show login rules
    Show,

    /// Replace login rules from a JSON file
    Set {
        /// JSON array of rules
        #[arg(long)]
        from_file: PathBuf,
    },

    /// Upload a login rules file
    Import {
        /// Rules file (.ini)
        file: PathBuf,
    },

    /// Download the login rules file
    Export {
        /// Output file
        #[arg(long, short = 'O', default_value = "login_rules.ini")]
        out: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct PunyDictArgs {
    #[command(subcommand)]
    pub command: PunyDictCommand,
}

#[derive(Debug, Subcommand)]
pub enum PunyDictCommand {
    /// Upload a dictionary
    Import {
        /// Dictionary file (.conf)
        file: PathBuf,
    },

    /// Download the dictionary
    Export {
        /// Output file
        #[arg(long, short = 'O', default_value = "weakdictionary.conf")]
        out: PathBuf,
    },

    /// Remove the custom dictionary
    Delete,
}

// ── Firmware ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FirmwareArgs {
    #[command(subcommand)]
    pub command: FirmwareCommand,
}

#[derive(Debug, Subcommand)]
pub enum FirmwareCommand {
    /// Firmware versions and update service state
    Status,

    /// Upload a firmware package
    Upload {
        /// Package (.zip)
        file: PathBuf,
    },

    /// Upload a package and start the update
    Update {
        /// Package (.zip)
        file: PathBuf,

        /// Return once the update starts
        #[arg(long)]
        no_wait: bool,
    },

    /// Activate the updated firmware (restarts the appliance)
    Activate,

    /// Show or follow an update task
    Task {
        /// Task id
        id: String,

        /// Poll until the task finishes
        #[arg(long, short = 'w')]
        wait: bool,
    },
}

// ── Logs ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List log services
    #[command(alias = "ls")]
    List,

    /// Download an archive of the named logs
    Collect {
        /// Log names, e.g. NPU OS
        #[arg(required = true)]
        names: Vec<String>,

        /// Output file
        #[arg(long, short = 'O', default_value = "logs.tar.gz")]
        out: PathBuf,
    },
}

// ── Alarms ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AlarmsArgs {
    #[command(subcommand)]
    pub command: AlarmsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlarmsCommand {
    /// Current alarms
    #[command(alias = "ls")]
    List,

    /// Shielded alarms
    Shields,

    /// Stop reporting an alarm
    Shield(ShieldArgs),

    /// Report a shielded alarm again
    Unshield(ShieldArgs),
}

#[derive(Debug, Args)]
pub struct ShieldArgs {
    /// Alarm id, 8 hex digits
    #[arg(long)]
    pub alarm_id: String,

    /// Unique identifier of the alarm source, 8 hex digits
    #[arg(long)]
    pub source: String,

    /// Severity (0-3)
    #[arg(long, default_value = "1")]
    pub severity: String,

    /// Alarm instance, e.g. "NPU 0"
    #[arg(long, default_value = "")]
    pub instance: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value
    Set {
        /// Config key (e.g., "defaults.output", "profiles.edge.endpoint")
        key: String,
        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store the profile password in the system keyring
    SetPassword {
        /// Profile (default: active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
