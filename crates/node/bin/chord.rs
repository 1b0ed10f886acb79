use chord_core::inspect::NodeInspect;
use chord_node::config::Config;
use chord_node::config::DEFAULT_CONFIG_PATH;
use chord_node::logging::init_logging;
use chord_node::logging::LogLevel;
use chord_node::simulation::Simulation;
use chord_node::util::expand_home;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(about, version, author)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, default_value_t = LogLevel::Info, value_enum, env)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    #[command(about = "Writes a default ring configuration.")]
    Init(InitCommand),
    #[command(about = "Joins every configured node, stores the keys and prints a JSON report.")]
    Run(RunCommand),
    #[command(
        about = "Shows one node after the ring is built. Include successor, predecessor, finger table and keys."
    )]
    Inspect(InspectCommand),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[arg(
        long,
        short = 'c',
        env = "CHORD_CONFIG",
        default_value = DEFAULT_CONFIG_PATH,
        help = "Config file location"
    )]
    pub config: String,

    #[arg(long, help = "Override ring_bits of the config file")]
    pub ring_bits: Option<u8>,

    #[arg(long, help = "Override rpc_timeout_ms of the config file")]
    pub rpc_timeout_ms: Option<u64>,
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<Config> {
        let mut config = Config::read_fs(&self.config)?;
        if let Some(bits) = self.ring_bits {
            config.ring_bits = bits;
        }
        if let Some(timeout) = self.rpc_timeout_ms {
            config.rpc_timeout_ms = timeout;
        }
        Ok(config)
    }
}

#[derive(Args, Debug)]
struct InitCommand {
    #[arg(
        long,
        default_value = DEFAULT_CONFIG_PATH,
        help = "The location of config file"
    )]
    pub location: String,

    #[arg(long, short = 'f', help = "Overwrite an existing config file")]
    pub force: bool,
}

#[derive(Args, Debug)]
struct RunCommand {
    #[command(flatten)]
    config_args: ConfigArgs,
}

#[derive(Args, Debug)]
struct InspectCommand {
    #[command(flatten)]
    config_args: ConfigArgs,

    #[arg(long, short = 'n', help = "Node to show. If not provided, show every node")]
    pub node: Option<u64>,
}

fn init(args: InitCommand) -> anyhow::Result<()> {
    if !args.force && expand_home(&args.location)?.exists() {
        anyhow::bail!(
            "config file {} exists, use --force to overwrite",
            args.location
        );
    }
    let path = Config::default().write_fs(&args.location)?;
    println!("Your config file has saved to: {}", path);
    Ok(())
}

async fn run(args: RunCommand) -> anyhow::Result<()> {
    let config = args.config_args.load()?;
    let report = Simulation::run(config).await?;
    println!("{}", report.to_json()?);
    Ok(())
}

async fn inspect(args: InspectCommand) -> anyhow::Result<()> {
    let config = args.config_args.load()?;
    let mut sim = Simulation::new(config)?;
    sim.join_all().await?;
    sim.put_keys().await?;

    let nodes = match args.node {
        Some(id) => vec![sim.node(id)?],
        None => sim.nodes().to_vec(),
    };
    let mut inspects = Vec::with_capacity(nodes.len());
    for node in nodes.iter() {
        inspects.push(NodeInspect::inspect(node).await);
    }
    sim.shutdown();

    match inspects.as_slice() {
        [one] => println!("{}", one.to_json()?),
        _ => println!("{}", serde_json::to_string_pretty(&inspects)?),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Command::Init(args) => init(args),
        Command::Run(args) => run(args).await,
        Command::Inspect(args) => inspect(args).await,
    }
}
